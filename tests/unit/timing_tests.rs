/*!
 * Tests for the timestamp estimation policies
 */

use narramd::app_config::{TimingConfig, TimingPolicyKind};
use narramd::engine::{SynthesisResult, WordBoundary};
use narramd::markdown::NarrationScript;
use narramd::timing::{EngineReportedTiming, HeuristicTiming, HybridTiming, TimingPolicy};
use narramd::transcript::Granularity;

fn test_timing(policy: TimingPolicyKind) -> TimingConfig {
    TimingConfig {
        policy,
        secs_per_char: 0.1,
        punctuation_pause_secs: 0.15,
        section_pause_secs: 0.7,
        list_pause_secs: 0.4,
    }
}

fn boundary(word: &str, offset: f64, duration: f64) -> WordBoundary {
    WordBoundary {
        word: word.to_string(),
        offset_secs: offset,
        duration_secs: Some(duration),
    }
}

/// Test heuristic word durations: chars times rate plus punctuation bonus
#[test]
fn test_heuristic_cues_withPunctuation_shouldAddPauseBonus() {
    let policy = HeuristicTiming::new(test_timing(TimingPolicyKind::Heuristic));
    let script = NarrationScript::from_markdown("doc", "Hello world.");

    let cues = policy.cues(&script, &SynthesisResult::default());

    assert_eq!(cues.len(), 2);
    assert_eq!(cues[0].text, "Hello");
    assert_eq!(cues[0].start, 0.0);
    assert_eq!(cues[0].end, 0.5);
    // "world." is six chars plus the punctuation bonus
    assert_eq!(cues[1].start, 0.5);
    assert_eq!(cues[1].end, 1.25);
}

/// Test the ordering invariant over a longer paragraph
#[test]
fn test_heuristic_cues_withLongParagraph_shouldStayMonotonic() {
    let policy = HeuristicTiming::new(test_timing(TimingPolicyKind::Heuristic));
    let text = "The quick brown fox jumps over the lazy dog, then naps. \
                Later it wakes, stretches, and wanders off to find dinner.";
    let script = NarrationScript::from_markdown("doc", text);

    let cues = policy.cues(&script, &SynthesisResult::default());

    assert!(cues.len() > 10);
    for pair in cues.windows(2) {
        assert!(pair[0].start <= pair[0].end);
        assert!(pair[0].end <= pair[1].start);
    }
    assert_eq!(policy.granularity(), Granularity::Words);
}

/// Test engine-reported cues use the boundary events directly
#[test]
fn test_engine_reported_cues_withBoundaries_shouldUseReportedTimes() {
    let policy = EngineReportedTiming::new(test_timing(TimingPolicyKind::Engine));
    let script = NarrationScript::from_markdown("doc", "Hello world");

    let synthesis = SynthesisResult {
        audio: vec![0u8; 64],
        boundaries: vec![boundary("Hello", 0.0, 0.2), boundary("world", 0.3, 0.2)],
        duration_secs: None,
    };

    let cues = policy.cues(&script, &synthesis);

    assert_eq!(cues.len(), 2);
    assert_eq!(cues[0].start, 0.0);
    assert_eq!(cues[0].end, 0.2);
    assert_eq!(cues[1].start, 0.3);
    assert_eq!(cues[1].end, 0.5);
    assert!(!policy.is_estimated());
}

/// Test a word never runs into the next word's onset
#[test]
fn test_engine_reported_cues_withOverlappingDurations_shouldCapAtNextOnset() {
    let policy = EngineReportedTiming::new(test_timing(TimingPolicyKind::Engine));
    let script = NarrationScript::from_markdown("doc", "Hello world");

    let synthesis = SynthesisResult {
        audio: vec![0u8; 64],
        // First word claims half a second but the next onset is at 0.3
        boundaries: vec![boundary("Hello", 0.0, 0.5), boundary("world", 0.3, 0.2)],
        duration_secs: None,
    };

    let cues = policy.cues(&script, &synthesis);

    assert_eq!(cues[0].end, 0.3);
    assert_eq!(cues[1].start, 0.3);
}

/// Test the heuristic fallback when the engine stays silent
#[test]
fn test_engine_reported_cues_withNoBoundaries_shouldFallBackToHeuristic() {
    let timing = test_timing(TimingPolicyKind::Engine);
    let policy = EngineReportedTiming::new(timing.clone());
    let heuristic = HeuristicTiming::new(timing);
    let script = NarrationScript::from_markdown("doc", "Hello world.");

    let synthesis = SynthesisResult {
        audio: vec![0u8; 64],
        boundaries: Vec::new(),
        duration_secs: None,
    };

    let cues = policy.cues(&script, &synthesis);
    let expected = heuristic.cues(&script, &synthesis);

    assert_eq!(cues, expected);
}

/// Test engine-reported cues prefer the document's own spelling when the
/// word counts line up
#[test]
fn test_engine_reported_cues_withSubstitutedSpeech_shouldDisplayOriginalSpelling() {
    let policy = EngineReportedTiming::new(test_timing(TimingPolicyKind::Engine));
    let script = NarrationScript::from_markdown("doc", "Some METAR text.");

    let synthesis = SynthesisResult {
        audio: vec![0u8; 64],
        boundaries: vec![
            boundary("Some", 0.0, 0.2),
            boundary("mee-tar", 0.2, 0.4),
            boundary("text.", 0.6, 0.3),
        ],
        duration_secs: None,
    };

    let cues = policy.cues(&script, &synthesis);

    assert_eq!(cues[1].text, "METAR");
}

/// Test hybrid cues: sentence blocks with pauses advancing the clock
#[test]
fn test_hybrid_cues_withSectionPause_shouldShiftFollowingBlock() {
    let policy = HybridTiming::new(test_timing(TimingPolicyKind::Hybrid));
    let script = NarrationScript::from_markdown("doc", "# Title\n\nSome text here.");

    let cues = policy.cues(&script, &SynthesisResult::default());

    assert_eq!(cues.len(), 2);
    assert_eq!(cues[0].text, "Title");
    assert_eq!(cues[0].start, 0.0);
    assert_eq!(cues[0].end, 0.5);
    // The section pause pushes the body block back without emitting a cue
    assert_eq!(cues[1].text, "Some text here.");
    assert_eq!(cues[1].start, 1.2);
    assert_eq!(cues[1].end, 2.85);
    assert_eq!(policy.granularity(), Granularity::Sentences);
}

/// Test hybrid splits a paragraph into one cue per sentence
#[test]
fn test_hybrid_cues_withMultipleSentences_shouldEmitOneCuePerSentence() {
    let policy = HybridTiming::new(test_timing(TimingPolicyKind::Hybrid));
    let script = NarrationScript::from_markdown("doc", "One here. Two there. Three everywhere.");

    let cues = policy.cues(&script, &SynthesisResult::default());

    assert_eq!(cues.len(), 3);
    assert_eq!(cues[0].text, "One here.");
    assert_eq!(cues[2].text, "Three everywhere.");
    for pair in cues.windows(2) {
        assert!(pair[0].end <= pair[1].start);
    }
}
