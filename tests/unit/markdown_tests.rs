/*!
 * Tests for Markdown normalization functionality
 */

use narramd::app_config::{PronunciationRule, TimingConfig};
use narramd::markdown::{apply_pronunciation, split_sentences, NarrationScript, PauseKind, Span};

fn metar_rule() -> Vec<PronunciationRule> {
    vec![PronunciationRule {
        term: "METAR".to_string(),
        spoken: "mee-tar".to_string(),
    }]
}

/// Test a heading gets a trailing pause and substitution stays audio-only
#[test]
fn test_from_markdown_withHeadingAndPronunciation_shouldSplitAudioAndDisplay() {
    let script = NarrationScript::from_markdown("Title", "# Title\n\nSome METAR text.");

    assert_eq!(
        script.spans,
        vec![
            Span::Text("Title".to_string()),
            Span::Pause(PauseKind::Section),
            Span::Text("Some METAR text.".to_string()),
        ]
    );

    // The audio variant is substituted and pauses the narration after the heading
    let audio = script.audio_text(&metar_rule());
    assert!(audio.contains("mee-tar"));
    assert!(audio.contains("Title\n\n"));
    assert!(!audio.contains("METAR"));

    // The display variant preserves the original spelling verbatim
    let display = script.display_text();
    assert_eq!(display, "Title Some METAR text.");
}

/// Test that the audio-bound variant contains no raw Markdown markup
#[test]
fn test_audio_text_withRichMarkup_shouldContainNoMarkupCharacters() {
    let raw = "# Heading One\n\nThis is **bold** and *emphasis* and `code` and [a link](https://example.com).\n\n- first item\n- second item\n\n> quoted line\n\n![diagram](img.png)\n";
    let script = NarrationScript::from_markdown("doc", raw);
    let audio = script.audio_text(&[]);

    for forbidden in ['#', '*', '`', '[', ']', '>', '!'] {
        assert!(
            !audio.contains(forbidden),
            "audio text still contains '{}': {}",
            forbidden,
            audio
        );
    }

    assert!(audio.contains("bold"));
    assert!(audio.contains("a link"));
    assert!(audio.contains("quoted line"));
    assert!(audio.contains("diagram"));
    assert!(!audio.contains("https://example.com"));
}

/// Test list items each get a leading pause
#[test]
fn test_from_markdown_withListItems_shouldInsertListPauses() {
    let script = NarrationScript::from_markdown("doc", "- one\n- two\n");

    assert_eq!(
        script.spans,
        vec![
            Span::Pause(PauseKind::ListItem),
            Span::Text("one".to_string()),
            Span::Pause(PauseKind::ListItem),
            Span::Text("two".to_string()),
        ]
    );
}

/// Test numbered lists are treated like bulleted ones
#[test]
fn test_from_markdown_withNumberedList_shouldStripMarkers() {
    let script = NarrationScript::from_markdown("doc", "1. first\n2. second\n");
    let display = script.display_text();

    assert_eq!(display, "first second");
}

/// Test consecutive plain lines collapse into one paragraph span
#[test]
fn test_from_markdown_withWrappedParagraph_shouldJoinLines() {
    let script = NarrationScript::from_markdown("doc", "One line\nwrapped over\ntwo more.\n");

    assert_eq!(
        script.spans,
        vec![Span::Text("One line wrapped over two more.".to_string())]
    );
}

/// Test code fence delimiters are dropped while the body is narrated
#[test]
fn test_from_markdown_withCodeFence_shouldDropFenceLines() {
    let script = NarrationScript::from_markdown("doc", "```\nlet x = 1;\n```\n\nAfter the code.\n");
    let audio = script.audio_text(&[]);

    assert!(!audio.contains('`'));
    assert!(audio.contains("After the code."));
}

/// Test substitution respects word boundaries and case
#[test]
fn test_apply_pronunciation_withBoundaryAndCase_shouldSubstituteExactTermsOnly() {
    let rules = metar_rule();

    assert_eq!(apply_pronunciation("METAR report", &rules), "mee-tar report");
    assert_eq!(apply_pronunciation("METARS report", &rules), "METARS report");
    assert_eq!(apply_pronunciation("metar report", &rules), "metar report");
}

/// Test sentence splitting on terminal punctuation
#[test]
fn test_split_sentences_withMixedTerminators_shouldSplitCorrectly() {
    let sentences = split_sentences("First point. Second point! Third?");

    assert_eq!(
        sentences,
        vec![
            "First point.".to_string(),
            "Second point!".to_string(),
            "Third?".to_string(),
        ]
    );
}

/// Test text without terminators comes back whole
#[test]
fn test_split_sentences_withNoTerminator_shouldReturnSingleSentence() {
    let sentences = split_sentences("no punctuation at all");
    assert_eq!(sentences, vec!["no punctuation at all".to_string()]);
}

/// Test SSML rendering carries break tags and substitutions
#[test]
fn test_ssml_withPausesAndRules_shouldEmitBreakTags() {
    let script = NarrationScript::from_markdown("Title", "# Title\n\nSome METAR text.");
    let timing = TimingConfig::default();
    let ssml = script.ssml("en-US-AriaNeural", &metar_rule(), &timing);

    assert!(ssml.starts_with("<speak"));
    assert!(ssml.contains("<voice name=\"en-US-AriaNeural\">"));
    assert!(ssml.contains("<break time=\"700ms\"/>"));
    assert!(ssml.contains("mee-tar"));
    assert!(!ssml.contains("METAR"));
}

/// Test SSML escapes XML special characters in prose
#[test]
fn test_ssml_withSpecialCharacters_shouldEscapeThem() {
    let script = NarrationScript::from_markdown("doc", "Ceilings & visibility aren't optional.");
    let ssml = script.ssml("voice", &[], &TimingConfig::default());

    assert!(ssml.contains("Ceilings &amp; visibility"));
    assert!(ssml.contains("aren&apos;t"));
}

/// Test empty documents are flagged as empty
#[test]
fn test_is_empty_withWhitespaceOnlyDocument_shouldBeTrue() {
    let script = NarrationScript::from_markdown("doc", "\n\n   \n");
    assert!(script.is_empty());

    let non_empty = NarrationScript::from_markdown("doc", "words\n");
    assert!(!non_empty.is_empty());
}
