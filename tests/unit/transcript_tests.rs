/*!
 * Tests for transcript model and sidecar JSON shape
 */

use anyhow::Result;
use narramd::errors::TranscriptError;
use narramd::transcript::{clamp_to_duration, round2, Cue, Granularity, Transcript, TranscriptMetadata};

fn metadata() -> TranscriptMetadata {
    TranscriptMetadata {
        title: "chapter1".to_string(),
        audio_file: "chapter1.mp3".to_string(),
    }
}

/// Test cue construction rounds to centiseconds
#[test]
fn test_cue_new_withLongFractions_shouldRoundTimes() {
    let cue = Cue::new("word", 0.123456, 0.456789);

    assert_eq!(cue.start, 0.12);
    assert_eq!(cue.end, 0.46);
}

/// Test shifting and scaling keep rounded times
#[test]
fn test_cue_shift_and_scale_shouldTransformTimes() {
    let cue = Cue::new("word", 1.0, 2.0);

    let shifted = cue.shifted(0.5);
    assert_eq!(shifted.start, 1.5);
    assert_eq!(shifted.end, 2.5);

    let scaled = cue.scaled(2.0);
    assert_eq!(scaled.start, 2.0);
    assert_eq!(scaled.end, 4.0);
}

/// Test the words-granularity JSON shape matches the player contract
#[test]
fn test_transcript_json_withWordsGranularity_shouldMatchSidecarShape() -> Result<()> {
    let cues = vec![
        Cue::new("Hello", 0.0, 0.33),
        Cue::new("world.", 0.33, 0.84),
    ];
    let transcript = Transcript::new_validated(metadata(), Granularity::Words, cues)?;

    let value = serde_json::to_value(&transcript)?;

    assert_eq!(value["metadata"]["title"], "chapter1");
    assert_eq!(value["metadata"]["audio_file"], "chapter1.mp3");
    assert_eq!(value["words"][0]["word"], "Hello");
    assert_eq!(value["words"][0]["start"], 0.0);
    assert_eq!(value["words"][1]["end"], 0.84);
    assert!(value.get("sentences").is_none());

    Ok(())
}

/// Test the sentences-granularity JSON shape uses the text key
#[test]
fn test_transcript_json_withSentencesGranularity_shouldUseTextKey() -> Result<()> {
    let cues = vec![Cue::new("Hello world.", 0.0, 1.2)];
    let transcript = Transcript::new_validated(metadata(), Granularity::Sentences, cues)?;

    let value = serde_json::to_value(&transcript)?;

    assert_eq!(value["sentences"][0]["text"], "Hello world.");
    assert!(value.get("words").is_none());
    assert!(value["sentences"][0].get("word").is_none());

    Ok(())
}

/// Test validation rejects a cue that ends before it starts
#[test]
fn test_new_validated_withReversedCue_shouldReject() {
    let cues = vec![Cue::new("bad", 1.0, 0.5)];
    let result = Transcript::new_validated(metadata(), Granularity::Words, cues);

    assert!(matches!(result, Err(TranscriptError::NonMonotonic { index: 0, .. })));
}

/// Test validation rejects overlapping neighbors
#[test]
fn test_new_validated_withOverlappingCues_shouldReject() {
    let cues = vec![
        Cue::new("one", 0.0, 1.0),
        Cue::new("two", 0.5, 1.5),
    ];
    let result = Transcript::new_validated(metadata(), Granularity::Words, cues);

    assert!(matches!(result, Err(TranscriptError::NonMonotonic { index: 1, .. })));
}

/// Test validation rejects an empty cue list
#[test]
fn test_new_validated_withNoCues_shouldReject() {
    let result = Transcript::new_validated(metadata(), Granularity::Words, Vec::new());
    assert!(matches!(result, Err(TranscriptError::Empty)));
}

/// Test touching neighbors (end == next start) are accepted
#[test]
fn test_new_validated_withTouchingCues_shouldAccept() -> Result<()> {
    let cues = vec![
        Cue::new("one", 0.0, 1.0),
        Cue::new("two", 1.0, 2.0),
    ];
    let transcript = Transcript::new_validated(metadata(), Granularity::Words, cues)?;

    assert_eq!(transcript.total_duration(), 2.0);
    Ok(())
}

/// Test clamping caps cue times at the audio duration
#[test]
fn test_clamp_to_duration_withOvershootingCues_shouldCapTimes() {
    let mut cues = vec![
        Cue::new("one", 0.0, 1.0),
        Cue::new("two", 1.0, 2.6),
    ];
    clamp_to_duration(&mut cues, 2.5);

    assert_eq!(cues[1].end, 2.5);
    assert_eq!(cues[0].end, 1.0);
}

/// Test the rounding helper
#[test]
fn test_round2_withVariousValues_shouldRoundHalfUp() {
    assert_eq!(round2(1.2345), 1.23);
    assert_eq!(round2(1.236), 1.24);
    assert_eq!(round2(0.065 * 5.0), 0.33);
}

/// Test writing the sidecar JSON to disk
#[test]
fn test_write_to_json_withValidTranscript_shouldPersistFile() -> Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("out").join("chapter1.json");

    let cues = vec![Cue::new("Hello", 0.0, 0.33)];
    let transcript = Transcript::new_validated(metadata(), Granularity::Words, cues)?;
    transcript.write_to_json(&path)?;

    let content = std::fs::read_to_string(&path)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    assert_eq!(value["words"][0]["word"], "Hello");

    Ok(())
}
