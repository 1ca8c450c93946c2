use std::path::Path;
use std::time::Duration;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::process::Command;
use log::{debug, warn};

use crate::engine::{SpeechEngine, SynthesisRequest, SynthesisResult, WordBoundary};
use crate::errors::EngineError;

// @const: WebVTT cue timing line regex (hours optional)
static VTT_TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:(\d{1,2}):)?(\d{2}):(\d{2})\.(\d{3})\s+-->\s+(?:(\d{1,2}):)?(\d{2}):(\d{2})\.(\d{3})")
        .unwrap()
});

/// Speech engine backed by the edge-tts command-line client.
///
/// The client streams audio from the Edge neural voices service and can
/// write the word boundary events it receives as a WebVTT subtitle file;
/// that file is parsed back into boundary events here.
#[derive(Debug)]
pub struct EdgeTts {
    /// Voice identifier, e.g. "en-US-AriaNeural"
    voice: String,
    /// Time budget for one synthesis call, in seconds
    timeout_secs: u64,
}

impl EdgeTts {
    /// Create a new engine for the given voice
    pub fn new(voice: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            voice: voice.into(),
            timeout_secs,
        }
    }

    /// Run edge-tts with the given arguments, enforcing the time budget
    async fn run_client(&self, args: &[&str]) -> Result<std::process::Output, EngineError> {
        let client_future = Command::new("edge-tts").args(args).output();

        let timeout_duration = Duration::from_secs(self.timeout_secs);
        let output = tokio::select! {
            result = client_future => {
                result.map_err(|e| EngineError::ProcessFailed(
                    format!("Failed to execute edge-tts (is it installed?): {}", e)
                ))?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(EngineError::Timeout(
                    format!("edge-tts did not finish within {} seconds", self.timeout_secs)
                ));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::ProcessFailed(format!(
                "edge-tts exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(output)
    }
}

#[async_trait]
impl SpeechEngine for EdgeTts {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesisResult, EngineError> {
        let voice = if request.voice.is_empty() {
            self.voice.clone()
        } else {
            request.voice.clone()
        };

        let scratch = tempfile::tempdir()
            .map_err(|e| EngineError::ProcessFailed(format!("Failed to create scratch dir: {}", e)))?;
        let media_path = scratch.path().join("narration.mp3");
        let subtitle_path = scratch.path().join("narration.vtt");

        self.run_client(&[
            "--voice",
            &voice,
            "--text",
            &request.text,
            "--write-media",
            &media_path.to_string_lossy(),
            "--write-subtitles",
            &subtitle_path.to_string_lossy(),
        ])
        .await?;

        let audio = std::fs::read(&media_path)
            .map_err(|e| EngineError::ProcessFailed(format!("Failed to read produced media: {}", e)))?;

        let boundaries = match read_vtt_boundaries(&subtitle_path) {
            Ok(boundaries) => boundaries,
            Err(e) => {
                // The media is still usable without boundaries
                warn!("Could not parse edge-tts subtitles: {}", e);
                Vec::new()
            }
        };

        debug!(
            "edge-tts produced {} bytes of audio and {} word boundaries",
            audio.len(),
            boundaries.len()
        );

        Ok(SynthesisResult {
            audio,
            boundaries,
            duration_secs: None,
        })
    }

    async fn test_availability(&self) -> Result<(), EngineError> {
        let output = self.run_client(&["--list-voices"]).await?;
        if output.stdout.is_empty() {
            return Err(EngineError::ProcessFailed(
                "edge-tts returned an empty voice list".to_string(),
            ));
        }
        Ok(())
    }

    fn reports_word_boundaries(&self) -> bool {
        true
    }
}

/// Parse the word-level WebVTT file written by edge-tts into boundary events
fn read_vtt_boundaries(path: &Path) -> Result<Vec<WordBoundary>, EngineError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| EngineError::ParseError(format!("Failed to read subtitle file: {}", e)))?;
    parse_vtt(&content)
}

/// Parse WebVTT content where each cue carries one spoken word.
///
/// Cues with multi-word payloads are split evenly across the cue interval so
/// a coarser subtitle file still yields usable word events.
pub fn parse_vtt(content: &str) -> Result<Vec<WordBoundary>, EngineError> {
    let mut boundaries = Vec::new();
    let mut current_span: Option<(f64, f64)> = None;
    let mut current_text = String::new();

    let mut flush = |span: &mut Option<(f64, f64)>, text: &mut String, out: &mut Vec<WordBoundary>| {
        if let Some((start, end)) = span.take() {
            let words: Vec<&str> = text.split_whitespace().collect();
            if !words.is_empty() && end >= start {
                let per_word = (end - start) / words.len() as f64;
                for (i, word) in words.iter().enumerate() {
                    boundaries_push(out, word, start + per_word * i as f64, per_word);
                }
            }
        }
        text.clear();
    };

    for line in content.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed == "WEBVTT" || trimmed.starts_with("NOTE") {
            flush(&mut current_span, &mut current_text, &mut boundaries);
            continue;
        }

        if let Some(caps) = VTT_TIMING_REGEX.captures(trimmed) {
            flush(&mut current_span, &mut current_text, &mut boundaries);
            let start = timestamp_from_captures(&caps, 1);
            let end = timestamp_from_captures(&caps, 5);
            current_span = Some((start, end));
            continue;
        }

        if current_span.is_some() {
            if !current_text.is_empty() {
                current_text.push(' ');
            }
            current_text.push_str(trimmed);
        }
    }

    flush(&mut current_span, &mut current_text, &mut boundaries);

    if boundaries.is_empty() {
        return Err(EngineError::ParseError(
            "Subtitle file contained no cues".to_string(),
        ));
    }

    Ok(boundaries)
}

fn boundaries_push(out: &mut Vec<WordBoundary>, word: &str, offset: f64, duration: f64) {
    out.push(WordBoundary {
        word: word.to_string(),
        offset_secs: offset,
        duration_secs: Some(duration),
    });
}

/// Convert one half of a VTT timing line to seconds
fn timestamp_from_captures(caps: &regex::Captures, start_idx: usize) -> f64 {
    let hours: f64 = caps
        .get(start_idx)
        .map_or(0.0, |m| m.as_str().parse().unwrap_or(0.0));
    let minutes: f64 = caps
        .get(start_idx + 1)
        .map_or(0.0, |m| m.as_str().parse().unwrap_or(0.0));
    let seconds: f64 = caps
        .get(start_idx + 2)
        .map_or(0.0, |m| m.as_str().parse().unwrap_or(0.0));
    let millis: f64 = caps
        .get(start_idx + 3)
        .map_or(0.0, |m| m.as_str().parse().unwrap_or(0.0));

    hours * 3600.0 + minutes * 60.0 + seconds + millis / 1000.0
}
