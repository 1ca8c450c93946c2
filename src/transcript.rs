use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use anyhow::{Context, Result};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use log::warn;

use crate::errors::TranscriptError;

// @module: Synchronized transcript model and sidecar JSON output

/// One timed utterance unit: a word or a sentence with its spoken interval
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    /// Literal text as shown by the highlighting player
    pub text: String,

    /// Start time in seconds
    pub start: f64,

    /// End time in seconds
    pub end: f64,
}

impl Cue {
    /// Creates a new cue with times rounded to centiseconds
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Cue {
            text: text.into(),
            start: round2(start),
            end: round2(end),
        }
    }

    /// Shift both times forward by an offset, in seconds
    pub fn shifted(&self, offset: f64) -> Self {
        Cue {
            text: self.text.clone(),
            start: round2(self.start + offset),
            end: round2(self.end + offset),
        }
    }

    /// Scale both times by a factor around zero
    pub fn scaled(&self, factor: f64) -> Self {
        Cue {
            text: self.text.clone(),
            start: round2(self.start * factor),
            end: round2(self.end * factor),
        }
    }
}

/// Granularity of the produced cue sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// One cue per spoken word
    Words,
    /// One cue per display sentence
    Sentences,
}

impl Granularity {
    /// JSON key holding the cue array for this granularity
    pub fn array_key(&self) -> &'static str {
        match self {
            Self::Words => "words",
            Self::Sentences => "sentences",
        }
    }

    /// JSON key holding the cue text for this granularity
    pub fn text_key(&self) -> &'static str {
        match self {
            Self::Words => "word",
            Self::Sentences => "text",
        }
    }
}

/// Transcript metadata block
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptMetadata {
    /// Document title
    pub title: String,

    /// File name of the narrated audio, relative to the JSON sidecar
    pub audio_file: String,
}

/// Ordered, validated sequence of cues plus metadata, persisted as the JSON
/// sidecar next to the generated audio file.
#[derive(Debug, Clone)]
pub struct Transcript {
    /// Metadata block
    pub metadata: TranscriptMetadata,

    /// Whether cues are words or sentences
    pub granularity: Granularity,

    /// Timed cues in playback order
    pub cues: Vec<Cue>,
}

impl Transcript {
    /// Creates a transcript after checking the timeline invariant:
    /// `start[i] <= end[i] <= start[i+1]` for every cue.
    pub fn new_validated(
        metadata: TranscriptMetadata,
        granularity: Granularity,
        cues: Vec<Cue>,
    ) -> Result<Self, TranscriptError> {
        if cues.is_empty() {
            return Err(TranscriptError::Empty);
        }

        for (i, cue) in cues.iter().enumerate() {
            if cue.end < cue.start {
                return Err(TranscriptError::NonMonotonic {
                    index: i,
                    detail: format!("end {} precedes start {}", cue.end, cue.start),
                });
            }
            if let Some(next) = cues.get(i + 1) {
                if next.start < cue.end {
                    return Err(TranscriptError::NonMonotonic {
                        index: i + 1,
                        detail: format!(
                            "start {} precedes previous end {}",
                            next.start, cue.end
                        ),
                    });
                }
            }
        }

        Ok(Transcript {
            metadata,
            granularity,
            cues,
        })
    }

    /// End time of the final cue, i.e. the approximate narration length
    pub fn total_duration(&self) -> f64 {
        self.cues.last().map_or(0.0, |c| c.end)
    }

    /// Write the transcript as pretty-printed JSON
    pub fn write_to_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize transcript to JSON")?;

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create transcript file: {}", path.display()))?;
        file.write_all(json.as_bytes())
            .with_context(|| format!("Failed to write transcript file: {}", path.display()))?;

        Ok(())
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Transcript")?;
        writeln!(f, "Title: {}", self.metadata.title)?;
        writeln!(f, "Audio: {}", self.metadata.audio_file)?;
        writeln!(f, "Cues: {} ({})", self.cues.len(), self.granularity.array_key())?;
        Ok(())
    }
}

// The sidecar shape is fixed by the player:
// {"metadata": {...}, "words"|"sentences": [{"word"|"text": .., "start": .., "end": ..}]}
impl Serialize for Transcript {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        struct CueEntry<'a> {
            cue: &'a Cue,
            text_key: &'static str,
        }

        impl Serialize for CueEntry<'_> {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                let mut state = serializer.serialize_struct("Cue", 3)?;
                match self.text_key {
                    "word" => state.serialize_field("word", &self.cue.text)?,
                    _ => state.serialize_field("text", &self.cue.text)?,
                }
                state.serialize_field("start", &self.cue.start)?;
                state.serialize_field("end", &self.cue.end)?;
                state.end()
            }
        }

        let entries: Vec<CueEntry> = self
            .cues
            .iter()
            .map(|cue| CueEntry {
                cue,
                text_key: self.granularity.text_key(),
            })
            .collect();

        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("metadata", &self.metadata)?;
        map.serialize_entry(self.granularity.array_key(), &entries)?;
        map.end()
    }
}

/// Round to two decimals, the resolution the player works at
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Clamp a cue sequence end-first so no cue extends past `limit`.
///
/// Engine timelines occasionally overshoot the decoded audio by a frame;
/// the player treats anything past the end of audio as unreachable.
pub fn clamp_to_duration(cues: &mut [Cue], limit: f64) {
    let limit = round2(limit);
    let mut clamped = 0usize;
    for cue in cues.iter_mut() {
        if cue.end > limit {
            cue.end = limit;
            clamped += 1;
        }
        if cue.start > limit {
            cue.start = limit;
        }
    }
    if clamped > 0 {
        warn!("Clamped {} cue(s) to the audio duration of {:.2}s", clamped, limit);
    }
}
