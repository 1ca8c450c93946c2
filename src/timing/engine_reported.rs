use log::warn;

use crate::app_config::TimingConfig;
use crate::engine::SynthesisResult;
use crate::markdown::NarrationScript;
use crate::timing::{HeuristicTiming, TimingPolicy};
use crate::transcript::{round2, Cue, Granularity};

// @module: Word timing from engine boundary events

/// Word-level timing taken directly from the engine's boundary events.
///
/// A word's end is capped at the next word's onset so cues never overlap.
/// When the engine reports no events at all the character-count heuristic
/// takes over, so a transcript is always produced.
#[derive(Debug, Clone)]
pub struct EngineReportedTiming {
    /// Fallback estimator for engines that stay silent about boundaries
    fallback: HeuristicTiming,
}

impl EngineReportedTiming {
    /// Create a policy with the given rate constants for the fallback path
    pub fn new(timing: TimingConfig) -> Self {
        Self {
            fallback: HeuristicTiming::new(timing),
        }
    }
}

impl TimingPolicy for EngineReportedTiming {
    fn granularity(&self) -> Granularity {
        Granularity::Words
    }

    fn cues(&self, script: &NarrationScript, synthesis: &SynthesisResult) -> Vec<Cue> {
        if synthesis.boundaries.is_empty() {
            warn!("Engine reported no word boundaries; falling back to estimated timing");
            return self.fallback.cues(script, synthesis);
        }

        // Substituted spellings reach the engine, but the player should show
        // the document's own words. When the event count lines up with the
        // display words, prefer the display spelling.
        let display = script.display_text();
        let display_words: Vec<&str> = display.split_whitespace().collect();
        let use_display = display_words.len() == synthesis.boundaries.len();

        let mut cues = Vec::with_capacity(synthesis.boundaries.len());

        for (i, boundary) in synthesis.boundaries.iter().enumerate() {
            let start = boundary.offset_secs;

            let reported_end = boundary
                .duration_secs
                .map(|d| start + d)
                .unwrap_or_else(|| start + self.fallback.word_duration(&boundary.word));

            // Never run into the next word's onset
            let end = match synthesis.boundaries.get(i + 1) {
                Some(next) => reported_end.min(next.offset_secs).max(start),
                None => synthesis
                    .duration_secs
                    .map_or(reported_end, |total| reported_end.min(total).max(start)),
            };

            let text = if use_display {
                display_words[i].to_string()
            } else {
                boundary.word.clone()
            };

            cues.push(Cue {
                text,
                start: round2(start),
                end: round2(end),
            });
        }

        cues
    }

    fn is_estimated(&self) -> bool {
        false
    }
}
