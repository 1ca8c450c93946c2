use crate::app_config::TimingConfig;
use crate::engine::SynthesisResult;
use crate::markdown::NarrationScript;
use crate::timing::TimingPolicy;
use crate::transcript::{round2, Cue, Granularity};

// @module: Character-count word timing

/// Word-level timing estimated from character counts.
///
/// Each word takes `secs_per_char` seconds per character, plus a fixed bonus
/// when it ends in sentence or clause punctuation. The clock advances by the
/// unrounded duration; only the emitted cue times are rounded. The estimate
/// is never reconciled against the real audio length in whole-document mode;
/// drift over long documents is accepted.
#[derive(Debug, Clone)]
pub struct HeuristicTiming {
    timing: TimingConfig,
}

impl HeuristicTiming {
    /// Create a policy with the given rate constants
    pub fn new(timing: TimingConfig) -> Self {
        Self { timing }
    }

    /// Estimated spoken duration of one word, in seconds
    pub fn word_duration(&self, word: &str) -> f64 {
        let mut duration = word.chars().count() as f64 * self.timing.secs_per_char;

        // A tiny buffer for punctuation pauses
        if word.ends_with('.') || word.ends_with(',') {
            duration += self.timing.punctuation_pause_secs;
        }

        duration
    }

    /// Estimated total duration of a display text, in seconds
    pub fn estimate_total(&self, display_text: &str) -> f64 {
        display_text
            .split_whitespace()
            .map(|w| self.word_duration(w))
            .sum()
    }
}

impl TimingPolicy for HeuristicTiming {
    fn granularity(&self) -> Granularity {
        Granularity::Words
    }

    fn cues(&self, script: &NarrationScript, _synthesis: &SynthesisResult) -> Vec<Cue> {
        let display = script.display_text();
        let mut cues = Vec::new();
        let mut clock = 0.0;

        for word in display.split_whitespace() {
            let duration = self.word_duration(word);
            cues.push(Cue {
                text: word.to_string(),
                start: round2(clock),
                end: round2(clock + duration),
            });
            clock += duration;
        }

        cues
    }
}
