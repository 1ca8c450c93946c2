use crate::app_config::TimingConfig;
use crate::engine::SynthesisResult;
use crate::markdown::{split_sentences, NarrationScript, Span};
use crate::timing::TimingPolicy;
use crate::transcript::{round2, Cue, Granularity};

// @module: Sentence block timing with explicit pauses

/// Sentence-level timing for display blocks, honoring pause spans.
///
/// Each sentence of a text span gets a duration proportional to its
/// character count; each pause span advances the clock by its configured
/// duration without emitting a cue. Like the word heuristic, the sentence
/// estimate is an approximation seeded by the same rate constant.
#[derive(Debug, Clone)]
pub struct HybridTiming {
    timing: TimingConfig,
}

impl HybridTiming {
    /// Create a policy with the given rate constants
    pub fn new(timing: TimingConfig) -> Self {
        Self { timing }
    }

    /// Estimated spoken duration of one sentence, in seconds
    pub fn sentence_duration(&self, sentence: &str) -> f64 {
        let mut duration = sentence.chars().count() as f64 * self.timing.secs_per_char;

        if sentence.ends_with(['.', '!', '?', ',']) {
            duration += self.timing.punctuation_pause_secs;
        }

        duration
    }
}

impl TimingPolicy for HybridTiming {
    fn granularity(&self) -> Granularity {
        Granularity::Sentences
    }

    fn cues(&self, script: &NarrationScript, _synthesis: &SynthesisResult) -> Vec<Cue> {
        let mut cues = Vec::new();
        let mut clock = 0.0;

        for span in &script.spans {
            match span {
                Span::Text(text) => {
                    for sentence in split_sentences(text) {
                        let duration = self.sentence_duration(&sentence);
                        cues.push(Cue {
                            text: sentence,
                            start: round2(clock),
                            end: round2(clock + duration),
                        });
                        clock += duration;
                    }
                }
                Span::Pause(kind) => {
                    clock += kind.duration_secs(&self.timing);
                }
            }
        }

        cues
    }
}
