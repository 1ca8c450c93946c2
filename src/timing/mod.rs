/*!
 * Timestamp estimation policies for the synchronized transcript.
 *
 * Three mutually exclusive policies map one synthesized unit of narration to
 * timed cues, behind a single strategy interface:
 *
 * - `heuristic`: word durations proportional to character count
 * - `engine_reported`: word boundary events from the synthesis engine
 * - `hybrid`: sentence-level display blocks honoring explicit pause spans
 */

use std::fmt::Debug;
use std::sync::Arc;

use crate::app_config::{TimingConfig, TimingPolicyKind};
use crate::engine::SynthesisResult;
use crate::markdown::NarrationScript;
use crate::transcript::{Cue, Granularity};

// Re-export policy implementations
pub use self::engine_reported::EngineReportedTiming;
pub use self::heuristic::HeuristicTiming;
pub use self::hybrid::HybridTiming;

/// Common trait for timestamp estimation policies
///
/// A policy turns one synthesized unit (a whole document or one chunk) into
/// cues relative to the start of that unit's audio. Exactly one policy is
/// active per run.
pub trait TimingPolicy: Send + Sync + Debug {
    /// Whether the produced cues are words or sentences
    fn granularity(&self) -> Granularity;

    /// Produce cues for one synthesized unit
    ///
    /// # Arguments
    /// * `script` - The narration script of the unit
    /// * `synthesis` - The engine output for the same unit
    fn cues(&self, script: &NarrationScript, synthesis: &SynthesisResult) -> Vec<Cue>;

    /// Whether cue times are estimates rather than measurements.
    ///
    /// Estimated timelines are rescaled to the measured chunk duration in
    /// chunked mode; measured timelines are used as-is.
    fn is_estimated(&self) -> bool {
        true
    }
}

/// Build the configured timing policy
pub fn build_policy(timing: &TimingConfig) -> Arc<dyn TimingPolicy> {
    match timing.policy {
        TimingPolicyKind::Heuristic => Arc::new(HeuristicTiming::new(timing.clone())),
        TimingPolicyKind::Engine => Arc::new(EngineReportedTiming::new(timing.clone())),
        TimingPolicyKind::Hybrid => Arc::new(HybridTiming::new(timing.clone())),
    }
}

pub mod engine_reported;
pub mod heuristic;
pub mod hybrid;
