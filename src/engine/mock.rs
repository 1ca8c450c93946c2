/*!
 * Mock engine implementation for testing.
 *
 * This module provides a deterministic engine that simulates different behaviors:
 * - `MockEngine::working()` - Always succeeds with synthetic audio and boundaries
 * - `MockEngine::without_boundaries()` - Succeeds but reports no word events
 * - `MockEngine::empty()` - Returns zero audio bytes
 * - `MockEngine::failing()` - Always fails with an error
 */

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::engine::{SpeechEngine, SynthesisRequest, SynthesisResult, WordBoundary};
use crate::errors::EngineError;

/// Seconds of synthetic speech per word
const SECS_PER_WORD: f64 = 0.25;

/// Synthetic audio bytes per word
const BYTES_PER_WORD: usize = 320;

/// Behavior mode for the mock engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with audio and word boundaries
    Working,
    /// Succeeds with audio but no boundary events
    WithoutBoundaries,
    /// Returns an empty audio buffer
    Empty,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
}

/// Mock engine for testing narration behavior
#[derive(Debug)]
pub struct MockEngine {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter for intermittent failures
    request_count: Arc<AtomicUsize>,
}

impl MockEngine {
    /// Create a new mock engine with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a working mock engine that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a working mock engine that reports no boundaries
    pub fn without_boundaries() -> Self {
        Self::new(MockBehavior::WithoutBoundaries)
    }

    /// Create a mock engine that produces empty audio
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create an intermittently failing mock engine
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a failing mock engine that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Number of synthesize calls received so far
    pub fn requests_seen(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Deterministic synthesis: fixed cadence, fixed bytes per word
    fn fabricate(text: &str, with_boundaries: bool) -> SynthesisResult {
        let words: Vec<&str> = text.split_whitespace().collect();

        let audio = vec![0u8; words.len() * BYTES_PER_WORD];

        let boundaries = if with_boundaries {
            words
                .iter()
                .enumerate()
                .map(|(i, word)| WordBoundary {
                    word: (*word).to_string(),
                    offset_secs: i as f64 * SECS_PER_WORD,
                    duration_secs: Some(SECS_PER_WORD),
                })
                .collect()
        } else {
            Vec::new()
        };

        SynthesisResult {
            audio,
            boundaries,
            duration_secs: Some(words.len() as f64 * SECS_PER_WORD),
        }
    }
}

#[async_trait]
impl SpeechEngine for MockEngine {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesisResult, EngineError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;

        match self.behavior {
            MockBehavior::Working => Ok(Self::fabricate(&request.text, true)),
            MockBehavior::WithoutBoundaries => Ok(Self::fabricate(&request.text, false)),
            MockBehavior::Empty => Ok(SynthesisResult {
                audio: Vec::new(),
                boundaries: Vec::new(),
                duration_secs: Some(0.0),
            }),
            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == 0 {
                    Err(EngineError::RequestFailed(format!(
                        "Simulated failure on request {}",
                        count
                    )))
                } else {
                    Ok(Self::fabricate(&request.text, true))
                }
            }
            MockBehavior::Failing => Err(EngineError::RequestFailed(
                "Simulated engine failure".to_string(),
            )),
        }
    }

    async fn test_availability(&self) -> Result<(), EngineError> {
        match self.behavior {
            MockBehavior::Failing => Err(EngineError::RequestFailed(
                "Simulated engine failure".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn reports_word_boundaries(&self) -> bool {
        !matches!(self.behavior, MockBehavior::WithoutBoundaries)
    }
}
