/*!
 * Speech engine implementations for narration synthesis.
 *
 * This module contains adapters for the supported synthesis backends:
 * - Edge: the edge-tts command-line client, driven as a subprocess
 * - Azure: the Azure Cognitive Services speech REST endpoint
 * - Mock: deterministic in-process engine for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

use crate::app_config::{EngineSettings, SpeechEngineKind};
use crate::errors::EngineError;

/// One synthesis call: the audio-bound text for a whole document or a chunk
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// Plain audio-bound text
    pub text: String,

    /// Markup rendering of the same text, for engines that accept SSML
    pub markup: Option<String>,

    /// Voice identifier
    pub voice: String,
}

impl SynthesisRequest {
    /// Create a plain-text request
    pub fn new(text: impl Into<String>, voice: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markup: None,
            voice: voice.into(),
        }
    }

    /// Attach an SSML rendering
    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = Some(markup.into());
        self
    }
}

/// A word boundary event reported by the engine, relative to the start of
/// the synthesized audio for the request it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct WordBoundary {
    /// The spoken word
    pub word: String,

    /// Offset of the word onset in seconds
    pub offset_secs: f64,

    /// Spoken duration in seconds, when the engine reports one
    pub duration_secs: Option<f64>,
}

/// Result of one synthesis call
#[derive(Debug, Clone, Default)]
pub struct SynthesisResult {
    /// Encoded audio bytes (MP3)
    pub audio: Vec<u8>,

    /// Word boundary events, empty when the engine reports none
    pub boundaries: Vec<WordBoundary>,

    /// Decoded duration in seconds, when the engine already knows it.
    /// When absent the pipeline probes the produced audio itself.
    pub duration_secs: Option<f64>,
}

/// Common trait for all speech engines
///
/// This trait defines the interface that all engine implementations must follow,
/// allowing them to be used interchangeably in the narration service.
#[async_trait]
pub trait SpeechEngine: Send + Sync + Debug {
    /// Synthesize one request into audio and optional boundary events
    ///
    /// # Arguments
    /// * `request` - The text (and optional markup) to synthesize
    ///
    /// # Returns
    /// * `Result<SynthesisResult, EngineError>` - Audio bytes plus events, or an error
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesisResult, EngineError>;

    /// Probe whether the engine is reachable and usable
    ///
    /// # Returns
    /// * `Result<(), EngineError>` - Ok if the engine can be used, or an error
    async fn test_availability(&self) -> Result<(), EngineError>;

    /// Whether the engine accepts SSML markup (pause tags) instead of plain text
    fn supports_markup(&self) -> bool {
        false
    }

    /// Whether the engine reports word boundary events
    fn reports_word_boundaries(&self) -> bool {
        false
    }
}

/// Build the configured engine from the engine settings
pub fn build_engine(settings: &EngineSettings) -> Arc<dyn SpeechEngine> {
    match settings.engine {
        SpeechEngineKind::Edge => Arc::new(edge::EdgeTts::new(
            settings.get_voice(),
            settings.get_timeout_secs(),
        )),
        SpeechEngineKind::Azure => Arc::new(azure::AzureSpeech::new(
            settings.get_endpoint(),
            settings.get_api_key(),
            settings.get_timeout_secs(),
        )),
        SpeechEngineKind::Mock => Arc::new(mock::MockEngine::working()),
    }
}

pub mod azure;
pub mod edge;
pub mod mock;
