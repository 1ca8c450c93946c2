use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Speech engine config
    pub engine: EngineSettings,

    /// Timestamp estimation config
    #[serde(default)]
    pub timing: TimingConfig,

    /// Pronunciation substitution table, applied to audio-bound text only
    #[serde(default = "default_pronunciation_table")]
    pub pronunciation: Vec<PronunciationRule>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Speech engine type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpeechEngineKind {
    // @engine: Microsoft Edge neural TTS via the edge-tts command-line client
    #[default]
    Edge,
    // @engine: Azure Cognitive Services speech REST endpoint
    Azure,
    // @engine: Deterministic in-process engine for tests
    Mock,
}

impl SpeechEngineKind {
    // @returns: Capitalized engine name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Edge => "Edge TTS",
            Self::Azure => "Azure Speech",
            Self::Mock => "Mock",
        }
    }

    // @returns: Lowercase engine identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Edge => "edge".to_string(),
            Self::Azure => "azure".to_string(),
            Self::Mock => "mock".to_string(),
        }
    }
}

impl std::fmt::Display for SpeechEngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for SpeechEngineKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "edge" => Ok(Self::Edge),
            "azure" => Ok(Self::Azure),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid engine type: {}", s)),
        }
    }
}

/// Engine configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EngineConfig {
    // @field: Engine type identifier
    #[serde(rename = "type")]
    pub engine_type: String,

    // @field: Voice identifier
    #[serde(default = "default_voice")]
    pub voice: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL (remote engines only)
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Max chars per synthesized chunk
    #[serde(default = "default_max_chars_per_chunk")]
    pub max_chars_per_chunk: usize,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl EngineConfig {
    // @param engine_type: Engine enum
    // @returns: Engine config with defaults
    pub fn new(engine_type: SpeechEngineKind) -> Self {
        match engine_type {
            SpeechEngineKind::Edge => Self {
                engine_type: "edge".to_string(),
                voice: default_voice(),
                api_key: String::new(),
                endpoint: String::new(),
                max_chars_per_chunk: default_max_chars_per_chunk(),
                timeout_secs: default_edge_timeout_secs(),
            },
            SpeechEngineKind::Azure => Self {
                engine_type: "azure".to_string(),
                voice: default_voice(),
                api_key: String::new(),
                endpoint: default_azure_endpoint(),
                max_chars_per_chunk: default_max_chars_per_chunk(),
                timeout_secs: default_timeout_secs(),
            },
            SpeechEngineKind::Mock => Self {
                engine_type: "mock".to_string(),
                voice: default_voice(),
                api_key: String::new(),
                endpoint: String::new(),
                max_chars_per_chunk: default_max_chars_per_chunk(),
                timeout_secs: default_timeout_secs(),
            },
        }
    }
}

/// Speech engine configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EngineSettings {
    /// Speech engine to use
    #[serde(default)]
    pub engine: SpeechEngineKind,

    /// Available speech engines
    #[serde(default)]
    pub available_engines: Vec<EngineConfig>,
}

/// Timestamp estimation policy
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimingPolicyKind {
    /// Word durations proportional to character count
    #[default]
    Heuristic,
    /// Word boundaries reported by the synthesis engine
    Engine,
    /// Sentence-level blocks with explicit pause durations
    Hybrid,
}

impl std::fmt::Display for TimingPolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Heuristic => "heuristic",
            Self::Engine => "engine",
            Self::Hybrid => "hybrid",
        };
        write!(f, "{}", name)
    }
}

/// Timestamp estimation configuration
///
/// The rate constants seed the heuristic and hybrid policies. They are
/// approximations; estimated timelines are not reconciled against measured
/// audio length outside chunked synthesis.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TimingConfig {
    /// Estimation policy to use
    #[serde(default)]
    pub policy: TimingPolicyKind,

    /// Speaking rate in seconds per character
    #[serde(default = "default_secs_per_char")]
    pub secs_per_char: f64,

    /// Extra pause after words ending in punctuation, in seconds
    #[serde(default = "default_punctuation_pause_secs")]
    pub punctuation_pause_secs: f64,

    /// Pause requested after a heading, in seconds
    #[serde(default = "default_section_pause_secs")]
    pub section_pause_secs: f64,

    /// Pause requested before a list item, in seconds
    #[serde(default = "default_list_pause_secs")]
    pub list_pause_secs: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            policy: TimingPolicyKind::default(),
            secs_per_char: default_secs_per_char(),
            punctuation_pause_secs: default_punctuation_pause_secs(),
            section_pause_secs: default_section_pause_secs(),
            list_pause_secs: default_list_pause_secs(),
        }
    }
}

/// One entry of the pronunciation substitution table
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PronunciationRule {
    /// Term as written in the document
    pub term: String,

    /// Phonetic spelling sent to the engine
    pub spoken: String,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_voice() -> String {
    "en-US-AriaNeural".to_string()
}

fn default_max_chars_per_chunk() -> usize {
    2500
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_edge_timeout_secs() -> u64 {
    // Subprocess synthesis of a full chunk can take a while on slow links
    120
}

fn default_azure_endpoint() -> String {
    "https://eastus.tts.speech.microsoft.com".to_string()
}

fn default_secs_per_char() -> f64 {
    // 0.06 is fast, 0.07 is slow. Aria is usually around 0.065.
    0.065
}

fn default_punctuation_pause_secs() -> f64 {
    0.15
}

fn default_section_pause_secs() -> f64 {
    0.7
}

fn default_list_pause_secs() -> f64 {
    0.4
}

fn default_pronunciation_table() -> Vec<PronunciationRule> {
    let rule = |term: &str, spoken: &str| PronunciationRule {
        term: term.to_string(),
        spoken: spoken.to_string(),
    };

    vec![
        rule("METAR", "mee-tar"),
        rule("TAF", "taff"),
        rule("NOTAM", "no-tam"),
        rule("ATIS", "ay-tiss"),
        rule("AGL", "A G L"),
        rule("MSL", "M S L"),
        rule("VFR", "V F R"),
        rule("IFR", "I F R"),
    ]
}

impl Config {

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate timing constants
        if self.timing.secs_per_char <= 0.0 {
            return Err(anyhow!("secs_per_char must be positive"));
        }
        if self.timing.punctuation_pause_secs < 0.0
            || self.timing.section_pause_secs < 0.0
            || self.timing.list_pause_secs < 0.0
        {
            return Err(anyhow!("Pause durations must not be negative"));
        }

        // Validate substitution table entries
        for rule in &self.pronunciation {
            if rule.term.trim().is_empty() {
                return Err(anyhow!("Pronunciation rule with empty term"));
            }
        }

        // Validate API key for engines that require one
        if self.engine.engine == SpeechEngineKind::Azure {
            let api_key = self.engine.get_api_key();
            if api_key.is_empty() {
                return Err(anyhow!("API key is required for the Azure engine"));
            }
        }

        // Engine-reported timing needs an engine that can report boundaries
        if self.timing.policy == TimingPolicyKind::Engine
            && self.engine.engine == SpeechEngineKind::Azure
        {
            return Err(anyhow!(
                "The Azure engine does not report word boundaries; use the heuristic or hybrid policy"
            ));
        }

        Ok(())
    }

}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            engine: EngineSettings::default(),
            timing: TimingConfig::default(),
            pronunciation: default_pronunciation_table(),
            log_level: LogLevel::default(),
        }
    }
}

impl EngineSettings {
    /// Get the active engine configuration from the available_engines array
    pub fn get_active_engine_config(&self) -> Option<&EngineConfig> {
        let engine_str = self.engine.to_lowercase_string();
        self.available_engines.iter()
            .find(|e| e.engine_type == engine_str)
    }

    /// Get a specific engine configuration by type for testing
    pub fn get_engine_config(&self, engine_type: &SpeechEngineKind) -> Option<&EngineConfig> {
        let engine_str = engine_type.to_lowercase_string();
        self.available_engines.iter()
            .find(|e| e.engine_type == engine_str)
    }

    /// Get the voice for the active engine
    pub fn get_voice(&self) -> String {
        if let Some(engine_config) = self.get_active_engine_config() {
            if !engine_config.voice.is_empty() {
                return engine_config.voice.clone();
            }
        }

        default_voice()
    }

    /// Get the API key for the active engine
    pub fn get_api_key(&self) -> String {
        if let Some(engine_config) = self.get_active_engine_config() {
            if !engine_config.api_key.is_empty() {
                return engine_config.api_key.clone();
            }
        }

        // Default fallback - the edge and mock engines don't use API keys
        String::new()
    }

    /// Get the endpoint for the active engine
    pub fn get_endpoint(&self) -> String {
        if let Some(engine_config) = self.get_active_engine_config() {
            if !engine_config.endpoint.is_empty() {
                return engine_config.endpoint.clone();
            }
        }

        // Default fallback based on engine type
        match self.engine {
            SpeechEngineKind::Azure => default_azure_endpoint(),
            _ => String::new(),
        }
    }

    /// Get the max chars per chunk for the active engine
    pub fn get_max_chars_per_chunk(&self) -> usize {
        if let Some(engine_config) = self.get_active_engine_config() {
            if engine_config.max_chars_per_chunk > 0 {
                return engine_config.max_chars_per_chunk;
            }
        }

        default_max_chars_per_chunk()
    }

    /// Get the timeout for the active engine
    pub fn get_timeout_secs(&self) -> u64 {
        if let Some(engine_config) = self.get_active_engine_config() {
            if engine_config.timeout_secs > 0 {
                return engine_config.timeout_secs;
            }
        }

        // Default fallback based on engine type
        match self.engine {
            SpeechEngineKind::Edge => default_edge_timeout_secs(),
            _ => default_timeout_secs(),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        let mut settings = Self {
            engine: SpeechEngineKind::default(),
            available_engines: Vec::new(),
        };

        // Add default engines
        settings.available_engines.push(EngineConfig::new(SpeechEngineKind::Edge));
        settings.available_engines.push(EngineConfig::new(SpeechEngineKind::Azure));
        settings.available_engines.push(EngineConfig::new(SpeechEngineKind::Mock));

        settings
    }
}
