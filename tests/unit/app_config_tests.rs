/*!
 * Tests for app configuration functionality
 */

use anyhow::Result;
use narramd::app_config::{Config, SpeechEngineKind, TimingPolicyKind};

/// Test default configuration values
#[test]
fn test_default_config_withNoInput_shouldHaveSensibleDefaults() {
    let config = Config::default();

    assert_eq!(config.engine.engine, SpeechEngineKind::Edge);
    assert_eq!(config.engine.available_engines.len(), 3);
    assert_eq!(config.engine.get_voice(), "en-US-AriaNeural");
    assert_eq!(config.engine.get_max_chars_per_chunk(), 2500);

    assert_eq!(config.timing.policy, TimingPolicyKind::Heuristic);
    assert!((config.timing.secs_per_char - 0.065).abs() < 1e-9);
    assert!((config.timing.punctuation_pause_secs - 0.15).abs() < 1e-9);

    // The default substitution table covers the aviation acronyms
    assert!(config.pronunciation.iter().any(|r| r.term == "METAR" && r.spoken == "mee-tar"));
}

/// Test serde round trip preserves the active engine and policy
#[test]
fn test_config_serde_withRoundTrip_shouldPreserveFields() -> Result<()> {
    let mut config = Config::default();
    config.engine.engine = SpeechEngineKind::Mock;
    config.timing.policy = TimingPolicyKind::Hybrid;

    let json = serde_json::to_string_pretty(&config)?;
    let parsed: Config = serde_json::from_str(&json)?;

    assert_eq!(parsed.engine.engine, SpeechEngineKind::Mock);
    assert_eq!(parsed.timing.policy, TimingPolicyKind::Hybrid);
    assert_eq!(parsed.pronunciation, config.pronunciation);

    Ok(())
}

/// Test engine identifiers parse from strings
#[test]
fn test_engine_kind_fromStr_withValidNames_shouldParse() {
    assert_eq!("edge".parse::<SpeechEngineKind>().unwrap(), SpeechEngineKind::Edge);
    assert_eq!("Azure".parse::<SpeechEngineKind>().unwrap(), SpeechEngineKind::Azure);
    assert!("espeak".parse::<SpeechEngineKind>().is_err());
}

/// Test validation requires an API key for the Azure engine
#[test]
fn test_validate_withAzureAndNoKey_shouldReject() {
    let mut config = Config::default();
    config.engine.engine = SpeechEngineKind::Azure;

    assert!(config.validate().is_err());

    if let Some(engine_config) = config
        .engine
        .available_engines
        .iter_mut()
        .find(|e| e.engine_type == "azure")
    {
        engine_config.api_key = "subscription-key".to_string();
    }

    assert!(config.validate().is_ok());
}

/// Test validation rejects the engine policy on a boundary-less engine
#[test]
fn test_validate_withEnginePolicyOnAzure_shouldReject() {
    let mut config = Config::default();
    config.engine.engine = SpeechEngineKind::Azure;
    config.timing.policy = TimingPolicyKind::Engine;

    if let Some(engine_config) = config
        .engine
        .available_engines
        .iter_mut()
        .find(|e| e.engine_type == "azure")
    {
        engine_config.api_key = "subscription-key".to_string();
    }

    assert!(config.validate().is_err());
}

/// Test validation rejects broken timing constants
#[test]
fn test_validate_withNonPositiveRate_shouldReject() {
    let mut config = Config::default();
    config.timing.secs_per_char = 0.0;

    assert!(config.validate().is_err());
}

/// Test active engine settings fall back to defaults when the table is empty
#[test]
fn test_engine_settings_withEmptyTable_shouldFallBack() {
    let mut config = Config::default();
    config.engine.available_engines.clear();

    assert_eq!(config.engine.get_voice(), "en-US-AriaNeural");
    assert_eq!(config.engine.get_max_chars_per_chunk(), 2500);
    assert_eq!(config.engine.get_timeout_secs(), 120);
    assert!(config.engine.get_api_key().is_empty());
}
