/*!
 * Common test utilities for the narramd test suite
 */

use std::path::PathBuf;
use std::fs;
use anyhow::Result;
use tempfile::TempDir;

use narramd::app_config::{Config, SpeechEngineKind};

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample Markdown document for testing
pub fn create_test_markdown(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    let content = r#"# Weather Briefing

Reading a METAR takes practice.

- Wind comes first.
- Visibility follows.

Altitudes are given AGL unless stated otherwise.
"#;
    create_test_file(dir, filename, content)
}

/// Creates a configuration wired to the mock engine
pub fn mock_config() -> Config {
    let mut config = Config::default();
    config.engine.engine = SpeechEngineKind::Mock;
    config
}

/// Creates a mock-engine configuration with a small chunk budget
pub fn mock_config_with_budget(max_chars_per_chunk: usize) -> Config {
    let mut config = mock_config();
    if let Some(engine_config) = config
        .engine
        .available_engines
        .iter_mut()
        .find(|e| e.engine_type == "mock")
    {
        engine_config.max_chars_per_chunk = max_chars_per_chunk;
    }
    config
}
