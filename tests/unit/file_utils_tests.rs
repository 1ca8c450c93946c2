/*!
 * Tests for file and folder utilities
 */

use anyhow::Result;
use std::path::PathBuf;
use narramd::file_utils::FileManager;
use crate::common;

/// Test Markdown discovery: sorted, case-insensitive extension, non-recursive
#[test]
fn test_find_markdown_files_withMixedDirectory_shouldReturnSortedMarkdownOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    common::create_test_file(&dir, "b_second.md", "# B")?;
    common::create_test_file(&dir, "a_first.MD", "# A")?;
    common::create_test_file(&dir, "notes.txt", "not markdown")?;

    let nested = dir.join("nested");
    std::fs::create_dir(&nested)?;
    common::create_test_file(&nested, "deep.md", "# Deep")?;

    let files = FileManager::find_markdown_files(&dir)?;

    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["a_first.MD".to_string(), "b_second.md".to_string()]);

    Ok(())
}

/// Test output base path derivation
#[test]
fn test_output_base_path_withDocument_shouldJoinStem() {
    let base = FileManager::output_base_path("docs/chapter1.md", "docs/audio");

    assert_eq!(base, PathBuf::from("docs/audio/chapter1"));
    assert_eq!(base.with_extension("mp3"), PathBuf::from("docs/audio/chapter1.mp3"));
    assert_eq!(base.with_extension("json"), PathBuf::from("docs/audio/chapter1.json"));
}

/// Test title derivation from the source filename
#[test]
fn test_derive_title_withDocumentPath_shouldUseStem() {
    assert_eq!(FileManager::derive_title("docs/03_weather_basics.md"), "03_weather_basics");
}

/// Test byte writing creates parent directories
#[test]
fn test_write_bytes_withMissingParents_shouldCreateThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("a").join("b").join("out.bin");

    FileManager::write_bytes(&target, &[1, 2, 3])?;

    assert!(FileManager::file_exists(&target));
    assert_eq!(std::fs::read(&target)?, vec![1, 2, 3]);

    Ok(())
}
