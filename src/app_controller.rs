use anyhow::{Context, Result};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::markdown::NarrationScript;
use crate::narration::NarrationService;

// @module: Application controller for batch narration

/// Main application controller for Markdown narration
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    /// Narrate a single Markdown document into the output directory
    pub async fn run(&self, input_file: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        if !input_file.exists() {
            return Err(anyhow::anyhow!("Input file does not exist: {:?}", input_file));
        }

        FileManager::ensure_dir(&output_dir)?;

        let service = NarrationService::new(&self.config)?;
        self.narrate_file(&service, &input_file, &output_dir, force_overwrite)
            .await?;
        Ok(())
    }

    /// Run the workflow in folder mode, narrating every Markdown file in a
    /// directory in sorted filename order. Files that already have outputs
    /// are skipped unless overwriting is forced; a failing file is logged
    /// and the batch continues with the next one.
    pub async fn run_folder(&self, input_dir: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        let start_time = std::time::Instant::now();

        if !input_dir.exists() {
            return Err(anyhow::anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let markdown_files = FileManager::find_markdown_files(&input_dir)?;

        if markdown_files.is_empty() {
            return Err(anyhow::anyhow!("No Markdown files found in directory: {:?}", input_dir));
        }

        FileManager::ensure_dir(&output_dir)?;

        info!(
            "Narrating {} document(s) with {} ({})",
            markdown_files.len(),
            self.config.engine.engine.display_name(),
            self.config.engine.get_voice()
        );

        let service = NarrationService::new(&self.config)?;

        // Create multi-progress instance for multiple file processing
        let multi_progress = MultiProgress::new();

        let folder_pb = multi_progress.add(ProgressBar::new(markdown_files.len() as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Narrating files");

        // Track success and failure counts
        let mut success_count = 0;
        let mut error_count = 0;
        let mut skip_count = 0;

        for markdown_file in markdown_files.iter() {
            let file_name = markdown_file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            folder_pb.set_message(file_name.clone());

            match self
                .narrate_file(&service, markdown_file, &output_dir, force_overwrite)
                .await
            {
                Ok(true) => success_count += 1,
                Ok(false) => skip_count += 1,
                Err(e) => {
                    // One bad document must not stop the batch
                    error!("Error processing {}: {}", file_name, e);
                    error_count += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_and_clear();

        let (cache_hits, _, cache_rate) = service.cache_stats();
        if cache_hits > 0 {
            info!("Synthesis cache: {} hits ({:.0}% hit rate)", cache_hits, cache_rate * 100.0);
        }

        info!(
            "Finished: {} narrated, {} skipped, {} failed in {}",
            success_count,
            skip_count,
            error_count,
            Self::format_duration(start_time.elapsed())
        );

        Ok(())
    }

    /// Narrate one document. Returns Ok(true) when outputs were written and
    /// Ok(false) when existing outputs were kept.
    async fn narrate_file(
        &self,
        service: &NarrationService,
        input_file: &Path,
        output_dir: &Path,
        force_overwrite: bool,
    ) -> Result<bool> {
        let base = FileManager::output_base_path(input_file, output_dir);
        let audio_path = base.with_extension("mp3");
        let json_path = base.with_extension("json");

        if audio_path.exists() && json_path.exists() && !force_overwrite {
            warn!(
                "Skipping {:?}, outputs already exist (use -f to force overwrite)",
                input_file.file_name().unwrap_or_default()
            );
            return Ok(false);
        }

        info!("Processing {:?}...", input_file.file_name().unwrap_or_default());

        let raw_text = FileManager::read_to_string(input_file)?;
        let title = FileManager::derive_title(input_file);
        let script = NarrationScript::from_markdown(title, &raw_text);

        if script.is_empty() {
            warn!("Document {:?} contains no narratable text, skipping", input_file);
            return Ok(false);
        }

        let audio_file_name = audio_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let output = service.narrate(&script, &audio_file_name).await?;

        FileManager::write_bytes(&audio_path, &output.audio)?;
        output.transcript.write_to_json(&json_path)?;

        info!(
            "Saved {} cues to {}",
            output.transcript.cues.len(),
            json_path.display()
        );

        Ok(true)
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
