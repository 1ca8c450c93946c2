// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::{Config, SpeechEngineKind, TimingPolicyKind};
use app_controller::Controller;

mod app_config;
mod app_controller;
mod engine;
mod errors;
mod file_utils;
mod markdown;
mod narration;
mod timing;
mod transcript;

/// CLI Wrapper for SpeechEngineKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliSpeechEngine {
    Edge,
    Azure,
    Mock,
}

impl From<CliSpeechEngine> for SpeechEngineKind {
    fn from(cli_engine: CliSpeechEngine) -> Self {
        match cli_engine {
            CliSpeechEngine::Edge => SpeechEngineKind::Edge,
            CliSpeechEngine::Azure => SpeechEngineKind::Azure,
            CliSpeechEngine::Mock => SpeechEngineKind::Mock,
        }
    }
}

/// CLI Wrapper for TimingPolicyKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTimingPolicy {
    Heuristic,
    Engine,
    Hybrid,
}

impl From<CliTimingPolicy> for TimingPolicyKind {
    fn from(cli_policy: CliTimingPolicy) -> Self {
        match cli_policy {
            CliTimingPolicy::Heuristic => TimingPolicyKind::Heuristic,
            CliTimingPolicy::Engine => TimingPolicyKind::Engine,
            CliTimingPolicy::Hybrid => TimingPolicyKind::Hybrid,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Narrate Markdown documents into audio plus synced transcripts (default command)
    #[command(alias = "narrate")]
    Narrate(NarrateArgs),

    /// Generate shell completions for narramd
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct NarrateArgs {
    /// Input Markdown file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output directory for audio and transcript files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Speech engine to use
    #[arg(short, long, value_enum)]
    engine: Option<CliSpeechEngine>,

    /// Voice identifier (e.g. 'en-US-AriaNeural')
    #[arg(short, long)]
    voice: Option<String>,

    /// Timestamp estimation policy
    #[arg(short, long, value_enum)]
    policy: Option<CliTimingPolicy>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// narramd - Narrated Markdown
///
/// Converts Markdown documents into narrated audio with a synchronized JSON
/// transcript for karaoke-style text highlighting.
#[derive(Parser, Debug)]
#[command(name = "narramd")]
#[command(version = "1.0.0")]
#[command(about = "Markdown narration with synced transcripts")]
#[command(long_about = "narramd reads Markdown documents and produces an MP3 narration plus a JSON
transcript of word or sentence timestamps for each one.

EXAMPLES:
    narramd docs/                         # Narrate every Markdown file in docs/
    narramd -f docs/                      # Force overwrite existing outputs
    narramd -e azure -v en-US-JennyNeural docs/   # Use a specific engine and voice
    narramd -p hybrid chapter.md          # Sentence-level transcript with pauses
    narramd -o site/audio docs/           # Write outputs to a specific directory
    narramd --log-level debug docs/       # Verbose logging
    narramd completions bash > narramd.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED ENGINES:
    edge   - Edge neural voices via the edge-tts command-line client (default)
    azure  - Azure Cognitive Services speech REST endpoint (requires API key)
    mock   - Deterministic offline engine for tests")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input Markdown file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output directory for audio and transcript files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Speech engine to use
    #[arg(short, long, value_enum)]
    engine: Option<CliSpeechEngine>,

    /// Voice identifier (e.g. 'en-US-AriaNeural')
    #[arg(short, long)]
    voice: Option<String>,

    /// Timestamp estimation policy
    #[arg(short, long, value_enum)]
    policy: Option<CliTimingPolicy>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");

            let color = match record.level() {
                Level::Error => "\x1B[1;31m",
                Level::Warn => "\x1B[1;33m",
                Level::Info => "\x1B[1;32m",
                Level::Debug => "\x1B[1;36m",
                Level::Trace => "\x1B[1;35m",
            };

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "narramd", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Narrate(args)) => run_narrate(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            let narrate_args = NarrateArgs {
                input_path,
                output_dir: cli.output_dir,
                force_overwrite: cli.force_overwrite,
                engine: cli.engine,
                voice: cli.voice,
                policy: cli.policy,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_narrate(narrate_args).await
        }
    }
}

async fn run_narrate(options: NarrateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        // Override config with CLI options if provided
        if let Some(engine) = &options.engine {
            config.engine.engine = engine.clone().into();
        }

        if let Some(voice) = &options.voice {
            // Find the engine config and update the voice
            let engine_str = config.engine.engine.to_lowercase_string();
            if let Some(engine_config) = config.engine.available_engines.iter_mut()
                .find(|e| e.engine_type == engine_str) {
                engine_config.voice = voice.clone();
            }
        }

        if let Some(policy) = &options.policy {
            config.timing.policy = policy.clone().into();
        }

        // Update log level in config if specified via command line
        if let Some(log_level) = &options.log_level {
            config.log_level = log_level.clone().into();
        }

        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let mut config = Config::default();

        if let Some(engine) = &options.engine {
            config.engine.engine = engine.clone().into();
        }

        if let Some(policy) = &options.policy {
            config.timing.policy = policy.clone().into();
        }

        // Apply command line log level to default config if specified
        if let Some(log_level) = &options.log_level {
            config.log_level = log_level.clone().into();
        }

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Validate the configuration after loading and overriding
    config.validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    // Create controller
    let controller = Controller::with_config(config)?;

    // Run the controller with the input file(s) and output directory
    if options.input_path.is_file() {
        // Process a single file; outputs default next to the source
        let output_dir = options.output_dir.clone().unwrap_or_else(|| {
            options
                .input_path
                .parent()
                .unwrap_or(Path::new("."))
                .join("audio")
        });
        controller
            .run(options.input_path.clone(), output_dir, options.force_overwrite)
            .await
    } else if options.input_path.is_dir() {
        // Process a directory
        let output_dir = options
            .output_dir
            .clone()
            .unwrap_or_else(|| options.input_path.join("audio"));
        controller
            .run_folder(options.input_path.clone(), output_dir, options.force_overwrite)
            .await
    } else {
        Err(anyhow!("Input path does not exist: {:?}", options.input_path))
    }
}
