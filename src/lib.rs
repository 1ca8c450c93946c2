/*!
 * # narramd - Narrated Markdown
 *
 * A Rust library for converting Markdown documents into narrated audio with
 * a synchronized transcript for karaoke-style text highlighting.
 *
 * ## Features
 *
 * - Normalize Markdown into flat narration text with structural pause spans
 * - Synthesize speech through interchangeable engines:
 *   - Edge TTS (edge-tts command-line client)
 *   - Azure Cognitive Services speech REST endpoint
 * - Pronunciation substitution on the audio-bound text only
 * - Word or sentence timestamps via interchangeable timing policies
 * - Sentence-boundary chunking with measured-duration concatenation
 * - Batch processing of whole directories
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `markdown`: Markdown normalization into narration scripts
 * - `transcript`: Synchronized transcript model and sidecar JSON output
 * - `engine`: Speech synthesis adapters:
 *   - `engine::edge`: edge-tts subprocess engine
 *   - `engine::azure`: Azure speech REST engine
 *   - `engine::mock`: deterministic engine for tests
 * - `timing`: Timestamp estimation policies:
 *   - `timing::heuristic`: character-count word timing
 *   - `timing::engine_reported`: engine word-boundary timing
 *   - `timing::hybrid`: sentence blocks with explicit pauses
 * - `narration`: The synthesis pipeline (service, chunker, cache)
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod engine;
pub mod errors;
pub mod file_utils;
pub mod markdown;
pub mod narration;
pub mod timing;
pub mod transcript;

// Re-export main types for easier usage
pub use app_config::Config;
pub use markdown::{NarrationScript, PauseKind, Span};
pub use narration::NarrationService;
pub use transcript::{Cue, Granularity, Transcript};
pub use errors::{AppError, EngineError, TranscriptError};
