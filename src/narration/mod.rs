/*!
 * Narration service for converting normalized scripts into audio and
 * synchronized transcripts.
 *
 * This module contains the pipeline between the text normalizer and the
 * output files. It is split into several submodules:
 *
 * - `service`: Core narration functionality and service definition
 * - `chunker`: Sentence-boundary splitting under the engine character budget
 * - `cache`: In-memory caching of synthesis results
 */

// Re-export main types for easier usage
pub use self::cache::SynthesisCache;
pub use self::chunker::split_script_into_chunks;
pub use self::service::{probe_audio_duration, probe_file_duration, NarrationOutput, NarrationService};

// Submodules
pub mod cache;
pub mod chunker;
pub mod service;
