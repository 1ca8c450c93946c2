/*!
 * Error types for the narramd application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when working with speech synthesis engines
#[derive(Error, Debug)]
pub enum EngineError {
    /// Error when making a synthesis request fails
    #[error("Synthesis request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an engine response fails
    #[error("Failed to parse engine response: {0}")]
    ParseError(String),

    /// Error returned by the remote API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error spawning or running an engine subprocess
    #[error("Engine process error: {0}")]
    ProcessFailed(String),

    /// Error when a synthesis call exceeds its time budget
    #[error("Synthesis timed out: {0}")]
    Timeout(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The engine produced no audio bytes for the given text
    #[error("Engine produced no audio for chunk")]
    EmptyAudio,
}

/// Errors that can occur when assembling a transcript
#[derive(Error, Debug)]
pub enum TranscriptError {
    /// Cue times went backwards
    #[error("Non-monotonic cue at index {index}: {detail}")]
    NonMonotonic {
        /// Index of the offending cue
        index: usize,
        /// Human-readable description of the violation
        detail: String
    },

    /// No cues were produced for a non-empty document
    #[error("Transcript has no cues")]
    Empty,
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a synthesis engine
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Error from transcript assembly
    #[error("Transcript error: {0}")]
    Transcript(#[from] TranscriptError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
