/*!
 * Error types for the lectern application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error when the requested model is not available on the server
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),
}

/// Errors that can occur during subtitle processing
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// Error when a cue has a non-positive time range
    #[error("Invalid time range: end time {end_ms} <= start time {start_ms}")]
    InvalidTimeRange {
        /// Start time in milliseconds
        start_ms: u64,
        /// End time in milliseconds
        end_ms: u64,
    },

    /// Error when a cue has no text
    #[error("Empty subtitle text for entry {0}")]
    EmptyText(usize),

    /// Error when no entries could be parsed at all
    #[error("No valid subtitle entries found")]
    NoEntries,
}

/// Errors that can occur during speech synthesis
#[derive(Error, Debug)]
pub enum SynthesisError {
    /// Error when the text to synthesize is empty
    #[error("Empty text for speech synthesis")]
    EmptyText,

    /// Error when the external TTS command fails
    #[error("TTS command failed: {0}")]
    CommandFailed(String),

    /// Error when decoding the produced audio file
    #[error("Failed to decode audio file: {0}")]
    DecodeError(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from speech synthesis
    #[error("Synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),

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
