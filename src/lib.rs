/*!
 * # Lectern - Narrated slide-deck lecture generator
 *
 * A Rust library for turning slide content into a narrated, subtitled
 * lecture.
 *
 * ## Features
 *
 * - Synthesize per-slide narration with an external TTS command
 * - Allocate subtitle timing uniformly across each slide's sentences
 * - Re-bin externally produced SRT transcripts into per-slide windows
 * - Answer student questions with a local LLM (Ollama)
 * - Enhance talking-avatar videos frame by frame
 * - Generate a standalone HTML lecture player
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `lecture_content`: Lecture content loading and slide sequencing
 * - `text_processor`: Narration normalization and sentence splitting
 * - `timing`: Subtitle timing allocation and transcript re-binning
 * - `subtitle_processor`: SRT parsing and serialization
 * - `synthesis`: External TTS boundary and audio duration probing
 * - `providers`: Client implementations for LLM providers:
 *   - `providers::ollama`: Ollama API client
 * - `qa`: Interactive lecture Q&A
 * - `enhance`: Avatar video enhancement
 * - `player`: Browser player output generation
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod enhance;
pub mod errors;
pub mod file_utils;
pub mod lecture_content;
pub mod player;
pub mod providers;
pub mod qa;
pub mod subtitle_processor;
pub mod synthesis;
pub mod text_processor;
pub mod timing;

// Re-export main types for easier usage
pub use app_config::Config;
pub use lecture_content::SlideContent;
pub use subtitle_processor::{SubtitleCollection, SubtitleEntry};
pub use timing::{Cue, SlideBoundary, SubtitleSegment};
