use anyhow::{Context, Result, anyhow};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Directory for generated outputs (SRT, player data)
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Directory holding rendered slide images
    #[serde(default = "default_slides_dir")]
    pub slides_dir: String,

    /// Working directory for per-slide audio files
    #[serde(default = "default_temp_dir")]
    pub temp_dir: String,

    /// Speech synthesis config
    #[serde(default)]
    pub tts: TtsConfig,

    /// Q&A config
    #[serde(default)]
    pub qa: QaConfig,

    /// Avatar enhancement config
    #[serde(default)]
    pub enhance: EnhanceConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            slides_dir: default_slides_dir(),
            temp_dir: default_temp_dir(),
            tts: TtsConfig::default(),
            qa: QaConfig::default(),
            enhance: EnhanceConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

/// Speech synthesis configuration.
///
/// The synthesizer runs an external command per slide; the command template
/// uses `{text}` and `{output}` placeholders. Whatever the command produces
/// is converted to WAV at `sample_rate` Hz mono via ffmpeg so the rest of the
/// pipeline is decoder-agnostic.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TtsConfig {
    /// External TTS command template with {text} and {output} placeholders
    #[serde(default = "default_tts_command")]
    pub command: String,

    /// Output WAV sample rate in Hz
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Per-slide synthesis timeout in seconds
    #[serde(default = "default_tts_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            command: default_tts_command(),
            sample_rate: default_sample_rate(),
            timeout_secs: default_tts_timeout_secs(),
        }
    }
}

/// Q&A provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum QaProvider {
    // @provider: Ollama (local LLM server)
    #[default]
    Ollama,
}

impl QaProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Ollama => "Ollama",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Ollama => "ollama".to_string(),
        }
    }
}

impl std::fmt::Display for QaProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for QaProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Interactive Q&A configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QaConfig {
    /// Q&A provider to use
    #[serde(default)]
    pub provider: QaProvider,

    /// Model name (e.g., "llama3.2:3b", "mistral:7b")
    #[serde(default = "default_qa_model")]
    pub model: String,

    /// Provider endpoint URL
    #[serde(default = "default_qa_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds (local models can take a while on first load)
    #[serde(default = "default_qa_timeout_secs")]
    pub timeout_secs: u64,

    /// Temperature parameter for answer generation
    #[serde(default = "default_qa_temperature")]
    pub temperature: f32,

    /// Top-p sampling parameter
    #[serde(default = "default_qa_top_p")]
    pub top_p: f32,

    /// Maximum tokens per answer, kept short for spoken delivery
    #[serde(default = "default_qa_num_predict")]
    pub num_predict: u32,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff base for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            provider: QaProvider::default(),
            model: default_qa_model(),
            endpoint: default_qa_endpoint(),
            timeout_secs: default_qa_timeout_secs(),
            temperature: default_qa_temperature(),
            top_p: default_qa_top_p(),
            num_predict: default_qa_num_predict(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Avatar video enhancement configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EnhanceConfig {
    /// External per-frame enhancer command template with {input} and {output}
    /// placeholders
    #[serde(default = "default_enhance_command")]
    pub command: String,

    /// Per-frame enhancement timeout in seconds
    #[serde(default = "default_enhance_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            command: default_enhance_command(),
            timeout_secs: default_enhance_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_slides_dir() -> String {
    "slides".to_string()
}

fn default_temp_dir() -> String {
    "temp".to_string()
}

fn default_tts_command() -> String {
    // espeak-ng is a reasonable offline default; any command that accepts the
    // placeholders works (gtts-cli, piper, say, ...)
    "espeak-ng -w {output} {text}".to_string()
}

fn default_sample_rate() -> u32 {
    22_050
}

fn default_tts_timeout_secs() -> u64 {
    120
}

fn default_qa_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_qa_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_qa_timeout_secs() -> u64 {
    60
}

fn default_qa_temperature() -> f32 {
    0.7
}

fn default_qa_top_p() -> f32 {
    0.9
}

fn default_qa_num_predict() -> u32 {
    256
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_enhance_command() -> String {
    String::new()
}

fn default_enhance_timeout_secs() -> u64 {
    60
}

impl LogLevel {
    /// Convert to the log crate's level filter
    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from a file, or fall back to defaults when the file
    /// does not exist
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.output_dir.trim().is_empty() {
            return Err(anyhow!("output_dir must not be empty"));
        }
        if self.temp_dir.trim().is_empty() {
            return Err(anyhow!("temp_dir must not be empty"));
        }

        if self.tts.command.trim().is_empty() {
            return Err(anyhow!("tts.command must not be empty"));
        }
        if !self.tts.command.contains("{output}") {
            return Err(anyhow!("tts.command must contain the {{output}} placeholder"));
        }
        if !self.tts.command.contains("{text}") {
            return Err(anyhow!("tts.command must contain the {{text}} placeholder"));
        }
        if self.tts.sample_rate == 0 {
            return Err(anyhow!("tts.sample_rate must be positive"));
        }

        if self.qa.model.trim().is_empty() {
            return Err(anyhow!("qa.model must not be empty"));
        }
        if self.qa.endpoint.trim().is_empty() {
            return Err(anyhow!("qa.endpoint must not be empty"));
        }
        if !(0.0..=2.0).contains(&self.qa.temperature) {
            return Err(anyhow!(
                "qa.temperature must be between 0.0 and 2.0, got {}",
                self.qa.temperature
            ));
        }

        // Enhancer command is optional, but when set it must carry both
        // placeholders
        if !self.enhance.command.trim().is_empty() {
            if !self.enhance.command.contains("{input}") || !self.enhance.command.contains("{output}") {
                return Err(anyhow!(
                    "enhance.command must contain the {{input}} and {{output}} placeholders"
                ));
            }
        }

        Ok(())
    }
}
