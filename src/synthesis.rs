use std::path::Path;
use std::time::Duration;
use anyhow::{Context, Result, anyhow};
use log::{debug, error};
use tokio::process::Command;

use crate::app_config::TtsConfig;
use crate::errors::SynthesisError;

// @module: Speech synthesis boundary and audio duration probing

/// Runs an external text-to-speech command per slide and normalizes its
/// output to mono WAV at a fixed sample rate.
///
/// The command template carries `{text}` and `{output}` placeholders; the
/// pipeline only ever sees the normalized WAV, so any synthesizer that can
/// write an audio file is interchangeable.
pub struct SpeechSynthesizer {
    /// Command template with {text} and {output} placeholders
    command: String,
    /// Target WAV sample rate in Hz
    sample_rate: u32,
    /// Per-invocation timeout
    timeout: Duration,
}

impl SpeechSynthesizer {
    /// Create a synthesizer from the TTS config section
    pub fn new(config: &TtsConfig) -> Self {
        SpeechSynthesizer {
            command: config.command.clone(),
            sample_rate: config.sample_rate,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Synthesize narration text to a WAV file.
    ///
    /// The external command writes to an intermediate file which is then
    /// converted to mono WAV at the configured sample rate with ffmpeg, so
    /// the duration probe downstream reads a uniform format.
    pub async fn synthesize_to_wav(&self, text: &str, wav_path: &Path) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SynthesisError::EmptyText.into());
        }

        if let Some(parent) = wav_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let raw_path = wav_path.with_extension("raw.wav");
        let raw_path_str = raw_path
            .to_str()
            .ok_or_else(|| anyhow!("Non-UTF8 audio path: {:?}", raw_path))?;

        // Template tokens are split on whitespace; a token equal to {text}
        // becomes a single argument carrying the whole narration string.
        let mut tokens = self.command.split_whitespace();
        let program = tokens
            .next()
            .ok_or_else(|| anyhow!("Empty TTS command template"))?;
        let args: Vec<String> = tokens
            .map(|token| {
                if token == "{text}" {
                    text.to_string()
                } else {
                    token
                        .replace("{output}", raw_path_str)
                        .replace("{text}", text)
                }
            })
            .collect();

        debug!("Running TTS command: {} ({} chars)", program, text.len());

        let tts_future = Command::new(program).args(&args).output();
        let result = tokio::select! {
            result = tts_future => {
                result.map_err(|e| anyhow!("Failed to execute TTS command '{}': {}", program, e))?
            },
            _ = tokio::time::sleep(self.timeout) => {
                return Err(anyhow!("TTS command timed out after {} seconds", self.timeout.as_secs()));
            }
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            error!("TTS synthesis failed: {}", stderr.trim());
            return Err(SynthesisError::CommandFailed(stderr.trim().to_string()).into());
        }

        if !raw_path.exists() {
            return Err(anyhow!(
                "TTS command reported success but produced no file at {:?}",
                raw_path
            ));
        }

        self.convert_to_wav(&raw_path, wav_path).await?;
        let _ = std::fs::remove_file(&raw_path);

        Ok(())
    }

    /// Convert the synthesizer's raw output to mono WAV at the target sample
    /// rate
    async fn convert_to_wav(&self, input: &Path, output: &Path) -> Result<()> {
        let ffmpeg_future = Command::new("ffmpeg")
            .args([
                "-y",
                "-i",
                input.to_str().unwrap_or_default(),
                "-ar",
                &self.sample_rate.to_string(),
                "-ac",
                "1",
                output.to_str().unwrap_or_default(),
            ])
            .output();

        let result = tokio::select! {
            result = ffmpeg_future => {
                result.map_err(|e| anyhow!("Failed to execute ffmpeg for WAV conversion: {}", e))?
            },
            _ = tokio::time::sleep(self.timeout) => {
                return Err(anyhow!("ffmpeg conversion timed out after {} seconds", self.timeout.as_secs()));
            }
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let filtered = filter_ffmpeg_stderr(&stderr);
            error!("WAV conversion failed: {}", filtered);
            return Err(anyhow!("ffmpeg conversion failed: {}", filtered));
        }

        Ok(())
    }
}

/// Measure a WAV file's duration in seconds: sample count per channel
/// divided by sample rate.
pub fn wav_duration_secs<P: AsRef<Path>>(path: P) -> Result<f64> {
    let path = path.as_ref();
    let reader = hound::WavReader::open(path)
        .map_err(|e| SynthesisError::DecodeError(format!("{:?}: {}", path, e)))?;

    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return Err(
            SynthesisError::DecodeError(format!("zero sample rate in {:?}", path)).into(),
        );
    }

    Ok(reader.duration() as f64 / spec.sample_rate as f64)
}

/// Filter ffmpeg stderr to only show meaningful error lines, stripping the
/// version banner, build configuration, and stream metadata noise.
pub fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let dominated_prefixes = [
        "ffmpeg version",
        "  built with",
        "  configuration:",
        "  lib",
        "Input #",
        "  Metadata:",
        "  Duration:",
        "  Stream #",
        "Output #",
        "Stream mapping:",
        "Press [q]",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return false;
            }
            !dominated_prefixes.iter().any(|p| line.starts_with(p))
        })
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
