use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use serde_json::Value;
use tokio::process::Command;

use crate::app_config::EnhanceConfig;
use crate::synthesis::filter_ffmpeg_stderr;

// @module: Talking-avatar video enhancement

/// Basic stream facts needed to take a video apart and rebuild it
#[derive(Debug, Clone, Copy)]
pub struct VideoInfo {
    /// Frames per second
    pub fps: f64,
    /// Total frame count (0 when the container does not report it)
    pub frame_count: u64,
}

/// Frame-by-frame avatar enhancer.
///
/// Frames are extracted with ffmpeg, each one is pushed through an opaque
/// external enhancer command, and the video is rebuilt against the source
/// audio. A frame the enhancer cannot handle falls back to the unenhanced
/// original instead of failing the run.
pub struct AvatarEnhancer {
    /// Enhancer command template with {input} and {output} placeholders
    command: String,
    /// Per-frame timeout
    timeout: Duration,
}

impl AvatarEnhancer {
    /// Create an enhancer from the enhance config section
    pub fn new(config: &EnhanceConfig) -> Result<Self> {
        if config.command.trim().is_empty() {
            return Err(anyhow!(
                "No enhancer command configured; set enhance.command in the config file"
            ));
        }
        Ok(AvatarEnhancer {
            command: config.command.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    /// Enhance a talking-avatar video end to end
    pub async fn enhance_video(&self, input: &Path, output: &Path, work_dir: &Path) -> Result<()> {
        if !input.exists() {
            return Err(anyhow!("Input video does not exist: {:?}", input));
        }

        let info = probe_video_info(input).await?;
        info!(
            "Input video: {:.3} fps, {} frames",
            info.fps, info.frame_count
        );

        // Fresh work dir per run
        if work_dir.exists() {
            std::fs::remove_dir_all(work_dir)
                .with_context(|| format!("Failed to clean work dir: {:?}", work_dir))?;
        }
        let frames_dir = work_dir.join("frames");
        let enhanced_dir = work_dir.join("enhanced");
        std::fs::create_dir_all(&frames_dir)?;
        std::fs::create_dir_all(&enhanced_dir)?;

        let frames = self.extract_frames(input, &frames_dir).await?;
        info!("Extracted {} frames", frames.len());

        self.enhance_frames(&frames, &enhanced_dir).await?;

        self.rebuild_with_audio(&enhanced_dir, input, output, info.fps)
            .await?;
        info!("Wrote enhanced video: {:?}", output);

        Ok(())
    }

    /// Extract all frames of a video to numbered PNGs
    async fn extract_frames(&self, input: &Path, frames_dir: &Path) -> Result<Vec<PathBuf>> {
        let pattern = frames_dir.join("%06d.png");

        let output = Command::new("ffmpeg")
            .args([
                "-y",
                "-hide_banner",
                "-loglevel",
                "error",
                "-i",
                input.to_str().unwrap_or_default(),
                pattern.to_str().unwrap_or_default(),
            ])
            .output()
            .await
            .map_err(|e| anyhow!("Failed to execute ffmpeg for frame extraction: {}", e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "ffmpeg frame extraction failed: {}",
                filter_ffmpeg_stderr(&stderr)
            ));
        }

        let mut frames: Vec<PathBuf> = std::fs::read_dir(frames_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
            .collect();
        frames.sort();

        if frames.is_empty() {
            return Err(anyhow!("No frames extracted from video: {:?}", input));
        }

        Ok(frames)
    }

    /// Run the external enhancer over every frame, falling back to the
    /// original frame when the enhancer fails
    async fn enhance_frames(&self, frames: &[PathBuf], enhanced_dir: &Path) -> Result<()> {
        let progress = ProgressBar::new(frames.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} frames ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let mut fallback_count = 0_usize;
        for frame in frames {
            let file_name = frame
                .file_name()
                .ok_or_else(|| anyhow!("Frame path has no file name: {:?}", frame))?;
            let enhanced_path = enhanced_dir.join(file_name);

            if let Err(e) = self.enhance_frame(frame, &enhanced_path).await {
                debug!("Enhancer failed on {:?}: {}", file_name, e);
                std::fs::copy(frame, &enhanced_path)
                    .with_context(|| format!("Failed to copy fallback frame: {:?}", frame))?;
                fallback_count += 1;
            }

            progress.inc(1);
        }
        progress.finish_and_clear();

        if fallback_count > 0 {
            warn!(
                "Enhancer failed on {}/{} frames; originals used instead",
                fallback_count,
                frames.len()
            );
        }

        Ok(())
    }

    /// Enhance a single frame through the external command
    async fn enhance_frame(&self, input: &Path, output: &Path) -> Result<()> {
        let input_str = input
            .to_str()
            .ok_or_else(|| anyhow!("Non-UTF8 frame path: {:?}", input))?;
        let output_str = output
            .to_str()
            .ok_or_else(|| anyhow!("Non-UTF8 frame path: {:?}", output))?;

        let mut tokens = self.command.split_whitespace();
        let program = tokens
            .next()
            .ok_or_else(|| anyhow!("Empty enhancer command template"))?;
        let args: Vec<String> = tokens
            .map(|token| token.replace("{input}", input_str).replace("{output}", output_str))
            .collect();

        let enhance_future = Command::new(program).args(&args).output();
        let result = tokio::select! {
            result = enhance_future => {
                result.map_err(|e| anyhow!("Failed to execute enhancer command '{}': {}", program, e))?
            },
            _ = tokio::time::sleep(self.timeout) => {
                return Err(anyhow!("Enhancer timed out after {} seconds", self.timeout.as_secs()));
            }
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(anyhow!("Enhancer command failed: {}", stderr.trim()));
        }

        if !output.exists() {
            return Err(anyhow!("Enhancer produced no output frame at {:?}", output));
        }

        Ok(())
    }

    /// Rebuild the video from enhanced frames, muxing the source audio to
    /// keep sync
    async fn rebuild_with_audio(
        &self,
        enhanced_dir: &Path,
        source_video: &Path,
        output: &Path,
        fps: f64,
    ) -> Result<()> {
        let pattern = enhanced_dir.join("%06d.png");

        let result = Command::new("ffmpeg")
            .args([
                "-y",
                "-hide_banner",
                "-loglevel",
                "error",
                "-framerate",
                &fps.to_string(),
                "-i",
                pattern.to_str().unwrap_or_default(),
                "-i",
                source_video.to_str().unwrap_or_default(),
                "-map",
                "0:v:0",
                "-map",
                "1:a:0?",
                "-c:v",
                "libx264",
                "-pix_fmt",
                "yuv420p",
                "-crf",
                "18",
                "-preset",
                "veryfast",
                "-c:a",
                "aac",
                "-shortest",
                output.to_str().unwrap_or_default(),
            ])
            .output()
            .await
            .map_err(|e| anyhow!("Failed to execute ffmpeg for video rebuild: {}", e))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(anyhow!(
                "ffmpeg video rebuild failed: {}",
                filter_ffmpeg_stderr(&stderr)
            ));
        }

        Ok(())
    }
}

/// Probe fps and frame count of a video with ffprobe
pub async fn probe_video_info(video_path: &Path) -> Result<VideoInfo> {
    if !video_path.exists() {
        return Err(anyhow!("Video file not found: {:?}", video_path));
    }

    let ffprobe_future = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_streams",
            "-select_streams",
            "v:0",
            video_path.to_str().unwrap_or(""),
        ])
        .output();

    let timeout_duration = Duration::from_secs(60);
    let output = tokio::select! {
        result = ffprobe_future => {
            result.map_err(|e| anyhow!("Failed to execute ffprobe command: {}", e))?
        },
        _ = tokio::time::sleep(timeout_duration) => {
            return Err(anyhow!("ffprobe command timed out after 60 seconds"));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("ffprobe command failed: {}", stderr));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: Value =
        serde_json::from_str(&stdout).context("Failed to parse ffprobe JSON output")?;

    let stream = json
        .get("streams")
        .and_then(|s| s.as_array())
        .and_then(|streams| streams.first())
        .ok_or_else(|| anyhow!("No video stream found in: {:?}", video_path))?;

    let fps = stream
        .get("r_frame_rate")
        .and_then(|v| v.as_str())
        .and_then(parse_frame_rate)
        .ok_or_else(|| anyhow!("Could not determine frame rate of: {:?}", video_path))?;

    let frame_count = stream
        .get("nb_frames")
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0);

    Ok(VideoInfo { fps, frame_count })
}

/// Parse an ffprobe rational frame rate ("30000/1001" or "25/1")
fn parse_frame_rate(rate: &str) -> Option<f64> {
    let mut parts = rate.splitn(2, '/');
    let numerator: f64 = parts.next()?.trim().parse().ok()?;
    let denominator: f64 = match parts.next() {
        Some(d) => d.trim().parse().ok()?,
        None => 1.0,
    };
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator)
}
