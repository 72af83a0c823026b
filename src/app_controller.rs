use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::enhance::AvatarEnhancer;
use crate::file_utils::FileManager;
use crate::lecture_content::{self, SlideContent};
use crate::player;
use crate::qa::QaHandler;
use crate::subtitle_processor::{SubtitleCollection, SubtitleEntry};
use crate::synthesis::{SpeechSynthesizer, wav_duration_secs};
use crate::text_processor::TextProcessor;
use crate::timing;

// @module: Application controller for lecture generation

/// Main application controller for the lecture pipeline
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Resolve the lecture content file: explicit path wins, otherwise the
    /// newest `*_lecture.json` in the working directory
    fn resolve_content_file(&self, content_file: Option<PathBuf>) -> Result<PathBuf> {
        match content_file {
            Some(path) => {
                if !FileManager::file_exists(&path) {
                    return Err(anyhow!("Content file does not exist: {:?}", path));
                }
                Ok(path)
            }
            None => {
                let path = FileManager::find_latest_lecture_json(".")?;
                info!("Using content file: {:?}", path);
                Ok(path)
            }
        }
    }

    /// Run the full generation pipeline: narration audio, subtitle timing,
    /// and player outputs.
    pub async fn run_generate(&self, content_file: Option<PathBuf>) -> Result<()> {
        let content_file = self.resolve_content_file(content_file)?;
        let mut slides = lecture_content::load_slides(&content_file)?;
        if slides.is_empty() {
            return Err(anyhow!("No slides found in {:?}", content_file));
        }

        FileManager::ensure_dir(&self.config.output_dir)?;
        FileManager::ensure_dir(&self.config.temp_dir)?;

        self.synthesize_narration(&mut slides).await?;

        let generated = slides.iter().filter(|s| s.duration > 0.0).count();
        if generated == 0 {
            return Err(anyhow!(
                "No narration audio was generated; check the TTS command"
            ));
        }
        info!("Generated audio for {}/{} slides", generated, slides.len());

        let durations = lecture_content::sequence_timings(&mut slides);

        let (srt, subtitles_by_slide) = self.build_subtitles(&slides);
        let srt_path = Path::new(&self.config.output_dir).join("lecture_subtitles.srt");
        srt.write_to_srt(&srt_path)?;
        info!("Wrote {} subtitle entries to {:?}", srt.entries.len(), srt_path);

        let data_path = Path::new(&self.config.output_dir).join("subtitle_data_synced.js");
        player::write_subtitle_data(&data_path, &subtitles_by_slide)?;
        player::generate_player(&slides, Path::new(&self.config.output_dir))?;

        let total: f64 = durations.values().sum();
        info!(
            "Lecture generation complete: {} slides, {:.1}s total narration",
            slides.len(),
            total
        );

        Ok(())
    }

    /// Synthesize narration audio for every slide that has text, measuring
    /// each resulting WAV's duration.
    ///
    /// Slides are processed sequentially: the synthesizer is an external
    /// command, and running several at once garbles shared audio backends.
    async fn synthesize_narration(&self, slides: &mut [SlideContent]) -> Result<()> {
        let synthesizer = SpeechSynthesizer::new(&self.config.tts);

        let progress = ProgressBar::new(slides.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} slides ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        for slide in slides.iter_mut() {
            if !slide.has_narration() {
                warn!("Skipping slide {}: no narration text", slide.slide_number);
                progress.inc(1);
                continue;
            }

            let wav_path = Path::new(&self.config.temp_dir)
                .join(format!("audio_slide_{}.wav", slide.slide_number));

            synthesizer
                .synthesize_to_wav(&slide.narration_text, &wav_path)
                .await
                .with_context(|| format!("Failed to synthesize slide {}", slide.slide_number))?;

            slide.duration = wav_duration_secs(&wav_path)?;
            info!(
                "Slide {}: {:.2}s of narration",
                slide.slide_number, slide.duration
            );
            progress.inc(1);
        }
        progress.finish_and_clear();

        Ok(())
    }

    /// Build the flat absolute-timed SRT and the per-slide relative subtitle
    /// map from sequenced slides.
    ///
    /// Each slide's narration is split into sentences and every sentence gets
    /// an equal slice of the slide's audio; the SRT shifts those segments by
    /// the slide's cumulative start time so the whole lecture reads as one
    /// continuous transcript.
    fn build_subtitles(
        &self,
        slides: &[SlideContent],
    ) -> (SubtitleCollection, BTreeMap<usize, Vec<timing::SubtitleSegment>>) {
        let mut srt = SubtitleCollection::new(
            Path::new(&self.config.output_dir).join("lecture_subtitles.srt"),
        );
        let mut by_slide: BTreeMap<usize, Vec<timing::SubtitleSegment>> = BTreeMap::new();

        for slide in slides {
            if slide.duration <= 0.0 {
                continue;
            }

            let sentences = TextProcessor::split_into_sentences(&slide.narration_text);
            let segments = timing::allocate(slide.duration, &sentences);
            if segments.is_empty() {
                continue;
            }

            for segment in &segments {
                let start_ms = ((slide.start_time + segment.start_time) * 1000.0).round() as u64;
                let end_ms = ((slide.start_time + segment.end_time) * 1000.0).round() as u64;
                srt.entries.push(SubtitleEntry::new(
                    srt.entries.len() + 1,
                    start_ms,
                    end_ms,
                    segment.text.clone(),
                ));
            }

            by_slide.insert(slide.slide_number, segments);
        }

        (srt, by_slide)
    }

    /// Re-synchronize an externally produced transcript against the per-slide
    /// audio actually on disk.
    ///
    /// The transcript's absolute cue times are re-binned into per-slide
    /// windows derived from the measured WAV durations, then written as the
    /// player's subtitle data.
    pub async fn run_sync(&self, srt_file: Option<PathBuf>) -> Result<()> {
        let audio_files = FileManager::find_slide_audio_files(&self.config.temp_dir)?;
        if audio_files.is_empty() {
            return Err(anyhow!(
                "No audio files found in {:?}; run generation first",
                self.config.temp_dir
            ));
        }

        let mut durations: BTreeMap<usize, f64> = BTreeMap::new();
        for (slide_number, path) in &audio_files {
            durations.insert(*slide_number, wav_duration_secs(path)?);
        }
        info!("Measured {} audio files", durations.len());

        let srt_path = srt_file.unwrap_or_else(|| {
            Path::new(&self.config.output_dir).join("lecture_subtitles.srt")
        });
        let collection = SubtitleCollection::from_srt_file(&srt_path)?;
        if collection.entries.is_empty() {
            return Err(anyhow!("No subtitle entries found in {:?}", srt_path));
        }

        let cues = collection.to_cues();
        let by_slide = timing::rebin(&cues, &durations);

        let assigned: usize = by_slide.values().map(Vec::len).sum();
        if assigned < cues.len() {
            warn!(
                "{} of {} cues fell outside all slide windows and were dropped",
                cues.len() - assigned,
                cues.len()
            );
        }

        let data_path = Path::new(&self.config.output_dir).join("subtitle_data_synced.js");
        player::write_subtitle_data(&data_path, &by_slide)?;
        info!(
            "Synchronized {} cues across {} slides",
            assigned,
            by_slide.len()
        );

        Ok(())
    }

    /// Enhance a talking-avatar video frame by frame
    pub async fn run_enhance(&self, input: PathBuf, output: Option<PathBuf>) -> Result<()> {
        let output = output.unwrap_or_else(|| {
            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "avatar".to_string());
            Path::new(&self.config.output_dir).join(format!("{}_enhanced.mp4", stem))
        });

        let enhancer = AvatarEnhancer::new(&self.config.enhance)?;
        let work_dir = Path::new(&self.config.temp_dir).join("enhance_work");
        enhancer.enhance_video(&input, &output, &work_dir).await
    }

    /// Answer a single question, optionally speaking the answer
    pub async fn run_qa_single(
        &self,
        question: &str,
        content_file: Option<PathBuf>,
        current_slide: Option<usize>,
        speak: bool,
    ) -> Result<()> {
        let mut handler = QaHandler::new(&self.config);
        if let Ok(path) = self.resolve_content_file(content_file) {
            handler.load_lecture_context(&path)?;
        } else {
            warn!("No lecture content found; answering without lecture context");
        }

        let synthesizer = if speak {
            Some(SpeechSynthesizer::new(&self.config.tts))
        } else {
            None
        };

        let response = handler
            .ask_and_respond(question, current_slide, synthesizer.as_ref())
            .await?;

        println!("{}", response.answer);
        if let Some(audio) = response.audio_path {
            info!("Spoken answer written to {:?}", audio);
        }

        Ok(())
    }

    /// Interactive Q&A loop on stdin.
    ///
    /// Reads one question per line until EOF or an empty line.
    pub async fn run_qa_interactive(
        &self,
        content_file: Option<PathBuf>,
        speak: bool,
    ) -> Result<()> {
        let mut handler = QaHandler::new(&self.config);
        if let Ok(path) = self.resolve_content_file(content_file) {
            handler.load_lecture_context(&path)?;
        } else {
            warn!("No lecture content found; answering without lecture context");
        }

        let status = handler.check_status().await;
        if !status.available {
            return Err(anyhow!("{}", status.message));
        }
        println!("{}", status.message);
        println!("Ask a question (empty line to quit):");

        let synthesizer = if speak {
            Some(SpeechSynthesizer::new(&self.config.tts))
        } else {
            None
        };

        let stdin = std::io::stdin();
        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }
            let question = line.trim();
            if question.is_empty() {
                break;
            }

            match handler
                .ask_and_respond(question, None, synthesizer.as_ref())
                .await
            {
                Ok(response) => println!("{}\n", response.answer),
                Err(e) => eprintln!("Could not answer: {}\n", e),
            }
        }

        Ok(())
    }
}
