use std::collections::BTreeMap;
use std::path::Path;
use anyhow::{Context, Result};
use log::{info, warn};
use serde::Deserialize;

use crate::text_processor::TextProcessor;

// @module: Lecture content loading and slide sequencing

/// Raw per-slide record as it appears in a `*_lecture.json` content file.
///
/// `narration_text` is the designated primary field and `slide_text` the
/// fallback; the choice is resolved once at load time into a single
/// normalized narration string. A record missing both fields is an
/// empty-narration slide, not an error.
#[derive(Debug, Deserialize)]
pub struct SlideRecord {
    /// Path to the rendered slide image
    #[serde(default)]
    pub image_path: Option<String>,

    /// Raw extracted slide text (fallback narration source)
    #[serde(default)]
    pub slide_text: Option<String>,

    /// Authored narration text (primary narration source)
    #[serde(default)]
    pub narration_text: Option<String>,
}

/// Top-level shape of a lecture content file
#[derive(Debug, Deserialize)]
pub struct LectureRecord {
    /// Per-slide records, in presentation order
    #[serde(default)]
    pub slides: Vec<SlideRecord>,
}

/// One slide of the generation session.
///
/// `duration` and `start_time` are 0 until audio has been produced and the
/// slide sequence has been timed; both are set once and immutable afterward.
#[derive(Debug, Clone)]
pub struct SlideContent {
    /// 1-based, contiguous slide number
    pub slide_number: usize,

    /// Path to the rendered slide image
    pub image_path: String,

    /// Normalized, synthesis-ready narration text
    pub narration_text: String,

    /// Narration audio duration in seconds (0 until audio generated)
    pub duration: f64,

    /// Cumulative offset of this slide's audio within the full narration
    /// timeline (0 until sequenced)
    pub start_time: f64,
}

impl SlideContent {
    /// Whether this slide has any narration to synthesize
    pub fn has_narration(&self) -> bool {
        !self.narration_text.trim().is_empty()
    }
}

/// Load slides from a lecture content file, resolving the narration fallback
/// and normalizing the text for TTS.
pub fn load_slides<P: AsRef<Path>>(content_file: P) -> Result<Vec<SlideContent>> {
    let content_file = content_file.as_ref();
    let content = std::fs::read_to_string(content_file)
        .with_context(|| format!("Failed to read content file: {:?}", content_file))?;

    let record: LectureRecord = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse content file: {:?}", content_file))?;

    let mut slides = Vec::with_capacity(record.slides.len());
    for (i, slide_record) in record.slides.into_iter().enumerate() {
        let slide_number = i + 1;

        let raw_narration = slide_record
            .narration_text
            .or(slide_record.slide_text)
            .unwrap_or_default();
        if raw_narration.trim().is_empty() {
            warn!("Slide {} has no narration or slide text", slide_number);
        }

        slides.push(SlideContent {
            slide_number,
            image_path: slide_record
                .image_path
                .unwrap_or_else(|| format!("slides/slide_{}.png", slide_number)),
            narration_text: TextProcessor::clean_for_tts(&raw_narration),
            duration: 0.0,
            start_time: 0.0,
        });
    }

    info!("Loaded {} slides from {:?}", slides.len(), content_file);
    Ok(slides)
}

/// Assign cumulative start times across the slide sequence.
///
/// An explicit left-to-right fold: slide i starts at the sum of the durations
/// of slides 1..i-1, with no gaps and no overlap. Slides must already carry
/// their measured durations; returns the per-slide duration map used by the
/// timing core.
pub fn sequence_timings(slides: &mut [SlideContent]) -> BTreeMap<usize, f64> {
    let mut durations = BTreeMap::new();
    let mut cumulative = 0.0_f64;

    for slide in slides.iter_mut() {
        slide.start_time = cumulative;
        cumulative += slide.duration;
        if slide.duration > 0.0 {
            durations.insert(slide.slide_number, slide.duration);
        }
    }

    durations
}
