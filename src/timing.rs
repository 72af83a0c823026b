use std::collections::BTreeMap;
use log::debug;

// @module: Subtitle timing allocation and transcript re-binning

/// One timed subtitle segment, in seconds.
///
/// Times are relative to a slide's own start when produced by `allocate` or
/// `rebin`, and absolute when shifted by the caller for flat SRT output.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleSegment {
    // @field: Segment text
    pub text: String,

    // @field: Start time in seconds
    pub start_time: f64,

    // @field: End time in seconds
    pub end_time: f64,
}

impl SubtitleSegment {
    /// Create a new subtitle segment
    pub fn new(text: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        SubtitleSegment {
            text: text.into(),
            start_time,
            end_time,
        }
    }

    /// Duration of this segment in seconds
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// Absolute `[start, end)` interval within the concatenated narration timeline
/// during which one slide's audio plays.
///
/// Ephemeral: computed once per re-bin operation from the duration sequence,
/// never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideBoundary {
    /// 1-based slide number
    pub slide_number: usize,

    /// Absolute start in seconds
    pub start: f64,

    /// Absolute end in seconds (exclusive)
    pub end: f64,
}

impl SlideBoundary {
    /// Whether an absolute timestamp falls inside this boundary.
    /// Half-open semantics: a time exactly at `start` belongs to this slide,
    /// a time exactly at `end` does not.
    pub fn contains(&self, time: f64) -> bool {
        self.start <= time && time < self.end
    }
}

/// One timed caption entry from an externally produced transcript,
/// with absolute start/end timestamps in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    /// Absolute start in seconds
    pub start: f64,

    /// Absolute end in seconds
    pub end: f64,

    /// Caption text
    pub text: String,
}

impl Cue {
    /// Create a new cue
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Cue {
            start,
            end,
            text: text.into(),
        }
    }
}

/// Assign each sentence an equal slice of a slide's narration audio.
///
/// Uniform proportional allocation: no weighting by sentence length or
/// estimated speech rate. Segment i covers
/// `[i * total/n, (i+1) * total/n)`, with the final end time set to
/// `total_duration` exactly rather than accumulated, so the segments
/// partition the full duration without rounding drift.
///
/// An empty sentence list yields an empty result. A zero duration with
/// sentences yields zero-width segments, not an error.
pub fn allocate(total_duration: f64, sentences: &[String]) -> Vec<SubtitleSegment> {
    if sentences.is_empty() {
        return Vec::new();
    }

    let count = sentences.len();
    let slice_duration = total_duration / count as f64;

    sentences
        .iter()
        .enumerate()
        .map(|(i, sentence)| {
            let start_time = i as f64 * slice_duration;
            let end_time = if i + 1 == count {
                total_duration
            } else {
                (i + 1) as f64 * slice_duration
            };
            SubtitleSegment::new(sentence.trim(), start_time, end_time)
        })
        .collect()
}

/// Build the absolute slide boundary list from per-slide audio durations.
///
/// Boundaries are a cumulative partition of the full timeline, computed as a
/// fold over slide numbers in ascending numeric order: slide n starts where
/// slide n-1 ended, with no gaps or overlap. The BTreeMap key order gives the
/// ascending iteration structurally, regardless of how the durations were
/// collected.
pub fn compute_boundaries(slide_durations: &BTreeMap<usize, f64>) -> Vec<SlideBoundary> {
    let mut boundaries = Vec::with_capacity(slide_durations.len());
    let mut cumulative = 0.0_f64;

    for (&slide_number, &duration) in slide_durations {
        boundaries.push(SlideBoundary {
            slide_number,
            start: cumulative,
            end: cumulative + duration,
        });
        cumulative += duration;
    }

    boundaries
}

/// Reassign absolute-timed transcript cues to slides, converting their
/// timestamps to be relative to the owning slide's start.
///
/// Each cue goes to the first boundary (ascending slide-number order) whose
/// half-open `[start, end)` interval contains the cue's start time. Cues
/// starting at or beyond the final boundary's end are dropped: the transcript
/// and the audio pipeline measure durations independently, and a mismatched
/// total routinely pushes trailing cues past the last interval. Dropping them
/// is the documented behavior, not a failure.
///
/// Encounter order of cues is preserved within each slide; no re-sorting.
/// Slides that receive no cues are absent from the result.
pub fn rebin(
    cues: &[Cue],
    slide_durations: &BTreeMap<usize, f64>,
) -> BTreeMap<usize, Vec<SubtitleSegment>> {
    let boundaries = compute_boundaries(slide_durations);
    let mut by_slide: BTreeMap<usize, Vec<SubtitleSegment>> = BTreeMap::new();

    for cue in cues {
        match boundaries.iter().find(|b| b.contains(cue.start)) {
            Some(boundary) => {
                by_slide
                    .entry(boundary.slide_number)
                    .or_default()
                    .push(SubtitleSegment::new(
                        cue.text.clone(),
                        cue.start - boundary.start,
                        cue.end - boundary.start,
                    ));
            }
            None => {
                debug!(
                    "Dropping cue at {:.3}s outside all slide boundaries: {}",
                    cue.start, cue.text
                );
            }
        }
    }

    by_slide
}
