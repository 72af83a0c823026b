/*!
 * Tests for subtitle timing allocation and transcript re-binning
 */

use std::collections::BTreeMap;
use lectern::timing::{Cue, allocate, compute_boundaries, rebin};

fn sentences(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|s| s.to_string()).collect()
}

/// Test uniform slice allocation across sentences
#[test]
fn test_allocate_withThreeSentences_shouldSliceUniformly() {
    let segments = allocate(9.0, &sentences(&["One.", "Two.", "Three."]));

    assert_eq!(segments.len(), 3);
    for segment in &segments {
        assert!((segment.duration() - 3.0).abs() < 1e-9);
    }
    assert_eq!(segments[0].start_time, 0.0);
    assert_eq!(segments[1].start_time, 3.0);
    assert_eq!(segments[2].start_time, 6.0);
}

/// Test that the final segment ends exactly at the total duration
#[test]
fn test_allocate_withAwkwardDivision_shouldEndExactlyAtTotal() {
    let segments = allocate(10.0, &sentences(&["A.", "B.", "C."]));

    assert_eq!(segments.last().map(|s| s.end_time), Some(10.0));
}

/// Test that consecutive segments are contiguous
#[test]
fn test_allocate_withManySentences_shouldBeContiguous() {
    let segments = allocate(7.3, &sentences(&["A.", "B.", "C.", "D.", "E."]));

    for pair in segments.windows(2) {
        assert_eq!(pair[0].end_time, pair[1].start_time);
    }
}

/// Test zero-duration allocation yields zero-width segments, not an error
#[test]
fn test_allocate_withZeroDuration_shouldYieldZeroWidthSegments() {
    let segments = allocate(0.0, &sentences(&["Only sentence."]));

    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].start_time, 0.0);
    assert_eq!(segments[0].end_time, 0.0);
}

/// Test empty sentence list yields no segments
#[test]
fn test_allocate_withNoSentences_shouldReturnEmpty() {
    let segments = allocate(10.0, &[]);
    assert!(segments.is_empty());
}

/// Test that segment text is trimmed
#[test]
fn test_allocate_withPaddedSentences_shouldTrimText() {
    let segments = allocate(2.0, &sentences(&["  Padded.  "]));
    assert_eq!(segments[0].text, "Padded.");
}

/// Test cumulative boundary computation
#[test]
fn test_compute_boundaries_withThreeSlides_shouldAccumulate() {
    let mut durations = BTreeMap::new();
    durations.insert(1, 3.0);
    durations.insert(2, 4.0);
    durations.insert(3, 2.0);

    let boundaries = compute_boundaries(&durations);

    assert_eq!(boundaries.len(), 3);
    assert_eq!(boundaries[0].start, 0.0);
    assert_eq!(boundaries[0].end, 3.0);
    assert_eq!(boundaries[1].start, 3.0);
    assert_eq!(boundaries[1].end, 7.0);
    assert_eq!(boundaries[2].start, 7.0);
    assert_eq!(boundaries[2].end, 9.0);
}

/// Test that a cue starting exactly on a boundary belongs to the later slide
#[test]
fn test_rebin_withCueOnBoundary_shouldAssignToLaterSlide() {
    let mut durations = BTreeMap::new();
    durations.insert(1, 5.0);
    durations.insert(2, 5.0);

    let cues = vec![Cue::new(5.0, 6.0, "On the line")];
    let by_slide = rebin(&cues, &durations);

    assert!(!by_slide.contains_key(&1));
    let slide2 = by_slide.get(&2).expect("cue should land on slide 2");
    assert_eq!(slide2.len(), 1);
    assert_eq!(slide2[0].start_time, 0.0);
}

/// Test that cue times become relative to the owning slide's start
#[test]
fn test_rebin_withMidSlideCue_shouldShiftToRelativeTime() {
    let mut durations = BTreeMap::new();
    durations.insert(1, 5.0);
    durations.insert(2, 5.0);

    let cues = vec![Cue::new(7.5, 8.5, "Second slide cue")];
    let by_slide = rebin(&cues, &durations);

    let slide2 = by_slide.get(&2).expect("cue should land on slide 2");
    assert_eq!(slide2[0].start_time, 2.5);
    assert_eq!(slide2[0].end_time, 3.5);
}

/// Test that cues starting past the final boundary are dropped
#[test]
fn test_rebin_withCueBeyondTimeline_shouldDropCue() {
    let mut durations = BTreeMap::new();
    durations.insert(1, 4.0);

    let cues = vec![
        Cue::new(1.0, 2.0, "Inside"),
        Cue::new(4.0, 5.0, "Exactly at the end"),
        Cue::new(10.0, 11.0, "Far outside"),
    ];
    let by_slide = rebin(&cues, &durations);

    let total: usize = by_slide.values().map(Vec::len).sum();
    assert_eq!(total, 1);
    assert_eq!(by_slide.get(&1).map(Vec::len), Some(1));
}

/// Test that boundary order follows slide numbers regardless of insertion order
#[test]
fn test_rebin_withUnorderedInsertion_shouldFollowSlideNumberOrder() {
    let mut durations = BTreeMap::new();
    durations.insert(3, 2.0);
    durations.insert(1, 3.0);
    durations.insert(2, 4.0);

    let boundaries = compute_boundaries(&durations);
    assert_eq!(boundaries[0].slide_number, 1);
    assert_eq!(boundaries[1].slide_number, 2);
    assert_eq!(boundaries[2].slide_number, 3);

    // A cue at 8s falls into slide 3's [7, 9) window
    let cues = vec![Cue::new(8.0, 8.5, "Late cue")];
    let by_slide = rebin(&cues, &durations);
    assert!(by_slide.contains_key(&3));
}

/// Test that cue encounter order is preserved within a slide
#[test]
fn test_rebin_withMultipleCuesPerSlide_shouldPreserveOrder() {
    let mut durations = BTreeMap::new();
    durations.insert(1, 10.0);

    let cues = vec![
        Cue::new(4.0, 5.0, "Second"),
        Cue::new(1.0, 2.0, "First in input order"),
    ];
    let by_slide = rebin(&cues, &durations);

    let slide1 = by_slide.get(&1).expect("both cues land on slide 1");
    assert_eq!(slide1[0].text, "Second");
    assert_eq!(slide1[1].text, "First in input order");
}

/// Test that re-binning the same input twice gives identical results
#[test]
fn test_rebin_withSameInput_shouldBeDeterministic() {
    let mut durations = BTreeMap::new();
    durations.insert(1, 3.0);
    durations.insert(2, 4.0);

    let cues = vec![
        Cue::new(0.5, 1.0, "A"),
        Cue::new(3.5, 4.0, "B"),
        Cue::new(6.9, 7.2, "C"),
    ];

    let first = rebin(&cues, &durations);
    let second = rebin(&cues, &durations);
    assert_eq!(first, second);
}

/// Test a full re-bin scenario across three slides with trailing cues that
/// overrun the measured timeline
#[test]
fn test_rebin_withThreeSlideLecture_shouldBinShiftAndDropTrailing() {
    let mut durations = BTreeMap::new();
    durations.insert(1, 3.0);
    durations.insert(2, 4.0);
    durations.insert(3, 2.0);

    let cues = vec![
        Cue::new(0.0, 1.0, "A"),
        Cue::new(3.5, 4.0, "B"),
        Cue::new(8.0, 8.5, "C"),
        Cue::new(9.0, 9.5, "D"),
        Cue::new(9.5, 10.0, "E"),
    ];
    let by_slide = rebin(&cues, &durations);

    // Slide 1 window [0, 3): cue A unchanged
    let slide1 = by_slide.get(&1).expect("slide 1 gets cue A");
    assert_eq!(slide1[0].start_time, 0.0);
    assert_eq!(slide1[0].end_time, 1.0);
    assert_eq!(slide1[0].text, "A");

    // Slide 2 window [3, 7): cue B shifted by 3
    let slide2 = by_slide.get(&2).expect("slide 2 gets cue B");
    assert_eq!(slide2[0].start_time, 0.5);
    assert_eq!(slide2[0].end_time, 1.0);

    // Slide 3 window [7, 9): cue C shifted by 7. Cue D starts exactly at the
    // final window's exclusive end and is dropped under the half-open
    // semantics, as is cue E beyond it.
    let slide3 = by_slide.get(&3).expect("slide 3 gets cue C");
    assert_eq!(slide3.len(), 1);
    assert_eq!(slide3[0].start_time, 1.0);
    assert_eq!(slide3[0].end_time, 1.5);

    let assigned: usize = by_slide.values().map(Vec::len).sum();
    assert_eq!(assigned, 3);
}
