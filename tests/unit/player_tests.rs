/*!
 * Tests for browser player output generation
 */

use std::collections::BTreeMap;
use anyhow::Result;
use lectern::lecture_content::SlideContent;
use lectern::player::{generate_player, write_subtitle_data};
use lectern::timing::SubtitleSegment;
use crate::common;

fn sample_slides() -> Vec<SlideContent> {
    vec![
        SlideContent {
            slide_number: 1,
            image_path: "slides/slide_1.png".to_string(),
            narration_text: "First slide narration.".to_string(),
            duration: 3.0,
            start_time: 0.0,
        },
        SlideContent {
            slide_number: 2,
            image_path: "slides/slide_2.png".to_string(),
            narration_text: "Second slide narration.".to_string(),
            duration: 4.0,
            start_time: 3.0,
        },
    ]
}

/// Test subtitle data output uses string slide keys and relative times
#[test]
fn test_write_subtitle_data_withSegments_shouldEmitSlideKeyedJs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("subtitle_data_synced.js");

    let mut by_slide = BTreeMap::new();
    by_slide.insert(1, vec![SubtitleSegment::new("Hello.", 0.0, 1.5)]);
    by_slide.insert(2, vec![SubtitleSegment::new("World.", 0.5, 2.0)]);

    write_subtitle_data(&path, &by_slide)?;

    let content = std::fs::read_to_string(&path)?;
    assert!(content.starts_with("const subtitleData = "));
    assert!(content.trim_end().ends_with(';'));

    // The payload after the assignment is valid JSON with string keys
    let json_part = content
        .trim_start_matches("const subtitleData = ")
        .trim_end()
        .trim_end_matches(';');
    let value: serde_json::Value = serde_json::from_str(json_part)?;
    assert!(value.get("1").is_some());
    assert_eq!(value["2"][0]["start"], 0.5);
    assert_eq!(value["2"][0]["text"], "World.");

    Ok(())
}

/// Test empty subtitle map still produces a loadable data file
#[test]
fn test_write_subtitle_data_withNoSlides_shouldEmitEmptyObject() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("subtitle_data_synced.js");

    write_subtitle_data(&path, &BTreeMap::new())?;

    let content = std::fs::read_to_string(&path)?;
    assert!(content.contains("const subtitleData = {}"));

    Ok(())
}

/// Test player generation embeds subtitle data and lecture context
#[test]
fn test_generate_player_withSubtitleData_shouldEmbedScripts() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output_dir = temp_dir.path().to_path_buf();

    let mut by_slide = BTreeMap::new();
    by_slide.insert(1, vec![SubtitleSegment::new("Hello.", 0.0, 1.5)]);
    write_subtitle_data(output_dir.join("subtitle_data_synced.js"), &by_slide)?;

    let player_path = generate_player(&sample_slides(), &output_dir)?;
    assert!(player_path.ends_with("dynamic_player.html"));

    let html = std::fs::read_to_string(&player_path)?;
    assert!(html.contains("const subtitleData = "));
    assert!(html.contains("const lectureContext = "));
    assert!(html.contains("First slide narration."));
    assert!(html.contains("const totalSlides = 2;"));

    Ok(())
}

/// Test player generation without subtitle data falls back to an empty object
#[test]
fn test_generate_player_withNoSubtitleData_shouldFallBackToEmpty() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let player_path = generate_player(&sample_slides(), temp_dir.path())?;
    let html = std::fs::read_to_string(&player_path)?;
    assert!(html.contains("const subtitleData = {};"));

    Ok(())
}
