/*!
 * Tests for SRT parsing and serialization
 */

use std::fmt::Write;
use std::path::PathBuf;
use anyhow::Result;
use lectern::subtitle_processor::{SubtitleCollection, SubtitleEntry};
use crate::common;

/// Test timestamp parsing and formatting
#[test]
fn test_timestamp_parsing_withValidTimestamp_shouldParseAndFormat() {
    let ts = "01:23:45,678";
    let ms = SubtitleEntry::parse_timestamp(ts).unwrap();
    assert_eq!(ms, 5025678);

    let formatted = SubtitleEntry::format_timestamp(ms);
    assert_eq!(formatted, ts);
}

/// Test timestamp parsing rejects bad component ranges
#[test]
fn test_timestamp_parsing_withInvalidComponents_shouldFail() {
    assert!(SubtitleEntry::parse_timestamp("00:61:00,000").is_err());
    assert!(SubtitleEntry::parse_timestamp("00:00:75,000").is_err());
    assert!(SubtitleEntry::parse_timestamp("garbage").is_err());
}

/// Test subtitle entry display formatting
#[test]
fn test_subtitle_entry_display_withValidEntry_shouldFormatCorrectly() {
    let entry = SubtitleEntry::new(1, 5000, 10000, "Test subtitle".to_string());
    let mut output = String::new();
    write!(output, "{}", entry).unwrap();

    assert!(output.contains("1"));
    assert!(output.contains("00:00:05,000"));
    assert!(output.contains("00:00:10,000"));
    assert!(output.contains("Test subtitle"));
}

/// Test validated construction rejects inverted ranges and empty text
#[test]
fn test_subtitle_entry_validation_withBadInput_shouldFail() {
    assert!(SubtitleEntry::new_validated(1, 5000, 4000, "text".to_string()).is_err());
    assert!(SubtitleEntry::new_validated(1, 1000, 2000, "   ".to_string()).is_err());
    assert!(SubtitleEntry::new_validated(1, 1000, 1000, "zero width ok".to_string()).is_ok());
}

/// Test second conversions used by the timing core
#[test]
fn test_subtitle_entry_seconds_withMillisecondTimes_shouldConvert() {
    let entry = SubtitleEntry::new(1, 1500, 3250, "text".to_string());
    assert_eq!(entry.start_secs(), 1.5);
    assert_eq!(entry.end_secs(), 3.25);
}

/// Test parsing a well-formed SRT string
#[test]
fn test_parse_srt_string_withValidContent_shouldParseAllEntries() {
    let content = "1\n00:00:01,000 --> 00:00:04,000\nFirst entry.\n\n2\n00:00:05,000 --> 00:00:09,000\nSecond entry\nwith two lines.\n";
    let entries = SubtitleCollection::parse_srt_string(content);

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].start_time_ms, 1000);
    assert_eq!(entries[0].end_time_ms, 4000);
    // Multi-line text joined with spaces
    assert_eq!(entries[1].text, "Second entry with two lines.");
}

/// Test that malformed blocks are skipped without failing the parse
#[test]
fn test_parse_srt_string_withMalformedBlock_shouldSkipIt() {
    let content = "1\n00:00:01,000 --> 00:00:04,000\nGood entry.\n\nnot a block\n\n3\nbroken timestamp line\nText.\n\n4\n00:00:10,000 --> 00:00:12,000\nAnother good one.\n";
    let entries = SubtitleCollection::parse_srt_string(content);

    assert_eq!(entries.len(), 2);
    // Surviving entries are renumbered sequentially
    assert_eq!(entries[0].seq_num, 1);
    assert_eq!(entries[1].seq_num, 2);
}

/// Test SRT file round trip through write and parse
#[test]
fn test_srt_file_roundtrip_withValidCollection_shouldPreserveEntries() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("out.srt");

    let mut collection = SubtitleCollection::new(PathBuf::from("out.srt"));
    collection.entries.push(SubtitleEntry::new(1, 0, 2500, "Hello.".to_string()));
    collection.entries.push(SubtitleEntry::new(2, 2500, 6000, "World.".to_string()));
    collection.write_to_srt(&path)?;

    let parsed = SubtitleCollection::from_srt_file(&path)?;
    assert_eq!(parsed.entries.len(), 2);
    assert_eq!(parsed.entries[0].text, "Hello.");
    assert_eq!(parsed.entries[1].start_time_ms, 2500);

    Ok(())
}

/// Test conversion to absolute-timed cues
#[test]
fn test_to_cues_withEntries_shouldConvertToSeconds() {
    let mut collection = SubtitleCollection::new(PathBuf::from("x.srt"));
    collection.entries.push(SubtitleEntry::new(1, 500, 1750, "Cue text".to_string()));

    let cues = collection.to_cues();
    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].start, 0.5);
    assert_eq!(cues[0].end, 1.75);
    assert_eq!(cues[0].text, "Cue text");
}

/// Test parsing from a file created by the common fixtures
#[test]
fn test_from_srt_file_withFixture_shouldParse() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_subtitle(&temp_dir.path().to_path_buf(), "test.srt")?;

    let collection = SubtitleCollection::from_srt_file(&path)?;
    assert_eq!(collection.entries.len(), 3);
    assert_eq!(collection.entries[2].text, "For testing purposes.");

    Ok(())
}
