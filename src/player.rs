use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use log::{info, warn};
use serde_json::{Map, Value, json};

use crate::file_utils::FileManager;
use crate::lecture_content::SlideContent;
use crate::timing::SubtitleSegment;

// @module: Browser player output generation

/// Serialize per-slide subtitle segments as the JavaScript data file the
/// player loads.
///
/// Slide numbers become string keys; each segment carries `start`, `end`,
/// and `text` with times relative to the slide start.
pub fn write_subtitle_data<P: AsRef<Path>>(
    path: P,
    subtitles_by_slide: &BTreeMap<usize, Vec<SubtitleSegment>>,
) -> Result<()> {
    let mut slides = Map::new();
    for (slide_number, segments) in subtitles_by_slide {
        let entries: Vec<Value> = segments
            .iter()
            .map(|segment| {
                json!({
                    "start": segment.start_time,
                    "end": segment.end_time,
                    "text": segment.text,
                })
            })
            .collect();
        slides.insert(slide_number.to_string(), Value::Array(entries));
    }

    let body = serde_json::to_string_pretty(&Value::Object(slides))
        .context("Failed to serialize subtitle data")?;
    let content = format!("const subtitleData = {};\n", body);

    FileManager::write_to_file(&path, &content)?;
    info!(
        "Wrote subtitle data for {} slides to {:?}",
        subtitles_by_slide.len(),
        path.as_ref()
    );
    Ok(())
}

/// Build the inline lecture context script used by the player's Q&A panel
fn lecture_context_script(slides: &[SlideContent]) -> Result<String> {
    let entries: Vec<Value> = slides
        .iter()
        .map(|slide| {
            json!({
                "slide": slide.slide_number,
                "text": slide.narration_text,
            })
        })
        .collect();

    let body = serde_json::to_string(&entries).context("Failed to serialize lecture context")?;
    Ok(format!("const lectureContext = {};", body))
}

/// Generate the standalone HTML lecture player.
///
/// The player embeds the synchronized subtitle data (when present) and the
/// lecture context so subtitles and Q&A work from a plain file server.
pub fn generate_player(slides: &[SlideContent], output_dir: &Path) -> Result<PathBuf> {
    let subtitle_js_path = output_dir.join("subtitle_data_synced.js");
    let subtitle_js = if FileManager::file_exists(&subtitle_js_path) {
        FileManager::read_to_string(&subtitle_js_path)?
    } else {
        warn!("No subtitle data found, player will start with empty subtitles");
        "const subtitleData = {};".to_string()
    };

    let lecture_context_js = lecture_context_script(slides)?;
    let html = render_player_html(slides.len(), &subtitle_js, &lecture_context_js);

    let player_path = output_dir.join("dynamic_player.html");
    FileManager::write_to_file(&player_path, &html)?;
    info!("Wrote lecture player to {:?}", player_path);

    Ok(player_path)
}

/// Render the player HTML shell around the data scripts
fn render_player_html(num_slides: usize, subtitle_js: &str, lecture_context_js: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Lecture Player</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 0;
            padding: 20px;
            background: #1e1e2e;
            color: #eee;
        }}
        .container {{ max-width: 1200px; margin: 0 auto; }}
        .slide-view {{ text-align: center; }}
        .slide-view img {{ max-width: 100%; border-radius: 8px; }}
        .subtitle-bar {{
            min-height: 3em;
            margin-top: 12px;
            padding: 10px;
            text-align: center;
            font-size: 1.2em;
            background: rgba(0, 0, 0, 0.5);
            border-radius: 8px;
        }}
        .controls {{ margin-top: 16px; text-align: center; }}
        .controls button {{ padding: 8px 20px; margin: 0 6px; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="slide-view">
            <img id="slide-image" src="" alt="Slide">
        </div>
        <div class="subtitle-bar" id="subtitle-bar"></div>
        <div class="controls">
            <button id="prev-btn">Previous</button>
            <span id="slide-counter">1 / {num_slides}</span>
            <button id="next-btn">Next</button>
        </div>
        <audio id="narration" preload="auto"></audio>
    </div>
    <script>
{subtitle_js}
{lecture_context_js}
const totalSlides = {num_slides};
let currentSlide = 1;

function loadSlide(n) {{
    currentSlide = Math.min(Math.max(n, 1), totalSlides);
    document.getElementById('slide-image').src = '../slides/slide_' + currentSlide + '.png';
    document.getElementById('slide-counter').textContent = currentSlide + ' / ' + totalSlides;
    const audio = document.getElementById('narration');
    audio.src = '../temp/audio_slide_' + currentSlide + '.wav';
    audio.play().catch(() => {{}});
}}

function updateSubtitle() {{
    const audio = document.getElementById('narration');
    const slideSubtitles = subtitleData[currentSlide] || [];
    const t = audio.currentTime;
    const active = slideSubtitles.find(s => t >= s.start && t < s.end);
    document.getElementById('subtitle-bar').textContent = active ? active.text : '';
}}

document.getElementById('prev-btn').addEventListener('click', () => loadSlide(currentSlide - 1));
document.getElementById('next-btn').addEventListener('click', () => loadSlide(currentSlide + 1));
document.getElementById('narration').addEventListener('timeupdate', updateSubtitle);
document.getElementById('narration').addEventListener('ended', () => loadSlide(currentSlide + 1));

console.log('Subtitle data loaded:', Object.keys(subtitleData).length, 'slides');
loadSlide(1);
    </script>
</body>
</html>
"#
    )
}
