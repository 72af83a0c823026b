use anyhow::{Context, Result, anyhow};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @regex: Slide number in per-slide audio file names
static AUDIO_FILE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^audio_slide_(\d+)\.wav$").unwrap_or_else(|_| {
        panic!("Invalid audio file regex pattern")
    })
});

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Find the most recently modified lecture content file in a directory.
    ///
    /// Lecture content files follow the `*_lecture.json` naming convention;
    /// the newest one by modification time wins.
    pub fn find_latest_lecture_json<P: AsRef<Path>>(dir: P) -> Result<PathBuf> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(anyhow!("Not a directory: {:?}", dir));
        }

        let mut candidates: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(dir).max_depth(1) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            if path.is_file()
                && path
                    .file_name()
                    .map(|n| n.to_string_lossy().ends_with("_lecture.json"))
                    .unwrap_or(false)
            {
                candidates.push(path.to_path_buf());
            }
        }

        candidates
            .into_iter()
            .max_by_key(|path| {
                fs::metadata(path)
                    .and_then(|m| m.modified())
                    .unwrap_or(std::time::SystemTime::UNIX_EPOCH)
            })
            .ok_or_else(|| anyhow!("No *_lecture.json file found in {:?}", dir))
    }

    /// Enumerate per-slide audio files (`audio_slide_N.wav`) in a directory,
    /// sorted by slide number
    pub fn find_slide_audio_files<P: AsRef<Path>>(dir: P) -> Result<Vec<(usize, PathBuf)>> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(anyhow!("Not a directory: {:?}", dir));
        }

        let mut files: Vec<(usize, PathBuf)> = Vec::new();
        for entry in fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory: {:?}", dir))?
        {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let file_name = match path.file_name() {
                Some(name) => name.to_string_lossy().to_string(),
                None => continue,
            };

            if let Some(captures) = AUDIO_FILE_REGEX.captures(&file_name) {
                if let Some(number) = captures.get(1).and_then(|m| m.as_str().parse().ok()) {
                    files.push((number, path));
                }
            }
        }

        files.sort_by_key(|(number, _)| *number);
        Ok(files)
    }
}
