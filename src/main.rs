// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};
use std::io::Write;
use std::path::PathBuf;

use crate::app_config::Config;
use app_controller::Controller;

mod app_config;
mod app_controller;
mod enhance;
mod errors;
mod file_utils;
mod lecture_content;
mod player;
mod providers;
mod qa;
mod subtitle_processor;
mod synthesis;
mod text_processor;
mod timing;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate narration audio, subtitles, and the lecture player
    Generate {
        /// Lecture content file (defaults to the newest *_lecture.json)
        #[arg(value_name = "CONTENT_FILE")]
        content_file: Option<PathBuf>,
    },

    /// Re-synchronize an SRT transcript against the per-slide audio on disk
    Sync {
        /// SRT file to re-bin (defaults to output/lecture_subtitles.srt)
        #[arg(value_name = "SRT_FILE")]
        srt_file: Option<PathBuf>,
    },

    /// Answer lecture questions using a local LLM
    Qa {
        /// Question to answer; omit for an interactive session
        #[arg(value_name = "QUESTION")]
        question: Option<String>,

        /// Lecture content file for context
        #[arg(long)]
        content_file: Option<PathBuf>,

        /// Slide the student is currently viewing
        #[arg(long)]
        slide: Option<usize>,

        /// Speak the answer through the configured TTS command
        #[arg(long)]
        speak: bool,
    },

    /// Enhance a talking-avatar video frame by frame
    Enhance {
        /// Input video file
        #[arg(value_name = "INPUT_VIDEO")]
        input: PathBuf,

        /// Output video path (defaults to <output_dir>/<stem>_enhanced.mp4)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completions for lectern
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Lectern - narrated slide-deck lecture generator
///
/// Turns a slide content file into per-slide narration audio, timed
/// subtitles, and a standalone HTML player, with optional LLM-backed Q&A.
#[derive(Parser, Debug)]
#[command(name = "lectern")]
#[command(version = "1.0.0")]
#[command(about = "Narrated slide-deck lecture generator")]
#[command(long_about = "Lectern synthesizes per-slide narration with an external TTS command,
allocates subtitle timing across each slide's sentences, and emits a
browser-based lecture player.

EXAMPLES:
    lectern generate                            # Generate from the newest *_lecture.json
    lectern generate mycourse_lecture.json      # Generate from a specific content file
    lectern sync                                # Re-bin output/lecture_subtitles.srt
    lectern sync transcript.srt                 # Re-bin an external transcript
    lectern qa \"What is a monad?\" --slide 4     # Answer one question
    lectern qa --speak                          # Interactive Q&A with spoken answers
    lectern enhance avatar.mp4                  # Enhance a talking-avatar video
    lectern completions bash > lectern.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "lectern", &mut std::io::stdout());
        return Ok(());
    }

    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &cli.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(config_log_level.to_level_filter());
    }

    let config = load_config(&cli)?;

    // If log level was not set via command line, update it from config now
    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config)?;

    match cli.command {
        Commands::Generate { content_file } => controller.run_generate(content_file).await,
        Commands::Sync { srt_file } => controller.run_sync(srt_file).await,
        Commands::Qa {
            question,
            content_file,
            slide,
            speak,
        } => match question {
            Some(question) => {
                controller
                    .run_qa_single(&question, content_file, slide, speak)
                    .await
            }
            None => controller.run_qa_interactive(content_file, speak).await,
        },
        Commands::Enhance { input, output } => controller.run_enhance(input, output).await,
        Commands::Completions { .. } => Ok(()),
    }
}

/// Load the configuration file, creating a default one when missing, and
/// apply CLI overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let config_path = &cli.config_path;

    let mut config = if std::path::Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        // Create default configuration if not exists
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );
        let config = Config::default();
        config
            .save_to_file(config_path)
            .with_context(|| format!("Failed to write default config to file: {}", config_path))?;
        config
    };

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    config
        .validate()
        .context("Configuration validation failed")?;

    Ok(config)
}
