use std::path::{Path, PathBuf};
use anyhow::{Context, Result, anyhow};
use log::{info, warn};

use crate::app_config::Config;
use crate::lecture_content;
use crate::providers::ollama::{GenerationRequest, Ollama};
use crate::synthesis::SpeechSynthesizer;

// @module: Interactive lecture Q&A backed by a local LLM

// @const: System prompt framing the model as the lecturer
const SYSTEM_PROMPT: &str = "You are an AI teacher giving a lecture. A student has asked a question.

Instructions:
- Provide a clear, concise answer based on the lecture content
- If the question relates to the lecture material, reference specific slides when helpful
- If the question is outside the lecture scope, politely acknowledge that and provide a brief, helpful response
- Keep answers to 2-3 sentences for natural spoken delivery
- Be friendly and encouraging";

/// Result of a provider availability check
#[derive(Debug)]
pub struct QaStatus {
    /// Whether the provider is reachable and has the configured model
    pub available: bool,
    /// Human-readable status message
    pub message: String,
}

/// Complete result of a question/answer round
#[derive(Debug)]
pub struct QaResponse {
    /// The generated answer text
    pub answer: String,
    /// Path to the spoken answer audio, when generated
    pub audio_path: Option<PathBuf>,
}

/// Handles question answering during lectures using a local Ollama model.
///
/// The timing pipeline never calls into this handler; Q&A is an independent,
/// fallible side channel.
pub struct QaHandler {
    client: Ollama,
    model: String,
    temperature: f32,
    top_p: f32,
    num_predict: u32,
    temp_dir: String,
    lecture_context: Option<String>,
}

impl QaHandler {
    /// Create a handler from the application config
    pub fn new(config: &Config) -> Self {
        let qa = &config.qa;
        QaHandler {
            client: Ollama::with_retries(
                &qa.endpoint,
                qa.timeout_secs,
                qa.retry_count,
                qa.retry_backoff_ms,
            ),
            model: qa.model.clone(),
            temperature: qa.temperature,
            top_p: qa.top_p,
            num_predict: qa.num_predict,
            temp_dir: config.temp_dir.clone(),
            lecture_context: None,
        }
    }

    /// Check that the provider is running and the configured model is pulled
    pub async fn check_status(&self) -> QaStatus {
        match self.client.has_model(&self.model).await {
            Ok(true) => QaStatus {
                available: true,
                message: format!("Ollama running with model {}", self.model),
            },
            Ok(false) => QaStatus {
                available: false,
                message: format!(
                    "Model {} not found. Run: ollama pull {}",
                    self.model, self.model
                ),
            },
            Err(e) => QaStatus {
                available: false,
                message: format!("Ollama is not reachable ({}). Start it with: ollama serve", e),
            },
        }
    }

    /// Load lecture content for context-aware answers.
    ///
    /// Builds a per-slide context block from the narration texts so answers
    /// can reference specific slides.
    pub fn load_lecture_context<P: AsRef<Path>>(&mut self, content_file: P) -> Result<()> {
        let slides = lecture_content::load_slides(&content_file)?;

        let mut context = String::from("Lecture content:\n");
        for slide in &slides {
            context.push_str(&format!(
                "\nSlide {}: {}\n",
                slide.slide_number, slide.narration_text
            ));
        }

        info!(
            "Loaded lecture context from {:?} ({} slides)",
            content_file.as_ref(),
            slides.len()
        );
        self.lecture_context = Some(context);
        Ok(())
    }

    /// Set the lecture context directly (used by tests and callers that
    /// already hold the content)
    pub fn set_lecture_context(&mut self, context: String) {
        self.lecture_context = Some(context);
    }

    /// Generate an answer to a student question.
    ///
    /// `current_slide` adds a position hint so the model can relate the
    /// question to what is on screen.
    pub async fn answer_question(
        &self,
        question: &str,
        current_slide: Option<usize>,
    ) -> Result<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(anyhow!("No question provided"));
        }

        let status = self.check_status().await;
        if !status.available {
            return Err(anyhow!("{}", status.message));
        }

        let lecture_info = self
            .lecture_context
            .as_deref()
            .unwrap_or("No lecture content loaded.");
        let slide_info = match current_slide {
            Some(n) => format!("The student is currently on slide {}.", n),
            None => String::new(),
        };

        let prompt = format!(
            "{}\n\n{}\n\nStudent question: {}\n\nPlease provide a helpful answer:",
            lecture_info, slide_info, question
        );

        info!("Generating answer for: {:.50}...", question);

        let request = GenerationRequest::new(&self.model, prompt)
            .system(SYSTEM_PROMPT)
            .temperature(self.temperature)
            .top_p(self.top_p)
            .num_predict(self.num_predict);

        let response = self
            .client
            .generate(request)
            .await
            .context("Failed to generate answer")?;

        Ok(response.response.trim().to_string())
    }

    /// Complete Q&A round: generate an answer and optionally speak it.
    ///
    /// Audio failures degrade to a text-only response rather than failing
    /// the round.
    pub async fn ask_and_respond(
        &self,
        question: &str,
        current_slide: Option<usize>,
        synthesizer: Option<&SpeechSynthesizer>,
    ) -> Result<QaResponse> {
        let answer = self.answer_question(question, current_slide).await?;

        let audio_path = match synthesizer {
            Some(synthesizer) => {
                let output_path = Path::new(&self.temp_dir).join("qa_response.wav");
                match synthesizer.synthesize_to_wav(&answer, &output_path).await {
                    Ok(()) => {
                        info!("Generated audio response: {:?}", output_path);
                        Some(output_path)
                    }
                    Err(e) => {
                        warn!("Failed to generate audio for answer: {}", e);
                        None
                    }
                }
            }
            None => None,
        };

        Ok(QaResponse { answer, audio_path })
    }
}
