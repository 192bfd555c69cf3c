//! The model capabilities loaded once at startup

use futures::future::join3;
use std::sync::Arc;
use tracing::info;

use crate::backend::huggingface::{HuggingFaceQuestionAnswerer, HuggingFaceSummarizer};
use crate::backend::ocr::{HttpTextRecognizer, TesseractRecognizer};
use crate::backend::traits::{BackendStatus, QuestionAnswerer, Summarizer, TextRecognizer};
use crate::config::{BackendConfig, ModelsConfig, ProtocolType};
use crate::error::{AppError, Result};

/// Read-only handles to the three model capabilities
#[derive(Clone)]
pub struct ModelSet {
    pub summarizer: Arc<dyn Summarizer>,
    pub question_answerer: Arc<dyn QuestionAnswerer>,
    pub text_recognizer: Arc<dyn TextRecognizer>,
}

impl ModelSet {
    pub fn new(
        summarizer: Arc<dyn Summarizer>,
        question_answerer: Arc<dyn QuestionAnswerer>,
        text_recognizer: Arc<dyn TextRecognizer>,
    ) -> Self {
        Self {
            summarizer,
            question_answerer,
            text_recognizer,
        }
    }

    /// Build every capability from configuration
    pub fn from_config(config: &ModelsConfig) -> Result<Self> {
        let summarizer = create_summarizer(&config.summarizer)?;
        let question_answerer = create_question_answerer(&config.question_answerer)?;
        let text_recognizer = create_text_recognizer(&config.text_recognizer)?;

        for (capability, backend) in config.iter() {
            info!(
                capability = capability,
                name = %backend.name,
                protocol = %backend.protocol,
                enabled = backend.enabled,
                "Model backend ready"
            );
        }

        Ok(Self::new(summarizer, question_answerer, text_recognizer))
    }

    /// Status of each capability from cached endpoint state
    pub fn statuses(&self) -> Vec<BackendStatus> {
        vec![
            self.summarizer.status(),
            self.question_answerer.status(),
            self.text_recognizer.status(),
        ]
    }

    /// Probe all capabilities concurrently, returning (total, healthy, unhealthy)
    pub async fn health_check_all(&self) -> (usize, usize, usize) {
        let (a, b, c) = join3(
            self.summarizer.health_check(),
            self.question_answerer.health_check(),
            self.text_recognizer.health_check(),
        )
        .await;

        let healthy = [a, b, c].iter().filter(|h| **h).count();
        (3, healthy, 3 - healthy)
    }
}

fn unsupported(config: &BackendConfig, capability: &str) -> AppError {
    AppError::Config(config::ConfigError::Message(format!(
        "Protocol '{}' cannot serve {} (backend '{}')",
        config.protocol, capability, config.name
    )))
}

/// Create the summarizer named by configuration
pub fn create_summarizer(config: &BackendConfig) -> Result<Arc<dyn Summarizer>> {
    match config.protocol {
        ProtocolType::HuggingFace => Ok(Arc::new(HuggingFaceSummarizer::new(config)?)),
        _ => Err(unsupported(config, "summarization")),
    }
}

/// Create the question answerer named by configuration
pub fn create_question_answerer(config: &BackendConfig) -> Result<Arc<dyn QuestionAnswerer>> {
    match config.protocol {
        ProtocolType::HuggingFace => Ok(Arc::new(HuggingFaceQuestionAnswerer::new(config)?)),
        _ => Err(unsupported(config, "question answering")),
    }
}

/// Create the text recognizer named by configuration
pub fn create_text_recognizer(config: &BackendConfig) -> Result<Arc<dyn TextRecognizer>> {
    match config.protocol {
        ProtocolType::Http => Ok(Arc::new(HttpTextRecognizer::new(config)?)),
        ProtocolType::Tesseract => Ok(Arc::new(TesseractRecognizer::new(config)?)),
        ProtocolType::HuggingFace => Err(unsupported(config, "text recognition")),
    }
}
