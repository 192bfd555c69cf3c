//! Hugging Face inference pipeline backends (summarization, question answering)
//! Speaks the wire format of the hosted Inference API and of self-hosted
//! inference endpoints serving the same pipelines.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::backend::http_client::BackendHttpClient;
use crate::backend::traits::{BackendStatus, ModelBackend, QuestionAnswerer, Summarizer, SummaryLength};
use crate::config::BackendConfig;
use crate::error::{AppError, Result};

#[derive(Debug, Serialize)]
struct SummarizationParameters {
    max_length: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_length: Option<u32>,
}

#[derive(Debug, Serialize)]
struct SummarizationRequest<'a> {
    inputs: &'a str,
    parameters: SummarizationParameters,
}

#[derive(Debug, Deserialize)]
struct SummarizationOutput {
    summary_text: String,
}

#[derive(Debug, Serialize)]
struct QuestionAnsweringInputs<'a> {
    question: &'a str,
    context: &'a str,
}

#[derive(Debug, Serialize)]
struct QuestionAnsweringRequest<'a> {
    inputs: QuestionAnsweringInputs<'a>,
}

#[derive(Debug, Clone, Deserialize)]
struct QuestionAnsweringOutput {
    answer: String,
}

/// Some deployments wrap the single answer in a list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QuestionAnsweringReply {
    Single(QuestionAnsweringOutput),
    List(Vec<QuestionAnsweringOutput>),
}

/// Shared plumbing of the two pipeline backends
struct Pipeline {
    name: String,
    capability: &'static str,
    enabled: bool,
    http: BackendHttpClient,
}

impl Pipeline {
    fn new(config: &BackendConfig, capability: &'static str) -> Result<Self> {
        Ok(Self {
            name: config.name.clone(),
            capability,
            enabled: config.enabled,
            http: BackendHttpClient::new(config)?,
        })
    }

    fn ensure_enabled(&self) -> Result<()> {
        if self.enabled {
            Ok(())
        } else {
            Err(AppError::ModelInvocation(format!("Backend '{}' is disabled", self.name)))
        }
    }

    fn status(&self) -> BackendStatus {
        BackendStatus {
            name: self.name.clone(),
            capability: self.capability.to_string(),
            protocol: "huggingface".to_string(),
            endpoints: self.http.endpoints().urls(),
            healthy: self.http.endpoints().any_healthy(),
            enabled: self.enabled,
        }
    }
}

/// Summarization pipeline, e.g. `sshleifer/distilbart-cnn-12-6`
pub struct HuggingFaceSummarizer {
    inner: Pipeline,
}

impl HuggingFaceSummarizer {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        Ok(Self {
            inner: Pipeline::new(config, "summarizer")?,
        })
    }
}

#[async_trait]
impl ModelBackend for HuggingFaceSummarizer {
    fn name(&self) -> &str {
        &self.inner.name
    }

    fn protocol(&self) -> &str {
        "huggingface"
    }

    fn is_enabled(&self) -> bool {
        self.inner.enabled
    }

    async fn health_check(&self) -> bool {
        self.inner.http.health_check().await
    }

    fn status(&self) -> BackendStatus {
        self.inner.status()
    }
}

#[async_trait]
impl Summarizer for HuggingFaceSummarizer {
    async fn summarize(&self, text: &str, length: SummaryLength) -> Result<String> {
        self.inner.ensure_enabled()?;

        let request = SummarizationRequest {
            inputs: text,
            parameters: SummarizationParameters {
                max_length: length.max_length,
                min_length: length.min_length,
            },
        };

        let outputs: Vec<SummarizationOutput> = self.inner.http.post_json("", &request).await?;

        outputs
            .into_iter()
            .next()
            .map(|o| o.summary_text)
            .ok_or_else(|| AppError::ModelInvocation(format!(
                "Backend '{}' returned no summary",
                self.inner.name
            )))
    }
}

/// Extractive question answering pipeline, e.g. `distilbert-base-uncased-distilled-squad`
pub struct HuggingFaceQuestionAnswerer {
    inner: Pipeline,
}

impl HuggingFaceQuestionAnswerer {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        Ok(Self {
            inner: Pipeline::new(config, "question_answerer")?,
        })
    }
}

#[async_trait]
impl ModelBackend for HuggingFaceQuestionAnswerer {
    fn name(&self) -> &str {
        &self.inner.name
    }

    fn protocol(&self) -> &str {
        "huggingface"
    }

    fn is_enabled(&self) -> bool {
        self.inner.enabled
    }

    async fn health_check(&self) -> bool {
        self.inner.http.health_check().await
    }

    fn status(&self) -> BackendStatus {
        self.inner.status()
    }
}

#[async_trait]
impl QuestionAnswerer for HuggingFaceQuestionAnswerer {
    async fn answer(&self, question: &str, context: &str) -> Result<String> {
        self.inner.ensure_enabled()?;

        let request = QuestionAnsweringRequest {
            inputs: QuestionAnsweringInputs { question, context },
        };

        let reply: QuestionAnsweringReply = self.inner.http.post_json("", &request).await?;

        let output = match reply {
            QuestionAnsweringReply::Single(output) => Some(output),
            QuestionAnsweringReply::List(outputs) => outputs.into_iter().next(),
        };

        output.map(|o| o.answer).ok_or_else(|| {
            AppError::ModelInvocation(format!("Backend '{}' returned no answer", self.inner.name))
        })
    }
}
