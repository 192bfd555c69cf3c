//! Capability traits implemented by model backends

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::Result;

/// Length bounds passed to a summarizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryLength {
    pub max_length: u32,
    /// `None` leaves the minimum to the model's own default
    pub min_length: Option<u32>,
}

impl SummaryLength {
    pub const fn new(max_length: u32, min_length: Option<u32>) -> Self {
        Self {
            max_length,
            min_length,
        }
    }
}

/// Status of a model backend as reported by `/health`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BackendStatus {
    pub name: String,
    pub capability: String,
    pub protocol: String,
    pub endpoints: Vec<String>,
    pub healthy: bool,
    pub enabled: bool,
}

/// Behaviour shared by every model backend
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Get the backend name
    fn name(&self) -> &str;

    /// Get the backend protocol
    fn protocol(&self) -> &str;

    /// Check if enabled
    fn is_enabled(&self) -> bool;

    /// Actively probe the backend, updating endpoint state
    async fn health_check(&self) -> bool;

    /// Get status from the last known endpoint state
    fn status(&self) -> BackendStatus;
}

/// Reduces a body of text to a shorter summary
#[async_trait]
pub trait Summarizer: ModelBackend {
    async fn summarize(&self, text: &str, length: SummaryLength) -> Result<String>;
}

/// Extracts an answer span from a context given a question
#[async_trait]
pub trait QuestionAnswerer: ModelBackend {
    async fn answer(&self, question: &str, context: &str) -> Result<String>;
}

/// Extracts text from a PNG-encoded raster image
#[async_trait]
pub trait TextRecognizer: ModelBackend {
    async fn recognize(&self, png: &[u8]) -> Result<String>;
}
