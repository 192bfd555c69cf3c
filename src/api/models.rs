//! API request and response models

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::form::FormData;
use crate::backend::BackendStatus;
use crate::error::Result;
use crate::study::planner::GoalRecord;

/// Multipart upload carrying one file
#[derive(Debug, ToSchema)]
pub struct UploadForm {
    /// The uploaded document or image
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Summary and flashcards for an uploaded text document
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SummarizeResponse {
    pub summary: String,
    /// Up to five trimmed sentences, in document order
    pub flashcards: Vec<String>,
}

/// Recognized text and its summary for an uploaded image
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct OcrResponse {
    pub text: String,
    pub summary: String,
}

/// Chat question with optional document context
#[derive(Debug, Clone, ToSchema)]
pub struct ChatForm {
    pub query: String,
    /// Empty or absent context skips the model
    pub context: String,
}

impl ChatForm {
    pub fn from_form(form: &mut FormData) -> Result<Self> {
        Ok(Self {
            query: form.require("query")?,
            context: form.optional("context").unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ChatResponse {
    pub response: String,
}

/// Goal submitted to the planner
#[derive(Debug, Clone, ToSchema)]
pub struct GoalForm {
    pub text: String,
    pub deadline: String,
}

impl GoalForm {
    pub fn from_form(form: &mut FormData) -> Result<Self> {
        Ok(Self {
            text: form.require("text")?,
            deadline: form.require("deadline")?,
        })
    }
}

impl From<GoalForm> for GoalRecord {
    fn from(form: GoalForm) -> Self {
        GoalRecord::new(form.text, form.deadline)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PlannerResponse {
    pub goals: Vec<GoalRecord>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct AddGoalResponse {
    pub message: String,
}

/// Health check response
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
    pub models: Vec<BackendStatus>,
}

/// Error body
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}
