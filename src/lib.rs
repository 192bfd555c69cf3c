//! Study Serving Gateway
//!
//! An HTTP service that fronts pre-trained summarization, question answering
//! and OCR model backends for study material, plus a stub study planner.

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod study;

pub use error::{AppError, Result};

use std::sync::Arc;

use backend::ModelSet;

/// Application state shared across all handlers
pub struct AppState {
    pub settings: Arc<config::Settings>,
    pub models: Arc<ModelSet>,
}

impl AppState {
    pub fn new(settings: config::Settings, models: ModelSet) -> Self {
        Self {
            settings: Arc::new(settings),
            models: Arc::new(models),
        }
    }
}
