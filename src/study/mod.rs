//! Study assistant domain logic, independent of HTTP and model transport

pub mod flashcards;
pub mod planner;
pub mod raster;

use crate::backend::SummaryLength;

/// Summary bounds for uploaded documents
pub const DOCUMENT_SUMMARY: SummaryLength = SummaryLength::new(150, Some(50));

/// Summary bounds for text recognized in an image
pub const OCR_SUMMARY: SummaryLength = SummaryLength::new(100, None);

/// Chat reply when no document context was supplied
pub const MISSING_CONTEXT_RESPONSE: &str = "Please provide context from a document.";
