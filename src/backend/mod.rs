//! Backend module - capability traits, model clients, and the startup model set

pub mod endpoint;
pub mod health;
pub mod http_client;
pub mod huggingface;
pub mod model_set;
pub mod ocr;
pub mod traits;

pub use model_set::ModelSet;
pub use traits::{
    BackendStatus, ModelBackend, QuestionAnswerer, Summarizer, SummaryLength, TextRecognizer,
};
