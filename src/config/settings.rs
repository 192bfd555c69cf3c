//! Application settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub health: HealthConfig,
    #[serde(default)]
    pub models: ModelsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_request_timeout() -> u64 {
    120
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

/// Background health probing
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthConfig {
    /// Seconds between probes, 0 disables the monitor
    #[serde(default = "default_health_interval")]
    pub interval_secs: u64,
}

fn default_health_interval() -> u64 {
    30
}

/// Wire protocol spoken by a model backend
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolType {
    /// Hugging Face inference pipeline format
    HuggingFace,
    /// Plain JSON over HTTP
    Http,
    /// Local tesseract binary
    Tesseract,
}

impl Default for ProtocolType {
    fn default() -> Self {
        ProtocolType::HuggingFace
    }
}

impl std::fmt::Display for ProtocolType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolType::HuggingFace => write!(f, "huggingface"),
            ProtocolType::Http => write!(f, "http"),
            ProtocolType::Tesseract => write!(f, "tesseract"),
        }
    }
}

/// Authentication for a backend
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct BackendAuth {
    /// Environment variable holding the token
    #[serde(default)]
    pub token_env: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Custom header carrying the raw token instead of `Authorization: Bearer`
    #[serde(default)]
    pub header_name: Option<String>,
}

/// Health check configuration for a backend
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendHealthCheck {
    /// Probe path appended to each endpoint; no path means no active probing
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_health_timeout")]
    pub timeout_secs: u64,
}

fn default_health_timeout() -> u64 {
    5
}

impl Default for BackendHealthCheck {
    fn default() -> Self {
        Self {
            path: None,
            timeout_secs: default_health_timeout(),
        }
    }
}

/// Model backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub protocol: ProtocolType,

    #[serde(default)]
    pub endpoints: Vec<String>,

    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub auth: BackendAuth,

    #[serde(default)]
    pub health_check: BackendHealthCheck,

    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,

    /// Executable for the tesseract protocol
    #[serde(default = "default_tesseract_command")]
    pub command: String,

    /// Recognition language(s) for the tesseract protocol, e.g. "eng+fra"
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> u64 {
    60000
}

fn default_tesseract_command() -> String {
    "tesseract".to_string()
}

fn default_language() -> String {
    "eng".to_string()
}

/// The three model capabilities the gateway fronts
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelsConfig {
    #[serde(default = "default_summarizer")]
    pub summarizer: BackendConfig,
    #[serde(default = "default_question_answerer")]
    pub question_answerer: BackendConfig,
    #[serde(default = "default_text_recognizer")]
    pub text_recognizer: BackendConfig,
}

fn hf_inference_backend(name: &str, model: &str) -> BackendConfig {
    BackendConfig {
        name: name.to_string(),
        protocol: ProtocolType::HuggingFace,
        endpoints: vec![format!("https://api-inference.huggingface.co/models/{}", model)],
        auth: BackendAuth {
            token_env: Some("HF_API_TOKEN".to_string()),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn default_summarizer() -> BackendConfig {
    hf_inference_backend("distilbart-cnn", "sshleifer/distilbart-cnn-12-6")
}

fn default_question_answerer() -> BackendConfig {
    hf_inference_backend("distilbert-squad", "distilbert-base-uncased-distilled-squad")
}

fn default_text_recognizer() -> BackendConfig {
    BackendConfig {
        name: "tesseract".to_string(),
        protocol: ProtocolType::Tesseract,
        ..Default::default()
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            summarizer: default_summarizer(),
            question_answerer: default_question_answerer(),
            text_recognizer: default_text_recognizer(),
        }
    }
}

impl ModelsConfig {
    /// All backend configs, labelled by the capability they serve
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &BackendConfig)> {
        [
            ("summarizer", &self.summarizer),
            ("question_answerer", &self.question_answerer),
            ("text_recognizer", &self.text_recognizer),
        ]
        .into_iter()
    }
}

/// YAML models configuration file structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ModelsFile {
    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub models: ModelsConfig,
}

impl Settings {
    /// Load settings from configuration files and environment variables
    pub fn load() -> Result<Self> {
        let gateway_path = std::env::var("STUDY_GATEWAY_CONFIG")
            .unwrap_or_else(|_| "config/gateway.yaml".to_string());
        let models_path = std::env::var("STUDY_GATEWAY_MODELS")
            .unwrap_or_else(|_| "config/models.yaml".to_string());

        Self::load_from_paths(gateway_path, Some(models_path))
    }

    /// Load settings from a gateway file (YAML or TOML) and an optional models file
    pub fn load_from_paths<P: AsRef<Path>>(
        gateway_config: P,
        models_config: Option<P>,
    ) -> Result<Self> {
        let gateway_path = gateway_config.as_ref();

        // Determine file format
        let format = if gateway_path.extension().map_or(false, |ext| ext == "yaml" || ext == "yml") {
            FileFormat::Yaml
        } else {
            FileFormat::Toml
        };

        let mut config_builder = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port() as i64)?
            .set_default("server.max_upload_bytes", default_max_upload_bytes() as i64)?
            .set_default("server.request_timeout_secs", default_request_timeout() as i64)?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", default_log_format())?
            .set_default("health.interval_secs", default_health_interval() as i64)?;

        if gateway_path.exists() {
            config_builder = config_builder.add_source(File::from(gateway_path).format(format));
        }

        config_builder = config_builder.add_source(
            Environment::with_prefix("STUDY_GATEWAY")
                .separator("__")
                .try_parsing(true),
        );

        let config = config_builder.build()?;
        let mut settings: Settings = config.try_deserialize()?;

        if let Some(models_path) = models_config {
            let models_path = models_path.as_ref();
            if models_path.exists() {
                settings.models = Self::load_models_config(models_path)?.models;
            }
        }

        Ok(settings)
    }

    /// Load model backends from a YAML file
    pub fn load_models_config<P: AsRef<Path>>(path: P) -> Result<ModelsFile> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| AppError::Config(config::ConfigError::Message(
                format!("Failed to read models config: {}", e)
            )))?;

        let models: ModelsFile = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(config::ConfigError::Message(
                format!("Failed to parse models config: {}", e)
            )))?;

        Ok(models)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::Config(config::ConfigError::Message(
                "Server port cannot be 0".to_string(),
            )));
        }

        if self.server.max_upload_bytes == 0 {
            return Err(AppError::Config(config::ConfigError::Message(
                "Upload limit cannot be 0".to_string(),
            )));
        }

        for (capability, backend) in self.models.iter() {
            if backend.name.is_empty() {
                return Err(AppError::Config(config::ConfigError::Message(
                    format!("Backend name for {} cannot be empty", capability),
                )));
            }
            if backend.protocol != ProtocolType::Tesseract && backend.endpoints.is_empty() {
                return Err(AppError::Config(config::ConfigError::Message(
                    format!("Backend '{}' must have at least one endpoint", backend.name),
                )));
            }
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
                max_upload_bytes: default_max_upload_bytes(),
                request_timeout_secs: default_request_timeout(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
            health: HealthConfig {
                interval_secs: default_health_interval(),
            },
            models: ModelsConfig::default(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            protocol: ProtocolType::default(),
            endpoints: vec![],
            enabled: true,
            auth: BackendAuth::default(),
            health_check: BackendHealthCheck::default(),
            timeout_ms: default_timeout(),
            command: default_tesseract_command(),
            language: default_language(),
        }
    }
}
