//! Text recognizer backends

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::backend::http_client::BackendHttpClient;
use crate::backend::traits::{BackendStatus, ModelBackend, TextRecognizer};
use crate::config::BackendConfig;
use crate::error::{AppError, Result};

#[derive(Debug, Serialize)]
struct OcrRequest {
    /// Base64 encoded PNG
    image: String,
}

#[derive(Debug, Deserialize)]
struct OcrResponse {
    text: String,
}

/// OCR service reached over HTTP at `<endpoint>/ocr`
pub struct HttpTextRecognizer {
    name: String,
    enabled: bool,
    http: BackendHttpClient,
}

impl HttpTextRecognizer {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        Ok(Self {
            name: config.name.clone(),
            enabled: config.enabled,
            http: BackendHttpClient::new(config)?,
        })
    }
}

#[async_trait]
impl ModelBackend for HttpTextRecognizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn protocol(&self) -> &str {
        "http"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn health_check(&self) -> bool {
        self.http.health_check().await
    }

    fn status(&self) -> BackendStatus {
        BackendStatus {
            name: self.name.clone(),
            capability: "text_recognizer".to_string(),
            protocol: self.protocol().to_string(),
            endpoints: self.http.endpoints().urls(),
            healthy: self.http.endpoints().any_healthy(),
            enabled: self.enabled,
        }
    }
}

#[async_trait]
impl TextRecognizer for HttpTextRecognizer {
    async fn recognize(&self, png: &[u8]) -> Result<String> {
        if !self.enabled {
            return Err(AppError::ModelInvocation(format!("Backend '{}' is disabled", self.name)));
        }

        let request = OcrRequest {
            image: STANDARD.encode(png),
        };
        let response: OcrResponse = self.http.post_json("ocr", &request).await?;
        Ok(response.text)
    }
}

/// Local tesseract binary fed through stdin/stdout
pub struct TesseractRecognizer {
    name: String,
    enabled: bool,
    command: String,
    language: String,
    timeout: Duration,
    healthy: RwLock<bool>,
}

impl TesseractRecognizer {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        if config.command.trim().is_empty() {
            return Err(AppError::Config(config::ConfigError::Message(format!(
                "Backend '{}' needs a tesseract command",
                config.name
            ))));
        }

        Ok(Self {
            name: config.name.clone(),
            enabled: config.enabled,
            command: config.command.clone(),
            language: config.language.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
            healthy: RwLock::new(true),
        })
    }

    /// Arguments reading the image from stdin and writing text to stdout
    fn args(&self) -> Vec<String> {
        vec![
            "stdin".to_string(),
            "stdout".to_string(),
            "-l".to_string(),
            self.language.clone(),
        ]
    }

    async fn run(&self, png: &[u8]) -> Result<String> {
        let mut child = Command::new(&self.command)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| AppError::Internal("tesseract stdin unavailable".to_string()))?;
        let image = png.to_vec();
        // Feed stdin concurrently so a full stdout pipe cannot stall the child
        let writer = tokio::spawn(async move {
            let written = stdin.write_all(&image).await;
            drop(stdin);
            written
        });

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| AppError::ModelInvocation(format!(
                "Backend '{}' timed out after {:?}",
                self.name, self.timeout
            )))??;

        if let Ok(Err(e)) = writer.await {
            debug!(backend = %self.name, error = %e, "tesseract closed stdin early");
        }

        if !output.status.success() {
            return Err(AppError::ModelInvocation(format!(
                "Backend '{}' exited with {}: {}",
                self.name,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        String::from_utf8(output.stdout).map_err(|e| {
            AppError::ModelInvocation(format!("Backend '{}' produced invalid UTF-8: {}", self.name, e))
        })
    }
}

#[async_trait]
impl ModelBackend for TesseractRecognizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn protocol(&self) -> &str {
        "tesseract"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn health_check(&self) -> bool {
        let result = Command::new(&self.command)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        let healthy = matches!(result, Ok(status) if status.success());
        if !healthy {
            warn!(backend = %self.name, command = %self.command, "tesseract health check failed");
        }
        *self.healthy.write() = healthy;
        healthy
    }

    fn status(&self) -> BackendStatus {
        BackendStatus {
            name: self.name.clone(),
            capability: "text_recognizer".to_string(),
            protocol: self.protocol().to_string(),
            endpoints: vec![],
            healthy: *self.healthy.read(),
            enabled: self.enabled,
        }
    }
}

#[async_trait]
impl TextRecognizer for TesseractRecognizer {
    async fn recognize(&self, png: &[u8]) -> Result<String> {
        if !self.enabled {
            return Err(AppError::ModelInvocation(format!("Backend '{}' is disabled", self.name)));
        }

        match self.run(png).await {
            Ok(text) => {
                *self.healthy.write() = true;
                Ok(text)
            }
            Err(AppError::Io(e)) => {
                *self.healthy.write() = false;
                Err(AppError::ModelInvocation(format!(
                    "Failed to run '{}': {}",
                    self.command, e
                )))
            }
            Err(e) => Err(e),
        }
    }
}
