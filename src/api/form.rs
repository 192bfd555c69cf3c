//! Form extraction accepting both urlencoded and multipart bodies

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    Form,
};
use std::collections::HashMap;

use crate::error::{AppError, Result};

/// A file part of a multipart body
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Text fields and file parts of a submitted form
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

fn rejection(status: StatusCode, message: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(message)
    } else {
        AppError::InvalidRequest(message)
    }
}

impl FormData {
    pub fn from_parts(fields: HashMap<String, String>, files: HashMap<String, UploadedFile>) -> Self {
        Self { fields, files }
    }

    /// Take a required text field
    pub fn require(&mut self, name: &str) -> Result<String> {
        self.fields
            .remove(name)
            .ok_or_else(|| AppError::InvalidRequest(format!("Missing form field '{}'", name)))
    }

    /// Take an optional text field
    pub fn optional(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    /// Take a required upload; only a multipart part with a filename counts
    pub fn file(&mut self, name: &str) -> Result<UploadedFile> {
        self.files
            .remove(name)
            .ok_or_else(|| AppError::InvalidRequest(format!("Missing upload '{}'", name)))
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self> {
        let mut data = FormData::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| rejection(e.status(), e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| rejection(e.status(), e.body_text()))?;
                    data.files.insert(
                        name,
                        UploadedFile {
                            file_name: Some(file_name),
                            content_type,
                            bytes,
                        },
                    );
                }
                None => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| rejection(e.status(), e.body_text()))?;
                    data.fields.insert(name, value);
                }
            }
        }

        Ok(data)
    }
}

#[async_trait]
impl<S> FromRequest<S> for FormData
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map_or(false, |ct| ct.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| rejection(e.status(), e.body_text()))?;
            Self::from_multipart(multipart).await
        } else {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| rejection(e.status(), e.body_text()))?;
            Ok(Self::from_parts(fields, HashMap::new()))
        }
    }
}
