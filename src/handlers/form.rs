use std::collections::HashMap;
use std::str::FromStr;

use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::http::StatusCode;
use rust_decimal::Decimal;

use crate::error::ApiError;
use crate::storage::UploadedFile;

/// Text fields and file parts of a `multipart/form-data` body.
/// Field names are matched case-insensitively.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl FormData {
    pub async fn read(multipart: Result<Multipart, MultipartRejection>) -> Result<Self, ApiError> {
        let mut multipart = multipart.map_err(|e| ApiError::bad_request(e.body_text()))?;
        let mut form = FormData::default();

        while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
            let Some(name) = field.name().map(|n| n.to_ascii_lowercase()) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await.map_err(bad_multipart)?;
                    form.files.insert(
                        name,
                        UploadedFile { file_name, content_type, bytes: bytes.to_vec() },
                    );
                }
                None => {
                    let value = field.text().await.map_err(bad_multipart)?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    /// Field value, or empty when absent
    pub fn text(&self, name: &str) -> String {
        self.fields.get(&name.to_ascii_lowercase()).cloned().unwrap_or_default()
    }

    /// Field value when present and not blank
    pub fn optional(&self, name: &str) -> Option<String> {
        self.fields
            .get(&name.to_ascii_lowercase())
            .filter(|v| !v.trim().is_empty())
            .cloned()
    }

    /// Numeric id field; absent or unparseable values read as 0
    pub fn int(&self, name: &str) -> i32 {
        self.optional(name)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    pub fn decimal(&self, name: &str) -> Result<Option<Decimal>, ApiError> {
        self.optional(name)
            .map(|v| {
                Decimal::from_str(v.trim())
                    .map_err(|_| ApiError::bad_request(format!("Field '{}' must be a number", name)))
            })
            .transpose()
    }

    pub fn file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(&name.to_ascii_lowercase())
    }

    #[cfg(test)]
    pub(crate) fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
                .collect(),
            files: HashMap::new(),
        }
    }
}

fn bad_multipart(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::payload_too_large(err.body_text());
    }
    ApiError::bad_request(format!("Invalid multipart form: {}", err.body_text()))
}
