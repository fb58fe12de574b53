use super::error::ClientError;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// Request payload. Multipart bodies are kept as plain parts so the same request
/// can be rebuilt for the replay after a token refresh.
#[derive(Clone, Debug)]
pub enum RequestBody {
    Json(Value),
    Multipart(MultipartBody),
}

impl RequestBody {
    /// # Errors
    /// Returns an error if `value` cannot be represented as JSON.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, ClientError> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(ClientError::Encode)
    }

    #[must_use]
    pub fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }
}

#[derive(Clone, Debug)]
enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        mime: Option<String>,
        bytes: Vec<u8>,
    },
}

#[derive(Clone, Debug, Default)]
pub struct MultipartBody {
    parts: Vec<FormPart>,
}

impl MultipartBody {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
        mime: Option<&str>,
    ) -> Self {
        self.parts.push(FormPart::File {
            name: name.into(),
            file_name: file_name.into(),
            mime: mime.map(str::to_string),
            bytes,
        });
        self
    }

    /// Reads a file from disk into a file part named `name`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read.
    pub async fn file_from_path(self, name: &str, path: &Path) -> Result<Self, ClientError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|err| ClientError::Multipart(format!("{}: {err}", path.display())))?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());

        Ok(self.file(name, file_name, bytes, None))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub(crate) fn to_form(&self) -> Result<Form, ClientError> {
        let mut form = Form::new();

        for part in &self.parts {
            form = match part {
                FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
                FormPart::File {
                    name,
                    file_name,
                    mime,
                    bytes,
                } => {
                    let mut file = Part::bytes(bytes.clone()).file_name(file_name.clone());
                    if let Some(mime) = mime {
                        file = file.mime_str(mime).map_err(|err| {
                            ClientError::Multipart(format!("invalid mime type {mime}: {err}"))
                        })?;
                    }
                    form.part(name.clone(), file)
                }
            };
        }

        Ok(form)
    }
}
