use reqwest::multipart::{Form, Part};

use crate::ChirpyError;

/// A `multipart/form-data` body.
///
/// Parts keep the order in which they were added.
#[derive(Debug, Clone, Default)]
pub struct Multipart {
    parts: Vec<(String, MultipartPart)>,
}

#[derive(Debug, Clone)]
enum MultipartPart {
    Text(String),
    File {
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

impl Multipart {
    /// An empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts
            .push((name.into(), MultipartPart::Text(value.into())));
        self
    }

    /// Adds a file field.
    ///
    /// `content_type` is a [`mime::Mime`] or its text form, checked when sent.
    #[must_use]
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl AsRef<str>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        let part = MultipartPart::File {
            file_name: file_name.into(),
            content_type: content_type.as_ref().to_owned(),
            bytes: bytes.into(),
        };
        self.parts.push((name.into(), part));
        self
    }

    /// Number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether the form has no part.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub(crate) fn into_form(self) -> Result<Form, ChirpyError> {
        let mut form = Form::new();
        for (name, part) in self.parts {
            form = match part {
                MultipartPart::Text(value) => form.text(name, value),
                MultipartPart::File {
                    file_name,
                    content_type,
                    bytes,
                } => {
                    let part = Part::bytes(bytes)
                        .file_name(file_name)
                        .mime_str(&content_type)
                        .map_err(|error| ChirpyError::InvalidMultipart {
                            name: name.clone(),
                            message: error.to_string(),
                        })?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}
