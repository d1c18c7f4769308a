use headers::{ContentType, HeaderMapExt};
use http::StatusCode;
use http::header::HeaderMap;
use indexmap::IndexMap;
use serde_json::Value;

use crate::ChirpyError;
use crate::schema::{Contract, UntypedBody};

const BODY_MAX_LENGTH: usize = 1024;

/// A response normalized into one shape, whatever its status.
///
/// The body is kept [untyped](UntypedBody) until it is validated.
#[derive(Debug, Clone)]
pub struct UniformResponse {
    status: StatusCode,
    status_text: String,
    data: UntypedBody,
    headers: IndexMap<String, String>,
}

impl UniformResponse {
    pub(crate) fn new(status: StatusCode, headers: &HeaderMap, body: &str) -> Self {
        Self {
            status,
            status_text: status.canonical_reason().unwrap_or_default().to_owned(),
            data: parse_body(headers, body),
            headers: collect_headers(headers),
        }
    }

    /// The response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The canonical reason phrase of the status, e.g. `Created`.
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// The body, not validated yet.
    pub fn data(&self) -> &UntypedBody {
        &self.data
    }

    /// Response headers, names in lower case.
    pub fn headers(&self) -> &IndexMap<String, String> {
        &self.headers
    }

    /// Looks up a header, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Fails unless the status is `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`ChirpyError::StatusMismatch`] carrying the body for diagnosis.
    pub fn expect_status(&self, expected: StatusCode) -> Result<&Self, ChirpyError> {
        if self.status == expected {
            return Ok(self);
        }
        Err(ChirpyError::StatusMismatch {
            expected,
            actual: self.status,
            body: truncate(self.data.to_string()),
        })
    }

    /// Checks the status, then validates the body against the schema of `T`.
    ///
    /// # Errors
    ///
    /// [`ChirpyError::StatusMismatch`] when the status differs (the body is not
    /// validated at all), [`ChirpyError::SchemaValidation`] when it matches but
    /// the body does not satisfy the schema.
    pub fn into_validated<T>(self, expected: StatusCode) -> Result<T, ChirpyError>
    where
        T: Contract,
    {
        self.expect_status(expected)?;
        self.data.parse()
    }
}

fn parse_body(headers: &HeaderMap, body: &str) -> UntypedBody {
    if body.trim().is_empty() {
        return UntypedBody::default();
    }
    let declared_json = headers
        .typed_get::<ContentType>()
        .map(mime::Mime::from)
        .is_some_and(|mime| {
            mime.subtype() == mime::JSON || mime.suffix() == Some(mime::JSON)
        });
    match serde_json::from_str::<Value>(body) {
        Ok(value) => UntypedBody::from(value),
        Err(error) => {
            if declared_json {
                tracing::warn!(%error, "response declared as JSON is not valid JSON");
            }
            UntypedBody::from(Value::String(body.to_owned()))
        }
    }
}

fn collect_headers(headers: &HeaderMap) -> IndexMap<String, String> {
    let mut result = IndexMap::<String, String>::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        result
            .entry(name.as_str().to_owned())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    result
}

fn truncate(mut text: String) -> String {
    if text.len() <= BODY_MAX_LENGTH {
        return text;
    }
    let mut end = BODY_MAX_LENGTH;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
    text.push_str("... (truncated)");
    text
}
