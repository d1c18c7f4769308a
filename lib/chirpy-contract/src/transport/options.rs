use std::fmt;

use http::Method;
use indexmap::IndexMap;
use serde::Serialize;

use super::Multipart;
use crate::ChirpyError;
use crate::auth::REDACTED;

/// Value of a query parameter.
#[derive(Debug, Clone, PartialEq, derive_more::From)]
pub enum ParamValue {
    /// A text value, sent verbatim.
    Text(String),
    /// A number, sent in its JSON form.
    Number(serde_json::Number),
    /// A boolean, sent as `true` or `false`.
    Bool(bool),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

macro_rules! param_from_integer {
    ($($int:ty),*) => {
        $(
            impl From<$int> for ParamValue {
                fn from(value: $int) -> Self {
                    Self::Number(value.into())
                }
            }
        )*
    };
}

param_from_integer!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{text}"),
            Self::Number(number) => write!(f, "{number}"),
            Self::Bool(flag) => write!(f, "{flag}"),
        }
    }
}

/// Options of a single call: method, headers, body and query parameters.
///
/// Built fresh for every call and consumed by it.
///
/// ```rust
/// use chirpy_contract::transport::RequestOptions;
///
/// # fn example() -> Result<(), chirpy_contract::ChirpyError> {
/// let options = RequestOptions::post()
///     .with_header("X-Request-Id", "42")
///     .with_param("author_id", "7f3c")
///     .with_optional_param("sort", None::<&str>)
///     .json(&serde_json::json!({ "body": "hello" }))?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, derive_more::Debug)]
pub struct RequestOptions {
    pub(crate) method: Method,
    pub(crate) headers: IndexMap<String, String>,
    #[debug(ignore)]
    pub(crate) data: Option<serde_json::Value>,
    #[debug(ignore)]
    pub(crate) multipart: Option<Multipart>,
    pub(crate) params: IndexMap<String, Option<ParamValue>>,
    sensitive: Vec<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(Method::GET)
    }
}

impl RequestOptions {
    /// Options for the given method, with no header, body or parameter.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: IndexMap::new(),
            data: None,
            multipart: None,
            params: IndexMap::new(),
            sensitive: Vec::new(),
        }
    }

    /// A `GET` call.
    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    /// A `POST` call.
    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    /// A `PUT` call.
    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    /// A `DELETE` call.
    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    /// Adds a header for this call only; it overrides a client header with the same name.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.into(), Some(value.into()));
        self
    }

    /// Adds a query parameter that is left out of the URL when `None`.
    #[must_use]
    pub fn with_optional_param<V>(mut self, name: impl Into<String>, value: Option<V>) -> Self
    where
        V: Into<ParamValue>,
    {
        self.params.insert(name.into(), value.map(Into::into));
        self
    }

    /// Sets a JSON body.
    ///
    /// # Errors
    ///
    /// Fails if `data` cannot be serialized.
    pub fn json<T>(mut self, data: &T) -> Result<Self, ChirpyError>
    where
        T: Serialize + ?Sized,
    {
        self.data = Some(serde_json::to_value(data)?);
        Ok(self)
    }

    /// Marks a JSON body field, as a JSON pointer like `/password`, as secret.
    ///
    /// The field is sent as is but shown as `[REDACTED]` in the request log.
    #[must_use]
    pub fn with_sensitive_field(mut self, pointer: impl Into<String>) -> Self {
        self.sensitive.push(pointer.into());
        self
    }

    /// Sets a multipart body.
    ///
    /// A call with both a JSON and a multipart body is rejected when sent.
    #[must_use]
    pub fn multipart(mut self, form: Multipart) -> Self {
        self.multipart = Some(form);
        self
    }

    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Per-call headers.
    pub fn headers(&self) -> &IndexMap<String, String> {
        &self.headers
    }

    /// The body as written in the request log, sensitive fields redacted.
    pub(crate) fn logged_body(&self) -> Result<String, ChirpyError> {
        match (&self.data, &self.multipart) {
            (Some(data), _) => {
                let mut data = data.clone();
                for pointer in &self.sensitive {
                    if let Some(value) = data.pointer_mut(pointer) {
                        *value = serde_json::Value::String(REDACTED.to_owned());
                    }
                }
                Ok(serde_json::to_string(&data)?)
            }
            (None, Some(_)) => Ok("<multipart>".to_owned()),
            (None, None) => Ok("<empty>".to_owned()),
        }
    }

    /// Query parameters as they will appear in the URL, undefined ones skipped.
    pub fn defined_params(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.params
            .iter()
            .filter_map(|(name, value)| value.as_ref().map(|value| (name.as_str(), value)))
    }
}
