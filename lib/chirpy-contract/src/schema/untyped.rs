use std::fmt;

use serde_json::Value;

use super::{Contract, SchemaRegistry};
use crate::ChirpyError;

/// A response body that has not been validated yet.
///
/// The only way to get a typed value out of it is [`parse`](Self::parse), which
/// runs the schema of the target type first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UntypedBody(Value);

impl UntypedBody {
    /// Validates the body against the schema of `T` and returns the typed value.
    ///
    /// # Errors
    ///
    /// Fails with every schema violation found.
    pub fn parse<T>(&self) -> Result<T, ChirpyError>
    where
        T: Contract,
    {
        SchemaRegistry::global().parse(&self.0)
    }

    /// The raw JSON, for diagnostics and negative-path assertions only.
    pub fn as_untyped(&self) -> &Value {
        &self.0
    }

    /// Whether the response had no body.
    pub fn is_empty(&self) -> bool {
        self.0.is_null()
    }
}

impl From<Value> for UntypedBody {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl fmt::Display for UntypedBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(text) => write!(f, "{text}"),
            other => write!(f, "{other}"),
        }
    }
}
