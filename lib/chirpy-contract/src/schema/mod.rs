//! Schema declarations and runtime validation.
//!
//! A schema is a plain Rust type deriving [`serde::Deserialize`] and
//! [`utoipa::ToSchema`]. The JSON Schema that `utoipa` derives from the type is
//! the declarative description of the shape; [`SchemaRegistry`] compiles it once
//! and validates untyped JSON against it, reporting **every** violation before
//! the value is turned into the typed form.
//!
//! ```rust
//! use chirpy_contract::schema::{SchemaRegistry, UntypedBody};
//! use serde::Deserialize;
//! use utoipa::ToSchema;
//!
//! #[derive(Debug, Deserialize, ToSchema)]
//! struct Greeting {
//!     message: String,
//!     loud: bool,
//! }
//!
//! let body = UntypedBody::from(serde_json::json!({ "message": 42 }));
//! let error = body.parse::<Greeting>().unwrap_err();
//! assert!(error.to_string().contains("/message"));
//! assert!(error.to_string().contains("/loud"));
//!
//! let description = SchemaRegistry::global().describe::<Greeting>()?;
//! assert_eq!(description.fields().len(), 2);
//! # Ok::<(), chirpy_contract::ChirpyError>(())
//! ```

use serde::de::DeserializeOwned;
use utoipa::ToSchema;

mod registry;
pub use self::registry::{FieldDescription, SchemaDescription, SchemaRegistry};

mod untyped;
pub use self::untyped::UntypedBody;

mod violations;
pub use self::violations::{SchemaViolations, Violation};

/// A type usable as a request or response schema.
///
/// Implemented for every `'static` type that is both deserializable and
/// described by `utoipa`, so declaring a schema is only a matter of deriving
/// `Deserialize` and `ToSchema`.
pub trait Contract: DeserializeOwned + ToSchema + 'static {}

impl<T> Contract for T where T: DeserializeOwned + ToSchema + 'static {}

/// Validates `value` against the schema of `T` using the global registry.
///
/// # Errors
///
/// Returns [`ChirpyError::SchemaValidation`](crate::ChirpyError::SchemaValidation)
/// listing every violation, or
/// [`ChirpyError::InvalidSchema`](crate::ChirpyError::InvalidSchema) if the
/// schema of `T` cannot be compiled.
pub fn parse<T>(value: &serde_json::Value) -> Result<T, crate::ChirpyError>
where
    T: Contract,
{
    SchemaRegistry::global().parse(value)
}
