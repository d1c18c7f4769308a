use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use jsonschema::error::ValidationErrorKind;
use jsonschema::{ValidationError, Validator};
use serde_json::Value;
use tracing::debug;

use super::{Contract, SchemaViolations, Violation};
use crate::ChirpyError;

static GLOBAL_REGISTRY: LazyLock<SchemaRegistry> = LazyLock::new(SchemaRegistry::default);

/// Compiled schemas, one per contract type.
///
/// Schemas are derived from the type on first use and the compiled validator
/// is kept for the rest of the process. The registry is shared by every client,
/// so a schema is compiled once even when many tests run concurrently.
#[derive(Default)]
pub struct SchemaRegistry {
    entries: RwLock<HashMap<TypeId, Arc<CompiledSchema>>>,
}

struct CompiledSchema {
    name: String,
    schema: Value,
    validator: Validator,
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut names = entries
            .values()
            .map(|it| it.name.as_str())
            .collect::<Vec<_>>();
        names.sort_unstable();
        f.debug_tuple("SchemaRegistry").field(&names).finish()
    }
}

impl SchemaRegistry {
    /// The process-wide registry used by [`UntypedBody::parse`](super::UntypedBody::parse).
    pub fn global() -> &'static Self {
        &GLOBAL_REGISTRY
    }

    /// Validates `value` against the schema of `T`, then deserializes it.
    ///
    /// Validation does not stop at the first problem: every missing field and
    /// every wrong kind is reported. Fields the schema does not declare are
    /// accepted, the server is free to add them.
    ///
    /// # Errors
    ///
    /// Returns [`ChirpyError::SchemaValidation`] with all violations, or
    /// [`ChirpyError::InvalidSchema`] if the schema of `T` cannot be compiled.
    pub fn parse<T>(&self, value: &Value) -> Result<T, ChirpyError>
    where
        T: Contract,
    {
        let compiled = self.compiled::<T>()?;

        let violations = compiled
            .validator
            .iter_errors(value)
            .map(|error| violation_from(&error))
            .collect::<Vec<_>>();
        if !violations.is_empty() {
            debug!(schema = %compiled.name, count = violations.len(), "schema validation failed");
            return Err(SchemaViolations::new(compiled.name.clone(), violations).into());
        }

        // The schema accepted the value, remaining failures come from serde
        // refinements the schema cannot express (e.g. a custom deserializer).
        serde_path_to_error::deserialize(value).map_err(|error| {
            let path = pointer_from_serde_path(&error.path().to_string());
            let violation = Violation::new(path, error.into_inner().to_string());
            SchemaViolations::new(compiled.name.clone(), vec![violation]).into()
        })
    }

    /// The JSON Schema derived from `T`.
    ///
    /// # Errors
    ///
    /// Fails if the schema cannot be compiled.
    pub fn json_schema<T>(&self) -> Result<Value, ChirpyError>
    where
        T: Contract,
    {
        Ok(self.compiled::<T>()?.schema.clone())
    }

    /// A flat description of the fields of `T`: name, kind and whether it is required.
    ///
    /// # Errors
    ///
    /// Fails if the schema cannot be compiled.
    pub fn describe<T>(&self) -> Result<SchemaDescription, ChirpyError>
    where
        T: Contract,
    {
        let compiled = self.compiled::<T>()?;
        Ok(SchemaDescription::from_schema(&compiled.name, &compiled.schema))
    }

    /// Names of the schemas compiled so far, sorted.
    pub fn names(&self) -> Vec<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut names = entries
            .values()
            .map(|it| it.name.clone())
            .collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    fn compiled<T>(&self) -> Result<Arc<CompiledSchema>, ChirpyError>
    where
        T: Contract,
    {
        let id = TypeId::of::<T>();
        if let Some(compiled) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
        {
            return Ok(Arc::clone(compiled));
        }

        let name = T::name().into_owned();
        let schema = serde_json::to_value(T::schema()).map_err(|error| {
            ChirpyError::InvalidSchema {
                name: name.clone(),
                message: error.to_string(),
            }
        })?;
        let validator =
            jsonschema::validator_for(&schema).map_err(|error| ChirpyError::InvalidSchema {
                name: name.clone(),
                message: error.to_string(),
            })?;
        debug!(%name, rust_type = type_name::<T>(), "schema compiled");

        let compiled = Arc::new(CompiledSchema {
            name,
            schema,
            validator,
        });
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.entry(id).or_insert(compiled);
        Ok(Arc::clone(entry))
    }
}

fn violation_from(error: &ValidationError<'_>) -> Violation {
    let path = error.instance_path().to_string();
    // A missing property is reported on its parent object, point at the field instead.
    let path = match error.kind() {
        ValidationErrorKind::Required { property, .. } => match property.as_str() {
            Some(property) => format!("{path}/{property}"),
            None => path,
        },
        _ => path,
    };
    Violation::new(path, error.to_string())
}

fn pointer_from_serde_path(path: &str) -> String {
    if path == "." {
        return "/".to_owned();
    }
    let segments = path
        .split('.')
        .flat_map(|segment| segment.split(['[', ']']))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>();
    format!("/{}", segments.join("/"))
}

/// Field-level description of a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDescription {
    name: String,
    fields: Vec<FieldDescription>,
}

/// One declared field of a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescription {
    /// Property name.
    pub name: String,
    /// JSON kind, e.g. `string`, `boolean` or `string | null`.
    pub kind: String,
    /// Whether the property must be present.
    pub required: bool,
}

impl SchemaDescription {
    fn from_schema(name: &str, schema: &Value) -> Self {
        let required = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect::<Vec<_>>())
            .unwrap_or_default();

        let fields = schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|properties| {
                properties
                    .iter()
                    .map(|(field, property)| FieldDescription {
                        name: field.clone(),
                        kind: kind_of(property),
                        required: required.contains(&field.as_str()),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            name: name.to_owned(),
            fields,
        }
    }

    /// Schema name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields.
    pub fn fields(&self) -> &[FieldDescription] {
        &self.fields
    }

    /// Looks up a declared field.
    pub fn field(&self, name: &str) -> Option<&FieldDescription> {
        self.fields.iter().find(|field| field.name == name)
    }
}

impl fmt::Display for SchemaDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.name)?;
        for field in &self.fields {
            let optional = if field.required { "" } else { "?" };
            write!(f, "\n  {}{optional}: {}", field.name, field.kind)?;
        }
        write!(f, "\n}}")
    }
}

fn kind_of(property: &Value) -> String {
    match property.get("type") {
        Some(Value::String(kind)) => kind.clone(),
        Some(Value::Array(kinds)) => kinds
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(" | "),
        _ if property.get("$ref").is_some() => "object".to_owned(),
        _ => "any".to_owned(),
    }
}
