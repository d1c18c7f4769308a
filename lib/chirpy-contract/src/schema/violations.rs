use std::fmt;

/// One field-level deviation from a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON pointer to the offending value, `/` for the whole document.
    pub path: String,
    /// What is wrong at that path.
    pub reason: String,
}

impl Violation {
    pub(crate) fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        let path = path.into();
        let path = if path.is_empty() { "/".to_owned() } else { path };
        Self {
            path,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

/// Every violation found while validating a value against a named schema.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error)]
pub struct SchemaViolations {
    schema: String,
    violations: Vec<Violation>,
}

impl SchemaViolations {
    pub(crate) fn new(schema: impl Into<String>, violations: Vec<Violation>) -> Self {
        Self {
            schema: schema.into(),
            violations,
        }
    }

    /// Name of the schema the value was validated against.
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// All violations, in the order they were found.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Whether a violation was reported at `path`.
    pub fn has_path(&self, path: &str) -> bool {
        self.violations.iter().any(|violation| violation.path == path)
    }
}

impl fmt::Display for SchemaViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.violations.len();
        let plural = if count == 1 { "" } else { "s" };
        write!(
            f,
            "value does not match schema `{}` ({count} violation{plural})",
            self.schema
        )?;
        for violation in &self.violations {
            write!(f, "\n  - {violation}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_root_path() {
        let violation = Violation::new("", "null is not of type \"object\"");

        assert_eq!(violation.path, "/");
    }

    #[test]
    fn should_list_every_violation_on_display() {
        let violations = SchemaViolations::new(
            "Chirp",
            vec![
                Violation::new("/body", "\"body\" is a required property"),
                Violation::new("/user_id", "42 is not of type \"string\""),
            ],
        );

        assert!(violations.has_path("/user_id"));
        assert!(!violations.has_path("/id"));
        insta::assert_snapshot!(violations, @r#"
        value does not match schema `Chirp` (2 violations)
          - /body: "body" is a required property
          - /user_id: 42 is not of type "string"
        "#);
    }
}
