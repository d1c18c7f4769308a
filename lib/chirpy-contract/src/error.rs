use std::fmt::Debug;

use http::StatusCode;

use crate::schema::SchemaViolations;

/// Errors raised by the transport, the clients, and the schema layer.
///
/// Nothing in this crate recovers from an error: each variant surfaces to the
/// calling test and fails it. The three contract-related failures are kept
/// apart so a report tells *how* the backend diverged:
///
/// - [`Transport`](Self::Transport): no response at all,
/// - [`StatusMismatch`](Self::StatusMismatch): a response with the wrong status,
/// - [`SchemaValidation`](Self::SchemaValidation): the right status with a body
///   that no longer matches its declared schema.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum ChirpyError {
    /// No response was received (connection refused, DNS failure, timeout).
    #[display("no response received: {_0}")]
    Transport(reqwest::Error),

    /// A response arrived with a status other than the one the operation expects.
    #[display("expected status {expected} but got {actual}: {body}")]
    #[from(skip)]
    StatusMismatch {
        /// The status the operation is bound to.
        expected: StatusCode,
        /// The status actually returned.
        actual: StatusCode,
        /// The (possibly truncated) response body.
        body: String,
    },

    /// The response body does not satisfy its schema.
    #[display("{_0}")]
    SchemaValidation(SchemaViolations),

    /// The derived schema of a contract type cannot be compiled.
    #[display("invalid schema for {name}: {message}")]
    #[from(skip)]
    InvalidSchema {
        /// The contract type name.
        name: String,
        /// Why the schema was rejected.
        message: String,
    },

    /// A request carries both a JSON body and a multipart body.
    #[display("a request cannot carry both a JSON body and a multipart body")]
    #[from(skip)]
    ConflictingBody,

    /// A multipart part cannot be built.
    #[display("invalid multipart part `{name}`: {message}")]
    #[from(skip)]
    InvalidMultipart {
        /// The part name.
        name: String,
        /// Why the part was rejected.
        message: String,
    },

    /// A value cannot be used as a single path segment.
    #[display("invalid path segment `{value}`")]
    #[from(skip)]
    InvalidPathSegment {
        /// The rejected value.
        value: String,
    },

    /// The request URL cannot be built.
    #[display("invalid URL: {_0}")]
    Url(url::ParseError),

    /// A header name is not a valid HTTP header name.
    #[display("invalid header name: {_0}")]
    InvalidHeaderName(http::header::InvalidHeaderName),

    /// A header value contains characters not allowed by HTTP.
    #[display("invalid header value: {_0}")]
    InvalidHeaderValue(http::header::InvalidHeaderValue),

    /// The request body cannot be serialized as JSON.
    #[display("cannot serialize request body: {_0}")]
    Json(serde_json::Error),

    /// The configuration cannot be loaded.
    #[display("cannot load configuration: {_0}")]
    Config(Box<figment::Error>),

    /// The configuration was loaded but holds an unusable value.
    #[display("invalid configuration: {message}")]
    #[from(skip)]
    InvalidConfig {
        /// What is wrong with the configuration.
        message: String,
    },
}

impl From<figment::Error> for ChirpyError {
    fn from(error: figment::Error) -> Self {
        Self::Config(Box::new(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chirpy_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<ChirpyError>();
        assert_sync::<ChirpyError>();
    }

    #[test]
    fn should_display_status_mismatch_with_both_codes() {
        let error = ChirpyError::StatusMismatch {
            expected: StatusCode::OK,
            actual: StatusCode::UNAUTHORIZED,
            body: r#"{"error":"Unauthorized"}"#.to_owned(),
        };

        insta::assert_snapshot!(error, @r#"expected status 200 OK but got 401 Unauthorized: {"error":"Unauthorized"}"#);
    }
}
