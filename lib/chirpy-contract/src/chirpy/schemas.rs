use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::SecureString;

/// Credentials sent to `POST /api/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    #[schema(value_type = String)]
    pub password: SecureString,
}

impl LoginRequest {
    /// JSON pointer of the password in the serialized request.
    pub const PASSWORD_POINTER: &str = "/password";

    /// Credentials for `email`.
    pub fn new(email: impl Into<String>, password: impl Into<SecureString>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Successful answer of `POST /api/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// User id.
    pub id: String,
    /// Account creation timestamp.
    pub created_at: String,
    /// Last account update timestamp.
    pub updated_at: String,
    /// Account email.
    pub email: String,
    /// Whether the account has the premium membership.
    pub is_chirpy_red: bool,
    /// Access token, sent as `Authorization: Bearer <token>`.
    #[schema(value_type = String)]
    pub token: SecureString,
    /// Token used to obtain a new access token.
    #[schema(value_type = String)]
    pub refresh_token: SecureString,
}

/// Body of `POST /api/chirps`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreateChirp {
    /// The chirp text.
    pub body: String,
    /// When the chirp expires.
    pub expiration_datetime: String,
}

impl CreateChirp {
    /// A chirp with the given text and expiry.
    pub fn new(body: impl Into<String>, expiration_datetime: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            expiration_datetime: expiration_datetime.into(),
        }
    }
}

/// A chirp as stored by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Chirp {
    /// Chirp id.
    pub id: String,
    /// Display name of the author.
    pub author_name: String,
    /// The chirp text.
    pub body: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
    /// When the chirp expires.
    pub expiration_datetime: String,
    /// Id of the author.
    pub user_id: String,
}

/// Error payload returned with 4xx statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human readable reason.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ChirpyError;
    use crate::schema::{SchemaRegistry, UntypedBody};

    fn login_response() -> serde_json::Value {
        json!({
            "id": "0190b3c2-7a9e-7d3c-9f5e-2d6b7c8a9f01",
            "created_at": "2026-10-14T08:00:00Z",
            "updated_at": "2026-10-14T08:00:00Z",
            "email": "walt@breakingbad.com",
            "is_chirpy_red": false,
            "token": "eyJhbGciOiJIUzI1NiJ9.access",
            "refresh_token": "56aa826d22baab4b5ec2cea41a59ecbba03e542aedbb31d9b80326ac8ffcfa2a"
        })
    }

    #[test]
    fn should_parse_login_response() {
        let response = UntypedBody::from(login_response())
            .parse::<LoginResponse>()
            .expect("valid login response");

        assert_eq!(response.email, "walt@breakingbad.com");
        assert!(!response.is_chirpy_red);
        assert!(response.token.equals_str("eyJhbGciOiJIUzI1NiJ9.access"));
    }

    #[test]
    fn should_list_every_login_response_violation() {
        let mut value = login_response();
        value["is_chirpy_red"] = json!("no");
        if let Some(object) = value.as_object_mut() {
            object.remove("token");
        }

        let error = UntypedBody::from(value)
            .parse::<LoginResponse>()
            .expect_err("broken contract");

        let ChirpyError::SchemaValidation(violations) = error else {
            panic!("expected schema violations, got {error:?}");
        };
        assert!(violations.has_path("/is_chirpy_red"));
        assert!(violations.has_path("/token"));
        assert_eq!(violations.violations().len(), 2);
    }

    #[test]
    fn should_describe_chirp() {
        let description = SchemaRegistry::global()
            .describe::<Chirp>()
            .expect("valid schema");

        insta::assert_snapshot!(description, @r"
        Chirp {
          author_name: string
          body: string
          created_at: string
          expiration_datetime: string
          id: string
          updated_at: string
          user_id: string
        }
        ");
    }

    #[test]
    fn should_serialize_password_for_login() {
        let request = LoginRequest::new("walt@breakingbad.com", "123456");

        let json = serde_json::to_value(&request).expect("serializable");

        assert_eq!(json, json!({"email": "walt@breakingbad.com", "password": "123456"}));
        assert!(!format!("{request:?}").contains("123456"));
    }
}
