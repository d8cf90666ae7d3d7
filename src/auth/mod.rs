pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};

use crate::models::PublicUser;

pub use extractors::CurrentUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenKeys};

/// Payload for a signup request. Fields are optional at the serde level so
/// that an absent field and an empty one both reach the handler's presence
/// check and produce the same wire message.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub password: Option<String>,
}

/// Payload for a signin request.
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Response body for successful signup and signin.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: PublicUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_request_accepts_camel_case_full_name() {
        let req: SignupRequest = serde_json::from_str(
            r#"{"email":"a@b.com","fullName":"Ada Lovelace","password":"Abc12345!"}"#,
        )
        .unwrap();
        assert_eq!(req.full_name.as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn test_signup_request_tolerates_missing_fields() {
        // Presence is checked in the handler, not at deserialization, so a
        // partial body still parses.
        let req: SignupRequest = serde_json::from_str(r#"{"email":"a@b.com"}"#).unwrap();
        assert!(req.full_name.is_none());
        assert!(req.password.is_none());
    }
}
