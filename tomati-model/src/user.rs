//! User accounts and authentication payloads
//!
//! ## Authentication Flow
//!
//! 1. **Signup**: Users create an account with email and password
//! 2. **Signin**: Credentials are verified, returning a bearer JWT
//! 3. **Requests**: The JWT is presented as `Authorization: Bearer <token>`
//!
//! Passwords are hashed with Argon2id before persistence; the hash never
//! leaves the storage layer and is not part of [`User`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role attached to a user account, controls access to admin endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(UserRole::User),
            "admin" => Ok(UserRole::Admin),
            other => Err(format!("unknown user role: {other}")),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registered user account.
///
/// The password hash is deliberately absent so the type can be serialized
/// into responses without leaking credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// Unique email address used for signin
    pub email: String,
    /// Display name shown next to listings and messages
    pub display_name: Option<String>,
    /// Access role, `user` or `admin`
    pub role: UserRole,
    /// Timestamp of account creation
    pub created_at: DateTime<Utc>,
    /// Timestamp of last profile update
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Name suitable for user-facing copy, falling back to the email.
    pub fn visible_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }

    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            role: self.role,
        }
    }
}

/// Trimmed user view embedded in auth responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub role: UserRole,
}

/// JWT claims carried by access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id
    pub sub: Uuid,
    /// Expiry, seconds since epoch
    pub exp: i64,
    /// Issued-at, seconds since epoch
    pub iat: i64,
    /// Token identifier
    pub jti: String,
}

/// Payload for `POST /api/auth/signup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl RegisterRequest {
    /// Minimal structural validation before touching storage.
    pub fn validate(&self) -> Result<(), String> {
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err("a valid email address is required".to_string());
        }
        if self.password.len() < 6 {
            return Err(
                "password must be at least 6 characters".to_string()
            );
        }
        Ok(())
    }
}

/// Payload for `POST /api/auth/signin`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response body for both signup and signin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: PublicUser,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!(UserRole::Admin.as_str(), "admin");
        assert!("root".parse::<UserRole>().is_err());
    }

    #[test]
    fn register_request_rejects_bad_input() {
        let request = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "secret99".to_string(),
            display_name: None,
        };
        assert!(request.validate().is_err());

        let request = RegisterRequest {
            email: "amina@tomati.tn".to_string(),
            password: "short".to_string(),
            display_name: None,
        };
        assert!(request.validate().is_err());

        let request = RegisterRequest {
            email: "amina@tomati.tn".to_string(),
            password: "secret99".to_string(),
            display_name: Some("Amina".to_string()),
        };
        assert!(request.validate().is_ok());
    }
}
