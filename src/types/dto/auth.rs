use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::user;

/// Request model for user registration
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Full display name
    pub full_name: String,

    /// Email address (stored lower-cased, globally unique)
    pub email: String,

    /// Username (globally unique)
    pub username: String,

    /// Plaintext password, hashed before storage
    pub password: String,

    /// Role name, case-insensitive
    pub role: String,

    /// Contact phone number
    pub phone: Option<String>,
}

/// User fields safe to return to callers (never includes the password digest)
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UserSummary {
    /// User ID (UUID)
    pub id: String,

    /// Full display name
    pub full_name: String,

    /// Email address
    pub email: String,

    /// Username
    pub username: String,

    /// Role (lower-cased)
    pub role: String,

    /// Contact phone number
    pub phone: Option<String>,
}

impl From<user::Model> for UserSummary {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            username: user.username,
            role: user.role,
            phone: user.phone,
        }
    }
}

/// Response model for registration
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Success message
    pub message: String,

    /// The created user
    pub user: UserSummary,
}

/// Request model for login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email address
    pub email: String,

    /// Plaintext password
    pub password: String,
}

/// Response model for login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Success message
    pub message: String,

    /// JWT access token for API authentication
    pub access_token: String,

    /// The authenticated user
    pub user: UserSummary,
}
