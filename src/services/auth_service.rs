use std::sync::{Arc, LazyLock};

use chrono::Utc;
use regex::Regex;
use sea_orm::Set;
use uuid::Uuid;

use crate::errors::{AuthError, ServiceError};
use crate::services::crypto;
use crate::services::TokenService;
use crate::stores::UserStore;
use crate::types::db::user;
use crate::types::internal::role::Role;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email pattern")
});

fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Registration input
#[derive(Debug, Clone)]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub role: String,
    pub phone: Option<String>,
}

/// Credential store operations: registration and login
pub struct AuthService {
    user_store: Arc<UserStore>,
    token_service: Arc<TokenService>,
    min_password_length: usize,
}

impl AuthService {
    /// Create a new AuthService
    ///
    /// # Arguments
    /// * `user_store` - Repository for user rows
    /// * `token_service` - Issuer for identity claims
    /// * `min_password_length` - Minimum accepted password length
    pub fn new(
        user_store: Arc<UserStore>,
        token_service: Arc<TokenService>,
        min_password_length: usize,
    ) -> Self {
        Self {
            user_store,
            token_service,
            min_password_length,
        }
    }

    /// Register a new user
    ///
    /// Validates in order: required fields, email format, password strength,
    /// role, duplicate username, duplicate email. Email and role are stored
    /// lower-cased; the password is stored as an Argon2id digest.
    ///
    /// The duplicate checks here are a fast path; under concurrent
    /// registration the unique constraints decide, and `UserStore::insert`
    /// maps the violation to the same `Duplicate*` error.
    pub async fn register(&self, input: Registration) -> Result<user::Model, ServiceError> {
        if input.full_name.trim().is_empty()
            || input.email.trim().is_empty()
            || input.username.trim().is_empty()
            || input.password.is_empty()
            || input.role.trim().is_empty()
        {
            return Err(AuthError::MissingFields.into());
        }

        if !is_valid_email(&input.email) {
            return Err(AuthError::InvalidEmail.into());
        }

        if input.password.len() < self.min_password_length {
            return Err(AuthError::WeakPassword {
                min_length: self.min_password_length,
            }
            .into());
        }

        let role = Role::parse(&input.role)
            .ok_or_else(|| ServiceError::Auth(AuthError::InvalidRole(input.role.clone())))?;

        let email = input.email.to_lowercase();

        if self
            .user_store
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AuthError::DuplicateUsername.into());
        }

        if self.user_store.find_by_email(&email).await?.is_some() {
            return Err(AuthError::DuplicateEmail.into());
        }

        let password_hash = crypto::hash_password(&input.password)?;

        let new_user = user::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            full_name: Set(input.full_name),
            email: Set(email),
            username: Set(input.username),
            password_hash: Set(password_hash),
            role: Set(role.as_str().to_string()),
            phone: Set(input.phone),
            is_active: Set(true),
            created_at: Set(Utc::now()),
        };

        self.user_store.insert(new_user).await
    }

    /// Authenticate by email and password, issuing an identity claim
    ///
    /// The credential check runs before the active check: a wrong password on
    /// an inactive account reports `InvalidCredentials`, not
    /// `AccountInactive`. Preserve this order.
    ///
    /// # Returns
    /// * `Ok((String, user::Model))` - Access token and the authenticated user
    /// * `Err(ServiceError)` - Validation or credential failure
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(String, user::Model), ServiceError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields.into());
        }

        if !is_valid_email(email) {
            return Err(AuthError::InvalidEmail.into());
        }

        let user = self.user_store.find_by_email(&email.to_lowercase()).await?;

        let user = match user {
            Some(user) if crypto::verify_password(&user.password_hash, password) => user,
            _ => return Err(AuthError::InvalidCredentials.into()),
        };

        if !user.is_active {
            return Err(AuthError::AccountInactive.into());
        }

        let token = self.token_service.issue(&user.email)?;

        Ok((token, user))
    }
}
