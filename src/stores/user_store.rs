use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, SqlErr};

use crate::errors::{AuthError, ServiceError};
use crate::types::db::user::{self, Entity as User};

/// Repository for user rows
///
/// Duplicate detection ultimately rests on the unique constraints on
/// `users.email` and `users.username`; callers may pre-check for a friendlier
/// fast path, but `insert` maps constraint violations to the matching
/// `Duplicate*` error either way.
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create a new UserStore with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Look up a user by email. Expects the lower-cased form, which is the
    /// stored form.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, ServiceError> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::database("find_user_by_email", e))
    }

    /// Look up a user by username (exact match)
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<user::Model>, ServiceError> {
        User::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::database("find_user_by_username", e))
    }

    /// Insert a new user row
    ///
    /// # Returns
    /// * `Ok(user::Model)` - The created user
    /// * `Err(ServiceError)` - `DuplicateUsername`/`DuplicateEmail` on unique
    ///   constraint violation, or a database error
    pub async fn insert(&self, user: user::ActiveModel) -> Result<user::Model, ServiceError> {
        user.insert(&self.db).await.map_err(|e| {
            if let Some(SqlErr::UniqueConstraintViolation(message)) = e.sql_err() {
                if message.contains("username") {
                    return ServiceError::Auth(AuthError::DuplicateUsername);
                }
                if message.contains("email") {
                    return ServiceError::Auth(AuthError::DuplicateEmail);
                }
            }
            ServiceError::database("insert_user", e)
        })
    }
}
