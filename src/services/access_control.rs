use std::sync::Arc;

use crate::errors::{AuthError, ServiceError};
use crate::services::TokenService;
use crate::stores::UserStore;
use crate::types::db::user;
use crate::types::internal::role::Role;

/// Per-operation authorization check
///
/// Each guarded call site passes the roles it accepts explicitly; there is no
/// ambient role state. The check is pure and runs before the guarded
/// operation executes.
pub struct AccessControl {
    user_store: Arc<UserStore>,
    token_service: Arc<TokenService>,
}

impl AccessControl {
    /// Create a new AccessControl
    pub fn new(user_store: Arc<UserStore>, token_service: Arc<TokenService>) -> Self {
        Self {
            user_store,
            token_service,
        }
    }

    /// Resolve a bearer token to a live user and check its role
    ///
    /// # Returns
    /// * `Ok(user::Model)` - The acting user
    /// * `Err(ServiceError)` - `InvalidToken`/`ExpiredToken` when the claim
    ///   does not verify, `UserNotFound` when its subject no longer exists,
    ///   `AccountInactive`, or `Forbidden` when the role is not allowed
    pub async fn authorize(
        &self,
        token: &str,
        allowed_roles: &[Role],
    ) -> Result<user::Model, ServiceError> {
        let claims = self.token_service.validate(token)?;

        let user = self
            .user_store
            .find_by_email(&claims.sub)
            .await?
            .ok_or_else(|| ServiceError::Auth(AuthError::UserNotFound(claims.sub.clone())))?;

        if !user.is_active {
            return Err(AuthError::AccountInactive.into());
        }

        let role = Role::parse(&user.role)
            .ok_or_else(|| ServiceError::Auth(AuthError::InvalidRole(user.role.clone())))?;

        if !allowed_roles.contains(&role) {
            return Err(AuthError::Forbidden {
                required: allowed_roles
                    .iter()
                    .map(|r| r.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            }
            .into());
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, Set};
    use uuid::Uuid;

    async fn setup_test_db() -> (Arc<UserStore>, Arc<TokenService>, AccessControl) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let user_store = Arc::new(UserStore::new(db));
        let token_service = Arc::new(TokenService::new(
            "test-secret-key-minimum-32-characters-long".to_string(),
            24,
        ));
        let access_control = AccessControl::new(user_store.clone(), token_service.clone());

        (user_store, token_service, access_control)
    }

    async fn seed_user(store: &UserStore, email: &str, role: &str, active: bool) {
        store
            .insert(user::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                full_name: Set("Test User".to_string()),
                email: Set(email.to_string()),
                username: Set(email.to_string()),
                password_hash: Set("$argon2id$test".to_string()),
                role: Set(role.to_string()),
                phone: Set(None),
                is_active: Set(active),
                created_at: Set(Utc::now()),
            })
            .await
            .expect("Failed to seed user");
    }

    #[tokio::test]
    async fn test_authorize_passes_for_allowed_role() {
        let (store, tokens, access_control) = setup_test_db().await;
        seed_user(&store, "doc@x.com", "doctor", true).await;
        let token = tokens.issue("doc@x.com").unwrap();

        let user = access_control
            .authorize(&token, &[Role::Admin, Role::Doctor])
            .await
            .expect("Authorization should pass");

        assert_eq!(user.email, "doc@x.com");
    }

    #[tokio::test]
    async fn test_authorize_rejects_disallowed_role() {
        let (store, tokens, access_control) = setup_test_db().await;
        seed_user(&store, "nurse@x.com", "nurse", true).await;
        let token = tokens.issue("nurse@x.com").unwrap();

        let result = access_control.authorize(&token, &[Role::Admin]).await;

        match result {
            Err(ServiceError::Auth(AuthError::Forbidden { required })) => {
                assert_eq!(required, "admin");
            }
            other => panic!("Expected Forbidden, got {:?}", other.map(|u| u.email)),
        }
    }

    #[tokio::test]
    async fn test_authorize_role_check_is_case_insensitive() {
        let (store, tokens, access_control) = setup_test_db().await;
        // Role stored with unexpected casing still authorizes
        seed_user(&store, "doc@x.com", "Doctor", true).await;
        let token = tokens.issue("doc@x.com").unwrap();

        let result = access_control.authorize(&token, &[Role::Doctor]).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_authorize_any_authenticated_accepts_every_role() {
        let (store, tokens, access_control) = setup_test_db().await;
        seed_user(&store, "staff@x.com", "staff", true).await;
        let token = tokens.issue("staff@x.com").unwrap();

        let result = access_control.authorize(&token, &Role::ALL).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_authorize_rejects_inactive_account() {
        let (store, tokens, access_control) = setup_test_db().await;
        seed_user(&store, "gone@x.com", "admin", false).await;
        let token = tokens.issue("gone@x.com").unwrap();

        let result = access_control.authorize(&token, &[Role::Admin]).await;

        match result {
            Err(ServiceError::Auth(AuthError::AccountInactive)) => {}
            other => panic!("Expected AccountInactive, got {:?}", other.map(|u| u.email)),
        }
    }

    #[tokio::test]
    async fn test_authorize_rejects_claim_for_missing_user() {
        let (_store, tokens, access_control) = setup_test_db().await;
        let token = tokens.issue("nobody@x.com").unwrap();

        let result = access_control.authorize(&token, &Role::ALL).await;

        match result {
            Err(ServiceError::Auth(AuthError::UserNotFound(email))) => {
                assert_eq!(email, "nobody@x.com");
            }
            other => panic!("Expected UserNotFound, got {:?}", other.map(|u| u.email)),
        }
    }

    #[tokio::test]
    async fn test_authorize_rejects_garbage_token() {
        let (_store, _tokens, access_control) = setup_test_db().await;

        let result = access_control.authorize("not-a-jwt", &Role::ALL).await;

        match result {
            Err(ServiceError::Auth(AuthError::InvalidToken)) => {}
            other => panic!("Expected InvalidToken, got {:?}", other.map(|u| u.email)),
        }
    }
}
