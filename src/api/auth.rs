use std::sync::Arc;

use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::errors::ApiError;
use crate::services::auth_service::Registration;
use crate::services::AuthService;
use crate::types::dto::auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

/// Authentication API endpoints
pub struct AuthApi {
    auth_service: Arc<AuthService>,
}

impl AuthApi {
    /// Create a new AuthApi with the given AuthService
    pub fn new(auth_service: Arc<AuthService>) -> Self {
        Self { auth_service }
    }
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Register a new user
    #[oai(path = "/register", method = "post", tag = "AuthTags::Authentication")]
    async fn register(&self, body: Json<RegisterRequest>) -> Result<Json<RegisterResponse>, ApiError> {
        let body = body.0;

        let user = self
            .auth_service
            .register(Registration {
                full_name: body.full_name,
                email: body.email,
                username: body.username,
                password: body.password,
                role: body.role,
                phone: body.phone,
            })
            .await?;

        Ok(Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user: user.into(),
        }))
    }

    /// Login with email and password to receive an access token
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, body: Json<LoginRequest>) -> Result<Json<LoginResponse>, ApiError> {
        let (access_token, user) = self
            .auth_service
            .authenticate(&body.email, &body.password)
            .await?;

        Ok(Json(LoginResponse {
            message: "Login successful".to_string(),
            access_token,
            user: user.into(),
        }))
    }
}
