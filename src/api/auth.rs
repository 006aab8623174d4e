use poem_openapi::{payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::api::BearerAuth;
use crate::errors::AuthError;
use crate::services::{AuthGateway, AuthService};
use crate::types::dto::auth::{
    AuthData, LoginRequest, LoginResponse, MeData, MeResponse, RegisterApiResponse,
    RegisterRequest, RegisterResponse, UserData,
};
use crate::types::dto::common::Acknowledgement;

/// Citizen authentication endpoints
pub struct AuthApi {
    auth_service: Arc<AuthService>,
    gateway: Arc<AuthGateway>,
    debug: bool,
}

impl AuthApi {
    pub fn new(auth_service: Arc<AuthService>, gateway: Arc<AuthGateway>, debug: bool) -> Self {
        Self {
            auth_service,
            gateway,
            debug,
        }
    }

    fn shape(&self, err: crate::errors::InternalError) -> AuthError {
        AuthError::from_internal(err, self.debug)
    }
}

#[derive(Tags)]
enum AuthTags {
    /// Citizen registration and login
    CitizenAuth,
}

#[OpenApi(prefix_path = "/api/auth")]
impl AuthApi {
    /// Register a new citizen account
    #[oai(path = "/register", method = "post", tag = "AuthTags::CitizenAuth")]
    async fn register(&self, body: Json<RegisterRequest>) -> Result<RegisterApiResponse, AuthError> {
        let registration = body.0.validate().map_err(AuthError::validation_failed)?;

        let (token, user) = self
            .auth_service
            .register(registration)
            .await
            .map_err(|e| self.shape(e))?;

        Ok(RegisterApiResponse::Created(Json(RegisterResponse {
            success: true,
            message: "User registered successfully".to_string(),
            data: AuthData {
                token,
                user: UserData::from(&user),
            },
        })))
    }

    /// Log in with email and password
    #[oai(path = "/login", method = "post", tag = "AuthTags::CitizenAuth")]
    async fn login(&self, body: Json<LoginRequest>) -> Result<Json<LoginResponse>, AuthError> {
        let login = body.0.validate().map_err(AuthError::validation_failed)?;

        let (token, user) = self.auth_service.login(login).await.map_err(|e| self.shape(e))?;

        Ok(Json(LoginResponse {
            success: true,
            message: "Login successful".to_string(),
            data: AuthData {
                token,
                user: UserData::from(&user),
            },
        }))
    }

    /// Current account behind the presented token
    #[oai(path = "/me", method = "get", tag = "AuthTags::CitizenAuth")]
    async fn me(&self, auth: BearerAuth) -> Result<Json<MeResponse>, AuthError> {
        let claims = self.gateway.authenticate(&auth.0.token).map_err(|e| self.shape(e))?;
        let user = self.auth_service.current_user(&claims).await.map_err(|e| self.shape(e))?;

        Ok(Json(MeResponse {
            success: true,
            data: MeData {
                user: UserData::from(&user),
            },
        }))
    }

    /// Stateless logout acknowledgement; the client discards the token
    #[oai(path = "/logout", method = "post", tag = "AuthTags::CitizenAuth")]
    async fn logout(&self, auth: BearerAuth) -> Result<Json<Acknowledgement>, AuthError> {
        self.gateway.authenticate(&auth.0.token).map_err(|e| self.shape(e))?;

        Ok(Json(Acknowledgement::new(
            "Logout successful. Please remove the token from client-side storage.",
        )))
    }
}
