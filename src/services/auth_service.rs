use chrono::Utc;
use std::sync::Arc;

use crate::errors::internal::{CredentialError, InternalError};
use crate::services::{crypto, TokenService};
use crate::stores::UserStore;
use crate::types::db::user;
use crate::types::dto::auth::{CitizenLogin, NewRegistration};
use crate::types::internal::Claims;

/// Citizen registration and login flows
pub struct AuthService {
    user_store: Arc<UserStore>,
    token_service: Arc<TokenService>,
}

impl AuthService {
    pub fn new(user_store: Arc<UserStore>, token_service: Arc<TokenService>) -> Self {
        Self {
            user_store,
            token_service,
        }
    }

    /// Create the account and mint its first session token.
    pub async fn register(
        &self,
        registration: NewRegistration,
    ) -> Result<(String, user::Model), InternalError> {
        if self
            .user_store
            .find_by_email(&registration.email)
            .await?
            .is_some()
        {
            return Err(CredentialError::DuplicateEmail(registration.email).into());
        }

        let password_hash = crypto::hash_password(&registration.password)?;
        let now = Utc::now().timestamp();
        let user = self.user_store.insert(&registration, password_hash, now).await?;

        tracing::info!("Citizen registered: {} (id {})", user.email, user.id);

        let token = self.token_service.mint_citizen_token(&user)?;
        Ok((token, user))
    }

    /// Verify credentials and stamp the login time.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller;
    /// only a known-but-deactivated account gets its own message.
    pub async fn login(&self, login: CitizenLogin) -> Result<(String, user::Model), InternalError> {
        let Some(mut user) = self.user_store.find_by_email(&login.email).await? else {
            return Err(CredentialError::InvalidCredentials.into());
        };

        if !user.is_active {
            return Err(CredentialError::AccountInactive.into());
        }

        if !crypto::verify_password(&login.password, &user.password_hash)? {
            return Err(CredentialError::InvalidCredentials.into());
        }

        let now = Utc::now().timestamp();
        self.user_store.touch_last_login(user.id, now).await?;
        user.last_login = Some(now);

        let token = self.token_service.mint_citizen_token(&user)?;
        Ok((token, user))
    }

    /// Load the account behind an authenticated request.
    pub async fn current_user(&self, claims: &Claims) -> Result<user::Model, InternalError> {
        let id = claims.subject_id().ok_or_else(|| CredentialError::InvalidToken {
            reason: "non-numeric subject".to_string(),
        })?;
        self.user_store
            .find_by_id(id)
            .await?
            .ok_or_else(|| CredentialError::UserNotFound(id.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup() -> AuthService {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None).await.expect("Failed to run migrations");

        AuthService::new(
            Arc::new(UserStore::new(db)),
            Arc::new(TokenService::new(
                "test-secret-key-minimum-32-characters-long".to_string(),
                168,
            )),
        )
    }

    fn registration() -> NewRegistration {
        NewRegistration {
            first_name: "Asha".to_string(),
            last_name: "Verma".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            password: "Str0ngPass".to_string(),
            agree_to_terms: true,
            subscribe_newsletter: true,
        }
    }

    #[tokio::test]
    async fn register_returns_a_token_for_the_new_account() {
        let service = setup().await;
        let (token, user) = service.register(registration()).await.unwrap();

        assert!(!token.is_empty());
        assert_eq!(user.email, "asha@example.com");
        // stored hash is not the plaintext
        assert_ne!(user.password_hash, "Str0ngPass");
    }

    #[tokio::test]
    async fn second_registration_with_same_email_is_rejected() {
        let service = setup().await;
        service.register(registration()).await.unwrap();

        let err = service.register(registration()).await.unwrap_err();
        assert!(matches!(
            err,
            InternalError::Credential(CredentialError::DuplicateEmail(_))
        ));
    }

    #[tokio::test]
    async fn login_succeeds_and_stamps_last_login() {
        let service = setup().await;
        service.register(registration()).await.unwrap();

        let (token, user) = service
            .login(CitizenLogin {
                email: "asha@example.com".to_string(),
                password: "Str0ngPass".to_string(),
            })
            .await
            .unwrap();

        assert!(!token.is_empty());
        assert!(user.last_login.is_some());
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_identical() {
        let service = setup().await;
        service.register(registration()).await.unwrap();

        let wrong_password = service
            .login(CitizenLogin {
                email: "asha@example.com".to_string(),
                password: "WrongPass1".to_string(),
            })
            .await
            .unwrap_err();
        let unknown_email = service
            .login(CitizenLogin {
                email: "nobody@example.com".to_string(),
                password: "Str0ngPass".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            wrong_password,
            InternalError::Credential(CredentialError::InvalidCredentials)
        ));
        assert!(matches!(
            unknown_email,
            InternalError::Credential(CredentialError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn current_user_resolves_the_token_subject() {
        let service = setup().await;
        let (token, registered) = service.register(registration()).await.unwrap();

        let token_service = TokenService::new(
            "test-secret-key-minimum-32-characters-long".to_string(),
            168,
        );
        let claims = token_service.validate(&token).unwrap();
        let user = service.current_user(&claims).await.unwrap();
        assert_eq!(user.id, registered.id);
    }
}
