use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;

use crate::errors::internal::{CredentialError, InternalError};
use crate::types::db::{admin, user};
use crate::types::internal::Claims;

/// Mints and verifies the signed session tokens
///
/// Purely cryptographic: no database access, no revocation list. A token is
/// good until it expires; admin authorization is re-checked per request by
/// the gateway, not here.
pub struct TokenService {
    jwt_secret: String,
    expires_hours: i64,
}

impl TokenService {
    pub fn new(jwt_secret: String, expires_hours: i64) -> Self {
        Self {
            jwt_secret,
            expires_hours,
        }
    }

    /// Token lifetime in seconds, for `expires_in`-style fields.
    pub fn ttl_seconds(&self) -> i64 {
        self.expires_hours * 3600
    }

    /// Mint a citizen token carrying `{sub, email, isAdmin: false}`.
    pub fn mint_citizen_token(&self, user: &user::Model) -> Result<String, InternalError> {
        let now = Utc::now().timestamp();
        self.encode(&Claims {
            sub: user.id.to_string(),
            email: Some(user.email.clone()),
            username: None,
            is_admin: false,
            role: None,
            exp: now + self.ttl_seconds(),
            iat: now,
        })
    }

    /// Mint an admin token carrying `{sub, username, role, isAdmin: true}`.
    ///
    /// The role claim is informational; the role gate reads the stored row.
    pub fn mint_admin_token(&self, admin: &admin::Model) -> Result<String, InternalError> {
        let now = Utc::now().timestamp();
        self.encode(&Claims {
            sub: admin.id.to_string(),
            email: None,
            username: Some(admin.username.clone()),
            is_admin: true,
            role: Some(admin.role.clone()),
            exp: now + self.ttl_seconds(),
            iat: now,
        })
    }

    fn encode(&self, claims: &Claims) -> Result<String, InternalError> {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| InternalError::crypto("encode_jwt", e.to_string()))
    }

    /// Verify signature and expiry, returning the embedded claims.
    ///
    /// Expiry is reported distinctly from every other failure so the API
    /// layer can tell clients to re-authenticate rather than retry.
    pub fn validate(&self, token: &str) -> Result<Claims, InternalError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => CredentialError::ExpiredToken.into(),
            _ => CredentialError::InvalidToken {
                reason: e.to_string(),
            }
            .into(),
        })
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("jwt_secret", &"<redacted>")
            .field("expires_hours", &self.expires_hours)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret-key-minimum-32-characters-long";

    fn service() -> TokenService {
        TokenService::new(SECRET.to_string(), 168)
    }

    fn citizen() -> user::Model {
        user::Model {
            id: 42,
            first_name: "Asha".to_string(),
            last_name: "Verma".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            password_hash: "hash".to_string(),
            agree_to_terms: true,
            subscribe_newsletter: true,
            is_active: true,
            registration_time: 0,
            last_login: None,
        }
    }

    fn admin() -> admin::Model {
        admin::Model {
            id: 7,
            username: "admin".to_string(),
            email: None,
            password_hash: "hash".to_string(),
            role: "super_admin".to_string(),
            is_active: true,
            created_at: 0,
            last_login: None,
        }
    }

    #[test]
    fn citizen_token_round_trips_its_claims() {
        let service = service();
        let token = service.mint_citizen_token(&citizen()).unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.subject_id(), Some(42));
        assert_eq!(claims.email.as_deref(), Some("asha@example.com"));
        assert!(!claims.is_admin);
        assert_eq!(claims.role, None);
        assert_eq!(claims.exp - claims.iat, 168 * 3600);
    }

    #[test]
    fn admin_token_carries_the_admin_claim_and_role() {
        let service = service();
        let token = service.mint_admin_token(&admin()).unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.subject_id(), Some(7));
        assert_eq!(claims.username.as_deref(), Some("admin"));
        assert!(claims.is_admin);
        assert_eq!(claims.role.as_deref(), Some("super_admin"));
    }

    #[test]
    fn wrong_secret_is_rejected_as_invalid() {
        let token = service().mint_citizen_token(&citizen()).unwrap();
        let other = TokenService::new("another-secret-also-32-characters-xx".to_string(), 168);

        let err = other.validate(&token).unwrap_err();
        assert!(matches!(
            err,
            InternalError::Credential(CredentialError::InvalidToken { .. })
        ));
    }

    #[test]
    fn expired_token_is_reported_distinctly() {
        let now = Utc::now().timestamp();
        let expired = Claims {
            sub: "42".to_string(),
            email: None,
            username: None,
            is_admin: false,
            role: None,
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &expired,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let err = service().validate(&token).unwrap_err();
        assert!(matches!(
            err,
            InternalError::Credential(CredentialError::ExpiredToken)
        ));
    }

    #[test]
    fn garbage_token_is_invalid() {
        let err = service().validate("not-a-jwt").unwrap_err();
        assert!(matches!(
            err,
            InternalError::Credential(CredentialError::InvalidToken { .. })
        ));
    }

    #[test]
    fn debug_output_redacts_the_secret() {
        let output = format!("{:?}", service());
        assert!(!output.contains(SECRET));
        assert!(output.contains("<redacted>"));
    }
}
