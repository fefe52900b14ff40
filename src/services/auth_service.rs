//! Authentication service - Registration, login and bearer-token checks.
//!
//! Passwords are hashed through the domain `Password` value object.
//! Repository access goes through the Unit of Work.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::password::DUMMY_HASH;
use crate::domain::{normalize_email, CurrentUser, NewUser, Password, User, UserResponse, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Signed token plus the account it was issued for
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
    pub user: UserResponse,
}

/// Registration input after request validation
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: UserRole,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new account and sign a token for it
    async fn register(&self, registration: Registration) -> AppResult<AuthSession>;

    /// Check credentials and sign a token
    async fn login(&self, email: String, password: String) -> AppResult<AuthSession>;

    /// Verify JWT signature and expiry
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Resolve a bearer token to the acting user. Any failure, including a
    /// token whose user no longer exists, is `Unauthorized`.
    async fn authenticate(&self, token: &str) -> AppResult<CurrentUser>;
}

fn issue_session(user: User, config: &Config) -> AppResult<AuthSession> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(AuthSession {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
        user: UserResponse::from(user),
    })
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, registration: Registration) -> AppResult<AuthSession> {
        let email = normalize_email(&registration.email);

        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        let password_hash = Password::new(&registration.password)?.into_string();
        let user = self
            .uow
            .users()
            .create(NewUser {
                email,
                password_hash,
                name: registration.name.trim().to_string(),
                role: registration.role,
            })
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        issue_session(user, &self.config)
    }

    async fn login(&self, email: String, password: String) -> AppResult<AuthSession> {
        let user = self.uow.users().find_by_email(&normalize_email(&email)).await?;

        // Verify against a dummy hash for unknown emails so both failures
        // take the same path.
        let hash = user
            .as_ref()
            .map(|u| u.password_hash.clone())
            .unwrap_or_else(|| DUMMY_HASH.to_string());
        let password_valid = Password::from_hash(hash).verify(&password);

        match user {
            Some(user) if password_valid => issue_session(user, &self.config),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }

    async fn authenticate(&self, token: &str) -> AppResult<CurrentUser> {
        let claims = self.verify_token(token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            AppError::Unauthorized
        })?;

        let user = self
            .uow
            .users()
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(CurrentUser::from(&user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MockUnitOfWork, MockUserRepository, UserRepository};

    fn config() -> Config {
        Config::new("postgres://unused", "test-secret-key-at-least-32-characters")
    }

    fn stored_user(password: &str) -> User {
        User::new(
            Uuid::new_v4(),
            "jane@example.com".into(),
            Password::new(password).unwrap().into_string(),
            "Jane".into(),
            UserRole::Teacher,
        )
    }

    fn uow_with(users: MockUserRepository) -> Arc<MockUnitOfWork> {
        let users: Arc<dyn UserRepository> = Arc::new(users);
        let mut uow = MockUnitOfWork::new();
        uow.expect_users().returning(move || users.clone());
        Arc::new(uow)
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let existing = stored_user("secret1");
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .withf(|email| email == "jane@example.com")
            .returning(move |_| Ok(Some(existing.clone())));
        users.expect_create().never();

        let auth = Authenticator::new(uow_with(users), config());
        let result = auth
            .register(Registration {
                email: "  Jane@Example.com ".into(),
                password: "secret1".into(),
                name: "Jane".into(),
                role: UserRole::Teacher,
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_login_and_authenticate_round_trip() {
        let user = stored_user("secret1");
        let user_id = user.id;
        let by_email = user.clone();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(by_email.clone())));
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));

        let auth = Authenticator::new(uow_with(users), config());
        let session = auth
            .login("JANE@example.com".into(), "secret1".into())
            .await
            .unwrap();
        assert_eq!(session.token_type, "Bearer");

        let current = auth.authenticate(&session.access_token).await.unwrap();
        assert_eq!(current.id, user_id);
        assert_eq!(current.role, UserRole::Teacher);
    }

    #[tokio::test]
    async fn test_login_failures_share_one_error() {
        let user = stored_user("secret1");
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(move |email| {
            if email == "jane@example.com" {
                Ok(Some(user.clone()))
            } else {
                Ok(None)
            }
        });

        let auth = Authenticator::new(uow_with(users), config());
        let wrong_password = auth.login("jane@example.com".into(), "nope".into()).await;
        let unknown_email = auth.login("ghost@example.com".into(), "secret1".into()).await;

        assert!(matches!(wrong_password, Err(AppError::InvalidCredentials)));
        assert!(matches!(unknown_email, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_garbage_and_deleted_users() {
        let user = stored_user("secret1");
        let session = issue_session(user, &config()).unwrap();

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));
        let auth = Authenticator::new(uow_with(users), config());

        assert!(matches!(
            auth.authenticate("not-a-token").await,
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            auth.authenticate(&session.access_token).await,
            Err(AppError::Unauthorized)
        ));
    }
}
