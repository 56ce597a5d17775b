use crate::error::{AuthError, AuthResult, HashingError};
use crate::hashing_service::HashingService;
use crate::mappers::{app_entity_to_app, user_entity_to_user};
use crate::TokenService;
use async_trait::async_trait;
use auth_data::repositories::{AppProvider, UserProvider, UserSaver};
use auth_data::AuthDataError;
use chrono::Duration;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{error, info, warn};

const DUMMY_PASSWORD: &str = "unknown-user-placeholder";

/// Auth service trait defining authentication operations
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials and issue an access token for `app_id`
    async fn login(&self, email: &str, password: &str, app_id: i32) -> AuthResult<String>;

    /// Register a new user and return its id
    async fn register_new_user(&self, email: &str, password: &str) -> AuthResult<i64>;

    /// Whether the user has admin rights
    async fn is_admin(&self, user_id: i64) -> AuthResult<bool>;
}

/// Settings fixed for the lifetime of the service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    pub token_ttl: Duration,
}

/// Implementation of AuthService
pub struct AuthServiceImpl {
    user_saver: Arc<dyn UserSaver>,
    user_provider: Arc<dyn UserProvider>,
    app_provider: Arc<dyn AppProvider>,
    token_service: Arc<dyn TokenService>,
    hashing_service: Arc<dyn HashingService>,
    config: AuthServiceConfig,
    // Verified against when the email is unknown so both login failures cost the same.
    dummy_hash: OnceCell<Vec<u8>>,
}

impl AuthServiceImpl {
    /// Create a new auth service instance
    pub fn new(
        user_saver: Arc<dyn UserSaver>,
        user_provider: Arc<dyn UserProvider>,
        app_provider: Arc<dyn AppProvider>,
        token_service: Arc<dyn TokenService>,
        hashing_service: Arc<dyn HashingService>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            user_saver,
            user_provider,
            app_provider,
            token_service,
            hashing_service,
            config,
            dummy_hash: OnceCell::new(),
        }
    }

    // Key derivation is CPU bound, keep it off the async workers.
    async fn hash_password(&self, password: &str) -> AuthResult<Vec<u8>> {
        let hashing_service = Arc::clone(&self.hashing_service);
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || hashing_service.hash_password(&password))
            .await
            .map_err(|e| AuthError::from(HashingError::TaskFailed(e.to_string())))
    }

    async fn verify_password(&self, pass_hash: Vec<u8>, password: &str) -> AuthResult<bool> {
        let hashing_service = Arc::clone(&self.hashing_service);
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || hashing_service.verify(&pass_hash, &password))
            .await
            .map_err(|e| HashingError::TaskFailed(e.to_string()))?
            .map_err(AuthError::from)
    }

    async fn verify_unknown_user(&self, password: &str) {
        let dummy_hash = match self
            .dummy_hash
            .get_or_try_init(|| self.hash_password(DUMMY_PASSWORD))
            .await
        {
            Ok(hash) => hash.clone(),
            Err(e) => {
                error!(error = %e, "Failed to prepare placeholder hash");
                return;
            }
        };

        if let Err(e) = self.verify_password(dummy_hash, password).await {
            error!(error = %e, "Failed to verify against placeholder hash");
        }
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn login(&self, email: &str, password: &str, app_id: i32) -> AuthResult<String> {
        const OP: &str = "auth.login";

        info!(op = OP, email, app_id, "Attempting to login user");

        let user = match self.user_provider.find_by_email(email).await {
            Ok(user) => user_entity_to_user(user),
            Err(AuthDataError::UserNotFound) => {
                warn!(op = OP, email, "User not found");
                self.verify_unknown_user(password).await;
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => {
                error!(op = OP, email, error = %e, "Failed to get user");
                return Err(e.into());
            }
        };

        let valid = self
            .verify_password(user.pass_hash.clone(), password)
            .await
            .map_err(|e| {
                error!(op = OP, user_id = user.id, error = %e, "Failed to verify password");
                e
            })?;

        if !valid {
            warn!(op = OP, user_id = user.id, "Invalid credentials");
            return Err(AuthError::InvalidCredentials);
        }

        let app = match self.app_provider.find_app_by_id(app_id).await {
            Ok(app) => app_entity_to_app(app),
            Err(AuthDataError::AppNotFound) => {
                warn!(op = OP, app_id, "App not found");
                return Err(AuthError::AppNotFound);
            }
            Err(e) => {
                error!(op = OP, app_id, error = %e, "Failed to get app");
                return Err(e.into());
            }
        };

        let token = self
            .token_service
            .new_token(&user, &app, self.config.token_ttl)
            .map_err(|e| {
                error!(op = OP, user_id = user.id, app_id, error = %e, "Failed to generate token");
                AuthError::Signing(e)
            })?;

        info!(op = OP, user_id = user.id, app_id, "User logged in successfully");

        Ok(token)
    }

    async fn register_new_user(&self, email: &str, password: &str) -> AuthResult<i64> {
        const OP: &str = "auth.register_new_user";

        info!(op = OP, email, "Registering user");

        let pass_hash = self.hash_password(password).await.map_err(|e| {
            error!(op = OP, error = %e, "Failed to generate password hash");
            e
        })?;

        // No existence check up front: the unique email constraint in storage
        // settles concurrent registrations of the same address.
        let user_id = self
            .user_saver
            .save_user(email, &pass_hash)
            .await
            .map_err(|e| {
                match e {
                    AuthDataError::UserExists => warn!(op = OP, email, "User already exists"),
                    ref e => error!(op = OP, email, error = %e, "Failed to save user"),
                }
                AuthError::from(e)
            })?;

        info!(op = OP, user_id, "User registered");

        Ok(user_id)
    }

    async fn is_admin(&self, user_id: i64) -> AuthResult<bool> {
        const OP: &str = "auth.is_admin";

        info!(op = OP, user_id, "Checking if user is admin");

        let is_admin = self.user_provider.is_admin(user_id).await.map_err(|e| {
            match e {
                AuthDataError::UserNotFound => warn!(op = OP, user_id, "User not found"),
                ref e => error!(op = OP, user_id, error = %e, "Failed to check admin flag"),
            }
            AuthError::from(e)
        })?;

        info!(op = OP, user_id, is_admin, "Checked admin flag");

        Ok(is_admin)
    }
}
