use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::EncodedHash;
use chrono::Duration;
use chrono::Utc;

use crate::domain::user::models::ChangePasswordCommand;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::LoginIdentifier;
use crate::domain::user::models::LoginOutcome;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserCredentialStore;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<S>
where
    S: UserCredentialStore,
{
    store: Arc<S>,
    authenticator: Arc<Authenticator>,
    token_ttl: Duration,
}

impl<S> UserService<S>
where
    S: UserCredentialStore,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - User and credential persistence implementation
    /// * `authenticator` - Shared hashing and token components
    /// * `token_ttl` - Lifetime of access tokens issued at login
    pub fn new(store: Arc<S>, authenticator: Arc<Authenticator>, token_ttl: Duration) -> Self {
        Self {
            store,
            authenticator,
            token_ttl,
        }
    }

    async fn find_user(&self, id: &UserId) -> Result<User, UserError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn find_active_user(&self, id: &UserId) -> Result<User, UserError> {
        let user = self.find_user(id).await?;
        if !user.active {
            return Err(UserError::UserInactive);
        }
        Ok(user)
    }

    /// Re-hash a verified password under the current parameters.
    ///
    /// Failures are logged only; the login that triggered the upgrade proceeds.
    async fn upgrade_hash(&self, user: &User, password: &str) -> Option<EncodedHash> {
        let password_hash = match self.authenticator.hash_password(password) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "Password rehash failed");
                return None;
            }
        };

        match self.store.update_hash(&user.id, &password_hash).await {
            Ok(()) => {
                tracing::info!(user_id = %user.id, "Password hash upgraded");
                Some(password_hash)
            }
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "Failed to persist upgraded password hash");
                None
            }
        }
    }
}

#[async_trait]
impl<S> UserServicePort for UserService<S>
where
    S: UserCredentialStore,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        let password_hash = self
            .authenticator
            .hash_password(command.password.expose())?;

        let user = User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            password_hash,
            active: true,
            created_at: Utc::now(),
        };

        let created_user = self.store.create(user).await?;
        tracing::info!(user_id = %created_user.id, "User registered");

        Ok(created_user)
    }

    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, UserError> {
        let user = match LoginIdentifier::parse(&command.identifier) {
            Some(identifier) => self.store.find_by_subject_or_email(&identifier).await?,
            None => None,
        };

        // Unknown identifiers still pay for one verification.
        self.authenticator
            .verify_credentials(&command.password, user.as_ref().map(|u| &u.password_hash))
            .inspect_err(|_| tracing::info!("Login rejected"))?;

        let Some(mut user) = user else {
            return Err(UserError::InvalidCredentials);
        };

        if !user.active {
            tracing::info!(user_id = %user.id, "Login rejected for deactivated account");
            return Err(UserError::UserInactive);
        }

        if self.authenticator.needs_rehash(&user.password_hash) {
            if let Some(password_hash) = self.upgrade_hash(&user, &command.password).await {
                user.password_hash = password_hash;
            }
        }

        let token = self.authenticator.issue_token(user.id.0, self.token_ttl)?;
        tracing::info!(user_id = %user.id, expires_at = %token.expires_at, "Access token issued");

        Ok(LoginOutcome { user, token })
    }

    async fn get_profile(&self, id: &UserId) -> Result<User, UserError> {
        self.find_active_user(id).await
    }

    async fn change_password(
        &self,
        id: &UserId,
        command: ChangePasswordCommand,
    ) -> Result<(), UserError> {
        let user = self.find_active_user(id).await?;

        self.authenticator
            .verify_credentials(&command.current_password, Some(&user.password_hash))?;

        let password_hash = self
            .authenticator
            .hash_password(command.new_password.expose())?;
        self.store.update_hash(id, &password_hash).await?;

        tracing::info!(user_id = %id, "Password changed");
        Ok(())
    }

    async fn deactivate(&self, id: &UserId) -> Result<(), UserError> {
        self.store.set_active(id, false).await?;

        tracing::info!(user_id = %id, "Account deactivated");
        Ok(())
    }
}
