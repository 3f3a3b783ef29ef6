use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::models::User;
use crate::shared::AppError;
use crate::store::{keys, load_collection, load_typed, save_typed, RecordStore};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Registration, login and the current session user
pub struct AuthService {
    store: Arc<dyn RecordStore>,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(store: Arc<dyn RecordStore>, bcrypt_cost: u32) -> Self {
        Self { store, bcrypt_cost }
    }

    /// Creates an account and logs it in
    #[instrument(skip(self, email, password))]
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AppError::Validation("All fields are required".to_string()));
        }

        let mut users = self.list_users().await?;
        if users.iter().any(|u| u.username == username) {
            warn!(username, "Username already taken");
            return Err(AppError::Conflict("Username already taken".to_string()));
        }
        if users.iter().any(|u| u.email == email) {
            warn!(username, "Email already in use");
            return Err(AppError::Conflict("Email already in use".to_string()));
        }

        let password_hash = self.hash_password(password).await?;
        let user = User::new(username.to_string(), email.to_string(), password_hash);

        users.push(user.clone());
        save_typed(self.store.as_ref(), keys::USERS, &users).await?;
        save_typed(self.store.as_ref(), keys::CURRENT_USER, &user).await?;

        info!(user_id = %user.id, username, "User registered");
        Ok(user)
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AppError> {
        let Some(user) = self.find_by_username(username).await? else {
            debug!(username, "Login for unknown user");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if !self.verify_password(password, &user.password).await? {
            debug!(username, "Login with wrong password");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        save_typed(self.store.as_ref(), keys::CURRENT_USER, &user).await?;
        info!(user_id = %user.id, username, "User logged in");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), AppError> {
        self.store.remove(keys::CURRENT_USER).await?;
        info!("User logged out");
        Ok(())
    }

    /// The session user, provided the account still exists
    pub async fn current_user(&self) -> Result<Option<User>, AppError> {
        let stored: Option<User> = load_typed(self.store.as_ref(), keys::CURRENT_USER).await?;
        let Some(stored) = stored else {
            return Ok(None);
        };

        let users = self.list_users().await?;
        Ok(users.into_iter().find(|u| u.id == stored.id))
    }

    pub async fn require_user(&self) -> Result<User, AppError> {
        self.current_user()
            .await?
            .ok_or_else(|| AppError::Unauthorized("You must be logged in".to_string()))
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(load_collection(self.store.as_ref(), keys::USERS).await?)
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        Ok(self.list_users().await?.into_iter().find(|u| u.id == user_id))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .list_users()
            .await?
            .into_iter()
            .find(|u| u.username == username))
    }

    async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let password = password.to_string();
        let cost = self.bcrypt_cost;
        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|_| AppError::Internal)??;
        Ok(hashed)
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let password = password.to_string();
        let hash = hash.to_string();
        let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|_| AppError::Internal)??;
        Ok(valid)
    }
}
