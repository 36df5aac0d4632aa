use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use super::errors::AuthError;
use super::jwt::JwtKeys;
use super::password::PasswordHasher;
use super::repo::UserStore;
use super::repo_types::{NewUser, User};
use super::validation::{
    normalize_email, validate_login, validate_password_change, validate_registration,
};

/// Registration, login and profile lookup on top of a [`UserStore`].
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, keys: JwtKeys) -> Self {
        Self {
            users,
            hasher: PasswordHasher,
            keys,
        }
    }

    /// Validates the input before any storage call, hashes the password and
    /// creates the user. A duplicate email is reported by the store.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<User, AuthError> {
        let email = normalize_email(email);
        validate_registration(&email, password, name)?;

        let password_hash = self.hasher.hash(password)?;
        let user = self
            .users
            .create(NewUser {
                email,
                name: name.trim().to_string(),
                password_hash,
            })
            .await
            .map_err(|e| {
                let err = AuthError::from(e);
                if matches!(err, AuthError::Conflict) {
                    warn!("registration for an existing email");
                }
                err
            })?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Returns a bearer token on success. Unknown email and wrong password
    /// produce the same `InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let email = normalize_email(email);
        validate_login(&email, password)?;

        let Some(user) = self.users.find_by_email(&email).await? else {
            self.hasher.verify_dummy(password);
            warn!("login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &user.password_hash)? {
            warn!(user_id = %user.id, "login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.keys.issue(user.id, self.keys.ttl())?;
        info!(user_id = %user.id, "user logged in");
        Ok(token)
    }

    pub async fn profile(&self, subject: Uuid) -> Result<User, AuthError> {
        self.users
            .find_by_id(subject)
            .await?
            .ok_or(AuthError::NotFound)
    }

    /// The only path that rewrites a stored hash: the new password is hashed
    /// here, once, and handed to the store already hashed.
    pub async fn change_password(
        &self,
        subject: Uuid,
        current: &str,
        new: &str,
    ) -> Result<(), AuthError> {
        validate_password_change(current, new)?;

        let user = self.profile(subject).await?;
        if !self.hasher.verify(current, &user.password_hash)? {
            warn!(user_id = %user.id, "password change rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let password_hash = self.hasher.hash(new)?;
        self.users
            .update_password_hash(user.id, &password_hash)
            .await?;
        info!(user_id = %user.id, "password changed");
        Ok(())
    }
}
