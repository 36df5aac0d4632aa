use std::sync::Arc;

use crate::auth::{jwt::JwtKeys, repo::UserStore, services::AuthService};
use crate::config::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub keys: JwtKeys,
}

impl AppState {
    pub fn new(users: Arc<dyn UserStore>, jwt: &JwtConfig) -> Self {
        Self::from_keys(users, JwtKeys::from_config(jwt))
    }

    pub fn from_keys(users: Arc<dyn UserStore>, keys: JwtKeys) -> Self {
        Self {
            auth: Arc::new(AuthService::new(users, keys.clone())),
            keys,
        }
    }
}
