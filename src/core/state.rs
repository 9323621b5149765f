// Application state (AppState)

use crate::auth::credentials::{CredentialVerifier, PlaintextVerifier};
use crate::auth::service::AuthService;
use crate::auth::token::TokenService;
use crate::core::config::Config;
use crate::stores::user_store::UserStore;
use crate::utils::time::Clock;
use std::sync::Arc;

/// Shared application state
///
/// Contains all shared components that are accessed by request handlers.
/// All fields are wrapped in Arc for efficient cloning across threads.
#[derive(Clone)]
pub struct AppState {
    /// Durable user set
    pub users: Arc<UserStore>,

    /// Token issuing and verification
    pub tokens: Arc<TokenService>,

    /// Authentication gate and login
    pub auth: AuthService,

    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, users: Arc<UserStore>, clock: Arc<dyn Clock>) -> Self {
        let credentials: Arc<dyn CredentialVerifier> = Arc::new(PlaintextVerifier);
        Self::with_credentials(config, users, clock, credentials)
    }

    pub fn with_credentials(
        config: Config,
        users: Arc<UserStore>,
        clock: Arc<dyn Clock>,
        credentials: Arc<dyn CredentialVerifier>,
    ) -> Self {
        let config = Arc::new(config);

        let tokens = Arc::new(TokenService::new(
            config.auth.jwt_secret.as_bytes(),
            config.auth.token_ttl_hours,
            clock,
        ));

        let auth = AuthService::new(Arc::clone(&users), Arc::clone(&tokens), credentials);

        Self {
            users,
            tokens,
            auth,
            config,
        }
    }
}
