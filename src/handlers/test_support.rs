// Fixtures shared by handler and router tests

use crate::core::config::{AuthConfig, Config, LoggingConfig, ServerConfig, StorageConfig};
use crate::core::error::StoreError;
use crate::core::state::AppState;
use crate::models::user::{NewUser, Role, Status, User};
use crate::stores::user_store::UserStore;
use crate::utils::time::{Clock, ManualClock};
use axum::body::Body;
use axum::response::Response;
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tempfile::TempDir;

pub const PASSWORD: &str = "hunter22";

pub struct TestApp {
    pub state: Arc<AppState>,
    pub clock: Arc<ManualClock>,
    // Keeps the users file alive for the duration of the test
    pub dir: TempDir,
}

pub fn create_test_config(dir: &TempDir) -> Config {
    Config {
        server: ServerConfig {
            port: Some(8080),
            unix_socket: None,
            num_threads: 2,
        },
        storage: StorageConfig {
            users_file: dir.path().join("users.json"),
        },
        auth: AuthConfig {
            jwt_secret: "test-secret-that-is-at-least-32-bytes-long".to_string(),
            token_ttl_hours: 24,
        },
        bootstrap: None,
        logging: LoggingConfig {
            level: "info".to_string(),
            format: "json".to_string(),
            console: false,
        },
    }
}

pub fn create_test_state() -> TestApp {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);

    let clock = Arc::new(ManualClock::at(1_700_000_000));
    let dyn_clock: Arc<dyn Clock> = clock.clone();
    let users = Arc::new(UserStore::open_file(&config.storage.users_file, dyn_clock.clone()).unwrap());

    TestApp {
        state: Arc::new(AppState::new(config, users, dyn_clock)),
        clock,
        dir,
    }
}

impl TestApp {
    pub fn seed(&self, login: &str, role: Role, filial: &str) -> User {
        self.state
            .users
            .create(NewUser {
                login: login.to_string(),
                password: PASSWORD.to_string(),
                name: format!("{} name", login),
                filial: filial.to_string(),
                role,
            })
            .unwrap()
    }

    pub fn set_status(&self, id: &str, status: Status) {
        self.state
            .users
            .update_with::<_, StoreError>(id, |u| {
                let mut next = u.clone();
                next.status = status;
                Ok(next)
            })
            .unwrap();
    }

    pub fn token_for(&self, user: &User) -> String {
        self.state.tokens.issue(&user.id, &user.login).unwrap()
    }
}

pub async fn read_json<T: DeserializeOwned>(response: Response) -> T {
    let (_, body) = response.into_parts();
    let bytes = Body::new(body).collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
