use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::accounts::registration::ensure_owner;
use crate::core::config::{BootstrapConfig, StorageConfig};
use crate::stores::user_store::UserStore;
use crate::utils::time::Clock;

// this runs at boot time
pub fn open_user_store(storage: &StorageConfig, clock: Arc<dyn Clock>) -> Result<Arc<UserStore>> {
    let users = UserStore::open_file(&storage.users_file, clock).context(format!(
        "Failed to load users from {}",
        storage.users_file.display()
    ))?;

    let users_loaded = users.len()?;

    info!(
        users_file = %storage.users_file.display(),
        users_loaded,
        "User store opened"
    );

    Ok(Arc::new(users))
}

/// Create the configured owner account unless its login already exists
pub fn bootstrap_owner(users: &UserStore, bootstrap: Option<&BootstrapConfig>) -> Result<()> {
    let Some(bootstrap) = bootstrap else {
        return Ok(());
    };

    let created = ensure_owner(
        users,
        &bootstrap.login,
        &bootstrap.password,
        &bootstrap.name,
        &bootstrap.filial,
    )
    .context("Failed to bootstrap owner account")?;

    if created.is_none() {
        info!(login = %bootstrap.login, "Bootstrap owner already present, leaving it untouched");
    }

    Ok(())
}
