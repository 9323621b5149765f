use crate::core::error::AccountError;
use crate::models::api::UpdateUserRequest;
use crate::models::user::{Role, Status, User};
use crate::policy::authorize_update;
use crate::stores::user_store::UserStore;
use tracing::{info, warn};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Parsed and validated field changes
///
/// An empty string on the wire means "leave unchanged", matching clients
/// that always send the whole form.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Changes {
    pub name: Option<String>,
    pub filial: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub status: Option<Status>,
}

impl Changes {
    pub fn parse(request: &UpdateUserRequest) -> Result<Self, AccountError> {
        let name = trimmed(request.name.as_deref(), "name")?;
        let filial = trimmed(request.filial.as_deref(), "filial")?;

        let password = match provided(request.password.as_deref()) {
            Some(p) if p.chars().count() < MIN_PASSWORD_LEN => {
                return Err(AccountError::BadRequest(format!(
                    "password must be at least {} characters",
                    MIN_PASSWORD_LEN
                )));
            }
            other => other.map(str::to_string),
        };

        let role = provided(request.role.as_deref())
            .map(str::parse::<Role>)
            .transpose()
            .map_err(|e| AccountError::BadRequest(e.to_string()))?;

        let status = provided(request.status.as_deref())
            .map(str::parse::<Status>)
            .transpose()
            .map_err(|e| AccountError::BadRequest(e.to_string()))?;

        Ok(Self {
            name,
            filial,
            password,
            role,
            status,
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == Changes::default()
    }

    /// The record `current` would become
    pub fn apply_to(&self, current: &User) -> User {
        let mut next = current.clone();
        if let Some(name) = &self.name {
            next.name = name.clone();
        }
        if let Some(filial) = &self.filial {
            next.filial = filial.clone();
        }
        if let Some(password) = &self.password {
            next.password = password.clone();
        }
        if let Some(role) = self.role {
            next.role = role;
        }
        if let Some(status) = self.status {
            next.status = status;
        }
        next
    }
}

fn provided(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn trimmed(value: Option<&str>, field: &str) -> Result<Option<String>, AccountError> {
    match provided(value) {
        None => Ok(None),
        Some(v) if v.trim().is_empty() => {
            Err(AccountError::BadRequest(format!("{} cannot be blank", field)))
        }
        Some(v) => Ok(Some(v.trim().to_string())),
    }
}

/// Apply `request` to user `id` on behalf of `caller`
///
/// Validation happens up front; the policy check runs against the record as
/// it is inside the store's critical section, so a concurrent change to the
/// target cannot slip past it.
pub fn update_user(
    users: &UserStore,
    caller: &User,
    id: &str,
    request: &UpdateUserRequest,
) -> Result<User, AccountError> {
    let changes = Changes::parse(request)?;
    if changes.is_empty() {
        return Err(AccountError::BadRequest("no changes supplied".to_string()));
    }

    let updated = users.update_with(id, |current| {
        let proposed = changes.apply_to(current);
        if let Err(denied) = authorize_update(caller, current, &proposed) {
            warn!(
                caller_id = %caller.id,
                target_id = %current.id,
                reason = denied.0,
                "Update denied"
            );
            return Err(AccountError::from(denied));
        }
        Ok(proposed)
    })?;

    info!(
        caller_id = %caller.id,
        user_id = %updated.id,
        role = %updated.role,
        status = %updated.status,
        "User updated"
    );

    Ok(updated)
}
