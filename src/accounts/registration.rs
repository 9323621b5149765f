use crate::core::error::{AccountError, StoreError};
use crate::models::api::RegisterRequest;
use crate::models::user::{NewUser, Role, UnknownRole, User};
use crate::policy::authorize_registration;
use crate::stores::user_store::UserStore;
use tracing::{info, warn};

/// Register a new user on behalf of `caller` (`None` for anonymous signup)
///
/// Steps, in order: required fields, role parsing, registration policy, then
/// the store's atomic create, which checks login uniqueness and assigns the
/// id and `active` status in the same critical section.
pub fn register(
    users: &UserStore,
    caller: Option<&User>,
    candidate: &RegisterRequest,
) -> Result<User, AccountError> {
    let draft = validate(candidate)?;

    if let Err(denied) = authorize_registration(caller, draft.role, &draft.filial) {
        warn!(
            caller_id = caller.map(|c| c.id.as_str()).unwrap_or("anonymous"),
            target_role = %draft.role,
            target_filial = %draft.filial,
            reason = denied.0,
            "Registration denied"
        );
        return Err(denied.into());
    }

    let user = users.create(draft)?;

    info!(
        user_id = %user.id,
        login = %user.login,
        role = %user.role,
        filial = %user.filial,
        registered_by = caller.map(|c| c.id.as_str()).unwrap_or("anonymous"),
        "User registered"
    );

    Ok(user)
}

/// Ensure an owner account with `login` exists
///
/// Runs the same validation and atomic create as `register`, with the system
/// standing in for the caller. Returns `None` when the login is already
/// taken, leaving that record untouched.
pub fn ensure_owner(
    users: &UserStore,
    login: &str,
    password: &str,
    name: &str,
    filial: &str,
) -> Result<Option<User>, AccountError> {
    let draft = validate(&RegisterRequest {
        login: login.to_string(),
        password: password.to_string(),
        name: name.to_string(),
        filial: filial.to_string(),
        role: Role::Owner.to_string(),
    })?;

    match users.create(draft) {
        Ok(user) => {
            info!(user_id = %user.id, login = %user.login, "Bootstrap owner created");
            Ok(Some(user))
        }
        Err(StoreError::AlreadyExists(_)) => Ok(None),
        Err(other) => Err(other.into()),
    }
}

fn validate(candidate: &RegisterRequest) -> Result<NewUser, AccountError> {
    let required = [
        ("login", &candidate.login),
        ("password", &candidate.password),
        ("name", &candidate.name),
        ("filial", &candidate.filial),
        ("role", &candidate.role),
    ];

    let missing: Vec<&str> = required
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| *field)
        .collect();

    if !missing.is_empty() {
        return Err(AccountError::BadRequest(format!(
            "missing required fields: {}",
            missing.join(", ")
        )));
    }

    let role: Role = candidate
        .role
        .parse()
        .map_err(|e: UnknownRole| AccountError::BadRequest(e.to_string()))?;

    Ok(NewUser {
        login: candidate.login.clone(),
        password: candidate.password.clone(),
        name: candidate.name.clone(),
        filial: candidate.filial.clone(),
        role,
    })
}
