use crate::core::error::Denied;
use crate::models::user::{Role, Status, User};

/// Which users a caller may see
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisibilityFilter {
    /// Every user, whatever their status
    Everything,
    /// Non-deleted users of one filial, optionally restricted to one role
    Filial {
        filial: String,
        only_role: Option<Role>,
    },
}

impl VisibilityFilter {
    pub fn permits(&self, user: &User) -> bool {
        match self {
            VisibilityFilter::Everything => true,
            VisibilityFilter::Filial { filial, only_role } => {
                user.status != Status::Deleted
                    && user.filial == *filial
                    && only_role.map_or(true, |role| user.role == role)
            }
        }
    }

    /// Filter a snapshot, keeping its order
    pub fn apply(&self, users: Vec<User>) -> Vec<User> {
        users.into_iter().filter(|u| self.permits(u)).collect()
    }
}

/// Visibility for listing queries
///
/// Tutors and plain users are denied outright rather than handed an empty
/// list.
pub fn authorize_listing(caller: &User) -> Result<VisibilityFilter, Denied> {
    match caller.role {
        Role::Owner => Ok(VisibilityFilter::Everything),
        Role::Admin => Ok(VisibilityFilter::Filial {
            filial: caller.filial.clone(),
            only_role: None,
        }),
        Role::Helper => Ok(VisibilityFilter::Filial {
            filial: caller.filial.clone(),
            only_role: Some(Role::User),
        }),
        Role::Tutor | Role::User => Err(Denied("this role cannot list users")),
    }
}

/// May `caller` see the single record `target`?
pub fn authorize_view(caller: &User, target: &User) -> Result<(), Denied> {
    let filter = authorize_listing(caller)?;
    if filter.permits(target) {
        Ok(())
    } else {
        Err(Denied("user is outside your visibility"))
    }
}
