use crate::core::error::Denied;
use crate::models::user::{Role, User};

/// May `caller` create a user with `target_role` in `target_filial`?
///
/// `None` is an anonymous caller, which may only self-register as `user`.
///
/// | caller      | may create                | filial           |
/// |-------------|---------------------------|------------------|
/// | owner       | any role                  | any              |
/// | admin       | tutor, helper, user       | own filial only  |
/// | helper      | user                      | own filial only  |
/// | tutor, user | nothing                   |                  |
/// | anonymous   | user                      | any              |
pub fn authorize_registration(
    caller: Option<&User>,
    target_role: Role,
    target_filial: &str,
) -> Result<(), Denied> {
    let Some(caller) = caller else {
        return match target_role {
            Role::User => Ok(()),
            _ => Err(Denied("only user registration is allowed without authentication")),
        };
    };

    match caller.role {
        Role::Owner => Ok(()),
        Role::Admin => {
            if matches!(target_role, Role::Owner | Role::Admin) {
                return Err(Denied("admin can't register owners or admins"));
            }
            if target_filial != caller.filial {
                return Err(Denied("admin can only register users in their own filial"));
            }
            Ok(())
        }
        Role::Helper => {
            if target_role != Role::User {
                return Err(Denied("helper can only register users"));
            }
            if target_filial != caller.filial {
                return Err(Denied("helper can only register users in their own filial"));
            }
            Ok(())
        }
        Role::Tutor | Role::User => Err(Denied("registration is not permitted for this role")),
    }
}
