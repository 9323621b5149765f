use crate::core::error::Denied;
use crate::models::user::User;
use crate::policy::registration::authorize_registration;
use crate::policy::visibility::authorize_view;

/// May `caller` replace `current` with `proposed`?
///
/// A caller can only manage records it can see and could have created, and
/// can only turn them into records it could create. Owners can change
/// anything; admins stay within tutor/helper/user of their filial; helpers
/// can edit users of their filial but never change a role.
pub fn authorize_update(caller: &User, current: &User, proposed: &User) -> Result<(), Denied> {
    authorize_view(caller, current)?;

    authorize_registration(Some(caller), current.role, &current.filial)
        .map_err(|_| Denied("you cannot manage this user"))?;

    if proposed.role != current.role || proposed.filial != current.filial {
        authorize_registration(Some(caller), proposed.role, &proposed.filial)
            .map_err(|_| Denied("you cannot assign this role or filial"))?;
    }

    Ok(())
}
