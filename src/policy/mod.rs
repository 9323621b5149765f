//! Role and filial access decisions
//!
//! Everything here is a pure function of the caller's role and filial and the
//! target's role, filial and status. No I/O, no locks, no hidden state.

pub mod registration;
pub mod update;
pub mod visibility;

pub use registration::authorize_registration;
pub use update::authorize_update;
pub use visibility::{authorize_listing, authorize_view, VisibilityFilter};
