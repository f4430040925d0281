//! `laundrydesk-auth`: role-based access to the back-office modules.
//!
//! This crate is intentionally decoupled from HTTP and storage: the session
//! layer resolves who the user is, this crate decides what they may touch.

pub mod authorize;
pub mod permissions;
pub mod policy;
pub mod principal;
pub mod roles;

pub use authorize::{AuthzError, authorize};
pub use permissions::Permission;
pub use policy::permissions_for_roles;
pub use principal::Principal;
pub use roles::Role;
