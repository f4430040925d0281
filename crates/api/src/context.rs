use laundrydesk_auth::{Principal, Role};
use laundrydesk_core::UserId;

/// Principal context for a request (acting user + role).
///
/// Inserted by the principal middleware; present for every protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    user_id: UserId,
    role: Role,
}

impl PrincipalContext {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    /// Resolve against the role policy for authorization checks.
    pub fn principal(&self) -> Principal {
        Principal::from_roles(self.user_id, vec![self.role.clone()])
    }
}
