use thiserror::Error;

use crate::{Permission, Principal};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Check that `principal` holds `required` (or the wildcard).
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(principal: &Principal, required: &Permission) -> Result<(), AuthzError> {
    let granted = principal
        .permissions
        .iter()
        .any(|p| p.is_wildcard() || p == required);

    if granted {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;
    use laundrydesk_core::UserId;

    #[test]
    fn manager_may_export_invoices() {
        let p = Principal::from_roles(UserId::new(1), vec![Role::manager()]);
        assert!(authorize(&p, &Permission::new(Permission::INVOICES_EXPORT)).is_ok());
    }

    #[test]
    fn staff_is_denied_log_book() {
        let p = Principal::from_roles(UserId::new(2), vec![Role::staff()]);
        let err = authorize(&p, &Permission::new(Permission::LOGBOOK_WRITE)).unwrap_err();
        assert_eq!(err, AuthzError::Forbidden("logbook.write".to_string()));
    }

    #[test]
    fn admin_passes_any_permission() {
        let p = Principal::from_roles(UserId::new(3), vec![Role::admin()]);
        assert!(authorize(&p, &Permission::new("anything.at.all")).is_ok());
    }
}
