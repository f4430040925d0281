//! Built-in role → permission policy.
//!
//! - `admin`: everything.
//! - `manager`: categories, log book, invoices and guest laundry.
//! - `staff`: guest laundry only, without deleting orders.

use crate::{Permission, Role};

const MANAGER_PERMISSIONS: &[&str] = &[
    Permission::CATEGORIES_READ,
    Permission::CATEGORIES_WRITE,
    Permission::LOGBOOK_READ,
    Permission::LOGBOOK_WRITE,
    Permission::INVOICES_READ,
    Permission::INVOICES_WRITE,
    Permission::INVOICES_EXPORT,
    Permission::LAUNDRY_READ,
    Permission::LAUNDRY_WRITE,
    Permission::LAUNDRY_DELETE,
];

const STAFF_PERMISSIONS: &[&str] = &[Permission::LAUNDRY_READ, Permission::LAUNDRY_WRITE];

/// Union of the permissions granted by `roles`, without duplicates.
pub fn permissions_for_roles(roles: &[Role]) -> Vec<Permission> {
    if roles.iter().any(|r| r.as_str() == Role::ADMIN) {
        return vec![Permission::new("*")];
    }

    let mut granted: Vec<Permission> = Vec::new();
    for role in roles {
        let perms: &[&'static str] = match role.as_str() {
            Role::MANAGER => MANAGER_PERMISSIONS,
            Role::STAFF => STAFF_PERMISSIONS,
            _ => &[],
        };
        for p in perms {
            let p = Permission::new(*p);
            if !granted.contains(&p) {
                granted.push(p);
            }
        }
    }
    granted
}
