//! Role policy
//!
//! Pure, stateless predicates over an optional [`Principal`]. Each check is a
//! set-membership test against a named role slice, so widening a permission is
//! a one-line edit rather than a hunt through endpoint handlers.
//!
//! Callers hold the enforcement contract: every mutating queue endpoint must
//! pass the matching predicate before invoking the engine. The engine does not
//! re-check.

use crate::types::{Principal, Role};

/// Roles allowed to add walk-ins to a day's queue.
const QUEUE_ADD_ROLES: &[Role] = &[Role::Admin, Role::Doctor];

/// Roles allowed to reorder, promote, or remove queue entries.
const QUEUE_MANAGE_ROLES: &[Role] = &[Role::Admin, Role::Doctor];

const PATIENT_EDIT_ROLES: &[Role] = &[Role::Admin, Role::Doctor];
const VISIT_EDIT_ROLES: &[Role] = &[Role::Admin, Role::Doctor];

fn has_role(principal: Option<&Principal>, allowed: &[Role]) -> bool {
    match principal {
        Some(p) => allowed.contains(&p.role),
        None => false,
    }
}

pub fn is_admin(principal: Option<&Principal>) -> bool {
    has_role(principal, &[Role::Admin])
}

pub fn can_add_to_queue(principal: Option<&Principal>) -> bool {
    has_role(principal, QUEUE_ADD_ROLES)
}

pub fn can_manage_queue(principal: Option<&Principal>) -> bool {
    has_role(principal, QUEUE_MANAGE_ROLES)
}

pub fn can_edit_patients(principal: Option<&Principal>) -> bool {
    has_role(principal, PATIENT_EDIT_ROLES)
}

pub fn can_edit_visits(principal: Option<&Principal>) -> bool {
    has_role(principal, VISIT_EDIT_ROLES)
}

pub fn can_access_staff(principal: Option<&Principal>) -> bool {
    is_admin(principal)
}
