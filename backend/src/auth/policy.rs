//! Authorization policy for administrative member management.
//!
//! A pure decision function over (acting user, target user, requested
//! action). Handlers fetch both records and call [`authorize`] before
//! persisting anything; the policy never silently downgrades a request,
//! every denial carries its own user-facing reason.

use crate::database::models::User;
use crate::errors::ApiError;

use super::models::EffectiveRole;

/// Administrative action requested against a target member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    ChangeRole(EffectiveRole),
    ChangeStatus,
    Delete,
}

/// Rules, applied in order:
///
/// 1. the actor must carry admin-level access at all;
/// 2. no action against oneself, except a superadmin re-asserting their own
///    `superadmin` role (a no-op);
/// 3. granting superadmin, or touching the role of a target who holds it,
///    requires the actor to hold superadmin;
/// 4. deleting or changing the status of an admin-level target requires the
///    actor to hold superadmin.
pub fn authorize(actor: &User, target: &User, action: AdminAction) -> Result<(), ApiError> {
    if !actor.has_admin_access() {
        return Err(ApiError::Forbidden("Admin access required".into()));
    }

    if actor.id == target.id {
        check_self_action(actor, action)?;
    }

    match action {
        AdminAction::ChangeRole(requested) => {
            if requested == EffectiveRole::SuperAdmin && !actor.is_superadmin() {
                return Err(ApiError::Forbidden(
                    "Only superadmin can grant superadmin role".into(),
                ));
            }
            if target.is_superadmin() && !actor.is_superadmin() {
                return Err(ApiError::Forbidden(
                    "Only superadmin can modify a superadmin's role".into(),
                ));
            }
        }
        AdminAction::Delete => {
            if target.has_admin_access() && !actor.is_superadmin() {
                return Err(ApiError::Forbidden(
                    "Only superadmin can delete admin users".into(),
                ));
            }
        }
        AdminAction::ChangeStatus => {
            if target.has_admin_access() && !actor.is_superadmin() {
                return Err(ApiError::Forbidden(
                    "Only superadmin can change admin user status".into(),
                ));
            }
        }
    }

    Ok(())
}

fn check_self_action(actor: &User, action: AdminAction) -> Result<(), ApiError> {
    match action {
        AdminAction::ChangeRole(requested) => {
            // A superadmin keeping their own superadmin role is a no-op.
            if actor.is_superadmin() && requested == EffectiveRole::SuperAdmin {
                return Ok(());
            }
            let reason = if actor.is_superadmin() {
                "Cannot remove your own superadmin role"
            } else {
                "Cannot change your own role"
            };
            Err(ApiError::SelfAction(reason.into()))
        }
        AdminAction::ChangeStatus => {
            Err(ApiError::SelfAction("Cannot change your own status".into()))
        }
        AdminAction::Delete => {
            Err(ApiError::SelfAction("Cannot delete your own account".into()))
        }
    }
}
