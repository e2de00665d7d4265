//! Data structures for authentication-related entities.
//!
//! Defines the effective-role tier derived from a user's role tags, the JWT
//! claims embedded in session tokens, and the role-set algebra used by the
//! role mutation service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::database::models::{Role, User};

/// Single highest-privilege tier derived from a role set, used for display
/// and as the closed value set accepted at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectiveRole {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "superadmin")]
    SuperAdmin,
}

impl fmt::Display for EffectiveRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EffectiveRole::User => "user",
            EffectiveRole::Admin => "admin",
            EffectiveRole::SuperAdmin => "superadmin",
        };
        f.write_str(s)
    }
}

impl FromStr for EffectiveRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(EffectiveRole::User),
            "admin" => Ok(EffectiveRole::Admin),
            "superadmin" => Ok(EffectiveRole::SuperAdmin),
            _ => Err(()),
        }
    }
}

/// superadmin > admin > user.
pub fn effective_role(roles: &[Role]) -> EffectiveRole {
    if roles.contains(&Role::SuperAdmin) {
        EffectiveRole::SuperAdmin
    } else if roles.contains(&Role::Admin) {
        EffectiveRole::Admin
    } else {
        EffectiveRole::User
    }
}

/// Rebuild a role set for a requested tier: strip any existing admin tags,
/// then re-add per the request (`superadmin` implies `admin`). The base
/// `student` tag is restored if stripping emptied the set, keeping the
/// role-set-non-empty invariant.
pub fn apply_effective_role(current: &[Role], requested: EffectiveRole) -> Vec<Role> {
    let mut roles: Vec<Role> = current
        .iter()
        .copied()
        .filter(|r| !matches!(r, Role::Admin | Role::SuperAdmin))
        .collect();
    if roles.is_empty() {
        roles.push(Role::Student);
    }

    match requested {
        EffectiveRole::SuperAdmin => {
            push_unique(&mut roles, Role::Admin);
            push_unique(&mut roles, Role::SuperAdmin);
        }
        EffectiveRole::Admin => push_unique(&mut roles, Role::Admin),
        EffectiveRole::User => {}
    }
    roles
}

fn push_unique(roles: &mut Vec<Role>, role: Role) {
    if !roles.contains(&role) {
        roles.push(role);
    }
}

/// Claims embedded in a session token. A snapshot at issuance: a later role
/// change on the user record does not rewrite live tokens, so `role` is only
/// a hint and authorization always re-reads the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Claims for the short-lived OAuth handoff state token passed through the
/// redirect URL in place of any process-global session storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandoffClaims {
    pub email: String,
    pub nonce: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Public user summary returned by the account endpoints.
#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub roles: Vec<Role>,
    pub role: String,
    pub profile: crate::database::models::Profile,
}

impl SessionUser {
    pub fn from_user(user: &User) -> Self {
        SessionUser {
            id: user.id.to_hex(),
            email: user.email.clone(),
            name: user.name.clone(),
            roles: user.roles.clone(),
            role: effective_role(&user.roles).to_string(),
            profile: user.profile.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_role_prefers_superadmin() {
        let roles = vec![Role::Student, Role::Admin, Role::SuperAdmin];
        assert_eq!(effective_role(&roles), EffectiveRole::SuperAdmin);
        assert_eq!(effective_role(&[Role::Student, Role::Admin]), EffectiveRole::Admin);
        assert_eq!(effective_role(&[Role::Student]), EffectiveRole::User);
        assert_eq!(effective_role(&[]), EffectiveRole::User);
    }

    #[test]
    fn promoting_to_superadmin_implies_admin() {
        let roles = apply_effective_role(&[Role::Student], EffectiveRole::SuperAdmin);
        assert_eq!(roles, vec![Role::Student, Role::Admin, Role::SuperAdmin]);
    }

    #[test]
    fn demotion_strips_both_admin_tags() {
        let current = vec![Role::Student, Role::Admin, Role::SuperAdmin];
        let roles = apply_effective_role(&current, EffectiveRole::Admin);
        assert_eq!(roles, vec![Role::Student, Role::Admin]);

        let roles = apply_effective_role(&current, EffectiveRole::User);
        assert_eq!(roles, vec![Role::Student]);
    }

    #[test]
    fn base_tags_survive_role_changes() {
        let current = vec![Role::Student, Role::PoliceOb, Role::Admin];
        let roles = apply_effective_role(&current, EffectiveRole::User);
        assert_eq!(roles, vec![Role::Student, Role::PoliceOb]);
    }

    #[test]
    fn stripping_everything_restores_student_base() {
        let roles = apply_effective_role(&[Role::Admin], EffectiveRole::User);
        assert_eq!(roles, vec![Role::Student]);
    }

    #[test]
    fn role_set_change_is_idempotent() {
        let current = vec![Role::Student, Role::Admin];
        assert_eq!(apply_effective_role(&current, EffectiveRole::Admin), current);
    }

    #[test]
    fn effective_role_round_trips_through_strings() {
        for role in [EffectiveRole::User, EffectiveRole::Admin, EffectiveRole::SuperAdmin] {
            assert_eq!(role.to_string().parse::<EffectiveRole>(), Ok(role));
        }
        assert!("root".parse::<EffectiveRole>().is_err());
    }
}
