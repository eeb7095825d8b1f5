use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Privilege tier of a portal user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Teamer,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::User, Role::Teamer, Role::Admin];

    pub const fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Teamer => "teamer",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "teamer" => Ok(Role::Teamer),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Whether a user holding `user_role` may access content gated at `required`.
///
/// Each tier is an explicit membership test rather than an ordering.
pub fn satisfies(user_role: Role, required: Role) -> bool {
    match required {
        Role::User => true,
        Role::Teamer => matches!(user_role, Role::Teamer | Role::Admin),
        Role::Admin => user_role == Role::Admin,
    }
}

/// String form of [`satisfies`] for untyped input such as query parameters.
///
/// A missing user role counts as `user`; an unknown required role is denied.
pub fn satisfies_named(user_role: Option<Role>, required: &str) -> bool {
    match required.parse::<Role>() {
        Ok(required) => satisfies(role_or_default(user_role), required),
        Err(_) => {
            tracing::debug!(required = %required, "unknown required role, denying");
            false
        }
    }
}

pub fn role_or_default(role: Option<Role>) -> Role {
    role.unwrap_or_default()
}

pub fn is_admin(role: Role) -> bool {
    satisfies(role, Role::Admin)
}

pub fn is_teamer(role: Role) -> bool {
    satisfies(role, Role::Teamer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_tier_admits_everyone() {
        for role in Role::ALL {
            assert!(satisfies(role, Role::User));
        }
        assert!(satisfies_named(None, "user"));
    }

    #[test]
    fn teamer_tier() {
        assert!(satisfies(Role::Admin, Role::Teamer));
        assert!(satisfies(Role::Teamer, Role::Teamer));
        assert!(!satisfies(Role::User, Role::Teamer));
    }

    #[test]
    fn admin_tier() {
        assert!(satisfies(Role::Admin, Role::Admin));
        assert!(!satisfies(Role::Teamer, Role::Admin));
        assert!(!satisfies(Role::User, Role::Admin));
    }

    #[test]
    fn unknown_required_role_fails_closed() {
        assert!(!satisfies_named(Some(Role::Admin), "superuser"));
        assert!(!satisfies_named(Some(Role::Admin), ""));
        assert!(!satisfies_named(Some(Role::Admin), "Admin"));
    }

    #[test]
    fn missing_role_defaults_to_user() {
        assert_eq!(role_or_default(None), Role::User);
        assert!(!satisfies_named(None, "teamer"));
    }

    #[test]
    fn helpers() {
        assert!(is_admin(Role::Admin));
        assert!(!is_admin(Role::Teamer));
        assert!(is_teamer(Role::Admin));
        assert!(!is_teamer(Role::User));
    }
}
