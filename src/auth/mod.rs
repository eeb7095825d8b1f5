//! Authentication and authorization.
//!
//! - `policy`: the single role policy used by every enforcement point
//! - `identity`: the hosted identity provider client
//! - `role_store`: read-only access to persisted roles
//! - `session`: identity + role resolution (server and client variants)
//! - `guard`: `require_role` for server pages
//! - `cookies`: session token transport

pub mod cookies;
mod guard;
pub mod identity;
mod policy;
mod role_store;
mod session;

pub use cookies::SessionTokens;
pub use guard::{dashboard_path, login_path, require_role};
pub use identity::{AuthSession, HostedIdentityProvider, Identity, IdentityConfig, IdentityProvider, SignUpOutcome};
pub use policy::{is_admin, is_teamer, role_or_default, satisfies, satisfies_named, Role};
pub use role_store::{RoleStore, SqlRoleStore};
pub use session::{RoleSource, SessionAccessor, SessionCheck, SessionUser};
