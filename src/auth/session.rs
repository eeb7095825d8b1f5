use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::cookies::SessionTokens;
use super::identity::{AuthSession, Identity, IdentityProvider};
use super::role_store::RoleStore;
use super::Role;
use crate::jwt::decode_unverified_role;

/// Authenticated identity with its resolved role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

/// Where a session's role came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RoleSource {
    /// `user_role` claim in the access token.
    Claim,
    /// Row in the role table.
    Store,
    /// Nothing found, lowest tier assumed.
    Default,
}

/// Result of the per-request session check done by the middleware.
#[derive(Debug, Clone, Default)]
pub struct SessionCheck {
    pub identity: Option<Identity>,
    /// Set when an expired access token was replaced using the refresh token.
    pub refreshed: Option<AuthSession>,
    /// The refresh token was rejected; the session cookies are dead.
    pub cleared: bool,
}

impl SessionCheck {
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

#[derive(Clone)]
pub struct SessionAccessor {
    identity: Arc<dyn IdentityProvider>,
    roles: Arc<dyn RoleStore>,
}

impl SessionAccessor {
    pub fn new(identity: Arc<dyn IdentityProvider>, roles: Arc<dyn RoleStore>) -> Self {
        Self { identity, roles }
    }

    pub fn identity_provider(&self) -> &Arc<dyn IdentityProvider> {
        &self.identity
    }

    pub fn role_store(&self) -> &Arc<dyn RoleStore> {
        &self.roles
    }

    async fn current_identity(&self, access_token: Option<&str>) -> Option<Identity> {
        let token = access_token?;
        match self.identity.get_user(token).await {
            Ok(identity) => identity,
            Err(err) => {
                tracing::warn!(error = %err, "identity lookup failed, treating request as anonymous");
                None
            }
        }
    }

    async fn stored_role(&self, user_id: Uuid) -> Option<Role> {
        match self.roles.role_for(user_id).await {
            Ok(role) => role,
            Err(err) => {
                tracing::warn!(user_id = %user_id, error = %err, "role lookup failed, assuming no record");
                None
            }
        }
    }

    /// Authoritative session used for gating: verified identity plus the
    /// stored role, `user` when no role record exists.
    pub async fn server_session(&self, access_token: Option<&str>) -> Option<SessionUser> {
        let identity = self.current_identity(access_token).await?;
        let role = self.stored_role(identity.id).await.unwrap_or_default();

        Some(SessionUser {
            id: identity.id,
            email: identity.email,
            role,
        })
    }

    /// Session for client-side rendering decisions.
    ///
    /// Reads the role claim straight from the token first and only falls
    /// back to the role table when the claim is missing or undecodable. Never
    /// use the result for access control.
    pub async fn client_session(&self, access_token: Option<&str>) -> Option<(SessionUser, RoleSource)> {
        let token = access_token?;
        let identity = self.current_identity(Some(token)).await?;

        let claimed = match decode_unverified_role(token) {
            Ok(role) => role,
            Err(err) => {
                tracing::warn!(user_id = %identity.id, error = %err, "could not decode role claim");
                None
            }
        };

        let (role, source) = match claimed {
            Some(role) => (role, RoleSource::Claim),
            None => match self.stored_role(identity.id).await {
                Some(role) => (role, RoleSource::Store),
                None => (Role::User, RoleSource::Default),
            },
        };

        Some((
            SessionUser {
                id: identity.id,
                email: identity.email,
                role,
            },
            source,
        ))
    }

    /// Verifies the request's access token, refreshing the session from the
    /// refresh token when the access token is missing or no longer valid.
    pub async fn check(&self, tokens: &SessionTokens) -> SessionCheck {
        if let Some(identity) = self.current_identity(tokens.access_token.as_deref()).await {
            return SessionCheck {
                identity: Some(identity),
                ..SessionCheck::default()
            };
        }

        let Some(refresh_token) = tokens.refresh_token.as_deref() else {
            return SessionCheck::default();
        };

        match self.identity.refresh_session(refresh_token).await {
            Ok(session) => {
                tracing::debug!(user_id = %session.user.id, "session refreshed");
                SessionCheck {
                    identity: Some(session.user.clone()),
                    refreshed: Some(session),
                    cleared: false,
                }
            }
            Err(err) => {
                tracing::info!(error = %err, "session refresh failed, dropping session cookies");
                SessionCheck {
                    cleared: true,
                    ..SessionCheck::default()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SignUpOutcome;
    use crate::errors::{AppError, AppResult};
    use crate::jwt::JwtConfig;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct TokenIdentity {
        jwt: JwtConfig,
        refreshable: Option<(String, AuthSession)>,
    }

    #[async_trait]
    impl IdentityProvider for TokenIdentity {
        async fn get_user(&self, access_token: &str) -> AppResult<Option<Identity>> {
            Ok(self.jwt.decode(access_token).ok().map(|claims| Identity {
                id: claims.sub,
                email: claims.email.unwrap_or_default(),
            }))
        }

        async fn refresh_session(&self, refresh_token: &str) -> AppResult<AuthSession> {
            match &self.refreshable {
                Some((token, session)) if token == refresh_token => Ok(session.clone()),
                _ => Err(AppError::identity("Invalid Refresh Token")),
            }
        }

        async fn sign_in(&self, _: &str, _: &str) -> AppResult<AuthSession> {
            Err(AppError::identity("unsupported"))
        }

        async fn sign_up(&self, _: &str, _: &str, _: &str) -> AppResult<SignUpOutcome> {
            Err(AppError::identity("unsupported"))
        }

        async fn sign_out(&self, _: &str) -> AppResult<()> {
            Ok(())
        }

        async fn send_password_reset(&self, _: &str, _: &str) -> AppResult<()> {
            Ok(())
        }

        async fn update_password(&self, _: &str, _: &str) -> AppResult<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct MapRoles {
        roles: HashMap<Uuid, Role>,
        broken: bool,
    }

    #[async_trait]
    impl RoleStore for MapRoles {
        async fn role_for(&self, user_id: Uuid) -> AppResult<Option<Role>> {
            if self.broken {
                return Err(AppError::internal("role table unavailable"));
            }
            Ok(self.roles.get(&user_id).copied())
        }

        async fn ping(&self) -> AppResult<()> {
            Ok(())
        }
    }

    fn accessor(roles: MapRoles, refreshable: Option<(String, AuthSession)>) -> (SessionAccessor, JwtConfig) {
        let jwt = JwtConfig::new("unit-secret");
        let identity = TokenIdentity {
            jwt: jwt.clone(),
            refreshable,
        };
        (SessionAccessor::new(Arc::new(identity), Arc::new(roles)), jwt)
    }

    #[tokio::test]
    async fn missing_role_record_resolves_to_user() {
        let (accessor, jwt) = accessor(MapRoles::default(), None);
        let token = jwt.encode(Uuid::new_v4(), "a@example.com", None).unwrap();

        let session = accessor.server_session(Some(&token)).await.unwrap();
        assert_eq!(session.role, Role::User);
    }

    #[tokio::test]
    async fn stored_role_is_used_by_server_session() {
        let id = Uuid::new_v4();
        let roles = MapRoles {
            roles: HashMap::from([(id, Role::Teamer)]),
            ..MapRoles::default()
        };
        let (accessor, jwt) = accessor(roles, None);
        // the claim is ignored on the authoritative path
        let token = jwt.encode(id, "t@example.com", Some(Role::Admin)).unwrap();

        let session = accessor.server_session(Some(&token)).await.unwrap();
        assert_eq!(session.role, Role::Teamer);
        assert_eq!(session.email, "t@example.com");
    }

    #[tokio::test]
    async fn role_store_failure_fails_closed() {
        let roles = MapRoles {
            broken: true,
            ..MapRoles::default()
        };
        let (accessor, jwt) = accessor(roles, None);
        let token = jwt.encode(Uuid::new_v4(), "a@example.com", None).unwrap();

        let session = accessor.server_session(Some(&token)).await.unwrap();
        assert_eq!(session.role, Role::User);
    }

    #[tokio::test]
    async fn no_token_means_no_session() {
        let (accessor, _) = accessor(MapRoles::default(), None);
        assert!(accessor.server_session(None).await.is_none());
        assert!(accessor.server_session(Some("garbage")).await.is_none());
    }

    #[tokio::test]
    async fn client_session_prefers_claim() {
        let (accessor, jwt) = accessor(MapRoles::default(), None);
        let token = jwt.encode(Uuid::new_v4(), "a@example.com", Some(Role::Admin)).unwrap();

        let (session, source) = accessor.client_session(Some(&token)).await.unwrap();
        assert_eq!(session.role, Role::Admin);
        assert_eq!(source, RoleSource::Claim);
    }

    #[tokio::test]
    async fn client_session_falls_back_to_store_then_default() {
        let stored = Uuid::new_v4();
        let roles = MapRoles {
            roles: HashMap::from([(stored, Role::Teamer)]),
            ..MapRoles::default()
        };
        let (accessor, jwt) = accessor(roles, None);

        let token = jwt.encode(stored, "s@example.com", None).unwrap();
        let (session, source) = accessor.client_session(Some(&token)).await.unwrap();
        assert_eq!((session.role, source), (Role::Teamer, RoleSource::Store));

        let token = jwt.encode(Uuid::new_v4(), "n@example.com", None).unwrap();
        let (session, source) = accessor.client_session(Some(&token)).await.unwrap();
        assert_eq!((session.role, source), (Role::User, RoleSource::Default));
    }

    #[tokio::test]
    async fn check_refreshes_expired_sessions() {
        let refreshed = AuthSession {
            access_token: "new-access".into(),
            refresh_token: "new-refresh".into(),
            expires_in: 3600,
            user: Identity {
                id: Uuid::new_v4(),
                email: "r@example.com".into(),
            },
        };
        let (accessor, _) = accessor(MapRoles::default(), Some(("old-refresh".into(), refreshed)));

        let tokens = SessionTokens {
            access_token: Some("expired".into()),
            refresh_token: Some("old-refresh".into()),
        };
        let check = accessor.check(&tokens).await;
        assert!(check.is_authenticated());
        assert_eq!(check.refreshed.unwrap().access_token, "new-access");

        let tokens = SessionTokens {
            access_token: None,
            refresh_token: Some("revoked".into()),
        };
        let check = accessor.check(&tokens).await;
        assert!(!check.is_authenticated());
        assert!(check.refreshed.is_none());
        assert!(check.cleared);

        let check = accessor.check(&SessionTokens::default()).await;
        assert!(!check.cleared, "no refresh cookie means nothing to clear");
    }
}
