//! Session Resolution
//!
//! Turns a presented session token into the signed-in user.
//! Token format: `{session_id}.{base64url(HMAC-SHA256(session_id))}`.

use kernel::clock::Clock;
use kernel::principal::AuthenticatedUser;
use platform::crypto::{constant_time_eq, hmac_sha256, to_base64url};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::config::SessionConfig;
use crate::domain::repository::SessionRepository;
use crate::error::ResetResult;

pub struct SessionResolver<S>
where
    S: SessionRepository + Send + Sync + 'static,
{
    session_repo: Arc<S>,
    config: Arc<SessionConfig>,
    clock: Arc<dyn Clock>,
}

impl<S> Clone for SessionResolver<S>
where
    S: SessionRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            session_repo: self.session_repo.clone(),
            config: self.config.clone(),
            clock: self.clock.clone(),
        }
    }
}

impl<S> SessionResolver<S>
where
    S: SessionRepository + Send + Sync + 'static,
{
    pub fn new(session_repo: Arc<S>, config: Arc<SessionConfig>, clock: Arc<dyn Clock>) -> Self {
        Self {
            session_repo,
            config,
            clock,
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.config.cookie_name
    }

    /// Token a client presents for `session_id`
    pub fn sign(&self, session_id: Uuid) -> String {
        let id = session_id.to_string();
        format!("{}.{}", id, self.signature(&id))
    }

    /// `None` for a forged, unknown or expired token, or a deleted user.
    pub async fn resolve(&self, token: &str) -> ResetResult<Option<AuthenticatedUser>> {
        let Some(session_id) = self.parse_token(token) else {
            return Ok(None);
        };

        let Some(session) = self.session_repo.find_session(session_id).await? else {
            return Ok(None);
        };

        if session.is_expired(self.clock.now()) {
            return Ok(None);
        }

        Ok(Some(AuthenticatedUser::new(session.user_id)))
    }

    fn signature(&self, session_id: &str) -> String {
        to_base64url(&hmac_sha256(
            self.config.session_secret.as_bytes(),
            session_id.as_bytes(),
        ))
    }

    fn parse_token(&self, token: &str) -> Option<Uuid> {
        let (id, signature) = token.split_once('.')?;
        if !constant_time_eq(self.signature(id).as_bytes(), signature.as_bytes()) {
            return None;
        }
        id.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::auth_session::AuthSession;
    use chrono::{DateTime, Utc};
    use kernel::clock::ManualClock;
    use kernel::id::UserId;
    use platform::config::SigningSecret;

    const T0: i64 = 1_700_000_000_000;

    struct OneSession(AuthSession);

    impl SessionRepository for OneSession {
        async fn find_session(&self, session_id: Uuid) -> ResetResult<Option<AuthSession>> {
            Ok((self.0.session_id == session_id).then(|| self.0.clone()))
        }
    }

    fn setup(expires_at: DateTime<Utc>) -> (SessionResolver<OneSession>, Uuid, Arc<ManualClock>) {
        let session_id = Uuid::new_v4();
        let clock = Arc::new(ManualClock::at_ms(T0));
        let repo = OneSession(AuthSession {
            session_id,
            user_id: UserId::new("user-1"),
            expires_at,
        });
        let config = SessionConfig::new(SigningSecret::random());
        (
            SessionResolver::new(Arc::new(repo), Arc::new(config), clock.clone()),
            session_id,
            clock,
        )
    }

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    #[tokio::test]
    async fn test_signed_session_resolves() {
        let (resolver, session_id, _) = setup(at(T0 + 60_000));
        let user = resolver.resolve(&resolver.sign(session_id)).await.unwrap();
        assert_eq!(user, Some(AuthenticatedUser::new("user-1")));
    }

    #[tokio::test]
    async fn test_forged_signature_is_ignored() {
        let (resolver, session_id, _) = setup(at(T0 + 60_000));
        let mut token = resolver.sign(session_id);
        token.pop();
        token.push('A');

        assert_eq!(resolver.resolve(&token).await.unwrap(), None);
        assert_eq!(resolver.resolve(&session_id.to_string()).await.unwrap(), None);
        assert_eq!(resolver.resolve("").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_signature_from_other_secret_is_ignored() {
        let (resolver, session_id, _) = setup(at(T0 + 60_000));
        let (other, _, _) = setup(at(T0 + 60_000));
        assert_eq!(resolver.resolve(&other.sign(session_id)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unknown_session_is_ignored() {
        let (resolver, _, _) = setup(at(T0 + 60_000));
        let token = resolver.sign(Uuid::new_v4());
        assert_eq!(resolver.resolve(&token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_session_is_ignored() {
        let (resolver, session_id, clock) = setup(at(T0 + 60_000));
        let token = resolver.sign(session_id);

        clock.advance(chrono::Duration::seconds(60));
        assert!(resolver.resolve(&token).await.unwrap().is_some());
        clock.advance(chrono::Duration::milliseconds(1));
        assert_eq!(resolver.resolve(&token).await.unwrap(), None);
    }
}
