//! Session tokens for filevault.
//!
//! A session is nothing more than a cache entry `auth_<token>` holding the
//! owner's user ID. It is valid while the entry exists; expiry is left to
//! the cache store.

use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::password::verify_password;
use crate::cache::CacheStore;
use crate::db::UserStore;
use crate::{Result, VaultError};

/// Default session lifetime (24 hours).
pub const DEFAULT_SESSION_TTL_SECS: u64 = 24 * 60 * 60;

/// Prefix of session keys in the cache store.
pub const SESSION_KEY_PREFIX: &str = "auth_";

/// Cache key for a session token.
pub fn session_key(token: &str) -> String {
    format!("{SESSION_KEY_PREFIX}{token}")
}

/// Email and password decoded from a base64 `email:password` pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Login email.
    pub email: String,
    /// Plain password.
    pub password: String,
}

impl Credentials {
    /// Decode a base64 `email:password` pair.
    ///
    /// The pair is split at the first colon, so passwords may contain
    /// colons. Both parts must be non-empty.
    pub fn decode(encoded: &str) -> Result<Self> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|_| VaultError::Unauthorized)?;
        let decoded = String::from_utf8(bytes).map_err(|_| VaultError::Unauthorized)?;

        let (email, password) = decoded.split_once(':').ok_or(VaultError::Unauthorized)?;
        if email.is_empty() || password.is_empty() {
            return Err(VaultError::Unauthorized);
        }

        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Exchanges credentials for tokens and resolves tokens to user IDs.
#[derive(Clone)]
pub struct SessionManager {
    cache: Arc<dyn CacheStore>,
    users: Arc<dyn UserStore>,
    ttl: Duration,
}

impl SessionManager {
    /// Create a session manager with the default 24 hour lifetime.
    pub fn new(cache: Arc<dyn CacheStore>, users: Arc<dyn UserStore>) -> Self {
        Self {
            cache,
            users,
            ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
        }
    }

    /// Override the session lifetime.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Session lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Exchange a base64 `email:password` pair for a new session token.
    ///
    /// An unknown email and a wrong password both yield `Unauthorized`.
    pub async fn authenticate(&self, encoded: &str) -> Result<String> {
        let credentials = Credentials::decode(encoded)?;

        let user = self
            .users
            .find_by_email(&credentials.email)
            .await?
            .ok_or(VaultError::Unauthorized)?;

        let digest = user.password_digest.clone();
        let password = credentials.password;
        let verified = tokio::task::spawn_blocking(move || verify_password(&password, &digest))
            .await
            .map_err(|e| VaultError::Internal(format!("password check aborted: {e}")))?;

        if verified.is_err() {
            debug!(email = %credentials.email, "Rejected credentials");
            return Err(VaultError::Unauthorized);
        }

        let token = Uuid::new_v4().to_string();
        self.cache
            .set(&session_key(&token), &user.id.to_string(), self.ttl)
            .await?;

        info!(user_id = user.id, "Session created");
        Ok(token)
    }

    /// Resolve a token to its user ID.
    ///
    /// A missing token, an unknown token and an expired token are all
    /// `Unauthorized`.
    pub async fn validate(&self, token: Option<&str>) -> Result<i64> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(VaultError::Unauthorized)?;

        let value = self
            .cache
            .get(&session_key(token))
            .await?
            .ok_or(VaultError::Unauthorized)?;

        value.parse::<i64>().map_err(|_| {
            warn!("Session entry holds a non-numeric user id");
            VaultError::Unauthorized
        })
    }

    /// Delete a session. Revoking an absent token succeeds.
    pub async fn revoke(&self, token: &str) -> Result<()> {
        self.cache.delete(&session_key(token)).await?;
        debug!("Session revoked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::db::{NewUser, UserRepository};
    use crate::Database;

    fn encode(pair: &str) -> String {
        STANDARD.encode(pair)
    }

    async fn setup() -> (SessionManager, Arc<MemoryCache>, i64) {
        let db = Database::open_in_memory().await.unwrap();
        let users = UserRepository::new(db.pool());
        let user = users
            .insert(&NewUser::with_password("bob@dylan.com", "toto1234!").unwrap())
            .await
            .unwrap();

        let cache = Arc::new(MemoryCache::new());
        let manager = SessionManager::new(cache.clone(), Arc::new(users));
        (manager, cache, user.id)
    }

    #[test]
    fn test_credentials_decode() {
        let creds = Credentials::decode(&encode("bob@dylan.com:toto1234!")).unwrap();
        assert_eq!(creds.email, "bob@dylan.com");
        assert_eq!(creds.password, "toto1234!");
    }

    #[test]
    fn test_credentials_password_may_contain_colon() {
        let creds = Credentials::decode(&encode("a@b.c:pa:ss")).unwrap();
        assert_eq!(creds.password, "pa:ss");
    }

    #[test]
    fn test_credentials_rejects_incomplete_pairs() {
        assert!(Credentials::decode(&encode("no-colon")).is_err());
        assert!(Credentials::decode(&encode(":password")).is_err());
        assert!(Credentials::decode(&encode("email@x.y:")).is_err());
        assert!(Credentials::decode("***not base64***").is_err());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::decode(&encode("a@b.c:secret-pass")).unwrap();
        assert!(!format!("{creds:?}").contains("secret-pass"));
    }

    #[tokio::test]
    async fn test_authenticate_and_validate() {
        let (manager, cache, user_id) = setup().await;

        let token = manager
            .authenticate(&encode("bob@dylan.com:toto1234!"))
            .await
            .unwrap();

        let stored = cache.get(&session_key(&token)).await.unwrap();
        assert_eq!(stored, Some(user_id.to_string()));
        assert_eq!(manager.validate(Some(&token)).await.unwrap(), user_id);
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let (manager, _cache, _) = setup().await;
        let result = manager.authenticate(&encode("bob@dylan.com:wrong-pass")).await;
        assert!(matches!(result, Err(VaultError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_email() {
        let (manager, _cache, _) = setup().await;
        let result = manager.authenticate(&encode("who@where.com:toto1234!")).await;
        assert!(matches!(result, Err(VaultError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_each_login_gets_a_distinct_token() {
        let (manager, _cache, user_id) = setup().await;
        let first = manager
            .authenticate(&encode("bob@dylan.com:toto1234!"))
            .await
            .unwrap();
        let second = manager
            .authenticate(&encode("bob@dylan.com:toto1234!"))
            .await
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(manager.validate(Some(&first)).await.unwrap(), user_id);
        assert_eq!(manager.validate(Some(&second)).await.unwrap(), user_id);
    }

    #[tokio::test]
    async fn test_validate_missing_or_unknown_token() {
        let (manager, _cache, _) = setup().await;
        assert!(matches!(
            manager.validate(None).await,
            Err(VaultError::Unauthorized)
        ));
        assert!(matches!(
            manager.validate(Some("")).await,
            Err(VaultError::Unauthorized)
        ));
        assert!(matches!(
            manager.validate(Some("not-a-token")).await,
            Err(VaultError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let (manager, _cache, _) = setup().await;
        let token = manager
            .authenticate(&encode("bob@dylan.com:toto1234!"))
            .await
            .unwrap();

        manager.revoke(&token).await.unwrap();
        manager.revoke(&token).await.unwrap();
        assert!(matches!(
            manager.validate(Some(&token)).await,
            Err(VaultError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected() {
        let (manager, _cache, _) = setup().await;
        let manager = manager.with_ttl(Duration::from_millis(20));
        let token = manager
            .authenticate(&encode("bob@dylan.com:toto1234!"))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(matches!(
            manager.validate(Some(&token)).await,
            Err(VaultError::Unauthorized)
        ));
    }
}
