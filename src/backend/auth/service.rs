/**
 * Session Issuer
 *
 * Orchestrates password verification, token issuance and token resolution.
 *
 * # Flows
 *
 * - **Login**: find principal by email → verify password → issue pair
 * - **Register**: check role → hash password → create principal → issue pair
 * - **Who am I**: verify access token → re-fetch live principal by ID
 * - **Refresh**: verify refresh token → re-fetch live principal → issue pair
 *
 * Login reports an unknown email and a wrong password as the same
 * `InvalidCredential`; the distinction only reaches the logs. An unknown
 * email still pays for one bcrypt verification against a placeholder hash
 * so both failures take the same time.
 *
 * The issuer holds only read-only configuration and shared stores, so one
 * instance serves every request concurrently.
 */

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::backend::auth::claims::{Claims, TokenPair};
use crate::backend::auth::password::PasswordHasher;
use crate::backend::auth::roles::RoleStore;
use crate::backend::auth::sessions::{issue_token_pair, verify_token, verify_token_at};
use crate::backend::auth::users::{NewPrincipal, Principal, PrincipalStore, StoreError};
use crate::backend::error::AuthError;
use crate::shared::{AppConfig, JwtSecret};

/// Fields supplied when registering a new principal
#[derive(Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    /// Plaintext password; hashed and dropped during registration
    pub password: String,
    pub role_id: i32,
}

/// Tokens issued for a principal, together with the principal itself
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub tokens: TokenPair,
    pub principal: Principal,
}

/// Token issuance settings taken from configuration
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub issuer: String,
    pub secret: JwtSecret,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl From<&AppConfig> for TokenSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            issuer: config.issuer().to_string(),
            secret: config.jwt.secret.clone(),
            access_ttl: config.jwt.access_ttl,
            refresh_ttl: config.jwt.refresh_ttl,
        }
    }
}

/// Plaintext behind the placeholder hash checked for unknown emails
const PLACEHOLDER_PASSWORD: &str = "placeholder-password";

/// Issues and resolves session tokens
pub struct SessionIssuer {
    users: Arc<dyn PrincipalStore>,
    roles: Arc<dyn RoleStore>,
    hasher: PasswordHasher,
    settings: TokenSettings,
    /// Hash at the configured cost, verified when the email is unknown
    placeholder_hash: String,
}

impl SessionIssuer {
    pub fn new(
        users: Arc<dyn PrincipalStore>,
        roles: Arc<dyn RoleStore>,
        hasher: PasswordHasher,
        settings: TokenSettings,
    ) -> Self {
        let placeholder_hash = hasher.hash(PLACEHOLDER_PASSWORD).unwrap_or_else(|e| {
            tracing::warn!("Could not prepare placeholder hash: {}", e);
            String::new()
        });

        Self {
            users,
            roles,
            hasher,
            settings,
            placeholder_hash,
        }
    }

    /// Build an issuer from loaded configuration
    pub fn from_config(
        config: &AppConfig,
        users: Arc<dyn PrincipalStore>,
        roles: Arc<dyn RoleStore>,
    ) -> Self {
        Self::new(
            users,
            roles,
            PasswordHasher::new(config.password_cost),
            TokenSettings::from(config),
        )
    }

    pub fn settings(&self) -> &TokenSettings {
        &self.settings
    }

    /// Check an email/password pair.
    ///
    /// Unknown email is `NotFound`, wrong password is `InvalidCredential`.
    pub async fn authenticate(&self, email: &str, password: String) -> Result<Principal, AuthError> {
        let Some(principal) = self.users.find_by_email(email).await? else {
            self.verify_password(password, self.placeholder_hash.clone()).await?;
            tracing::warn!("Authentication for unknown email: {}", email);
            return Err(AuthError::NotFound);
        };

        let valid = self
            .verify_password(password, principal.password_hash.clone())
            .await?;

        if !valid {
            tracing::warn!("Invalid password for principal {}", principal.id);
            return Err(AuthError::InvalidCredential);
        }

        Ok(principal)
    }

    async fn verify_password(&self, password: String, hashed: String) -> Result<bool, AuthError> {
        let hasher = self.hasher;
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hashed))
            .await
            .map_err(|e| AuthError::internal(format!("password verification task failed: {}", e)))
    }

    /// Issue an access/refresh pair for an authenticated principal
    pub fn issue_tokens(&self, principal: &Principal) -> Result<TokenPair, AuthError> {
        tracing::info!("Issuing tokens for principal {}", principal.id);
        issue_token_pair(
            principal,
            &self.settings.issuer,
            self.settings.access_ttl,
            self.settings.refresh_ttl,
            &self.settings.secret,
            Utc::now(),
        )
    }

    /// Resolve a bearer token to the live principal it was issued for
    pub async fn resolve_principal(&self, token: &str) -> Result<Principal, AuthError> {
        let claims = verify_token(token, &self.settings.secret)?;
        self.load_principal(&claims).await
    }

    async fn load_principal(&self, claims: &Claims) -> Result<Principal, AuthError> {
        self.users
            .find_by_id(claims.principal_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!("Token references missing principal {}", claims.principal_id);
                AuthError::NotFound
            })
    }

    /// Authenticate and issue tokens
    pub async fn login(&self, email: &str, password: String) -> Result<IssuedSession, AuthError> {
        tracing::info!("Login attempt for {}", email);

        let principal = match self.authenticate(email, password).await {
            Ok(principal) => principal,
            Err(AuthError::NotFound) => return Err(AuthError::InvalidCredential),
            Err(e) => return Err(e),
        };
        let tokens = self.issue_tokens(&principal)?;

        tracing::info!("Principal {} logged in", principal.id);
        Ok(IssuedSession { tokens, principal })
    }

    /// Create a principal and issue tokens for it
    pub async fn register(&self, registration: Registration) -> Result<IssuedSession, AuthError> {
        let Registration {
            name,
            email,
            password,
            role_id,
        } = registration;
        tracing::info!("Register principal {} with role {}", email, role_id);

        if self.roles.get_role(role_id).await?.is_none() {
            tracing::warn!("Registration for {} references unknown role {}", email, role_id);
            return Err(AuthError::UnknownRole(role_id));
        }

        let hasher = self.hasher;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::internal(format!("password hashing task failed: {}", e)))??;

        let principal = self
            .users
            .create(NewPrincipal {
                name,
                email,
                password_hash,
                role_id,
            })
            .await
            .map_err(|e| {
                tracing::warn!("Failed to create principal: {}", e);
                match e {
                    StoreError::ForeignKey => AuthError::UnknownRole(role_id),
                    other => AuthError::from(other),
                }
            })?;
        let tokens = self.issue_tokens(&principal)?;

        tracing::info!("Principal {} registered", principal.id);
        Ok(IssuedSession { tokens, principal })
    }

    /// Current principal for an access token
    pub async fn who_am_i(&self, token: &str) -> Result<Principal, AuthError> {
        self.resolve_principal(token).await
    }

    /// Exchange a refresh token for a fresh pair.
    ///
    /// Access and refresh tokens share one claim template and differ only
    /// in expiry. When the refresh window is longer than the access window,
    /// a token with no more than `access_ttl` left is refused as
    /// `InvalidToken`. That rejects every access token, and a refresh token
    /// in its final `access_ttl` of life. With equal windows the two kinds
    /// cannot be told apart and both are accepted.
    pub async fn refresh(&self, refresh_token: &str) -> Result<IssuedSession, AuthError> {
        let now = Utc::now();
        let claims = verify_token_at(refresh_token, &self.settings.secret, now)?;

        if self.settings.refresh_ttl > self.settings.access_ttl
            && claims.expires_at - now <= self.settings.access_ttl
        {
            tracing::warn!(
                "Refresh refused for principal {}: token lifetime fits the access window",
                claims.principal_id
            );
            return Err(AuthError::InvalidToken);
        }

        let principal = self.load_principal(&claims).await?;
        let tokens = self.issue_tokens(&principal)?;
        Ok(IssuedSession { tokens, principal })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::roles::MemoryRoleStore;
    use crate::backend::auth::sessions::{sign_token, verify_token};
    use crate::backend::auth::users::MemoryPrincipalStore;
    use async_trait::async_trait;
    use assert_matches::assert_matches;
    use uuid::Uuid;

    fn settings() -> TokenSettings {
        TokenSettings {
            issuer: "ecomz-auth".to_string(),
            secret: JwtSecret::new("service-test-secret"),
            access_ttl: Duration::hours(24),
            refresh_ttl: Duration::days(7),
        }
    }

    fn issuer_with(users: Arc<MemoryPrincipalStore>) -> SessionIssuer {
        SessionIssuer::new(
            users,
            Arc::new(MemoryRoleStore::with_default_roles()),
            PasswordHasher::new(4),
            settings(),
        )
    }

    fn alice() -> Registration {
        Registration {
            name: "Alice".to_string(),
            email: "alice@x.com".to_string(),
            password: "secret1".to_string(),
            role_id: 2,
        }
    }

    #[tokio::test]
    async fn test_register_then_authenticate() {
        let issuer = issuer_with(Arc::new(MemoryPrincipalStore::new()));

        let session = issuer.register(alice()).await.unwrap();
        assert!(!session.principal.id.is_nil());
        assert!(!session.tokens.access_token.is_empty());
        assert!(!session.tokens.refresh_token.is_empty());
        assert_ne!(session.principal.password_hash, "secret1");

        let principal = issuer
            .authenticate("alice@x.com", "secret1".to_string())
            .await
            .unwrap();
        assert_eq!(principal.id, session.principal.id);

        let wrong = issuer.authenticate("alice@x.com", "wrong".to_string()).await;
        assert_matches!(wrong, Err(AuthError::InvalidCredential));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_email() {
        let issuer = issuer_with(Arc::new(MemoryPrincipalStore::new()));
        let result = issuer.authenticate("ghost@x.com", "secret1".to_string()).await;
        assert_matches!(result, Err(AuthError::NotFound));
    }

    #[tokio::test]
    async fn test_login_collapses_unknown_email() {
        let issuer = issuer_with(Arc::new(MemoryPrincipalStore::new()));
        issuer.register(alice()).await.unwrap();

        let unknown = issuer.login("ghost@x.com", "secret1".to_string()).await;
        let wrong = issuer.login("alice@x.com", "wrong".to_string()).await;
        assert_matches!(unknown, Err(AuthError::InvalidCredential));
        assert_matches!(wrong, Err(AuthError::InvalidCredential));

        let ok = issuer.login("alice@x.com", "secret1".to_string()).await.unwrap();
        assert_eq!(ok.principal.email, "alice@x.com");
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let issuer = issuer_with(Arc::new(MemoryPrincipalStore::new()));
        issuer.register(alice()).await.unwrap();

        let result = issuer.register(alice()).await;
        assert_matches!(result, Err(AuthError::Conflict));
    }

    #[tokio::test]
    async fn test_register_unknown_role() {
        let issuer = issuer_with(Arc::new(MemoryPrincipalStore::new()));
        let result = issuer
            .register(Registration {
                role_id: 42,
                ..alice()
            })
            .await;
        assert_matches!(result, Err(AuthError::UnknownRole(42)));
    }

    #[tokio::test]
    async fn test_resolve_principal_round_trip() {
        let issuer = issuer_with(Arc::new(MemoryPrincipalStore::new()));
        let session = issuer.register(alice()).await.unwrap();

        let resolved = issuer
            .resolve_principal(&session.tokens.access_token)
            .await
            .unwrap();
        assert_eq!(resolved.id, session.principal.id);

        let me = issuer.who_am_i(&session.tokens.access_token).await.unwrap();
        assert_eq!(me.email, "alice@x.com");
    }

    #[tokio::test]
    async fn test_resolve_principal_after_removal() {
        let users = Arc::new(MemoryPrincipalStore::new());
        let issuer = issuer_with(users.clone());
        let session = issuer.register(alice()).await.unwrap();

        users.remove(session.principal.id).await;
        let result = issuer.resolve_principal(&session.tokens.access_token).await;
        assert_matches!(result, Err(AuthError::NotFound));
    }

    #[tokio::test]
    async fn test_resolve_expired_token() {
        let issuer = issuer_with(Arc::new(MemoryPrincipalStore::new()));
        let claims = Claims::new(
            Uuid::new_v4(),
            "Alice",
            "alice@x.com",
            "ecomz-auth",
            Utc::now() - Duration::hours(1),
        );
        let token = sign_token(&claims, &settings().secret).unwrap();

        let result = issuer.resolve_principal(&token).await;
        assert_matches!(result, Err(AuthError::TokenExpired));
    }

    #[tokio::test]
    async fn test_refresh_issues_new_pair() {
        let issuer = issuer_with(Arc::new(MemoryPrincipalStore::new()));
        let session = issuer.register(alice()).await.unwrap();

        let refreshed = issuer.refresh(&session.tokens.refresh_token).await.unwrap();
        assert_eq!(refreshed.principal.id, session.principal.id);

        let access = verify_token(&refreshed.tokens.access_token, &settings().secret).unwrap();
        let refresh = verify_token(&refreshed.tokens.refresh_token, &settings().secret).unwrap();
        assert!(refresh.expires_at > access.expires_at);

        let invalid = issuer.refresh("not-a-token").await;
        assert_matches!(invalid, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token() {
        let issuer = issuer_with(Arc::new(MemoryPrincipalStore::new()));
        let session = issuer.register(alice()).await.unwrap();

        let result = issuer.refresh(&session.tokens.access_token).await;
        assert_matches!(result, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn test_refresh_near_end_of_life_rejected() {
        let issuer = issuer_with(Arc::new(MemoryPrincipalStore::new()));
        let session = issuer.register(alice()).await.unwrap();
        let claims = verify_token(&session.tokens.refresh_token, &settings().secret).unwrap();

        let late = sign_token(&claims.with_expiry(Utc::now() + Duration::hours(2)), &settings().secret).unwrap();
        assert_matches!(issuer.refresh(&late).await, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn test_refresh_with_equal_windows_accepts_access_token() {
        let equal = TokenSettings {
            refresh_ttl: Duration::hours(24),
            ..settings()
        };
        let issuer = SessionIssuer::new(
            Arc::new(MemoryPrincipalStore::new()),
            Arc::new(MemoryRoleStore::with_default_roles()),
            PasswordHasher::new(4),
            equal,
        );
        let session = issuer.register(alice()).await.unwrap();

        assert!(issuer.refresh(&session.tokens.access_token).await.is_ok());
    }

    #[test]
    fn test_placeholder_hash_uses_configured_cost() {
        let issuer = issuer_with(Arc::new(MemoryPrincipalStore::new()));
        assert!(issuer.placeholder_hash.starts_with("$2b$04$"));
        assert!(issuer.hasher.verify(PLACEHOLDER_PASSWORD, &issuer.placeholder_hash));
    }

    /// Principal store whose inserts hit a missing role
    struct MissingRoleStore;

    #[async_trait]
    impl PrincipalStore for MissingRoleStore {
        async fn find_by_email(&self, _email: &str) -> Result<Option<Principal>, StoreError> {
            Ok(None)
        }

        async fn find_by_id(&self, _id: Uuid) -> Result<Option<Principal>, StoreError> {
            Ok(None)
        }

        async fn create(&self, _new: NewPrincipal) -> Result<Principal, StoreError> {
            Err(StoreError::ForeignKey)
        }
    }

    #[tokio::test]
    async fn test_register_role_removed_before_insert() {
        let issuer = SessionIssuer::new(
            Arc::new(MissingRoleStore),
            Arc::new(MemoryRoleStore::with_default_roles()),
            PasswordHasher::new(4),
            settings(),
        );

        let result = issuer.register(alice()).await;
        assert_matches!(result, Err(AuthError::UnknownRole(2)));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_email_checks_placeholder() {
        let issuer = SessionIssuer::new(
            Arc::new(MissingRoleStore),
            Arc::new(MemoryRoleStore::with_default_roles()),
            PasswordHasher::new(4),
            settings(),
        );

        let result = issuer.authenticate("ghost@x.com", PLACEHOLDER_PASSWORD.to_string()).await;
        assert_matches!(result, Err(AuthError::NotFound));
    }
}
