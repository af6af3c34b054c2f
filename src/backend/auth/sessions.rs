/**
 * Session Tokens
 *
 * Signing and verification of bearer tokens (HS256 JWTs) and issuance of
 * access/refresh pairs.
 *
 * # Verification Order
 *
 * 1. Structure and signature are checked first. Any failure here, including
 *    a token signed with another secret or a single altered byte, is
 *    `InvalidToken`.
 * 2. Only then is the embedded expiry compared with the current time. An
 *    expiry at or before `now` is `TokenExpired`.
 *
 * The JWT library's own `exp` check is switched off; step 2 is the only
 * place expiry is decided.
 */

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::backend::auth::claims::{Claims, TokenPair};
use crate::backend::auth::users::Principal;
use crate::backend::error::AuthError;
use crate::shared::JwtSecret;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Sign claims into a compact token string
pub fn sign_token(claims: &Claims, secret: &JwtSecret) -> Result<String, AuthError> {
    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::new(ALGORITHM), claims, &key).map_err(|e| {
        tracing::error!("Failed to sign token: {:?}", e);
        AuthError::internal(format!("token signing failed: {}", e))
    })
}

/// Verify a token against the current time
pub fn verify_token(token: &str, secret: &JwtSecret) -> Result<Claims, AuthError> {
    verify_token_at(token, secret, Utc::now())
}

/// Verify a token's signature, then its expiry relative to `now`
pub fn verify_token_at(
    token: &str,
    secret: &JwtSecret,
    now: DateTime<Utc>,
) -> Result<Claims, AuthError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(ALGORITHM);
    validation.validate_exp = false;
    validation.set_required_spec_claims(&["exp", "sub", "iss"]);

    let claims = decode::<Claims>(token, &key, &validation)
        .map_err(|e| {
            tracing::debug!("Token rejected: {:?}", e.kind());
            AuthError::InvalidToken
        })?
        .claims;

    if claims.is_expired_at(now) {
        tracing::debug!("Token for {} expired at {}", claims.principal_id, claims.expires_at);
        return Err(AuthError::TokenExpired);
    }

    Ok(claims)
}

/// Issue an access/refresh pair for a principal.
///
/// Both tokens carry the same claims apart from expiry:
/// `now + access_ttl` and `now + refresh_ttl` respectively. A window that
/// pushes the expiry past the representable range is `Internal`.
pub fn issue_token_pair(
    principal: &Principal,
    issuer: &str,
    access_ttl: Duration,
    refresh_ttl: Duration,
    secret: &JwtSecret,
    now: DateTime<Utc>,
) -> Result<TokenPair, AuthError> {
    let access = Claims::new(
        principal.id,
        principal.name.clone(),
        principal.email.clone(),
        issuer,
        expiry_after(now, access_ttl)?,
    );
    let refresh = access.with_expiry(expiry_after(now, refresh_ttl)?);

    Ok(TokenPair {
        access_token: sign_token(&access, secret)?,
        refresh_token: sign_token(&refresh, secret)?,
    })
}

fn expiry_after(now: DateTime<Utc>, ttl: Duration) -> Result<DateTime<Utc>, AuthError> {
    now.checked_add_signed(ttl).ok_or_else(|| {
        tracing::error!("Validity window {} overflows expiry", ttl);
        AuthError::internal("token expiry out of range")
    })
}
