//! Signed access/refresh tokens (JWT, HS256).

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::TokenDenylist;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => f.write_str("access"),
            TokenKind::Refresh => f.write_str("refresh"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: Uuid,
    /// Token id, the denylist key.
    pub jti: Uuid,
    pub typ: TokenKind,
    pub iat: i64,
    pub exp: i64,
    /// On access tokens, the `jti` of the refresh token they belong to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_jti: Option<Uuid>,
}

/// The tokens handed out by a login.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),

    #[error("token rejected: {0}")]
    Invalid(jsonwebtoken::errors::Error),

    #[error("expected a {expected} token")]
    WrongKind { expected: TokenKind },

    #[error("token has been revoked")]
    Revoked,
}

/// Issues and checks tokens, and owns the logout denylist.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
    denylist: TokenDenylist,
}

impl TokenService {
    pub fn new(secret: &[u8], access_ttl: Duration, refresh_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            access_ttl_secs: whole_seconds(access_ttl),
            refresh_ttl_secs: whole_seconds(refresh_ttl),
            denylist: TokenDenylist::new(),
        }
    }

    /// Issue a refresh token and an access token bound to it.
    pub fn issue_pair(&self, user_id: Uuid) -> Result<TokenPair, TokenError> {
        let refresh = self.claims(user_id, TokenKind::Refresh, self.refresh_ttl_secs, None);
        let access = self.claims(
            user_id,
            TokenKind::Access,
            self.access_ttl_secs,
            Some(refresh.jti),
        );
        Ok(TokenPair {
            access_token: self.sign(&access)?,
            refresh_token: self.sign(&refresh)?,
        })
    }

    /// Issue a new access token bound to the same refresh token.
    pub fn reissue_access(&self, refresh: &Claims) -> Result<String, TokenError> {
        let access = self.claims(
            refresh.sub,
            TokenKind::Access,
            self.access_ttl_secs,
            Some(refresh.jti),
        );
        self.sign(&access)
    }

    fn claims(
        &self,
        user_id: Uuid,
        kind: TokenKind,
        ttl_secs: i64,
        refresh_jti: Option<Uuid>,
    ) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: user_id,
            jti: Uuid::new_v4(),
            typ: kind,
            iat: now,
            exp: now.saturating_add(ttl_secs),
            refresh_jti,
        }
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Check signature, expiry, kind and the denylist.
    ///
    /// An access token is also refused once its refresh token is revoked.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(TokenError::Invalid)?
            .claims;

        if claims.typ != expected {
            return Err(TokenError::WrongKind { expected });
        }
        if self.denylist.is_revoked(&claims.jti) {
            return Err(TokenError::Revoked);
        }
        if let Some(refresh_jti) = &claims.refresh_jti {
            if self.denylist.is_revoked(refresh_jti) {
                return Err(TokenError::Revoked);
            }
        }

        Ok(claims)
    }

    /// Reject the token from now until it expires, along with the refresh
    /// token it is bound to.
    pub fn revoke(&self, claims: &Claims) {
        self.denylist.revoke(claims.jti, claims.exp);
        if let Some(refresh_jti) = claims.refresh_jti {
            // The refresh token was issued no later than now.
            let refresh_exp = Utc::now().timestamp().saturating_add(self.refresh_ttl_secs);
            self.denylist.revoke(refresh_jti, refresh_exp);
        }
    }

    /// Number of tokens currently held as revoked.
    pub fn revoked_count(&self) -> usize {
        self.denylist.len()
    }
}

fn whole_seconds(duration: Duration) -> i64 {
    i64::try_from(duration.as_secs()).unwrap_or(i64::MAX)
}
