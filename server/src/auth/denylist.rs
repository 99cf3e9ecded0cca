//! Revoked-token registry backing logout.

use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

/// Token ids (`jti`) that were logged out, with the expiry of the token.
///
/// An entry only has to outlive its token: once `exp` has passed, expiry
/// validation rejects the token anyway, so stale entries are purged on every
/// revocation.
#[derive(Debug, Default)]
pub struct TokenDenylist {
    entries: DashMap<Uuid, i64>,
}

impl TokenDenylist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revoke(&self, jti: Uuid, expires_at: i64) {
        self.purge_expired();
        self.entries.insert(jti, expires_at);
    }

    pub fn is_revoked(&self, jti: &Uuid) -> bool {
        self.entries.contains_key(jti)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn purge_expired(&self) {
        let now = Utc::now().timestamp();
        self.entries.retain(|_, expires_at| *expires_at > now);
    }
}
