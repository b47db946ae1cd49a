use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;

/// Process-scoped store of revoked bearer tokens.
///
/// Each entry carries the token's own expiry, and expired entries are purged
/// on every revocation, so the map stays bounded by the 24h token lifetime.
/// Nothing is persisted: a restart clears all revocations.
pub struct TokenBlacklist {
    entries: RwLock<HashMap<String, i64>>,
}

impl TokenBlacklist {
    pub fn new() -> Self {
        TokenBlacklist {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Revokes a token until `expires_at` (unix seconds).
    pub fn revoke(&self, token: &str, expires_at: i64) {
        if let Ok(mut entries) = self.entries.write() {
            let now = Utc::now().timestamp();
            entries.retain(|_, exp| *exp > now);
            entries.insert(token.to_string(), expires_at);
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        let now = Utc::now().timestamp();
        match self.entries.read() {
            Ok(entries) => entries.get(token).map(|exp| *exp > now).unwrap_or(false),
            Err(_) => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }
}

impl Default for TokenBlacklist {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revoked_token_is_rejected() {
        let blacklist = TokenBlacklist::new();
        let exp = Utc::now().timestamp() + 3600;

        assert!(!blacklist.contains("token-a"));
        blacklist.revoke("token-a", exp);
        assert!(blacklist.contains("token-a"));
        assert!(!blacklist.contains("token-b"));
    }

    #[test]
    fn test_expired_entry_no_longer_matches() {
        let blacklist = TokenBlacklist::new();
        blacklist.revoke("stale", Utc::now().timestamp() - 10);

        assert!(!blacklist.contains("stale"));
    }

    #[test]
    fn test_expired_entries_are_purged_on_revoke() {
        let blacklist = TokenBlacklist::new();
        let now = Utc::now().timestamp();

        blacklist.revoke("stale", now - 10);
        blacklist.revoke("fresh", now + 3600);

        assert_eq!(blacklist.len(), 1);
        assert!(blacklist.contains("fresh"));
    }
}
