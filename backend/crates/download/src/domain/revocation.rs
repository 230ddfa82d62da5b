//! Revocation denylist
//!
//! Download links are never stored, so revoking one before expiry needs a
//! small in-process list. Entries live only as long as the token would, and
//! the list never grows past its capacity.

use platform::crypto::sha256;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

type Fingerprint = [u8; 16];

/// Bounded in-memory set of revoked download tokens
#[derive(Debug)]
pub struct RevocationList {
    entries: Mutex<HashMap<Fingerprint, i64>>,
    capacity: usize,
}

impl RevocationList {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity,
        }
    }

    fn fingerprint(token: &str) -> Fingerprint {
        let digest = sha256(token.as_bytes());
        let mut out = [0u8; 16];
        out.copy_from_slice(&digest[..16]);
        out
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Fingerprint, i64>> {
        // Entries are plain data; a panic elsewhere cannot leave them torn
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Deny `token` until `expires_at_ms`.
    ///
    /// Returns false when nothing was stored (token already expired or zero
    /// capacity).
    pub fn revoke(&self, token: &str, expires_at_ms: i64, now_ms: i64) -> bool {
        if expires_at_ms < now_ms || self.capacity == 0 {
            return false;
        }

        let key = Self::fingerprint(token);
        let mut entries = self.lock();
        entries.retain(|_, expiry| *expiry >= now_ms);

        if !entries.contains_key(&key) && entries.len() >= self.capacity {
            let soonest = entries
                .iter()
                .min_by_key(|(_, expiry)| **expiry)
                .map(|(k, _)| *k);
            if let Some(evicted) = soonest {
                entries.remove(&evicted);
                tracing::warn!(
                    capacity = self.capacity,
                    "Revocation list full, evicted entry closest to expiry"
                );
            }
        }

        let expiry = entries.entry(key).or_insert(expires_at_ms);
        *expiry = (*expiry).max(expires_at_ms);
        true
    }

    pub fn is_revoked(&self, token: &str, now_ms: i64) -> bool {
        let key = Self::fingerprint(token);
        self.lock()
            .get(&key)
            .is_some_and(|expiry| *expiry >= now_ms)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revoke_and_lookup() {
        let list = RevocationList::new(8);
        assert!(!list.is_revoked("tok", 0));

        assert!(list.revoke("tok", 1_000, 0));
        assert!(list.is_revoked("tok", 500));
        assert!(list.is_revoked("tok", 1_000));
        assert!(!list.is_revoked("other", 500));
    }

    #[test]
    fn test_entry_lapses_with_token() {
        let list = RevocationList::new(8);
        list.revoke("tok", 1_000, 0);
        assert!(!list.is_revoked("tok", 1_001));
    }

    #[test]
    fn test_expired_token_not_stored() {
        let list = RevocationList::new(8);
        assert!(!list.revoke("tok", 10, 20));
        assert!(list.is_empty());
    }

    #[test]
    fn test_expired_entries_pruned_on_insert() {
        let list = RevocationList::new(8);
        list.revoke("a", 100, 0);
        list.revoke("b", 200, 0);
        list.revoke("c", 1_000, 150);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_full_list_evicts_soonest_expiry() {
        let list = RevocationList::new(2);
        list.revoke("late", 5_000, 0);
        list.revoke("soon", 1_000, 0);
        list.revoke("new", 3_000, 0);

        assert_eq!(list.len(), 2);
        assert!(list.is_revoked("late", 10));
        assert!(list.is_revoked("new", 10));
        assert!(!list.is_revoked("soon", 10));
    }

    #[test]
    fn test_re_revoke_does_not_evict() {
        let list = RevocationList::new(2);
        list.revoke("a", 1_000, 0);
        list.revoke("b", 2_000, 0);
        list.revoke("a", 3_000, 0);

        assert_eq!(list.len(), 2);
        assert!(list.is_revoked("a", 2_500));
        assert!(list.is_revoked("b", 10));
    }

    #[test]
    fn test_zero_capacity() {
        let list = RevocationList::new(0);
        assert!(!list.revoke("tok", 1_000, 0));
        assert!(!list.is_revoked("tok", 0));
    }
}
