//! Session-scoped caches. Both are plain objects owned by the presentation
//! layer and passed into whatever needs them; nothing here is global.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

use crate::ledger::Ledger;

/// Identity of an uploaded source: file name plus byte size. Re-uploading
/// the same file hits the cache instead of re-parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceFingerprint {
    name: String,
    size: u64,
}

impl SourceFingerprint {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// Parsed ledgers keyed by source fingerprint.
#[derive(Debug, Default)]
pub struct SessionCache {
    entries: HashMap<SourceFingerprint, Ledger>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, fingerprint: &SourceFingerprint) -> Option<&Ledger> {
        self.entries.get(fingerprint)
    }

    pub fn insert(&mut self, fingerprint: SourceFingerprint, ledger: Ledger) {
        self.entries.insert(fingerprint, ledger);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

pub const DEFAULT_RESPONSE_TTL: Duration = Duration::from_secs(30 * 60);

/// Narrative responses keyed by prompt hash, so an identical prompt skips
/// the collaborator while the entry is fresh.
#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    entries: HashMap<u64, CachedResponse>,
}

#[derive(Debug)]
struct CachedResponse {
    stored_at: Instant,
    text: String,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, prompt: &str) -> Option<&str> {
        let entry = self.entries.get(&Self::key(prompt))?;
        if entry.stored_at.elapsed() > self.ttl {
            return None;
        }
        Some(&entry.text)
    }

    pub fn insert(&mut self, prompt: &str, text: String) {
        self.entries.insert(
            Self::key(prompt),
            CachedResponse {
                stored_at: Instant::now(),
                text,
            },
        );
    }

    pub fn purge_expired(&mut self) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.stored_at.elapsed() <= ttl);
    }

    fn key(prompt: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        prompt.hash(&mut hasher);
        hasher.finish()
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_RESPONSE_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cache_hits_on_same_fingerprint() {
        let mut cache = SessionCache::new();
        let fingerprint = SourceFingerprint::new("enero.csv", 2048);
        assert!(cache.get(&fingerprint).is_none());

        cache.insert(fingerprint.clone(), Ledger::sample());
        assert_eq!(cache.get(&fingerprint).unwrap().transaction_count(), 6);

        let other = SourceFingerprint::new("enero.csv", 4096);
        assert!(cache.get(&other).is_none());
    }

    #[test]
    fn response_cache_returns_fresh_entries() {
        let mut cache = ResponseCache::default();
        cache.insert("prompt", "answer".into());
        assert_eq!(cache.get("prompt"), Some("answer"));
        assert!(cache.get("other prompt").is_none());
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let mut cache = ResponseCache::new(Duration::ZERO);
        cache.insert("prompt", "answer".into());
        std::thread::sleep(Duration::from_millis(2));
        assert!(cache.get("prompt").is_none());

        cache.purge_expired();
        assert!(cache.entries.is_empty());
    }
}
