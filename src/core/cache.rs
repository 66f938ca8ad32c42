//! Cache backends for parsed annotation sets
//!
//! The reader core is agnostic to the backend: anything implementing the
//! `Cache` capability (`get`/`set`/`contains`) can be supplied through the
//! options map. Two backends ship with the crate:
//! - `MemoryCache`: in-process map, the default
//! - `FileCache`: bincode entries on disk, surviving process restarts
//!
//! Entries carry a format version and the fingerprint of the doc block they
//! were parsed from, so stale formats and stale sources self-invalidate.

use crate::core::error::{ReaderError, Result};
use crate::core::models::Annotation;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(test)]
use mockall::automock;

/// Cache format version (bump to invalidate old persisted caches)
pub const CACHE_VERSION: u32 = 1;

/// Reserved key used by the capability probe
const PROBE_KEY: &str = "__marginalia_capability_probe__";

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// A cached parse result for one declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Cache format version
    pub version: u32,
    /// Fingerprint of the doc block this entry was parsed from
    pub fingerprint: String,
    /// Timestamp when the entry was written (seconds since epoch)
    pub written_at: u64,
    /// The parsed annotations
    pub annotations: Vec<Annotation>,
}

impl CacheEntry {
    /// Create a new entry stamped with the current time and format version
    pub fn new(fingerprint: impl Into<String>, annotations: Vec<Annotation>) -> Self {
        Self {
            version: CACHE_VERSION,
            fingerprint: fingerprint.into(),
            written_at: unix_now(),
            annotations,
        }
    }
}

/// Capability contract for cache backends
///
/// Implementations must be safe for concurrent use from multiple threads
/// sharing one reader instance.
#[cfg_attr(test, automock)]
pub trait Cache: Send + Sync {
    /// Look up an entry by key
    fn get(&self, key: &str) -> Option<CacheEntry>;

    /// Store an entry under a key (best-effort; backends log-and-drop failures)
    fn set(&self, key: &str, entry: CacheEntry);

    /// Check whether a key is present
    fn contains(&self, key: &str) -> bool;
}

/// Live capability probe: a set/contains/get round trip on a reserved key
///
/// The trait already pins the method shapes; the probe catches backends that
/// type-check but misbehave (e.g. drop writes, return unrelated entries).
pub fn verify_capability(cache: &dyn Cache) -> bool {
    let probe = CacheEntry::new("probe", Vec::new());
    cache.set(PROBE_KEY, probe.clone());

    cache.contains(PROBE_KEY)
        && cache
            .get(PROBE_KEY)
            .map(|entry| entry.fingerprint == probe.fingerprint)
            .unwrap_or(false)
}

/// Default in-process cache backend
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    /// Create a new empty in-process cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries.read().ok().and_then(|m| m.get(key).cloned())
    }

    fn set(&self, key: &str, entry: CacheEntry) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_string(), entry);
        }
    }

    fn contains(&self, key: &str) -> bool {
        self.entries
            .read()
            .map(|m| m.contains_key(key))
            .unwrap_or(false)
    }
}

/// Persistent cache backend storing one bincode file per declaration
///
/// Writes are atomic (temp file + rename). Malformed or version-mismatched
/// files degrade to a cache miss rather than an error.
#[derive(Debug, Clone)]
pub struct FileCache {
    cache_dir: PathBuf,
}

impl FileCache {
    /// Create a cache rooted at the given directory
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// File path for a cache key (keys are hashed; they contain `::` and `:`)
    fn entry_path(&self, key: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        self.cache_dir.join(format!("{:x}.bin", hasher.finalize()))
    }

    /// Load an entry if present, current-version, and well-formed
    pub fn load(&self, key: &str) -> Option<CacheEntry> {
        let path = self.entry_path(key);
        if !path.exists() {
            return None;
        }

        let buffer = fs::read(&path).ok()?;
        let entry: CacheEntry = bincode::deserialize(&buffer).ok()?;

        if entry.version != CACHE_VERSION {
            return None;
        }

        Some(entry)
    }

    /// Store an entry, failing loudly on IO or serialization errors
    pub fn store(&self, key: &str, entry: &CacheEntry) -> Result<()> {
        fs::create_dir_all(&self.cache_dir)?;

        let buffer = bincode::serialize(entry)
            .map_err(|e| ReaderError::cache_backend(format!("failed to serialize entry: {e}")))?;

        // Write atomically (write to temp, then rename)
        let path = self.entry_path(key);
        let temp_path = path.with_extension("tmp");

        let mut file = File::create(&temp_path)?;
        file.write_all(&buffer)?;
        file.sync_all()?;
        fs::rename(&temp_path, &path)?;

        Ok(())
    }

    /// Root directory of this cache
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }
}

impl Cache for FileCache {
    fn get(&self, key: &str) -> Option<CacheEntry> {
        self.load(key)
    }

    fn set(&self, key: &str, entry: CacheEntry) {
        // Capability surface is best-effort; callers wanting loud failures
        // use store() directly.
        let _ = self.store(key, &entry);
    }

    fn contains(&self, key: &str) -> bool {
        self.load(key).is_some()
    }
}
