//! # Durable credential storage
//!
//! The client keeps exactly one value outside of memory: the credential token.
//! It lives in a [`DurableStore`] under a fixed key so a restarted client is
//! still signed in before its session store has been rebuilt.
//!
//! [`CredentialSlot`] binds a store to that key. It is cheap to clone; every
//! clone reads and writes the same slot, which is how the session store (the
//! only writer) and the navigation guard and HTTP client (readers) share it.
//!
//! Implementations:
//!
//! | Store | Backing |
//! |-------|---------|
//! | [`crate::MemoryStore`] | In-process map, for tests and ephemeral sessions |
//! | [`crate::FileStore`] | One file per key under a data directory |

use std::fmt;
use std::sync::Arc;

/// Synchronous string key-value storage that survives the in-memory stores.
///
/// Errors are swallowed: a failed read is `None` and a failed write leaves the
/// previous value. Losing the slot only means the user signs in again.
pub trait DurableStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// The fixed slot holding the credential token.
#[derive(Clone)]
pub struct CredentialSlot {
    store: Arc<dyn DurableStore + Send + Sync>,
    key: String,
}

impl CredentialSlot {
    pub const DEFAULT_KEY: &'static str = "note_token";

    pub fn new(store: impl DurableStore + Send + Sync + 'static, key: impl Into<String>) -> Self {
        Self {
            store: Arc::new(store),
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The stored token, if any. Empty strings count as absent.
    pub fn read(&self) -> Option<String> {
        self.store.get(&self.key).filter(|t| !t.is_empty())
    }

    pub fn write(&self, token: &str) {
        self.store.set(&self.key, token);
    }

    pub fn clear(&self) {
        self.store.remove(&self.key);
    }
}

impl fmt::Debug for CredentialSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSlot")
            .field("key", &self.key)
            .field("present", &self.read().is_some())
            .finish()
    }
}
