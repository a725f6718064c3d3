//! # Filesystem-backed durable store
//!
//! [`FileStore`] is a [`DurableStore`] implementation that persists each key as
//! a small file. It is what the native client uses to keep the credential token
//! across restarts.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! └── <key>              # file containing the value as plain text
//! ```
//!
//! ## Platform data directories
//!
//! Callers use [`dirs::data_dir()`] joined with an application folder as the base:
//!
//! | Platform | Path |
//! |----------|------|
//! | macOS | `~/Library/Application Support/notes-client/` |
//! | Linux | `~/.local/share/notes-client/` |
//! | Windows | `C:\Users\<user>\AppData\Roaming\notes-client\` |
//!
//! [`dirs::data_dir()`]: https://docs.rs/dirs

use std::io::ErrorKind;
use std::path::PathBuf;

use crate::credentials::DurableStore;

/// Filesystem-backed DurableStore.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &std::path::Path {
        &self.base
    }

    fn value_path(&self, key: &str) -> PathBuf {
        self.base.join(key)
    }
}

impl DurableStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.value_path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(e) = std::fs::create_dir_all(&self.base) {
            tracing::warn!("Failed to create {}: {}", self.base.display(), e);
            return;
        }
        if let Err(e) = std::fs::write(self.value_path(key), value) {
            tracing::warn!("Failed to write {}: {}", key, e);
        }
    }

    fn remove(&self, key: &str) {
        match std::fs::remove_file(self.value_path(key)) {
            Err(e) if e.kind() != ErrorKind::NotFound => {
                tracing::warn!("Failed to remove {}: {}", key, e);
            }
            _ => {}
        }
    }
}
