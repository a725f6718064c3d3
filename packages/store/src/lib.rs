pub mod credentials;
pub mod models;
pub mod query;

mod file_store;
pub use file_store::FileStore;

mod memory;
pub use memory::MemoryStore;

pub use credentials::{CredentialSlot, DurableStore};
pub use models::{Note, NoteDraft, NotePatch, UserInfo};
pub use query::{filtered_notes, SortBy};
