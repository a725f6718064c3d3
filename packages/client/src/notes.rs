//! The note collection and the CRUD actions that keep it in step with the
//! server.
//!
//! Unlike the session actions, note actions never return an error: a failed
//! request is logged, recorded in [`NotesCollection::error`] and reported as
//! [`Outcome::Failed`], and the store goes back to idle.
//!
//! Concurrent calls are not serialized. Two overlapping [`NotesStore::add_note`]
//! calls both append, in whichever order their responses arrive.

use std::cell::RefCell;
use std::rc::Rc;

use api::{ApiError, NotesApi};
use store::{filtered_notes, Note, NoteDraft, SortBy};

/// Notes as last seen from the server, plus request status.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotesCollection {
    pub notes: Vec<Note>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Result of a note action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The server accepted the request and the collection reflects it.
    Applied,
    /// The server accepted the request but no local note has that id, so the
    /// collection was left alone. Usually a sign the local copy is stale.
    MissingLocally,
    /// The request failed; see [`NotesCollection::error`].
    Failed,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// Owns the [`NotesCollection`]. Clones are handles to the same state.
#[derive(Clone)]
pub struct NotesStore<A> {
    api: A,
    state: Rc<RefCell<NotesCollection>>,
}

impl<A: NotesApi> NotesStore<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: Rc::default(),
        }
    }

    /// Snapshot of the collection and its request status.
    pub fn collection(&self) -> NotesCollection {
        self.state.borrow().clone()
    }

    pub fn notes(&self) -> Vec<Note> {
        self.state.borrow().notes.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// Search and sort the current notes. See [`store::filtered_notes`].
    pub fn filtered_notes(&self, search: &str, sort_by: SortBy) -> Vec<Note> {
        filtered_notes(&self.state.borrow().notes, search, sort_by)
    }

    /// Replace the collection with the server's notes, in server order.
    pub async fn fetch_notes(&self) -> Outcome {
        self.begin();
        let Some(notes) = self.finish(self.api.list_notes().await, "Failed to fetch notes") else {
            return Outcome::Failed;
        };
        tracing::debug!("Fetched {} notes", notes.len());
        self.state.borrow_mut().notes = notes;
        Outcome::Applied
    }

    /// Create a note and append the server's copy to the collection.
    pub async fn add_note(&self, draft: NoteDraft) -> Outcome {
        self.begin();
        let Some(note) = self.finish(self.api.create_note(&draft).await, "Failed to add note")
        else {
            return Outcome::Failed;
        };
        tracing::debug!("Added note {}", note.id);
        self.state.borrow_mut().notes.push(note);
        Outcome::Applied
    }

    /// Update a note and merge the returned fields into the local copy.
    pub async fn update_note(&self, id: i64, draft: NoteDraft) -> Outcome {
        self.begin();
        let Some(patch) = self.finish(
            self.api.update_note(id, &draft).await,
            "Failed to update note",
        ) else {
            return Outcome::Failed;
        };

        let mut state = self.state.borrow_mut();
        match state.notes.iter_mut().find(|n| n.id == id) {
            Some(note) => {
                note.merge(patch);
                tracing::debug!("Updated note {}", id);
                Outcome::Applied
            }
            None => {
                tracing::warn!("Updated note {} is not in the local collection", id);
                Outcome::MissingLocally
            }
        }
    }

    /// Delete a note and drop it from the collection.
    pub async fn delete_note(&self, id: i64) -> Outcome {
        self.begin();
        if self
            .finish(self.api.delete_note(id).await, "Failed to delete note")
            .is_none()
        {
            return Outcome::Failed;
        }

        let mut state = self.state.borrow_mut();
        let before = state.notes.len();
        state.notes.retain(|n| n.id != id);
        if state.notes.len() == before {
            tracing::warn!("Deleted note {} is not in the local collection", id);
            return Outcome::MissingLocally;
        }
        tracing::debug!("Deleted note {}", id);
        Outcome::Applied
    }

    fn begin(&self) {
        let mut state = self.state.borrow_mut();
        state.loading = true;
        state.error = None;
    }

    fn finish<T>(&self, result: Result<T, ApiError>, fallback: &str) -> Option<T> {
        let mut state = self.state.borrow_mut();
        state.loading = false;
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                let message = e.message().unwrap_or(fallback).to_string();
                tracing::error!("{}: {}", message, e);
                state.error = Some(message);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::mock::MockApi;
    use chrono::{TimeZone, Utc};

    fn note(id: i64, title: &str, content: &str, hour: u32) -> Note {
        Note {
            id,
            title: title.to_string(),
            content: content.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 2, 1, hour, 0, 0).unwrap(),
        }
    }

    fn titles(notes: &[Note]) -> Vec<&str> {
        notes.iter().map(|n| n.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_fetch_replaces_collection_in_server_order() {
        let api = MockApi::with_notes(vec![note(2, "Work", "report", 9), note(1, "Groceries", "milk", 8)]);
        let store = NotesStore::new(api);

        assert_eq!(store.fetch_notes().await, Outcome::Applied);

        assert_eq!(titles(&store.notes()), ["Work", "Groceries"]);
        assert!(!store.is_loading());
        assert!(store.last_error().is_none());
    }

    #[tokio::test]
    async fn test_fetch_after_adds_mirrors_server() {
        let api = MockApi::new();
        let store = NotesStore::new(api.clone());

        store.add_note(NoteDraft::new("A", "x")).await;
        store.add_note(NoteDraft::new("B", "y")).await;
        // Another device removes one behind our back
        api.remove_on_server(1);

        assert_eq!(store.fetch_notes().await, Outcome::Applied);
        assert_eq!(store.notes(), api.server_notes());
        // Fetching again changes nothing
        store.fetch_notes().await;
        assert_eq!(store.notes(), api.server_notes());
    }

    #[tokio::test]
    async fn test_add_then_sort_by_title() {
        let store = NotesStore::new(MockApi::new());

        assert!(store.add_note(NoteDraft::new("B", "y")).await.is_applied());
        assert!(store.add_note(NoteDraft::new("A", "x")).await.is_applied());

        // Appended in call order
        assert_eq!(titles(&store.notes()), ["B", "A"]);
        assert_eq!(titles(&store.filtered_notes("", SortBy::Title)), ["A", "B"]);
    }

    #[tokio::test]
    async fn test_created_at_view_is_newest_first() {
        let api = MockApi::with_notes(vec![
            note(1, "Groceries", "milk", 8),
            note(2, "Work", "report", 9),
        ]);
        let store = NotesStore::new(api);
        store.fetch_notes().await;

        let view = store.filtered_notes("", SortBy::CreatedAt);
        assert_eq!(titles(&view), ["Work", "Groceries"]);
        // The collection itself keeps server order
        assert_eq!(titles(&store.notes()), ["Groceries", "Work"]);
    }

    #[tokio::test]
    async fn test_search_filters_by_title_or_content() {
        let api = MockApi::with_notes(vec![
            note(1, "Groceries", "Milk and eggs", 8),
            note(2, "Work", "report", 9),
            note(3, "Ideas", "milkshake bar", 10),
        ]);
        let store = NotesStore::new(api);
        store.fetch_notes().await;

        let view = store.filtered_notes("MILK", SortBy::Title);
        assert_eq!(titles(&view), ["Groceries", "Ideas"]);
    }

    #[tokio::test]
    async fn test_concurrent_adds_both_append() {
        let store = NotesStore::new(MockApi::new());

        let (a, b) = tokio::join!(
            store.add_note(NoteDraft::new("A", "x")),
            store.add_note(NoteDraft::new("B", "y")),
        );

        assert_eq!((a, b), (Outcome::Applied, Outcome::Applied));
        assert_eq!(store.notes().len(), 2);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_update_merges_returned_fields() {
        let api = MockApi::with_notes(vec![note(1, "Groceries", "milk", 8)]);
        let store = NotesStore::new(api);
        store.fetch_notes().await;

        let outcome = store.update_note(1, NoteDraft::content("milk, eggs")).await;

        assert_eq!(outcome, Outcome::Applied);
        let notes = store.notes();
        assert_eq!(notes[0].title, "Groceries");
        assert_eq!(notes[0].content, "milk, eggs");
    }

    #[tokio::test]
    async fn test_update_of_note_missing_locally_is_reported() {
        let api = MockApi::with_notes(vec![note(1, "Groceries", "milk", 8)]);
        let store = NotesStore::new(api.clone());
        // Never fetched: the server has note 1, the local collection does not
        let before = store.notes();

        let outcome = store.update_note(1, NoteDraft::title("Shopping")).await;

        assert_eq!(outcome, Outcome::MissingLocally);
        assert_eq!(store.notes(), before);
        assert!(store.last_error().is_none());
    }

    #[tokio::test]
    async fn test_update_failure_keeps_collection() {
        let api = MockApi::with_notes(vec![note(1, "Groceries", "milk", 8)]);
        let store = NotesStore::new(api);
        store.fetch_notes().await;
        let before = store.notes();

        // Unknown on the server too: 404 from the API
        let outcome = store.update_note(7, NoteDraft::title("x")).await;

        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(store.notes(), before);
        assert_eq!(store.last_error().as_deref(), Some("Note not found"));
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one() {
        let api = MockApi::with_notes(vec![
            note(1, "A", "", 8),
            note(2, "B", "", 9),
            note(3, "C", "", 10),
        ]);
        let store = NotesStore::new(api);
        store.fetch_notes().await;

        assert_eq!(store.delete_note(2).await, Outcome::Applied);
        assert_eq!(titles(&store.notes()), ["A", "C"]);
    }

    #[tokio::test]
    async fn test_delete_missing_locally_is_noop() {
        let api = MockApi::with_notes(vec![note(1, "A", "", 8), note(2, "B", "", 9)]);
        let store = NotesStore::new(api.clone());
        store.fetch_notes().await;
        api.create_note(&NoteDraft::title("Elsewhere")).await.unwrap();

        let outcome = store.delete_note(3).await;

        assert_eq!(outcome, Outcome::MissingLocally);
        assert_eq!(titles(&store.notes()), ["A", "B"]);
    }

    #[tokio::test]
    async fn test_failures_use_server_message_or_fallback() {
        let api = MockApi::new();
        let store = NotesStore::new(api.clone());

        api.fail_next(ApiError::server(500, "Database unavailable"));
        assert_eq!(store.fetch_notes().await, Outcome::Failed);
        assert_eq!(store.last_error().as_deref(), Some("Database unavailable"));

        api.fail_next(ApiError::Decode("bad json".to_string()));
        assert_eq!(store.add_note(NoteDraft::title("A")).await, Outcome::Failed);
        assert_eq!(store.last_error().as_deref(), Some("Failed to add note"));
        assert!(store.notes().is_empty());

        api.fail_next(ApiError::Server {
            status: 502,
            message: None,
        });
        assert_eq!(store.delete_note(1).await, Outcome::Failed);
        assert_eq!(store.last_error().as_deref(), Some("Failed to delete note"));
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_next_action_clears_previous_error() {
        let api = MockApi::new();
        let store = NotesStore::new(api.clone());

        api.fail_next(ApiError::server(500, "boom"));
        store.fetch_notes().await;
        assert!(store.last_error().is_some());

        store.fetch_notes().await;
        assert!(store.last_error().is_none());
    }

    #[tokio::test]
    async fn test_collection_snapshot_outlives_fetch() {
        let store = NotesStore::new(MockApi::with_notes(vec![note(1, "A", "x", 9)]));
        let before = store.collection();

        assert!(store.fetch_notes().await.is_applied());

        assert!(before.notes.is_empty());
        assert_eq!(titles(&store.collection().notes), ["A"]);
    }
}
