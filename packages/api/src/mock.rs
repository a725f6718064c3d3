//! In-memory notes server for tests.
//!
//! [`MockApi`] behaves like the real service: it assigns ids and creation
//! timestamps, keeps the note list in insertion order and answers 404 for
//! unknown ids. Clones share state, so a test can keep a handle to inspect the
//! "server side" while a store owns another.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::error::ApiError;
use crate::wire::{Credentials, LoginResponse};
use crate::{Note, NoteDraft, NotePatch, NotesApi, UserInfo};

#[derive(Debug)]
struct MockState {
    notes: Vec<Note>,
    next_id: i64,
    clock: DateTime<Utc>,
    failures: VecDeque<ApiError>,
    login_response: Option<LoginResponse>,
    register_response: Option<Option<UserInfo>>,
    calls: Vec<String>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            notes: Vec::new(),
            next_id: 1,
            clock: Utc
                .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
                .single()
                .unwrap_or_default(),
            failures: VecDeque::new(),
            login_response: None,
            register_response: None,
            calls: Vec::new(),
        }
    }
}

/// In-memory NotesApi for testing.
#[derive(Clone, Debug, Default)]
pub struct MockApi {
    state: Rc<RefCell<MockState>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the server with existing notes.
    pub fn with_notes(notes: Vec<Note>) -> Self {
        let api = Self::new();
        {
            let mut state = api.state.borrow_mut();
            state.next_id = notes.iter().map(|n| n.id).max().unwrap_or(0) + 1;
            state.notes = notes;
        }
        api
    }

    /// Make the next call fail with `err`. Queued failures are consumed in order.
    pub fn fail_next(&self, err: ApiError) {
        self.state.borrow_mut().failures.push_back(err);
    }

    /// Answer every login with `response` instead of issuing a token.
    pub fn set_login_response(&self, response: LoginResponse) {
        self.state.borrow_mut().login_response = Some(response);
    }

    /// Answer every registration with `response`; `None` models an empty body.
    pub fn set_register_response(&self, response: Option<UserInfo>) {
        self.state.borrow_mut().register_response = Some(response);
    }

    /// Notes as the server currently holds them.
    pub fn server_notes(&self) -> Vec<Note> {
        self.state.borrow().notes.clone()
    }

    /// Change the server behind the client's back, as another device would.
    pub fn remove_on_server(&self, id: i64) {
        self.state.borrow_mut().notes.retain(|n| n.id != id);
    }

    /// Endpoints hit so far, e.g. `"PUT /notes/3"`.
    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    fn begin(&self, call: String) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(call);
        match state.failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn not_found() -> ApiError {
        ApiError::server(404, "Note not found")
    }
}

impl NotesApi for MockApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.begin("POST /auth/login".to_string())?;
        let state = self.state.borrow();
        if let Some(response) = &state.login_response {
            return Ok(response.clone());
        }
        let user = UserInfo {
            id: 1,
            username: credentials.username.clone(),
            name: None,
        };
        Ok(LoginResponse::new(
            format!("token-{}", credentials.username),
            user,
        ))
    }

    async fn register(&self, credentials: &Credentials) -> Result<Option<UserInfo>, ApiError> {
        self.begin("POST /auth/register".to_string())?;
        let state = self.state.borrow();
        if let Some(response) = &state.register_response {
            return Ok(response.clone());
        }
        Ok(Some(UserInfo {
            id: 1,
            username: credentials.username.clone(),
            name: None,
        }))
    }

    async fn list_notes(&self) -> Result<Vec<Note>, ApiError> {
        self.begin("GET /notes".to_string())?;
        Ok(self.server_notes())
    }

    async fn create_note(&self, draft: &NoteDraft) -> Result<Note, ApiError> {
        self.begin("POST /notes".to_string())?;
        let mut state = self.state.borrow_mut();
        let note = Note {
            id: state.next_id,
            title: draft.title.clone().unwrap_or_default(),
            content: draft.content.clone().unwrap_or_default(),
            created_at: state.clock,
        };
        state.next_id += 1;
        state.clock += Duration::minutes(1);
        state.notes.push(note.clone());
        Ok(note)
    }

    async fn update_note(&self, id: i64, draft: &NoteDraft) -> Result<NotePatch, ApiError> {
        self.begin(format!("PUT /notes/{id}"))?;
        let mut state = self.state.borrow_mut();
        let note = state
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(Self::not_found)?;
        note.merge(NotePatch {
            title: draft.title.clone(),
            content: draft.content.clone(),
            ..Default::default()
        });
        Ok(note.clone().into())
    }

    async fn delete_note(&self, id: i64) -> Result<(), ApiError> {
        self.begin(format!("DELETE /notes/{id}"))?;
        let mut state = self.state.borrow_mut();
        let before = state.notes.len();
        state.notes.retain(|n| n.id != id);
        if state.notes.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }
}
