//! # API crate: the remote notes service as seen by the client
//!
//! Every network round trip the client makes goes through the [`NotesApi`]
//! trait defined here. The stores in the `client` crate are generic over it, so
//! the same logic runs against the real HTTP service ([`HttpApi`]) or an
//! in-memory stand-in ([`mock::MockApi`], feature `mock`).
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`error`] | - | [`ApiError`]: server, transport and decode failures |
//! | [`http`] | - | [`HttpApi`], the reqwest-backed implementation |
//! | [`wire`] | - | Request/response bodies that never leave the API layer |
//! | [`mock`] | `mock` | [`mock::MockApi`], an in-memory server for tests |
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Body | Returns |
//! |--------|----------|------|---------|
//! | [`login`](NotesApi::login) | `POST /auth/login` | [`Credentials`] | [`LoginResponse`] |
//! | [`register`](NotesApi::register) | `POST /auth/register` | [`Credentials`] | `Option<UserInfo>` |
//! | [`list_notes`](NotesApi::list_notes) | `GET /notes` | - | `Vec<Note>` |
//! | [`create_note`](NotesApi::create_note) | `POST /notes` | [`NoteDraft`] | [`Note`] |
//! | [`update_note`](NotesApi::update_note) | `PUT /notes/{id}` | [`NoteDraft`] | [`NotePatch`] |
//! | [`delete_note`](NotesApi::delete_note) | `DELETE /notes/{id}` | - | `()` |

use std::future::Future;

pub mod error;
pub mod http;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod wire;

pub use error::ApiError;
pub use http::HttpApi;
pub use wire::{Credentials, LoginResponse};

pub use store::{Note, NoteDraft, NotePatch, UserInfo};

/// Async interface to the remote notes service.
pub trait NotesApi {
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<LoginResponse, ApiError>>;
    /// `Ok(None)` when the server answered with an empty body.
    fn register(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Option<UserInfo>, ApiError>>;
    fn list_notes(&self) -> impl Future<Output = Result<Vec<Note>, ApiError>>;
    fn create_note(&self, draft: &NoteDraft) -> impl Future<Output = Result<Note, ApiError>>;
    fn update_note(
        &self,
        id: i64,
        draft: &NoteDraft,
    ) -> impl Future<Output = Result<NotePatch, ApiError>>;
    fn delete_note(&self, id: i64) -> impl Future<Output = Result<(), ApiError>>;
}
