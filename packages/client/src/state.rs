//! The application's state, built once and passed to whatever needs it.

use api::{HttpApi, NotesApi};
use store::{CredentialSlot, FileStore};

use crate::guard::{NavigationGuard, Route};
use crate::notes::NotesStore;
use crate::router::Router;
use crate::session::SessionStore;
use crate::settings::Settings;

/// Owns the stores, the guard and the router for one application lifetime.
pub struct AppState<A> {
    session: SessionStore<A>,
    notes: NotesStore<A>,
    guard: NavigationGuard,
    router: Router,
}

impl<A: NotesApi + Clone> AppState<A> {
    /// Wire both stores to `api` and the guard to `slot`.
    pub fn new(api: A, slot: CredentialSlot) -> Self {
        Self {
            session: SessionStore::new(api.clone(), slot.clone()),
            notes: NotesStore::new(api),
            guard: NavigationGuard::new(slot),
            router: Router::new(),
        }
    }
}

impl<A: NotesApi> AppState<A> {
    pub fn session(&self) -> &SessionStore<A> {
        &self.session
    }

    pub fn notes(&self) -> &NotesStore<A> {
        &self.notes
    }

    pub fn guard(&self) -> &NavigationGuard {
        &self.guard
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn current_route(&self) -> Option<&Route> {
        self.router.current()
    }

    /// Navigate through the guard. See [`Router::navigate`].
    pub fn navigate(&mut self, path: &str) -> Option<&Route> {
        self.router.navigate(path, &self.guard, &self.session)
    }

    pub fn back(&mut self) -> Option<&Route> {
        self.router.back(&self.guard, &self.session)
    }
}

impl AppState<HttpApi> {
    /// Production wiring: token in a [`FileStore`] under the configured
    /// directory, HTTP client presenting that token on every request.
    pub fn from_settings(settings: &Settings) -> Self {
        let store = FileStore::new(settings.storage.dir());
        let slot = CredentialSlot::new(store, settings.storage.token_key.clone());
        let api = HttpApi::new(&settings.api.base_url).with_credentials(slot.clone());
        tracing::debug!("Notes API at {}", api.base_url());
        Self::new(api, slot)
    }
}
