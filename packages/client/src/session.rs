//! Authentication state and the actions that change it.

use std::cell::RefCell;
use std::rc::Rc;

use api::{ApiError, Credentials, LoginResponse, NotesApi, UserInfo};
use store::CredentialSlot;
use thiserror::Error;

const LOGIN_FAILED: &str = "Login failed";
const REGISTRATION_FAILED: &str = "Registration failed";

/// Authentication state for the application.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub user: Option<UserInfo>,
    /// Credential token, mirrored in the durable credential slot.
    pub token: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Session {
    /// A non-empty token means signed in, whether or not `user` is known yet.
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Why a login or registration failed.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The server answered but broke the auth contract (no token, empty body).
    #[error("{0}")]
    Auth(String),
    #[error(transparent)]
    Transport(#[from] ApiError),
}

impl SessionError {
    /// Message suitable for showing to the user, if the failure carried one.
    pub fn message(&self) -> Option<&str> {
        match self {
            SessionError::Auth(message) => Some(message),
            SessionError::Transport(e) => e.message(),
        }
    }
}

/// Owns the [`Session`]. Clones are handles to the same state.
#[derive(Clone)]
pub struct SessionStore<A> {
    api: A,
    slot: CredentialSlot,
    state: Rc<RefCell<Session>>,
}

impl<A: NotesApi> SessionStore<A> {
    /// Create the store, picking up a token persisted by a previous run.
    pub fn new(api: A, slot: CredentialSlot) -> Self {
        let token = slot.read();
        if token.is_some() {
            tracing::debug!("Restored credential token from {}", slot.key());
        }
        Self {
            api,
            slot,
            state: Rc::new(RefCell::new(Session {
                token,
                ..Session::default()
            })),
        }
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn user(&self) -> Option<UserInfo> {
        self.state.borrow().user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// Sign in and persist the issued token.
    ///
    /// A response without a token fails with [`SessionError::Auth`] and leaves
    /// both the session and the credential slot untouched. Every failure is
    /// recorded in [`Session::error`] and returned.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), SessionError> {
        self.begin();

        let credentials = Credentials::new(username, password);
        let result = match self.api.login(&credentials).await {
            Ok(LoginResponse {
                token: Some(token),
                user,
                ..
            }) if !token.is_empty() => {
                self.slot.write(&token);
                let mut state = self.state.borrow_mut();
                state.token = Some(token);
                state.user = user;
                tracing::info!("Signed in as {}", username);
                Ok(())
            }
            Ok(response) => Err(SessionError::Auth(
                response
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| LOGIN_FAILED.to_string()),
            )),
            Err(e) => Err(e.into()),
        };

        self.finish(&result, LOGIN_FAILED);
        result
    }

    /// Create an account. Registration does not sign the user in: only the
    /// returned user is stored, never a token.
    pub async fn register(&self, credentials: &Credentials) -> Result<UserInfo, SessionError> {
        self.begin();

        let result = match self.api.register(credentials).await {
            Ok(Some(user)) => {
                self.state.borrow_mut().user = Some(user.clone());
                tracing::info!("Registered {}", user.username);
                Ok(user)
            }
            Ok(None) => Err(SessionError::Auth(REGISTRATION_FAILED.to_string())),
            Err(e) => Err(e.into()),
        };

        self.finish(&result, REGISTRATION_FAILED);
        result
    }

    /// Forget the user and token, here and in the credential slot.
    pub fn logout(&self) {
        {
            let mut state = self.state.borrow_mut();
            state.user = None;
            state.token = None;
        }
        self.slot.clear();
        tracing::info!("Signed out");
    }

    fn begin(&self) {
        let mut state = self.state.borrow_mut();
        state.loading = true;
        state.error = None;
    }

    fn finish<T>(&self, result: &Result<T, SessionError>, fallback: &str) {
        let mut state = self.state.borrow_mut();
        state.loading = false;
        if let Err(e) = result {
            tracing::warn!("{}: {}", fallback, e);
            state.error = Some(e.message().unwrap_or(fallback).to_string());
        }
    }
}
