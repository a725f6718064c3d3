//! Client-side state and access control for the notes app.
//!
//! Everything a view needs lives in an [`AppState`], built once at startup and
//! handed to the views by reference:
//!
//! - [`SessionStore`]: credential token, current user, login/register/logout
//! - [`NotesStore`]: the note collection, CRUD against the API, derived views
//! - [`NavigationGuard`] and [`Router`]: which route a navigation lands on

pub mod guard;
pub mod notes;
pub mod router;
pub mod session;
pub mod settings;
pub mod state;

pub use guard::{decide, Navigation, NavigationGuard, Route};
pub use notes::{NotesCollection, NotesStore, Outcome};
pub use router::Router;
pub use session::{Session, SessionError, SessionStore};
pub use settings::Settings;
pub use state::AppState;

pub use store::SortBy;
