//! Route access control.
//!
//! [`NavigationGuard::before_each`] runs synchronously before every navigation
//! and answers with exactly one [`Navigation`]. It only reads state that is
//! already in memory or in the credential slot; it never touches the network.
//!
//! | Target requires auth | Signed in | Decision |
//! |---|---|---|
//! | yes | no | redirect to [`Route::Login`] |
//! | yes | yes | proceed |
//! | `Login` | yes | redirect to [`Route::Home`] |
//! | `Login` | no | proceed |
//! | anything else | either | proceed |

use std::fmt;

use api::NotesApi;
use store::CredentialSlot;

use crate::session::SessionStore;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`, the note list.
    Home,
    /// `/login`
    Login,
    /// `/signup`
    Signup,
    /// Any path no view is registered for.
    NotFound(String),
}

impl Route {
    /// Resolve a path, ignoring any query string, fragment or trailing slash.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Route::Home,
            "/login" => Route::Login,
            "/signup" => Route::Signup,
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::NotFound(path) => path,
        }
    }

    /// Route metadata: whether only signed-in users may land here.
    pub fn requires_auth(&self) -> bool {
        matches!(self, Route::Home)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// What to do with a pending navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Proceed,
    Redirect(Route),
}

/// The guard's decision table, given whether the user is signed in.
pub fn decide(to: &Route, authenticated: bool) -> Navigation {
    if to.requires_auth() && !authenticated {
        return Navigation::Redirect(Route::Login);
    }
    if *to == Route::Login && authenticated {
        return Navigation::Redirect(Route::Home);
    }
    Navigation::Proceed
}

/// Decides navigations from the session and the persisted credential.
///
/// The persisted credential is read independently of the session store so a
/// navigation that happens before the store has been rebuilt still counts as
/// signed in.
#[derive(Debug, Clone)]
pub struct NavigationGuard {
    fallback: CredentialSlot,
}

impl NavigationGuard {
    pub fn new(fallback: CredentialSlot) -> Self {
        Self { fallback }
    }

    pub fn before_each<A: NotesApi>(
        &self,
        to: &Route,
        from: Option<&Route>,
        session: &SessionStore<A>,
    ) -> Navigation {
        let authenticated = session.is_authenticated() || self.fallback.read().is_some();
        let decision = decide(to, authenticated);
        tracing::debug!(
            "Navigation {} -> {}: {:?}",
            from.map(Route::path).unwrap_or("(start)"),
            to,
            decision
        );
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::mock::MockApi;
    use store::MemoryStore;

    fn slot() -> CredentialSlot {
        CredentialSlot::new(MemoryStore::new(), CredentialSlot::DEFAULT_KEY)
    }

    #[test]
    fn test_decision_table() {
        let cases = [
            (Route::Home, false, Navigation::Redirect(Route::Login)),
            (Route::Home, true, Navigation::Proceed),
            (Route::Login, true, Navigation::Redirect(Route::Home)),
            (Route::Login, false, Navigation::Proceed),
            (Route::Signup, false, Navigation::Proceed),
            (Route::Signup, true, Navigation::Proceed),
            (Route::NotFound("/nope".into()), false, Navigation::Proceed),
            (Route::NotFound("/nope".into()), true, Navigation::Proceed),
        ];
        for (to, authenticated, expected) in cases {
            assert_eq!(decide(&to, authenticated), expected, "{to} signed in: {authenticated}");
        }
    }

    #[test]
    fn test_parse_paths() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/login"), Route::Login);
        assert_eq!(Route::parse("/login/"), Route::Login);
        assert_eq!(Route::parse("/signup?ref=home"), Route::Signup);
        assert_eq!(Route::parse("/#top"), Route::Home);
        assert_eq!(
            Route::parse("/settings"),
            Route::NotFound("/settings".to_string())
        );
        assert_eq!(Route::Signup.to_string(), "/signup");
    }

    #[test]
    fn test_unauthenticated_home_redirects_to_login() {
        let slot = slot();
        let session = SessionStore::new(MockApi::new(), slot.clone());
        let guard = NavigationGuard::new(slot);

        assert_eq!(
            guard.before_each(&Route::Home, None, &session),
            Navigation::Redirect(Route::Login)
        );
    }

    #[test]
    fn test_persisted_token_counts_before_rehydration() {
        let slot = slot();
        let session = SessionStore::new(MockApi::new(), slot.clone());
        // Written after the store was built, as another tab would
        slot.write("from-storage");
        let guard = NavigationGuard::new(slot);

        assert!(!session.is_authenticated());
        assert_eq!(
            guard.before_each(&Route::Home, Some(&Route::Login), &session),
            Navigation::Proceed
        );
        assert_eq!(
            guard.before_each(&Route::Login, None, &session),
            Navigation::Redirect(Route::Home)
        );
    }

    #[tokio::test]
    async fn test_in_memory_token_counts_without_storage() {
        let slot = slot();
        let session = SessionStore::new(MockApi::new(), slot.clone());
        session.login("ada", "pw").await.unwrap();
        // Storage wiped externally; the session still holds the token
        slot.clear();
        let guard = NavigationGuard::new(slot);

        assert_eq!(
            guard.before_each(&Route::Home, None, &session),
            Navigation::Proceed
        );
    }

    #[tokio::test]
    async fn test_logout_locks_home_again() {
        let slot = slot();
        let session = SessionStore::new(MockApi::new(), slot.clone());
        let guard = NavigationGuard::new(slot);

        session.login("ada", "pw").await.unwrap();
        assert_eq!(guard.before_each(&Route::Home, None, &session), Navigation::Proceed);

        session.logout();
        assert_eq!(
            guard.before_each(&Route::Home, None, &session),
            Navigation::Redirect(Route::Login)
        );
        assert_eq!(guard.before_each(&Route::Login, None, &session), Navigation::Proceed);
    }
}
