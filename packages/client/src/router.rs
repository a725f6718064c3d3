//! History-based navigation with the guard in front of every transition.

use api::NotesApi;

use crate::guard::{Navigation, NavigationGuard, Route};
use crate::session::SessionStore;

/// Redirects followed before a navigation is abandoned.
const MAX_REDIRECTS: usize = 4;

/// Navigation history. The last entry is the current route.
#[derive(Debug, Clone, Default)]
pub struct Router {
    history: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Route> {
        self.history.last()
    }

    pub fn history(&self) -> &[Route] {
        &self.history
    }

    /// Navigate to `path`, following guard redirects.
    ///
    /// Each redirect target is guarded again, as a fresh navigation would be.
    /// Returns the route landed on, or `None` if the navigation was abandoned,
    /// in which case the history is unchanged.
    pub fn navigate<A: NotesApi>(
        &mut self,
        path: &str,
        guard: &NavigationGuard,
        session: &SessionStore<A>,
    ) -> Option<&Route> {
        let target = self.resolve(Route::parse(path), guard, session)?;
        if self.current() != Some(&target) {
            self.history.push(target);
        }
        self.current()
    }

    /// Go back one entry. The previous route is guarded again, so going back
    /// to the note list after signing out lands on the login page.
    pub fn back<A: NotesApi>(
        &mut self,
        guard: &NavigationGuard,
        session: &SessionStore<A>,
    ) -> Option<&Route> {
        if self.history.len() < 2 {
            return None;
        }
        let previous = self.history[self.history.len() - 2].clone();
        let target = self.resolve(previous, guard, session)?;
        self.history.pop();
        if let Some(last) = self.history.last_mut() {
            *last = target;
        }
        self.current()
    }

    fn resolve<A: NotesApi>(
        &self,
        mut target: Route,
        guard: &NavigationGuard,
        session: &SessionStore<A>,
    ) -> Option<Route> {
        let mut from = self.current().cloned();
        for _ in 0..=MAX_REDIRECTS {
            match guard.before_each(&target, from.as_ref(), session) {
                Navigation::Proceed => return Some(target),
                Navigation::Redirect(next) => {
                    from = Some(target);
                    target = next;
                }
            }
        }
        tracing::warn!("Navigation abandoned after {} redirects", MAX_REDIRECTS);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::mock::MockApi;
    use store::{CredentialSlot, MemoryStore};

    fn setup() -> (SessionStore<MockApi>, NavigationGuard) {
        let slot = CredentialSlot::new(MemoryStore::new(), CredentialSlot::DEFAULT_KEY);
        (
            SessionStore::new(MockApi::new(), slot.clone()),
            NavigationGuard::new(slot),
        )
    }

    #[test]
    fn test_signed_out_start_lands_on_login() {
        let (session, guard) = setup();
        let mut router = Router::new();

        assert_eq!(router.navigate("/", &guard, &session), Some(&Route::Login));
        assert_eq!(router.history(), [Route::Login]);
    }

    #[tokio::test]
    async fn test_login_page_bounces_to_home_when_signed_in() {
        let (session, guard) = setup();
        let mut router = Router::new();
        router.navigate("/login", &guard, &session);

        session.login("ada", "pw").await.unwrap();

        assert_eq!(router.navigate("/login", &guard, &session), Some(&Route::Home));
        assert_eq!(router.history(), [Route::Login, Route::Home]);
    }

    #[test]
    fn test_public_routes_need_no_session() {
        let (session, guard) = setup();
        let mut router = Router::new();

        assert_eq!(router.navigate("/signup", &guard, &session), Some(&Route::Signup));
        assert_eq!(
            router.navigate("/missing", &guard, &session),
            Some(&Route::NotFound("/missing".to_string()))
        );
    }

    #[test]
    fn test_same_route_is_not_pushed_twice() {
        let (session, guard) = setup();
        let mut router = Router::new();
        router.navigate("/signup", &guard, &session);
        router.navigate("/signup/", &guard, &session);
        assert_eq!(router.history().len(), 1);
    }

    #[tokio::test]
    async fn test_back_is_guarded() {
        let (session, guard) = setup();
        let mut router = Router::new();

        router.navigate("/signup", &guard, &session);
        session.login("ada", "pw").await.unwrap();
        router.navigate("/", &guard, &session);
        router.navigate("/missing", &guard, &session);

        assert_eq!(router.back(&guard, &session), Some(&Route::Home));

        session.logout();
        router.navigate("/missing", &guard, &session);
        assert_eq!(router.back(&guard, &session), Some(&Route::Login));
        assert_eq!(router.history(), [Route::Signup, Route::Login]);
    }

    #[test]
    fn test_back_at_start_does_nothing() {
        let (session, guard) = setup();
        let mut router = Router::new();
        assert!(router.back(&guard, &session).is_none());
        router.navigate("/signup", &guard, &session);
        assert!(router.back(&guard, &session).is_none());
        assert_eq!(router.current(), Some(&Route::Signup));
    }
}
