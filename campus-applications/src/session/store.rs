//! Session Store - single source of truth for the logged-in role and token
//!
//! Every mutation persists first and then publishes the new in-memory state
//! on a watch channel, so a failed write leaves the session unchanged.

use super::storage::{CookieJar, LocalStore, StorageBackends};
use super::types::{
    access_cookie_name, access_token_ttl, refresh_cookie_name, refresh_token_ttl, Cookie,
    SessionState, ROLE_KEY,
};
use campus_core::{CampusResult, Role, TokenProvider};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

pub struct SessionStore {
    cookies: Arc<dyn CookieJar>,
    local: Arc<dyn LocalStore>,
    state: watch::Sender<SessionState>,
}

impl SessionStore {
    /// Build a store and restore any session persisted in `backends`.
    ///
    /// The persisted role selects which role-scoped access cookie is loaded;
    /// without a role the session starts unauthenticated.
    pub fn restore(backends: StorageBackends) -> CampusResult<Self> {
        let role = match backends.local.get_item(ROLE_KEY)? {
            Some(raw) => match raw.parse::<Role>() {
                Ok(role) => Some(role),
                Err(e) => {
                    warn!(stored = %raw, "Ignoring persisted role: {}", e);
                    None
                }
            },
            None => None,
        };

        let access_token = match role {
            Some(role) => backends.cookies.get(&access_cookie_name(role))?,
            None => None,
        };

        debug!(
            role = ?role,
            authenticated = access_token.is_some(),
            "Restored session"
        );

        let (state, _) = watch::channel(SessionState { role, access_token });
        Ok(Self {
            cookies: backends.cookies,
            local: backends.local,
            state,
        })
    }

    /// Fresh in-memory session
    pub fn in_memory() -> Self {
        let backends = StorageBackends::in_memory();
        let (state, _) = watch::channel(SessionState::default());
        Self {
            cookies: backends.cookies,
            local: backends.local,
            state,
        }
    }

    /// Current role and token
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every session change
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn role(&self) -> Option<Role> {
        self.state.borrow().role
    }

    pub fn access_token(&self) -> Option<String> {
        self.state.borrow().access_token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn local_store(&self) -> Arc<dyn LocalStore> {
        Arc::clone(&self.local)
    }

    /// Hold `token` in memory; with a role, also persist it as that role's access cookie.
    ///
    /// An empty token is never written to a cookie.
    pub fn set_access_token(&self, token: &str, role: Option<Role>) -> CampusResult<()> {
        if let Some(role) = role.filter(|_| !token.is_empty()) {
            self.cookies.store(Cookie::strict(
                access_cookie_name(role),
                token,
                access_token_ttl(),
            ))?;
        }

        self.state.send_modify(|state| {
            state.access_token = Some(token.to_string());
        });
        Ok(())
    }

    /// Forget the in-memory access token; persisted cookies are left alone
    pub fn clear_access_token(&self) {
        self.state.send_if_modified(|state| state.access_token.take().is_some());
    }

    /// Persist the refresh token issued for `role`
    pub fn set_refresh_token(&self, token: &str, role: Role) -> CampusResult<()> {
        self.cookies.store(Cookie::strict(
            refresh_cookie_name(role),
            token,
            refresh_token_ttl(),
        ))
    }

    /// Persisted refresh token of `role`, else of the active role
    pub fn refresh_token(&self, role: Option<Role>) -> CampusResult<Option<String>> {
        match role.or_else(|| self.role()) {
            Some(role) => self.cookies.get(&refresh_cookie_name(role)),
            None => Ok(None),
        }
    }

    /// Set or clear the active role, mirroring it to local storage
    pub fn set_role(&self, role: Option<Role>) -> CampusResult<()> {
        match role {
            Some(role) => self.local.set_item(ROLE_KEY, role.as_str())?,
            None => self.local.remove_item(ROLE_KEY)?,
        }

        self.state.send_modify(|state| state.role = role);
        Ok(())
    }

    /// Drop the credentials of `role` (else the active role) and clear the session.
    ///
    /// Purely local; the backend is not told. Calling it again is a no-op.
    pub fn logout(&self, role: Option<Role>) -> CampusResult<()> {
        let target = role.or_else(|| self.role());

        if let Some(target) = target {
            self.cookies.remove(&access_cookie_name(target))?;
            self.cookies.remove(&refresh_cookie_name(target))?;
        }
        self.local.remove_item(ROLE_KEY)?;

        self.state.send_if_modified(|state| {
            let changed = state.role.is_some() || state.access_token.is_some();
            *state = SessionState::default();
            changed
        });

        info!(role = ?target, "Logged out");
        Ok(())
    }
}

impl TokenProvider for SessionStore {
    fn access_token(&self) -> Option<String> {
        SessionStore::access_token(self)
    }

    fn role(&self) -> Option<Role> {
        SessionStore::role(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_access_token_without_role_stays_in_memory() {
        let backends = StorageBackends::in_memory();
        let store = SessionStore::restore(backends.clone()).unwrap();

        store.set_access_token("tok", None).unwrap();
        assert_eq!(store.access_token().as_deref(), Some("tok"));

        for role in Role::ALL {
            assert_eq!(backends.cookies.get(&access_cookie_name(role)).unwrap(), None);
        }
    }

    #[test]
    fn test_empty_access_token_is_not_persisted() {
        let backends = StorageBackends::in_memory();
        let store = SessionStore::restore(backends.clone()).unwrap();

        store.set_access_token("", Some(Role::Faculty)).unwrap();
        assert_eq!(
            backends.cookies.get(&access_cookie_name(Role::Faculty)).unwrap(),
            None
        );

        store.set_access_token("tok", Some(Role::Faculty)).unwrap();
        store.set_access_token("", Some(Role::Faculty)).unwrap();
        assert_eq!(
            backends
                .cookies
                .get(&access_cookie_name(Role::Faculty))
                .unwrap()
                .as_deref(),
            Some("tok")
        );
    }

    #[test]
    fn test_clear_access_token_keeps_role_and_cookie() {
        let backends = StorageBackends::in_memory();
        let store = SessionStore::restore(backends.clone()).unwrap();
        store.set_role(Some(Role::Student)).unwrap();
        store.set_access_token("tok", Some(Role::Student)).unwrap();
        let mut rx = store.subscribe();

        store.clear_access_token();
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();
        assert_eq!(store.access_token(), None);
        assert_eq!(store.role(), Some(Role::Student));
        assert!(backends
            .cookies
            .get(&access_cookie_name(Role::Student))
            .unwrap()
            .is_some());

        store.clear_access_token();
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_unparseable_role_is_treated_as_absent() {
        let backends = StorageBackends::in_memory();
        backends.local.set_item(ROLE_KEY, "default").unwrap();
        backends
            .cookies
            .store(Cookie::strict("access_token_default", "tok", access_token_ttl()))
            .unwrap();

        let store = SessionStore::restore(backends).unwrap();
        assert_eq!(store.snapshot(), SessionState::default());
    }

    #[test]
    fn test_subscribers_see_changes() {
        let store = SessionStore::in_memory();
        let mut rx = store.subscribe();

        store.set_role(Some(Role::Student)).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().role, Some(Role::Student));

        store.logout(None).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), SessionState::default());

        // Second logout changes nothing and notifies nobody
        store.logout(None).unwrap();
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_refresh_token_falls_back_to_active_role() {
        let store = SessionStore::in_memory();
        store.set_refresh_token("r-fac", Role::Faculty).unwrap();

        assert_eq!(store.refresh_token(None).unwrap(), None);
        store.set_role(Some(Role::Faculty)).unwrap();
        assert_eq!(store.refresh_token(None).unwrap().as_deref(), Some("r-fac"));
        assert_eq!(store.refresh_token(Some(Role::Admin)).unwrap(), None);
    }
}
