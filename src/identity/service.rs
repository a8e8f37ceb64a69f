//! Session/profile lifecycle. One `SessionService` exists per running
//! application: it restores the provider session at startup, resolves (or
//! lazily creates) the profile row, and follows the provider's auth-event
//! stream until shutdown.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::{AuthError, AuthResult};

use super::notify::Notices;
use super::principal::{NewProfile, UserProfile};
use super::provider::{AuthEvent, AuthProvider, SignUpRequest};
use super::resolver::is_institutional_email;

/// Observable authentication state. `loading` covers the whole
/// initializing/resolving-profile span; the frontend renders a spinner while
/// it is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<UserProfile>,
    pub loading: bool,
}

pub struct SessionService<P: AuthProvider> {
    provider: Arc<P>,
    state_rx: watch::Receiver<SessionState>,
    call_timeout: Duration,
    listener: Mutex<Option<JoinHandle<()>>>,
}

async fn with_timeout<T>(
    d: Duration,
    fut: impl Future<Output = AuthResult<T>>,
) -> AuthResult<T> {
    match tokio::time::timeout(d, fut).await {
        Ok(res) => res,
        Err(_) => Err(AuthError::unavailable(format!(
            "auth call exceeded {}s",
            d.as_secs()
        ))),
    }
}

/// Fetch-or-create the profile for an authenticated identity, then settle
/// `loading`. Passive-path failures go to the notice queue; there is no
/// caller to hand them to.
async fn resolve_profile<P: AuthProvider>(
    provider: &P,
    state_tx: &watch::Sender<SessionState>,
    notices: &Notices,
    call_timeout: Duration,
    session: super::provider::AuthSession,
) {
    let user = match with_timeout(call_timeout, provider.fetch_profile(&session.user_id)).await {
        Ok(Some(profile)) => Some(profile),
        Ok(None) => {
            // First-ever login: derive the role from the session email and
            // insert the row.
            let new = NewProfile::with_default_name(
                session.user_id.clone(),
                session.email.clone(),
                session.name.clone(),
            );
            info!(target: "auth", email = %new.email, role = %new.role, "creating profile on first login");
            match with_timeout(call_timeout, provider.insert_profile(&new)).await {
                Ok(profile) => Some(profile),
                Err(e) => {
                    warn!(target: "auth", error = %e, "profile creation failed");
                    notices.error("Failed to create user profile");
                    None
                }
            }
        }
        Err(e) => {
            warn!(target: "auth", error = %e, "profile fetch failed");
            notices.error("Failed to load user profile");
            None
        }
    };
    state_tx.send_modify(|s| {
        s.user = user;
        s.loading = false;
    });
}

impl<P: AuthProvider> SessionService<P> {
    /// Initialize the service and start following the provider: restore any
    /// existing session, then apply auth-state changes until [`shutdown`].
    ///
    /// [`shutdown`]: SessionService::shutdown
    pub fn start(provider: Arc<P>, notices: Notices, call_timeout: Duration) -> Arc<Self> {
        let (state_tx, state_rx) =
            watch::channel(SessionState { user: None, loading: true });
        // Subscribe before the initial restore so no event can slip between.
        let mut events = provider.subscribe();
        let svc = Arc::new(Self {
            provider: provider.clone(),
            state_rx,
            call_timeout,
            listener: Mutex::new(None),
        });
        let handle = tokio::spawn(async move {
            match with_timeout(call_timeout, provider.get_session()).await {
                Ok(Some(session)) => {
                    resolve_profile(&*provider, &state_tx, &notices, call_timeout, session).await;
                }
                Ok(None) => {
                    state_tx.send_modify(|s| s.loading = false);
                }
                Err(e) => {
                    warn!(target: "auth", error = %e, "session restore failed");
                    notices.error("Failed to load user profile");
                    state_tx.send_modify(|s| s.loading = false);
                }
            }
            loop {
                match events.recv().await {
                    Ok(AuthEvent::SignedIn(session)) => {
                        state_tx.send_modify(|s| s.loading = true);
                        resolve_profile(&*provider, &state_tx, &notices, call_timeout, session)
                            .await;
                    }
                    Ok(AuthEvent::SignedOut) => {
                        state_tx.send_modify(|s| {
                            s.user = None;
                            s.loading = false;
                        });
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        warn!(target: "auth", skipped = n, "auth event stream lagged");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        *svc.listener.lock() = Some(handle);
        svc
    }

    /// Current snapshot.
    pub fn state(&self) -> SessionState {
        self.state_rx.borrow().clone()
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.state_rx.borrow().user.clone()
    }

    /// Watch state transitions (loading flips, login, logout).
    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.state_rx.clone()
    }

    /// Validate the domain, then delegate credential verification. Does not
    /// set the user itself: the auth-event stream drives profile resolution.
    pub async fn sign_in(&self, email: &str, password: &str) -> AuthResult<()> {
        if !is_institutional_email(email) {
            return Err(AuthError::DomainRejected { email: email.to_string() });
        }
        with_timeout(self.call_timeout, self.provider.sign_in(email, password)).await
    }

    /// Create the account and its profile row. A profile-insert failure after
    /// the account exists is propagated as-is: the account is left without a
    /// usable profile and the caller decides how to retry.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> AuthResult<UserProfile> {
        if !is_institutional_email(email) {
            return Err(AuthError::DomainRejected { email: email.to_string() });
        }
        let req = SignUpRequest {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        };
        let session = with_timeout(self.call_timeout, self.provider.sign_up(&req)).await?;
        let new = NewProfile::with_default_name(
            session.user_id,
            session.email,
            Some(name.to_string()),
        );
        with_timeout(self.call_timeout, self.provider.insert_profile(&new)).await
    }

    pub async fn sign_out(&self) -> AuthResult<()> {
        with_timeout(self.call_timeout, self.provider.sign_out()).await
    }

    /// Stop following the provider. Exactly one disposal path: the handle is
    /// taken out, so a second call is a no-op.
    pub fn shutdown(&self) {
        if let Some(handle) = self.listener.lock().take() {
            handle.abort();
        }
    }
}

impl<P: AuthProvider> Drop for SessionService<P> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::local::{LocalAuthProvider, SeedAccount};
    use crate::identity::resolver::Role;

    const TIMEOUT: Duration = Duration::from_secs(2);

    fn seeded_provider() -> Arc<LocalAuthProvider> {
        Arc::new(
            LocalAuthProvider::with_seed_accounts(&[SeedAccount {
                email: "priya@matrusri.edu.in".into(),
                password: "pw".into(),
                name: "Priya".into(),
                student_id: Some("MAT2024002".into()),
            }])
            .unwrap(),
        )
    }

    async fn settled(svc: &SessionService<LocalAuthProvider>) -> SessionState {
        let mut rx = svc.watch();
        loop {
            let s = rx.borrow().clone();
            if !s.loading {
                return s;
            }
            rx.changed().await.unwrap();
        }
    }

    #[tokio::test]
    async fn startup_without_session_settles_unauthenticated() {
        let svc = SessionService::start(seeded_provider(), Notices::new(), TIMEOUT);
        let s = settled(&svc).await;
        assert!(s.user.is_none());
        svc.shutdown();
    }

    #[tokio::test]
    async fn domain_is_checked_before_any_provider_call() {
        let svc = SessionService::start(seeded_provider(), Notices::new(), TIMEOUT);
        let err = svc.sign_in("user@gmail.com", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::DomainRejected { .. }));
        let err = svc.sign_up("user@gmail.com", "pw", "U").await.unwrap_err();
        assert!(matches!(err, AuthError::DomainRejected { .. }));
        svc.shutdown();
    }

    #[tokio::test]
    async fn sign_in_populates_user_via_event_stream() {
        let provider = seeded_provider();
        let svc = SessionService::start(provider, Notices::new(), TIMEOUT);
        settled(&svc).await;
        svc.sign_in("priya@matrusri.edu.in", "pw").await.unwrap();
        let mut rx = svc.watch();
        loop {
            let s = rx.borrow().clone();
            if let Some(u) = s.user {
                assert_eq!(u.role, Role::Student);
                assert_eq!(u.student_id.as_deref(), Some("MAT2024002"));
                break;
            }
            rx.changed().await.unwrap();
        }
        svc.sign_out().await.unwrap();
        let mut rx = svc.watch();
        loop {
            let s = rx.borrow().clone();
            if s.user.is_none() && !s.loading {
                break;
            }
            rx.changed().await.unwrap();
        }
        svc.shutdown();
    }

    #[tokio::test]
    async fn sign_up_creates_exactly_one_profile_row() {
        let provider = Arc::new(LocalAuthProvider::new());
        let svc = SessionService::start(provider.clone(), Notices::new(), TIMEOUT);
        settled(&svc).await;
        let profile = svc
            .sign_up("new.student@matrusri.edu.in", "pw", "New Student")
            .await
            .unwrap();
        assert_eq!(profile.role, Role::Student);
        assert_eq!(profile.email, "new.student@matrusri.edu.in");
        assert_eq!(provider.profile_count(), 1);
        // First sign-in resolves the row that sign_up created; no second insert.
        svc.sign_in("new.student@matrusri.edu.in", "pw").await.unwrap();
        let mut rx = svc.watch();
        loop {
            if rx.borrow().user.is_some() {
                break;
            }
            rx.changed().await.unwrap();
        }
        assert_eq!(provider.profile_count(), 1);
        svc.shutdown();
    }
}
