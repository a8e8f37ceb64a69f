//! Session lifecycle integration tests: session restore, lazy profile
//! creation, and failure paths surfaced through the notice queue.
//! These exercise positive and negative paths against a scripted provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::broadcast;

use edunex::error::{AuthError, AuthResult};
use edunex::identity::{
    derive_role, AuthEvent, AuthProvider, AuthSession, NewProfile, Notices, Role,
    SessionService, SessionState, SignUpRequest, UserProfile,
};

const TIMEOUT: Duration = Duration::from_secs(2);

/// Provider with a pre-scripted session/profile and switchable failures,
/// counting every profile call it receives.
struct ScriptedProvider {
    session: Option<AuthSession>,
    profile: Mutex<Option<UserProfile>>,
    fail_fetch: bool,
    fail_insert: bool,
    auth_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
    insert_calls: AtomicUsize,
    events: broadcast::Sender<AuthEvent>,
}

impl ScriptedProvider {
    fn new(session: Option<AuthSession>, profile: Option<UserProfile>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            session,
            profile: Mutex::new(profile),
            fail_fetch: false,
            fail_insert: false,
            auth_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
            insert_calls: AtomicUsize::new(0),
            events,
        }
    }
}

impl AuthProvider for ScriptedProvider {
    async fn get_session(&self) -> AuthResult<Option<AuthSession>> {
        Ok(self.session.clone())
    }

    async fn sign_in(&self, _email: &str, _password: &str) -> AuthResult<()> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        match &self.session {
            Some(s) => {
                let _ = self.events.send(AuthEvent::SignedIn(s.clone()));
                Ok(())
            }
            None => Err(AuthError::CredentialsRejected),
        }
    }

    async fn sign_up(&self, req: &SignUpRequest) -> AuthResult<AuthSession> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        Ok(AuthSession {
            user_id: "scripted-id".into(),
            email: req.email.clone(),
            name: Some(req.name.clone()),
            access_token: String::new(),
        })
    }

    async fn sign_out(&self) -> AuthResult<()> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        let _ = self.events.send(AuthEvent::SignedOut);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    async fn fetch_profile(&self, _id: &str) -> AuthResult<Option<UserProfile>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch {
            return Err(AuthError::profile_fetch("scripted failure"));
        }
        Ok(self.profile.lock().clone())
    }

    async fn insert_profile(&self, profile: &NewProfile) -> AuthResult<UserProfile> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_insert {
            return Err(AuthError::profile_create("scripted failure"));
        }
        let row = UserProfile {
            id: profile.id.clone(),
            email: profile.email.clone(),
            name: profile.name.clone(),
            role: profile.role,
            student_id: None,
            created_at: Utc::now(),
        };
        *self.profile.lock() = Some(row.clone());
        Ok(row)
    }
}

fn scripted_session(email: &str) -> AuthSession {
    AuthSession {
        user_id: "scripted-id".into(),
        email: email.into(),
        name: Some("Scripted".into()),
        access_token: "tok".into(),
    }
}

fn stored_profile(email: &str) -> UserProfile {
    UserProfile {
        id: "scripted-id".into(),
        email: email.into(),
        name: "Scripted".into(),
        role: derive_role(email),
        student_id: None,
        created_at: Utc::now(),
    }
}

async fn settled<P: AuthProvider>(svc: &SessionService<P>) -> SessionState {
    let mut rx = svc.watch();
    loop {
        let s = rx.borrow().clone();
        if !s.loading {
            return s;
        }
        rx.changed().await.expect("state channel closed");
    }
}

#[tokio::test]
async fn restore_with_existing_profile_skips_insert() {
    let email = "existing@faculty.matrusri.edu.in";
    let provider = Arc::new(ScriptedProvider::new(
        Some(scripted_session(email)),
        Some(stored_profile(email)),
    ));
    let notices = Notices::new();
    let svc = SessionService::start(provider.clone(), notices.clone(), TIMEOUT);

    let state = settled(&svc).await;
    let user = state.user.expect("user should be populated from stored row");
    assert_eq!(user.role, Role::Faculty);
    assert_eq!(provider.fetch_calls.load(Ordering::SeqCst), 1);
    assert_eq!(provider.insert_calls.load(Ordering::SeqCst), 0);
    assert!(notices.is_empty());
    svc.shutdown();
}

#[tokio::test]
async fn first_login_inserts_exactly_one_profile_with_derived_role() {
    let email = "fresh@warden.matrusri.edu.in";
    let provider = Arc::new(ScriptedProvider::new(Some(scripted_session(email)), None));
    let notices = Notices::new();
    let svc = SessionService::start(provider.clone(), notices.clone(), TIMEOUT);

    let state = settled(&svc).await;
    let user = state.user.expect("profile should be lazily created");
    assert_eq!(user.role, Role::Warden);
    assert_eq!(provider.insert_calls.load(Ordering::SeqCst), 1);
    assert!(notices.is_empty());
    svc.shutdown();
}

#[tokio::test]
async fn insert_failure_leaves_unauthenticated_with_one_notice() {
    let email = "fresh@matrusri.edu.in";
    let mut provider = ScriptedProvider::new(Some(scripted_session(email)), None);
    provider.fail_insert = true;
    let provider = Arc::new(provider);
    let notices = Notices::new();
    let svc = SessionService::start(provider.clone(), notices.clone(), TIMEOUT);

    let state = settled(&svc).await;
    assert!(state.user.is_none());
    assert!(!state.loading);
    assert_eq!(provider.insert_calls.load(Ordering::SeqCst), 1);
    let drained = notices.drain();
    assert_eq!(drained.len(), 1);
    assert!(drained[0].message.contains("create"));
    svc.shutdown();
}

#[tokio::test]
async fn fetch_failure_surfaces_one_notice() {
    let email = "broken@matrusri.edu.in";
    let mut provider = ScriptedProvider::new(Some(scripted_session(email)), None);
    provider.fail_fetch = true;
    let provider = Arc::new(provider);
    let notices = Notices::new();
    let svc = SessionService::start(provider.clone(), notices.clone(), TIMEOUT);

    let state = settled(&svc).await;
    assert!(state.user.is_none());
    assert_eq!(provider.insert_calls.load(Ordering::SeqCst), 0);
    assert_eq!(notices.drain().len(), 1);
    svc.shutdown();
}

#[tokio::test]
async fn foreign_domain_is_rejected_before_any_provider_call() {
    let provider = Arc::new(ScriptedProvider::new(None, None));
    let svc = SessionService::start(provider.clone(), Notices::new(), TIMEOUT);
    settled(&svc).await;

    let err = svc.sign_in("user@gmail.com", "pw").await.unwrap_err();
    assert!(matches!(err, AuthError::DomainRejected { .. }));
    let err = svc.sign_up("user@gmail.com", "pw", "U").await.unwrap_err();
    assert!(matches!(err, AuthError::DomainRejected { .. }));
    assert_eq!(provider.auth_calls.load(Ordering::SeqCst), 0);
    assert_eq!(provider.fetch_calls.load(Ordering::SeqCst), 0);
    svc.shutdown();
}

#[tokio::test]
async fn profile_insert_failure_during_sign_up_propagates() {
    let mut provider = ScriptedProvider::new(None, None);
    provider.fail_insert = true;
    let provider = Arc::new(provider);
    let svc = SessionService::start(provider.clone(), Notices::new(), TIMEOUT);
    settled(&svc).await;

    // Account creation succeeds, profile insert fails: the caller gets the
    // error instead of a silent swallow.
    let err = svc
        .sign_up("new@matrusri.edu.in", "pw", "New")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::ProfileCreateFailed { .. }));
    assert_eq!(provider.insert_calls.load(Ordering::SeqCst), 1);
    svc.shutdown();
}

#[tokio::test]
async fn sign_out_event_clears_the_user() {
    let email = "existing@matrusri.edu.in";
    let provider = Arc::new(ScriptedProvider::new(
        Some(scripted_session(email)),
        Some(stored_profile(email)),
    ));
    let svc = SessionService::start(provider.clone(), Notices::new(), TIMEOUT);
    assert!(settled(&svc).await.user.is_some());

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
