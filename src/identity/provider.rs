//! External auth/storage provider contract. The hosted service is treated as
//! an opaque collaborator: credential verification, account creation and
//! profile storage all live behind this trait.

use std::future::Future;

use tokio::sync::broadcast;

use crate::error::AuthResult;

use super::principal::{NewProfile, UserProfile};

/// Bare authenticated identity as reported by the provider. The profile row
/// (role, student_id, ...) is resolved separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user_id: String,
    pub email: String,
    /// Display name from sign-up metadata, when the provider kept one.
    pub name: Option<String>,
    pub access_token: String,
}

/// Auth-state change notifications, mirroring the provider's event stream.
#[derive(Debug, Clone)]
pub enum AuthEvent {
    SignedIn(AuthSession),
    SignedOut,
}

#[derive(Debug, Clone)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

pub trait AuthProvider: Send + Sync + 'static {
    /// Restore the current session, if the provider still holds one.
    fn get_session(&self) -> impl Future<Output = AuthResult<Option<AuthSession>>> + Send;

    /// Verify credentials. On success the provider emits
    /// [`AuthEvent::SignedIn`] on the event stream; the caller must not
    /// assume any session state from the return value alone.
    fn sign_in(&self, email: &str, password: &str) -> impl Future<Output = AuthResult<()>> + Send;

    /// Create an account. Returns the new bare identity so the caller can
    /// insert the matching profile row.
    fn sign_up(&self, req: &SignUpRequest) -> impl Future<Output = AuthResult<AuthSession>> + Send;

    /// Invalidate the current session; emits [`AuthEvent::SignedOut`].
    fn sign_out(&self) -> impl Future<Output = AuthResult<()>> + Send;

    /// Subscribe to auth-state changes for the lifetime of the application.
    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;

    /// Fetch a stored profile. `Ok(None)` means "no row yet" (first-ever
    /// login); transport or query failures are errors.
    fn fetch_profile(
        &self,
        id: &str,
    ) -> impl Future<Output = AuthResult<Option<UserProfile>>> + Send;

    /// Idempotent insert-if-absent keyed by the identity id. Racing inserts
    /// for the same identity resolve to the already-present row.
    fn insert_profile(
        &self,
        profile: &NewProfile,
    ) -> impl Future<Output = AuthResult<UserProfile>> + Send;
}
