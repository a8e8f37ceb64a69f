//! In-process auth provider backed by an Argon2 password store. Used for
//! development mode (seeded accounts) and integration tests; the hosted
//! provider is [`super::SupabaseProvider`].

use std::collections::HashMap;

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use base64::Engine;
use chrono::Utc;
use parking_lot::RwLock;
use password_hash::{PasswordHash, SaltString};
use tokio::sync::broadcast;

use crate::error::{AuthError, AuthResult};
use crate::tprintln;

use super::principal::{NewProfile, UserProfile};
use super::provider::{AuthEvent, AuthProvider, AuthSession, SignUpRequest};

/// Pre-provisioned account for dev mode.
#[derive(Debug, Clone)]
pub struct SeedAccount {
    pub email: String,
    pub password: String,
    pub name: String,
    pub student_id: Option<String>,
}

#[derive(Debug, Clone)]
struct AccountRecord {
    id: String,
    password_phc: String,
    name: String,
}

pub struct LocalAuthProvider {
    accounts: RwLock<HashMap<String, AccountRecord>>,
    profiles: RwLock<HashMap<String, UserProfile>>,
    current: RwLock<Option<AuthSession>>,
    events: broadcast::Sender<AuthEvent>,
}

fn gen_token() -> String {
    // 256-bit random token, base64url without padding
    let mut buf = [0u8; 32];
    let _ = getrandom::getrandom(&mut buf);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf)
}

fn hash_password(password: &str) -> AuthResult<String> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes)
        .map_err(|e| AuthError::unavailable(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AuthError::unavailable(e.to_string()))?;
    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::unavailable(e.to_string()))?
        .to_string();
    Ok(phc)
}

fn verify_password(hash: &str, password: &str) -> bool {
    if let Ok(parsed) = PasswordHash::new(hash) {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    } else {
        false
    }
}

impl LocalAuthProvider {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            accounts: RwLock::new(HashMap::new()),
            profiles: RwLock::new(HashMap::new()),
            current: RwLock::new(None),
            events,
        }
    }

    pub fn with_seed_accounts(seeds: &[SeedAccount]) -> AuthResult<Self> {
        let p = Self::new();
        for s in seeds {
            let id = uuid::Uuid::new_v4().to_string();
            let phc = hash_password(&s.password)?;
            p.accounts.write().insert(
                s.email.clone(),
                AccountRecord { id: id.clone(), password_phc: phc, name: s.name.clone() },
            );
            // Seeded accounts get their profile row up front; lazy creation
            // only applies to accounts born through sign_up.
            let role = super::resolver::derive_role(&s.email);
            p.profiles.write().insert(
                id.clone(),
                UserProfile {
                    id,
                    email: s.email.clone(),
                    name: s.name.clone(),
                    role,
                    student_id: s.student_id.clone(),
                    created_at: Utc::now(),
                },
            );
        }
        Ok(p)
    }

    /// Number of stored profile rows. Test/diagnostic helper.
    pub fn profile_count(&self) -> usize {
        self.profiles.read().len()
    }
}

impl Default for LocalAuthProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthProvider for LocalAuthProvider {
    async fn get_session(&self) -> AuthResult<Option<AuthSession>> {
        Ok(self.current.read().clone())
    }

    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<()> {
        let rec = self
            .accounts
            .read()
            .get(email)
            .cloned()
            .ok_or(AuthError::CredentialsRejected)?;
        if !verify_password(&rec.password_phc, password) {
            return Err(AuthError::CredentialsRejected);
        }
        let session = AuthSession {
            user_id: rec.id.clone(),
            email: email.to_string(),
            name: Some(rec.name.clone()),
            access_token: gen_token(),
        };
        *self.current.write() = Some(session.clone());
        tprintln!("auth.login user={} id={}", email, rec.id);
        let _ = self.events.send(AuthEvent::SignedIn(session));
        Ok(())
    }

    async fn sign_up(&self, req: &SignUpRequest) -> AuthResult<AuthSession> {
        let mut accounts = self.accounts.write();
        if accounts.contains_key(&req.email) {
            return Err(AuthError::CredentialsRejected);
        }
        let id = uuid::Uuid::new_v4().to_string();
        let phc = hash_password(&req.password)?;
        accounts.insert(
            req.email.clone(),
            AccountRecord { id: id.clone(), password_phc: phc, name: req.name.clone() },
        );
        // Like a confirmation-required signup: the account exists but no
        // session is established until the user signs in.
        Ok(AuthSession {
            user_id: id,
            email: req.email.clone(),
            name: Some(req.name.clone()),
            access_token: String::new(),
        })
    }

    async fn sign_out(&self) -> AuthResult<()> {
        if self.current.write().take().is_some() {
            let _ = self.events.send(AuthEvent::SignedOut);
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    async fn fetch_profile(&self, id: &str) -> AuthResult<Option<UserProfile>> {
        Ok(self.profiles.read().get(id).cloned())
    }

    async fn insert_profile(&self, profile: &NewProfile) -> AuthResult<UserProfile> {
        let mut profiles = self.profiles.write();
        // Insert-if-absent keyed by identity id: a racing duplicate resolves
        // to the row that won.
        if let Some(existing) = profiles.get(&profile.id) {
            return Ok(existing.clone());
        }
        let row = UserProfile {
            id: profile.id.clone(),
            email: profile.email.clone(),
            name: profile.name.clone(),
            role: profile.role,
            student_id: None,
            created_at: Utc::now(),
        };
        profiles.insert(row.id.clone(), row.clone());
        Ok(row)
    }
}
