//! Hosted auth/storage provider: GoTrue password auth plus a PostgREST
//! `users` table for profiles. Response bodies are navigated as JSON values;
//! only the fields this service needs are pulled out.

use chrono::Utc;
use parking_lot::RwLock;
use serde_json::{json, Value};
use tokio::sync::broadcast;

use crate::error::{AuthError, AuthResult};

use super::principal::{NewProfile, UserProfile};
use super::provider::{AuthEvent, AuthProvider, AuthSession, SignUpRequest};

const PROFILES_TABLE: &str = "users";

pub struct SupabaseProvider {
    base_url: String,
    anon_key: String,
    http: reqwest::Client,
    current: RwLock<Option<AuthSession>>,
    events: broadcast::Sender<AuthEvent>,
}

impl SupabaseProvider {
    pub fn new(base_url: &str, anon_key: &str, timeout: std::time::Duration) -> AuthResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::unavailable(e.to_string()))?;
        let (events, _) = broadcast::channel(16);
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            http,
            current: RwLock::new(None),
            events,
        })
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn bearer(&self) -> String {
        // Profile reads/writes ride the user's token when one exists,
        // otherwise the anon key.
        self.current
            .read()
            .as_ref()
            .map(|s| s.access_token.clone())
            .unwrap_or_else(|| self.anon_key.clone())
    }

    /// Pull an identity out of a GoTrue response body. The `user` object is
    /// nested under token-grant responses and top-level for signup.
    fn session_from_body(body: &Value, access_token: String) -> AuthResult<AuthSession> {
        let user = body.get("user").unwrap_or(body);
        let user_id = user.get("id").and_then(|v| v.as_str());
        let email = user.get("email").and_then(|v| v.as_str());
        let (Some(user_id), Some(email)) = (user_id, email) else {
            return Err(AuthError::InvalidEmailFormat {
                detail: "provider returned an identity without id/email".into(),
            });
        };
        let name = user
            .get("user_metadata")
            .and_then(|m| m.get("name"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());
        Ok(AuthSession {
            user_id: user_id.to_string(),
            email: email.to_string(),
            name,
            access_token,
        })
    }
}

impl AuthProvider for SupabaseProvider {
    async fn get_session(&self) -> AuthResult<Option<AuthSession>> {
        Ok(self.current.read().clone())
    }

    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<()> {
        let resp = self
            .http
            .post(format!("{}?grant_type=password", self.auth_url("token")))
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AuthError::unavailable(e.to_string()))?;
        let status = resp.status();
        if status.is_client_error() {
            return Err(AuthError::CredentialsRejected);
        }
        if !status.is_success() {
            return Err(AuthError::unavailable(format!("token grant failed: {status}")));
        }
        let body: Value = resp
            .json()
            .await
            .map_err(|e| AuthError::unavailable(e.to_string()))?;
        let token = body
            .get("access_token")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AuthError::unavailable("token grant returned no access_token"))?
            .to_string();
        let session = Self::session_from_body(&body, token)?;
        *self.current.write() = Some(session.clone());
        let _ = self.events.send(AuthEvent::SignedIn(session));
        Ok(())
    }

    async fn sign_up(&self, req: &SignUpRequest) -> AuthResult<AuthSession> {
        let resp = self
            .http
            .post(self.auth_url("signup"))
            .header("apikey", &self.anon_key)
            .json(&json!({
                "email": req.email,
                "password": req.password,
                "data": { "name": req.name },
            }))
            .send()
            .await
            .map_err(|e| AuthError::unavailable(e.to_string()))?;
        let status = resp.status();
        if status.is_client_error() {
            return Err(AuthError::CredentialsRejected);
        }
        if !status.is_success() {
            return Err(AuthError::unavailable(format!("signup failed: {status}")));
        }
        let body: Value = resp
            .json()
            .await
            .map_err(|e| AuthError::unavailable(e.to_string()))?;
        let token = body
            .get("access_token")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        Self::session_from_body(&body, token)
    }

    async fn sign_out(&self) -> AuthResult<()> {
        let Some(session) = self.current.read().clone() else {
            return Ok(());
        };
        let resp = self
            .http
            .post(self.auth_url("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await
            .map_err(|e| AuthError::unavailable(e.to_string()))?;
        if !resp.status().is_success() && resp.status() != reqwest::StatusCode::UNAUTHORIZED {
            return Err(AuthError::unavailable(format!("logout failed: {}", resp.status())));
        }
        self.current.write().take();
        let _ = self.events.send(AuthEvent::SignedOut);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    async fn fetch_profile(&self, id: &str) -> AuthResult<Option<UserProfile>> {
        let url = format!(
            "{}?id=eq.{}&select=*",
            self.rest_url(PROFILES_TABLE),
            urlencoding::encode(id)
        );
        let resp = self
            .http
            .get(url)
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
            .send()
            .await
            .map_err(|e| AuthError::profile_fetch(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(AuthError::profile_fetch(format!(
                "profile query returned {}",
                resp.status()
            )));
        }
        let rows: Vec<Value> = resp
            .json()
            .await
            .map_err(|e| AuthError::profile_fetch(e.to_string()))?;
        let Some(row) = rows.into_iter().next() else {
            return Ok(None);
        };
        serde_json::from_value(row)
            .map(Some)
            .map_err(|e| AuthError::profile_fetch(format!("malformed profile row: {e}")))
    }

    async fn insert_profile(&self, profile: &NewProfile) -> AuthResult<UserProfile> {
        // Idempotent upsert: duplicates (same identity id) are ignored and
        // the surviving row is fetched back.
        let resp = self
            .http
            .post(self.rest_url(PROFILES_TABLE))
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
            .header("Prefer", "resolution=ignore-duplicates,return=representation")
            .json(&json!([{
                "id": profile.id,
                "email": profile.email,
                "name": profile.name,
                "role": profile.role,
                "created_at": Utc::now().to_rfc3339(),
            }]))
            .send()
            .await
            .map_err(|e| AuthError::profile_create(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(AuthError::profile_create(format!(
                "profile insert returned {}",
                resp.status()
            )));
        }
        let rows: Vec<Value> = resp
            .json()
            .await
            .map_err(|e| AuthError::profile_create(e.to_string()))?;
        match rows.into_iter().next() {
            Some(row) => serde_json::from_value(row)
                .map_err(|e| AuthError::profile_create(format!("malformed profile row: {e}"))),
            // Duplicate was ignored; someone else won the race.
            None => self
                .fetch_profile(&profile.id)
                .await?
                .ok_or_else(|| AuthError::profile_create("upsert returned no row")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_from_nested_and_flat_bodies() {
        let nested = json!({
            "access_token": "tok",
            "user": {
                "id": "u-1",
                "email": "a@matrusri.edu.in",
                "user_metadata": { "name": "A" }
            }
        });
        let s = SupabaseProvider::session_from_body(&nested, "tok".into()).unwrap();
        assert_eq!(s.user_id, "u-1");
        assert_eq!(s.name.as_deref(), Some("A"));

        let flat = json!({ "id": "u-2", "email": "b@matrusri.edu.in" });
        let s = SupabaseProvider::session_from_body(&flat, String::new()).unwrap();
        assert_eq!(s.user_id, "u-2");
        assert!(s.name.is_none());
    }

    #[test]
    fn identity_without_email_is_invalid() {
        let body = json!({ "user": { "id": "u-3" } });
        assert!(matches!(
            SupabaseProvider::session_from_body(&body, String::new()),
            Err(AuthError::InvalidEmailFormat { .. })
        ));
    }
}
