//!
//! EduNex HTTP server
//! ------------------
//! Axum-based HTTP API for the college administration frontend.
//!
//! Responsibilities:
//! - Login/signup/logout endpoints delegating to the session service.
//! - Session and notice polling for the frontend shell.
//! - Navigation/default-view and tab-resolution endpoints per role.
//! - Role-gated read endpoints for the feature modules (admissions, fees,
//!   hostel, library, exams, attendance, students).

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::campus::{admissions, attendance, dashboard, exams, fees, hostel, library};
use crate::error::AuthError;
use crate::identity::{
    AuthProvider, LocalAuthProvider, Notices, Role, SeedAccount, SessionService,
    SupabaseProvider, UserProfile,
};
use crate::routing::{self, View};

/// Shared server state injected into all handlers. One session service per
/// running application; the provider behind it is fixed at startup.
pub struct AppState<P: AuthProvider> {
    pub auth: Arc<SessionService<P>>,
    pub notices: Notices,
}

impl<P: AuthProvider> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self { auth: self.auth.clone(), notices: self.notices.clone() }
    }
}

type ApiError = (StatusCode, Json<Value>);

fn auth_error(e: &AuthError) -> ApiError {
    (
        StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(json!({ "status": "error", "code": e.code_str(), "error": e.to_string() })),
    )
}

fn unauthorized() -> ApiError {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "status": "unauthorized" })),
    )
}

fn forbidden(view: View) -> ApiError {
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "status": "forbidden", "view": view.id() })),
    )
}

/// Admit the request when the backing view sits in the user's navigation
/// allow-list. Dashboard is in every list, so it only rejects when there is
/// no session at all.
fn gate(user: Option<UserProfile>, view: View) -> Result<UserProfile, ApiError> {
    let user = user.ok_or_else(unauthorized)?;
    if routing::is_allowed(user.role, view) {
        Ok(user)
    } else {
        Err(forbidden(view))
    }
}

#[derive(Debug, Deserialize)]
struct LoginPayload {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct SignUpPayload {
    email: String,
    password: String,
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

async fn login<P: AuthProvider>(
    State(state): State<AppState<P>>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<Value>, ApiError> {
    match state.auth.sign_in(&payload.email, &payload.password).await {
        Ok(()) => Ok(Json(json!({ "status": "ok" }))),
        Err(e) => {
            warn!(target: "auth", code = e.code_str(), "login rejected");
            Err(auth_error(&e))
        }
    }
}

async fn signup<P: AuthProvider>(
    State(state): State<AppState<P>>,
    Json(payload): Json<SignUpPayload>,
) -> Result<Json<Value>, ApiError> {
    match state
        .auth
        .sign_up(&payload.email, &payload.password, &payload.name)
        .await
    {
        Ok(profile) => Ok(Json(json!({ "status": "ok", "profile": profile }))),
        Err(e) => {
            warn!(target: "auth", code = e.code_str(), "signup rejected");
            Err(auth_error(&e))
        }
    }
}

async fn logout<P: AuthProvider>(
    State(state): State<AppState<P>>,
) -> Result<Json<Value>, ApiError> {
    state.auth.sign_out().await.map_err(|e| auth_error(&e))?;
    Ok(Json(json!({ "status": "ok" })))
}

async fn session<P: AuthProvider>(State(state): State<AppState<P>>) -> Json<Value> {
    let s = state.auth.state();
    Json(json!({ "user": s.user, "loading": s.loading }))
}

async fn notices<P: AuthProvider>(State(state): State<AppState<P>>) -> Json<Value> {
    Json(json!({ "notices": state.notices.drain() }))
}

async fn nav<P: AuthProvider>(
    State(state): State<AppState<P>>,
) -> Result<Json<Value>, ApiError> {
    let user = state.auth.current_user().ok_or_else(unauthorized)?;
    Ok(Json(json!({
        "role": user.role,
        "default_view": routing::default_view(user.role).id(),
        "entries": routing::navigation(user.role),
    })))
}

/// Resolve a selected tab id to the view that renders. Unknown/disallowed
/// ids resolve to the dashboard; librarians always land on the library
/// dashboard.
async fn resolve_view<P: AuthProvider>(
    State(state): State<AppState<P>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let user = state.auth.current_user().ok_or_else(unauthorized)?;
    let renders = routing::resolve(user.role, &id);
    Ok(Json(json!({ "selected": id, "renders": renders.id() })))
}

async fn api_dashboard<P: AuthProvider>(
    State(state): State<AppState<P>>,
) -> Result<Json<Value>, ApiError> {
    let user = gate(state.auth.current_user(), View::Dashboard)?;
    Ok(Json(json!({
        "stats": dashboard::stats_for(user.role),
        "activities": dashboard::recent_activities(user.role),
    })))
}

async fn api_admissions<P: AuthProvider>(
    State(state): State<AppState<P>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    gate(state.auth.current_user(), View::Admissions)?;
    let status = query
        .status
        .as_deref()
        .and_then(|s| serde_json::from_value(Value::String(s.to_string())).ok());
    Ok(Json(json!({
        "applications": admissions::search(query.q.as_deref().unwrap_or(""), status),
        "counts": admissions::status_counts(),
    })))
}

async fn api_students<P: AuthProvider>(
    State(state): State<AppState<P>>,
) -> Result<Json<Value>, ApiError> {
    gate(state.auth.current_user(), View::Students)?;
    Ok(Json(json!({ "students": admissions::students() })))
}

async fn api_fees<P: AuthProvider>(
    State(state): State<AppState<P>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let user = gate(state.auth.current_user(), View::Fees)?;
    let status = query
        .status
        .as_deref()
        .and_then(|s| serde_json::from_value(Value::String(s.to_string())).ok());
    let visible = fees::visible_for(&user);
    let rows = fees::filter(&visible, query.q.as_deref().unwrap_or(""), status);
    let summary = fees::summarize(&visible);
    Ok(Json(json!({ "transactions": rows, "summary": summary })))
}

async fn api_hostel<P: AuthProvider>(
    State(state): State<AppState<P>>,
) -> Result<Json<Value>, ApiError> {
    let user = gate(state.auth.current_user(), View::Hostel)?;
    if user.role == Role::Student {
        let allocation = user.student_id.as_deref().and_then(hostel::allocation_for);
        let room = allocation
            .and_then(|a| hostel::rooms().iter().find(|r| r.id == a.room_id));
        return Ok(Json(json!({ "allocation": allocation, "room": room })));
    }
    Ok(Json(json!({
        "rooms": hostel::rooms(),
        "available": hostel::available_rooms(),
        "allocations": hostel::allocations(),
        "occupancy": hostel::occupancy(),
    })))
}

async fn api_library<P: AuthProvider>(
    State(state): State<AppState<P>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let user = gate(state.auth.current_user(), View::Library)?;
    let books = library::search_books(query.q.as_deref().unwrap_or(""));
    if user.role == Role::Student {
        let issues = user
            .student_id
            .as_deref()
            .map(library::issued_to)
            .unwrap_or_default();
        return Ok(Json(json!({ "books": books, "my_issues": issues })));
    }
    Ok(Json(json!({
        "books": books,
        "circulation": library::circulation(),
        "overdue": library::overdue(),
        "total_fines": library::total_fines(),
    })))
}

async fn api_exams<P: AuthProvider>(
    State(state): State<AppState<P>>,
) -> Result<Json<Value>, ApiError> {
    let user = gate(state.auth.current_user(), View::Exams)?;
    if user.role == Role::Student {
        let results = user
            .student_id
            .as_deref()
            .map(exams::results_for)
            .unwrap_or_default();
        return Ok(Json(json!({ "exams": exams::exams(), "results": results })));
    }
    Ok(Json(json!({
        "exams": exams::exams(),
        "results": exams::results(),
        "pass_rate": exams::pass_rate(),
    })))
}

async fn api_attendance<P: AuthProvider>(
    State(state): State<AppState<P>>,
) -> Result<Json<Value>, ApiError> {
    let user = gate(state.auth.current_user(), View::Attendance)?;
    if user.role == Role::Student {
        let sid = user.student_id.as_deref().unwrap_or("");
        return Ok(Json(json!({
            "records": attendance::records_for(sid),
            "overall": attendance::overall_percentage(sid),
        })));
    }
    Ok(Json(json!({
        "records": attendance::records(),
        "shortage": attendance::below_threshold(75),
    })))
}

pub fn router<P: AuthProvider>(state: AppState<P>) -> Router {
    Router::new()
        .route("/", get(|| async { "edunex ok" }))
        .route("/auth/login", post(login::<P>))
        .route("/auth/signup", post(signup::<P>))
        .route("/auth/logout", post(logout::<P>))
        .route("/auth/session", get(session::<P>))
        .route("/auth/notices", get(notices::<P>))
        .route("/nav", get(nav::<P>))
        .route("/view/{id}", get(resolve_view::<P>))
        .route("/api/dashboard", get(api_dashboard::<P>))
        .route("/api/admissions", get(api_admissions::<P>))
        .route("/api/students", get(api_students::<P>))
        .route("/api/fees", get(api_fees::<P>))
        .route("/api/hostel", get(api_hostel::<P>))
        .route("/api/library", get(api_library::<P>))
        .route("/api/exams", get(api_exams::<P>))
        .route("/api/attendance", get(api_attendance::<P>))
        .with_state(state)
}

fn dev_seed_accounts() -> Vec<SeedAccount> {
    let seed = |email: &str, name: &str, student_id: Option<&str>| SeedAccount {
        email: email.into(),
        password: "edunex".into(),
        name: name.into(),
        student_id: student_id.map(|s| s.into()),
    };
    vec![
        seed("principal@admin.matrusri.edu.in", "Principal", None),
        seed("hod.cse@faculty.matrusri.edu.in", "HOD CSE", None),
        seed("chief@warden.matrusri.edu.in", "Chief Warden", None),
        seed("head@librarian.matrusri.edu.in", "Head Librarian", None),
        seed(
            "rajesh.kumar@student.matrusri.edu.in",
            "Rajesh Kumar",
            Some("MAT2024001"),
        ),
    ]
}

async fn serve<P: AuthProvider>(
    provider: Arc<P>,
    http_port: u16,
    call_timeout: Duration,
) -> anyhow::Result<()> {
    let notices = Notices::new();
    let auth = SessionService::start(provider, notices.clone(), call_timeout);
    let state = AppState { auth: auth.clone(), notices };
    let app = router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", http_port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    // Single teardown path for the auth-event subscription.
    auth.shutdown();
    Ok(())
}

/// Start the EduNex HTTP server from environment configuration. With
/// `EDUNEX_SUPABASE_URL`/`EDUNEX_SUPABASE_ANON_KEY` set, profiles and
/// credentials live in the hosted provider; otherwise a local dev provider
/// with seeded accounts is used.
pub async fn run() -> anyhow::Result<()> {
    let http_port: u16 = std::env::var("EDUNEX_HTTP_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let call_timeout = Duration::from_secs(
        std::env::var("EDUNEX_AUTH_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10),
    );
    let supabase_url = std::env::var("EDUNEX_SUPABASE_URL").ok();
    let supabase_key = std::env::var("EDUNEX_SUPABASE_ANON_KEY").ok();

    match (supabase_url, supabase_key) {
        (Some(url), Some(key)) => {
            info!(target: "startup", "using hosted auth provider at {}", url);
            let provider = Arc::new(
                SupabaseProvider::new(&url, &key, call_timeout)
                    .map_err(|e| anyhow::anyhow!(e))?,
            );
            serve(provider, http_port, call_timeout).await
        }
        _ => {
            warn!(target: "startup", "EDUNEX_SUPABASE_URL/ANON_KEY unset; using local dev auth provider");
            let provider = Arc::new(
                LocalAuthProvider::with_seed_accounts(&dev_seed_accounts())
                    .map_err(|e| anyhow::anyhow!(e))?,
            );
            serve(provider, http_port, call_timeout).await
        }
    }
}
