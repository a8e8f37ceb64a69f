//! Central identity and session management for unified login across EduNex.
//! Keep the public surface thin and split implementation across sub-modules.

mod resolver;
mod principal;
mod provider;
mod local;
mod supabase;
mod service;
mod notify;

pub use resolver::{derive_role, is_institutional_email, Role, BASE_DOMAIN};
pub use principal::{NewProfile, UserProfile};
pub use provider::{AuthEvent, AuthProvider, AuthSession, SignUpRequest};
pub use local::{LocalAuthProvider, SeedAccount};
pub use supabase::SupabaseProvider;
pub use service::{SessionService, SessionState};
pub use notify::{Notice, NoticeLevel, Notices};
