use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Init logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    fmt().with_env_filter(filter).init();

    // Startup banner at info level so something always prints at default verbosity
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "<unset>".to_string());
    let http_port = std::env::var("EDUNEX_HTTP_PORT").unwrap_or_else(|_| "8080".to_string());
    let supabase_url = std::env::var("EDUNEX_SUPABASE_URL").unwrap_or_else(|_| "<unset>".to_string());
    let auth_timeout = std::env::var("EDUNEX_AUTH_TIMEOUT_SECS").unwrap_or_else(|_| "10".to_string());
    info!(
        target: "edunex",
        "EduNex starting: RUST_LOG='{}', http_port={}, supabase_url='{}', auth_timeout_secs={}",
        rust_log, http_port, supabase_url, auth_timeout
    );

    edunex::server::run().await
}
