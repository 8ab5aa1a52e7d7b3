use std::sync::Arc;

use anyhow::{Context, Result};
use contact_server::{app, AppState, MailConfig, Mailer, ServerConfig, SmtpMailer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env()?;
    info!("Public dir: {}", config.public_dir.display());

    let mailer: Option<Arc<dyn Mailer>> = match MailConfig::from_env()? {
        Some(mail) => {
            info!("Mail: {}:{} -> {}", mail.host, mail.port, mail.to);
            Some(Arc::new(SmtpMailer::new(&mail).context("Invalid mail settings")?))
        }
        None => {
            warn!("Mail settings incomplete, /api/contact will report the mail server as not configured");
            None
        }
    };

    let state = AppState::new(mailer, config.public_dir.clone());

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app(state)).await.context("Server error")?;
    Ok(())
}
