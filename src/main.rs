use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use paydesk::config::Config;
use paydesk::crypto::SessionKey;
use paydesk::session::{SessionStore, SqliteSessionStore};
use paydesk::state::AppState;

const PURGE_INTERVAL: Duration = Duration::from_secs(3600);

#[derive(Parser)]
#[command(name = "paydesk", version, about = "Staff dashboard for the payment service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the web dashboard (default)
    Serve {
        /// Override HOST
        #[arg(long)]
        host: Option<String>,
        /// Override PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Delete expired sessions from the session database and exit
    PurgeSessions,
    /// Check that the payment and identity services are reachable
    Check,
}

fn open_store(config: &Config) -> anyhow::Result<SqliteSessionStore> {
    let key = SessionKey::derive(&config.session_secret)?;
    SqliteSessionStore::open(&config.session_database_path, key)
        .with_context(|| {
            format!(
                "Failed to open session database {}",
                config.session_database_path
            )
        })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paydesk=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;

    match cli.command.unwrap_or(Command::Serve { host: None, port: None }) {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            serve(config).await
        }
        Command::PurgeSessions => {
            let store = open_store(&config)?;
            let purged = store.purge_expired(Utc::now().timestamp())?;
            tracing::info!(purged, "Purged expired sessions");
            Ok(())
        }
        Command::Check => check(&config).await,
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    if config.dev_mode {
        tracing::warn!("Running in dev mode: session cookies are not marked Secure");
    }

    let store: Arc<dyn SessionStore> = Arc::new(open_store(&config)?);
    let state = AppState::new(&config, store.clone())?;

    // Hourly sweep of expired sessions
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PURGE_INTERVAL);
        loop {
            interval.tick().await;
            match store.purge_expired(Utc::now().timestamp()) {
                Ok(0) => {}
                Ok(purged) => tracing::info!(purged, "Purged expired sessions"),
                Err(e) => tracing::error!(error = %e, "Session purge failed"),
            }
        }
    });

    let app = paydesk::app(state);
    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(
        addr = %addr,
        payment_service = %config.payment_service_url,
        auth_service = %config.auth_service_url,
        "Dashboard listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}

async fn check(config: &Config) -> anyhow::Result<()> {
    let state = AppState::new(config, Arc::new(paydesk::session::MemorySessionStore::new()))?;
    let (payments, identity) = tokio::join!(state.payments.health(), state.identity.health());

    let mut healthy = true;
    for (name, url, result) in [
        ("payment service", &config.payment_service_url, payments),
        ("identity service", &config.auth_service_url, identity),
    ] {
        match result {
            Ok(()) => println!("ok    {} ({})", name, url),
            Err(e) => {
                healthy = false;
                println!("FAIL  {} ({}): {}", name, url, e);
            }
        }
    }

    if !healthy {
        anyhow::bail!("One or more upstream services are unreachable");
    }
    Ok(())
}
