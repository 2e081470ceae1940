//! MoodyMe admin HTTP server.
//!
//! Serves the admin API (and optionally the static admin UI) against either
//! the hosted Firebase project or an in-memory backend for local work.

use std::sync::Arc;

use clap::{Parser, ValueEnum};
use moodyme_api::AppState;
use moodyme_api::config::ApiConfig;
use moodyme_core::content::seed::seed_content;
use moodyme_core::documents::DocumentStore;
use moodyme_core::documents::firestore::FirestoreDocumentStore;
use moodyme_core::documents::memory::MemoryDocumentStore;
use moodyme_core::firebase::FirebaseConfig;
use moodyme_core::identity::IdentityProvider;
use moodyme_core::identity::admin::ensure_admin;
use moodyme_core::identity::firebase::FirebaseIdentityProvider;
use moodyme_core::identity::memory::MemoryIdentityProvider;
use moodyme_core::models::user::NewUser;
use tracing::{info, warn};

type Backends = (Arc<dyn IdentityProvider>, Arc<dyn DocumentStore>);

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// Hosted Firebase Auth + Firestore.
    Firebase,
    /// Process-local stores, lost on exit.
    Memory,
}

/// CLI arguments for the admin server.
#[derive(Parser, Debug)]
#[command(name = "moodyme_admin_server", about = "MoodyMe admin server", version)]
struct Args {
    /// Port to listen on. Overrides the port in `BIND_ADDR`.
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Interface to bind when `--port` is given.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Account and document backend.
    #[arg(long, env = "MOODYME_BACKEND", value_enum, default_value_t = Backend::Firebase)]
    backend: Backend,

    /// Admin account created at start-up (memory backend only).
    #[arg(long, env = "BOOTSTRAP_ADMIN_EMAIL")]
    bootstrap_admin_email: Option<String>,

    /// Password for the bootstrap admin.
    #[arg(long, env = "BOOTSTRAP_ADMIN_PASSWORD", hide_env_values = true)]
    bootstrap_admin_password: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info,moodyme_api=debug,moodyme_core=debug")
            }),
        )
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::from_env();
    if let Some(port) = args.port {
        config.bind_addr = format!("{}:{port}", args.host);
    }
    info!(backend = ?args.backend, bind_addr = %config.bind_addr, "starting moodyme_admin_server");

    let (identity, documents) = match args.backend {
        Backend::Firebase => firebase_backends()?,
        Backend::Memory => memory_backends(&args).await?,
    };

    let state = AppState::new(config.clone(), identity, documents);
    let app = moodyme_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "admin API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

fn firebase_backends() -> Result<Backends, Box<dyn std::error::Error>> {
    let firebase = FirebaseConfig::from_env()?;
    info!(project_id = %firebase.project_id, "using Firebase backend");
    if firebase.api_key.is_none() {
        warn!("FIREBASE_API_KEY is not set; password login is unavailable");
    }

    let client = reqwest::Client::new();
    let documents = FirestoreDocumentStore::new(client.clone(), &firebase)?;
    let identity = FirebaseIdentityProvider::new(client, firebase)?;
    Ok((Arc::new(identity), Arc::new(documents)))
}

async fn memory_backends(args: &Args) -> Result<Backends, Box<dyn std::error::Error>> {
    warn!("using in-memory backend; all data is lost on exit");
    let identity = MemoryIdentityProvider::new();
    let documents = MemoryDocumentStore::new();

    let report = seed_content(&documents).await?;
    info!(created = report.created.len(), "content seeded");

    match (&args.bootstrap_admin_email, &args.bootstrap_admin_password) {
        (Some(email), Some(password)) => {
            let admin = ensure_admin(
                &identity,
                NewUser {
                    email: email.clone(),
                    first_name: "Admin".into(),
                    last_name: "User".into(),
                    password: password.clone(),
                    role: None,
                },
            )
            .await?;
            info!(uid = %admin.id, email = %admin.email, "bootstrap admin ready");
        }
        (Some(_), None) | (None, Some(_)) => {
            warn!("bootstrap admin needs both an email and a password; skipping");
        }
        (None, None) => warn!("no bootstrap admin configured; nobody can log in"),
    }

    Ok((Arc::new(identity), Arc::new(documents)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
