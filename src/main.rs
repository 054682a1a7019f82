use anyhow::{Context, Result};
use clap::Parser;
use interview_orchestrator::{
    create_router, AppState, CompletionClient, Config, DisabledCompletionClient,
    InMemorySessionStore, LogNotifier, NatsNotifier, Notifier, OpenAiCompletionClient,
    WebhookRouter,
};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "interview-orchestrator", about = "Voice interview orchestration service")]
struct Cli {
    /// Config file path (extension optional)
    #[arg(short, long, default_value = "config/interview-orchestrator")]
    config: String,

    /// Override the bind address
    #[arg(long)]
    bind: Option<String>,

    /// Override the HTTP port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)
        .with_context(|| format!("Failed to load config {}", cli.config))?;

    info!("Interview Orchestrator v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {}", cfg.service.name);

    let openai = OpenAiCompletionClient::from_config(&cfg.completion)?;
    let completion: Arc<dyn CompletionClient> = match openai {
        Some(client) => {
            info!(
                "Dynamic questions via {} (model={})",
                cfg.completion.endpoint, cfg.completion.model
            );
            Arc::new(client)
        }
        None => {
            warn!("{} not set, dynamic questions disabled", cfg.completion.api_key_env);
            Arc::new(DisabledCompletionClient)
        }
    };

    let notifier: Arc<dyn Notifier> = match &cfg.notifications.nats_url {
        Some(url) => Arc::new(
            NatsNotifier::connect(url, cfg.notifications.subject_prefix.clone())
                .await
                .context("Failed to set up notifications")?,
        ),
        None => {
            info!("No NATS URL configured, notifications are logged only");
            Arc::new(LogNotifier)
        }
    };

    let store = Arc::new(InMemorySessionStore::new());
    let router = WebhookRouter::from_config(&cfg, store, completion, notifier);
    let app = create_router(AppState::new(Arc::new(router)));

    let bind = cli.bind.unwrap_or(cfg.service.http.bind);
    let port = cli.port.unwrap_or(cfg.service.http.port);
    let addr = format!("{}:{}", bind, port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app).await.context("HTTP server failed")?;

    Ok(())
}
