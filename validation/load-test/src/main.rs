//! Load test hook CLI for the websocket game server.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use ws_load_test::{
    Context, Events, HookConfig, HookName, HookRunner, IdGenerator, Params, SessionHooks,
    SessionRegistrar, UrlQueue,
};

#[derive(Parser)]
#[command(name = "ws-load-test")]
#[command(about = "Session registration hooks for load-testing the websocket server", long_about = None)]
struct Cli {
    /// Registration HTTP base url
    #[arg(long, env = "WS_HTTP_HOST", global = true)]
    http_host: Option<String>,

    /// Websocket base url prepended to registered paths
    #[arg(long, env = "WS_HOST", global = true)]
    ws_host: Option<String>,

    /// Load settings from a YAML file instead of the environment
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the HTTP request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Seed for reproducible ids
    #[arg(long, env = "WS_ID_SEED", global = true)]
    seed: Option<u64>,

    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register one session and print its websocket target
    Register,

    /// Check the registration host's health endpoint
    Health,

    /// Run every hook once through the runner
    Smoke {
        /// Keep the session registered afterwards
        #[arg(long)]
        keep: bool,
    },

    /// List exported hook names
    Hooks,
}

impl Cli {
    fn hook_config(&self) -> Result<HookConfig> {
        let mut config = match &self.config {
            Some(path) => HookConfig::from_file(path)?,
            None => {
                let http_host = self
                    .http_host
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("--http-host or WS_HTTP_HOST is required"))?;
                let ws_host = self
                    .ws_host
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("--ws-host or WS_HOST is required"))?;
                HookConfig::from_lookup(|key| match key {
                    ws_load_test::config::ENV_HTTP_HOST => Some(http_host.clone()),
                    ws_load_test::config::ENV_WS_HOST => Some(ws_host.clone()),
                    other => std::env::var(other).ok(),
                })?
            }
        };

        // Apply overrides
        if let Some(t) = self.timeout {
            config.request_timeout_secs = t;
        }
        if let Some(s) = self.seed {
            config.seed = Some(s);
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match &cli.command {
        Commands::Hooks => {
            for name in HookName::ALL {
                println!("{}", name);
            }
            Ok(())
        }
        Commands::Health => {
            let config = cli.hook_config()?;
            let registrar = SessionRegistrar::new(config)?;
            registrar.health().await?;
            println!("✓ {} is healthy", registrar.config().http_host);
            Ok(())
        }
        Commands::Register => {
            let config = cli.hook_config()?;
            let ids = IdGenerator::new(config.seed, config.id_range);
            let registrar = SessionRegistrar::new(config)?;

            let request = ids.next_request();
            info!(game_id = request.game_id, user_id = request.user_id, "Registering session");

            let target = registrar.register_target(request).await?;
            println!("{}", target);
            Ok(())
        }
        Commands::Smoke { keep } => {
            let config = cli.hook_config()?;
            let hooks = SessionHooks::from_config(config, UrlQueue::new())?;
            let runner = HookRunner::new(Arc::new(hooks));

            let (events, mut rx) = Events::channel();
            let mut params = Params::new();
            let mut context = Context::new();

            runner
                .run_sequence(
                    &[HookName::Connect, HookName::FillParameters],
                    &mut params,
                    &mut context,
                    &events,
                )
                .await?;

            // Hand the registered target through the queue like two scenario steps would
            if let Some(target) = params.target.clone() {
                context.set_web_socket_url(target);
            }
            runner
                .run_sequence(
                    &[HookName::SetWebSocketUrl, HookName::GetWebSocketUrl],
                    &mut params,
                    &mut context,
                    &events,
                )
                .await?;

            if !*keep {
                runner
                    .run(HookName::Disconnect, &mut params, &mut context, &events)
                    .await?;
            }

            drop(events);
            while let Some(event) = rx.recv().await {
                info!(?event, "Hook event");
            }

            println!("✓ Smoke run complete");
            println!("  Target: {}", params.target.as_deref().unwrap_or("-"));
            println!("  Params: {}", serde_json::to_string(&params.json)?);
            println!("  Vars:   {}", serde_json::to_string(&context.vars)?);
            Ok(())
        }
    }
}
