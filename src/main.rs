use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use plantbot::config::{self, Config};
use plantbot::db::StoreError;
use plantbot::engine::rules;
use plantbot::time::Span;
use plantbot::{api, context, AppContext};

#[derive(Parser)]
#[command(name = "plantbot")]
#[command(about = "A virtual plant that needs watering")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the tick scheduler and the command API
    Serve {
        /// Port for the command API (overrides PLANTBOT_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Tick interval, e.g. "1h" or "30m, 30s" (overrides PLANTBOT_TICK_INTERVAL)
        #[arg(short, long, value_parser = config::parse_interval)]
        interval: Option<Span>,
    },
    /// Write a fresh plant record
    Init {
        /// Replace an existing record
        #[arg(long)]
        force: bool,
    },
    /// Print the current plant state
    Status,
    /// Parse a duration expression and print it back
    Duration {
        expression: String,

        /// Print abbreviated units
        #[arg(short, long)]
        short: bool,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "plantbot=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    run(cli.command, |key| std::env::var(key).ok()).await
}

/// Dispatch a command. Configuration is read only by the commands that use it.
async fn run(
    command: Option<Commands>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    match command {
        Some(Commands::Serve { port, interval }) => {
            let mut config = Config::from_lookup(env)?;
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(interval) = interval {
                config.tick_interval = interval;
            }
            serve(config).await?;
        }
        Some(Commands::Init { force }) => init(&Config::from_lookup(env)?, force)?,
        Some(Commands::Status) => status(&Config::from_lookup(env)?)?,
        Some(Commands::Duration { expression, short }) => {
            let span = Span::parse(&expression)?;
            println!("{} ms", span.millis());
            println!("{}", span.format(short));
        }
        None => serve(Config::from_lookup(env)?).await?,
    }

    Ok(())
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let port = config.port;
    let security = config.security.clone();
    if security.is_open() {
        tracing::warn!("No API keys configured; every command is open");
    }

    let ctx = AppContext::start(config)?;
    let scheduler = ctx.start_scheduler();
    let app = api::create_router(ctx.engine.clone(), security);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("plantbot listening on http://127.0.0.1:{}", port);

    let shutdown = ctx.shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => tracing::info!("Shutting down"),
                _ = shutdown.cancelled() => {}
            }
        })
        .await?;

    ctx.stop(scheduler).await;
    Ok(())
}

fn status(config: &Config) -> anyhow::Result<()> {
    let store = context::open_store(config)?;
    let state = store.load()?;
    let since = state.since_fed(chrono::Utc::now().timestamp_millis());
    println!("{}", state.status().label);
    println!("life: {}", state.life);
    println!("water: {}", state.water_level);
    match state.last_fed_at() {
        Some(at) => println!("last fed: {} ({} ago)", at.to_rfc3339(), since),
        None => println!("last fed: never"),
    }
    Ok(())
}

fn init(config: &Config, force: bool) -> anyhow::Result<()> {
    let store = context::open_store(config)?;
    match store.load() {
        Ok(_) if !force => {
            anyhow::bail!(
                "a plant record already exists at {}; pass --force to replace it",
                store.describe()
            );
        }
        Ok(_) | Err(StoreError::Missing { .. }) => {}
        Err(e) if force => tracing::warn!("Replacing unreadable record: {}", e),
        Err(e) => return Err(e.into()),
    }

    let state = rules::fresh(chrono::Utc::now().timestamp_millis());
    store.save(&state)?;
    println!("Planted a new plant at {}", store.describe());
    Ok(())
}
