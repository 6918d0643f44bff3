use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::db::{self, PlantStore};
use crate::engine::Engine;
use crate::presence::{LogPresence, Presence, WebhookPresence};
use crate::scheduler;

/// Everything a running bot shares: configuration, the engine handle and the
/// shutdown signal. Built once in `main` and handed to whatever needs it.
pub struct AppContext {
    pub config: Config,
    pub engine: Engine,
    pub shutdown: CancellationToken,
    worker: JoinHandle<()>,
}

impl AppContext {
    /// Open the configured store and start the engine worker.
    pub fn start(config: Config) -> anyhow::Result<Self> {
        let store = open_store(&config)?;
        let presence = presence_for(&config);
        Ok(Self::with_parts(config, store, presence))
    }

    pub fn with_parts(
        config: Config,
        store: Arc<dyn PlantStore>,
        presence: Arc<dyn Presence>,
    ) -> Self {
        let (engine, worker) = Engine::spawn(store, presence);
        Self {
            config,
            engine,
            shutdown: CancellationToken::new(),
            worker,
        }
    }

    /// Start the periodic tick on this context's engine.
    pub fn start_scheduler(&self) -> JoinHandle<()> {
        scheduler::spawn(
            self.engine.clone(),
            self.config.tick_interval,
            self.shutdown.child_token(),
        )
    }

    /// Cancel the schedule and wait for in-flight engine work to finish.
    pub async fn stop(self, scheduler: JoinHandle<()>) {
        self.shutdown.cancel();
        if let Err(e) = scheduler.await {
            tracing::warn!("Scheduler task ended abnormally: {}", e);
        }
        drop(self.engine);
        if let Err(e) = self.worker.await {
            tracing::warn!("Engine worker ended abnormally: {}", e);
        }
    }
}

pub fn open_store(config: &Config) -> anyhow::Result<Arc<dyn PlantStore>> {
    let path = config.resolved_data_path()?;
    tracing::debug!("Using {} store at {}", config.store.as_str(), path.display());
    Ok(db::open(config.store, &path)?)
}

fn presence_for(config: &Config) -> Arc<dyn Presence> {
    match &config.presence_url {
        Some(url) => Arc::new(
            WebhookPresence::new(url.clone(), config.avatars.clone())
                .with_token(config.token.clone())
                .with_identity(config.client_id.clone(), config.guild_id.clone()),
        ),
        None => Arc::new(LogPresence::new(config.avatars.clone())),
    }
}
