//! The simulation engine.
//!
//! [`rules`] holds the pure transitions. [`Engine`] is a cheap, cloneable
//! handle to a single worker task that owns the store, the presence sink and
//! the random source. Every request is a full load, mutate, save, publish
//! cycle, and the worker runs them one at a time, so a tick and a watering
//! can never overwrite each other's changes.

pub mod rules;

use std::sync::Arc;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::db::{PlantStore, StoreError};
use crate::models::{PlantSnapshot, PlantState};
use crate::presence::Presence;

pub use rules::{Condition, TickReport, WaterReport};

/// Requests waiting beyond this are back-pressured at the sender.
const QUEUE_DEPTH: usize = 32;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("engine worker has stopped")]
    Closed,
}

type Reply<T> = oneshot::Sender<Result<T, EngineError>>;

enum Request {
    Tick(Reply<TickReport>),
    Water(Reply<WaterReport>),
    Reset(Reply<PlantState>),
    Status(Reply<PlantSnapshot>),
}

#[derive(Clone)]
pub struct Engine {
    tx: mpsc::Sender<Request>,
}

impl Engine {
    /// Start the worker with an entropy-seeded RNG.
    pub fn spawn(
        store: Arc<dyn PlantStore>,
        presence: Arc<dyn Presence>,
    ) -> (Self, JoinHandle<()>) {
        Self::spawn_with_rng(store, presence, StdRng::from_entropy())
    }

    pub fn spawn_with_rng(
        store: Arc<dyn PlantStore>,
        presence: Arc<dyn Presence>,
        rng: StdRng,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(QUEUE_DEPTH);
        let worker = Worker {
            store,
            presence,
            rng,
        };
        let handle = tokio::spawn(worker.run(rx));
        (Self { tx }, handle)
    }

    pub async fn tick(&self) -> Result<TickReport, EngineError> {
        self.call(Request::Tick).await
    }

    pub async fn water(&self) -> Result<WaterReport, EngineError> {
        self.call(Request::Water).await
    }

    pub async fn reset(&self) -> Result<PlantState, EngineError> {
        self.call(Request::Reset).await
    }

    pub async fn status(&self) -> Result<PlantSnapshot, EngineError> {
        self.call(Request::Status).await
    }

    async fn call<T>(&self, request: impl FnOnce(Reply<T>) -> Request) -> Result<T, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(request(reply))
            .await
            .map_err(|_| EngineError::Closed)?;
        rx.await.map_err(|_| EngineError::Closed)?
    }
}

struct Worker {
    store: Arc<dyn PlantStore>,
    presence: Arc<dyn Presence>,
    rng: StdRng,
}

impl Worker {
    async fn run(mut self, mut rx: mpsc::Receiver<Request>) {
        tracing::debug!("Engine worker started on {}", self.store.describe());
        while let Some(request) = rx.recv().await {
            match request {
                Request::Tick(reply) => {
                    let result = self.tick().await;
                    let _ = reply.send(result);
                }
                Request::Water(reply) => {
                    let result = self.water().await;
                    let _ = reply.send(result);
                }
                Request::Reset(reply) => {
                    let result = self.reset().await;
                    let _ = reply.send(result);
                }
                Request::Status(reply) => {
                    let result = self.store.load().map(PlantSnapshot::from).map_err(Into::into);
                    let _ = reply.send(result);
                }
            }
        }
        tracing::debug!("Engine worker stopped");
    }

    async fn tick(&mut self) -> Result<TickReport, EngineError> {
        let mut state = self.store.load()?;
        let report = rules::tick(&mut state, now_ms(), &mut self.rng);
        self.store.save(&state)?;

        tracing::info!(
            condition = ?report.condition,
            water_lost = report.water_lost,
            life_delta = report.life_delta,
            life = state.life,
            water = state.water_level,
            "Tick"
        );
        self.publish(&state).await;
        Ok(report)
    }

    async fn water(&mut self) -> Result<WaterReport, EngineError> {
        let mut state = self.store.load()?;
        let report = rules::water(&mut state, now_ms(), &mut self.rng);
        self.store.save(&state)?;

        tracing::info!(amount = report.amount, water = state.water_level, "Watered");
        self.publish(&state).await;
        Ok(report)
    }

    async fn reset(&mut self) -> Result<PlantState, EngineError> {
        let mut state = self.store.load()?;
        rules::reset(&mut state, now_ms());
        self.store.save(&state)?;

        tracing::info!("Plant reset");
        self.publish(&state).await;
        Ok(state)
    }

    async fn publish(&self, state: &PlantState) {
        if let Err(e) = self.presence.publish(&state.status()).await {
            tracing::warn!("Presence update failed: {}", e);
        }
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
