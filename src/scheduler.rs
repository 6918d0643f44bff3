//! Periodic ticking.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::engine::Engine;
use crate::time::Span;

/// Tick once right away, then once every `every`, until `shutdown` fires.
///
/// A failed tick is logged and the schedule continues. `every` must be
/// non-zero.
pub fn spawn(engine: Engine, every: Span, shutdown: CancellationToken) -> JoinHandle<()> {
    let period = Duration::from(every);
    tokio::spawn(async move {
        let mut cadence = tokio::time::interval(period);
        cadence.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!("Ticking every {}", every);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = cadence.tick() => {
                    if let Err(e) = engine.tick().await {
                        tracing::error!("Tick failed: {}", e);
                    }
                }
            }
        }

        tracing::info!("Scheduler stopped");
    })
}
