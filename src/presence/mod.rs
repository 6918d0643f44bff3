//! Presence: where the plant's status line and avatar are shown.
//!
//! Publishing is cosmetic. The engine logs a failed publish and carries on;
//! state that was already saved stays saved.

mod webhook;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::PlantStatus;

pub use webhook::WebhookPresence;

/// Avatar shown while the plant is alive.
pub const DEFAULT_ALIVE_AVATAR: &str =
    "https://cdn.discordapp.com/attachments/882015231126163507/1008977396763996251/unknown.png";
/// Avatar shown once life reaches zero.
pub const DEFAULT_DEAD_AVATAR: &str =
    "https://cdn.discordapp.com/attachments/882015231126163507/1008977534907580476/unknown.png";

#[derive(Debug, Error)]
pub enum PresenceError {
    #[error("presence request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("presence update rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Avatars {
    pub alive: String,
    pub dead: String,
}

impl Avatars {
    pub fn for_status(&self, status: &PlantStatus) -> &str {
        if status.alive {
            &self.alive
        } else {
            &self.dead
        }
    }
}

impl Default for Avatars {
    fn default() -> Self {
        Self {
            alive: DEFAULT_ALIVE_AVATAR.to_string(),
            dead: DEFAULT_DEAD_AVATAR.to_string(),
        }
    }
}

#[async_trait]
pub trait Presence: Send + Sync {
    async fn publish(&self, status: &PlantStatus) -> Result<(), PresenceError>;
}

/// Writes the status to the log. Used when no webhook is configured.
#[derive(Debug, Clone, Default)]
pub struct LogPresence {
    avatars: Avatars,
}

impl LogPresence {
    pub fn new(avatars: Avatars) -> Self {
        Self { avatars }
    }
}

#[async_trait]
impl Presence for LogPresence {
    async fn publish(&self, status: &PlantStatus) -> Result<(), PresenceError> {
        tracing::info!(
            alive = status.alive,
            avatar = self.avatars.for_status(status),
            "Playing {}",
            status.label
        );
        Ok(())
    }
}
