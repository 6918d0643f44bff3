use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::Span;

pub const MAX_LIFE: i64 = 100;

/// The persisted plant record.
///
/// Field names match the `data.json` layout, so an existing record file can
/// be picked up unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantState {
    /// Health in `0..=100`. Zero displays as dead.
    pub life: i64,
    /// Epoch milliseconds of the last watering or reset.
    #[serde(alias = "lastFedTimestamp")]
    pub last_fed: i64,
    /// Hydration; never negative.
    pub water_level: i64,
}

impl PlantState {
    pub fn new(life: i64, water_level: i64, last_fed: i64) -> Self {
        Self {
            life,
            last_fed,
            water_level,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Time elapsed from the last feeding to `now_ms`. A feeding stamped in
    /// the future counts as zero.
    pub fn since_fed(&self, now_ms: i64) -> Span {
        let elapsed = now_ms.saturating_sub(self.last_fed).max(0);
        Span::from_millis(elapsed as u64)
    }

    pub fn last_fed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.last_fed)
    }

    pub fn status(&self) -> PlantStatus {
        PlantStatus::of(self)
    }
}

/// Presence inputs derived from a [`PlantState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantStatus {
    pub alive: bool,
    pub label: String,
}

impl PlantStatus {
    pub const DEAD_LABEL: &'static str = "dead";

    pub fn of(state: &PlantState) -> Self {
        if state.is_alive() {
            Self {
                alive: true,
                label: format!(
                    "plant games | {}% life | {}% water",
                    state.life, state.water_level
                ),
            }
        } else {
            Self {
                alive: false,
                label: Self::DEAD_LABEL.to_string(),
            }
        }
    }
}

/// A state together with its derived status, used for read-only responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantSnapshot {
    pub state: PlantState,
    pub status: PlantStatus,
}

impl From<PlantState> for PlantSnapshot {
    fn from(state: PlantState) -> Self {
        Self {
            status: state.status(),
            state,
        }
    }
}
