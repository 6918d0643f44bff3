//! Pure state transitions. Nothing here touches storage or the clock; the
//! caller passes the current time and a random source.

use std::ops::RangeInclusive;

use rand::Rng;
use serde::Serialize;

use crate::models::{PlantState, MAX_LIFE};

/// Water lost every tick.
pub const EVAPORATION: RangeInclusive<i64> = 5..=10;
/// Water added by one watering.
pub const WATERING: RangeInclusive<i64> = 10..=30;
pub const THIRST_PENALTY: RangeInclusive<i64> = 1..=3;
pub const NEGLECT_PENALTY: RangeInclusive<i64> = 5..=7;
pub const OVERWATER_PENALTY: RangeInclusive<i64> = 1..=3;

/// Bounds of the band where the plant recovers, both exclusive.
pub const THRIVING_ABOVE: i64 = 75;
pub const THRIVING_BELOW: i64 = 100;
pub const OVERWATERED_ABOVE: i64 = 100;
pub const DROWNING_ABOVE: i64 = 150;

pub const RESET_LIFE: i64 = MAX_LIFE;
pub const RESET_WATER: i64 = 50;

/// Going unfed for longer than this many days costs extra life when dry.
pub const NEGLECT_DAYS: f64 = 1.0;

/// Which life adjustment a tick applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "condition", rename_all = "snake_case")]
pub enum Condition {
    /// Water ran out. `neglected` is set when the last feeding is more than
    /// a day old and the extra penalty was applied.
    Underwatered { neglected: bool },
    Thriving,
    Overwatered,
    /// Far above the overwatered line; life drops by a tenth of the water level.
    Drowning,
    /// No rule matched.
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickReport {
    #[serde(flatten)]
    pub condition: Condition,
    pub water_lost: i64,
    pub life_delta: i64,
    pub state: PlantState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterReport {
    pub amount: i64,
    pub state: PlantState,
}

/// One simulation step.
///
/// Arithmetic saturates on extreme stored values.
///
/// Exactly one of the condition branches runs. The drowning check comes
/// before the overwatered check so that it can match at all.
pub fn tick(state: &mut PlantState, now_ms: i64, rng: &mut impl Rng) -> TickReport {
    let life_before = state.life;
    let water_lost = rng.gen_range(EVAPORATION);
    state.water_level = state.water_level.saturating_sub(water_lost);

    let condition = if state.water_level < 0 {
        state.water_level = 0;
        state.life = state.life.saturating_sub(rng.gen_range(THIRST_PENALTY));

        let neglected = is_neglected(state, now_ms);
        if neglected {
            state.life = state.life.saturating_sub(rng.gen_range(NEGLECT_PENALTY));
        }
        Condition::Underwatered { neglected }
    } else if state.water_level > THRIVING_ABOVE && state.water_level < THRIVING_BELOW {
        state.life = state.life.saturating_add(1).min(MAX_LIFE);
        Condition::Thriving
    } else if state.water_level > DROWNING_ABOVE {
        state.life = state.life.saturating_sub(state.water_level / 10);
        Condition::Drowning
    } else if state.water_level > OVERWATERED_ABOVE {
        state.life = state.life.saturating_sub(rng.gen_range(OVERWATER_PENALTY));
        Condition::Overwatered
    } else {
        Condition::Stable
    };

    state.life = state.life.clamp(0, MAX_LIFE);

    TickReport {
        condition,
        water_lost,
        life_delta: state.life.saturating_sub(life_before),
        state: *state,
    }
}

pub fn water(state: &mut PlantState, now_ms: i64, rng: &mut impl Rng) -> WaterReport {
    let amount = rng.gen_range(WATERING);
    state.water_level = state.water_level.max(0).saturating_add(amount);
    state.last_fed = now_ms;
    WaterReport {
        amount,
        state: *state,
    }
}

pub fn reset(state: &mut PlantState, now_ms: i64) {
    state.life = RESET_LIFE;
    state.water_level = RESET_WATER;
    state.last_fed = now_ms;
}

/// The record `reset` produces, for seeding an empty store.
pub fn fresh(now_ms: i64) -> PlantState {
    PlantState::new(RESET_LIFE, RESET_WATER, now_ms)
}

fn is_neglected(state: &PlantState, now_ms: i64) -> bool {
    state.since_fed(now_ms).days() > NEGLECT_DAYS
}
