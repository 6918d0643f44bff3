//! Domain models for plantbot.
//!
//! - [`PlantState`]: the single persisted record (`life`, `waterLevel`, `lastFed`).
//! - [`PlantStatus`]: the derived alive flag and status line handed to presence.
//! - [`PlantSnapshot`]: both of the above, for read-only responses.
//!
//! "Dead" is a view over `life`, not a stored mode; a dead plant still ticks
//! and can be revived by a reset.

mod plant;

pub use plant::*;
