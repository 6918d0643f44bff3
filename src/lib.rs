//! plantbot: a virtual plant that dries out on a timer and is kept alive by
//! chat commands.

pub mod api;
pub mod config;
pub mod context;
pub mod db;
pub mod engine;
pub mod models;
pub mod presence;
pub mod scheduler;
pub mod time;

pub use context::AppContext;
