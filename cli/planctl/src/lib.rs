//! Client core for the resource planning service.
//!
//! ## Architecture
//!
//! - **Client**: typed HTTP access to every service endpoint
//! - **Board**: projects of the active period
//! - **Reconciler**: holds the active board and pending edits, applies
//!   submits optimistically and reconciles with the service afterwards
//! - **Roster**: per-skill cache of assignable contributors
//! - **Preferences**: UI selections persisted through a key-value store
//! - **Commands**: the `plan` CLI built on the pieces above

pub mod board;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod preferences;
pub mod reconciler;
pub mod roster;
pub mod storage;

pub use board::Board;
pub use client::ApiClient;
pub use config::Config;
pub use error::PlannerError;
pub use reconciler::{Reconciler, SubmitOutcome};
