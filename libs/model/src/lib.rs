//! # planner-model
//!
//! Entity and request types for the planning service.
//!
//! ## Design Principles
//!
//! - Field names match the service's JSON so types deserialize directly
//! - Entities are values; changes go through `with_*` functions that return
//!   an updated copy instead of mutating shared state
//! - Request bodies validate themselves before they are sent
//!
//! ## Entities
//!
//! - Periods and skills (reference data)
//! - Projects, each holding skill-tagged components with a weekly
//!   assignment bitmap
//! - Contributors, assignable to components requiring one of their skills

mod error;
mod requests;
mod types;

pub use error::ModelError;
pub use requests::*;
pub use types::*;
