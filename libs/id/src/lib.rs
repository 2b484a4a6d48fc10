//! # planner-id
//!
//! Typed identifiers for the resources exposed by the planning service.
//!
//! ## Design Principles
//!
//! - IDs are assigned by the service; names are user-controlled labels
//! - IDs are typed so a component id can never be passed where a project id
//!   is expected
//! - The wire form is a non-negative integer; numeric strings are accepted
//!   on input because some clients send ids as strings
//!
//! ## Examples
//!
//! ```
//! use planner_id::ComponentId;
//!
//! let id: ComponentId = "42".parse().unwrap();
//! assert_eq!(id.value(), 42);
//! assert_eq!(id.to_string(), "42");
//! ```

mod error;
mod macros;
mod types;

pub use error::IdError;
pub use types::*;
