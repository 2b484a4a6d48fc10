//! # planner-view
//!
//! Pure projections from board state to display data.
//!
//! Nothing here holds state: every function takes the current entities and
//! the current pending edits and returns a fresh view. Callers re-project
//! whenever either input changes.
//!
//! - [`cells`]: per-week cell state with pending edits overlaid
//! - [`status`]: schedule percentage and its display tier
//! - [`summary`]: component rows and project summaries
//! - [`load`]: per-contributor weekly load chart
//! - [`calendar`]: week header labels

pub mod calendar;
pub mod cells;
pub mod load;
pub mod status;
pub mod summary;

pub use calendar::{week_headers, week_start};
pub use cells::{project_cells, CellState};
pub use load::{contributor_loads, AverageTier, ContributorLoad, LoadTier};
pub use status::{schedule_percentage, ScheduleBadge, StatusTier};
pub use summary::{eligible_assignees, project_board, ComponentRow, ProjectSummary, ProjectView};
