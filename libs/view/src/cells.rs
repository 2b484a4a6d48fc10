//! Per-week cell state.

use planner_model::Component;
use planner_reconcile::PendingChangeSet;
use serde::Serialize;

/// What a single week cell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellState {
    /// Unassigned week toggled on, not yet submitted.
    Added,
    /// Assigned week toggled off, not yet submitted.
    Removed,
    Assigned,
    Unassigned,
}

impl CellState {
    /// Whether the cell will be assigned once pending edits are committed.
    pub fn is_effectively_assigned(&self) -> bool {
        matches!(self, Self::Added | Self::Assigned)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Added | Self::Removed)
    }
}

/// Cell states for every week of a component.
///
/// Precedence: pending add, then pending remove, then the committed flag.
pub fn project_cells(component: &Component, pending: Option<&PendingChangeSet>) -> Vec<CellState> {
    component
        .assignments
        .iter()
        .enumerate()
        .map(|(week, assigned)| match pending {
            Some(changes) if changes.is_added(week) => CellState::Added,
            Some(changes) if changes.is_removed(week) => CellState::Removed,
            _ if *assigned => CellState::Assigned,
            _ => CellState::Unassigned,
        })
        .collect()
}
