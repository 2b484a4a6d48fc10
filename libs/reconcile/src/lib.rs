//! Pending assignment edits.
//!
//! This library tracks week cells a user has toggled but not yet committed,
//! and the submit phase of every component. Key concepts:
//!
//! - **Pending change set**: weeks to mark assigned (`added`) and weeks to
//!   unmark (`removed`) for one component.
//! - **Tracker**: sparse map from component to its pending change set.
//! - **Phase**: whether a component is clean, has pending edits, or has a
//!   batch in flight.
//!
//! # Invariants
//!
//! - A week never appears in both `added` and `removed`
//! - The tracker never holds an empty change set
//! - Toggling never performs I/O

use std::collections::{BTreeMap, BTreeSet};

use planner_id::{ComponentId, ContributorId};
use planner_model::{AssignmentBatch, Component, WeekIndex};
use serde::Serialize;

/// Weeks toggled for one component since its last submit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PendingChangeSet {
    added: BTreeSet<WeekIndex>,
    removed: BTreeSet<WeekIndex>,
}

impl PendingChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one week.
    ///
    /// An assigned week is a removal candidate; an unassigned week is an
    /// addition candidate. A week toggled twice cancels out.
    pub fn toggle(&mut self, week: WeekIndex, currently_assigned: bool) {
        let (target, other) = if currently_assigned {
            (&mut self.removed, &mut self.added)
        } else {
            (&mut self.added, &mut self.removed)
        };

        other.remove(&week);
        if !target.remove(&week) {
            target.insert(week);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    pub fn is_added(&self, week: WeekIndex) -> bool {
        self.added.contains(&week)
    }

    pub fn is_removed(&self, week: WeekIndex) -> bool {
        self.removed.contains(&week)
    }

    /// Weeks to mark assigned, ascending.
    pub fn added(&self) -> Vec<WeekIndex> {
        self.added.iter().copied().collect()
    }

    /// Weeks to unmark, ascending.
    pub fn removed(&self) -> Vec<WeekIndex> {
        self.removed.iter().copied().collect()
    }

    /// Number of weeks with a pending edit.
    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len()
    }

    /// The component as it would look once this batch is committed.
    #[must_use]
    pub fn apply_to(&self, component: &Component) -> Component {
        component.with_weeks_patched(self.added.iter().copied(), self.removed.iter().copied())
    }

    /// The wire body committing this batch.
    pub fn to_batch(
        &self,
        component_id: ComponentId,
        contributor_id: ContributorId,
    ) -> AssignmentBatch {
        AssignmentBatch {
            component_id,
            contributor_id,
            added_weeks: self.added(),
            removed_weeks: self.removed(),
        }
    }
}

/// Submit phase of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentPhase {
    /// No pending edits and nothing in flight.
    Clean,

    /// Edits toggled locally, not yet submitted.
    Pending,

    /// A batch has been sent and its outcome is not known yet.
    Submitting,
}

impl ComponentPhase {
    /// Returns true if a batch is in flight.
    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }

    /// Returns true if the component has edits waiting to be submitted.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for ComponentPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Clean => "clean",
            Self::Pending => "pending",
            Self::Submitting => "submitting",
        };
        write!(f, "{s}")
    }
}

/// Pending edits and in-flight batches for every component.
#[derive(Debug, Clone, Default)]
pub struct PendingTracker {
    /// Only non-empty change sets are stored.
    pending: BTreeMap<ComponentId, PendingChangeSet>,

    /// Components whose batch has been taken for submission.
    in_flight: BTreeSet<ComponentId>,
}

impl PendingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle one week cell of a component.
    pub fn toggle(&mut self, component_id: ComponentId, week: WeekIndex, currently_assigned: bool) {
        let changes = self.pending.entry(component_id).or_default();
        changes.toggle(week, currently_assigned);

        if changes.is_empty() {
            self.pending.remove(&component_id);
        }
    }

    /// Pending edits for a component, if any.
    pub fn get(&self, component_id: ComponentId) -> Option<&PendingChangeSet> {
        self.pending.get(&component_id)
    }

    /// Remove and return a component's edits (empty if it had none).
    pub fn take(&mut self, component_id: ComponentId) -> PendingChangeSet {
        self.pending.remove(&component_id).unwrap_or_default()
    }

    /// Drop a component's edits. Returns true if there were any.
    pub fn discard(&mut self, component_id: ComponentId) -> bool {
        self.pending.remove(&component_id).is_some()
    }

    /// Drop every pending edit, e.g. when switching periods.
    pub fn discard_all(&mut self) {
        self.pending.clear();
    }

    /// Take a component's edits for submission and mark it in flight.
    ///
    /// Toggles made after this call start a fresh batch.
    pub fn begin_submit(&mut self, component_id: ComponentId) -> PendingChangeSet {
        self.in_flight.insert(component_id);
        self.take(component_id)
    }

    /// Mark a component's batch as settled, whatever the outcome.
    pub fn finish_submit(&mut self, component_id: ComponentId) {
        self.in_flight.remove(&component_id);
    }

    pub fn phase(&self, component_id: ComponentId) -> ComponentPhase {
        if self.in_flight.contains(&component_id) {
            ComponentPhase::Submitting
        } else if self.pending.contains_key(&component_id) {
            ComponentPhase::Pending
        } else {
            ComponentPhase::Clean
        }
    }

    /// Components with pending edits, ascending.
    pub fn component_ids(&self) -> Vec<ComponentId> {
        self.pending.keys().copied().collect()
    }

    /// Number of components with pending edits.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
