//! Assignment reconciler.
//!
//! The reconciler owns the board of the active period and the pending week
//! edits. A submit:
//! - takes the component's pending batch and patches the board with it
//! - posts the batch to the service as one request
//! - refetches the period and replaces the board, whether the post
//!   succeeded or not
//!
//! Submits for one component run one after another; submits for different
//! components are independent. Locks are never held across a request.

use std::collections::HashMap;
use std::sync::Arc;

use planner_id::{ComponentId, ContributorId, PeriodId, ProjectId};
use planner_model::{
    AssignContributorRequest, AssignmentBatch, EstimatedWeeksUpdate, NewComponent, WeekIndex,
};
use planner_reconcile::{ComponentPhase, PendingChangeSet, PendingTracker};
use planner_view::{project_board, ProjectView};
use tokio::sync::{watch, Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::board::Board;
use crate::client::ApiClient;
use crate::error::PlannerError;

/// Result of a submit that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The service accepted the batch. The board is refetched when the
    /// service allows it; a failed refetch is only logged.
    Committed(AssignmentBatch),

    /// No contributor was given; nothing was sent and the pending batch is
    /// untouched.
    Skipped,
}

impl SubmitOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}

/// Holds board and pending state for one session.
pub struct Reconciler {
    client: ApiClient,
    board: RwLock<Board>,
    tracker: Mutex<PendingTracker>,

    /// Per-component submit gates.
    gates: Mutex<HashMap<ComponentId, Arc<Mutex<()>>>>,

    /// Bumped on every board or tracker change.
    revision: watch::Sender<u64>,
}

impl Reconciler {
    pub fn new(client: ApiClient) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            client,
            board: RwLock::new(Board::new()),
            tracker: Mutex::new(PendingTracker::new()),
            gates: Mutex::new(HashMap::new()),
            revision,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Receiver notified whenever board or pending state changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    // =========================================================================
    // Board
    // =========================================================================

    /// Snapshot of the current board.
    pub async fn board(&self) -> Board {
        self.board.read().await.clone()
    }

    pub async fn active_period(&self) -> Option<PeriodId> {
        self.board.read().await.period_id()
    }

    /// Fetch a period's projects and make it the active period.
    ///
    /// Switching to a different period drops every pending edit.
    pub async fn load_period(&self, period_id: PeriodId) -> Result<(), PlannerError> {
        let projects = self.client.period_projects(period_id).await?;

        let switched = {
            let mut board = self.board.write().await;
            let switched = board.period_id() != Some(period_id);
            *board = Board::loaded(period_id, projects);
            switched
        };

        if switched {
            self.tracker.lock().await.discard_all();
            self.prune_gates().await;
        }

        info!(%period_id, switched, "Loaded period");
        self.bump();
        Ok(())
    }

    /// Refetch the active period and replace the board.
    pub async fn refresh(&self) -> Result<(), PlannerError> {
        let period_id = self.require_period().await?;
        self.refetch(period_id).await
    }

    async fn refetch(&self, period_id: PeriodId) -> Result<(), PlannerError> {
        let projects = self.client.period_projects(period_id).await?;

        {
            let mut board = self.board.write().await;
            if board.period_id() != Some(period_id) {
                debug!(%period_id, "Active period changed during refetch, dropping result");
                return Ok(());
            }
            board.replace(projects);
        }

        debug!(%period_id, "Board refreshed");
        self.bump();
        Ok(())
    }

    async fn require_period(&self) -> Result<PeriodId, PlannerError> {
        self.active_period()
            .await
            .ok_or_else(|| PlannerError::validation("No period selected"))
    }

    /// Project the board with pending edits overlaid.
    pub async fn project(&self) -> Vec<ProjectView> {
        let board = self.board.read().await;
        let tracker = self.tracker.lock().await;
        project_board(board.projects(), &tracker)
    }

    // =========================================================================
    // Pending edits
    // =========================================================================

    /// Toggle a week cell given its current assigned flag. No I/O.
    pub async fn toggle(
        &self,
        component_id: ComponentId,
        week: WeekIndex,
        currently_assigned: bool,
    ) -> ComponentPhase {
        let phase = {
            let mut tracker = self.tracker.lock().await;
            tracker.toggle(component_id, week, currently_assigned);
            tracker.phase(component_id)
        };

        debug!(%component_id, week, currently_assigned, %phase, "Toggled week");
        self.bump();
        phase
    }

    /// Toggle a week cell, reading its assigned flag from the board.
    pub async fn toggle_cell(
        &self,
        component_id: ComponentId,
        week: WeekIndex,
    ) -> Result<ComponentPhase, PlannerError> {
        let currently_assigned = {
            let board = self.board.read().await;
            let component = board
                .component(component_id)
                .ok_or_else(|| PlannerError::NotFound(format!("component {component_id}")))?;

            component.is_assigned(week).ok_or_else(|| {
                PlannerError::validation(format!(
                    "Week {week} is outside the {}-week horizon of component {component_id}",
                    component.horizon()
                ))
            })?
        };

        Ok(self.toggle(component_id, week, currently_assigned).await)
    }

    pub async fn pending(&self, component_id: ComponentId) -> Option<PendingChangeSet> {
        self.tracker.lock().await.get(component_id).cloned()
    }

    pub async fn phase(&self, component_id: ComponentId) -> ComponentPhase {
        self.tracker.lock().await.phase(component_id)
    }

    /// Components with pending edits.
    pub async fn pending_components(&self) -> Vec<ComponentId> {
        self.tracker.lock().await.component_ids()
    }

    /// Drop a component's pending edits. Returns true if there were any.
    pub async fn discard(&self, component_id: ComponentId) -> bool {
        let discarded = self.tracker.lock().await.discard(component_id);
        if discarded {
            debug!(%component_id, "Discarded pending edits");
            self.bump();
        }
        discarded
    }

    // =========================================================================
    // Submit
    // =========================================================================

    async fn gate(&self, component_id: ComponentId) -> Arc<Mutex<()>> {
        self.gates
            .lock()
            .await
            .entry(component_id)
            .or_default()
            .clone()
    }

    /// Drop gates nobody holds or waits on.
    async fn prune_gates(&self) {
        self.gates
            .lock()
            .await
            .retain(|_, gate| Arc::strong_count(gate) > 1);
    }

    /// Commit a component's pending edits for `contributor_id`.
    ///
    /// Without a contributor this is a no-op. Otherwise the batch is
    /// applied to the board before the request is sent, and the board is
    /// refetched afterwards. On failure the refetch rolls the patch back and
    /// the original error is returned. Once the service has accepted the
    /// batch the submit is committed, even if the refetch fails.
    pub async fn submit(
        &self,
        component_id: ComponentId,
        contributor_id: Option<ContributorId>,
    ) -> Result<SubmitOutcome, PlannerError> {
        let Some(contributor_id) = contributor_id else {
            debug!(%component_id, "No contributor, skipping submit");
            return Ok(SubmitOutcome::Skipped);
        };

        let gate = self.gate(component_id).await;
        let guard = gate.lock().await;
        let result = self.submit_locked(component_id, contributor_id).await;

        drop(guard);
        drop(gate);
        self.prune_gates().await;
        result
    }

    /// Submit body, run while holding the component's gate.
    async fn submit_locked(
        &self,
        component_id: ComponentId,
        contributor_id: ContributorId,
    ) -> Result<SubmitOutcome, PlannerError> {
        // Read after the gate: the period may have switched while queued.
        let period_id = self.require_period().await?;

        // Board before tracker, so nobody sees the phase without the patch.
        let batch = {
            let mut board = self.board.write().await;
            if board.component(component_id).is_none() {
                return Err(PlannerError::NotFound(format!(
                    "component {component_id} in period {period_id}"
                )));
            }
            let changes = self.tracker.lock().await.begin_submit(component_id);
            board.patch_component(component_id, |c| changes.apply_to(c));
            changes.to_batch(component_id, contributor_id)
        };
        self.bump();

        debug!(
            %component_id,
            %contributor_id,
            added = batch.added_weeks.len(),
            removed = batch.removed_weeks.len(),
            "Submitting assignments"
        );

        let result = match self.client.submit_assignments(&batch).await {
            Ok(()) => {
                info!(%component_id, %contributor_id, "Assignments committed");
                if let Err(refresh_err) = self.refetch(period_id).await {
                    warn!(%component_id, error = %refresh_err, "Refetch after commit failed");
                }
                Ok(SubmitOutcome::Committed(batch))
            }
            Err(e) => {
                warn!(%component_id, error = %e, "Submit failed, restoring server state");
                if let Err(refresh_err) = self.refetch(period_id).await {
                    warn!(%component_id, error = %refresh_err, "Refetch after failed submit failed");
                }
                Err(e)
            }
        };

        self.tracker.lock().await.finish_submit(component_id);
        self.bump();
        result
    }

    /// Submit using the contributor currently assigned on the board.
    pub async fn submit_component(
        &self,
        component_id: ComponentId,
    ) -> Result<SubmitOutcome, PlannerError> {
        let contributor_id = self
            .board
            .read()
            .await
            .component(component_id)
            .ok_or_else(|| PlannerError::NotFound(format!("component {component_id}")))?
            .contributor_id;

        self.submit(component_id, contributor_id).await
    }

    // =========================================================================
    // Component and project edits
    // =========================================================================

    /// Assign a contributor, or unassign with `None`.
    pub async fn assign_contributor(
        &self,
        component_id: ComponentId,
        contributor_id: Option<ContributorId>,
    ) -> Result<(), PlannerError> {
        let period_id = self.require_period().await?;
        self.client
            .assign_contributor(component_id, &AssignContributorRequest { contributor_id })
            .await?;
        info!(%component_id, contributor_id = ?contributor_id, "Contributor assigned");
        self.refetch(period_id).await
    }

    pub async fn clear_assignments(&self, component_id: ComponentId) -> Result<(), PlannerError> {
        let period_id = self.require_period().await?;
        self.client.clear_assignments(component_id).await?;
        info!(%component_id, "Assignments cleared");
        self.refetch(period_id).await
    }

    pub async fn delete_component(&self, component_id: ComponentId) -> Result<(), PlannerError> {
        let period_id = self.require_period().await?;
        self.client.delete_component(component_id).await?;
        self.discard(component_id).await;
        self.prune_gates().await;
        info!(%component_id, "Component deleted");
        self.refetch(period_id).await
    }

    pub async fn delete_project(&self, project_id: ProjectId) -> Result<(), PlannerError> {
        let period_id = self.require_period().await?;
        self.client.delete_project(project_id).await?;
        info!(%project_id, "Project deleted");
        self.refetch(period_id).await
    }

    pub async fn update_estimated_weeks(
        &self,
        component_id: ComponentId,
        estimated_weeks: u32,
    ) -> Result<(), PlannerError> {
        let period_id = self.require_period().await?;
        self.client
            .update_estimated_weeks(component_id, &EstimatedWeeksUpdate { estimated_weeks })
            .await?;
        info!(%component_id, estimated_weeks, "Estimate updated");
        self.refetch(period_id).await
    }

    pub async fn add_component(&self, request: &NewComponent) -> Result<(), PlannerError> {
        let period_id = self.require_period().await?;
        self.client.create_component(request).await?;
        info!(project_id = %request.project_id, name = %request.name, "Component added");
        self.refetch(period_id).await
    }
}
