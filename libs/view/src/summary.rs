//! Component rows and project summaries.

use planner_id::{ComponentId, ContributorId, ProjectId, SkillId};
use planner_model::{Component, Contributor, PeriodProjects, Project};
use planner_reconcile::{ComponentPhase, PendingChangeSet, PendingTracker};
use serde::Serialize;

use crate::cells::{project_cells, CellState};
use crate::status::{schedule_percentage, ScheduleBadge, StatusTier};

/// Display data for one component row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentRow {
    pub component_id: ComponentId,
    pub name: String,
    pub contributor_id: Option<ContributorId>,
    pub contributor_name: Option<String>,
    pub estimated_weeks: u32,
    pub assigned_weeks: u32,
    pub cells: Vec<CellState>,
    pub percentage: f64,
    pub tier: StatusTier,
    pub badge: ScheduleBadge,
    pub phase: ComponentPhase,
}

impl ComponentRow {
    pub fn project(
        component: &Component,
        pending: Option<&PendingChangeSet>,
        phase: ComponentPhase,
    ) -> Self {
        let percentage = schedule_percentage(component.assigned_weeks, component.estimated_weeks);
        Self {
            component_id: component.component_id,
            name: component.component_name.clone(),
            contributor_id: component.contributor_id,
            contributor_name: component.contributor_name.clone(),
            estimated_weeks: component.estimated_weeks,
            assigned_weeks: component.assigned_weeks,
            cells: project_cells(component, pending),
            percentage,
            tier: StatusTier::from_percentage(percentage),
            badge: ScheduleBadge::for_weeks(component.assigned_weeks, component.estimated_weeks),
            phase,
        }
    }

    /// A batch can only be submitted once someone is assigned.
    pub fn can_submit(&self) -> bool {
        self.contributor_id.is_some() && self.phase.is_pending()
    }
}

/// Totals for a project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectSummary {
    pub project_id: ProjectId,
    pub name: String,
    pub total_scheduled_weeks: u32,
    pub total_estimated_weeks: u32,
    pub percentage: f64,
    pub tier: StatusTier,
}

impl ProjectSummary {
    pub fn project(project: &Project) -> Self {
        let scheduled = project.total_assigned_weeks();
        let estimated = project.total_estimated_weeks();
        let percentage = if estimated > 0 {
            f64::from(scheduled) / f64::from(estimated) * 100.0
        } else {
            0.0
        };

        Self {
            project_id: project.project_id,
            name: project.project_name.clone(),
            total_scheduled_weeks: scheduled,
            total_estimated_weeks: estimated,
            percentage,
            tier: StatusTier::from_percentage(percentage),
        }
    }
}

/// A project with its summary and component rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectView {
    pub summary: ProjectSummary,
    pub rows: Vec<ComponentRow>,
}

/// Project the whole board with pending edits overlaid.
pub fn project_board(board: &PeriodProjects, tracker: &PendingTracker) -> Vec<ProjectView> {
    board
        .projects
        .iter()
        .map(|project| ProjectView {
            summary: ProjectSummary::project(project),
            rows: project
                .components
                .iter()
                .map(|c| {
                    ComponentRow::project(
                        c,
                        tracker.get(c.component_id),
                        tracker.phase(c.component_id),
                    )
                })
                .collect(),
        })
        .collect()
}

/// Contributors holding `skill_id`, in input order.
pub fn eligible_assignees(contributors: &[Contributor], skill_id: SkillId) -> Vec<&Contributor> {
    contributors.iter().filter(|c| c.has_skill(skill_id)).collect()
}
