//! Local view state of the active period.

use planner_id::{ComponentId, PeriodId, ProjectId};
use planner_model::{Component, PeriodProjects, Project};
use serde::Serialize;

/// The active period and its projects.
///
/// Replaced wholesale on every refetch; patched in place only by the
/// optimistic half of a submit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Board {
    period_id: Option<PeriodId>,
    projects: PeriodProjects,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Board for `period_id` holding `projects`.
    pub fn loaded(period_id: PeriodId, projects: PeriodProjects) -> Self {
        Self {
            period_id: Some(period_id),
            projects,
        }
    }

    pub fn period_id(&self) -> Option<PeriodId> {
        self.period_id
    }

    pub fn projects(&self) -> &PeriodProjects {
        &self.projects
    }

    pub fn is_loaded(&self) -> bool {
        self.period_id.is_some()
    }

    pub fn component(&self, component_id: ComponentId) -> Option<&Component> {
        self.projects
            .find_component(component_id)
            .map(|(_, component)| component)
    }

    pub fn project(&self, project_id: ProjectId) -> Option<&Project> {
        self.projects.project(project_id)
    }

    /// Project owning a component.
    pub fn owner_of(&self, component_id: ComponentId) -> Option<&Project> {
        self.projects
            .find_component(component_id)
            .map(|(project, _)| project)
    }

    /// Replace the projects of the active period.
    pub fn replace(&mut self, projects: PeriodProjects) {
        self.projects = projects;
    }

    /// Apply an immutable update to one component. Returns false if the
    /// component is not on the board.
    pub fn patch_component<F>(&mut self, component_id: ComponentId, update: F) -> bool
    where
        F: Fn(&Component) -> Component,
    {
        if self.component(component_id).is_none() {
            return false;
        }
        self.projects = self.projects.with_component(component_id, update);
        true
    }
}
