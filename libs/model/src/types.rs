//! Entity types returned by the planning service.

use chrono::NaiveDate;
use planner_id::{ComponentId, ContributorId, PeriodId, ProjectId, SkillId};
use serde::{Deserialize, Serialize};

/// Zero-based position of a week inside a component's planning horizon.
pub type WeekIndex = usize;

// =============================================================================
// Reference Data
// =============================================================================

/// A scheduling horizon containing projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub period_id: PeriodId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

/// A skill a component can require and a contributor can hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub skill_id: SkillId,
    pub name: String,
}

// =============================================================================
// Contributors
// =============================================================================

/// A person assignable to components.
///
/// The by-skill listing omits `skill_ids`; it is empty in that case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub contributor_id: ContributorId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skill_ids: Vec<SkillId>,
}

impl Contributor {
    /// "First Last", as shown in assignee pickers.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn has_skill(&self, skill_id: SkillId) -> bool {
        self.skill_ids.contains(&skill_id)
    }
}

/// Response of `GET /contributors/get_contributors_by_skill/{skill_id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContributorList {
    #[serde(default)]
    pub contributors: Vec<Contributor>,
}

// =============================================================================
// Projects and Components
// =============================================================================

/// A skill-tagged slice of project work with a weekly assignment bitmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub component_id: ComponentId,
    pub component_name: String,
    #[serde(default)]
    pub skill_id: Option<SkillId>,
    #[serde(default)]
    pub contributor_id: Option<ContributorId>,
    #[serde(default)]
    pub contributor_name: Option<String>,
    pub estimated_weeks: u32,
    #[serde(default)]
    pub assigned_weeks: u32,
    #[serde(default)]
    pub assignments: Vec<bool>,
}

impl Component {
    /// Number of weeks in the planning horizon.
    pub fn horizon(&self) -> usize {
        self.assignments.len()
    }

    /// Whether `week` is assigned, or `None` if it lies outside the horizon.
    pub fn is_assigned(&self, week: WeekIndex) -> Option<bool> {
        self.assignments.get(week).copied()
    }

    /// Number of set flags in the assignment bitmap.
    pub fn assigned_count(&self) -> u32 {
        self.assignments.iter().filter(|assigned| **assigned).count() as u32
    }

    /// Returns a copy with `added` weeks set and `removed` weeks cleared.
    ///
    /// Indices outside the horizon are ignored. `assigned_weeks` is
    /// recomputed from the resulting bitmap.
    #[must_use]
    pub fn with_weeks_patched<A, R>(&self, added: A, removed: R) -> Self
    where
        A: IntoIterator<Item = WeekIndex>,
        R: IntoIterator<Item = WeekIndex>,
    {
        let mut assignments = self.assignments.clone();
        for week in added {
            if let Some(flag) = assignments.get_mut(week) {
                *flag = true;
            }
        }
        for week in removed {
            if let Some(flag) = assignments.get_mut(week) {
                *flag = false;
            }
        }

        let mut next = Self {
            assignments,
            ..self.clone()
        };
        next.assigned_weeks = next.assigned_count();
        next
    }

    /// Returns a copy with a new estimate.
    #[must_use]
    pub fn with_estimated_weeks(&self, estimated_weeks: u32) -> Self {
        Self {
            estimated_weeks,
            ..self.clone()
        }
    }

    /// Returns a copy assigned to `contributor`, or unassigned when `None`.
    #[must_use]
    pub fn with_contributor(&self, contributor: Option<&Contributor>) -> Self {
        Self {
            contributor_id: contributor.map(|c| c.contributor_id),
            contributor_name: contributor.map(Contributor::display_name),
            ..self.clone()
        }
    }
}

/// A unit of work within a period, decomposed into components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: ProjectId,
    pub project_name: String,
    #[serde(default)]
    pub components: Vec<Component>,
}

impl Project {
    pub fn component(&self, component_id: ComponentId) -> Option<&Component> {
        self.components
            .iter()
            .find(|c| c.component_id == component_id)
    }

    /// Returns a copy with `update` applied to the matching component.
    #[must_use]
    pub fn with_component<F>(&self, component_id: ComponentId, update: F) -> Self
    where
        F: Fn(&Component) -> Component,
    {
        let components = self
            .components
            .iter()
            .map(|c| {
                if c.component_id == component_id {
                    update(c)
                } else {
                    c.clone()
                }
            })
            .collect();

        Self {
            components,
            ..self.clone()
        }
    }

    pub fn total_assigned_weeks(&self) -> u32 {
        self.components.iter().map(|c| c.assigned_weeks).sum()
    }

    pub fn total_estimated_weeks(&self) -> u32 {
        self.components.iter().map(|c| c.estimated_weeks).sum()
    }
}

/// Response of `GET /period/{id}/projects`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodProjects {
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl PeriodProjects {
    /// Finds a component and the project that owns it.
    pub fn find_component(&self, component_id: ComponentId) -> Option<(&Project, &Component)> {
        self.projects.iter().find_map(|project| {
            project
                .component(component_id)
                .map(|component| (project, component))
        })
    }

    pub fn project(&self, project_id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.project_id == project_id)
    }

    pub fn project_ids(&self) -> Vec<ProjectId> {
        self.projects.iter().map(|p| p.project_id).collect()
    }

    /// Returns a copy with `update` applied to the matching component,
    /// wherever it lives.
    #[must_use]
    pub fn with_component<F>(&self, component_id: ComponentId, update: F) -> Self
    where
        F: Fn(&Component) -> Component,
    {
        let projects = self
            .projects
            .iter()
            .map(|p| {
                if p.component(component_id).is_some() {
                    p.with_component(component_id, &update)
                } else {
                    p.clone()
                }
            })
            .collect();

        Self { projects }
    }
}
