//! Request bodies sent to the planning service.
//!
//! Create requests carry a `validate()` that reports the first client-side
//! problem before any network call is made.

use chrono::NaiveDate;
use planner_id::{ComponentId, ContributorId, PeriodId, ProjectId, SkillId};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::types::WeekIndex;

/// Body of `POST /assignment`: one batch of week edits for a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentBatch {
    pub component_id: ComponentId,
    pub contributor_id: ContributorId,
    pub added_weeks: Vec<WeekIndex>,
    pub removed_weeks: Vec<WeekIndex>,
}

impl AssignmentBatch {
    pub fn is_empty(&self) -> bool {
        self.added_weeks.is_empty() && self.removed_weeks.is_empty()
    }
}

/// Body of `POST /component/{id}/assign_contributor`.
///
/// `None` serializes as `null`, which unassigns the component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignContributorRequest {
    pub contributor_id: Option<ContributorId>,
}

/// Body of `PUT /component/{id}/estimated_weeks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatedWeeksUpdate {
    pub estimated_weeks: u32,
}

impl EstimatedWeeksUpdate {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_weeks(self.estimated_weeks)
    }
}

/// Body of `POST /component`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComponent {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub project_id: ProjectId,
    pub skill_id: SkillId,
    pub estimated_weeks: u32,
}

impl NewComponent {
    /// Name used when the user leaves it blank: "<project> <skill>".
    pub fn default_name(project_name: &str, skill_name: &str) -> String {
        format!("{project_name} {skill_name}")
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        require("name", &self.name)?;
        validate_weeks(self.estimated_weeks)
    }
}

/// Body of `POST /period`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPeriod {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl NewPeriod {
    pub fn validate(&self) -> Result<(), ModelError> {
        require("name", &self.name)?;
        if self.end_date < self.start_date {
            return Err(ModelError::invalid(
                "end_date",
                format!(
                    "{} is before start date {}",
                    self.end_date, self.start_date
                ),
            ));
        }
        Ok(())
    }

    /// Number of whole or partial weeks the period spans.
    pub fn week_count(&self) -> u32 {
        let days = (self.end_date - self.start_date).num_days().max(0) as u32;
        days / 7 + 1
    }
}

/// One component of a new project: a required skill and its estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentEstimate {
    pub skill_id: SkillId,
    pub estimated_weeks: u32,
}

/// Body of `POST /project`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub period_id: PeriodId,
    #[serde(default)]
    pub components: Vec<ComponentEstimate>,
}

impl NewProject {
    pub fn validate(&self) -> Result<(), ModelError> {
        require("name", &self.name)?;
        for component in &self.components {
            validate_weeks(component.estimated_weeks)?;
        }
        Ok(())
    }
}

/// Body of `POST /contributor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContributor {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub skill_ids: Vec<SkillId>,
}

impl NewContributor {
    pub fn validate(&self) -> Result<(), ModelError> {
        require("first_name", &self.first_name)?;
        require("last_name", &self.last_name)?;
        if self.skill_ids.is_empty() {
            return Err(ModelError::MissingField("skill_ids"));
        }
        Ok(())
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::MissingField(field));
    }
    Ok(())
}

fn validate_weeks(weeks: u32) -> Result<(), ModelError> {
    if weeks == 0 {
        return Err(ModelError::invalid(
            "estimated_weeks",
            "must be at least 1",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_assignment_batch_wire_shape() {
        let batch = AssignmentBatch {
            component_id: ComponentId::new(4),
            contributor_id: ContributorId::new(9),
            added_weeks: vec![1, 2],
            removed_weeks: vec![],
        };

        let value = serde_json::to_value(&batch).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "component_id": 4,
                "contributor_id": 9,
                "added_weeks": [1, 2],
                "removed_weeks": []
            })
        );
        assert!(!batch.is_empty());
    }

    #[test]
    fn test_unassign_serializes_null() {
        let body = AssignContributorRequest {
            contributor_id: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "contributor_id": null })
        );
    }

    #[test]
    fn test_new_component_requires_positive_weeks() {
        let mut body = NewComponent {
            name: "Checkout FE".to_string(),
            description: String::new(),
            project_id: ProjectId::new(1),
            skill_id: SkillId::new(2),
            estimated_weeks: 0,
        };
        assert!(matches!(
            body.validate(),
            Err(ModelError::InvalidValue {
                field: "estimated_weeks",
                ..
            })
        ));

        body.estimated_weeks = 3;
        assert!(body.validate().is_ok());

        body.name = "  ".to_string();
        assert_eq!(body.validate(), Err(ModelError::MissingField("name")));
    }

    #[test]
    fn test_default_component_name() {
        assert_eq!(
            NewComponent::default_name("Checkout", "Backend"),
            "Checkout Backend"
        );
    }

    #[test]
    fn test_period_rejects_inverted_range() {
        let period = NewPeriod {
            name: "Q1".to_string(),
            start_date: date(2024, 3, 1),
            end_date: date(2024, 2, 1),
        };
        assert!(period.validate().is_err());
    }

    #[test]
    fn test_period_week_count() {
        let period = NewPeriod {
            name: "Q1".to_string(),
            start_date: date(2024, 2, 3),
            end_date: date(2024, 4, 27),
        };
        assert!(period.validate().is_ok());
        assert_eq!(period.week_count(), 13);
    }

    #[test]
    fn test_contributor_requires_a_skill() {
        let body = NewContributor {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            skill_ids: vec![],
        };
        assert_eq!(body.validate(), Err(ModelError::MissingField("skill_ids")));
    }
}
