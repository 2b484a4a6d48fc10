//! Per-contributor weekly load chart.
//!
//! A contributor's load in a week is the number of components they are
//! booked on that week.

use std::collections::BTreeMap;

use planner_id::ContributorId;
use planner_model::PeriodProjects;
use serde::Serialize;

/// Tier for a single week's load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadTier {
    Idle,
    Booked,
    Overbooked,
}

impl LoadTier {
    pub fn from_count(count: u32) -> Self {
        match count {
            0 => Self::Idle,
            1 => Self::Booked,
            _ => Self::Overbooked,
        }
    }
}

/// Tier for a contributor's average load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AverageTier {
    Under,
    Near,
    Full,
}

impl AverageTier {
    pub fn from_average(average: f64) -> Self {
        if average < 0.7 {
            Self::Under
        } else if average < 0.9 {
            Self::Near
        } else {
            Self::Full
        }
    }
}

/// One row of the load chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributorLoad {
    pub contributor_id: ContributorId,
    pub name: String,
    pub weeks: Vec<u32>,
    pub average: f64,
    pub tier: AverageTier,
}

/// Build the load chart for every contributor assigned on the board.
///
/// Rows are sorted by name; every row spans the longest horizon on the
/// board.
pub fn contributor_loads(board: &PeriodProjects) -> Vec<ContributorLoad> {
    let horizon = board
        .projects
        .iter()
        .flat_map(|p| &p.components)
        .map(|c| c.horizon())
        .max()
        .unwrap_or(0);

    let mut rows: BTreeMap<ContributorId, (String, Vec<u32>)> = BTreeMap::new();
    for component in board.projects.iter().flat_map(|p| &p.components) {
        let Some(contributor_id) = component.contributor_id else {
            continue;
        };

        let (_, weeks) = rows.entry(contributor_id).or_insert_with(|| {
            let name = component
                .contributor_name
                .clone()
                .unwrap_or_else(|| contributor_id.to_string());
            (name, vec![0; horizon])
        });

        for (week, assigned) in component.assignments.iter().enumerate() {
            if *assigned {
                weeks[week] += 1;
            }
        }
    }

    let mut loads: Vec<ContributorLoad> = rows
        .into_iter()
        .map(|(contributor_id, (name, weeks))| {
            let average = if weeks.is_empty() {
                0.0
            } else {
                f64::from(weeks.iter().sum::<u32>()) / weeks.len() as f64
            };
            ContributorLoad {
                contributor_id,
                name,
                weeks,
                average,
                tier: AverageTier::from_average(average),
            }
        })
        .collect();

    loads.sort_by(|a, b| a.name.cmp(&b.name));
    loads
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner_id::{ComponentId, ProjectId};
    use planner_model::{Component, Project};
    use rstest::rstest;

    fn component(id: u64, contributor: Option<(u64, &str)>, assignments: Vec<bool>) -> Component {
        Component {
            component_id: ComponentId::new(id),
            component_name: format!("c{id}"),
            skill_id: None,
            contributor_id: contributor.map(|(cid, _)| ContributorId::new(cid)),
            contributor_name: contributor.map(|(_, name)| name.to_string()),
            estimated_weeks: 2,
            assigned_weeks: 0,
            assignments,
        }
    }

    #[test]
    fn test_loads_sum_across_projects() {
        let board = PeriodProjects {
            projects: vec![
                Project {
                    project_id: ProjectId::new(1),
                    project_name: "A".to_string(),
                    components: vec![
                        component(1, Some((7, "Nick")), vec![true, true, false, false]),
                        component(2, None, vec![true, true, true, true]),
                    ],
                },
                Project {
                    project_id: ProjectId::new(2),
                    project_name: "B".to_string(),
                    components: vec![
                        component(3, Some((7, "Nick")), vec![false, true, true, true]),
                        component(4, Some((3, "Ala")), vec![true, false, false, false]),
                    ],
                },
            ],
        };

        let loads = contributor_loads(&board);
        assert_eq!(loads.len(), 2);

        assert_eq!(loads[0].name, "Ala");
        assert_eq!(loads[0].weeks, vec![1, 0, 0, 0]);
        assert_eq!(loads[0].tier, AverageTier::Under);

        assert_eq!(loads[1].name, "Nick");
        assert_eq!(loads[1].weeks, vec![1, 2, 1, 1]);
        assert_eq!(loads[1].average, 1.25);
        assert_eq!(loads[1].tier, AverageTier::Full);
        assert_eq!(LoadTier::from_count(loads[1].weeks[1]), LoadTier::Overbooked);
    }

    #[rstest]
    #[case(0.0, AverageTier::Under)]
    #[case(0.62, AverageTier::Under)]
    #[case(0.7, AverageTier::Near)]
    #[case(0.85, AverageTier::Near)]
    #[case(0.9, AverageTier::Full)]
    #[case(1.5, AverageTier::Full)]
    fn test_average_tiers(#[case] average: f64, #[case] expected: AverageTier) {
        assert_eq!(AverageTier::from_average(average), expected);
    }

    #[rstest]
    #[case(0, LoadTier::Idle)]
    #[case(1, LoadTier::Booked)]
    #[case(2, LoadTier::Overbooked)]
    #[case(5, LoadTier::Overbooked)]
    fn test_load_tiers(#[case] count: u32, #[case] expected: LoadTier) {
        assert_eq!(LoadTier::from_count(count), expected);
    }

    #[test]
    fn test_empty_board() {
        assert!(contributor_loads(&PeriodProjects::default()).is_empty());
    }
}
