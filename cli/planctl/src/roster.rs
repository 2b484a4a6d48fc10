//! Per-skill cache of assignable contributors.

use std::collections::{BTreeSet, HashMap};

use planner_id::{ContributorId, SkillId};
use planner_model::{Contributor, PeriodProjects};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::PlannerError;

/// Contributors eligible for each skill, fetched on first use.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    by_skill: HashMap<SkillId, Vec<Contributor>>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contributors holding `skill_id`, fetching them if not cached.
    pub async fn ensure(
        &mut self,
        client: &ApiClient,
        skill_id: SkillId,
    ) -> Result<&[Contributor], PlannerError> {
        if !self.by_skill.contains_key(&skill_id) {
            let mut contributors = client.contributors_by_skill(skill_id).await?.contributors;

            // The by-skill listing omits skill ids; every entry holds this one.
            for contributor in &mut contributors {
                if !contributor.has_skill(skill_id) {
                    contributor.skill_ids.push(skill_id);
                }
            }

            debug!(%skill_id, count = contributors.len(), "Cached contributors");
            self.by_skill.insert(skill_id, contributors);
        }

        Ok(self.eligible(skill_id))
    }

    /// Fetch contributors for every skill required on the board.
    pub async fn ensure_for_board(
        &mut self,
        client: &ApiClient,
        board: &PeriodProjects,
    ) -> Result<(), PlannerError> {
        let skills: BTreeSet<SkillId> = board
            .projects
            .iter()
            .flat_map(|p| &p.components)
            .filter_map(|c| c.skill_id)
            .collect();

        for skill_id in skills {
            self.ensure(client, skill_id).await?;
        }
        Ok(())
    }

    /// Cached contributors for `skill_id`; empty if not fetched.
    pub fn eligible(&self, skill_id: SkillId) -> &[Contributor] {
        self.by_skill
            .get(&skill_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Look up a cached contributor under any skill.
    pub fn find(&self, contributor_id: ContributorId) -> Option<&Contributor> {
        self.by_skill
            .values()
            .flatten()
            .find(|c| c.contributor_id == contributor_id)
    }

    /// Drop the cache, e.g. after creating a contributor.
    pub fn clear(&mut self) {
        self.by_skill.clear();
    }
}
