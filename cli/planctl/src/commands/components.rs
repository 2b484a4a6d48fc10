//! Component commands.

use std::str::FromStr;

use anyhow::Result;
use clap::{Args, Subcommand};
use planner_id::{ComponentId, ContributorId, PeriodId, ProjectId, SkillId};
use planner_model::NewComponent;

use crate::output::{print_single, print_success, OutputFormat};
use crate::reconciler::Reconciler;
use crate::roster::Roster;

use super::CommandContext;

/// Component commands.
#[derive(Debug, Args)]
pub struct ComponentsCommand {
    #[command(subcommand)]
    command: ComponentsSubcommand,

    /// Period ID (defaults to the saved selection).
    #[arg(long, global = true)]
    period: Option<PeriodId>,
}

#[derive(Debug, Subcommand)]
enum ComponentsSubcommand {
    /// Add a component to a project.
    Add(AddComponentArgs),

    /// Delete a component.
    Delete(ComponentArgs),

    /// Change a component's estimate.
    Weeks(WeeksArgs),

    /// Assign a contributor, or `unassigned` to clear it.
    Assign(AssignArgs),

    /// Clear every assigned week of a component.
    Clear(ComponentArgs),
}

#[derive(Debug, Args)]
struct AddComponentArgs {
    /// Project ID.
    #[arg(long)]
    project: ProjectId,

    /// Required skill ID.
    #[arg(long)]
    skill: SkillId,

    /// Estimated weeks.
    #[arg(long)]
    weeks: u32,

    /// Component name (defaults to "<project> <skill>").
    #[arg(long)]
    name: Option<String>,
}

#[derive(Debug, Args)]
struct ComponentArgs {
    /// Component ID.
    component: ComponentId,
}

#[derive(Debug, Args)]
struct WeeksArgs {
    /// Component ID.
    component: ComponentId,

    /// New estimate in weeks.
    weeks: u32,
}

#[derive(Debug, Args)]
struct AssignArgs {
    /// Component ID.
    component: ComponentId,

    /// Contributor ID or `unassigned`.
    contributor: AssignTarget,
}

/// Target of an assign command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssignTarget {
    Contributor(ContributorId),
    Unassigned,
}

impl AssignTarget {
    fn contributor_id(self) -> Option<ContributorId> {
        match self {
            Self::Contributor(id) => Some(id),
            Self::Unassigned => None,
        }
    }
}

impl FromStr for AssignTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("unassigned") {
            return Ok(Self::Unassigned);
        }
        ContributorId::parse(s)
            .map(Self::Contributor)
            .map_err(|e| e.to_string())
    }
}

impl ComponentsCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let (reconciler, _) = ctx.load_board(self.period).await?;

        let message = match self.command {
            ComponentsSubcommand::Add(args) => add_component(&reconciler, args).await?,
            ComponentsSubcommand::Delete(args) => {
                reconciler.delete_component(args.component).await?;
                format!("Deleted component {}", args.component)
            }
            ComponentsSubcommand::Weeks(args) => {
                reconciler
                    .update_estimated_weeks(args.component, args.weeks)
                    .await?;
                format!("Component {} now estimated at {} weeks", args.component, args.weeks)
            }
            ComponentsSubcommand::Assign(args) => assign(&reconciler, args).await?,
            ComponentsSubcommand::Clear(args) => {
                reconciler.clear_assignments(args.component).await?;
                format!("Cleared assignments of component {}", args.component)
            }
        };

        match ctx.format {
            OutputFormat::Json => print_single(&serde_json::json!({ "ok": true, "message": message })),
            OutputFormat::Table => print_success(&message),
        }

        Ok(())
    }
}

async fn add_component(reconciler: &Reconciler, args: AddComponentArgs) -> Result<String> {
    let board = reconciler.board().await;
    let project = board
        .project(args.project)
        .ok_or_else(|| anyhow::anyhow!("Project {} is not in this period", args.project))?;

    let name = match args.name.filter(|n| !n.trim().is_empty()) {
        Some(name) => name,
        None => {
            let skills = reconciler.client().list_skills().await?;
            let skill_name = skills
                .iter()
                .find(|s| s.skill_id == args.skill)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| args.skill.to_string());
            NewComponent::default_name(&project.project_name, &skill_name)
        }
    };

    let request = NewComponent {
        name,
        description: String::new(),
        project_id: args.project,
        skill_id: args.skill,
        estimated_weeks: args.weeks,
    };
    reconciler.add_component(&request).await?;

    Ok(format!(
        "Added component '{}' to {}",
        request.name, project.project_name
    ))
}

async fn assign(reconciler: &Reconciler, args: AssignArgs) -> Result<String> {
    let board = reconciler.board().await;
    let component = board
        .component(args.component)
        .ok_or_else(|| anyhow::anyhow!("Component {} is not in this period", args.component))?;

    let Some(contributor_id) = args.contributor.contributor_id() else {
        reconciler.assign_contributor(args.component, None).await?;
        return Ok(format!("Component {} unassigned", args.component));
    };

    // Only contributors holding the component's skill are offered.
    let mut name = contributor_id.to_string();
    if let Some(skill_id) = component.skill_id {
        let mut roster = Roster::new();
        let eligible = roster.ensure(reconciler.client(), skill_id).await?;
        let contributor = eligible
            .iter()
            .find(|c| c.contributor_id == contributor_id)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Contributor {contributor_id} does not have the skill required by component {}",
                    args.component
                )
            })?;
        name = contributor.display_name();
    }

    reconciler
        .assign_contributor(args.component, Some(contributor_id))
        .await?;
    Ok(format!("Assigned {name} to component {}", args.component))
}
