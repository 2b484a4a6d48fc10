//! Project commands.

use std::str::FromStr;

use anyhow::Result;
use clap::{Args, Subcommand};
use planner_id::{PeriodId, ProjectId, SkillId};
use planner_model::{ComponentEstimate, NewProject};
use planner_view::ProjectSummary;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{print_info, print_output, print_single, print_success, OutputFormat};
use crate::preferences::{ActiveTab, FormType};

use super::CommandContext;

/// Project commands.
#[derive(Debug, Args)]
pub struct ProjectsCommand {
    #[command(subcommand)]
    command: ProjectsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProjectsSubcommand {
    /// List projects in a period with their totals.
    List(PeriodArgs),

    /// Create a new project.
    Create(CreateProjectArgs),

    /// Delete a project and its components.
    Delete(ProjectArgs),

    /// Expand or collapse a project on the board.
    Toggle(ProjectArgs),
}

#[derive(Debug, Args)]
struct PeriodArgs {
    /// Period ID (defaults to the saved selection).
    #[arg(long)]
    period: Option<PeriodId>,
}

#[derive(Debug, Args)]
struct ProjectArgs {
    /// Project ID.
    project: ProjectId,

    #[command(flatten)]
    period: PeriodArgs,
}

#[derive(Debug, Args)]
struct CreateProjectArgs {
    /// Project name.
    name: String,

    /// Project description.
    #[arg(long, default_value = "")]
    description: String,

    /// Component as SKILL_ID:WEEKS (repeatable).
    #[arg(long = "component")]
    components: Vec<ComponentSpec>,

    #[command(flatten)]
    period: PeriodArgs,
}

/// `SKILL_ID:WEEKS` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ComponentSpec {
    skill_id: SkillId,
    estimated_weeks: u32,
}

impl FromStr for ComponentSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (skill, weeks) = s
            .split_once(':')
            .ok_or_else(|| format!("expected SKILL_ID:WEEKS, got '{s}'"))?;

        let skill_id = SkillId::parse(skill).map_err(|e| e.to_string())?;
        let estimated_weeks = weeks
            .trim()
            .parse()
            .map_err(|_| format!("invalid week count '{weeks}'"))?;

        Ok(Self {
            skill_id,
            estimated_weeks,
        })
    }
}

#[derive(Debug, Serialize, Tabled)]
struct ProjectRow {
    #[tabled(rename = "ID")]
    project_id: u64,

    #[tabled(rename = "Name")]
    name: String,

    #[tabled(rename = "Components")]
    components: usize,

    #[tabled(rename = "Scheduled")]
    scheduled: String,

    #[tabled(rename = "%")]
    percentage: String,
}

impl ProjectsCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            ProjectsSubcommand::List(args) => list_projects(ctx, args).await,
            ProjectsSubcommand::Create(args) => create_project(ctx, args).await,
            ProjectsSubcommand::Delete(args) => delete_project(ctx, args).await,
            ProjectsSubcommand::Toggle(args) => toggle_project(ctx, args).await,
        }
    }
}

async fn list_projects(ctx: CommandContext, args: PeriodArgs) -> Result<()> {
    let (reconciler, _) = ctx.load_board(args.period).await?;
    let board = reconciler.board().await;

    match ctx.format {
        OutputFormat::Table => {
            let rows: Vec<ProjectRow> = board
                .projects()
                .projects
                .iter()
                .map(|project| {
                    let summary = ProjectSummary::project(project);
                    ProjectRow {
                        project_id: project.project_id.value(),
                        name: project.project_name.clone(),
                        components: project.components.len(),
                        scheduled: format!(
                            "{}/{}",
                            summary.total_scheduled_weeks, summary.total_estimated_weeks
                        ),
                        percentage: format!("{:.0}", summary.percentage),
                    }
                })
                .collect();
            print_output(&rows, ctx.format);
        }
        OutputFormat::Json => print_single(board.projects()),
    }

    Ok(())
}

async fn create_project(ctx: CommandContext, args: CreateProjectArgs) -> Result<()> {
    ctx.preferences.set_active_tab(ActiveTab::Form);
    ctx.preferences.set_form_type(FormType::Project);

    let client = ctx.client()?;
    let period = ctx.resolve_period(&client, args.period.period).await?;

    let request = NewProject {
        name: args.name,
        description: args.description,
        period_id: period.period_id,
        components: args
            .components
            .into_iter()
            .map(|spec| ComponentEstimate {
                skill_id: spec.skill_id,
                estimated_weeks: spec.estimated_weeks,
            })
            .collect(),
    };
    client.create_project(&request).await?;

    match ctx.format {
        OutputFormat::Json => print_single(&serde_json::json!({ "ok": true, "project": request })),
        OutputFormat::Table => print_success(&format!(
            "Project '{}' created in {} with {} component(s)",
            request.name,
            period.name,
            request.components.len()
        )),
    }

    Ok(())
}

async fn delete_project(ctx: CommandContext, args: ProjectArgs) -> Result<()> {
    let (reconciler, _) = ctx.load_board(args.period.period).await?;
    reconciler.delete_project(args.project).await?;

    match ctx.format {
        OutputFormat::Json => print_single(&serde_json::json!({ "ok": true })),
        OutputFormat::Table => print_success(&format!("Deleted project {}", args.project)),
    }

    Ok(())
}

async fn toggle_project(ctx: CommandContext, args: ProjectArgs) -> Result<()> {
    let (reconciler, _) = ctx.load_board(args.period.period).await?;
    let all = reconciler.board().await.projects().project_ids();

    if !all.contains(&args.project) {
        anyhow::bail!("Project {} is not in this period", args.project);
    }

    let expanded = ctx.preferences.toggle_project(args.project, &all);

    match ctx.format {
        OutputFormat::Json => print_single(&serde_json::json!({
            "project_id": args.project,
            "expanded": expanded
        })),
        OutputFormat::Table => print_info(&format!(
            "Project {} {}",
            args.project,
            if expanded { "expanded" } else { "collapsed" }
        )),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_spec_parse() {
        let spec: ComponentSpec = "3:4".parse().unwrap();
        assert_eq!(spec.skill_id, SkillId::new(3));
        assert_eq!(spec.estimated_weeks, 4);

        assert!("3".parse::<ComponentSpec>().is_err());
        assert!("x:4".parse::<ComponentSpec>().is_err());
        assert!("3:many".parse::<ComponentSpec>().is_err());
    }
}
