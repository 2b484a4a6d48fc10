//! Board command: the schedule grid of a period.

use anyhow::Result;
use clap::Args;
use planner_id::PeriodId;
use planner_view::{eligible_assignees, week_headers};

use crate::output::{print_info, print_single, project_grid, project_heading, OutputFormat};
use crate::preferences::{ActiveTab, ViewTab};
use crate::roster::Roster;

use super::{first_week, CommandContext};

/// Show every project of a period with its week grid.
#[derive(Debug, Args)]
pub struct BoardCommand {
    /// Period ID (defaults to the saved selection).
    #[arg(long)]
    period: Option<PeriodId>,

    /// Show collapsed projects too.
    #[arg(long)]
    all: bool,

    /// List eligible contributors under each project.
    #[arg(long)]
    assignees: bool,
}

impl BoardCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        ctx.preferences.set_active_tab(ActiveTab::View);
        ctx.preferences.set_view_tab(ViewTab::Projects);

        let (reconciler, period) = ctx.load_board(self.period).await?;
        let board = reconciler.board().await;
        let views = reconciler.project().await;
        let expanded = ctx
            .preferences
            .expanded_projects(&board.projects().project_ids());

        if ctx.format == OutputFormat::Json {
            print_single(&serde_json::json!({
                "period": period,
                "projects": views,
                "expanded": expanded,
            }));
            return Ok(());
        }

        if views.is_empty() {
            print_info(&format!("No projects in {}", period.name));
            return Ok(());
        }

        let mut roster = Roster::new();
        if self.assignees {
            roster
                .ensure_for_board(reconciler.client(), board.projects())
                .await?;
        }

        let horizon = views
            .iter()
            .flat_map(|v| &v.rows)
            .map(|row| row.cells.len())
            .max()
            .unwrap_or(0);
        let headers = week_headers(first_week(&period), horizon);

        println!("{}\n", period.name);
        for view in &views {
            let is_expanded = self.all || expanded.contains(&view.summary.project_id);
            println!("{}", project_heading(view, is_expanded));
            if !is_expanded {
                continue;
            }

            if !view.rows.is_empty() {
                println!("{}", project_grid(view, &headers));
            }

            if self.assignees {
                let Some(project) = board.project(view.summary.project_id) else {
                    continue;
                };
                for component in &project.components {
                    let Some(skill_id) = component.skill_id else {
                        continue;
                    };
                    let names: Vec<String> = eligible_assignees(roster.eligible(skill_id), skill_id)
                        .into_iter()
                        .map(|c| c.display_name())
                        .collect();
                    println!(
                        "  {}: {}",
                        component.component_name,
                        if names.is_empty() { "-".to_string() } else { names.join(", ") }
                    );
                }
            }
            println!();
        }

        Ok(())
    }
}
