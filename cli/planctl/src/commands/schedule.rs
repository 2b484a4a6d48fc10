//! Schedule command: toggle week cells of a component and submit them.

use anyhow::Result;
use clap::Args;
use planner_id::{ComponentId, PeriodId};
use planner_model::{Period, WeekIndex};
use planner_view::{week_headers, ProjectView};

use crate::output::{print_info, print_single, print_success, print_warning, project_grid, OutputFormat};
use crate::reconciler::{Reconciler, SubmitOutcome};

use super::{first_week, CommandContext};

/// Toggle weeks of one component, then submit the batch.
///
/// An unassigned week becomes assigned and an assigned week becomes free.
/// Naming the same week twice cancels it out.
#[derive(Debug, Args)]
pub struct ScheduleCommand {
    /// Component ID.
    component: ComponentId,

    /// Zero-based week index to toggle (repeatable).
    #[arg(long = "week", short = 'w', required = true)]
    weeks: Vec<WeekIndex>,

    /// Show the pending edits without submitting them.
    #[arg(long)]
    dry_run: bool,

    /// Period ID (defaults to the saved selection).
    #[arg(long)]
    period: Option<PeriodId>,
}

impl ScheduleCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let (reconciler, period) = ctx.load_board(self.period).await?;

        for week in &self.weeks {
            reconciler.toggle_cell(self.component, *week).await?;
        }

        let pending = reconciler.pending(self.component).await;

        if self.dry_run {
            match ctx.format {
                OutputFormat::Json => print_single(&serde_json::json!({
                    "component_id": self.component,
                    "pending": pending,
                    "submitted": false,
                })),
                OutputFormat::Table => {
                    show_component(&reconciler, &period, self.component).await;
                    print_info(&format!(
                        "{} pending edit(s), not submitted",
                        pending.as_ref().map_or(0, |p| p.len())
                    ));
                }
            }
            return Ok(());
        }

        let outcome = reconciler.submit_component(self.component).await?;

        match (ctx.format, &outcome) {
            (OutputFormat::Json, SubmitOutcome::Committed(batch)) => {
                print_single(&serde_json::json!({ "submitted": true, "batch": batch }));
            }
            (OutputFormat::Json, SubmitOutcome::Skipped) => {
                print_single(&serde_json::json!({
                    "component_id": self.component,
                    "pending": pending,
                    "submitted": false,
                }));
            }
            (OutputFormat::Table, SubmitOutcome::Committed(batch)) => {
                show_component(&reconciler, &period, self.component).await;
                print_success(&format!(
                    "Component {}: {} week(s) added, {} removed",
                    self.component,
                    batch.added_weeks.len(),
                    batch.removed_weeks.len()
                ));
            }
            (OutputFormat::Table, SubmitOutcome::Skipped) => {
                show_component(&reconciler, &period, self.component).await;
                print_warning(&format!(
                    "Component {} has no contributor; nothing was submitted. \
                     Assign one with `plan components assign`.",
                    self.component
                ));
            }
        }

        Ok(())
    }
}

/// Print the grid row of one component.
async fn show_component(reconciler: &Reconciler, period: &Period, component_id: ComponentId) {
    let views = reconciler.project().await;
    let Some(view) = views
        .into_iter()
        .find(|v| v.rows.iter().any(|row| row.component_id == component_id))
    else {
        return;
    };

    let rows: Vec<_> = view
        .rows
        .into_iter()
        .filter(|row| row.component_id == component_id)
        .collect();
    let horizon = rows.first().map_or(0, |row| row.cells.len());
    let single = ProjectView {
        summary: view.summary,
        rows,
    };

    println!(
        "{}",
        project_grid(&single, &week_headers(first_week(period), horizon))
    );
}
