//! Load command: weekly contributor load chart.

use anyhow::Result;
use clap::Args;
use planner_id::PeriodId;
use planner_view::{contributor_loads, week_headers, AverageTier};

use crate::output::{load_grid, print_info, print_single, OutputFormat};
use crate::preferences::{ActiveTab, ViewTab};

use super::{first_week, CommandContext};

/// Show how many components each contributor is booked on per week.
#[derive(Debug, Args)]
pub struct LoadCommand {
    /// Period ID (defaults to the saved selection).
    #[arg(long)]
    period: Option<PeriodId>,
}

impl LoadCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        ctx.preferences.set_active_tab(ActiveTab::View);
        ctx.preferences.set_view_tab(ViewTab::Engineers);

        let (reconciler, period) = ctx.load_board(self.period).await?;
        let board = reconciler.board().await;
        let loads = contributor_loads(board.projects());

        if ctx.format == OutputFormat::Json {
            print_single(&loads);
            return Ok(());
        }

        if loads.is_empty() {
            print_info(&format!("Nobody is assigned in {}", period.name));
            return Ok(());
        }

        let horizon = loads.first().map_or(0, |l| l.weeks.len());
        println!(
            "{}",
            load_grid(&loads, &week_headers(first_week(&period), horizon))
        );

        let overloaded: Vec<&str> = loads
            .iter()
            .filter(|l| l.tier == AverageTier::Full)
            .map(|l| l.name.as_str())
            .collect();
        if !overloaded.is_empty() {
            print_info(&format!("Fully booked: {}", overloaded.join(", ")));
        }

        Ok(())
    }
}
