//! Period commands.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use planner_model::{NewPeriod, Period};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{print_output, print_single, print_success, OutputFormat};
use crate::preferences::{ActiveTab, FormType};

use super::CommandContext;

/// Period commands.
#[derive(Debug, Args)]
pub struct PeriodsCommand {
    #[command(subcommand)]
    command: PeriodsSubcommand,
}

#[derive(Debug, Subcommand)]
enum PeriodsSubcommand {
    /// List periods.
    List,

    /// Create a new period.
    Create(CreatePeriodArgs),
}

#[derive(Debug, Args)]
struct CreatePeriodArgs {
    /// Period name.
    name: String,

    /// First day (YYYY-MM-DD).
    #[arg(long)]
    start: NaiveDate,

    /// Last day (YYYY-MM-DD).
    #[arg(long)]
    end: NaiveDate,
}

#[derive(Debug, Serialize, Tabled)]
struct PeriodRow {
    #[tabled(rename = "ID")]
    period_id: u64,

    #[tabled(rename = "Name")]
    name: String,

    #[tabled(rename = "Start")]
    start_date: String,

    #[tabled(rename = "End")]
    end_date: String,

    #[tabled(rename = "Selected")]
    selected: String,
}

impl PeriodsCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            PeriodsSubcommand::List => list_periods(ctx).await,
            PeriodsSubcommand::Create(args) => create_period(ctx, args).await,
        }
    }
}

fn date_or_dash(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

async fn list_periods(ctx: CommandContext) -> Result<()> {
    let client = ctx.client()?;
    let periods: Vec<Period> = client.list_periods().await?;
    let selected = ctx.preferences.select_period(&periods);

    let rows: Vec<PeriodRow> = periods
        .iter()
        .map(|p| PeriodRow {
            period_id: p.period_id.value(),
            name: p.name.clone(),
            start_date: date_or_dash(p.start_date),
            end_date: date_or_dash(p.end_date),
            selected: if Some(p.period_id) == selected { "*" } else { "" }.to_string(),
        })
        .collect();

    match ctx.format {
        OutputFormat::Table => print_output(&rows, ctx.format),
        OutputFormat::Json => print_single(&periods),
    }

    Ok(())
}

async fn create_period(ctx: CommandContext, args: CreatePeriodArgs) -> Result<()> {
    ctx.preferences.set_active_tab(ActiveTab::Form);
    ctx.preferences.set_form_type(FormType::Period);

    let client = ctx.client()?;
    let request = NewPeriod {
        name: args.name,
        start_date: args.start,
        end_date: args.end,
    };
    client.create_period(&request).await?;

    match ctx.format {
        OutputFormat::Json => print_single(&serde_json::json!({ "ok": true, "period": request })),
        OutputFormat::Table => print_success(&format!(
            "Period '{}' created ({} weeks)",
            request.name,
            request.week_count()
        )),
    }

    Ok(())
}
