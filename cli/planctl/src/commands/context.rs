//! Context commands (saved selections).

use anyhow::Result;
use clap::{Args, Subcommand};
use planner_id::PeriodId;
use serde::Serialize;

use crate::output::{print_single, print_success, OutputFormat};
use crate::preferences::{ActiveTab, FormType, ViewTab};

use super::CommandContext;

/// Show or change saved selections.
#[derive(Debug, Args)]
pub struct ContextCommand {
    #[command(subcommand)]
    command: ContextSubcommand,
}

#[derive(Debug, Subcommand)]
enum ContextSubcommand {
    /// Show the saved selections.
    Show,

    /// Change saved selections.
    Set(SetContextArgs),
}

#[derive(Debug, Args)]
struct SetContextArgs {
    /// Period to select.
    #[arg(long)]
    period: Option<PeriodId>,

    /// Create form to open.
    #[arg(long, value_enum)]
    form_type: Option<FormType>,

    /// Top-level tab.
    #[arg(long, value_enum)]
    tab: Option<ActiveTab>,

    /// View sub-tab.
    #[arg(long, value_enum)]
    view_tab: Option<ViewTab>,
}

#[derive(Debug, Serialize)]
struct ContextView {
    api_url: String,
    selected_period: Option<PeriodId>,
    form_type: String,
    active_tab: String,
    active_view_tab: String,
}

impl ContextCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            ContextSubcommand::Show => show(ctx),
            ContextSubcommand::Set(args) => set(ctx, args),
        }
    }
}

fn show(ctx: CommandContext) -> Result<()> {
    let prefs = &ctx.preferences;
    let view = ContextView {
        api_url: ctx.config.api_url.clone(),
        selected_period: prefs.saved_period(),
        form_type: prefs.form_type().to_string(),
        active_tab: prefs.active_tab().to_string(),
        active_view_tab: prefs.view_tab().to_string(),
    };

    match ctx.format {
        OutputFormat::Json => print_single(&view),
        OutputFormat::Table => {
            println!("api_url: {}", view.api_url);
            println!(
                "period: {}",
                view.selected_period
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "-".to_string())
            );
            println!("form: {}", view.form_type);
            println!("tab: {}", view.active_tab);
            println!("view: {}", view.active_view_tab);
        }
    }

    Ok(())
}

fn set(ctx: CommandContext, args: SetContextArgs) -> Result<()> {
    let prefs = &ctx.preferences;
    if let Some(period) = args.period {
        prefs.set_selected_period(period);
    }
    if let Some(form_type) = args.form_type {
        prefs.set_form_type(form_type);
    }
    if let Some(tab) = args.tab {
        prefs.set_active_tab(tab);
    }
    if let Some(view_tab) = args.view_tab {
        prefs.set_view_tab(view_tab);
    }

    match ctx.format {
        OutputFormat::Json => print_single(&serde_json::json!({ "ok": true })),
        OutputFormat::Table => print_success("Saved context"),
    }

    Ok(())
}
