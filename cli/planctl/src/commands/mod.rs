//! CLI commands.

mod board;
mod components;
mod context;
mod contributors;
mod load;
mod periods;
mod projects;
mod schedule;
mod skills;

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use planner_id::PeriodId;
use planner_model::Period;
use tracing::warn;

use crate::client::ApiClient;
use crate::config::Config;
use crate::error::PlannerError;
use crate::output::OutputFormat;
use crate::preferences::Preferences;
use crate::reconciler::Reconciler;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};

/// First week shown when a period has no start date.
const DEFAULT_FIRST_WEEK: (i32, u32, u32) = (2024, 2, 3);

/// plan - schedule contributors onto project components week by week.
#[derive(Debug, Parser)]
#[command(name = "plan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (table or json).
    #[arg(long, global = true, default_value = "table")]
    format: String,

    /// Planning service base URL.
    #[arg(long, global = true, env = "PLAN_API_URL")]
    api_url: Option<String>,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Manage planning periods.
    Periods(periods::PeriodsCommand),

    /// List skills.
    Skills(skills::SkillsCommand),

    /// Manage contributors.
    Contributors(contributors::ContributorsCommand),

    /// Manage projects in a period.
    Projects(projects::ProjectsCommand),

    /// Edit components of a project.
    Components(components::ComponentsCommand),

    /// Show the schedule board of a period.
    Board(board::BoardCommand),

    /// Toggle week cells of a component and submit them.
    Schedule(schedule::ScheduleCommand),

    /// Show weekly contributor load.
    Load(load::LoadCommand),

    /// Show or change saved selections.
    Context(context::ContextCommand),

    /// Show CLI version.
    Version,
}

impl Cli {
    /// Run the CLI command.
    pub async fn run(self) -> Result<()> {
        let format = OutputFormat::parse(&self.format);

        let mut config = Config::load()?;
        if let Some(api_url) = self.api_url {
            config.api_url = api_url;
        }

        let preferences = Preferences::new(open_store(&config));
        let ctx = CommandContext {
            config,
            format,
            preferences,
        };

        match self.command {
            Commands::Periods(cmd) => cmd.run(ctx).await,
            Commands::Skills(cmd) => cmd.run(ctx).await,
            Commands::Contributors(cmd) => cmd.run(ctx).await,
            Commands::Projects(cmd) => cmd.run(ctx).await,
            Commands::Components(cmd) => cmd.run(ctx).await,
            Commands::Board(cmd) => cmd.run(ctx).await,
            Commands::Schedule(cmd) => cmd.run(ctx).await,
            Commands::Load(cmd) => cmd.run(ctx).await,
            Commands::Context(cmd) => cmd.run(ctx).await,
            Commands::Version => {
                println!("plan {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

/// Open the preference store, falling back to memory if the file is unusable.
fn open_store(config: &Config) -> Arc<dyn KeyValueStore> {
    let opened = config
        .state_path()
        .and_then(|path| FileStore::open(path).map_err(anyhow::Error::from));

    match opened {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!(error = %e, "Preferences unavailable, using in-memory store");
            Arc::new(MemoryStore::new())
        }
    }
}

/// Shared command context.
pub struct CommandContext {
    pub config: Config,
    pub format: OutputFormat,
    pub preferences: Preferences,
}

impl CommandContext {
    /// Get an API client for the configured service.
    pub fn client(&self) -> Result<ApiClient> {
        ApiClient::new(&self.config)
    }

    /// Pick the period to work on: the flag, else the saved selection, else
    /// the first period.
    pub async fn resolve_period(
        &self,
        client: &ApiClient,
        flag: Option<PeriodId>,
    ) -> Result<Period> {
        let periods = client.list_periods().await?;

        if let Some(period_id) = flag {
            let period = periods
                .into_iter()
                .find(|p| p.period_id == period_id)
                .ok_or_else(|| PlannerError::NotFound(format!("period {period_id}")))?;
            self.preferences.set_selected_period(period_id);
            return Ok(period);
        }

        let Some(period_id) = self.preferences.select_period(&periods) else {
            anyhow::bail!("No periods found. Create one with `plan periods create`.");
        };

        periods
            .into_iter()
            .find(|p| p.period_id == period_id)
            .ok_or_else(|| anyhow::anyhow!("Period {period_id} not found"))
    }

    /// Resolve the period and load its board into a fresh reconciler.
    pub async fn load_board(&self, flag: Option<PeriodId>) -> Result<(Reconciler, Period)> {
        let client = self.client()?;
        let period = self.resolve_period(&client, flag).await?;

        let reconciler = Reconciler::new(client);
        reconciler.load_period(period.period_id).await?;
        Ok((reconciler, period))
    }
}

/// Date of week zero for a period.
pub(crate) fn first_week(period: &Period) -> NaiveDate {
    let (y, m, d) = DEFAULT_FIRST_WEEK;
    period
        .start_date
        .or_else(|| NaiveDate::from_ymd_opt(y, m, d))
        .unwrap_or_default()
}
