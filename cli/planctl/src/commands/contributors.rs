//! Contributor commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use planner_id::SkillId;
use planner_model::NewContributor;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{print_output, print_single, print_success, OutputFormat};
use crate::preferences::{ActiveTab, FormType};
use crate::roster::Roster;

use super::CommandContext;

/// Contributor commands.
#[derive(Debug, Args)]
pub struct ContributorsCommand {
    #[command(subcommand)]
    command: ContributorsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ContributorsSubcommand {
    /// List contributors holding a skill.
    List(ListContributorsArgs),

    /// Create a new contributor.
    Create(CreateContributorArgs),
}

#[derive(Debug, Args)]
struct ListContributorsArgs {
    /// Skill ID.
    #[arg(long)]
    skill: SkillId,
}

#[derive(Debug, Args)]
struct CreateContributorArgs {
    /// First name.
    first_name: String,

    /// Last name.
    last_name: String,

    /// Skill ID (repeatable).
    #[arg(long = "skill", required = true)]
    skills: Vec<SkillId>,
}

#[derive(Debug, Serialize, Tabled)]
struct ContributorRow {
    #[tabled(rename = "ID")]
    contributor_id: u64,

    #[tabled(rename = "Name")]
    name: String,
}

impl ContributorsCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            ContributorsSubcommand::List(args) => list_contributors(ctx, args).await,
            ContributorsSubcommand::Create(args) => create_contributor(ctx, args).await,
        }
    }
}

async fn list_contributors(ctx: CommandContext, args: ListContributorsArgs) -> Result<()> {
    let client = ctx.client()?;
    let mut roster = Roster::new();
    let contributors = roster.ensure(&client, args.skill).await?;

    match ctx.format {
        OutputFormat::Table => {
            let rows: Vec<ContributorRow> = contributors
                .iter()
                .map(|c| ContributorRow {
                    contributor_id: c.contributor_id.value(),
                    name: c.display_name(),
                })
                .collect();
            print_output(&rows, ctx.format);
        }
        OutputFormat::Json => print_single(&contributors),
    }

    Ok(())
}

async fn create_contributor(ctx: CommandContext, args: CreateContributorArgs) -> Result<()> {
    ctx.preferences.set_active_tab(ActiveTab::Form);
    ctx.preferences.set_form_type(FormType::Contributor);

    let client = ctx.client()?;
    let request = NewContributor {
        first_name: args.first_name,
        last_name: args.last_name,
        skill_ids: args.skills,
    };
    client.create_contributor(&request).await?;

    match ctx.format {
        OutputFormat::Json => print_single(&serde_json::json!({ "ok": true, "contributor": request })),
        OutputFormat::Table => print_success(&format!(
            "Contributor '{} {}' created",
            request.first_name, request.last_name
        )),
    }

    Ok(())
}
