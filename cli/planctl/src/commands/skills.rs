//! Skill commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{print_output, print_single, OutputFormat};

use super::CommandContext;

/// Skill commands.
#[derive(Debug, Args)]
pub struct SkillsCommand {
    #[command(subcommand)]
    command: SkillsSubcommand,
}

#[derive(Debug, Subcommand)]
enum SkillsSubcommand {
    /// List skills.
    List,
}

#[derive(Debug, Serialize, Tabled)]
struct SkillRow {
    #[tabled(rename = "ID")]
    skill_id: u64,

    #[tabled(rename = "Name")]
    name: String,
}

impl SkillsCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            SkillsSubcommand::List => list_skills(ctx).await,
        }
    }
}

async fn list_skills(ctx: CommandContext) -> Result<()> {
    let client = ctx.client()?;
    let skills = client.list_skills().await?;

    match ctx.format {
        OutputFormat::Table => {
            let rows: Vec<SkillRow> = skills
                .iter()
                .map(|s| SkillRow {
                    skill_id: s.skill_id.value(),
                    name: s.name.clone(),
                })
                .collect();
            print_output(&rows, ctx.format);
        }
        OutputFormat::Json => print_single(&skills),
    }

    Ok(())
}
