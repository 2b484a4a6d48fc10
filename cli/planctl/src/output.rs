//! Output formatting for CLI commands.

use colored::{ColoredString, Colorize};
use planner_view::{CellState, ContributorLoad, LoadTier, ProjectView, StatusTier};
use serde::Serialize;
use tabled::builder::Builder;
use tabled::{Table, Tabled};

const CLI_SCHEMA_VERSION: &str = "planner.cli.v1";

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Self {
        match value {
            "json" => Self::Json,
            _ => Self::Table,
        }
    }
}

/// Print data in the specified format.
pub fn print_output<T: Serialize + Tabled>(data: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if data.is_empty() {
                println!("{}", "No items found.".dimmed());
            } else {
                println!("{}", Table::new(data));
            }
        }
        OutputFormat::Json => println!("{}", format_json(data, "[]")),
    }
}

/// Print a single item as JSON.
pub fn print_single<T: Serialize>(data: &T) {
    println!("{}", format_json(data, "{}"));
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", "Success:".green().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", "Info:".blue().bold(), message);
}

/// Print a warning to stderr.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "Warning:".yellow().bold(), message);
}

/// Color `text` by schedule tier.
pub fn paint_tier(text: &str, tier: StatusTier) -> ColoredString {
    match tier {
        StatusTier::Unscheduled => text.red(),
        StatusTier::Low => text.truecolor(255, 165, 0),
        StatusTier::Partial => text.yellow(),
        StatusTier::Complete => text.green(),
    }
}

// =============================================================================
// Board grid
// =============================================================================

/// Glyph for one week cell.
pub fn cell_glyph(cell: CellState) -> &'static str {
    match cell {
        CellState::Added => "+",
        CellState::Removed => "-",
        CellState::Assigned => "#",
        CellState::Unassigned => ".",
    }
}

/// Render one project's component rows as a table with a column per week.
pub fn project_grid(view: &ProjectView, headers: &[String]) -> String {
    let mut builder = Builder::default();

    let mut header = vec![
        "ID".to_string(),
        "Component".to_string(),
        "Contributor".to_string(),
        "Weeks".to_string(),
        "Badge".to_string(),
        "State".to_string(),
    ];
    header.extend(headers.iter().cloned());
    builder.push_record(header);

    for row in &view.rows {
        let mut record = vec![
            row.component_id.to_string(),
            row.name.clone(),
            row.contributor_name.clone().unwrap_or_else(|| "-".to_string()),
            format!("{}/{}", row.assigned_weeks, row.estimated_weeks),
            row.badge.label().to_string(),
            row.phase.to_string(),
        ];
        record.extend(row.cells.iter().map(|cell| cell_glyph(*cell).to_string()));
        builder.push_record(record);
    }

    builder.build().to_string()
}

/// One-line project heading: name, totals and percentage.
pub fn project_heading(view: &ProjectView, expanded: bool) -> String {
    let summary = &view.summary;
    let marker = if expanded { "v" } else { ">" };
    let totals = format!(
        "{}/{} weeks ({:.0}%)",
        summary.total_scheduled_weeks, summary.total_estimated_weeks, summary.percentage
    );

    format!(
        "{} {} [{}] {}",
        marker,
        summary.name.bold(),
        summary.project_id,
        paint_tier(&totals, summary.tier)
    )
}

/// Render the contributor load chart.
pub fn load_grid(loads: &[ContributorLoad], headers: &[String]) -> String {
    let mut builder = Builder::default();

    let mut header = vec!["Contributor".to_string(), "Avg".to_string()];
    header.extend(headers.iter().cloned());
    builder.push_record(header);

    for load in loads {
        let mut record = vec![load.name.clone(), format!("{:.2}", load.average)];
        record.extend(load.weeks.iter().map(|count| load_cell(*count)));
        builder.push_record(record);
    }

    builder.build().to_string()
}

fn load_cell(count: u32) -> String {
    match LoadTier::from_count(count) {
        LoadTier::Idle => ".".to_string(),
        LoadTier::Booked | LoadTier::Overbooked => count.to_string(),
    }
}

// =============================================================================
// JSON
// =============================================================================

fn format_json<T: Serialize + ?Sized>(data: &T, fallback: &str) -> String {
    let value = serde_json::to_value(data).unwrap_or_else(|_| serde_json::json!({}));
    let wrapped = wrap_with_schema(value);
    let sorted = sort_json_value(wrapped);
    serde_json::to_string_pretty(&sorted).unwrap_or_else(|_| fallback.to_string())
}

fn wrap_with_schema(value: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "schemaVersion": CLI_SCHEMA_VERSION,
        "data": value
    })
}

fn sort_json_value(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Array(values) => {
            serde_json::Value::Array(values.into_iter().map(sort_json_value).collect())
        }
        serde_json::Value::Object(entries) => {
            let mut pairs: Vec<_> = entries.into_iter().collect();
            pairs.sort_by(|a, b| a.0.cmp(&b.0));
            let mut mapped = serde_json::Map::new();
            for (key, value) in pairs {
                mapped.insert(key, sort_json_value(value));
            }
            serde_json::Value::Object(mapped)
        }
        other => other,
    }
}
