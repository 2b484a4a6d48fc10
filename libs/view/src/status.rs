//! Schedule percentage and its display tier.

use serde::Serialize;

/// Display tier for a schedule percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTier {
    /// Nothing scheduled.
    Unscheduled,
    /// Below half of the estimate.
    Low,
    /// At least half, not yet complete.
    Partial,
    /// Estimate fully covered (or exceeded).
    Complete,
}

impl StatusTier {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage <= 0.0 {
            Self::Unscheduled
        } else if percentage < 50.0 {
            Self::Low
        } else if percentage < 100.0 {
            Self::Partial
        } else {
            Self::Complete
        }
    }

    /// Color family used when rendering this tier.
    pub fn color_name(&self) -> &'static str {
        match self {
            Self::Unscheduled => "red",
            Self::Low => "orange",
            Self::Partial => "yellow",
            Self::Complete => "green",
        }
    }
}

/// Scheduled weeks as a percentage of the estimate.
///
/// A zero estimate reads as 0% with nothing scheduled and 100% otherwise.
pub fn schedule_percentage(assigned_weeks: u32, estimated_weeks: u32) -> f64 {
    if estimated_weeks == 0 {
        return if assigned_weeks == 0 { 0.0 } else { 100.0 };
    }
    f64::from(assigned_weeks) / f64::from(estimated_weeks) * 100.0
}

/// Per-component badge: whether the estimate is covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleBadge {
    Scheduled,
    Unassigned,
}

impl ScheduleBadge {
    pub fn for_weeks(assigned_weeks: u32, estimated_weeks: u32) -> Self {
        if assigned_weeks >= estimated_weeks {
            Self::Scheduled
        } else {
            Self::Unassigned
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Unassigned => "Unassigned",
        }
    }
}
