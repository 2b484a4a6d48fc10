//! UI selections persisted across sessions.
//!
//! Values live in a [`KeyValueStore`] under fixed string keys. Write
//! failures are logged and never abort the command that caused them.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use clap::ValueEnum;
use planner_id::{PeriodId, ProjectId};
use planner_model::Period;
use tracing::warn;

use crate::storage::KeyValueStore;

pub const FORM_TYPE_KEY: &str = "formType";
pub const ACTIVE_TAB_KEY: &str = "activeTab";
pub const ACTIVE_VIEW_TAB_KEY: &str = "activeViewTab";
pub const SELECTED_PERIOD_KEY: &str = "selectedPeriod";
pub const EXPANDED_PROJECTS_KEY: &str = "expandedProjects";

/// Which create form was last open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FormType {
    #[default]
    Period,
    Project,
    Contributor,
}

/// Top-level tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ActiveTab {
    #[default]
    Form,
    View,
}

/// Sub-tab of the view tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ViewTab {
    #[default]
    Projects,
    Engineers,
}

macro_rules! stored_enum {
    ($name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $value,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok(Self::$variant),)+
                    other => Err(format!("unknown {}: {other}", stringify!($name))),
                }
            }
        }
    };
}

stored_enum!(FormType {
    Period => "period",
    Project => "project",
    Contributor => "contributor",
});

stored_enum!(ActiveTab {
    Form => "form",
    View => "view",
});

stored_enum!(ViewTab {
    Projects => "projects",
    Engineers => "engineers",
});

/// Persisted UI selections over a key-value store.
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for Preferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preferences").finish_non_exhaustive()
    }
}

impl Preferences {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn form_type(&self) -> FormType {
        self.read_parsed(FORM_TYPE_KEY).unwrap_or_default()
    }

    pub fn set_form_type(&self, form_type: FormType) {
        self.write(FORM_TYPE_KEY, form_type.as_str());
    }

    pub fn active_tab(&self) -> ActiveTab {
        self.read_parsed(ACTIVE_TAB_KEY).unwrap_or_default()
    }

    pub fn set_active_tab(&self, tab: ActiveTab) {
        self.write(ACTIVE_TAB_KEY, tab.as_str());
    }

    pub fn view_tab(&self) -> ViewTab {
        self.read_parsed(ACTIVE_VIEW_TAB_KEY).unwrap_or_default()
    }

    pub fn set_view_tab(&self, tab: ViewTab) {
        self.write(ACTIVE_VIEW_TAB_KEY, tab.as_str());
    }

    /// The stored period, whether or not it still exists.
    pub fn saved_period(&self) -> Option<PeriodId> {
        self.read_parsed(SELECTED_PERIOD_KEY)
    }

    pub fn set_selected_period(&self, period_id: PeriodId) {
        self.write(SELECTED_PERIOD_KEY, &period_id.to_string());
    }

    /// Pick the period to show.
    ///
    /// The stored period wins if it is still listed. Otherwise the first
    /// period is chosen and stored. With no periods there is no selection.
    pub fn select_period(&self, periods: &[Period]) -> Option<PeriodId> {
        if let Some(saved) = self.saved_period() {
            if periods.iter().any(|p| p.period_id == saved) {
                return Some(saved);
            }
        }

        let first = periods.first()?.period_id;
        self.set_selected_period(first);
        Some(first)
    }

    /// Projects to show expanded.
    ///
    /// A missing, empty or unparsable stored list expands every project in
    /// `all` and stores that list.
    pub fn expanded_projects(&self, all: &[ProjectId]) -> BTreeSet<ProjectId> {
        let saved = self
            .read(EXPANDED_PROJECTS_KEY)
            .and_then(|raw| match serde_json::from_str::<Vec<ProjectId>>(&raw) {
                Ok(ids) => Some(ids),
                Err(e) => {
                    warn!(error = %e, "Ignoring unparsable expanded projects");
                    None
                }
            })
            .filter(|ids| !ids.is_empty());

        match saved {
            Some(ids) => ids.into_iter().collect(),
            None => {
                let expanded: BTreeSet<ProjectId> = all.iter().copied().collect();
                self.store_expanded(&expanded);
                expanded
            }
        }
    }

    /// Flip a project's expanded state and persist it. Returns the new state.
    pub fn toggle_project(&self, project_id: ProjectId, all: &[ProjectId]) -> bool {
        let mut expanded = self.expanded_projects(all);
        let now_expanded = if expanded.remove(&project_id) {
            false
        } else {
            expanded.insert(project_id);
            true
        };

        self.store_expanded(&expanded);
        now_expanded
    }

    fn store_expanded(&self, expanded: &BTreeSet<ProjectId>) {
        let ids: Vec<ProjectId> = expanded.iter().copied().collect();
        match serde_json::to_string(&ids) {
            Ok(raw) => self.write(EXPANDED_PROJECTS_KEY, &raw),
            Err(e) => warn!(error = %e, "Failed to encode expanded projects"),
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Failed to read preference");
                None
            }
        }
    }

    fn read_parsed<T: FromStr>(&self, key: &str) -> Option<T> {
        self.read(key).and_then(|raw| raw.parse().ok())
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            warn!(key, error = %e, "Failed to save preference");
        }
    }
}
