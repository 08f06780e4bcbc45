//! Support for planner configuration options

use std::error::Error;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::event::KindFamily;

/// Where a task pulled into the current week lands
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PullTarget {
    /// On the day the plan is adjusted
    Today,
    /// On the first day from today to Sunday that has no pending task (today if every day is busy)
    FirstFreeDay,
}

impl Default for PullTarget {
    fn default() -> Self {
        PullTarget::Today
    }
}

/// Tunes the [`AdaptivePlanner`](crate::planner::AdaptivePlanner)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Kinds of tasks that are pulled forward first when the user has spare time
    pub preferred_kinds: KindFamily,
    pub pull_target: PullTarget,
}

impl PlannerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file. Missing fields keep their default values
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let config = match std::fs::File::open(path) {
            Err(err) => {
                return Err(format!("Unable to open file {:?}: {}", path, err).into());
            },
            Ok(file) => serde_json::from_reader(std::io::BufReader::new(file))?,
        };
        Ok(config)
    }

    pub fn with_preferred_kinds(mut self, preferred_kinds: KindFamily) -> Self {
        self.preferred_kinds = preferred_kinds;
        self
    }

    pub fn with_pull_target(mut self, pull_target: PullTarget) -> Self {
        self.pull_target = pull_target;
        self
    }
}
