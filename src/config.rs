use std::env;
use std::path::PathBuf;

use crate::dataset::{DEFAULT_ROWS, DEFAULT_SEED, Dataset, ScalarDraws};

const MAX_ROWS: usize = 100_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub seed: u64,
    pub rows: usize,
    pub scalar_draws: ScalarDraws,
    pub export_dir: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            rows: DEFAULT_ROWS,
            scalar_draws: ScalarDraws::PerRow,
            export_dir: PathBuf::from("."),
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|val| !val.trim().is_empty());

        let seed = get("TT_SEED")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(defaults.seed);
        let rows = get("TT_ROWS")
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(defaults.rows)
            .clamp(1, MAX_ROWS);
        let scalar_draws = get("TT_SCALAR_DRAWS")
            .and_then(|val| ScalarDraws::parse(&val))
            .unwrap_or(defaults.scalar_draws);
        let export_dir = get("TT_EXPORT_DIR")
            .map(|val| PathBuf::from(val.trim()))
            .unwrap_or(defaults.export_dir);

        Self {
            seed,
            rows,
            scalar_draws,
            export_dir,
        }
    }

    pub fn build_dataset(&self) -> Dataset {
        Dataset::seeded(self.seed, self.rows, self.scalar_draws)
    }
}
