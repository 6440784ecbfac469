use serde::{Deserialize, Serialize};

use crate::dataset::{MatchRecord, round_to};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Kpis {
    pub match_count: usize,
    // Percent, one decimal.
    pub win_rate_pct: f64,
    // Percent, two decimals.
    pub avg_key_point_rate: f64,
}

impl Kpis {
    pub fn compute(rows: &[&MatchRecord]) -> Self {
        let match_count = rows.len();
        if match_count == 0 {
            return Self::default();
        }

        let wins = rows.iter().filter(|r| r.is_win()).count();
        let key_sum: f64 = rows.iter().map(|r| r.key_point_rate).sum();
        let n = match_count as f64;

        Self {
            match_count,
            win_rate_pct: round_to(wins as f64 / n * 100.0, 1),
            avg_key_point_rate: round_to(key_sum / n, 2),
        }
    }
}
