use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::dataset::{MatchRecord, Outcome, Stroke};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearWinRate {
    pub year: u16,
    pub matches: usize,
    pub wins: usize,
    pub win_rate_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentOutcomeCount {
    pub opponent: String,
    pub outcome: Outcome,
    pub matches: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrokeCount {
    pub stroke: Stroke,
    pub count: usize,
}

pub fn win_rate_by_year(rows: &[&MatchRecord]) -> Vec<YearWinRate> {
    let mut groups: BTreeMap<u16, (usize, usize)> = BTreeMap::new();
    for row in rows {
        let entry = groups.entry(row.year).or_insert((0, 0));
        entry.0 += 1;
        if row.is_win() {
            entry.1 += 1;
        }
    }

    groups
        .into_iter()
        .map(|(year, (matches, wins))| YearWinRate {
            year,
            matches,
            wins,
            win_rate_pct: wins as f64 / matches as f64 * 100.0,
        })
        .collect()
}

pub fn outcomes_by_opponent(rows: &[&MatchRecord]) -> Vec<OpponentOutcomeCount> {
    let mut groups: BTreeMap<(&str, Outcome), usize> = BTreeMap::new();
    for row in rows {
        *groups.entry((row.opponent.as_str(), row.outcome)).or_insert(0) += 1;
    }

    groups
        .into_iter()
        .map(|((opponent, outcome), matches)| OpponentOutcomeCount {
            opponent: opponent.to_string(),
            outcome,
            matches,
        })
        .collect()
}

// Most frequent first; ties keep vocabulary order.
pub fn stroke_frequency(rows: &[&MatchRecord]) -> Vec<StrokeCount> {
    let mut counts: HashMap<Stroke, usize> = HashMap::new();
    for row in rows {
        *counts.entry(row.stroke).or_insert(0) += 1;
    }

    let mut out: Vec<StrokeCount> = counts
        .into_iter()
        .map(|(stroke, count)| StrokeCount { stroke, count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then(a.stroke.cmp(&b.stroke)));
    out
}
