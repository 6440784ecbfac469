use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, MatchRecord, Tier, players_sorted};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFilter {
    pub player: String,
    pub years: Vec<u16>,
    pub tiers: Vec<Tier>,
}

impl MatchFilter {
    pub fn new(player: impl Into<String>, years: Vec<u16>, tiers: Vec<Tier>) -> Self {
        Self {
            player: player.into(),
            years,
            tiers,
        }
    }

    pub fn defaults_for(dataset: &Dataset) -> Self {
        let player = players_sorted()
            .first()
            .map(|p| p.to_string())
            .unwrap_or_default();
        let years = dataset.years();
        let recent = years[years.len().saturating_sub(2)..].to_vec();
        Self {
            player,
            years: recent,
            tiers: dataset.tiers(),
        }
    }

    pub fn matches(&self, record: &MatchRecord) -> bool {
        record.player == self.player
            && self.years.contains(&record.year)
            && self.tiers.contains(&record.tier)
    }

    pub fn apply<'a, I>(&self, records: I) -> Vec<&'a MatchRecord>
    where
        I: IntoIterator<Item = &'a MatchRecord>,
    {
        if self.years.is_empty() || self.tiers.is_empty() {
            return Vec::new();
        }
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}
