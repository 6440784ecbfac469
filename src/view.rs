use serde::Serialize;

use crate::breakdown::{self, OpponentOutcomeCount, StrokeCount, YearWinRate};
use crate::dataset::{Dataset, MatchRecord};
use crate::filter::MatchFilter;
use crate::kpi::Kpis;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView<'a> {
    pub filter: MatchFilter,
    pub kpis: Kpis,
    pub win_trend: Vec<YearWinRate>,
    pub opponent_outcomes: Vec<OpponentOutcomeCount>,
    pub stroke_mix: Vec<StrokeCount>,
    pub rows: Vec<&'a MatchRecord>,
}

impl DashboardView<'_> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn stroke_total(&self) -> usize {
        self.stroke_mix.iter().map(|s| s.count).sum()
    }
}

pub fn render<'a>(dataset: &'a Dataset, filter: &MatchFilter) -> DashboardView<'a> {
    let rows = filter.apply(&dataset.records);
    DashboardView {
        filter: filter.clone(),
        kpis: Kpis::compute(&rows),
        win_trend: breakdown::win_rate_by_year(&rows),
        opponent_outcomes: breakdown::outcomes_by_opponent(&rows),
        stroke_mix: breakdown::stroke_frequency(&rows),
        rows,
    }
}
