use proptest::prelude::*;

use tt_dashboard::breakdown::{outcomes_by_opponent, stroke_frequency, win_rate_by_year};
use tt_dashboard::dataset::{Dataset, MatchRecord, ScalarDraws, Tier};
use tt_dashboard::filter::MatchFilter;
use tt_dashboard::kpi::Kpis;
use tt_dashboard::view;

fn default_dataset() -> Dataset {
    Dataset::seeded(42, 1800, ScalarDraws::PerRow)
}

fn sun_yingsha_recent() -> MatchFilter {
    MatchFilter::new("孙颖莎", vec![2023, 2024], Tier::ALL.to_vec())
}

#[test]
fn defaults_pick_first_player_recent_years_all_tiers() {
    let ds = default_dataset();
    let filter = MatchFilter::defaults_for(&ds);
    assert_eq!(filter.player, "Dimitrij Ovtcharov");
    assert_eq!(filter.years, vec![2023, 2024]);
    assert_eq!(filter.tiers.len(), 5);
}

#[test]
fn filter_keeps_dataset_order() {
    let ds = default_dataset();
    let filter = sun_yingsha_recent();
    let rows = filter.apply(&ds.records);
    assert!(!rows.is_empty());

    let positions: Vec<usize> = rows
        .iter()
        .map(|r| {
            ds.records
                .iter()
                .position(|x| std::ptr::eq(x, *r))
                .expect("filtered row comes from the dataset")
        })
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    let expected = ds.records.iter().filter(|r| filter.matches(r)).count();
    assert_eq!(rows.len(), expected);
}

#[test]
fn filtering_twice_changes_nothing() {
    let ds = default_dataset();
    let filter = sun_yingsha_recent();
    let once = filter.apply(&ds.records);
    let twice = filter.apply(once.iter().copied());
    assert_eq!(once, twice);
}

#[test]
fn disjoint_years_give_empty_view_and_zero_kpis() {
    let ds = default_dataset();
    let filter = MatchFilter::new("孙颖莎", vec![1999, 2030], Tier::ALL.to_vec());
    let view = view::render(&ds, &filter);
    assert!(view.is_empty());
    assert_eq!(view.kpis, Kpis::default());
    assert!(view.win_trend.is_empty());
    assert!(view.opponent_outcomes.is_empty());
    assert!(view.stroke_mix.is_empty());
}

#[test]
fn empty_tier_selection_is_zero_not_an_error() {
    let ds = default_dataset();
    let filter = MatchFilter::new("孙颖莎", vec![2023, 2024], Vec::new());
    let view = view::render(&ds, &filter);
    assert_eq!(view.rows.len(), 0);
    assert_eq!(view.kpis.match_count, 0);
    assert_eq!(view.kpis.win_rate_pct, 0.0);
    assert_eq!(view.kpis.avg_key_point_rate, 0.0);
}

#[test]
fn unknown_player_selects_nothing() {
    let ds = default_dataset();
    let filter = MatchFilter::new("Nobody", vec![2023, 2024], Tier::ALL.to_vec());
    assert!(filter.apply(&ds.records).is_empty());
}

#[test]
fn overall_win_rate_matches_yearly_breakdown() {
    let ds = default_dataset();
    let filter = MatchFilter::new("孙颖莎", (2017..=2024).collect(), Tier::ALL.to_vec());
    let view = view::render(&ds, &filter);
    assert!(view.kpis.match_count > 0);

    let total: usize = view.win_trend.iter().map(|y| y.matches).sum();
    assert_eq!(total, view.kpis.match_count);

    let weighted_wins: f64 = view
        .win_trend
        .iter()
        .map(|y| y.win_rate_pct / 100.0 * y.matches as f64)
        .sum();
    let wins: usize = view.win_trend.iter().map(|y| y.wins).sum();
    assert!((weighted_wins - wins as f64).abs() < 1e-9);

    let overall = weighted_wins / view.kpis.match_count as f64 * 100.0;
    assert!((overall - view.kpis.win_rate_pct).abs() <= 0.05 + 1e-9);
}

#[test]
fn regression_selection_is_reproducible() {
    let filter = sun_yingsha_recent();

    let first_ds = default_dataset();
    let first = view::render(&first_ds, &filter);

    // Seed 42, 1800 rows, 孙颖莎 in 2023/2024 across all tiers.
    assert_eq!(first.kpis.match_count, 24);
    assert_eq!(first.kpis.win_rate_pct, 33.3);
    assert_eq!(first.kpis.avg_key_point_rate, 55.49);
    assert_eq!(first.opponent_outcomes.len(), 16);
    let trend: Vec<(u16, usize, usize)> = first
        .win_trend
        .iter()
        .map(|y| (y.year, y.matches, y.wins))
        .collect();
    assert_eq!(trend, vec![(2023, 13, 3), (2024, 11, 5)]);

    let second_ds = default_dataset();
    let second = view::render(&second_ds, &filter);
    assert_eq!(first.kpis, second.kpis);
    assert_eq!(first.rows, second.rows);

    let first_json = serde_json::to_string(&first).unwrap();
    let second_json = serde_json::to_string(&second).unwrap();
    assert_eq!(first_json, second_json);
}

#[test]
fn view_is_built_from_the_filtered_rows() {
    let ds = default_dataset();
    let filter = sun_yingsha_recent();
    let rows: Vec<&MatchRecord> = filter.apply(&ds.records);
    let view = view::render(&ds, &filter);

    assert_eq!(view.kpis, Kpis::compute(&rows));
    assert_eq!(view.win_trend, win_rate_by_year(&rows));
    assert_eq!(view.opponent_outcomes, outcomes_by_opponent(&rows));
    assert_eq!(view.stroke_mix, stroke_frequency(&rows));
    assert_eq!(view.stroke_total(), rows.len());

    let opponent_total: usize = view.opponent_outcomes.iter().map(|o| o.matches).sum();
    assert_eq!(opponent_total, rows.len());
    assert!(view.win_trend.iter().all(|y| y.year == 2023 || y.year == 2024));
}

proptest! {
    #[test]
    fn filter_is_idempotent_for_any_selection(
        seed in any::<u64>(),
        player_idx in 0usize..19,
        years in proptest::collection::vec(2015u16..2027, 0..6),
        tier_mask in 0u8..32,
    ) {
        let ds = Dataset::seeded(seed, 400, ScalarDraws::PerRow);
        let player = tt_dashboard::dataset::PLAYERS[player_idx];
        let tiers: Vec<Tier> = Tier::ALL
            .iter()
            .enumerate()
            .filter(|(i, _)| tier_mask & (1 << i) != 0)
            .map(|(_, t)| *t)
            .collect();
        let filter = MatchFilter::new(player, years, tiers);

        let once = filter.apply(&ds.records);
        let twice = filter.apply(once.iter().copied());
        prop_assert_eq!(&once, &twice);

        let kpis = Kpis::compute(&once);
        prop_assert_eq!(kpis.match_count, once.len());
        prop_assert!(kpis.win_rate_pct >= 0.0 && kpis.win_rate_pct <= 100.0);
        if once.is_empty() {
            prop_assert_eq!(kpis, Kpis::default());
        }
    }
}
