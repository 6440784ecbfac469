use tt_dashboard::dataset::{Dataset, ScalarDraws, Tier};
use tt_dashboard::state::{AppState, Focus};
use tt_dashboard::view;

fn fresh() -> (Dataset, AppState) {
    let ds = Dataset::seeded(42, 1800, ScalarDraws::PerRow);
    let state = AppState::new(&ds);
    (ds, state)
}

#[test]
fn starts_with_selector_defaults() {
    let (_, state) = fresh();
    assert_eq!(state.focus, Focus::Player);
    assert_eq!(state.selected_player_name(), "Dimitrij Ovtcharov");
    assert_eq!(state.player_cursor, state.selected_player);
    assert_eq!(state.selected_years, vec![2023, 2024]);
    assert_eq!(state.selected_tiers.len(), 5);
    assert!(!state.show_raw);
    assert_eq!(state.logs.len(), 1);
}

#[test]
fn focus_cycles_both_ways() {
    let (_, mut state) = fresh();
    state.cycle_focus_next();
    assert_eq!(state.focus, Focus::Years);
    state.cycle_focus_next();
    assert_eq!(state.focus, Focus::Tiers);
    state.cycle_focus_next();
    assert_eq!(state.focus, Focus::Player);
    state.cycle_focus_prev();
    assert_eq!(state.focus, Focus::Tiers);
}

#[test]
fn player_cursor_wraps_and_enter_selects() {
    let (_, mut state) = fresh();
    state.select_prev();
    assert_eq!(state.player_cursor, state.players.len() - 1);
    state.select_next();
    assert_eq!(state.player_cursor, 0);
    state.select_next();
    // Moving the cursor alone does not change the selection.
    assert_eq!(state.selected_player_name(), "Dimitrij Ovtcharov");
    state.activate();
    assert_eq!(state.selected_player_name(), "Mattias Falck");
    assert_eq!(state.filter().player, "Mattias Falck");
}

#[test]
fn toggling_years_keeps_option_order() {
    let (_, mut state) = fresh();
    state.cycle_focus_next();
    // Options are 2017..=2024; cursor 6 is 2023.
    for _ in 0..6 {
        state.select_next();
    }
    state.activate();
    assert_eq!(state.filter().years, vec![2024]);

    state.select_prev();
    state.activate();
    // 2022 was added after 2024 but the filter lists years ascending.
    assert_eq!(state.selected_years, vec![2024, 2022]);
    assert_eq!(state.filter().years, vec![2022, 2024]);
}

#[test]
fn clearing_tiers_empties_the_view() {
    let (ds, mut state) = fresh();
    state.focus = Focus::Tiers;
    state.clear_selection();
    assert!(state.selected_tiers.is_empty());

    let view = view::render(&ds, &state.filter());
    assert!(view.is_empty());
    assert_eq!(view.kpis.match_count, 0);

    state.select_all();
    assert_eq!(state.filter().tiers.len(), 5);
}

#[test]
fn select_all_and_clear_ignore_player_focus() {
    let (_, mut state) = fresh();
    let logs = state.logs.len();
    state.select_all();
    state.clear_selection();
    assert_eq!(state.selected_years, vec![2023, 2024]);
    assert_eq!(state.logs.len(), logs);
}

#[test]
fn tier_toggle_roundtrips() {
    let (_, mut state) = fresh();
    state.focus = Focus::Tiers;
    let tier = state.tier_options[0];
    state.activate();
    assert!(!state.is_tier_selected(tier));
    state.activate();
    assert!(state.is_tier_selected(tier));
    assert!(Tier::ALL.contains(&tier));
}

#[test]
fn raw_table_toggle_resets_scroll() {
    let (_, mut state) = fresh();
    state.toggle_raw();
    assert!(state.show_raw);
    state.scroll_raw_down(15, 10);
    state.scroll_raw_down(15, 10);
    assert_eq!(state.raw_scroll, 15);
    state.scroll_raw_up(20);
    assert_eq!(state.raw_scroll, 0);
    state.scroll_raw_down(15, 10);
    state.toggle_raw();
    assert!(!state.show_raw);
    assert_eq!(state.raw_scroll, 0);
}

#[test]
fn console_log_is_bounded() {
    let (_, mut state) = fresh();
    for i in 0..250 {
        state.push_log(format!("[INFO] line {i}"));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.back().map(String::as_str), Some("[INFO] line 249"));
}
