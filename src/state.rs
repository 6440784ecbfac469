use std::collections::VecDeque;
use std::time::Instant;

use crate::dataset::{Dataset, Tier, players_sorted};
use crate::filter::MatchFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Player,
    Years,
    Tiers,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub focus: Focus,
    pub players: Vec<&'static str>,
    pub year_options: Vec<u16>,
    pub tier_options: Vec<Tier>,
    pub player_cursor: usize,
    pub year_cursor: usize,
    pub tier_cursor: usize,
    pub selected_player: usize,
    pub selected_years: Vec<u16>,
    pub selected_tiers: Vec<Tier>,
    pub show_raw: bool,
    pub raw_scroll: u16,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
    pub export: ExportState,
}

impl AppState {
    pub fn new(dataset: &Dataset) -> Self {
        let defaults = MatchFilter::defaults_for(dataset);
        let players = players_sorted();
        let selected_player = players
            .iter()
            .position(|p| *p == defaults.player)
            .unwrap_or(0);

        let mut state = Self {
            focus: Focus::Player,
            players,
            year_options: dataset.years(),
            tier_options: dataset.tiers(),
            player_cursor: selected_player,
            year_cursor: 0,
            tier_cursor: 0,
            selected_player,
            selected_years: defaults.years,
            selected_tiers: defaults.tiers,
            show_raw: false,
            raw_scroll: 0,
            help_overlay: false,
            logs: VecDeque::new(),
            export: ExportState::new(),
        };
        let seed = dataset
            .seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        state.push_log(format!(
            "[INFO] Generated {} matches (seed {seed})",
            dataset.len()
        ));
        state
    }

    pub fn selected_player_name(&self) -> &str {
        self.players
            .get(self.selected_player)
            .copied()
            .unwrap_or_default()
    }

    /// Current selection as a filter. Years and tiers follow option order so
    /// the rendered view does not depend on click order.
    pub fn filter(&self) -> MatchFilter {
        let years = self
            .year_options
            .iter()
            .copied()
            .filter(|y| self.selected_years.contains(y))
            .collect();
        let tiers = self
            .tier_options
            .iter()
            .copied()
            .filter(|t| self.selected_tiers.contains(t))
            .collect();
        MatchFilter::new(self.selected_player_name(), years, tiers)
    }

    pub fn cycle_focus_next(&mut self) {
        self.focus = match self.focus {
            Focus::Player => Focus::Years,
            Focus::Years => Focus::Tiers,
            Focus::Tiers => Focus::Player,
        };
    }

    pub fn cycle_focus_prev(&mut self) {
        self.focus = match self.focus {
            Focus::Player => Focus::Tiers,
            Focus::Years => Focus::Player,
            Focus::Tiers => Focus::Years,
        };
    }

    fn focused_len(&self) -> usize {
        match self.focus {
            Focus::Player => self.players.len(),
            Focus::Years => self.year_options.len(),
            Focus::Tiers => self.tier_options.len(),
        }
    }

    fn focused_cursor(&mut self) -> &mut usize {
        match self.focus {
            Focus::Player => &mut self.player_cursor,
            Focus::Years => &mut self.year_cursor,
            Focus::Tiers => &mut self.tier_cursor,
        }
    }

    pub fn select_next(&mut self) {
        let total = self.focused_len();
        let cursor = self.focused_cursor();
        if total == 0 {
            *cursor = 0;
            return;
        }
        *cursor = (*cursor + 1) % total;
    }

    pub fn select_prev(&mut self) {
        let total = self.focused_len();
        let cursor = self.focused_cursor();
        if total == 0 {
            *cursor = 0;
            return;
        }
        if *cursor == 0 {
            *cursor = total - 1;
        } else {
            *cursor -= 1;
        }
    }

    // Picks the player under the cursor, or flips the year/tier under it.
    pub fn activate(&mut self) {
        match self.focus {
            Focus::Player => {
                if self.player_cursor >= self.players.len() {
                    return;
                }
                self.selected_player = self.player_cursor;
                self.raw_scroll = 0;
                let name = self.selected_player_name().to_string();
                self.push_log(format!("[INFO] Player: {name}"));
            }
            Focus::Years => {
                let Some(year) = self.year_options.get(self.year_cursor).copied() else {
                    return;
                };
                let on = toggle(&mut self.selected_years, year);
                self.raw_scroll = 0;
                self.push_log(format!(
                    "[INFO] Year {year} {}",
                    if on { "on" } else { "off" }
                ));
            }
            Focus::Tiers => {
                let Some(tier) = self.tier_options.get(self.tier_cursor).copied() else {
                    return;
                };
                let on = toggle(&mut self.selected_tiers, tier);
                self.raw_scroll = 0;
                self.push_log(format!(
                    "[INFO] Tier {} {}",
                    tier.label(),
                    if on { "on" } else { "off" }
                ));
            }
        }
    }

    pub fn select_all(&mut self) {
        match self.focus {
            Focus::Player => return,
            Focus::Years => self.selected_years = self.year_options.clone(),
            Focus::Tiers => self.selected_tiers = self.tier_options.clone(),
        }
        self.raw_scroll = 0;
        self.push_log(format!("[INFO] All {} selected", focus_label(self.focus)));
    }

    pub fn clear_selection(&mut self) {
        match self.focus {
            Focus::Player => return,
            Focus::Years => self.selected_years.clear(),
            Focus::Tiers => self.selected_tiers.clear(),
        }
        self.raw_scroll = 0;
        self.push_log(format!("[INFO] {} cleared", focus_label(self.focus)));
    }

    pub fn is_year_selected(&self, year: u16) -> bool {
        self.selected_years.contains(&year)
    }

    pub fn is_tier_selected(&self, tier: Tier) -> bool {
        self.selected_tiers.contains(&tier)
    }

    pub fn toggle_raw(&mut self) {
        self.show_raw = !self.show_raw;
        self.raw_scroll = 0;
    }

    pub fn scroll_raw_down(&mut self, max_scroll: u16, step: u16) {
        self.raw_scroll = self.raw_scroll.saturating_add(step).min(max_scroll);
    }

    pub fn scroll_raw_up(&mut self, step: u16) {
        self.raw_scroll = self.raw_scroll.saturating_sub(step);
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn maybe_clear_export(&mut self, now: Instant) {
        self.export.clear_if_done_for(now, 8);
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExportState {
    pub done: bool,
    pub failed: bool,
    pub path: Option<String>,
    pub message: String,
    pub last_updated: Option<Instant>,
}

impl ExportState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(&mut self, path: String, message: String, now: Instant) {
        self.done = true;
        self.failed = false;
        self.path = Some(path);
        self.message = message;
        self.last_updated = Some(now);
    }

    pub fn fail(&mut self, message: String, now: Instant) {
        self.done = true;
        self.failed = true;
        self.path = None;
        self.message = message;
        self.last_updated = Some(now);
    }

    pub fn clear_if_done_for(&mut self, now: Instant, keep_secs: u64) {
        if !self.done {
            return;
        }
        let Some(last) = self.last_updated else {
            return;
        };
        if now.duration_since(last).as_secs() >= keep_secs {
            *self = Self::new();
        }
    }
}

pub fn focus_label(focus: Focus) -> &'static str {
    match focus {
        Focus::Player => "Player",
        Focus::Years => "Years",
        Focus::Tiers => "Tiers",
    }
}

// Returns true when the value is selected afterwards.
fn toggle<T: PartialEq>(items: &mut Vec<T>, value: T) -> bool {
    if let Some(pos) = items.iter().position(|v| *v == value) {
        items.remove(pos);
        false
    } else {
        items.push(value);
        true
    }
}
