use std::collections::BTreeMap;
use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Clear, Dataset as ChartDataset,
    GraphType, Paragraph, Row, Table,
};

use tt_dashboard::config::DashboardConfig;
use tt_dashboard::dataset::{Dataset, Outcome};
use tt_dashboard::export;
use tt_dashboard::state::{focus_label, AppState, Focus};
use tt_dashboard::view::{self, DashboardView};

const RAW_PAGE: u16 = 10;
// Widest stroke label is five CJK cells plus a gap.
const STROKE_LABEL_WIDTH: usize = 11;

const STROKE_COLORS: [Color; 7] = [
    Color::Cyan,
    Color::LightYellow,
    Color::LightMagenta,
    Color::LightRed,
    Color::LightBlue,
    Color::LightGreen,
    Color::Yellow,
];

struct App {
    state: AppState,
    dataset: Dataset,
    config: DashboardConfig,
    should_quit: bool,
}

impl App {
    fn new(config: DashboardConfig) -> Self {
        let dataset = config.build_dataset();
        let state = AppState::new(&dataset);
        Self {
            state,
            dataset,
            config,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => self.state.cycle_focus_next(),
            KeyCode::BackTab => self.state.cycle_focus_prev(),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char(' ') | KeyCode::Enter => self.state.activate(),
            KeyCode::Char('a') => self.state.select_all(),
            KeyCode::Char('c') => self.state.clear_selection(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.state.toggle_raw(),
            KeyCode::PageDown => {
                let max = self.raw_row_count().saturating_sub(1);
                self.state.scroll_raw_down(max, RAW_PAGE);
            }
            KeyCode::PageUp => self.state.scroll_raw_up(RAW_PAGE),
            KeyCode::Char('x') | KeyCode::Char('X') => self.export_current(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn raw_row_count(&self) -> u16 {
        let filter = self.state.filter();
        let rows = filter.apply(&self.dataset.records).len();
        rows.min(u16::MAX as usize) as u16
    }

    fn export_current(&mut self) {
        let filter = self.state.filter();
        let view = view::render(&self.dataset, &filter);
        let path = export::default_export_path(&self.config.export_dir);
        let now = Instant::now();
        match export::export_view(&path, &view) {
            Ok(report) => {
                let shown = report.path.display().to_string();
                let message = format!(
                    "{} matches, {} years, {} opponent rows",
                    report.match_rows, report.trend_rows, report.opponent_rows
                );
                self.state
                    .push_log(format!("[INFO] Exported {shown} ({message})"));
                self.state.export.finish(shown, message, now);
            }
            Err(err) => {
                self.state.push_log(format!("[WARN] Export failed: {err:#}"));
                self.state.export.fail(format!("{err:#}"), now);
            }
        }
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = DashboardConfig::from_env();
    let mut app = App::new(config);

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        app.state.maybe_clear_export(Instant::now());

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let filter = app.state.filter();
    let view = view::render(&app.dataset, &filter);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(app))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(40)])
        .split(chunks[1]);

    render_sidebar(frame, body[0], &app.state);
    render_main(frame, body[1], &app.state, &view);

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text());
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(app: &App) -> String {
    let seed = app
        .dataset
        .seed
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string());
    let title = format!(
        "TT CAREER STATS | {} | {} matches | seed {seed}",
        app.state.selected_player_name(),
        app.dataset.len()
    );
    let export = if app.state.export.done {
        if app.state.export.failed {
            " | export failed".to_string()
        } else {
            format!(
                " | saved {}",
                app.state.export.path.as_deref().unwrap_or("-")
            )
        }
    } else {
        String::new()
    };
    let line1 = format!("  (o)  {title}{export}");
    let line2 = "   |".to_string();
    format!("{line1}\n{line2}")
}

fn footer_text() -> String {
    "Tab Focus | j/k/↑/↓ Move | Space/Enter Select | a All | c Clear | r Raw | PgUp/PgDn Scroll | x Export | ? Help | q Quit".to_string()
}

fn render_sidebar(frame: &mut Frame, area: Rect, state: &AppState) {
    let years_height = state.year_options.len() as u16 + 2;
    let tiers_height = state.tier_options.len() as u16 + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),
            Constraint::Length(years_height),
            Constraint::Length(tiers_height),
            Constraint::Length(3),
        ])
        .split(area);

    render_player_list(frame, chunks[0], state);

    let year_lines: Vec<Line> = state
        .year_options
        .iter()
        .enumerate()
        .map(|(idx, year)| {
            option_line(
                &year.to_string(),
                state.is_year_selected(*year),
                state.focus == Focus::Years && idx == state.year_cursor,
            )
        })
        .collect();
    let years = Paragraph::new(year_lines).block(focus_block(state, Focus::Years));
    frame.render_widget(years, chunks[1]);

    let tier_lines: Vec<Line> = state
        .tier_options
        .iter()
        .enumerate()
        .map(|(idx, tier)| {
            option_line(
                tier.label(),
                state.is_tier_selected(*tier),
                state.focus == Focus::Tiers && idx == state.tier_cursor,
            )
        })
        .collect();
    let tiers = Paragraph::new(tier_lines).block(focus_block(state, Focus::Tiers));
    frame.render_widget(tiers, chunks[2]);

    let raw = Paragraph::new(format!(
        "[{}] Show raw data (r)",
        if state.show_raw { "x" } else { " " }
    ))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(raw, chunks[3]);
}

fn render_player_list(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = focus_block(state, Focus::Player);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let visible = inner.height as usize;
    let (start, end) = visible_range(state.player_cursor, state.players.len(), visible);
    let lines: Vec<Line> = (start..end)
        .map(|idx| {
            let marker = if idx == state.selected_player { "(•)" } else { "( )" };
            let cursor = state.focus == Focus::Player && idx == state.player_cursor;
            let prefix = if cursor { "> " } else { "  " };
            let style = if cursor {
                Style::default().fg(Color::White).bg(Color::DarkGray)
            } else if idx == state.selected_player {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(Span::styled(
                format!("{prefix}{marker} {}", state.players[idx]),
                style,
            ))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn focus_block(state: &AppState, focus: Focus) -> Block<'static> {
    let style = if state.focus == focus {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .title(focus_label(focus))
        .borders(Borders::ALL)
        .border_style(style)
}

fn option_line(label: &str, selected: bool, cursor: bool) -> Line<'static> {
    let prefix = if cursor { "> " } else { "  " };
    let check = if selected { "[x]" } else { "[ ]" };
    let style = if cursor {
        Style::default().fg(Color::White).bg(Color::DarkGray)
    } else {
        Style::default()
    };
    Line::from(Span::styled(format!("{prefix}{check} {label}"), style))
}

fn render_main(frame: &mut Frame, area: Rect, state: &AppState, view: &DashboardView<'_>) {
    let constraints = if state.show_raw {
        vec![
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(10),
            Constraint::Percentage(40),
        ]
    } else {
        vec![
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(12),
        ]
    };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_kpis(frame, rows[0], view);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);
    render_win_trend(frame, charts[0], view);
    render_stroke_mix(frame, charts[1], view);
    render_opponents(frame, rows[2], view);

    if state.show_raw {
        render_raw_table(frame, rows[3], state, view);
    }
}

fn render_kpis(frame: &mut Frame, area: Rect, view: &DashboardView<'_>) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let kpis = &view.kpis;
    let cells = [
        ("Matches", format!("{}", kpis.match_count)),
        ("Win rate", format!("{:.1}%", kpis.win_rate_pct)),
        ("Key point success", format!("{}%", kpis.avg_key_point_rate)),
    ];
    for (idx, (title, value)) in cells.into_iter().enumerate() {
        let metric = Paragraph::new(Span::styled(
            value,
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(metric, cols[idx]);
    }
}

fn render_win_trend(frame: &mut Frame, area: Rect, view: &DashboardView<'_>) {
    let block = Block::default()
        .title("Win rate by year")
        .borders(Borders::ALL);
    if view.win_trend.is_empty() {
        render_empty(frame, area, block);
        return;
    }

    let points: Vec<(f64, f64)> = view
        .win_trend
        .iter()
        .map(|row| (row.year as f64, row.win_rate_pct))
        .collect();
    let first = points.first().map(|p| p.0).unwrap_or_default();
    let last = points.last().map(|p| p.0).unwrap_or_default();
    let (x_min, x_max) = if first < last {
        (first, last)
    } else {
        (first - 1.0, last + 1.0)
    };

    let datasets = vec![
        ChartDataset::default()
            .name("win %")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Green))
            .data(&points),
        ChartDataset::default()
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::LightGreen))
            .data(&points),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([x_min, x_max])
                .labels(vec![
                    Span::raw(format!("{x_min:.0}")),
                    Span::raw(format!("{x_max:.0}")),
                ]),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, 100.0])
                .labels(vec![Span::raw("0"), Span::raw("50"), Span::raw("100")]),
        );
    frame.render_widget(chart, area);
}

fn render_stroke_mix(frame: &mut Frame, area: Rect, view: &DashboardView<'_>) {
    let block = Block::default()
        .title("Scoring strokes")
        .borders(Borders::ALL);
    let total = view.stroke_total();
    if total == 0 {
        render_empty(frame, area, block);
        return;
    }

    let inner_width = block.inner(area).width as usize;
    let bar_width = inner_width.saturating_sub(24).max(4);
    let lines: Vec<Line> = view
        .stroke_mix
        .iter()
        .map(|row| {
            let share = row.count as f64 / total as f64;
            let filled = ((share * bar_width as f64).round() as usize).max(1);
            let color = STROKE_COLORS[(row.stroke as usize) % STROKE_COLORS.len()];
            let label = Span::raw(row.stroke.label());
            let pad = " ".repeat(STROKE_LABEL_WIDTH.saturating_sub(label.width()));
            Line::from(vec![
                label,
                Span::raw(pad),
                Span::styled("█".repeat(filled), Style::default().fg(color)),
                Span::raw(format!(" {:>5.1}% ({})", share * 100.0, row.count)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_opponents(frame: &mut Frame, area: Rect, view: &DashboardView<'_>) {
    let block = Block::default()
        .title(Line::from(vec![
            Span::raw("Head-to-head "),
            Span::styled("■ win ", Style::default().fg(Color::Blue)),
            Span::styled("■ loss", Style::default().fg(Color::Red)),
        ]))
        .borders(Borders::ALL);
    if view.opponent_outcomes.is_empty() {
        render_empty(frame, area, block);
        return;
    }

    let mut per_opponent: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for row in &view.opponent_outcomes {
        let entry = per_opponent.entry(row.opponent.as_str()).or_insert((0, 0));
        match row.outcome {
            Outcome::Win => entry.0 += row.matches as u64,
            Outcome::Loss => entry.1 += row.matches as u64,
        }
    }

    let mut chart = BarChart::default()
        .block(block)
        .bar_width(3)
        .bar_gap(0)
        .group_gap(2);
    for (opponent, (wins, losses)) in per_opponent {
        let win = Bar::default()
            .value(wins)
            .text_value(wins.to_string())
            .style(Style::default().fg(Color::Blue));
        let loss = Bar::default()
            .value(losses)
            .text_value(losses.to_string())
            .style(Style::default().fg(Color::Red));
        let group = BarGroup::default()
            .label(Line::from(abbreviate_name(opponent)))
            .bars(&[win, loss]);
        chart = chart.data(group);
    }
    frame.render_widget(chart, area);
}

fn render_raw_table(frame: &mut Frame, area: Rect, state: &AppState, view: &DashboardView<'_>) {
    let block = Block::default()
        .title(format!("Filtered matches ({})", view.rows.len()))
        .borders(Borders::ALL);
    if view.is_empty() {
        render_empty(frame, area, block);
        return;
    }

    // Header row plus borders.
    let visible = area.height.saturating_sub(3) as usize;
    let max_start = view.rows.len().saturating_sub(visible);
    let start = (state.raw_scroll as usize).min(max_start);

    let header = Row::new(vec![
        "Year", "Tier", "Opponent", "Games", "For", "Against", "Key %", "Stroke", "Result",
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = view
        .rows
        .iter()
        .skip(start)
        .take(visible)
        .map(|r| {
            let result_style = match r.outcome {
                Outcome::Win => Style::default().fg(Color::Blue),
                Outcome::Loss => Style::default().fg(Color::Red),
            };
            Row::new(vec![
                Cell::from(r.year.to_string()),
                Cell::from(r.tier.label()),
                Cell::from(r.opponent.clone()),
                Cell::from(r.games_played.to_string()),
                Cell::from(r.points_for.to_string()),
                Cell::from(r.points_against.to_string()),
                Cell::from(format!("{:.2}", r.key_point_rate)),
                Cell::from(r.stroke.label()),
                Cell::from(r.outcome.label()).style(result_style),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Length(11),
        Constraint::Length(19),
        Constraint::Length(6),
        Constraint::Length(4),
        Constraint::Length(8),
        Constraint::Length(7),
        Constraint::Length(11),
        Constraint::Length(6),
    ];
    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

fn render_empty(frame: &mut Frame, area: Rect, block: Block<'_>) {
    let empty = Paragraph::new("No matches for this selection")
        .style(Style::default().fg(Color::DarkGray))
        .block(block);
    frame.render_widget(empty, area);
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(2)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

// "Tomokazu Harimoto" -> "T.Hari"; keeps grouped bar labels inside two bars.
fn abbreviate_name(name: &str) -> String {
    let parts: Vec<&str> = name.split_whitespace().collect();
    match parts.as_slice() {
        [] => String::new(),
        [single] => single.chars().take(6).collect(),
        [first, .., last] => {
            let initial = first.chars().next().unwrap_or(' ');
            let tail: String = last.chars().take(4).collect();
            format!("{initial}.{tail}")
        }
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "TT Career Stats - Help",
        "",
        "Filters:",
        "  Tab / Shift-Tab  Cycle Player / Years / Tiers",
        "  j/k or ↑/↓       Move cursor",
        "  Space / Enter    Select player, toggle year or tier",
        "  a                Select all years/tiers",
        "  c                Clear years/tiers",
        "",
        "View:",
        "  r                Toggle raw table",
        "  PgUp / PgDn      Scroll raw table",
        "  x                Export selection to xlsx",
        "  ?                Toggle help",
        "  q                Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
