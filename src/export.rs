use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::view::DashboardView;

pub struct ExportReport {
    pub path: PathBuf,
    pub trend_rows: usize,
    pub opponent_rows: usize,
    pub stroke_rows: usize,
    pub match_rows: usize,
}

enum CellValue {
    Text(String),
    Number(f64),
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<usize> for CellValue {
    fn from(value: usize) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<u16> for CellValue {
    fn from(value: u16) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<u8> for CellValue {
    fn from(value: u8) -> Self {
        CellValue::Number(value as f64)
    }
}

pub fn default_export_path(dir: &Path) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("tt_dashboard_{stamp}.xlsx"))
}

pub fn export_view(path: &Path, view: &DashboardView<'_>) -> Result<ExportReport> {
    let filter = &view.filter;
    let years = filter
        .years
        .iter()
        .map(|y| y.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let tiers = filter
        .tiers
        .iter()
        .map(|t| t.label())
        .collect::<Vec<_>>()
        .join(", ");

    let summary_rows: Vec<Vec<CellValue>> = vec![
        vec!["Field".into(), "Value".into()],
        vec!["Player".into(), filter.player.clone().into()],
        vec!["Years".into(), years.into()],
        vec!["Tiers".into(), tiers.into()],
        vec!["Matches".into(), view.kpis.match_count.into()],
        vec!["Win rate (%)".into(), view.kpis.win_rate_pct.into()],
        vec![
            "Key point success (%)".into(),
            view.kpis.avg_key_point_rate.into(),
        ],
    ];

    let mut trend_rows: Vec<Vec<CellValue>> = vec![vec![
        "Year".into(),
        "Matches".into(),
        "Wins".into(),
        "Win rate (%)".into(),
    ]];
    for row in &view.win_trend {
        trend_rows.push(vec![
            row.year.into(),
            row.matches.into(),
            row.wins.into(),
            row.win_rate_pct.into(),
        ]);
    }

    let mut opponent_rows: Vec<Vec<CellValue>> =
        vec![vec!["Opponent".into(), "Outcome".into(), "Matches".into()]];
    for row in &view.opponent_outcomes {
        opponent_rows.push(vec![
            row.opponent.clone().into(),
            row.outcome.label().into(),
            row.matches.into(),
        ]);
    }

    let mut stroke_rows: Vec<Vec<CellValue>> = vec![vec!["Stroke".into(), "Count".into()]];
    for row in &view.stroke_mix {
        stroke_rows.push(vec![row.stroke.label().into(), row.count.into()]);
    }

    let mut match_rows: Vec<Vec<CellValue>> = vec![vec![
        "Player".into(),
        "Year".into(),
        "Tier".into(),
        "Opponent".into(),
        "Games".into(),
        "Points for".into(),
        "Points against".into(),
        "Key point success (%)".into(),
        "Main stroke".into(),
        "Outcome".into(),
    ]];
    for record in &view.rows {
        match_rows.push(vec![
            record.player.clone().into(),
            record.year.into(),
            record.tier.label().into(),
            record.opponent.clone().into(),
            record.games_played.into(),
            record.points_for.into(),
            record.points_against.into(),
            record.key_point_rate.into(),
            record.stroke.label().into(),
            record.outcome.label().into(),
        ]);
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Summary")?;
        write_rows(sheet, &summary_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("WinTrend")?;
        write_rows(sheet, &trend_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Opponents")?;
        write_rows(sheet, &opponent_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Strokes")?;
        write_rows(sheet, &stroke_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Matches")?;
        write_rows(sheet, &match_rows)?;
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed creating {}", parent.display()))?;
    }
    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        path: path.to_path_buf(),
        trend_rows: trend_rows.len().saturating_sub(1),
        opponent_rows: opponent_rows.len().saturating_sub(1),
        stroke_rows: stroke_rows.len().saturating_sub(1),
        match_rows: match_rows.len().saturating_sub(1),
    })
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<CellValue>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            let (r, c) = (row_idx as u32, col_idx as u16);
            let written = match value {
                CellValue::Text(text) => worksheet.write_string(r, c, text),
                CellValue::Number(num) => worksheet.write_number(r, c, *num),
            };
            written.with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
