use std::time::{Duration, Instant};

use tt_dashboard::dataset::{Dataset, ScalarDraws, Tier};
use tt_dashboard::export::{default_export_path, export_view};
use tt_dashboard::filter::MatchFilter;
use tt_dashboard::state::ExportState;
use tt_dashboard::view;

#[test]
fn export_writes_workbook_for_selection() {
    let dir = tempfile::tempdir().unwrap();
    let ds = Dataset::seeded(42, 1800, ScalarDraws::PerRow);
    let filter = MatchFilter::new("孙颖莎", vec![2023, 2024], Tier::ALL.to_vec());
    let view = view::render(&ds, &filter);

    let path = dir.path().join("nested").join("selection.xlsx");
    let report = export_view(&path, &view).expect("export should succeed");

    assert_eq!(report.path, path);
    assert_eq!(report.match_rows, view.rows.len());
    assert_eq!(report.trend_rows, view.win_trend.len());
    assert_eq!(report.opponent_rows, view.opponent_outcomes.len());
    assert_eq!(report.stroke_rows, view.stroke_mix.len());
    let meta = std::fs::metadata(&path).unwrap();
    assert!(meta.len() > 0);
}

#[test]
fn empty_selection_still_exports_headers() {
    let dir = tempfile::tempdir().unwrap();
    let ds = Dataset::seeded(42, 200, ScalarDraws::PerRow);
    let filter = MatchFilter::new("孙颖莎", Vec::new(), Tier::ALL.to_vec());
    let view = view::render(&ds, &filter);

    let path = dir.path().join("empty.xlsx");
    let report = export_view(&path, &view).unwrap();
    assert_eq!(report.match_rows, 0);
    assert!(path.exists());
}

#[test]
fn default_path_is_timestamped_xlsx_in_dir() {
    let dir = tempfile::tempdir().unwrap();
    let path = default_export_path(dir.path());
    assert_eq!(path.parent(), Some(dir.path()));
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("tt_dashboard_"));
    assert!(name.ends_with(".xlsx"));
}

#[test]
fn export_status_clears_after_keep_window() {
    let start = Instant::now();
    let mut status = ExportState::new();
    status.finish("a.xlsx".to_string(), "ok".to_string(), start);

    status.clear_if_done_for(start + Duration::from_secs(3), 8);
    assert!(status.done);
    assert_eq!(status.path.as_deref(), Some("a.xlsx"));

    status.clear_if_done_for(start + Duration::from_secs(9), 8);
    assert!(!status.done);
    assert!(status.path.is_none());

    status.fail("disk full".to_string(), start);
    assert!(status.failed);
    assert!(status.path.is_none());
}
