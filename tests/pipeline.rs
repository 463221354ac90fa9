use event_analyzer::buckets::TimeOfDay;
use event_analyzer::dashboard::{render_category_analytics_at, ChartSurfaces};
use event_analyzer::parse::{parse_timestamp, read_category, MalformedMode};
use event_analyzer::report::build_report;
use event_analyzer::surface::RecordingSurface;
use event_analyzer::AnalyticsError;
use std::f64::consts::TAU;

const RUNS: &str = r#"{
  "name": "Ran",
  "color": "4",
  "events": {
    "-K1": { "time": "2024-01-07 06:10" },
    "-K2": { "time": "2024-01-08 06:40" },
    "-K3": { "time": "2024-01-08 18:05" },
    "-K4": { "time": "2024-01-10 12:00" },
    "-K5": { "time": "2024-01-13 23:30" }
  }
}"#;

#[test]
fn json_category_through_all_three_charts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ran.json");
    std::fs::write(&path, RUNS).unwrap();

    let load = read_category(&path, MalformedMode::Strict).unwrap();
    let category = load.category;
    let now = parse_timestamp("2024-01-14 08:00").unwrap();

    let mut stats = RecordingSurface::new(400.0, 200.0).with_pixel_ratio(2.0, 1.0);
    let mut tod = RecordingSurface::new(300.0, 200.0);
    let mut dow = RecordingSurface::new(350.0, 200.0);
    let surfaces = ChartSurfaces { stats: &mut stats, time_of_day: &mut tod, day_of_week: &mut dow };
    let analytics = render_category_analytics_at(&category, category.color.rgb(), surfaces, now).unwrap();

    // newest-first gaps: 3d 11h30m, 1d 17h55m, 11h25m, 1d 0h30m
    assert_eq!(analytics.intervals.recent.to_string(), "8 hours");
    assert_eq!(analytics.intervals.max.to_string(), "3 days");
    assert_eq!(analytics.intervals.min.to_string(), "11 hours");
    assert_eq!(analytics.intervals.avg.to_string(), "2 days");

    let tod_hist = analytics.buckets.time_of_day;
    assert_eq!(tod_hist.count(TimeOfDay::Morning), 2);
    assert_eq!(tod_hist.count(TimeOfDay::Afternoon), 1);
    assert_eq!(tod_hist.count(TimeOfDay::Evening), 2);
    assert_eq!(tod_hist.count(TimeOfDay::Night), 0);
    assert_eq!(analytics.buckets.day_of_week.counts.iter().sum::<u64>(), 5);
    assert_eq!(analytics.buckets.day_of_week.max_day, 1);

    assert_eq!(stats.backing_size(), (800.0, 400.0));
    let sweep: f64 = tod.wedges().iter().map(|(w, _)| w.sweep()).sum();
    assert!((sweep - TAU).abs() < 1e-9);
    assert_eq!(dow.rects().len(), 7);

    let report = build_report(&category, Some(&analytics), now, load.malformed);
    assert_eq!(report.max_day.as_deref(), Some("Monday"));
    assert_eq!(report.entries[0], "January 13 11:30 pm");
}

#[test]
fn empty_category_is_not_rendered() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.json");
    std::fs::write(&path, r#"{"name":"Called mom","color":"1"}"#).unwrap();
    let category = read_category(&path, MalformedMode::Strict).unwrap().category;

    let mut a = RecordingSurface::new(400.0, 200.0);
    let mut b = RecordingSurface::new(300.0, 200.0);
    let mut c = RecordingSurface::new(350.0, 200.0);
    let surfaces = ChartSurfaces { stats: &mut a, time_of_day: &mut b, day_of_week: &mut c };
    let err = render_category_analytics_at(&category, category.color.rgb(), surfaces, parse_timestamp("2024-01-14 08:00").unwrap())
        .unwrap_err();
    assert!(matches!(&err, AnalyticsError::NoEvents { category } if category == "Called mom"));
    assert!(a.commands().is_empty());
}
