use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::Parser;
use event_analyzer::dashboard::{render_category_analytics_at, CategoryAnalytics, ChartLayout, ChartSurfaces};
use event_analyzer::model::{Category, Rgb};
use event_analyzer::parse::{gather_category_files, parse_timestamp, read_category, MalformedMode};
use event_analyzer::png::PngSurface;
use event_analyzer::report::{build_report, sort_reports, CategoryReport};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Event Analyzer
/// Reads category event logs, summarizes the gaps between events, exports JSON, and renders charts. Can also run a GUI.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Category files (.json or one "YYYY-MM-DD HH:MM" per line) or directories to scan
    #[arg(required_unless_present = "gui")]
    inputs: Vec<PathBuf>,

    /// Reference time for recency and display, "YYYY-MM-DD HH:MM" (defaults to the local clock)
    #[arg(long, value_name = "DATETIME", env = "EVENT_ANALYZER_NOW")]
    now: Option<String>,

    /// Chart color as #RRGGBB; overrides each category's own color
    #[arg(long, value_name = "HEX")]
    color: Option<String>,

    /// Skip entries with malformed timestamps instead of failing
    #[arg(long)]
    skip_malformed: bool,

    /// Save the per-category report JSON to this path
    #[arg(long)]
    json_out: Option<PathBuf>,

    /// Render stats, time-of-day and day-of-week PNGs into this directory
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Device pixel ratio for PNG output
    #[arg(long, default_value_t = 1.0, env = "EVENT_ANALYZER_DPR", value_parser = parse_ratio)]
    dpr: f64,

    /// Launch GUI instead of CLI
    #[arg(long)]
    gui: bool,
}

fn parse_ratio(s: &str) -> Result<f64, String> {
    let ratio: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if ratio.is_finite() && ratio > 0.0 {
        Ok(ratio)
    } else {
        Err(format!("pixel ratio must be a positive number, got {s}"))
    }
}

fn slug(name: &str) -> String {
    let s: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let s = s.trim_matches('-').to_string();
    if s.is_empty() { "category".into() } else { s }
}

fn save_charts(dir: &Path, category: &Category, color: Rgb, layout: ChartLayout, now: NaiveDateTime) -> Result<CategoryAnalytics> {
    std::fs::create_dir_all(dir).with_context(|| format!("Creating {}", dir.display()))?;
    let surface = |(w, h): (u32, u32)| PngSurface::with_device_ratio(w, h, layout.device_pixel_ratio);
    let mut stats = surface(layout.stats);
    let mut tod = surface(layout.time_of_day);
    let mut dow = surface(layout.day_of_week);

    let surfaces = ChartSurfaces { stats: &mut stats, time_of_day: &mut tod, day_of_week: &mut dow };
    let analytics = render_category_analytics_at(category, color, surfaces, now)?;

    let base = slug(&category.name);
    for (suffix, png) in [("stats", &stats), ("time-of-day", &tod), ("day-of-week", &dow)] {
        let path = dir.join(format!("{base}-{suffix}.png"));
        png.save(&path).with_context(|| format!("Saving chart to {}", path.display()))?;
        info!("saved chart -> {}", path.display());
    }
    Ok(analytics)
}

fn print_summary(report: &CategoryReport) {
    println!("====== {} ======", report.name);
    println!("Events: {}", report.total_events);
    if report.malformed_entries > 0 {
        println!("Skipped malformed entries: {}", report.malformed_entries);
    }
    let Some(intervals) = &report.intervals else {
        println!("No events logged yet");
        return;
    };
    println!("Since last time: {}", intervals.recent.text);
    println!(
        "Between events: max {}, avg {}, min {}",
        intervals.max.text, intervals.avg.text, intervals.min.text
    );
    let tod: Vec<String> = report.time_of_day.iter().map(|b| format!("{} {}%", b.bucket, b.percent)).collect();
    println!("Time of day: {}", tod.join(", "));
    if let Some(day) = &report.max_day {
        println!("Busiest day: {day}");
    }
    if let Some(last) = report.entries.first() {
        println!("Latest: {last}");
    }
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.gui {
        #[cfg(feature = "gui")]
        { return event_analyzer::ui::launch(); }
        #[cfg(not(feature = "gui"))]
        {
            eprintln!("This build has GUI disabled. Rebuild with `--features gui`.");
            std::process::exit(2);
        }
    }

    let files = gather_category_files(&cli.inputs);
    if files.is_empty() { anyhow::bail!("No category files found in provided inputs"); }

    let now = match cli.now.as_deref() {
        Some(s) => parse_timestamp(s).context("Invalid --now")?,
        None => Local::now().naive_local(),
    };
    let color_override = match cli.color.as_deref() {
        Some(hex) => Some(Rgb::from_hex(hex).with_context(|| format!("Invalid --color {hex}"))?),
        None => None,
    };
    let mode = if cli.skip_malformed { MalformedMode::Skip } else { MalformedMode::Strict };
    let layout = ChartLayout { device_pixel_ratio: cli.dpr, ..ChartLayout::default() };

    let mut reports = Vec::with_capacity(files.len());
    for path in files {
        let load = read_category(&path, mode).with_context(|| format!("Failed reading {path:?}"))?;
        let category = &load.category;
        debug!(category = %category.name, events = category.events.len(), "analyzing");

        // empty categories get a report but no charts
        let analytics = if category.events.is_empty() {
            None
        } else if let Some(dir) = cli.out_dir.as_deref() {
            let color = color_override.unwrap_or_else(|| category.color.rgb());
            Some(save_charts(dir, category, color, layout, now)?)
        } else {
            Some(CategoryAnalytics::compute_at(&category.timestamps(), now)?)
        };
        reports.push(build_report(category, analytics.as_ref(), now, load.malformed));
    }
    sort_reports(&mut reports);

    for report in &reports {
        print_summary(report);
    }

    if let Some(path) = cli.json_out.as_deref() {
        std::fs::write(path, serde_json::to_vec_pretty(&reports)?)?;
        println!("Saved JSON -> {}", path.display());
    }

    Ok(())
}
