use crate::analyze::{analyze_at, IntervalSummary};
use crate::buckets::{classify, Buckets};
use crate::error::{AnalyticsError, Result};
use crate::model::{Category, Rgb};
use crate::surface::DrawingSurface;
use crate::viz::{render_day_of_week_chart, render_stats_panel, render_time_of_day_chart};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use tracing::debug;

/// Everything the three charts are drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CategoryAnalytics {
    pub intervals: IntervalSummary,
    pub buckets: Buckets,
}

impl CategoryAnalytics {
    pub fn compute_at(timestamps: &[NaiveDateTime], now: NaiveDateTime) -> Result<Self> {
        let intervals = analyze_at(timestamps, now)?;
        let buckets = classify(timestamps);
        Ok(Self { intervals, buckets })
    }
}

/// The three independent targets, one per chart.
pub struct ChartSurfaces<'a> {
    pub stats: &'a mut dyn DrawingSurface,
    pub time_of_day: &'a mut dyn DrawingSurface,
    pub day_of_week: &'a mut dyn DrawingSurface,
}

/// Logical chart sizes and the pixel density used for raster output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartLayout {
    pub stats: (u32, u32),
    pub time_of_day: (u32, u32),
    pub day_of_week: (u32, u32),
    pub device_pixel_ratio: f64,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self { stats: (400, 200), time_of_day: (300, 200), day_of_week: (350, 200), device_pixel_ratio: 1.0 }
    }
}

pub fn render_category_analytics(category: &Category, color: Rgb, surfaces: ChartSurfaces<'_>) -> Result<CategoryAnalytics> {
    render_category_analytics_at(category, color, surfaces, Local::now().naive_local())
}

/// Analyzes once, then draws the stats panel, the time-of-day pie and the
/// day-of-week bars in that order. Nothing is drawn when there are no events,
/// and the error names the category.
pub fn render_category_analytics_at(
    category: &Category,
    color: Rgb,
    surfaces: ChartSurfaces<'_>,
    now: NaiveDateTime,
) -> Result<CategoryAnalytics> {
    let analytics = CategoryAnalytics::compute_at(&category.timestamps(), now).map_err(|e| match e {
        AnalyticsError::InsufficientData => AnalyticsError::NoEvents { category: category.name.clone() },
        other => other,
    })?;

    render_stats_panel(surfaces.stats, &analytics.intervals, color);
    render_time_of_day_chart(surfaces.time_of_day, &analytics.buckets.time_of_day, color);
    render_day_of_week_chart(surfaces.day_of_week, &analytics.buckets.day_of_week, color);
    debug!(category = %category.name, events = category.events.len(), "rendered category analytics");
    Ok(analytics)
}
