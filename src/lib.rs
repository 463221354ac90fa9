//! Interval statistics, time buckets and charts for personal event logs.

pub mod analyze;
pub mod buckets;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod model;
pub mod parse;
pub mod png;
pub mod report;
pub mod surface;
pub mod viz;
#[cfg(feature = "gui")]
pub mod ui;

pub use dashboard::{render_category_analytics, render_category_analytics_at, CategoryAnalytics, ChartLayout, ChartSurfaces};
pub use error::AnalyticsError;
