use crate::analyze::IntervalSummary;
use crate::buckets::{DayOfWeekHistogram, TimeOfDay, TimeOfDayHistogram};
use crate::model::{IntervalStat, Rgb};
use crate::surface::{DrawingSurface, Font, Paint, Wedge};
use std::f64::consts::{FRAC_PI_2, TAU};
use tracing::debug;

const CAPTION: Font = Font::px(11.0);
const DAY_LETTERS: [&str; 7] = ["S", "M", "T", "W", "T", "F", "S"];
/// Space under the bars reserved for the day letters.
const AXIS_BAND: f64 = 20.0;

/// Matches the backing buffer to the display density. Logical size is kept,
/// and calling it again leaves the surface unchanged.
pub fn scale_surface<S: DrawingSurface + ?Sized>(surface: &mut S) {
    let device = surface.device_pixel_ratio();
    let backing = surface.backing_store_ratio();
    let ratio = device / backing;
    if device == backing || !ratio.is_finite() || ratio <= 0.0 {
        return;
    }

    let (w, h) = (surface.width(), surface.height());
    surface.resize_backing(w * ratio, h * ratio);
    surface.set_scale(ratio);
    debug!(ratio, width = w, height = h, "scaled surface");
}

/// Time since the last event on the left, max/avg/min gaps on the right.
pub fn render_stats_panel<S: DrawingSurface + ?Sized>(surface: &mut S, stats: &IntervalSummary, color: Rgb) {
    scale_surface(surface);
    let (w, h) = (surface.width(), surface.height());
    let black = Paint::solid(Rgb::BLACK);

    let (middle, left) = (100.0, 35.0);
    surface.fill_text(&stats.recent.magnitude.to_string(), left, middle, Font::px(80.0), Paint::solid(color));
    surface.fill_text(&format!("{} since", stats.recent.label()), left, middle + 25.0, Font::px(12.0), black);
    surface.fill_text("last time", left, middle + 44.0, Font::px(12.0), black);

    let padding = 10.0;
    surface.fill_rect(w / 2.0, padding, 1.0, h - padding * 2.0, Paint::solid(Rgb::DIVIDER));

    let x = w / 2.0 + 20.0;
    let rows: [(&IntervalStat, &str); 3] = [
        (&stats.max, "maximum time between"),
        (&stats.avg, "average time between"),
        (&stats.min, "minimum time between"),
    ];
    for (i, (stat, caption)) in rows.into_iter().enumerate() {
        let y = h / 4.0 * (i + 1) as f64;
        surface.fill_text(&stat.to_string(), x, y, Font::px(20.0).bold(), Paint::solid(color).with_alpha(0.8));
        surface.fill_text(caption, x, y + 15.0, CAPTION, black);
    }
}

/// Default wedge opacity: each later bucket is a quarter more opaque.
pub fn stacked_alpha(index: usize) -> f64 {
    0.25 * index as f64 + 0.25
}

pub fn render_time_of_day_chart<S: DrawingSurface + ?Sized>(surface: &mut S, hist: &TimeOfDayHistogram, color: Rgb) {
    render_time_of_day_chart_with(surface, hist, color, stacked_alpha)
}

/// Pie chart from 12 o'clock clockwise plus a legend with rounded percentages.
pub fn render_time_of_day_chart_with<S, F>(surface: &mut S, hist: &TimeOfDayHistogram, color: Rgb, wedge_alpha: F)
where
    S: DrawingSurface + ?Sized,
    F: Fn(usize) -> f64,
{
    scale_surface(surface);
    let h = surface.height();
    if hist.total() == 0 {
        debug!("empty time-of-day histogram, drawing 0% wedges");
    }

    let (center, radius) = (h / 2.0, h / 2.0);
    let legend_x = h + h / 8.0;
    let offset_top = h / 6.0;
    let (marker_w, marker_h) = (6.0, 25.0);

    let mut angle = -FRAC_PI_2;
    for bucket in TimeOfDay::ALL {
        let i = bucket.index();
        let paint = Paint::solid(color).with_alpha(wedge_alpha(i));
        let sweep = hist.fraction(i) * TAU;
        surface.fill_wedge(Wedge { cx: center, cy: center, radius, start: angle, end: angle + sweep }, paint);
        angle += sweep;

        let top = h / 12.0 * (2 * i + 1) as f64 + offset_top - marker_h / 2.0;
        surface.fill_rect(legend_x, top, marker_w, marker_h, paint);
        let black = Paint::solid(Rgb::BLACK);
        surface.fill_text(bucket.label(), legend_x + 15.0, top + 9.0, CAPTION, black);
        surface.fill_text(&format!("{}%", hist.percent(i)), legend_x + 15.0, top + 23.0, CAPTION, black);
    }
}

/// Seven bars normalized to the busiest day, labeled with their share of all events.
pub fn render_day_of_week_chart<S: DrawingSurface + ?Sized>(surface: &mut S, hist: &DayOfWeekHistogram, color: Rgb) {
    scale_surface(surface);
    let (w, h) = (surface.width(), surface.height());
    let usable = (h - AXIS_BAND).max(0.0);
    let slot = w / 7.0;
    let half_slot = w / 14.0;

    for (i, letter) in DAY_LETTERS.iter().enumerate() {
        surface.fill_text(letter, half_slot * (2 * i + 1) as f64 - 4.0, h - 5.0, CAPTION, Paint::solid(Rgb::BLACK));
    }

    for i in 0..DAY_LETTERS.len() {
        let bar = hist.relative(i) * usable;
        surface.fill_rect(slot * i as f64 + 1.0, usable - bar, slot - 2.0, bar, Paint::solid(color));
    }

    for i in 0..DAY_LETTERS.len() {
        let label = format!("{}%", hist.percent(i));
        surface.fill_text(&label, half_slot * (2 * i + 1) as f64 - 8.0, h - 27.0, CAPTION, Paint::solid(Rgb::WHITE));
    }
}
