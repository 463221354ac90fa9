use crate::error::{AnalyticsError, Result};
use crate::model::{IntervalStat, TimeUnit};
use chrono::{Datelike, Local, Months, NaiveDateTime};
use serde::Serialize;
use tracing::debug;

const MS_PER_MINUTE: f64 = 60_000.0;
const MS_PER_HOUR: f64 = 3_600_000.0;
const MS_PER_DAY: f64 = 86_400_000.0;
// Gregorian averages: 146097 days per 4800 months.
const MS_PER_MONTH: f64 = MS_PER_DAY * 146_097.0 / 4_800.0;
const MS_PER_YEAR: f64 = MS_PER_MONTH * 12.0;

/// Recency and gap statistics for one category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct IntervalSummary {
    pub recent: IntervalStat,
    pub max: IntervalStat,
    pub min: IntervalStat,
    pub avg: IntervalStat,
}

pub fn analyze(timestamps: &[NaiveDateTime]) -> Result<IntervalSummary> {
    analyze_at(timestamps, Local::now().naive_local())
}

pub fn analyze_at(timestamps: &[NaiveDateTime], now: NaiveDateTime) -> Result<IntervalSummary> {
    if timestamps.is_empty() { return Err(AnalyticsError::InsufficientData); }

    let mut dates = timestamps.to_vec();
    dates.sort_by(|a, b| b.cmp(a));

    let recent = calendar_stat(now, dates[0]);
    if dates.len() == 1 {
        return Ok(IntervalSummary { recent, max: recent, min: recent, avg: recent });
    }

    let gaps: Vec<(i64, usize)> = dates
        .windows(2)
        .enumerate()
        .map(|(i, w)| ((w[0] - w[1]).num_milliseconds().abs(), i))
        .collect();

    // strict comparisons keep the first pair on ties
    let mut widest = gaps[0];
    let mut narrowest = gaps[0];
    for &gap in &gaps[1..] {
        if gap.0 > widest.0 { widest = gap; }
        if gap.0 < narrowest.0 { narrowest = gap; }
    }
    let pair_stat = |i: usize| calendar_stat(dates[i], dates[i + 1]);

    let total: i64 = gaps.iter().map(|(ms, _)| ms).sum();
    let mean_ms = (total as f64 / gaps.len() as f64).round();

    let summary = IntervalSummary {
        recent,
        max: pair_stat(widest.1),
        min: pair_stat(narrowest.1),
        avg: duration_stat(mean_ms),
    };
    debug!(
        events = dates.len(),
        recent = %summary.recent,
        max = %summary.max,
        min = %summary.min,
        avg = %summary.avg,
        "interval analysis"
    );
    Ok(summary)
}

/// Calendar difference between two instants in the largest whole unit that is non-zero.
pub fn calendar_stat(a: NaiveDateTime, b: NaiveDateTime) -> IntervalStat {
    let (earlier, later) = if a <= b { (a, b) } else { (b, a) };

    let months = whole_months(earlier, later);
    if months >= 12 { return IntervalStat::new(u64::from(months / 12), TimeUnit::Year); }
    if months > 0 { return IntervalStat::new(u64::from(months), TimeUnit::Month); }

    let elapsed = later - earlier;
    if elapsed.num_days() > 0 { return IntervalStat::new(elapsed.num_days() as u64, TimeUnit::Day); }
    if elapsed.num_hours() > 0 { return IntervalStat::new(elapsed.num_hours() as u64, TimeUnit::Hour); }
    IntervalStat::new(elapsed.num_minutes() as u64, TimeUnit::Minute)
}

fn whole_months(earlier: NaiveDateTime, later: NaiveDateTime) -> u32 {
    let span = (later.year() - earlier.year()) * 12 + later.month() as i32 - earlier.month() as i32;
    if span <= 0 { return 0; }
    let span = span as u32;
    // the anchor clamps to month end (Jan 31 + 1 month = Feb 28/29)
    match earlier.checked_add_months(Months::new(span)) {
        Some(anchor) if anchor <= later => span,
        _ => span - 1,
    }
}

/// Converts a millisecond duration using averaged unit lengths: the first of
/// years, months, days, hours that rounds (half to even) to a positive count,
/// else minutes.
pub fn duration_stat(ms: f64) -> IntervalStat {
    let ms = ms.abs();
    for (unit, size) in [
        (TimeUnit::Year, MS_PER_YEAR),
        (TimeUnit::Month, MS_PER_MONTH),
        (TimeUnit::Day, MS_PER_DAY),
        (TimeUnit::Hour, MS_PER_HOUR),
    ] {
        let value = (ms / size).round_ties_even();
        if value > 0.0 { return IntervalStat::new(value as u64, unit); }
    }
    IntervalStat::new((ms / MS_PER_MINUTE).round_ties_even() as u64, TimeUnit::Minute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_timestamp;

    fn ts(s: &str) -> NaiveDateTime { parse_timestamp(s).unwrap() }

    fn stat(magnitude: u64, unit: TimeUnit) -> IntervalStat { IntervalStat::new(magnitude, unit) }

    #[test]
    fn three_events_example() {
        let dates = [ts("2024-01-01 08:00"), ts("2024-01-03 08:00"), ts("2024-01-10 08:00")];
        let s = analyze_at(&dates, ts("2024-01-11 08:00")).unwrap();
        assert_eq!(s.recent, stat(1, TimeUnit::Day));
        assert_eq!(s.max, stat(7, TimeUnit::Day));
        assert_eq!(s.min, stat(2, TimeUnit::Day));
        // mean gap is 4.5 days, rounded half to even
        assert_eq!(s.avg, stat(4, TimeUnit::Day));
    }

    #[test]
    fn input_order_does_not_matter() {
        let now = ts("2024-01-11 08:00");
        let sorted = [ts("2024-01-01 08:00"), ts("2024-01-03 08:00"), ts("2024-01-10 08:00")];
        let shuffled = [sorted[1], sorted[2], sorted[0]];
        assert_eq!(analyze_at(&sorted, now).unwrap(), analyze_at(&shuffled, now).unwrap());
    }

    #[test]
    fn single_event_repeats_recency() {
        let s = analyze_at(&[ts("2024-03-01 10:00")], ts("2024-03-01 13:30")).unwrap();
        assert_eq!(s.recent, stat(3, TimeUnit::Hour));
        assert_eq!(s.max, s.recent);
        assert_eq!(s.min, s.recent);
        assert_eq!(s.avg, s.recent);
    }

    #[test]
    fn empty_input_is_insufficient() {
        let err = analyze_at(&[], ts("2024-01-01 00:00")).unwrap_err();
        assert!(matches!(err, AnalyticsError::InsufficientData));
    }

    #[test]
    fn duplicates_are_kept_as_zero_gaps() {
        let dates = [ts("2024-01-01 08:00"), ts("2024-01-01 08:00"), ts("2024-01-01 09:00")];
        let s = analyze_at(&dates, ts("2024-01-01 09:00")).unwrap();
        assert_eq!(s.recent, stat(0, TimeUnit::Minute));
        assert_eq!(s.min, stat(0, TimeUnit::Minute));
        assert_eq!(s.max, stat(1, TimeUnit::Hour));
        // mean of 60 and 0 minutes
        assert_eq!(s.avg, stat(30, TimeUnit::Minute));
    }

    #[test]
    fn min_and_max_take_first_pair_on_ties() {
        // newest-first gaps: 3 days (Jan 10 -> Jan 7), 3 days (Jan 7 -> Jan 4)
        let dates = [ts("2024-01-04 08:00"), ts("2024-01-07 08:00"), ts("2024-01-10 08:00")];
        let s = analyze_at(&dates, ts("2024-01-10 09:00")).unwrap();
        assert_eq!(s.max, stat(3, TimeUnit::Day));
        assert_eq!(s.min, stat(3, TimeUnit::Day));
    }

    #[test]
    fn calendar_units_pick_largest_whole_unit() {
        assert_eq!(calendar_stat(ts("2022-01-15 00:00"), ts("2024-03-01 00:00")), stat(2, TimeUnit::Year));
        assert_eq!(calendar_stat(ts("2024-01-31 00:00"), ts("2024-02-29 00:00")), stat(1, TimeUnit::Month));
        assert_eq!(calendar_stat(ts("2024-01-31 10:00"), ts("2024-02-29 09:00")), stat(28, TimeUnit::Day));
        assert_eq!(calendar_stat(ts("2024-01-01 10:00"), ts("2024-01-01 10:59")), stat(59, TimeUnit::Minute));
        assert_eq!(calendar_stat(ts("2024-01-01 10:00"), ts("2024-01-01 10:01")), stat(1, TimeUnit::Minute));
        // argument order is irrelevant
        assert_eq!(calendar_stat(ts("2024-05-01 00:00"), ts("2024-01-01 00:00")), stat(4, TimeUnit::Month));
    }

    #[test]
    fn duration_rule_rounds_instead_of_truncating() {
        // 20 hours rounds up to a day under the duration rule
        assert_eq!(duration_stat(20.0 * MS_PER_HOUR), stat(1, TimeUnit::Day));
        // 40 days is 1.3 months
        assert_eq!(duration_stat(40.0 * MS_PER_DAY), stat(1, TimeUnit::Month));
        assert_eq!(duration_stat(10.0 * MS_PER_MINUTE), stat(10, TimeUnit::Minute));
        assert_eq!(duration_stat(20_000.0), stat(0, TimeUnit::Minute));
        assert_eq!(duration_stat(200.0 * MS_PER_DAY), stat(1, TimeUnit::Year));
    }
}
