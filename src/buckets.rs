use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay { Morning, Afternoon, Evening, Night }

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 4] = [TimeOfDay::Morning, TimeOfDay::Afternoon, TimeOfDay::Evening, TimeOfDay::Night];

    /// Morning 5-11, afternoon 12-16, evening 17-23, night 0-4.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=23 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Afternoon => "Afternoon",
            TimeOfDay::Evening => "Evening",
            TimeOfDay::Night => "Night",
        }
    }
}

pub const DAY_NAMES: [&str; 7] = ["Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TimeOfDayHistogram {
    pub counts: [u64; 4],
}

impl TimeOfDayHistogram {
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn count(&self, bucket: TimeOfDay) -> u64 {
        self.counts[bucket.index()]
    }

    /// Share of the total in `[0, 1]`; zero when there is nothing to share.
    pub fn fraction(&self, index: usize) -> f64 {
        share(self.counts[index], self.total())
    }

    pub fn percent(&self, index: usize) -> u32 {
        rounded_percent(self.counts[index], self.total())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DayOfWeekHistogram {
    /// Sunday = 0 .. Saturday = 6
    pub counts: [u64; 7],
    pub max_day: usize,
}

impl DayOfWeekHistogram {
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> u64 {
        self.counts[self.max_day]
    }

    /// Bar height relative to the busiest day.
    pub fn relative(&self, index: usize) -> f64 {
        share(self.counts[index], self.max_count())
    }

    pub fn percent(&self, index: usize) -> u32 {
        rounded_percent(self.counts[index], self.total())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Buckets {
    pub time_of_day: TimeOfDayHistogram,
    pub day_of_week: DayOfWeekHistogram,
}

pub fn classify(timestamps: &[NaiveDateTime]) -> Buckets {
    Buckets { time_of_day: time_of_day(timestamps), day_of_week: day_of_week(timestamps) }
}

pub fn time_of_day(timestamps: &[NaiveDateTime]) -> TimeOfDayHistogram {
    let mut hist = TimeOfDayHistogram::default();
    for ts in timestamps {
        hist.counts[TimeOfDay::from_hour(ts.hour()).index()] += 1;
    }
    hist
}

pub fn day_of_week(timestamps: &[NaiveDateTime]) -> DayOfWeekHistogram {
    let mut hist = DayOfWeekHistogram::default();
    for ts in timestamps {
        hist.counts[ts.weekday().num_days_from_sunday() as usize] += 1;
    }
    // strict > keeps the earliest day on ties
    for i in 1..hist.counts.len() {
        if hist.counts[i] > hist.counts[hist.max_day] { hist.max_day = i; }
    }
    hist
}

fn share(part: u64, whole: u64) -> f64 {
    if whole == 0 { 0.0 } else { part as f64 / whole as f64 }
}

fn rounded_percent(part: u64, whole: u64) -> u32 {
    (share(part, whole) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_timestamp;

    fn ts(s: &str) -> NaiveDateTime { parse_timestamp(s).unwrap() }

    #[test]
    fn boundary_hours_fall_into_the_later_bucket() {
        assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(17), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(0), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(4), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(23), TimeOfDay::Evening);
    }

    #[test]
    fn ten_morning_events() {
        let dates: Vec<_> = (1..=10).map(|d| ts(&format!("2024-02-{d:02} 06:15"))).collect();
        let b = classify(&dates);
        assert_eq!(b.time_of_day.counts, [10, 0, 0, 0]);
        assert_eq!(b.time_of_day.percent(0), 100);
        assert_eq!(b.time_of_day.percent(3), 0);
    }

    #[test]
    fn monday_twice_is_the_max_day() {
        // 2024-01-07 is a Sunday
        let mut dates: Vec<_> = (7..=13).map(|d| ts(&format!("2024-01-{d:02} 10:00"))).collect();
        dates.push(ts("2024-01-15 10:00"));
        let hist = day_of_week(&dates);
        assert_eq!(hist.counts, [1, 2, 1, 1, 1, 1, 1]);
        assert_eq!(hist.max_day, 1);
        assert_eq!(hist.relative(1), 1.0);
        assert_eq!(hist.relative(0), 0.5);
        assert_eq!(hist.percent(1), 25);
    }

    #[test]
    fn ties_keep_the_first_day() {
        let dates = [ts("2024-01-09 10:00"), ts("2024-01-10 10:00")];
        assert_eq!(day_of_week(&dates).max_day, 2);
    }

    #[test]
    fn sums_match_input_length() {
        let dates = [ts("2024-01-01 00:00"), ts("2024-01-01 04:59"), ts("2024-03-15 12:00"), ts("2024-06-30 17:45")];
        let b = classify(&dates);
        assert_eq!(b.time_of_day.total(), 4);
        assert_eq!(b.day_of_week.total(), 4);
        assert_eq!(b.time_of_day.count(TimeOfDay::Night), 2);
    }

    #[test]
    fn empty_input_is_all_zero() {
        let b = classify(&[]);
        assert_eq!(b.time_of_day.total(), 0);
        assert_eq!(b.day_of_week.total(), 0);
        assert_eq!(b.day_of_week.max_day, 0);
        assert_eq!(b.time_of_day.fraction(0), 0.0);
        assert_eq!(b.day_of_week.relative(3), 0.0);
        assert_eq!(b.day_of_week.percent(3), 0);
    }
}
