use crate::buckets::{TimeOfDay, DAY_NAMES};
use crate::dashboard::CategoryAnalytics;
use crate::format::format_display;
use crate::model::{Category, IntervalStat, TimeUnit};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatEntry {
    pub magnitude: u64,
    pub unit: TimeUnit,
    /// e.g. "7 days"
    pub text: String,
}

impl From<IntervalStat> for StatEntry {
    fn from(s: IntervalStat) -> Self {
        Self { magnitude: s.magnitude, unit: s.unit, text: s.to_string() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Intervals {
    pub recent: StatEntry,
    pub max: StatEntry,
    pub avg: StatEntry,
    pub min: StatEntry,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BucketEntry {
    pub bucket: String,
    pub count: u64,
    pub percent: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryReport {
    pub name: String,
    pub color: String,
    pub total_events: u64,
    pub malformed_entries: u64,
    pub first_event: Option<String>,
    pub last_event: Option<String>,
    /// None when the category has no events
    pub intervals: Option<Intervals>,
    pub time_of_day: Vec<BucketEntry>,
    pub day_of_week: Vec<BucketEntry>,
    pub max_day: Option<String>,
    /// newest first, formatted for display
    pub entries: Vec<String>,
}

pub fn build_report(
    category: &Category,
    analytics: Option<&CategoryAnalytics>,
    now: NaiveDateTime,
    malformed: u64,
) -> CategoryReport {
    let first = category.events.iter().map(|e| e.timestamp).min();
    let last = category.events.iter().map(|e| e.timestamp).max();
    let stamp = |t: NaiveDateTime| t.format("%Y-%m-%d %H:%M").to_string();

    let (intervals, time_of_day, day_of_week, max_day) = match analytics {
        Some(a) => {
            let i = a.intervals;
            let tod = &a.buckets.time_of_day;
            let dow = &a.buckets.day_of_week;
            (
                Some(Intervals { recent: i.recent.into(), max: i.max.into(), avg: i.avg.into(), min: i.min.into() }),
                TimeOfDay::ALL
                    .iter()
                    .map(|b| BucketEntry {
                        bucket: b.label().to_string(),
                        count: tod.count(*b),
                        percent: tod.percent(b.index()),
                    })
                    .collect(),
                DAY_NAMES
                    .iter()
                    .enumerate()
                    .map(|(d, name)| BucketEntry { bucket: name.to_string(), count: dow.counts[d], percent: dow.percent(d) })
                    .collect(),
                Some(DAY_NAMES[dow.max_day].to_string()),
            )
        }
        None => (None, Vec::new(), Vec::new(), None),
    };

    CategoryReport {
        name: category.name.clone(),
        color: category.color.name().to_string(),
        total_events: category.events.len() as u64,
        malformed_entries: malformed,
        first_event: first.map(stamp),
        last_event: last.map(stamp),
        intervals,
        time_of_day,
        day_of_week,
        max_day,
        entries: category.events_newest_first().iter().map(|e| format_display(e.timestamp, now)).collect(),
    }
}

/// Reports in category-name order, case-insensitive.
pub fn sort_reports(reports: &mut [CategoryReport]) {
    reports.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()).then_with(|| a.name.cmp(&b.name)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CategoryColor, Event};
    use crate::parse::parse_timestamp;

    fn category(stamps: &[&str]) -> Category {
        Category {
            id: "ran".into(),
            name: "Ran".into(),
            color: CategoryColor::Green,
            events: stamps
                .iter()
                .enumerate()
                .map(|(i, s)| Event { id: i.to_string(), category_id: "ran".into(), timestamp: parse_timestamp(s).unwrap() })
                .collect(),
        }
    }

    #[test]
    fn report_summarizes_category() {
        let cat = category(&["2024-01-03 08:00", "2024-01-01 08:00", "2024-01-10 08:00"]);
        let now = parse_timestamp("2024-01-10 20:00").unwrap();
        let analytics = CategoryAnalytics::compute_at(&cat.timestamps(), now).unwrap();
        let report = build_report(&cat, Some(&analytics), now, 1);

        assert_eq!(report.total_events, 3);
        assert_eq!(report.malformed_entries, 1);
        assert_eq!(report.color, "green");
        assert_eq!(report.first_event.as_deref(), Some("2024-01-01 08:00"));
        assert_eq!(report.last_event.as_deref(), Some("2024-01-10 08:00"));
        let intervals = report.intervals.unwrap();
        assert_eq!(intervals.recent.text, "12 hours");
        assert_eq!(intervals.max.text, "7 days");
        assert_eq!(report.time_of_day[0], BucketEntry { bucket: "Morning".into(), count: 3, percent: 100 });
        assert_eq!(report.day_of_week.len(), 7);
        assert_eq!(report.entries, vec!["8:00 am", "January 3 8:00 am", "January 1 8:00 am"]);
    }

    #[test]
    fn empty_category_has_no_analytics() {
        let cat = category(&[]);
        let report = build_report(&cat, None, parse_timestamp("2024-01-10 20:00").unwrap(), 0);
        assert!(report.intervals.is_none());
        assert!(report.first_event.is_none());
        assert!(report.entries.is_empty());
    }

    #[test]
    fn reports_sort_by_name() {
        let now = parse_timestamp("2024-01-10 20:00").unwrap();
        let mut reports: Vec<_> = ["walked", "Biked", "ate out"]
            .iter()
            .map(|n| {
                let mut c = category(&[]);
                c.name = n.to_string();
                build_report(&c, None, now, 0)
            })
            .collect();
        sort_reports(&mut reports);
        let names: Vec<_> = reports.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["ate out", "Biked", "walked"]);
    }
}
