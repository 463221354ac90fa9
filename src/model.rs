use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One timestamped occurrence inside a category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub id: String,
    pub category_id: String,
    pub timestamp: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: CategoryColor,
    pub events: Vec<Event>,
}

impl Category {
    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        self.events.iter().map(|e| e.timestamp).collect()
    }

    /// Events ordered the way the entry list shows them: newest first.
    pub fn events_newest_first(&self) -> Vec<&Event> {
        let mut out: Vec<&Event> = self.events.iter().collect();
        out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        out
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryColor { Red, Orange, Brown, Green, Blue, Purple }

impl CategoryColor {
    /// Palette ids are the strings "1" through "6"; anything else is blue.
    pub fn from_id(id: &str) -> Self {
        match id.trim() {
            "1" => CategoryColor::Red,
            "2" => CategoryColor::Orange,
            "3" => CategoryColor::Brown,
            "4" => CategoryColor::Green,
            "5" => CategoryColor::Blue,
            "6" => CategoryColor::Purple,
            _ => CategoryColor::Blue,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CategoryColor::Red => "red",
            CategoryColor::Orange => "orange",
            CategoryColor::Brown => "brown",
            CategoryColor::Green => "green",
            CategoryColor::Blue => "blue",
            CategoryColor::Purple => "purple",
        }
    }

    pub fn rgb(self) -> Rgb {
        match self {
            CategoryColor::Red => Rgb(0xF4, 0x43, 0x36),
            CategoryColor::Orange => Rgb(0xFF, 0x98, 0x00),
            CategoryColor::Brown => Rgb(0x79, 0x55, 0x48),
            CategoryColor::Green => Rgb(0x4C, 0xAF, 0x50),
            CategoryColor::Blue => Rgb(0x00, 0xBC, 0xD4),
            CategoryColor::Purple => Rgb(0x9C, 0x27, 0xB0),
        }
    }
}

impl Default for CategoryColor {
    fn default() -> Self { CategoryColor::Blue }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);
    pub const DIVIDER: Rgb = Rgb(0xAA, 0xAA, 0xAA);

    /// Parses `#RRGGBB` (the `#` is optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) { return None; }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit { Minute, Hour, Day, Month, Year }

impl TimeUnit {
    pub fn singular(self) -> &'static str {
        match self {
            TimeUnit::Minute => "minute",
            TimeUnit::Hour => "hour",
            TimeUnit::Day => "day",
            TimeUnit::Month => "month",
            TimeUnit::Year => "year",
        }
    }
}

/// A duration at coarse granularity, e.g. `7 days`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalStat {
    pub magnitude: u64,
    pub unit: TimeUnit,
}

impl IntervalStat {
    pub fn new(magnitude: u64, unit: TimeUnit) -> Self { Self { magnitude, unit } }

    /// Unit label, pluralized unless the magnitude is exactly one.
    pub fn label(&self) -> String {
        if self.magnitude == 1 {
            self.unit.singular().to_string()
        } else {
            format!("{}s", self.unit.singular())
        }
    }
}

impl fmt::Display for IntervalStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.magnitude, self.label())
    }
}
