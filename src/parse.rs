use crate::error::{AnalyticsError, Result};
use crate::model::{Category, CategoryColor, Event};
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extensions picked up when a directory is given as input.
const CATEGORY_EXTENSIONS: [&str; 4] = ["json", "txt", "events", "log"];

fn delimiters() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[- :]").expect("delimiter pattern is valid"))
}

/// Parses the fixed `YYYY-MM-DD HH:MM` format into a local wall-clock time.
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime> {
    let raw = text.trim();
    let fields: Vec<&str> = delimiters().split(raw).collect();
    if fields.len() != 5 {
        return Err(AnalyticsError::malformed(raw, format!("expected 5 fields, found {}", fields.len())));
    }

    let mut nums = [0u32; 5];
    for (slot, field) in nums.iter_mut().zip(&fields) {
        // u32::from_str also takes a leading '+'
        if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AnalyticsError::malformed(raw, format!("'{field}' is not a number")));
        }
        *slot = field
            .parse()
            .map_err(|_| AnalyticsError::malformed(raw, format!("'{field}' is not a number")))?;
    }
    let [year, month, day, hour, minute] = nums;

    NaiveDate::from_ymd_opt(year as i32, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .ok_or_else(|| AnalyticsError::malformed(raw, "not a valid calendar date-time"))
}

pub trait EventParser {
    /// Parse a single line into an optional Event (`None` for blanks and comments)
    fn parse_line(&mut self, line: &str) -> Result<Option<Event>>;
}

/// Plain-text source: one timestamp per line, `#` starts a comment.
pub struct LineEventParser {
    category_id: String,
    next_id: usize,
}

impl LineEventParser {
    pub fn new(category_id: impl Into<String>) -> Self {
        Self { category_id: category_id.into(), next_id: 0 }
    }
}

impl EventParser for LineEventParser {
    fn parse_line(&mut self, line: &str) -> Result<Option<Event>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') { return Ok(None); }
        let timestamp = parse_timestamp(line)?;
        let id = format!("{}-{}", self.category_id, self.next_id);
        self.next_id += 1;
        Ok(Some(Event { id, category_id: self.category_id.clone(), timestamp }))
    }
}

/// What to do with entries whose timestamp does not parse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MalformedMode {
    #[default]
    Strict,
    Skip,
}

#[derive(Debug)]
pub struct CategoryLoad {
    pub category: Category,
    pub malformed: u64,
}

#[derive(Deserialize)]
struct CategoryFile {
    name: String,
    #[serde(default)]
    color: Option<ColorId>,
    #[serde(default)]
    events: RawEvents,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorId { Text(String), Number(u32) }

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEvents {
    List(Vec<RawEvent>),
    Keyed(BTreeMap<String, RawEvent>),
}

impl Default for RawEvents {
    fn default() -> Self { RawEvents::List(Vec::new()) }
}

#[derive(Deserialize)]
struct RawEvent { time: String }

/// Loads one category from a `.json` document or a line file.
pub fn read_category(path: &Path, mode: MalformedMode) -> Result<CategoryLoad> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| AnalyticsError::Io { path: path.to_path_buf(), source })?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "category".to_string());

    let load = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => category_from_json(path, &stem, &text, mode)?,
        _ => category_from_lines(&stem, &text, mode)?,
    };
    debug!(
        path = %path.display(),
        events = load.category.events.len(),
        malformed = load.malformed,
        "loaded category"
    );
    Ok(load)
}

fn category_from_json(path: &Path, stem: &str, text: &str, mode: MalformedMode) -> Result<CategoryLoad> {
    let file: CategoryFile = serde_json::from_str(text).map_err(|e| AnalyticsError::MalformedCategory {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let color = match file.color {
        Some(ColorId::Text(id)) => CategoryColor::from_id(&id),
        Some(ColorId::Number(n)) => CategoryColor::from_id(&n.to_string()),
        None => CategoryColor::default(),
    };

    let raw: Vec<(String, RawEvent)> = match file.events {
        RawEvents::List(list) => list.into_iter().enumerate().map(|(i, e)| (format!("{stem}-{i}"), e)).collect(),
        RawEvents::Keyed(map) => map.into_iter().collect(),
    };

    let mut events = Vec::with_capacity(raw.len());
    let mut malformed = 0;
    for (id, entry) in raw {
        match parse_timestamp(&entry.time) {
            Ok(timestamp) => events.push(Event { id, category_id: stem.to_string(), timestamp }),
            Err(e) if mode == MalformedMode::Skip => {
                warn!(event = %id, "skipping event: {e}");
                malformed += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(CategoryLoad {
        category: Category { id: stem.to_string(), name: file.name, color, events },
        malformed,
    })
}

fn category_from_lines(stem: &str, text: &str, mode: MalformedMode) -> Result<CategoryLoad> {
    let mut parser = LineEventParser::new(stem);
    let mut events = Vec::new();
    let mut malformed = 0;
    for (n, line) in text.lines().enumerate() {
        match parser.parse_line(line) {
            Ok(Some(event)) => events.push(event),
            Ok(None) => {}
            Err(e) if mode == MalformedMode::Skip => {
                warn!(line = n + 1, "skipping line: {e}");
                malformed += 1;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(CategoryLoad {
        category: Category { id: stem.to_string(), name: stem.to_string(), color: CategoryColor::default(), events },
        malformed,
    })
}

/// Expands directories (recursively) into category files; plain file paths are kept as given.
pub fn gather_category_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for p in paths {
        if p.is_file() {
            out.push(p.clone());
        } else if p.is_dir() {
            for entry in WalkDir::new(p).sort_by_file_name().into_iter().flatten() {
                let path = entry.path();
                if !path.is_file() { continue; }
                let keep = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|ext| CATEGORY_EXTENSIONS.iter().any(|k| ext.eq_ignore_ascii_case(k)));
                if keep { out.push(path.to_path_buf()); }
            }
        }
    }
    out
}
