//! Spreadsheet rows → ranked candidate records.
//!
//! Column layout of the `Display` sheet:
//!
//! | col | content            |
//! |-----|--------------------|
//! | 0   | serial number      |
//! | 1   | candidate name     |
//! | 2   | tower              |
//! | 3   | flat               |
//! | 4–8 | vote buckets (920, 1005, 1165, 1285, 1670) |
//! | 9   | total vote count   |
//! | 10  | total vote value   |
//!
//! Everything here is pure: rows in, records out. Malformed cells fall back
//! to defaults instead of failing the whole sheet.

use serde::Deserialize;
use serde_json::Value;

use crate::protocol::{CandidateRecord, VoteBuckets, BUCKET_LABELS};

/// Name-column values that mark a header row rather than a candidate.
pub const HEADER_LABELS: [&str; 2] = ["Candidate Name", "CANDIDATE NAME"];

pub const FLAT_PLACEHOLDER: &str = "N/A";

const COL_NAME: usize = 1;
const COL_FLAT: usize = 3;
const COL_FIRST_BUCKET: usize = 4;
const COL_TOTAL_COUNT: usize = 9;
const COL_TOTAL_VALUE: usize = 10;

/// A raw spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum Cell {
    Text(String),
    Number(f64),
    Blank,
}

impl From<Value> for Cell {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Cell::Text(s),
            Value::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Blank),
            Value::Bool(b) => Cell::Text(if b { "TRUE" } else { "FALSE" }.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => Cell::Blank,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl Cell {
    /// True for cells that carry no value at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Blank => true,
            Cell::Text(s) => s.is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Display text, trimmed. `None` for blank cells.
    pub fn text(&self) -> Option<String> {
        match self {
            Cell::Blank => None,
            Cell::Text(s) => Some(s.trim().to_string()),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(format!("{}", *n as i64)),
            Cell::Number(n) => Some(n.to_string()),
        }
    }

    /// Non-negative integer, truncating fractions. `None` when unparseable.
    pub fn as_count(&self) -> Option<u64> {
        match self {
            Cell::Blank => None,
            Cell::Number(n) if n.is_finite() && *n >= 0.0 && *n < u64::MAX as f64 => {
                Some(n.trunc() as u64)
            }
            Cell::Number(_) => None,
            Cell::Text(s) => leading_count(s),
        }
    }

    /// Positive finite float. `None` when unparseable, negative, or zero.
    pub fn as_value(&self) -> Option<f64> {
        let v = match self {
            Cell::Blank => return None,
            Cell::Number(n) => *n,
            Cell::Text(s) => leading_float(s)?,
        };
        (v.is_finite() && v > 0.0).then_some(v)
    }
}

/// Longest integer prefix after leading whitespace (`"12 votes"` → 12).
fn leading_count(s: &str) -> Option<u64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: u64 = digits[..end].parse().ok()?;
    if negative && value > 0 {
        return None;
    }
    Some(value)
}

/// Longest decimal-float prefix after leading whitespace (`"24.5%"` → 24.5).
fn leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'-' | b'+') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }
    s[..end].parse().ok()
}

fn cell(row: &[Cell], idx: usize) -> &Cell {
    row.get(idx).unwrap_or(&Cell::Blank)
}

/// Whether a raw row describes a candidate.
pub fn is_candidate_row(row: &[Cell]) -> bool {
    if row.len() < 2 {
        return false;
    }
    match &row[COL_NAME] {
        Cell::Text(name) => !name.is_empty() && !HEADER_LABELS.contains(&name.as_str()),
        other => !other.is_empty(),
    }
}

fn placeholder_name(n: usize) -> String {
    format!("Candidate {}", n)
}

fn extract(row: &[Cell], n: usize) -> CandidateRecord {
    let name = cell(row, COL_NAME)
        .text()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| placeholder_name(n));
    let flat = cell(row, COL_FLAT)
        .text()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| FLAT_PLACEHOLDER.to_string());

    let mut counts = [0u64; 5];
    for (i, count) in counts.iter_mut().enumerate() {
        *count = cell(row, COL_FIRST_BUCKET + i).as_count().unwrap_or(0);
    }

    CandidateRecord {
        id: n as u64,
        name,
        flat,
        total_count: cell(row, COL_TOTAL_COUNT).as_count().unwrap_or(0),
        total_value: cell(row, COL_TOTAL_VALUE).as_value().unwrap_or(0.0),
        votes: VoteBuckets::from_counts(counts),
        rank: n,
    }
}

/// Filter, extract and rank raw sheet rows.
pub fn transform(rows: &[Vec<Cell>]) -> Vec<CandidateRecord> {
    let mut records: Vec<CandidateRecord> = rows
        .iter()
        .filter(|row| is_candidate_row(row))
        .enumerate()
        .map(|(idx, row)| extract(row, idx + 1))
        .collect();
    rank_by_value(&mut records);
    records
}

/// Sort by `total_value` descending and renumber ranks from 1.
///
/// `sort_by` is a stable sort, so equal values keep their incoming order.
pub fn rank_by_value(records: &mut [CandidateRecord]) {
    records.sort_by(|a, b| b.total_value.total_cmp(&a.total_value));
    for (idx, record) in records.iter_mut().enumerate() {
        record.rank = idx + 1;
    }
}

/// Re-validate candidate objects received from a data endpoint.
///
/// The endpoint is expected to have ranked already, but nothing it sends is
/// trusted: every field is defaulted the same way `transform` does, entries
/// without a usable name are dropped, and the set is re-ranked.
pub fn normalize_payload(items: Vec<Value>) -> Vec<CandidateRecord> {
    let mut records: Vec<CandidateRecord> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .filter_map(|obj| {
            let name = Cell::from(obj.get("name").cloned().unwrap_or(Value::Null))
                .text()
                .filter(|s| !s.is_empty())?;
            Some((name, obj))
        })
        .enumerate()
        .map(|(idx, (name, obj))| {
            let field = |key: &str| Cell::from(obj.get(key).cloned().unwrap_or(Value::Null));
            let votes = obj.get("votes").and_then(Value::as_object);
            let mut counts = [0u64; 5];
            for (i, label) in BUCKET_LABELS.iter().enumerate() {
                counts[i] = votes
                    .and_then(|v| v.get(*label))
                    .map(|v| Cell::from(v.clone()))
                    .and_then(|c| c.as_count())
                    .unwrap_or(0);
            }
            let n = idx + 1;
            CandidateRecord {
                id: field("id").as_count().filter(|id| *id > 0).unwrap_or(n as u64),
                name,
                flat: field("flat")
                    .text()
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| FLAT_PLACEHOLDER.to_string()),
                total_count: field("totalCount").as_count().unwrap_or(0),
                total_value: field("totalValue").as_value().unwrap_or(0.0),
                votes: VoteBuckets::from_counts(counts),
                rank: n,
            }
        })
        .collect();
    rank_by_value(&mut records);
    records
}
