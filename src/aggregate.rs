use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use crate::records::Attendance;

/// `round(count / total * 100)`; a zero total yields 0.
pub fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as u32
}

/// Current UTC timestamp truncated to a calendar date.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Normalize a backend date or timestamp to its `YYYY-MM-DD` form.
pub fn date_key(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(iso_date(ts.with_timezone(&Utc).date_naive()));
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(iso_date(ts.date()));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(iso_date(date));
    }
    None
}

pub fn is_on(raw: &str, day: NaiveDate) -> bool {
    date_key(raw).as_deref() == Some(iso_date(day).as_str())
}

pub fn sum_by<T>(items: &[T], value: impl Fn(&T) -> f64) -> f64 {
    items.iter().map(value).sum()
}

pub fn count_where<T>(items: &[T], pred: impl Fn(&T) -> bool) -> usize {
    items.iter().filter(|item| pred(*item)).count()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttendanceStats {
    pub records_today: usize,
    pub present_today: usize,
    pub rate_today: u32,
    pub hours_today: f64,
}

impl AttendanceStats {
    pub fn compute(records: &[Attendance], today: NaiveDate) -> Self {
        let mut stats = Self::default();
        for record in records.iter().filter(|r| is_on(&r.date, today)) {
            stats.records_today += 1;
            if record.status == "present" {
                stats.present_today += 1;
            }
            stats.hours_today += record.hours_worked + record.overtime_hours;
        }
        stats.rate_today = percentage(stats.present_today, stats.records_today);
        stats
    }
}
