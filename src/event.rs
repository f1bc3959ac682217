use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

/// One milestone as read from the event file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub effective: NaiveDate,
    pub planned: Option<NaiveDate>,
    pub owner: String,
    pub label: String,
}

impl Event {
    pub fn new(effective: NaiveDate, owner: &str, label: &str) -> Self {
        Self {
            effective,
            planned: None,
            owner: owner.to_string(),
            label: label.to_string(),
        }
    }

    pub fn with_planned(mut self, planned: NaiveDate) -> Self {
        self.planned = Some(planned);
        self
    }

    /// Signed day delta `effective - planned`, if a planned date exists.
    pub fn delay_days(&self) -> Option<i64> {
        self.planned.map(|p| (self.effective - p).num_days())
    }
}

/// Parsed event file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub title: Option<String>,
    pub events: Vec<Event>,
}

/// How the visible range was chosen; only affects captions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RangeKind {
    CalendarYear,
    Rolling,
    Custom,
}

/// Inclusive visible date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub kind: RangeKind,
}

impl DateRange {
    pub fn custom(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            kind: RangeKind::Custom,
        }
    }

    /// January 1st to December 31st of the year containing `date`.
    pub fn calendar_year(date: NaiveDate) -> Self {
        let year = date.year();
        let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(date);
        let end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(date);
        Self {
            start,
            end,
            kind: RangeKind::CalendarYear,
        }
    }

    /// 365 days either side of `date`.
    pub fn rolling(date: NaiveDate) -> Self {
        Self {
            start: date - Duration::days(365),
            end: date + Duration::days(365),
            kind: RangeKind::Rolling,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// X coordinate of `date`, in days from the range start.
    pub fn offset(&self, date: NaiveDate) -> f64 {
        (date - self.start).num_days() as f64
    }

    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }
}
