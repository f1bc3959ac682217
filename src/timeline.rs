use crate::event::{DateRange, Document, Event};
use crate::palette::{OwnerColors, Palette};
use chrono::NaiveDate;
use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Parse error: {0}")]
    Parse(#[from] crate::parser::ParseError),
    #[error("Invalid range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("No events between {start} and {end}")]
    EmptyRange { start: NaiveDate, end: NaiveDate },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Caller-side display settings for one render.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub range: DateRange,
    pub show_today: bool,
    pub today: NaiveDate,
    pub title: Option<String>,
    pub palette: Palette,
}

impl RenderOptions {
    pub fn new(range: DateRange, today: NaiveDate) -> Self {
        Self {
            range,
            show_today: true,
            today,
            title: None,
            palette: Palette::default(),
        }
    }
}

/// Events ready for layout: inside the visible range, sorted by date.
#[derive(Debug, Clone)]
pub struct Timeline {
    pub title: String,
    pub range: DateRange,
    pub events: Vec<Event>,
    pub colors: OwnerColors,
    /// Today's date, when the marker should be drawn.
    pub today: Option<NaiveDate>,
    pub generated_on: NaiveDate,
}

impl Timeline {
    pub fn from_document(doc: &Document, options: &RenderOptions) -> Result<Self, RenderError> {
        let range = options.range;
        if !range.is_valid() {
            return Err(RenderError::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }

        let mut events: Vec<Event> = doc
            .events
            .iter()
            .filter(|e| range.contains(e.effective))
            .cloned()
            .collect();
        if events.is_empty() {
            return Err(RenderError::EmptyRange {
                start: range.start,
                end: range.end,
            });
        }
        // Stable: same-date events keep file order.
        events.sort_by_key(|e| e.effective);

        let colors = options
            .palette
            .assign(events.iter().map(|e| e.owner.as_str()));

        let title = options
            .title
            .clone()
            .or_else(|| doc.title.clone())
            .unwrap_or_default();

        let today = (options.show_today && range.contains(options.today)).then_some(options.today);

        Ok(Self {
            title,
            range,
            events,
            colors,
            today,
            generated_on: options.today,
        })
    }

    /// True when any date carries more than one event.
    pub fn requires_tree_mode(&self) -> bool {
        requires_tree_mode(&self.events)
    }
}

pub fn requires_tree_mode(events: &[Event]) -> bool {
    let mut counts: HashMap<NaiveDate, usize> = HashMap::new();
    for e in events {
        let n = counts.entry(e.effective).or_insert(0);
        *n += 1;
        if *n > 1 {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn options() -> RenderOptions {
        RenderOptions::new(DateRange::calendar_year(d(2025, 1, 1)), d(2025, 6, 1))
    }

    #[test]
    fn test_filters_and_sorts() {
        let input = r#"
            2025-09-01 | | Board | Late
            2024-12-31 | | Board | Outside
            2025-02-01 | | Board | Early
        "#;
        let doc = Parser::new(input).parse().unwrap();
        let tl = Timeline::from_document(&doc, &options()).unwrap();

        let labels: Vec<&str> = tl.events.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Early", "Late"]);
        assert!(!tl.requires_tree_mode());
    }

    #[test]
    fn test_same_date_keeps_file_order() {
        let input = "2025-03-01 | | A | second\n2025-01-01 | | A | first\n2025-03-01 | | B | third";
        let doc = Parser::new(input).parse().unwrap();
        let tl = Timeline::from_document(&doc, &options()).unwrap();

        let labels: Vec<&str> = tl.events.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["first", "second", "third"]);
        assert!(tl.requires_tree_mode());
    }

    #[test]
    fn test_empty_range_error() {
        let doc = Parser::new("2023-01-01 | | A | old").parse().unwrap();
        let err = Timeline::from_document(&doc, &options()).unwrap_err();
        assert!(matches!(err, RenderError::EmptyRange { .. }));
    }

    #[test]
    fn test_invalid_range_error() {
        let doc = Parser::new("2025-01-01 | | A | x").parse().unwrap();
        let mut opts = options();
        opts.range = DateRange::custom(d(2025, 5, 1), d(2025, 4, 1));
        let err = Timeline::from_document(&doc, &opts).unwrap_err();
        assert!(matches!(err, RenderError::InvalidRange { .. }));
    }

    #[test]
    fn test_today_marker_only_inside_range() {
        let doc = Parser::new("2025-01-01 | | A | x").parse().unwrap();
        let mut opts = options();
        assert_eq!(Timeline::from_document(&doc, &opts).unwrap().today, Some(d(2025, 6, 1)));

        opts.today = d(2026, 2, 1);
        assert_eq!(Timeline::from_document(&doc, &opts).unwrap().today, None);

        opts.today = d(2025, 6, 1);
        opts.show_today = false;
        assert_eq!(Timeline::from_document(&doc, &opts).unwrap().today, None);
    }

    #[test]
    fn test_title_override() {
        let doc = Parser::new("@title From file\n2025-01-01 | | A | x").parse().unwrap();
        let mut opts = options();
        assert_eq!(Timeline::from_document(&doc, &opts).unwrap().title, "From file");
        opts.title = Some("Override".into());
        assert_eq!(Timeline::from_document(&doc, &opts).unwrap().title, "Override");
    }
}
