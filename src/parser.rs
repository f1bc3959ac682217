//! Event file parser.
//!
//! One event per line, fields separated by `|`:
//!
//! ```text
//! @title Grid tariff review
//! # effective | planned    | owner       | label
//! 2025-03-10  | 2025-02-28 | Commission  | Preliminary report
//! 2025-04-01  |            | Coordinator | Public hearing
//! ```

use crate::event::{Document, Event};
use chrono::NaiveDate;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: missing {field} field")]
    MissingField { line: usize, field: &'static str },
    #[error("line {line}: invalid date {value:?}")]
    InvalidDate { line: usize, value: String },
    #[error("line {line}: unknown directive @{name}")]
    UnknownDirective { line: usize, name: String },
    #[error("line {line}: too many fields ({count}), expected at most 4")]
    TooManyFields { line: usize, count: usize },
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

pub struct Parser<'a> {
    input: &'a str,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    pub fn parse(&self) -> Result<Document, ParseError> {
        let mut doc = Document::default();

        for (idx, raw) in self.input.lines().enumerate() {
            let line = idx + 1;
            let text = strip_comment(raw).trim();
            if text.is_empty() {
                continue;
            }

            if let Some(directive) = text.strip_prefix('@') {
                let (name, value) = directive
                    .split_once(char::is_whitespace)
                    .unwrap_or((directive, ""));
                match name {
                    "title" => doc.title = Some(value.trim().to_string()),
                    _ => {
                        return Err(ParseError::UnknownDirective {
                            line,
                            name: name.to_string(),
                        });
                    }
                }
                continue;
            }

            doc.events.push(parse_event(text, line)?);
        }

        Ok(doc)
    }
}

fn parse_event(text: &str, line: usize) -> Result<Event, ParseError> {
    let fields: Vec<&str> = text.split('|').map(str::trim).collect();
    if fields.len() > 4 {
        return Err(ParseError::TooManyFields {
            line,
            count: fields.len(),
        });
    }

    let effective = match fields.first() {
        Some(s) if !s.is_empty() => parse_date(s, line)?,
        _ => {
            return Err(ParseError::MissingField {
                line,
                field: "effective date",
            });
        }
    };

    let planned = match fields.get(1) {
        Some(s) if !s.is_empty() => Some(parse_date(s, line)?),
        _ => None,
    };

    let owner = fields.get(2).copied().unwrap_or("");
    let label = match fields.get(3) {
        Some(s) if !s.is_empty() => *s,
        _ => return Err(ParseError::MissingField { line, field: "label" }),
    };

    Ok(Event {
        effective,
        planned,
        owner: owner.to_string(),
        label: label.to_string(),
    })
}

pub fn parse_date(s: &str, line: usize) -> Result<NaiveDate, ParseError> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .ok_or_else(|| ParseError::InvalidDate {
            line,
            value: s.to_string(),
        })
}

// `#` only starts a comment at line start or after whitespace, so labels like
// "Phase #2" survive.
fn strip_comment(line: &str) -> &str {
    let mut prev_ws = true;
    for (i, c) in line.char_indices() {
        if c == '#' && prev_ws {
            return &line[..i];
        }
        prev_ws = c.is_whitespace();
    }
    line
}
