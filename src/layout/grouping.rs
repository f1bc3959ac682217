//! Partition events by exact effective date.

use crate::event::Event;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Event indices split by how many events share their date, both in date
/// order. Members of a cluster keep input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grouping {
    pub standalone: Vec<(NaiveDate, usize)>,
    pub clustered: Vec<(NaiveDate, Vec<usize>)>,
}

pub fn group_by_date(events: &[Event]) -> Grouping {
    let mut by_date: BTreeMap<NaiveDate, Vec<usize>> = BTreeMap::new();
    for (idx, event) in events.iter().enumerate() {
        by_date.entry(event.effective).or_default().push(idx);
    }

    let mut grouping = Grouping::default();
    for (date, members) in by_date {
        match members.as_slice() {
            [single] => grouping.standalone.push((date, *single)),
            _ => grouping.clustered.push((date, members)),
        }
    }
    grouping
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(y: i32, m: u32, d: u32, label: &str) -> Event {
        Event::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), "A", label)
    }

    #[test]
    fn test_split_by_cardinality() {
        let events = vec![
            ev(2025, 3, 1, "a"),
            ev(2025, 1, 1, "b"),
            ev(2025, 3, 1, "c"),
            ev(2025, 2, 1, "d"),
        ];
        let g = group_by_date(&events);

        assert_eq!(g.standalone.len(), 2);
        assert_eq!(g.standalone[0].1, 1);
        assert_eq!(g.standalone[1].1, 3);
        assert_eq!(g.clustered.len(), 1);
        assert_eq!(g.clustered[0].1, vec![0, 2]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(group_by_date(&[]), Grouping::default());
    }
}
