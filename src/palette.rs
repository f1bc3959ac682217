//! Owner → color assignment.

use serde::Serialize;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PaletteError {
    #[error("expected OWNER=#RRGGBB, got {0:?}")]
    MissingSeparator(String),
    #[error("empty owner in {0:?}")]
    EmptyOwner(String),
    #[error("invalid color {0:?}, expected #RGB or #RRGGBB")]
    InvalidColor(String),
}

pub const DEFAULT_COLOR: &str = "#7f8c8d";

/// Owners with a fixed color unless a caller overrides them.
const KNOWN_OWNERS: [(&str, &str); 8] = [
    ("Comisión", "#0400ff"),
    ("CNE", "#0400ff"),
    ("Participantes", "#27ae60"),
    ("Participantes e interesados", "#27ae60"),
    ("Interesados", "#27ae60"),
    ("Empresas", "#27ae60"),
    ("Coordinador", "#e67e22"),
    ("CEN", "#e67e22"),
];

const FALLBACK_CYCLE: [&str; 5] = ["#ff0000", "#8e44ad", "#16a085", "#34495e", "#d35400"];

/// Color configuration: fixed owner colors plus a cycle for everyone else.
#[derive(Debug, Clone)]
pub struct Palette {
    pub known: Vec<(String, String)>,
    pub fallback: Vec<String>,
    pub default_color: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            known: KNOWN_OWNERS
                .iter()
                .map(|(o, c)| (o.to_string(), c.to_string()))
                .collect(),
            fallback: FALLBACK_CYCLE.iter().map(|c| c.to_string()).collect(),
            default_color: DEFAULT_COLOR.to_string(),
        }
    }
}

impl Palette {
    /// Add fixed owner colors; an owner already present gets the new color.
    pub fn with_known<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (owner, color) in entries {
            let (owner, color) = (owner.into(), color.into());
            match self.known.iter_mut().find(|(o, _)| *o == owner) {
                Some(entry) => entry.1 = color,
                None => self.known.push((owner, color)),
            }
        }
        self
    }

    /// Resolve colors for `owners`, in first-seen order. Unknown owners take
    /// the next fallback color; empty owners keep the default color.
    pub fn assign<'a>(&self, owners: impl IntoIterator<Item = &'a str>) -> OwnerColors {
        let mut entries: Vec<(String, String)> = Vec::new();
        let mut next_fallback = 0usize;

        for owner in owners {
            if entries.iter().any(|(o, _)| o == owner) {
                continue;
            }
            let color = if let Some((_, c)) = self.known.iter().find(|(k, _)| k == owner) {
                c.clone()
            } else if owner.is_empty() || self.fallback.is_empty() {
                self.default_color.clone()
            } else {
                let c = self.fallback[next_fallback % self.fallback.len()].clone();
                next_fallback += 1;
                c
            };
            entries.push((owner.to_string(), color));
        }

        OwnerColors {
            entries,
            default_color: self.default_color.clone(),
        }
    }
}

/// Parse an `OWNER=#RRGGBB` override. The owner may contain spaces.
pub fn parse_owner_color(spec: &str) -> Result<(String, String), PaletteError> {
    let (owner, color) = spec
        .rsplit_once('=')
        .ok_or_else(|| PaletteError::MissingSeparator(spec.to_string()))?;
    let (owner, color) = (owner.trim(), color.trim());
    if owner.is_empty() {
        return Err(PaletteError::EmptyOwner(spec.to_string()));
    }
    let valid = color
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()));
    if !valid {
        return Err(PaletteError::InvalidColor(color.to_string()));
    }
    Ok((owner.to_string(), color.to_string()))
}

/// Parse a `;`-separated list of `OWNER=#RRGGBB` overrides.
pub fn parse_owner_colors(list: &str) -> Result<Vec<(String, String)>, PaletteError> {
    list.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_owner_color)
        .collect()
}

/// Resolved owner colors for one render, in legend order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnerColors {
    pub entries: Vec<(String, String)>,
    pub default_color: String,
}

impl OwnerColors {
    pub fn color(&self, owner: &str) -> &str {
        self.entries
            .iter()
            .find(|(o, _)| o == owner)
            .map(|(_, c)| c.as_str())
            .unwrap_or(&self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_owner_keeps_color() {
        let palette = Palette::default().with_known([("Commission", "#0400ff")]);
        let colors = palette.assign(["Commission", "Board"]);
        assert_eq!(colors.color("Commission"), "#0400ff");
        assert_eq!(colors.color("Board"), FALLBACK_CYCLE[0]);
    }

    #[test]
    fn test_default_table_colors_regulator_owners() {
        let colors = Palette::default().assign(["Board", "CNE", "Coordinador", "Empresas"]);
        assert_eq!(colors.color("CNE"), "#0400ff");
        assert_eq!(colors.color("Coordinador"), "#e67e22");
        assert_eq!(colors.color("Empresas"), "#27ae60");
        // table owners do not consume fallback slots
        assert_eq!(colors.color("Board"), FALLBACK_CYCLE[0]);
    }

    #[test]
    fn test_override_replaces_table_color() {
        let palette = Palette::default().with_known([("CEN", "#000000")]);
        assert_eq!(palette.assign(["CEN"]).color("CEN"), "#000000");
    }

    #[test]
    fn test_parse_owner_color() {
        assert_eq!(
            parse_owner_color("Participantes e interesados=#27ae60"),
            Ok(("Participantes e interesados".to_string(), "#27ae60".to_string()))
        );
        assert_eq!(
            parse_owner_color("Board = #abc"),
            Ok(("Board".to_string(), "#abc".to_string()))
        );
        assert!(matches!(
            parse_owner_color("Board"),
            Err(PaletteError::MissingSeparator(_))
        ));
        assert!(matches!(
            parse_owner_color("=#ffffff"),
            Err(PaletteError::EmptyOwner(_))
        ));
        assert!(matches!(
            parse_owner_color("Board=red"),
            Err(PaletteError::InvalidColor(_))
        ));
        assert!(matches!(
            parse_owner_color("Board=#12345g"),
            Err(PaletteError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_parse_owner_color_list() {
        let list = parse_owner_colors("A=#111111; B=#222 ;").unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1], ("B".to_string(), "#222".to_string()));
    }

    #[test]
    fn test_fallback_cycles_in_first_seen_order() {
        let colors = Palette::default().assign(["a", "b", "a", "c", "d", "e", "f"]);
        let order: Vec<&str> = colors.entries.iter().map(|(o, _)| o.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c", "d", "e", "f"]);
        assert_eq!(colors.color("b"), FALLBACK_CYCLE[1]);
        // sixth unknown owner wraps around
        assert_eq!(colors.color("f"), FALLBACK_CYCLE[0]);
    }

    #[test]
    fn test_empty_and_unseen_owner_get_default() {
        let colors = Palette::default().assign(["", "x"]);
        assert_eq!(colors.color(""), DEFAULT_COLOR);
        assert_eq!(colors.color("x"), FALLBACK_CYCLE[0]);
        assert_eq!(colors.color("never-seen"), DEFAULT_COLOR);
    }
}
