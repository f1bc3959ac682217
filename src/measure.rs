use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub struct TextMetrics {
    /// Font size in pixels the widths below are measured at.
    pub font_size: f64,
    pub char_width: f64,
    pub line_height: f64,
    pub padding_x: f64,
    pub padding_y: f64,
    pub owner_wrap: usize,
    pub label_wrap: usize,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            font_size: 11.0,
            char_width: 6.5,
            line_height: 13.0,
            padding_x: 6.0,
            padding_y: 5.0,
            owner_wrap: 20,
            label_wrap: 25,
        }
    }
}

impl TextMetrics {
    pub fn text_width(&self, text: &str) -> f64 {
        let width = UnicodeWidthStr::width(text);
        width as f64 * self.char_width
    }

    /// Lines of an event label box: upper-cased owner, label, date.
    pub fn label_lines(&self, owner: &str, label: &str, date: &str) -> Vec<String> {
        let mut lines = wrap(&owner.to_uppercase(), self.owner_wrap);
        lines.extend(wrap(label, self.label_wrap));
        lines.push(date.to_string());
        lines
    }

    pub fn box_size(&self, lines: &[String]) -> (f64, f64) {
        let content_width = lines
            .iter()
            .map(|l| self.text_width(l))
            .fold(0.0, f64::max);
        let width = content_width + self.padding_x * 2.0;
        let height = lines.len() as f64 * self.line_height + self.padding_y * 2.0;
        (width, height)
    }
}

/// Greedy word wrap by display width. Words wider than `columns` are split
/// across lines.
pub fn wrap(text: &str, columns: usize) -> Vec<String> {
    let columns = columns.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() && word.width() <= columns {
            current.push_str(word);
        } else if !current.is_empty() && current.width() + 1 + word.width() <= columns {
            current.push(' ');
            current.push_str(word);
        } else {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let mut pieces = split_long_word(word, columns);
            if let Some(last) = pieces.pop() {
                lines.extend(pieces);
                current = last;
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn split_long_word(word: &str, columns: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut width = 0;
    for c in word.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > columns && !piece.is_empty() {
            pieces.push(std::mem::take(&mut piece));
            width = 0;
        }
        piece.push(c);
        width += w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_width() {
        let m = TextMetrics::default();
        assert_eq!(m.text_width("Hito"), 4.0 * 6.5);
    }

    #[test]
    fn test_unicode_width() {
        let m = TextMetrics::default();
        // full-width characters count double
        assert_eq!(m.text_width("マイル"), 6.0 * 6.5);
        assert_eq!(m.text_width("Comisión"), 8.0 * 6.5);
    }

    #[test]
    fn test_wrap_respects_columns() {
        let lines = wrap("Publication of the preliminary technical report", 25);
        assert_eq!(
            lines,
            vec!["Publication of the", "preliminary technical", "report"]
        );
        assert!(lines.iter().all(|l| l.width() <= 25));
    }

    #[test]
    fn test_wrap_long_word_and_empty() {
        assert_eq!(wrap("Interconnection", 5), vec!["Inter", "conne", "ction"]);
        assert_eq!(wrap("to Interconnection", 6), vec!["to", "Interc", "onnect", "ion"]);
        // full-width characters are two columns each
        assert_eq!(wrap("マイルストーン", 4), vec!["マイ", "ルス", "トー", "ン"]);
        assert!(wrap("   ", 10).is_empty());
    }

    #[test]
    fn test_label_lines_and_box() {
        let m = TextMetrics::default();
        let lines = m.label_lines("coordinator", "Public hearing", "3-Mar");
        assert_eq!(lines, vec!["COORDINATOR", "Public hearing", "3-Mar"]);

        let (w, h) = m.box_size(&lines);
        assert_eq!(w, 14.0 * 6.5 + 12.0);
        assert_eq!(h, 3.0 * 13.0 + 10.0);
    }
}
