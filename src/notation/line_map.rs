//! Bits and pieces for pointing at places in notation text.

use std::fmt;
use std::ops::Range;

/// Position inside a text in a form that's useful for human readers.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Pos {
    /// Line number, starting at 1
    pub line: usize,
    /// Position within the line, in characters, starting at 1
    pub column: usize,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A data structure for mapping byte offsets to line/column based positions.
pub struct LineMap<'a> {
    /// Ordered vector of the position of line breaks (`\n`)
    line_offsets: Vec<usize>,
    /// The original string, needed for obtaining the column indices.
    source: &'a str,
}

impl<'a> LineMap<'a> {
    pub fn new(s: &'a str) -> Self {
        Self {
            line_offsets: s
                .char_indices()
                .filter_map(|(pos, ch)| if ch == '\n' { Some(pos) } else { None })
                .collect(),
            source: s,
        }
    }

    /// # Examples
    ///
    /// ```
    /// # use buzz_txt::notation::line_map::{LineMap, Pos};
    /// let s = "abc\ndefg\naäb\n";
    /// let m = LineMap::new(s);
    /// assert_eq!(m.offset_to_pos(0), Pos { line: 1, column: 1 });
    /// assert_eq!(m.offset_to_pos(3), Pos { line: 1, column: 4 });
    /// assert_eq!(m.offset_to_pos(4), Pos { line: 2, column: 1 });
    /// assert_eq!(m.offset_to_pos(10), Pos { line: 3, column: 2 });
    /// assert_eq!(m.offset_to_pos(12), Pos { line: 3, column: 3 });
    /// ```
    pub fn offset_to_pos(&self, offset: usize) -> Pos {
        // A line break belongs to the line it terminates.
        let line = match self.line_offsets.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line,
        };
        let line_start = if line > 0 {
            self.line_offsets[line - 1] + 1
        } else {
            0
        };
        Pos {
            line: line + 1,
            column: self.source[line_start..offset].chars().count() + 1,
        }
    }

    /// Return the extent of the given line (starting at 1), without the line break.
    pub fn line_span(&self, line: usize) -> Range<usize> {
        let begin = if line <= 1 {
            0
        } else if line - 2 >= self.line_offsets.len() {
            self.source.len()
        } else {
            self.line_offsets[line - 2] + 1
        };

        let end = if line >= 1 && line - 1 < self.line_offsets.len() {
            self.line_offsets[line - 1]
        } else {
            self.source.len()
        };
        begin..end
    }

    /// Takes the lines indicated by the given range, plus one before and one after,
    /// and prints them with line numbers, while underlining the range itself with `^`
    /// symbols. The end position is exclusive, but at least one column is underlined.
    ///
    /// # Examples
    ///
    /// ```
    /// # use buzz_txt::notation::line_map::*;
    /// let s = "abcd\nefgh\nijkl\nmnop";
    /// let m = LineMap::new(s);
    /// assert_eq!(
    ///   m.highlight(Pos { line: 2, column: 3 }, Pos { line: 3, column: 2 }),
    /// r#"   1|abcd
    ///    2|efgh
    ///        ^^
    ///    3|ijkl
    ///      ^
    ///    4|mnop
    /// "#
    /// )
    /// ```
    pub fn highlight(&self, start: Pos, end: Pos) -> String {
        let mut out = String::new();
        let display_start = 1.max(start.line - 1);
        let display_end = (self.line_offsets.len() + 1).min(end.line + 1);
        for line in display_start..=display_end {
            let line_span = self.line_span(line);
            let line_str = &self.source[line_span];
            out.push_str(&format!("{:4}|{}\n", line, line_str));

            if line >= start.line && line <= end.line {
                let col_start = if line == start.line { start.column } else { 1 };
                let col_end = if line == end.line {
                    end.column
                } else {
                    line_str.chars().count() + 1
                };
                out.push_str("     ");
                out.extend(std::iter::repeat(' ').take(col_start - 1));
                out.extend(std::iter::repeat('^').take(col_end.saturating_sub(col_start).max(1)));
                out.push('\n');
            }
        }
        out
    }
}
