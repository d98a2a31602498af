// buzz.txt -- a text based buzzer pattern engine
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

use std::fmt;

use snafu::Snafu;

use super::line_map::LineMap;
use crate::note::Accidental;

/// The ways a notation string can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
pub enum ParseErrorKind {
    #[snafu(display("{:?} does not name a note", letter))]
    InvalidNote { letter: char },
    #[snafu(display("{}{} is not a note", letter, accidental.symbol()))]
    InvalidModifierPairing { letter: char, accidental: Accidental },
    #[snafu(display("octave {} is outside the playable range", octave))]
    NoteOutOfRange { octave: i8 },
    #[snafu(display("'{}' must be followed by a digit", directive))]
    MissingDigitAfterDirective { directive: char },
    #[snafu(display("unexpected character {:?}", token))]
    UnknownToken { token: char },
    #[snafu(display("expected {} keyframes but produced {}", expected, actual))]
    FrameCountMismatch { expected: usize, actual: usize },
    #[snafu(display("no notes or rests to play"))]
    EmptyPattern,
}

/// A rejected notation string, together with the byte offset of the offending character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    offset: usize,
    kind: ParseErrorKind,
    text: String,
}

impl ParseError {
    pub fn new(text: &str, offset: usize, kind: ParseErrorKind) -> Self {
        Self {
            offset,
            kind,
            text: text.to_owned(),
        }
    }

    /// Byte offset into the text. Equal to the text length if the text ended too early.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Render the text with a caret under the offending character.
    pub fn highlight(&self) -> String {
        let lines = LineMap::new(&self.text);
        let start = lines.offset_to_pos(self.offset);
        let end = match self.text[self.offset..].chars().next() {
            // A line break is underlined at the end of the line it terminates.
            None | Some('\n') => start,
            Some(ch) => lines.offset_to_pos(self.offset + ch.len_utf8()),
        };
        lines.highlight(start, end)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.kind, self.offset)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display() {
        let err = ParseError::new("o4c$", 2, ParseErrorKind::InvalidModifierPairing {
            letter: 'c',
            accidental: Accidental::Flat,
        });
        assert_eq!(err.to_string(), "c$ is not a note at offset 2");

        let err = ParseError::new("l", 1, ParseErrorKind::MissingDigitAfterDirective { directive: 'l' });
        assert_eq!(err.to_string(), "'l' must be followed by a digit at offset 1");
    }

    #[test]
    fn caret_under_offending_char() {
        let err = ParseError::new("o4cdx", 4, ParseErrorKind::UnknownToken { token: 'x' });
        assert_eq!(err.highlight(), "   1|o4cdx\n         ^\n");
    }

    #[test]
    fn caret_under_line_break() {
        let err = ParseError::new("a\n", 1, ParseErrorKind::UnknownToken { token: '\n' });
        assert_eq!(err.highlight(), "   1|a\n      ^\n   2|\n");
    }

    #[test]
    fn caret_past_the_end() {
        let err = ParseError::new("ab", 2, ParseErrorKind::FrameCountMismatch { expected: 1, actual: 2 });
        assert_eq!(err.highlight(), "   1|ab\n       ^\n");
    }
}
