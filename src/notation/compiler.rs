// buzz.txt -- a text based buzzer pattern engine
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Translates the notation into keyframes.
//!
//! Every token is a single character:
//!
//! - `a`-`g`, optionally followed by `#` (sharp) or `$` (flat), plays a note
//!   in the current octave for the current length,
//! - `o<digit>` sets the octave (default 3),
//! - `l<digit>` sets the note length in eighths of a second (default 1),
//! - `r<digit>` rests for the given number of eighths of a second.

use log::debug;

use super::error::{ParseError, ParseErrorKind};
use crate::note::{length_to_ms, Accidental, NoteName, NoteToken};
use crate::pattern::{Keyframe, Pattern, Waveform};

const DEFAULT_OCTAVE: i8 = 3;
const DEFAULT_LENGTH: i8 = 1;

/// Compile a notation string into a non-looping square wave pattern.
///
/// # Examples
///
/// ```
/// use buzz_txt::notation::compile;
/// use buzz_txt::pattern::Keyframe;
///
/// let p = compile("o4l2ar1c#").unwrap();
/// assert_eq!(
///     p.keyframes(),
///     &[Keyframe::tone(440, 250), Keyframe::rest(125), Keyframe::tone(277, 250)]
/// );
/// ```
pub fn compile(text: &str) -> Result<Pattern, ParseError> {
    let expected = count_keyframes(text);
    let result = Compiler::new(text, expected).compile();
    if let Err(err) = &result {
        debug!("rejected {:?}: {}\n{}", text, err, err.highlight());
    }
    result
}

/// Like [`compile`], but with the given waveform and loop flag.
pub fn compile_with(text: &str, waveform: Waveform, looping: bool) -> Result<Pattern, ParseError> {
    compile(text).map(|p| p.with_waveform(waveform).looping(looping))
}

/// The number of keyframes a notation string produces if it is accepted.
pub fn count_keyframes(text: &str) -> usize {
    text.chars()
        .filter(|ch| matches!(ch, 'a'..='g' | 'r'))
        .count()
}

struct Compiler<'a> {
    text: &'a str,
    stream: Scan<'a>,
    /// Number of keyframes counted up front.
    expected: usize,
    keyframes: Vec<Keyframe>,
    octave: i8,
    length: i8,
}

impl<'a> Compiler<'a> {
    fn new(text: &'a str, expected: usize) -> Self {
        Self {
            text,
            stream: Scan::new(text),
            expected,
            keyframes: Vec::with_capacity(expected),
            octave: DEFAULT_OCTAVE,
            length: DEFAULT_LENGTH,
        }
    }

    fn compile(mut self) -> Result<Pattern, ParseError> {
        while let Some((offset, ch)) = self.stream.next() {
            match ch {
                'a'..='g' => self.note(offset, ch)?,
                'o' => self.octave = self.directive_digit(ch)?,
                'l' => self.length = self.directive_digit(ch)?,
                'r' => {
                    let length = self.directive_digit(ch)?;
                    self.emit(offset, Keyframe::rest(length_to_ms(length)))?;
                }
                _ => return Err(self.error(offset, ParseErrorKind::UnknownToken { token: ch })),
            }
        }

        if self.keyframes.len() != self.expected {
            return Err(self.error(
                self.text.len(),
                ParseErrorKind::FrameCountMismatch {
                    expected: self.expected,
                    actual: self.keyframes.len(),
                },
            ));
        }

        let text = self.text;
        Pattern::new(self.keyframes).ok_or_else(|| ParseError::new(text, 0, ParseErrorKind::EmptyPattern))
    }

    fn note(&mut self, offset: usize, letter: char) -> Result<(), ParseError> {
        let name = NoteName::from_char(letter)
            .ok_or_else(|| self.error(offset, ParseErrorKind::InvalidNote { letter }))?;
        let accidental = match self.stream.current().and_then(|(_, ch)| Accidental::from_char(ch)) {
            Some(accidental) => {
                self.stream.advance();
                accidental
            }
            None => Accidental::Natural,
        };

        let token = NoteToken {
            name,
            accidental,
            octave: self.octave,
            length: self.length,
        };
        let frequency = token.frequency().map_err(|kind| self.error(offset, kind))?;
        self.emit(offset, Keyframe::tone(frequency as u16, token.duration_ms()))
    }

    /// Consume the digit following a directive.
    fn directive_digit(&mut self, directive: char) -> Result<i8, ParseError> {
        match self.stream.current() {
            Some((_, ch)) if ch.is_ascii_digit() => {
                self.stream.advance();
                Ok((ch as u8 - b'0') as i8)
            }
            Some((offset, _)) => Err(self.error(
                offset,
                ParseErrorKind::MissingDigitAfterDirective { directive },
            )),
            None => Err(self.error(
                self.text.len(),
                ParseErrorKind::MissingDigitAfterDirective { directive },
            )),
        }
    }

    fn emit(&mut self, offset: usize, keyframe: Keyframe) -> Result<(), ParseError> {
        if self.keyframes.len() == self.expected {
            return Err(self.error(
                offset,
                ParseErrorKind::FrameCountMismatch {
                    expected: self.expected,
                    actual: self.expected + 1,
                },
            ));
        }
        self.keyframes.push(keyframe);
        Ok(())
    }

    fn error(&self, offset: usize, kind: ParseErrorKind) -> ParseError {
        ParseError::new(self.text, offset, kind)
    }
}

struct Scan<'a> {
    stream: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Scan<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            stream: input.char_indices().peekable(),
        }
    }

    fn current(&mut self) -> Option<(usize, char)> {
        self.stream.peek().cloned()
    }

    fn next(&mut self) -> Option<(usize, char)> {
        self.stream.next()
    }

    fn advance(&mut self) {
        self.stream.next();
    }
}
