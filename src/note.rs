// buzz.txt -- a text based buzzer pattern engine
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Definitions of what a note is, and how it maps to a frequency.

use crate::notation::ParseErrorKind;

/// Number of octaves covered by [`NOTE_FREQUENCIES`].
pub const OCTAVES: usize = 9;

/// Frequencies in Hz of all notes from C0 to B8, twelve semitones per octave.
pub const NOTE_FREQUENCIES: [f32; OCTAVES * 12] = [
    16.0, 17.0, 18.0, 19.0, 20.0, 21.8, 23.0, 24.5, 25.9, 27.5, 29.1, 30.8, //
    33.0, 34.0, 36.0, 38.0, 41.0, 43.6, 46.0, 48.9, 51.9, 55.0, 58.2, 61.7, //
    65.0, 69.0, 73.0, 77.0, 82.0, 87.3, 92.0, 97.9, 103.0, 110.0, 116.0, 123.0, //
    131.0, 138.0, 146.0, 155.0, 164.0, 174.0, 184.0, 195.0, 207.0, 220.0, 233.0, 246.0, //
    261.0, 277.0, 293.0, 311.0, 329.0, 349.0, 369.0, 391.0, 415.0, 440.0, 466.0, 493.0, //
    523.0, 554.0, 587.0, 622.0, 659.0, 698.0, 739.0, 783.0, 830.0, 880.0, 932.0, 987.0, //
    1046.0, 1108.0, 1174.0, 1244.0, 1318.0, 1396.0, 1479.0, 1567.0, 1661.0, 1760.0, 1864.0,
    1975.0, //
    2093.0, 2217.0, 2349.0, 2489.0, 2637.0, 2793.0, 2959.0, 3135.0, 3324.0, 3520.0, 3729.0,
    3951.0, //
    4186.0, 4434.0, 4698.0, 4978.0, 5274.0, 5587.0, 5919.0, 6271.0, 6644.0, 7040.0, 7458.0,
    7902.0,
];

/// The name of a note in standard notation.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum NoteName {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

/// Any offset applied to a note in standard notation.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Accidental {
    /// The note is a half-tone lower then indicated by its name.
    Flat,
    /// The note is left unchanged.
    Natural,
    /// The note is a half-tone higher then indicated by its name.
    Sharp,
}

impl NoteName {
    pub const ALL: [NoteName; 7] = [
        NoteName::A,
        NoteName::B,
        NoteName::C,
        NoteName::D,
        NoteName::E,
        NoteName::F,
        NoteName::G,
    ];

    /// Only the lowercase letters `a` to `g` name notes.
    pub fn from_char(ch: char) -> Option<NoteName> {
        match ch {
            'a' => Some(NoteName::A),
            'b' => Some(NoteName::B),
            'c' => Some(NoteName::C),
            'd' => Some(NoteName::D),
            'e' => Some(NoteName::E),
            'f' => Some(NoteName::F),
            'g' => Some(NoteName::G),
            _ => None,
        }
    }

    /// Semitones above C within the same octave.
    pub fn semitone(self) -> i32 {
        match self {
            NoteName::C => 0,
            NoteName::D => 2,
            NoteName::E => 4,
            NoteName::F => 5,
            NoteName::G => 7,
            NoteName::A => 9,
            NoteName::B => 11,
        }
    }
}

impl Accidental {
    pub const ALL: [Accidental; 3] = [Accidental::Flat, Accidental::Natural, Accidental::Sharp];

    pub fn from_char(ch: char) -> Option<Accidental> {
        match ch {
            '#' => Some(Accidental::Sharp),
            '$' => Some(Accidental::Flat),
            _ => None,
        }
    }

    /// The character spelling this accidental in the notation.
    pub fn symbol(self) -> &'static str {
        match self {
            Accidental::Flat => "$",
            Accidental::Natural => "",
            Accidental::Sharp => "#",
        }
    }

    pub fn semitone(self) -> i32 {
        match self {
            Accidental::Flat => -1,
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
        }
    }
}

/// A single note as written in the notation, before it is resolved to a keyframe.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct NoteToken {
    pub name: NoteName,
    pub accidental: Accidental,
    pub octave: i8,
    /// Length in eighths of a second.
    pub length: i8,
}

impl NoteToken {
    pub fn frequency(&self) -> Result<f32, ParseErrorKind> {
        frequency_for_name(self.name, self.accidental, self.octave)
    }

    pub fn duration_ms(&self) -> u16 {
        length_to_ms(self.length)
    }
}

/// Duration of a note or rest given its length in eighths of a second.
pub fn length_to_ms(length: i8) -> u16 {
    (length.max(0) as u16) * 1000 / 8
}

/// Look up the frequency of a note given by its letter, accidental and octave.
///
/// C and F have no flat, E and B have no sharp.
///
/// # Examples
///
/// ```
/// use buzz_txt::note::*;
/// use buzz_txt::notation::ParseErrorKind;
///
/// assert_eq!(frequency_for_note('a', Accidental::Natural, 4), Ok(440.0));
/// assert_eq!(frequency_for_note('c', Accidental::Sharp, 3), Ok(138.0));
/// assert_eq!(frequency_for_note('d', Accidental::Flat, 3), Ok(138.0));
/// assert_eq!(
///     frequency_for_note('e', Accidental::Sharp, 3),
///     Err(ParseErrorKind::InvalidModifierPairing { letter: 'e', accidental: Accidental::Sharp })
/// );
/// assert_eq!(frequency_for_note('h', Accidental::Natural, 3), Err(ParseErrorKind::InvalidNote { letter: 'h' }));
/// ```
pub fn frequency_for_note(
    letter: char,
    accidental: Accidental,
    octave: i8,
) -> Result<f32, ParseErrorKind> {
    let name = NoteName::from_char(letter).ok_or(ParseErrorKind::InvalidNote { letter })?;
    frequency_for_name(name, accidental, octave)
}

fn frequency_for_name(name: NoteName, accidental: Accidental, octave: i8) -> Result<f32, ParseErrorKind> {
    let invalid_pairing = match (name, accidental) {
        (NoteName::C, Accidental::Flat) | (NoteName::F, Accidental::Flat) => true,
        (NoteName::E, Accidental::Sharp) | (NoteName::B, Accidental::Sharp) => true,
        _ => false,
    };
    if invalid_pairing {
        return Err(ParseErrorKind::InvalidModifierPairing {
            letter: name.letter(),
            accidental,
        });
    }

    let index = name.semitone() + accidental.semitone() + octave as i32 * 12;
    if index < 0 || index as usize >= NOTE_FREQUENCIES.len() {
        return Err(ParseErrorKind::NoteOutOfRange { octave });
    }
    Ok(NOTE_FREQUENCIES[index as usize])
}

impl NoteName {
    pub fn letter(self) -> char {
        match self {
            NoteName::A => 'a',
            NoteName::B => 'b',
            NoteName::C => 'c',
            NoteName::D => 'd',
            NoteName::E => 'e',
            NoteName::F => 'f',
            NoteName::G => 'g',
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn modifier_pairings() {
        for name in NoteName::ALL.iter() {
            for accidental in Accidental::ALL.iter() {
                let result = frequency_for_note(name.letter(), *accidental, 3);
                let invalid = matches!(
                    (name, accidental),
                    (NoteName::C, Accidental::Flat)
                        | (NoteName::F, Accidental::Flat)
                        | (NoteName::E, Accidental::Sharp)
                        | (NoteName::B, Accidental::Sharp)
                );
                if invalid {
                    assert_eq!(
                        result,
                        Err(ParseErrorKind::InvalidModifierPairing {
                            letter: name.letter(),
                            accidental: *accidental
                        })
                    );
                } else {
                    assert!(result.is_ok(), "{:?} {:?} rejected", name, accidental);
                }
            }
        }
    }

    #[test]
    fn table_is_ascending() {
        for pair in NOTE_FREQUENCIES.windows(2) {
            assert!(pair[0] < pair[1], "{} >= {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn octave_bounds() {
        assert_eq!(frequency_for_note('c', Accidental::Natural, 0), Ok(16.0));
        assert_eq!(frequency_for_note('b', Accidental::Natural, 8), Ok(7902.0));
        assert_eq!(
            frequency_for_note('c', Accidental::Natural, 9),
            Err(ParseErrorKind::NoteOutOfRange { octave: 9 })
        );
        assert_eq!(
            frequency_for_note('a', Accidental::Natural, -1),
            Err(ParseErrorKind::NoteOutOfRange { octave: -1 })
        );
    }

    #[test]
    fn token_duration() {
        let token = NoteToken {
            name: NoteName::A,
            accidental: Accidental::Natural,
            octave: 3,
            length: 4,
        };
        assert_eq!(token.duration_ms(), 500);
        assert_eq!(token.frequency(), Ok(220.0));
        assert_eq!(length_to_ms(1), 125);
        assert_eq!(length_to_ms(0), 0);
    }
}
