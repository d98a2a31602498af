// buzz.txt -- a text based buzzer pattern engine
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Compiled buzzer patterns.

use std::fmt;
use std::num::NonZeroU16;
use std::str::FromStr;

/// One segment of a pattern. A frequency of zero is silence.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Keyframe {
    /// Frequency in Hz.
    pub frequency: u16,
    /// Duration in milliseconds.
    pub duration: u16,
}

impl Keyframe {
    pub fn tone(frequency: u16, duration: u16) -> Self {
        Self {
            frequency,
            duration,
        }
    }

    pub fn rest(duration: u16) -> Self {
        Self {
            frequency: 0,
            duration,
        }
    }

    pub fn is_rest(&self) -> bool {
        self.frequency == 0
    }
}

/// The periodic shape the synthesizer samples.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Waveform {
    Square,
    Sine,
    Sawtooth,
}

impl Default for Waveform {
    fn default() -> Self {
        Waveform::Square
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Waveform::Square => write!(f, "square"),
            Waveform::Sine => write!(f, "sine"),
            Waveform::Sawtooth => write!(f, "sawtooth"),
        }
    }
}

impl FromStr for Waveform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "square" => Ok(Waveform::Square),
            "sine" => Ok(Waveform::Sine),
            "saw" | "sawtooth" => Ok(Waveform::Sawtooth),
            other => Err(format!("unknown waveform {:?}", other)),
        }
    }
}

/// An immutable, non-empty sequence of keyframes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pattern {
    keyframes: Vec<Keyframe>,
    looping: bool,
    waveform: Waveform,
}

impl Pattern {
    /// Returns `None` if there are no keyframes.
    pub fn new(keyframes: Vec<Keyframe>) -> Option<Pattern> {
        if keyframes.is_empty() {
            None
        } else {
            Some(Pattern {
                keyframes,
                looping: false,
                waveform: Waveform::default(),
            })
        }
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn with_waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Sum of the durations of all keyframes, in milliseconds.
    pub fn total_duration_ms(&self) -> u64 {
        self.keyframes.iter().map(|k| k.duration as u64).sum()
    }
}

/// Build a linear frequency sweep of `step_count` equally long steps.
/// The end frequency itself is never reached.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroU16;
/// use buzz_txt::pattern::*;
///
/// let p = sweep(100, 200, NonZeroU16::new(4).unwrap(), 40);
/// let freqs: Vec<u16> = p.keyframes().iter().map(|k| k.frequency).collect();
/// assert_eq!(freqs, vec![100, 125, 150, 175]);
/// assert!(p.keyframes().iter().all(|k| k.duration == 10));
/// assert!(!p.is_looping());
/// ```
pub fn sweep(start_freq: u16, end_freq: u16, step_count: NonZeroU16, total_duration_ms: u16) -> Pattern {
    let steps = step_count.get() as i64;
    let start = start_freq as i64;
    let span = end_freq as i64 - start;
    let duration = total_duration_ms / step_count.get();

    let keyframes = (0..steps)
        .map(|i| Keyframe {
            frequency: (start + (span * i).div_euclid(steps)) as u16,
            duration,
        })
        .collect();

    Pattern {
        keyframes,
        looping: false,
        waveform: Waveform::default(),
    }
}
