// buzz.txt -- a text based buzzer pattern engine
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! The places sound goes to: level sinks driven by the synthesizer,
//! and tone outputs driven by the player.

pub mod sox;

use log::info;

use crate::pattern::Waveform;
use crate::wave::MIDPOINT;

/// A waveform at a frequency, as selected by the player.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    /// Frequency in Hz, never zero.
    pub frequency: u16,
}

/// Receives the tone the player wants to hear. `None` mutes.
pub trait ToneOutput {
    fn set_tone(&mut self, tone: Option<Tone>);
}

impl<T: ToneOutput + ?Sized> ToneOutput for &mut T {
    fn set_tone(&mut self, tone: Option<Tone>) {
        (**self).set_tone(tone)
    }
}

impl<T: ToneOutput + ?Sized> ToneOutput for Box<T> {
    fn set_tone(&mut self, tone: Option<Tone>) {
        (**self).set_tone(tone)
    }
}

/// Keeps a log of every tone change.
impl ToneOutput for Vec<Option<Tone>> {
    fn set_tone(&mut self, tone: Option<Tone>) {
        self.push(tone)
    }
}

/// A digital-to-analog style output accepting one level per synthesizer tick.
///
/// Implementations are called from the synthesizer tick and must neither block nor allocate.
pub trait LevelSink {
    fn emit_level(&mut self, level: u8);

    /// The level that produces no sound.
    fn silent_level(&self) -> u8 {
        MIDPOINT
    }
}

/// Records every emitted level. Allocates, so only for offline use.
impl LevelSink for Vec<u8> {
    fn emit_level(&mut self, level: u8) {
        self.push(level)
    }
}

/// A pulse width modulated output that generates square waves by itself.
pub trait PwmSink {
    fn set_frequency(&mut self, frequency: u16);
    /// Duty cycle in percent, 0 turns the output off.
    fn set_duty(&mut self, duty_percent: u8);
}

/// Frequency the PWM idles at while muted.
pub const PWM_IDLE_FREQUENCY: u16 = 400;

/// Drives a [`PwmSink`] directly from the player, bypassing the synthesizer.
/// Only square waves can be played this way, other waveforms are played as squares.
pub struct PwmOutput<P> {
    pwm: P,
    min_freq: u16,
    max_freq: u16,
}

impl<P: PwmSink> PwmOutput<P> {
    pub fn new(pwm: P) -> Self {
        Self::with_range(pwm, 1, u16::MAX)
    }

    /// Frequencies outside of `min_freq..=max_freq` are clamped into it.
    pub fn with_range(pwm: P, min_freq: u16, max_freq: u16) -> Self {
        PwmOutput {
            pwm,
            min_freq,
            max_freq,
        }
    }

    pub fn can_play_tone(&self, frequency: u16) -> bool {
        self.min_freq <= frequency && frequency <= self.max_freq
    }

    pub fn into_inner(self) -> P {
        self.pwm
    }
}

impl<P: PwmSink> ToneOutput for PwmOutput<P> {
    fn set_tone(&mut self, tone: Option<Tone>) {
        match tone {
            Some(tone) => {
                let frequency = tone.frequency.max(self.min_freq).min(self.max_freq);
                self.pwm.set_frequency(frequency);
                self.pwm.set_duty(50);
            }
            None => {
                self.pwm.set_frequency(PWM_IDLE_FREQUENCY);
                self.pwm.set_duty(0);
            }
        }
    }
}

/// A PWM sink that only reports what it would do.
#[derive(Debug, Default)]
pub struct LogPwm {
    frequency: u16,
}

impl PwmSink for LogPwm {
    fn set_frequency(&mut self, frequency: u16) {
        self.frequency = frequency;
    }

    fn set_duty(&mut self, duty_percent: u8) {
        if duty_percent == 0 {
            info!("pwm off");
        } else {
            info!("pwm {} Hz at {}%", self.frequency, duty_percent);
        }
    }
}
