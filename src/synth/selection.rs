//! The tone shared between the player and the synthesizer tick.
//!
//! The player is the only writer and the synthesizer the only reader. Both sides
//! go through a single atomic word, so neither ever waits for the other.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::output::{Tone, ToneOutput};
use crate::pattern::Waveform;

const MUTED: u32 = 0;

/// The currently selected tone, packed as `waveform tag << 16 | frequency`.
/// A zero word means muted.
#[derive(Debug)]
pub struct Selection {
    packed: AtomicU32,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}

impl Selection {
    pub fn new() -> Self {
        Self {
            packed: AtomicU32::new(MUTED),
        }
    }

    pub fn store(&self, tone: Option<Tone>) {
        self.packed.store(pack(tone), Ordering::Release);
    }

    pub fn load(&self) -> Option<Tone> {
        unpack(self.packed.load(Ordering::Acquire))
    }
}

fn pack(tone: Option<Tone>) -> u32 {
    match tone {
        Some(tone) if tone.frequency > 0 => {
            let tag = match tone.waveform {
                Waveform::Square => 1,
                Waveform::Sine => 2,
                Waveform::Sawtooth => 3,
            };
            tag << 16 | tone.frequency as u32
        }
        _ => MUTED,
    }
}

fn unpack(packed: u32) -> Option<Tone> {
    let waveform = match packed >> 16 {
        1 => Waveform::Square,
        2 => Waveform::Sine,
        3 => Waveform::Sawtooth,
        _ => return None,
    };
    Some(Tone {
        waveform,
        frequency: (packed & 0xffff) as u16,
    })
}

/// The player's end of a [`Selection`].
#[derive(Debug, Clone)]
pub struct SelectionWriter {
    selection: Arc<Selection>,
}

impl SelectionWriter {
    pub fn new(selection: Arc<Selection>) -> Self {
        Self { selection }
    }
}

impl ToneOutput for SelectionWriter {
    fn set_tone(&mut self, tone: Option<Tone>) {
        self.selection.store(tone)
    }
}
