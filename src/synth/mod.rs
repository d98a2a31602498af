//! This namespace contains the parts converting a selected tone into output levels.

pub mod selection;

pub use selection::{Selection, SelectionWriter};

use std::sync::Arc;

use crate::output::LevelSink;
use crate::wave::{WaveTables, PHASE_STEPS};

/// Samples the selected waveform once per tick, at a fixed sample rate.
///
/// [`ToneSynth::tick`] is meant to run in interrupt context: it only reads the
/// shared [`Selection`], owns its phase and level exclusively, and never blocks,
/// allocates or logs.
pub struct ToneSynth {
    tables: WaveTables,
    selection: Arc<Selection>,
    sample_rate: f32,
    /// Position within the current period, in `[0, 1)`.
    phase: f32,
    /// The last emitted level.
    level: u8,
}

impl ToneSynth {
    pub fn new(selection: Arc<Selection>, sample_rate: u32) -> Self {
        Self {
            tables: WaveTables::new(),
            selection,
            sample_rate: sample_rate.max(1) as f32,
            phase: 0.0,
            level: crate::wave::MIDPOINT,
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    /// Compute and emit the next output level.
    pub fn tick<S: LevelSink + ?Sized>(&mut self, sink: &mut S) {
        let tone = match self.selection.load() {
            Some(tone) => tone,
            None => {
                self.phase = 0.0;
                self.level = sink.silent_level();
                sink.emit_level(self.level);
                return;
            }
        };

        self.phase = (self.phase + tone.frequency as f32 / self.sample_rate).fract();
        let index = ((self.phase * PHASE_STEPS as f32) as usize).min(PHASE_STEPS - 1);
        let target = self.tables.sample(tone.waveform, index);

        self.level = smooth(self.level, target);
        sink.emit_level(self.level);
    }
}

/// Move half way towards `target`, snapping once only a single step is left.
fn smooth(level: u8, target: u8) -> u8 {
    let diff = target as i16 - level as i16;
    let step = diff / 2;
    if step == 0 {
        target
    } else {
        (level as i16 + step) as u8
    }
}
