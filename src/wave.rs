//! This is the namespace for all parts dealing with sampled wave data.

use crate::pattern::Waveform;

/// Number of samples in one period of every wave table.
pub const PHASE_STEPS: usize = 256;

/// Output level of silence, half way between the lowest and highest level.
pub const MIDPOINT: u8 = 128;

/// Largest deviation from [`MIDPOINT`] that still fits into a `u8` on both sides.
pub const AMPLITUDE: f32 = 127.0;

/// One period of a wave, as output levels.
pub type WaveTable = [u8; PHASE_STEPS];

/// Precomputed approximations of all supported waveforms.
///
/// # Examples
///
/// ```
/// use buzz_txt::pattern::Waveform;
/// use buzz_txt::wave::*;
///
/// let tables = WaveTables::new();
/// assert_eq!(tables.sample(Waveform::Sine, 0), MIDPOINT);
/// assert_eq!(tables.sample(Waveform::Sine, PHASE_STEPS / 4), 255);
/// assert_eq!(tables.sample(Waveform::Sawtooth, 17), 17);
/// assert!(tables.sample(Waveform::Square, 0) < MIDPOINT);
/// ```
#[derive(Clone)]
pub struct WaveTables {
    square: WaveTable,
    sine: WaveTable,
    sawtooth: WaveTable,
}

impl Default for WaveTables {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveTables {
    pub fn new() -> Self {
        let mut square = [0; PHASE_STEPS];
        let mut sine = [0; PHASE_STEPS];
        let mut sawtooth = [0; PHASE_STEPS];

        let low = MIDPOINT - AMPLITUDE as u8;
        let high = MIDPOINT + AMPLITUDE as u8;
        for i in 0..PHASE_STEPS {
            square[i] = if i < PHASE_STEPS / 2 { low } else { high };

            use std::f32::consts::PI;
            let phase = 2.0 * PI * i as f32 / PHASE_STEPS as f32;
            sine[i] = (phase.sin() * AMPLITUDE + MIDPOINT as f32).round() as u8;

            sawtooth[i] = i as u8;
        }

        Self {
            square,
            sine,
            sawtooth,
        }
    }

    pub fn table(&self, waveform: Waveform) -> &WaveTable {
        match waveform {
            Waveform::Square => &self.square,
            Waveform::Sine => &self.sine,
            Waveform::Sawtooth => &self.sawtooth,
        }
    }

    /// Look up the level at the given phase, wrapping around after one period.
    pub fn sample(&self, waveform: Waveform, phase_index: usize) -> u8 {
        self.table(waveform)[phase_index % PHASE_STEPS]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn square_halves() {
        let tables = WaveTables::new();
        let square = tables.table(Waveform::Square);
        assert!(square[..PHASE_STEPS / 2].iter().all(|&l| l < MIDPOINT));
        assert!(square[PHASE_STEPS / 2..].iter().all(|&l| l > MIDPOINT));
    }

    #[test]
    fn sine_is_symmetric() {
        let tables = WaveTables::new();
        let sine = tables.table(Waveform::Sine);
        assert_eq!(sine[0], MIDPOINT);
        assert_eq!(sine[PHASE_STEPS / 4], 255);
        assert_eq!(sine[PHASE_STEPS / 2], MIDPOINT);
        assert_eq!(sine[3 * PHASE_STEPS / 4], 1);
        for i in 1..PHASE_STEPS / 2 {
            let up = sine[i] as i32 - MIDPOINT as i32;
            let down = MIDPOINT as i32 - sine[PHASE_STEPS - i] as i32;
            assert!((up - down).abs() <= 1, "asymmetric at {}", i);
        }
    }

    #[test]
    fn sawtooth_ramps() {
        let tables = WaveTables::new();
        let saw = tables.table(Waveform::Sawtooth);
        assert!(saw.windows(2).all(|w| w[1] == w[0] + 1));
        assert_eq!(tables.sample(Waveform::Sawtooth, PHASE_STEPS + 3), 3);
    }
}
