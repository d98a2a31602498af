//! The glue turning a pattern into sampled output levels without real time.
//!
//! Both the player and the synthesizer run on a virtual clock: the player ticks every
//! `tick_period_ms`, the synthesizer `sample_rate` times per second. Between them sits the
//! same [`Selection`] that connects them on real hardware.

use std::sync::Arc;

use log::debug;

use crate::config::Config;
use crate::pattern::Pattern;
use crate::player::{Millis, Player};
use crate::synth::{Selection, SelectionWriter, ToneSynth};

/// Render `duration_ms` of playing `pattern`, one level per synthesizer tick.
pub fn render(pattern: &Pattern, config: &Config, duration_ms: u64) -> Vec<u8> {
    let sample_rate = config.sample_rate.max(1) as u64;
    let period = config.tick_period_ms.max(1);
    let sample_count = duration_ms * sample_rate / 1000;
    debug!(
        "rendering {} ms ({} samples at {} Hz)",
        duration_ms, sample_count, sample_rate
    );

    let selection = Arc::new(Selection::new());
    let mut synth = ToneSynth::new(selection.clone(), config.sample_rate);
    let (mut player, handle) = Player::new(SelectionWriter::new(selection), config.channel_capacity);
    handle.play(Some(pattern));

    let mut levels = Vec::with_capacity(sample_count as usize);
    let mut next_tick = 0;
    for sample in 0..sample_count {
        let now = sample * 1000 / sample_rate;
        while next_tick <= now {
            player.tick(Millis(next_tick));
            next_tick += period;
        }
        synth.tick(&mut levels);
    }

    // Keep the handle alive until the end, the player quits once all handles are gone.
    drop(handle);
    levels
}

/// Render one pass through the pattern, plus a little slack for the player to mute the output.
pub fn render_pattern(pattern: &Pattern, config: &Config) -> Vec<u8> {
    let duration = pattern.total_duration_ms() + 2 * config.tick_period_ms;
    render(pattern, config, duration)
}
