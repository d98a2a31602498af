// buzz.txt -- a text based buzzer pattern engine
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

use structopt::StructOpt;

/// Timing parameters shared by the player runtime and the offline renderer.
#[derive(Debug, Clone, StructOpt)]
pub struct Config {
    /// Milliseconds between two player ticks.
    #[structopt(long, default_value = "10")]
    pub tick_period_ms: u64,

    /// Synthesizer ticks per second.
    #[structopt(long, default_value = "8000")]
    pub sample_rate: u32,

    /// Number of commands that can be queued for the player.
    #[structopt(long, default_value = "8")]
    pub channel_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tick_period_ms: 10,
            sample_rate: 8000,
            channel_capacity: 8,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn command_line_defaults_match() {
        let parsed = Config::from_iter_safe(&["buzzc"]).unwrap();
        let default = Config::default();
        assert_eq!(parsed.tick_period_ms, default.tick_period_ms);
        assert_eq!(parsed.sample_rate, default.sample_rate);
        assert_eq!(parsed.channel_capacity, default.channel_capacity);
    }

    #[test]
    fn overrides() {
        let parsed = Config::from_iter_safe(&["buzzc", "--sample-rate", "44100", "--tick-period-ms", "1"]).unwrap();
        assert_eq!(parsed.sample_rate, 44100);
        assert_eq!(parsed.tick_period_ms, 1);
    }
}
