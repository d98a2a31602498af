// buzz.txt -- a text based buzzer pattern engine
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! `buzzc` compiles buzzer notation and plays it through sox, or writes it to a file.

use std::io::{self, Write};
use std::num::NonZeroU16;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use log::{error, info};
use structopt::StructOpt;

use buzz_txt::config::Config;
use buzz_txt::notation::compile;
use buzz_txt::output::sox::{with_sox, SoxTarget};
use buzz_txt::output::{LogPwm, PwmOutput};
use buzz_txt::pattern::{sweep, Pattern, Waveform};
use buzz_txt::player::runtime;
use buzz_txt::render;

#[derive(Debug, StructOpt)]
#[structopt(name = "buzzc", about = "Compiling notation into buzzer tones")]
struct Opt {
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: usize,

    #[structopt(flatten)]
    config: Config,

    /// The notation to play, e.g. "o4l2cdefg".
    notation: Option<String>,

    /// Play a linear frequency sweep instead of notation.
    #[structopt(long, number_of_values = 4, value_names = &["START", "END", "STEPS", "MS"])]
    sweep: Option<Vec<u16>>,

    /// One of square, sine or sawtooth.
    #[structopt(long, default_value = "square")]
    waveform: Waveform,

    /// Repeat the pattern. Needs --length to end when rendering.
    #[structopt(long = "loop")]
    looping: bool,

    /// How many milliseconds to render. Defaults to one pass through the pattern.
    #[structopt(long)]
    length: Option<u64>,

    /// Print the compiled keyframes.
    #[structopt(long)]
    dump: bool,

    /// Drive a logging PWM in real time instead of rendering audio.
    #[structopt(long)]
    live: bool,

    /// Output file (any sox-supported format). Audio is played directly if not given.
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let opt = Opt::from_args();

    let level = match opt.verbose {
        0 => log::Level::Info,
        1 => log::Level::Debug,
        _ => log::Level::Trace,
    };
    simple_logger::init_with_level(level).map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))?;

    let pattern = build_pattern(&opt)?;
    info!(
        "{} keyframes, {} ms per pass",
        pattern.len(),
        pattern.total_duration_ms()
    );

    if opt.dump {
        dump(&pattern)?;
    }

    if opt.live {
        play_live(&opt, &pattern)
    } else {
        let levels = match opt.length {
            Some(length) => render::render(&pattern, &opt.config, length),
            None => render::render_pattern(&pattern, &opt.config),
        };
        let target = match opt.output.as_deref() {
            Some(path) => SoxTarget::File(path),
            None => SoxTarget::Play,
        };
        with_sox(opt.config.sample_rate, target, |out| out.write_all(&levels))
    }
}

fn invalid_input(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message)
}

fn build_pattern(opt: &Opt) -> io::Result<Pattern> {
    let pattern = match (opt.sweep.as_deref(), opt.notation.as_deref()) {
        (Some(&[start, end, steps, ms]), None) => {
            let steps = NonZeroU16::new(steps).ok_or_else(|| invalid_input("a sweep needs at least one step".into()))?;
            sweep(start, end, steps, ms)
        }
        (None, Some(text)) => compile(text).map_err(|err| {
            error!("{}\n{}", err, err.highlight());
            invalid_input(err.to_string())
        })?,
        _ => return Err(invalid_input("expected either notation or --sweep".into())),
    };
    Ok(pattern.with_waveform(opt.waveform).looping(opt.looping))
}

fn dump(pattern: &Pattern) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{} waveform{}", pattern.waveform(), if pattern.is_looping() { ", looping" } else { "" })?;
    for (index, keyframe) in pattern.keyframes().iter().enumerate() {
        if keyframe.is_rest() {
            writeln!(out, "{:4}: rest    {:5} ms", index, keyframe.duration)?;
        } else {
            writeln!(out, "{:4}: {:4} Hz {:5} ms", index, keyframe.frequency, keyframe.duration)?;
        }
    }
    Ok(())
}

fn play_live(opt: &Opt, pattern: &Pattern) -> io::Result<()> {
    let output = PwmOutput::with_range(LogPwm::default(), 35, 7000);
    let (handle, join) = runtime::spawn(&opt.config, output)?;

    handle.play(Some(pattern));
    let length = opt
        .length
        .unwrap_or_else(|| pattern.total_duration_ms() + 2 * opt.config.tick_period_ms);
    thread::sleep(Duration::from_millis(length));
    handle.quit();

    join.join()
        .map_err(|_| io::Error::new(io::ErrorKind::Other, "player thread panicked"))
}
