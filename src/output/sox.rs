//! Easy interface for getting rendered levels to play using a sox subprocess.
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

/// Where sox sends the audio.
#[derive(Debug, Clone, Copy)]
pub enum SoxTarget<'a> {
    /// The default speakers.
    Play,
    /// A file in any sox-supported format.
    File(&'a Path),
}

/// Spawn sox reading unsigned 8 bit mono samples from stdin,
/// and hand the stream to `callback`.
pub fn with_sox<R, F: FnOnce(&mut dyn io::Write) -> io::Result<R>>(
    sample_rate: u32,
    target: SoxTarget,
    callback: F,
) -> io::Result<R> {
    let mut command = match target {
        SoxTarget::Play => Command::new("play"),
        SoxTarget::File(_) => Command::new("sox"),
    };
    command
        .arg("--channels")
        .arg("1")
        .arg("--rate")
        .arg(format!("{}", sample_rate))
        .arg("--type")
        .arg("raw")
        .arg("--encoding")
        .arg("unsigned-integer")
        .arg("--bits")
        .arg("8")
        .arg("/dev/stdin");
    if let SoxTarget::File(path) = target {
        command.arg(path);
    }

    let mut player = command.stdin(Stdio::piped()).spawn()?;
    let mut audio_stream = player
        .stdin
        .take()
        .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "sox has no stdin"))?;

    let result = callback(&mut audio_stream);

    drop(audio_stream);
    player.wait()?;

    result
}
