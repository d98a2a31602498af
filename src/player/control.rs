//! The sending side of the player's command queue.

use std::sync::mpsc;

use log::{debug, warn};

use crate::pattern::Pattern;

/// Requests processed by the player on its next tick.
#[derive(Debug, Clone)]
pub enum Command {
    /// Start playing from the first keyframe. `None` stops playback.
    Play(Option<Pattern>),
    Stop,
    Quit,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Play(Some(_)) => "play",
            Command::Play(None) => "play nothing",
            Command::Stop => "stop",
            Command::Quit => "quit",
        }
    }
}

/// Controls a [`Player`](super::Player). Cheap to clone, and none of the methods ever block.
#[derive(Debug, Clone)]
pub struct PlayerHandle {
    sender: mpsc::SyncSender<Command>,
}

impl PlayerHandle {
    pub(super) fn new(sender: mpsc::SyncSender<Command>) -> Self {
        Self { sender }
    }

    /// Replace whatever is playing. The pattern is copied, so the caller keeps ownership.
    pub fn play(&self, pattern: Option<&Pattern>) -> bool {
        self.send(Command::Play(pattern.cloned()))
    }

    pub fn stop(&self) -> bool {
        self.send(Command::Stop)
    }

    pub fn quit(&self) -> bool {
        self.send(Command::Quit)
    }

    /// Returns whether the command was queued.
    fn send(&self, command: Command) -> bool {
        let name = command.name();
        match self.sender.try_send(command) {
            Ok(()) => true,
            Err(mpsc::TrySendError::Full(_)) => {
                warn!("player queue full, dropping {} command", name);
                false
            }
            Err(mpsc::TrySendError::Disconnected(_)) => {
                debug!("player is gone, dropping {} command", name);
                false
            }
        }
    }
}
