// buzz.txt -- a text based buzzer pattern engine
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Walk through a pattern in real time, selecting the tone to play.
//!
//! The [`Player`] is the only owner of the playback cursor. Everybody else talks to it
//! through a [`PlayerHandle`], whose commands are picked up on the next [`Player::tick`].

pub mod control;
pub mod runtime;

pub use control::{Command, PlayerHandle};

use std::sync::mpsc;

use log::{debug, trace};

use crate::output::{Tone, ToneOutput};
use crate::pattern::{Keyframe, Pattern};

/// Wall clock time in milliseconds since some unspecified epoch (e.g. start of the player).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct Millis(pub u64);

impl Millis {
    pub fn after(self, duration_ms: u16) -> Millis {
        Millis(self.0 + duration_ms as u64)
    }
}

/// What the player is doing, as seen from the outside.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PlayerState {
    Idle,
    Playing {
        /// Index of the current keyframe.
        index: usize,
        /// When the current keyframe ends.
        deadline: Millis,
    },
}

/// Whether the player wants to be ticked again.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TickOutcome {
    Continue,
    Quit,
}

struct Cursor {
    pattern: Pattern,
    index: usize,
    deadline: Millis,
    /// The output is muted for one tick before switching to the current keyframe.
    rearm: bool,
}

impl Cursor {
    fn keyframe(&self) -> Keyframe {
        self.pattern.keyframes()[self.index]
    }

    fn tone(&self) -> Option<Tone> {
        tone_for(&self.pattern, self.keyframe())
    }
}

fn tone_for(pattern: &Pattern, keyframe: Keyframe) -> Option<Tone> {
    if keyframe.is_rest() {
        None
    } else {
        Some(Tone {
            waveform: pattern.waveform(),
            frequency: keyframe.frequency,
        })
    }
}

/// The playback state machine, driving a [`ToneOutput`].
pub struct Player<O> {
    commands: mpsc::Receiver<Command>,
    output: O,
    cursor: Option<Cursor>,
}

impl<O: ToneOutput> Player<O> {
    /// Create an idle player and the handle for controlling it.
    /// At most `capacity` commands (but at least one) can be pending between two ticks.
    pub fn new(output: O, capacity: usize) -> (Self, PlayerHandle) {
        let (tx, rx) = mpsc::sync_channel(capacity.max(1));
        let player = Player {
            commands: rx,
            output,
            cursor: None,
        };
        (player, PlayerHandle::new(tx))
    }

    pub fn state(&self) -> PlayerState {
        match &self.cursor {
            None => PlayerState::Idle,
            Some(cursor) => PlayerState::Playing {
                index: cursor.index,
                deadline: cursor.deadline,
            },
        }
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    /// Process pending commands, then move on to the next keyframe if the current one expired.
    pub fn tick(&mut self, now: Millis) -> TickOutcome {
        loop {
            match self.commands.try_recv() {
                Ok(Command::Play(pattern)) => self.start(pattern, now),
                Ok(Command::Stop) => self.stop(),
                Ok(Command::Quit) => {
                    debug!("player quit");
                    self.stop();
                    return TickOutcome::Quit;
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    debug!("all player handles dropped");
                    self.stop();
                    return TickOutcome::Quit;
                }
            }
        }
        self.advance(now);
        TickOutcome::Continue
    }

    fn start(&mut self, pattern: Option<Pattern>, now: Millis) {
        let pattern = match pattern {
            Some(pattern) => pattern,
            None => {
                self.stop();
                return;
            }
        };
        let cursor = Cursor {
            deadline: now.after(pattern.keyframes()[0].duration),
            pattern,
            index: 0,
            rearm: false,
        };
        debug!(
            "playing {} keyframes{} until {:?}",
            cursor.pattern.len(),
            if cursor.pattern.is_looping() { " in a loop" } else { "" },
            cursor.deadline
        );
        self.output.set_tone(cursor.tone());
        self.cursor = Some(cursor);
    }

    fn stop(&mut self) {
        if self.cursor.take().is_some() {
            debug!("playback stopped");
        }
        self.output.set_tone(None);
    }

    fn advance(&mut self, now: Millis) {
        let cursor = match &mut self.cursor {
            Some(cursor) => cursor,
            None => return,
        };

        if cursor.rearm {
            cursor.rearm = false;
            self.output.set_tone(cursor.tone());
        }
        if now < cursor.deadline {
            return;
        }

        let next = (cursor.index + 1) % cursor.pattern.len();
        if next == 0 && !cursor.pattern.is_looping() {
            debug!("pattern finished");
            self.cursor = None;
            self.output.set_tone(None);
            return;
        }

        cursor.index = next;
        cursor.deadline = now.after(cursor.keyframe().duration);
        cursor.rearm = true;
        trace!("keyframe {} until {:?}", cursor.index, cursor.deadline);
        self.output.set_tone(None);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::pattern::Waveform;

    fn tone(frequency: u16) -> Option<Tone> {
        Some(Tone {
            waveform: Waveform::Square,
            frequency,
        })
    }

    fn two_notes(looping: bool) -> Pattern {
        Pattern::new(vec![Keyframe::tone(440, 30), Keyframe::tone(880, 20)])
            .unwrap()
            .looping(looping)
    }

    /// Tick every 10 ms from `from` up to and including `to`.
    fn run<O: ToneOutput>(player: &mut Player<O>, from: u64, to: u64) {
        let mut t = from;
        while t <= to {
            assert_eq!(player.tick(Millis(t)), TickOutcome::Continue);
            t += 10;
        }
    }

    #[test]
    fn starts_on_next_tick() {
        let (mut player, handle) = Player::new(Vec::<Option<Tone>>::new(), 8);
        handle.play(Some(&two_notes(false)));
        assert_eq!(player.state(), PlayerState::Idle);
        assert!(player.output().is_empty());

        player.tick(Millis(100));
        assert_eq!(
            player.state(),
            PlayerState::Playing {
                index: 0,
                deadline: Millis(130)
            }
        );
        assert_eq!(player.output(), &vec![tone(440)]);
    }

    #[test]
    fn non_looping_pattern_finishes() {
        let (mut player, handle) = Player::new(Vec::<Option<Tone>>::new(), 8);
        handle.play(Some(&two_notes(false)));
        run(&mut player, 0, 20);
        assert_eq!(player.output(), &vec![tone(440)]);

        // First keyframe expires, one tick of silence, then the second keyframe.
        run(&mut player, 30, 30);
        assert_eq!(
            player.state(),
            PlayerState::Playing {
                index: 1,
                deadline: Millis(50)
            }
        );
        run(&mut player, 40, 40);
        assert_eq!(player.output(), &vec![tone(440), None, tone(880)]);

        run(&mut player, 50, 100);
        assert_eq!(player.state(), PlayerState::Idle);
        assert_eq!(player.output(), &vec![tone(440), None, tone(880), None]);
    }

    #[test]
    fn looping_pattern_wraps() {
        let (mut player, handle) = Player::new(Vec::<Option<Tone>>::new(), 8);
        handle.play(Some(&two_notes(true)));
        run(&mut player, 0, 50);
        assert_eq!(
            player.state(),
            PlayerState::Playing {
                index: 0,
                deadline: Millis(80)
            }
        );
        run(&mut player, 60, 60);
        assert_eq!(player.output(), &vec![tone(440), None, tone(880), None, tone(440)]);

        run(&mut player, 70, 1000);
        match player.state() {
            PlayerState::Playing { index, .. } => assert!(index < 2),
            PlayerState::Idle => panic!("looping pattern stopped"),
        }
    }

    #[test]
    fn deadline_never_lags_more_than_a_tick() {
        let pattern = Pattern::new(vec![
            Keyframe::tone(440, 25),
            Keyframe::rest(7),
            Keyframe::tone(880, 13),
        ])
        .unwrap()
        .looping(true);
        let (mut player, handle) = Player::new(Vec::<Option<Tone>>::new(), 8);
        handle.play(Some(&pattern));

        let mut last_update = 0;
        let mut last_deadline = Millis(0);
        let mut t = 0;
        while t <= 2000 {
            player.tick(Millis(t));
            if let PlayerState::Playing { index, deadline } = player.state() {
                assert!(index < pattern.len());
                if deadline != last_deadline {
                    last_deadline = deadline;
                    last_update = t;
                }
                let nominal = pattern.keyframes()[index].duration as u64;
                assert!(t - last_update <= nominal + 10);
            } else {
                panic!("looping pattern stopped at {}", t);
            }
            t += 10;
        }
    }

    #[test]
    fn play_restarts_from_the_beginning() {
        let (mut player, handle) = Player::new(Vec::<Option<Tone>>::new(), 8);
        let pattern = two_notes(true);
        handle.play(Some(&pattern));
        run(&mut player, 0, 40);
        assert!(matches!(player.state(), PlayerState::Playing { index: 1, .. }));

        handle.play(Some(&pattern));
        run(&mut player, 50, 50);
        assert_eq!(
            player.state(),
            PlayerState::Playing {
                index: 0,
                deadline: Millis(80)
            }
        );
        assert_eq!(player.output().last(), Some(&tone(440)));
    }

    #[test]
    fn rests_mute_the_output() {
        let pattern = Pattern::new(vec![Keyframe::rest(10), Keyframe::tone(523, 10)]).unwrap();
        let (mut player, handle) = Player::new(Vec::<Option<Tone>>::new(), 8);
        handle.play(Some(&pattern));
        run(&mut player, 0, 0);
        assert_eq!(player.output(), &vec![None]);
        run(&mut player, 10, 10);
        player.tick(Millis(15));
        assert_eq!(player.output(), &vec![None, None, tone(523)]);
        player.tick(Millis(20));
        assert_eq!(player.state(), PlayerState::Idle);
    }

    #[test]
    fn waveform_is_forwarded() {
        let pattern = Pattern::new(vec![Keyframe::tone(330, 10)])
            .unwrap()
            .with_waveform(Waveform::Sawtooth);
        let (mut player, handle) = Player::new(Vec::<Option<Tone>>::new(), 8);
        handle.play(Some(&pattern));
        player.tick(Millis(0));
        assert_eq!(
            player.output(),
            &vec![Some(Tone {
                waveform: Waveform::Sawtooth,
                frequency: 330
            })]
        );
    }

    #[test]
    fn stop_and_play_none_mute() {
        let (mut player, handle) = Player::new(Vec::<Option<Tone>>::new(), 8);
        handle.play(Some(&two_notes(true)));
        player.tick(Millis(0));
        handle.stop();
        player.tick(Millis(10));
        assert_eq!(player.state(), PlayerState::Idle);
        assert_eq!(player.output().last(), Some(&None));

        handle.play(Some(&two_notes(true)));
        player.tick(Millis(20));
        handle.play(None);
        player.tick(Millis(30));
        assert_eq!(player.state(), PlayerState::Idle);
        assert_eq!(player.output().last(), Some(&None));
    }

    #[test]
    fn play_none_while_idle_changes_nothing() {
        let (mut player, handle) = Player::new(Vec::<Option<Tone>>::new(), 8);
        handle.play(None);
        player.tick(Millis(0));
        assert_eq!(player.state(), PlayerState::Idle);
        assert!(player.output().iter().all(Option::is_none));
    }

    #[test]
    fn submitted_pattern_is_copied() {
        let (mut player, handle) = Player::new(Vec::<Option<Tone>>::new(), 8);
        {
            let pattern = two_notes(false);
            handle.play(Some(&pattern));
        }
        run(&mut player, 0, 40);
        assert_eq!(player.output(), &vec![tone(440), None, tone(880)]);
    }

    #[test]
    fn quit_ends_ticking() {
        let (mut player, handle) = Player::new(Vec::<Option<Tone>>::new(), 8);
        handle.play(Some(&two_notes(true)));
        player.tick(Millis(0));
        handle.quit();
        assert_eq!(player.tick(Millis(10)), TickOutcome::Quit);
        assert_eq!(player.state(), PlayerState::Idle);
        assert_eq!(player.output().last(), Some(&None));
    }

    #[test]
    fn zero_capacity_still_queues_a_command() {
        let (mut player, handle) = Player::new(Vec::<Option<Tone>>::new(), 0);
        assert!(handle.play(Some(&two_notes(false))));
        player.tick(Millis(0));
        assert_eq!(player.output(), &vec![tone(440)]);
    }

    #[test]
    fn dropped_handles_quit() {
        let (mut player, handle) = Player::new(Vec::<Option<Tone>>::new(), 8);
        drop(handle);
        assert_eq!(player.tick(Millis(0)), TickOutcome::Quit);
    }
}
