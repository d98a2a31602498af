//! Running a [`Player`] on its own thread, ticking at a fixed period.

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};

use super::{Millis, Player, PlayerHandle, TickOutcome};
use crate::config::Config;
use crate::output::ToneOutput;

const THREAD_NAME: &str = "buzzer-player";

/// Spawn the player thread. It runs until [`PlayerHandle::quit`] is called or all handles are dropped,
/// and leaves the output muted.
pub fn spawn<O>(config: &Config, output: O) -> io::Result<(PlayerHandle, thread::JoinHandle<()>)>
where
    O: ToneOutput + Send + 'static,
{
    let (player, handle) = Player::new(output, config.channel_capacity);
    let period = Duration::from_millis(config.tick_period_ms.max(1));

    let join = thread::Builder::new()
        .name(THREAD_NAME.to_string())
        .spawn(move || run(player, period))?;

    Ok((handle, join))
}

fn run<O: ToneOutput>(mut player: Player<O>, period: Duration) {
    info!("player started, ticking every {:?}", period);
    let epoch = Instant::now();
    let mut next_tick = epoch;

    loop {
        let now = Millis(epoch.elapsed().as_millis() as u64);
        if player.tick(now) == TickOutcome::Quit {
            break;
        }

        next_tick += period;
        let current = Instant::now();
        if next_tick > current {
            thread::sleep(next_tick - current);
        } else {
            // Fell behind, don't try to catch up with a burst of ticks.
            debug!("player tick overran by {:?}", current - next_tick);
            next_tick = current;
        }
    }
    info!("player stopped");
}
