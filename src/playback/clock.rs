//! Animation timer

use bevy::prelude::*;
use std::time::Duration;

use crate::playback::Player;
use crate::ui::state::DetailsPanel;

/// Repeating timer that drives ticks. Pausing it is the only way to stop
/// the animation; a tick in progress always completes.
#[derive(Resource)]
pub struct PlaybackClock {
    pub timer: Timer,
    pub running: bool,
}

impl PlaybackClock {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            timer: Timer::new(Duration::from_millis(interval_ms.max(1)), TimerMode::Repeating),
            running: true,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn toggle(&mut self) {
        if self.running {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Advance the timer by `delta`; true when a tick is due.
    /// Several elapsed periods in one frame still yield a single tick.
    pub fn due(&mut self, delta: Duration) -> bool {
        if !self.running {
            return false;
        }
        self.timer.tick(delta);
        self.timer.just_finished()
    }
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new(200)
    }
}

/// System to advance the player once per elapsed timer period
pub fn advance_player(
    time: Res<Time>,
    mut clock: ResMut<PlaybackClock>,
    mut player: ResMut<Player>,
    mut details: ResMut<DetailsPanel>,
) {
    if clock.due(time.delta()) {
        let report = player.tick();
        details.show_tick(&report);
    }
}
