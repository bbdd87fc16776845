//! Playback module
//!
//! Owns the trajectory player and the fixed-interval timer that advances it.

use anyhow::Context;
use bevy::prelude::*;

pub mod clock;

pub use clock::{PlaybackClock, advance_player};

use crate::config::{CliArgs, ViewerConfig};
use crate::trajectory::{TrajectoryPlayer, TrajectoryError};

/// Fewest samples the viewer accepts for a generated path
const MIN_PATH_STEPS: usize = 2;

/// Player resource. Only systems holding `ResMut<Player>` mutate it and
/// Bevy never runs two of those at once, so ticks, resets and searches
/// are serialized.
#[derive(Resource, Deref, DerefMut)]
pub struct Player(pub TrajectoryPlayer);

/// Plugin for animation playback. Built from the command line before the
/// app starts so a trajectory that cannot be built stops startup with an error.
pub struct PlaybackPlugin {
    config: ViewerConfig,
    player: TrajectoryPlayer,
}

impl PlaybackPlugin {
    /// Load settings and build the trajectory. Call after the log plugin is
    /// added so startup messages are recorded.
    pub fn from_args(args: &CliArgs) -> anyhow::Result<Self> {
        let config = ViewerConfig::from_args(args);
        if args.write_config {
            config.save_for(args);
        }
        let player = build_player(&config).context("building trajectory")?;
        info!(
            "Trajectory ready: {} samples, {} milestones",
            player.path().len(),
            player.catalog().len()
        );
        Ok(Self { config, player })
    }
}

impl Plugin for PlaybackPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(PlaybackClock::new(self.config.tick_interval_ms))
            .insert_resource(Player(self.player.clone()))
            .insert_resource(self.config.clone())
            .add_systems(Update, advance_player);
    }
}

fn build_player(config: &ViewerConfig) -> Result<TrajectoryPlayer, TrajectoryError> {
    let steps = config.path_steps.max(MIN_PATH_STEPS);
    if steps != config.path_steps {
        warn!(
            "path_steps {} is too small, using {}",
            config.path_steps, steps
        );
    }
    let mut player = TrajectoryPlayer::from_source(&config.data_source(), steps)?
        .with_threshold(config.event_threshold_km);
    player.set_mode(config.start_mode);
    Ok(player)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::RenderMode;

    #[test]
    fn test_build_player_from_config() {
        let config = ViewerConfig {
            path_steps: 0,
            start_mode: RenderMode::TwoD,
            ..Default::default()
        };
        let player = build_player(&config).unwrap();
        assert_eq!(player.path().len(), MIN_PATH_STEPS);
        assert_eq!(player.mode(), RenderMode::TwoD);
    }

    #[test]
    fn test_plugin_from_missing_ephemeris_uses_catalog() {
        let args = CliArgs {
            config: Some(std::env::temp_dir().join("voyager-viewer-no-such-dir/voyager.json")),
            ephemeris: Some("/nonexistent/voyager1.csv".into()),
            ..Default::default()
        };
        let plugin = PlaybackPlugin::from_args(&args).unwrap();
        assert_eq!(plugin.player.path().len(), plugin.config.path_steps);
        assert_eq!(plugin.player.catalog().len(), 5);
    }
}
