use bevy::prelude::*;
use bevy::window::{PresentMode, Window, WindowPlugin, WindowResizeConstraints};
use bevy_panorbit_camera::PanOrbitCameraPlugin;
use clap::Parser;

#[cfg(feature = "dev")]
use bevy::dev_tools::fps_overlay::FpsOverlayPlugin;

mod config;
mod core;
mod playback;
mod trajectory;
mod ui;
mod visualization;

use config::CliArgs;
use playback::PlaybackPlugin;
use ui::UiPlugin;
use visualization::VisualizationPlugin;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Voyager 1 Interactive Path Viewer".to_string(),
            resize_constraints: WindowResizeConstraints {
                min_width: 1000.0,
                min_height: 600.0,
                ..default()
            },
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    }));

    #[cfg(feature = "dev")]
    app.add_plugins(FpsOverlayPlugin::default());

    app.add_plugins(PanOrbitCameraPlugin);

    // Playback loads the config and player, which the other plugins read
    app.add_plugins(PlaybackPlugin::from_args(&args)?);
    app.add_plugins(UiPlugin);
    app.add_plugins(VisualizationPlugin);

    app.run();
    Ok(())
}
