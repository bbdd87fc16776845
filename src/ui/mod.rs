//! User interface module
//!
//! Side panel, milestone labels and keyboard controls built on Bevy UI.

use bevy::prelude::*;

pub mod panels;
pub mod state;
pub mod systems;

pub use state::{DetailsPanel, EventSelection, SearchInput};

/// Plugin for user interface management
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DetailsPanel>()
            .init_resource::<SearchInput>()
            .init_resource::<EventSelection>()
            .add_systems(Startup, panels::spawn_panels)
            .add_systems(
                Update,
                (
                    systems::search_input_system,
                    systems::playback_controls_system,
                    panels::refresh_panels,
                    panels::position_milestone_labels,
                )
                    .chain(),
            );
    }
}
