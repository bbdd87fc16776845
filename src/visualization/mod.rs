//! Visualization module
//!
//! Camera framing for the 2D/3D views and gizmo rendering of the trajectory,
//! milestones and plot axes.

use bevy::prelude::*;

pub mod axes;
pub mod camera;
pub mod trajectory_gizmo;

pub use axes::{AxesConfig, draw_plot_axes};
pub use camera::{MainCamera, PlotBounds, apply_render_mode, setup_camera};
pub use trajectory_gizmo::{TrajectoryGizmoConfig, draw_trajectory_system};

/// Plugin for visualization systems
pub struct VisualizationPlugin;

impl Plugin for VisualizationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AxesConfig>()
            .init_resource::<TrajectoryGizmoConfig>()
            .init_resource::<PlotBounds>()
            .add_systems(Startup, setup_camera)
            .add_systems(
                Update,
                (
                    apply_render_mode,
                    (draw_trajectory_system, draw_plot_axes),
                )
                    .chain(),
            );
    }
}
