//! Plot axes drawn through the origin (the Sun)

use bevy::prelude::*;

use crate::core::km_to_scene;
use crate::playback::Player;
use crate::visualization::camera::PlotBounds;
use bevy::math::DVec3;

/// Axes rendering configuration resource
#[derive(Resource)]
pub struct AxesConfig {
    pub enabled: bool,
    pub sun_color: Color,
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sun_color: Color::srgb(1.0, 0.9, 0.4),
        }
    }
}

fn axis_direction(axis: char) -> Option<(DVec3, Color)> {
    match axis {
        'x' => Some((DVec3::X, Color::srgb(0.8, 0.3, 0.3))),
        'y' => Some((DVec3::Y, Color::srgb(0.3, 0.8, 0.3))),
        'z' => Some((DVec3::Z, Color::srgb(0.3, 0.3, 0.8))),
        _ => None,
    }
}

/// System to draw the axes plotted in the current view mode
pub fn draw_plot_axes(
    mut gizmos: Gizmos,
    config: Res<AxesConfig>,
    player: Res<Player>,
    bounds: Res<PlotBounds>,
) {
    if !config.enabled {
        return;
    }
    let radius = bounds.radius;
    let length = bounds.center.length() + radius;

    for &axis in player.mode().axes() {
        let Some((direction, color)) = axis_direction(axis) else {
            continue;
        };
        // Unit km direction mapped into scene orientation
        let dir = km_to_scene(direction).normalize_or_zero();
        gizmos.line(Vec3::ZERO, dir * length, color);
    }
    gizmos.sphere(Isometry3d::from_translation(Vec3::ZERO), radius * 0.01, config.sun_color);
}
