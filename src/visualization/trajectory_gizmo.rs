//! Gizmo rendering for the trajectory plot
//!
//! Draws the sampled path, the dashed route through the milestones, one
//! marker per milestone and a star-shaped marker for the spacecraft.

use bevy::prelude::*;

use crate::config::{ViewerConfig, ViewerTheme};
use crate::core::km_to_scene;
use crate::playback::Player;
use crate::ui::EventSelection;
use crate::visualization::camera::PlotBounds;

/// Configuration for trajectory gizmo rendering
#[derive(Resource)]
pub struct TrajectoryGizmoConfig {
    /// Color of the sampled path
    pub path_color: Color,
    /// Color of the dashed milestone route and markers
    pub milestone_color: Color,
    /// Color of the selected milestone
    pub highlight_color: Color,
    /// Color of the spacecraft marker
    pub craft_color: Color,
    /// Whether to draw the dashed route through all milestones
    pub show_milestone_route: bool,
    /// Dash length as a fraction of the plot radius
    pub dash_fraction: f32,
    /// Milestone marker radius as a fraction of the plot radius
    pub milestone_fraction: f32,
    /// Spacecraft marker size as a fraction of the plot radius
    pub craft_fraction: f32,
}

impl FromWorld for TrajectoryGizmoConfig {
    fn from_world(world: &mut World) -> Self {
        let theme = world
            .get_resource::<ViewerConfig>()
            .map(|c| c.theme.clone())
            .unwrap_or_default();
        Self {
            path_color: ViewerTheme::color(theme.path).with_alpha(0.6),
            milestone_color: ViewerTheme::color(theme.milestone),
            highlight_color: ViewerTheme::color(theme.highlight),
            craft_color: ViewerTheme::color(theme.craft),
            show_milestone_route: true,
            dash_fraction: 0.02,
            milestone_fraction: 0.012,
            craft_fraction: 0.03,
        }
    }
}

/// Split `a -> b` into dashes of `dash` length separated by equal gaps
pub fn dashed_segments(a: Vec3, b: Vec3, dash: f32) -> Vec<(Vec3, Vec3)> {
    let length = a.distance(b);
    if dash <= 0.0 || length <= dash {
        return vec![(a, b)];
    }
    let dir = (b - a) / length;
    let mut segments = Vec::new();
    let mut start = 0.0;
    while start < length {
        let end = (start + dash).min(length);
        segments.push((a + dir * start, a + dir * end));
        start += dash * 2.0;
    }
    segments
}

/// System to draw the path, milestones and spacecraft
pub fn draw_trajectory_system(
    mut gizmos: Gizmos,
    config: Res<TrajectoryGizmoConfig>,
    player: Res<Player>,
    selection: Res<EventSelection>,
    bounds: Res<PlotBounds>,
) {
    let mode = player.mode();
    let radius = bounds.radius;
    let to_scene = |p| km_to_scene(mode.project(p));

    gizmos.linestrip(
        player.path().positions().iter().map(|p| to_scene(*p)),
        config.path_color,
    );

    let events = player.catalog().load();
    if config.show_milestone_route {
        for pair in events.windows(2) {
            let (a, b) = (to_scene(pair[0].position), to_scene(pair[1].position));
            for (start, end) in dashed_segments(a, b, radius * config.dash_fraction) {
                gizmos.line(start, end, config.milestone_color);
            }
        }
    }

    for (index, event) in events.iter().enumerate() {
        let (color, scale) = if selection.index == Some(index) {
            (config.highlight_color, 2.0)
        } else {
            (config.milestone_color, 1.0)
        };
        gizmos.sphere(
            Isometry3d::from_translation(to_scene(event.position)),
            radius * config.milestone_fraction * scale,
            color,
        );
    }

    draw_craft_marker(
        &mut gizmos,
        to_scene(player.current_position()),
        radius * config.craft_fraction,
        config.craft_color,
    );
}

/// Six-pointed star built from three crossing lines plus a small sphere
fn draw_craft_marker(gizmos: &mut Gizmos, center: Vec3, size: f32, color: Color) {
    for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
        gizmos.line(center - axis * size, center + axis * size, color);
    }
    gizmos.sphere(Isometry3d::from_translation(center), size * 0.3, color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashed_segments_cover_line() {
        let segments = dashed_segments(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 1.0);
        assert_eq!(segments.len(), 5);
        assert_eq!(segments[0], (Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(segments[4].0, Vec3::new(8.0, 0.0, 0.0));
        assert_eq!(segments[4].1, Vec3::new(9.0, 0.0, 0.0));
    }

    #[test]
    fn test_dashed_segments_short_or_degenerate() {
        let a = Vec3::ZERO;
        let b = Vec3::new(0.5, 0.0, 0.0);
        assert_eq!(dashed_segments(a, b, 1.0), vec![(a, b)]);
        assert_eq!(dashed_segments(a, b, 0.0), vec![(a, b)]);
    }

    #[test]
    fn test_last_dash_is_clipped() {
        let segments = dashed_segments(Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0), 2.0);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1], (Vec3::new(0.0, 0.0, 4.0), Vec3::new(0.0, 0.0, 5.0)));
    }
}
