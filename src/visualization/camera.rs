//! Orbit camera setup and 2D/3D view switching

use bevy::prelude::*;
use bevy_panorbit_camera::PanOrbitCamera;
use std::f32::consts::FRAC_PI_2;

use crate::config::{ViewerConfig, ViewerTheme};
use crate::core::km_to_scene;
use crate::core::space::bounding_sphere;
use crate::playback::Player;
use crate::trajectory::{RenderMode, TrajectoryPlayer};

/// Camera distance as a multiple of the plot radius
const FRAMING_FACTOR: f32 = 2.5;
/// Top-down pitch for the 2D view; a hair below vertical keeps the orbit basis defined
const TOP_DOWN_PITCH: f32 = FRAC_PI_2 - 1e-3;

/// Marker for the camera that renders the plot
#[derive(Component)]
pub struct MainCamera;

/// Plot bounds for the current view mode, recomputed only when it changes
#[derive(Resource, Debug, Default)]
pub struct PlotBounds {
    pub center: Vec3,
    pub radius: f32,
    mode: Option<RenderMode>,
}

impl PlotBounds {
    /// Recompute for `mode`; returns false when the bounds were already current
    pub fn refresh(&mut self, player: &TrajectoryPlayer, mode: RenderMode) -> bool {
        if self.mode == Some(mode) {
            return false;
        }
        let (center, radius) = plot_bounds(player, mode);
        self.center = center;
        self.radius = radius;
        self.mode = Some(mode);
        true
    }
}

/// Center and radius (scene units) of everything drawn in `mode`
pub fn plot_bounds(player: &TrajectoryPlayer, mode: RenderMode) -> (Vec3, f32) {
    let path = player.path().positions().iter().copied();
    let events = player.catalog().load().iter().map(|e| e.position);
    bounding_sphere(path.chain(events).map(|p| km_to_scene(mode.project(p))))
        .map(|(center, radius)| (center, radius.max(1.0)))
        .unwrap_or((Vec3::ZERO, 1.0))
}

/// Setup system for the clear color and the orbit camera
pub fn setup_camera(mut commands: Commands, config: Res<ViewerConfig>, player: Res<Player>) {
    commands.insert_resource(ClearColor(ViewerTheme::color(config.theme.background)));

    let (focus, radius) = plot_bounds(&player, player.mode());
    let distance = radius * FRAMING_FACTOR;

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            near: 0.01,
            far: distance * 20.0,
            ..default()
        }),
        PanOrbitCamera {
            focus,
            radius: Some(distance),
            yaw: Some(-0.6),
            pitch: Some(0.5),
            force_update: true,
            ..default()
        },
        MainCamera,
        Transform::from_translation(focus + Vec3::new(0.0, 0.0, distance)).looking_at(focus, Vec3::Y),
    ));
}

/// System to refresh the plot bounds and re-frame the camera when the view
/// mode changes
pub fn apply_render_mode(
    player: Res<Player>,
    mut bounds: ResMut<PlotBounds>,
    mut cameras: Query<&mut PanOrbitCamera, With<MainCamera>>,
) {
    let mode = player.mode();
    if !bounds.refresh(&player, mode) {
        return;
    }
    let Ok(mut camera) = cameras.single_mut() else {
        return;
    };

    camera.target_focus = bounds.center;
    camera.target_radius = bounds.radius * FRAMING_FACTOR;
    match mode {
        RenderMode::TwoD => {
            camera.target_yaw = 0.0;
            camera.target_pitch = TOP_DOWN_PITCH;
            camera.yaw_upper_limit = Some(0.0);
            camera.yaw_lower_limit = Some(0.0);
            camera.pitch_upper_limit = Some(TOP_DOWN_PITCH);
            camera.pitch_lower_limit = Some(TOP_DOWN_PITCH);
        }
        RenderMode::ThreeD => {
            camera.yaw_upper_limit = None;
            camera.yaw_lower_limit = None;
            camera.pitch_upper_limit = None;
            camera.pitch_lower_limit = None;
            camera.target_yaw = -0.6;
            camera.target_pitch = 0.5;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::{EventCatalog, SampledPath};

    #[test]
    fn test_plot_bounds_flatten_in_2d() {
        let catalog = EventCatalog::voyager();
        let path = SampledPath::from_catalog(&catalog, 50).unwrap();
        let player = TrajectoryPlayer::new(catalog, path).unwrap();

        let (center_3d, radius_3d) = plot_bounds(&player, RenderMode::ThreeD);
        let (center_2d, radius_2d) = plot_bounds(&player, RenderMode::TwoD);
        // Trajectory z maps to scene y, dropped in 2D
        assert!(center_3d.y > 0.0);
        assert_eq!(center_2d.y, 0.0);
        assert!(radius_2d <= radius_3d);
        assert!(radius_3d > 100.0);
    }

    #[test]
    fn test_plot_bounds_resource_refreshes_on_mode_change() {
        let catalog = EventCatalog::voyager();
        let path = SampledPath::from_catalog(&catalog, 50).unwrap();
        let player = TrajectoryPlayer::new(catalog, path).unwrap();

        let mut bounds = PlotBounds::default();
        assert!(bounds.refresh(&player, RenderMode::ThreeD));
        assert!(!bounds.refresh(&player, RenderMode::ThreeD));
        assert_eq!((bounds.center, bounds.radius), plot_bounds(&player, RenderMode::ThreeD));

        assert!(bounds.refresh(&player, RenderMode::TwoD));
        assert_eq!(bounds.center.y, 0.0);
    }
}
