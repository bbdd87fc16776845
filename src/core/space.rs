//! Scene scale and axis mapping for trajectory positions.

use bevy::math::{DVec3, Vec3};

/// Scene units per km. Voyager is ~2.4e10 km out, far beyond what f32
/// transforms resolve well, so the whole plot is shrunk to a few hundred units.
pub const SCENE_UNITS_PER_KM: f64 = 1e-8;

/// Convert trajectory km (f64, z up) to Bevy scene units (f32, y up).
/// Mapping: Bevy (x,y,z) = (traj.x, traj.z, -traj.y)
pub fn km_to_scene(km: DVec3) -> Vec3 {
    let s = km * SCENE_UNITS_PER_KM;
    Vec3::new(s.x as f32, s.z as f32, -s.y as f32)
}

/// Center and radius of the sphere enclosing `points` (scene units)
pub fn bounding_sphere(points: impl IntoIterator<Item = Vec3>) -> Option<(Vec3, f32)> {
    let mut iter = points.into_iter();
    let first = iter.next()?;
    let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
    let center = (min + max) * 0.5;
    Some((center, (max - center).length()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_km_to_scene_axes() {
        let v = km_to_scene(DVec3::new(1e9, 2e9, 3e9));
        assert!((v.x - 10.0).abs() < 1e-5);
        assert!((v.y - 30.0).abs() < 1e-5);
        assert!((v.z + 20.0).abs() < 1e-5);
    }

    #[test]
    fn test_bounding_sphere() {
        let (center, radius) = bounding_sphere([
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        ])
        .unwrap();
        assert_eq!(center, Vec3::new(0.0, 1.0, 0.0));
        assert!((radius - 2.0_f32.sqrt()).abs() < 1e-6);
        assert!(bounding_sphere(std::iter::empty()).is_none());
    }
}
