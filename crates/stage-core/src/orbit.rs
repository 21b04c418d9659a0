use crate::constants::{ORBIT_MAX_POLAR, ORBIT_MIN_POLAR, ORBIT_RADIANS_PER_PX};
use crate::state::Camera;
use glam::{Vec2, Vec3};

/// Drag-to-orbit around the camera target, keeping the distance fixed.
///
/// Horizontal motion changes the azimuth, vertical motion the polar angle
/// (measured from +Y), clamped so the camera never crosses the pole or dips
/// under the floor.
#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub radians_per_px: f32,
    pub min_polar: f32,
    pub max_polar: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            radians_per_px: ORBIT_RADIANS_PER_PX,
            min_polar: ORBIT_MIN_POLAR,
            max_polar: ORBIT_MAX_POLAR,
        }
    }
}

impl OrbitControls {
    pub fn rotate(&self, camera: &mut Camera, delta_px: Vec2) {
        if !delta_px.is_finite() {
            return;
        }
        let offset = camera.eye - camera.target;
        let radius = offset.length();
        if radius < 1e-5 {
            return;
        }
        let mut azimuth = offset.x.atan2(offset.z);
        let mut polar = (offset.y / radius).clamp(-1.0, 1.0).acos();
        azimuth -= delta_px.x * self.radians_per_px;
        polar = (polar - delta_px.y * self.radians_per_px).clamp(self.min_polar, self.max_polar);
        let s = polar.sin();
        camera.eye = camera.target
            + Vec3::new(s * azimuth.sin(), polar.cos(), s * azimuth.cos()) * radius;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbit_preserves_distance_to_target() {
        let mut cam = Camera::default();
        let before = (cam.eye - cam.target).length();
        OrbitControls::default().rotate(&mut cam, Vec2::new(120.0, -40.0));
        let after = (cam.eye - cam.target).length();
        assert!((before - after).abs() < 1e-4);
    }

    #[test]
    fn orbit_never_goes_below_the_floor_plane() {
        let mut cam = Camera::default();
        OrbitControls::default().rotate(&mut cam, Vec2::new(0.0, -10_000.0));
        assert!(cam.eye.y > cam.target.y);
    }
}
