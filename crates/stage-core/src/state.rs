//! Camera and light poses shared with the web frontend.
//!
//! These types avoid platform-specific APIs. The renderer reads them every
//! frame to build matrices; the choreography writes them through tweens.

use crate::constants::*;
use glam::{Mat4, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: DEFAULT_CAMERA_EYE,
            target: DEFAULT_CAMERA_TARGET,
            up: Vec3::Y,
            aspect: 1.0,
            fovy_radians: CAMERA_FOVY_DEG.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }
}

/// Colored point light that follows the camera to the far side of a pick.
#[derive(Clone, Debug)]
pub struct AccentLight {
    pub position: Vec3,
    pub color: [f32; 3],
    pub range: f32,
}

impl AccentLight {
    /// Position reflected through the vertical axis (x and z negated).
    /// Applying it twice yields the original position.
    #[inline]
    pub fn mirrored(position: Vec3) -> Vec3 {
        Vec3::new(-position.x, position.y, -position.z)
    }
}

impl Default for AccentLight {
    fn default() -> Self {
        Self {
            position: ACCENT_LIGHT_HOME,
            color: ACCENT_LIGHT_COLOR,
            range: ACCENT_LIGHT_RANGE,
        }
    }
}

/// Everything the choreography moves apart from marker rotations.
#[derive(Clone, Debug, Default)]
pub struct SceneRig {
    pub camera: Camera,
    pub light: AccentLight,
}
