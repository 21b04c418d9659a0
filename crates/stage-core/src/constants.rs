use glam::Vec3;
use std::f32::consts::PI;

// Shared interaction/choreography tuning constants used by the web frontend.

// Session default framing
pub const DEFAULT_CAMERA_EYE: Vec3 = Vec3::new(0.0, 7.0, 5.0);
pub const DEFAULT_CAMERA_TARGET: Vec3 = Vec3::ZERO;
pub const CAMERA_FOVY_DEG: f32 = 75.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;

// Accent light
pub const ACCENT_LIGHT_HOME: Vec3 = Vec3::new(15.0, 5.0, 10.0);
pub const ACCENT_LIGHT_COLOR: [f32; 3] = [1.0, 0.922, 0.231]; // 0xffeb3b
pub const ACCENT_LIGHT_RANGE: f32 = 80.0;

// Choreography timings (seconds)
pub const HOVER_CUE_SEC: f32 = 0.8; // tilt on/off
pub const RAISE_SEC: f32 = 0.8; // D1: marker spin on pick
pub const TRAVEL_SEC: f32 = 1.0; // D2: camera/target/light toward the marker
pub const RETURN_SEC: f32 = 1.0; // D3: back to default framing

// Camera framing relative to the picked marker; the small z keeps look_at off the up axis
pub const FRAMING_OFFSET: Vec3 = Vec3::new(0.0, 3.0, 0.5);

// Marker orientations (radians)
pub const REST_TILT: f32 = PI / 2.0; // torus lying flat
pub const HOVER_TILT: f32 = PI / 1.4;
pub const RAISED_SPIN: f32 = PI * 3.0;
pub const REST_SPIN: f32 = PI; // same visual pose as RAISED_SPIN, unwound

// Picking
pub const MARKER_MAJOR_RADIUS: f32 = 0.8;
pub const MARKER_TUBE_RADIUS: f32 = 0.5;

// Orbit control
pub const ORBIT_RADIANS_PER_PX: f32 = 0.005;
pub const ORBIT_MIN_POLAR: f32 = 0.05;
pub const ORBIT_MAX_POLAR: f32 = PI / 2.0 - 0.05; // stay above the floor

// Pointer travel (canvas px) between down and up beyond which a click counts as a drag
pub const DRAG_THRESHOLD_PX: f32 = 5.0;

// Scene layout
pub const FLOOR_HALF_SIZE: f32 = 50.0;
pub const MARKER_RADIAL_SEGMENTS: u32 = 16;
pub const MARKER_TUBULAR_SEGMENTS: u32 = 100;
