/// DOM hooks and presentation constants for the web front-end.
///
/// Interaction and choreography tuning lives in `stage_core::constants`.
// Element ids expected in the host page
pub const CANVAS_ID: &str = "stage-canvas";
pub const INFO_ID: &str = "track-info";
pub const DETAIL_ID: &str = "track-detail";
pub const DETAIL_VIDEO_ID: &str = "detail-video";
pub const BACK_BUTTON_ID: &str = "detail-back";
pub const START_OVERLAY_ID: &str = "start-overlay";
pub const START_BUTTON_ID: &str = "overlay-ok";

// Class toggles
pub const HIDDEN_CLASS: &str = "hidden";
pub const DETAIL_HIDE_CLASS: &str = "hide";

// Size of the catalog shown as "No: NN/TOTAL"
pub const CATALOG_TOTAL: u32 = 31;

// Canvas data attributes that override choreography durations (milliseconds)
pub const RAISE_MS_ATTR: &str = "data-raise-ms";
pub const TRAVEL_MS_ATTR: &str = "data-travel-ms";
pub const RETURN_MS_ATTR: &str = "data-return-ms";

// Media output level
pub const MEDIA_GAIN: f32 = 0.8;

// Colors (linear)
pub const CLEAR_COLOR: [f64; 3] = [0.01, 0.01, 0.015];
pub const MARKER_COLOR: [f32; 4] = [1.0, 0.527, 0.002, 1.0]; // 0xffc107
pub const FLOOR_COLOR: [f32; 4] = [0.9, 0.9, 0.9, 1.0];

// Lighting
pub const AMBIENT_LEVEL: f32 = 0.04;
pub const KEY_LIGHT_DIR: [f32; 3] = [0.0, -1.0, 0.0];
pub const KEY_LIGHT_INTENSITY: f32 = 0.07; // 0x111111 from above
pub const ACCENT_LIGHT_INTENSITY: f32 = 1.0;
