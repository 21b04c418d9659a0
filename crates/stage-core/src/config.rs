//! Tunable choreography and framing parameters.
//!
//! Defaults come from [`crate::constants`]. Only the ordering of steps is
//! fixed; every duration and pose here may be overridden.

use crate::constants::*;
use crate::state::{AccentLight, Camera, SceneRig};
use crate::tween::Easing;
use glam::Vec3;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be between 0 and 600 seconds (got {value})")]
    BadDuration { name: &'static str, value: f32 },
    #[error("{0} must be finite")]
    NotFinite(&'static str),
    #[error("light easing must differ from camera easing ({0:?})")]
    SameEasing(Easing),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChoreographyConfig {
    pub hover_cue_sec: f32,
    pub raise_sec: f32,
    pub travel_sec: f32,
    pub return_sec: f32,
    pub framing_offset: Vec3,
    pub rest_tilt: f32,
    pub hover_tilt: f32,
    pub raised_spin: f32,
    pub rest_spin: f32,
    pub marker_easing: Easing,
    pub hover_easing: Easing,
    pub camera_easing: Easing,
    pub light_easing: Easing,
}

impl Default for ChoreographyConfig {
    fn default() -> Self {
        Self {
            hover_cue_sec: HOVER_CUE_SEC,
            raise_sec: RAISE_SEC,
            travel_sec: TRAVEL_SEC,
            return_sec: RETURN_SEC,
            framing_offset: FRAMING_OFFSET,
            rest_tilt: REST_TILT,
            hover_tilt: HOVER_TILT,
            raised_spin: RAISED_SPIN,
            rest_spin: REST_SPIN,
            marker_easing: Easing::Power4Out,
            hover_easing: Easing::Power1Out,
            camera_easing: Easing::Power1Out,
            light_easing: Easing::Power3Out,
        }
    }
}

// Upper bound keeps Duration conversion in range.
const MAX_STEP_SEC: f32 = 600.0;

fn secs(name: &'static str, value: f32) -> Result<Duration, ConfigError> {
    if value.is_finite() && (0.0..=MAX_STEP_SEC).contains(&value) {
        Ok(Duration::from_secs_f32(value))
    } else {
        Err(ConfigError::BadDuration { name, value })
    }
}

impl ChoreographyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        secs("hover_cue_sec", self.hover_cue_sec)?;
        secs("raise_sec", self.raise_sec)?;
        secs("travel_sec", self.travel_sec)?;
        secs("return_sec", self.return_sec)?;
        if !self.framing_offset.is_finite() {
            return Err(ConfigError::NotFinite("framing_offset"));
        }
        for (name, v) in [
            ("rest_tilt", self.rest_tilt),
            ("hover_tilt", self.hover_tilt),
            ("raised_spin", self.raised_spin),
            ("rest_spin", self.rest_spin),
        ] {
            if !v.is_finite() {
                return Err(ConfigError::NotFinite(name));
            }
        }
        if self.light_easing == self.camera_easing {
            return Err(ConfigError::SameEasing(self.light_easing));
        }
        Ok(())
    }

    // Accessors below assume `validate` passed; bad values fall back to zero.
    pub fn hover_cue(&self) -> Duration {
        secs("hover_cue_sec", self.hover_cue_sec).unwrap_or_default()
    }
    pub fn raise(&self) -> Duration {
        secs("raise_sec", self.raise_sec).unwrap_or_default()
    }
    pub fn travel(&self) -> Duration {
        secs("travel_sec", self.travel_sec).unwrap_or_default()
    }
    pub fn return_(&self) -> Duration {
        secs("return_sec", self.return_sec).unwrap_or_default()
    }
}

/// Session-wide stage configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct StageConfig {
    pub choreography: ChoreographyConfig,
    pub home_eye: Vec3,
    pub home_target: Vec3,
    pub light_home: Vec3,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            choreography: ChoreographyConfig::default(),
            home_eye: DEFAULT_CAMERA_EYE,
            home_target: DEFAULT_CAMERA_TARGET,
            light_home: ACCENT_LIGHT_HOME,
        }
    }
}

impl StageConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.choreography.validate()?;
        for (name, v) in [
            ("home_eye", self.home_eye),
            ("home_target", self.home_target),
            ("light_home", self.light_home),
        ] {
            if !v.is_finite() {
                return Err(ConfigError::NotFinite(name));
            }
        }
        Ok(())
    }

    /// Initial camera and light poses for the session.
    pub fn initial_rig(&self) -> SceneRig {
        SceneRig {
            camera: Camera {
                eye: self.home_eye,
                target: self.home_target,
                ..Camera::default()
            },
            light: AccentLight {
                position: self.light_home,
                ..AccentLight::default()
            },
        }
    }
}
