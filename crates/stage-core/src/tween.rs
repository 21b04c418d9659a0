//! Property tweens sampled against the stage clock.
//!
//! A tween interpolates one [`Channel`] from the value it had when the tween
//! started to a fixed end value. Channels are independent, so a marker's tilt
//! and spin can animate at the same time, while a second tween on the same
//! channel replaces the first.

use crate::registry::{MarkerIndex, SceneRegistry};
use crate::state::SceneRig;
use glam::Vec3;
use std::time::Duration;

/// Easing curves. `PowerNOut` decelerates; `PowerNInOut` eases both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    Linear,
    Power1Out,
    Power2InOut,
    Power3Out,
    Power4Out,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Power1Out => 1.0 - (1.0 - t).powi(2),
            Easing::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::Power3Out => 1.0 - (1.0 - t).powi(4),
            Easing::Power4Out => 1.0 - (1.0 - t).powi(5),
        }
    }
}

/// One animatable property of the stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    CameraEye,
    CameraTarget,
    LightPosition,
    MarkerTilt(MarkerIndex),
    MarkerSpin(MarkerIndex),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TweenValue {
    Scalar(f32),
    Vector(Vec3),
}

impl TweenValue {
    fn lerp(self, to: TweenValue, k: f32) -> TweenValue {
        match (self, to) {
            (TweenValue::Scalar(a), TweenValue::Scalar(b)) => TweenValue::Scalar(a + (b - a) * k),
            (TweenValue::Vector(a), TweenValue::Vector(b)) => TweenValue::Vector(a.lerp(b, k)),
            // mismatched kinds jump straight to the end value
            (_, b) => b,
        }
    }
}

impl Channel {
    pub fn read(self, rig: &SceneRig, registry: &SceneRegistry) -> Option<TweenValue> {
        match self {
            Channel::CameraEye => Some(TweenValue::Vector(rig.camera.eye)),
            Channel::CameraTarget => Some(TweenValue::Vector(rig.camera.target)),
            Channel::LightPosition => Some(TweenValue::Vector(rig.light.position)),
            Channel::MarkerTilt(i) => registry
                .get(i)
                .map(|o| TweenValue::Scalar(o.transform.rotation.x)),
            Channel::MarkerSpin(i) => registry
                .get(i)
                .map(|o| TweenValue::Scalar(o.transform.rotation.y)),
        }
    }

    pub fn write(self, value: TweenValue, rig: &mut SceneRig, registry: &mut SceneRegistry) {
        match (self, value) {
            (Channel::CameraEye, TweenValue::Vector(v)) => rig.camera.eye = v,
            (Channel::CameraTarget, TweenValue::Vector(v)) => rig.camera.target = v,
            (Channel::LightPosition, TweenValue::Vector(v)) => rig.light.position = v,
            (Channel::MarkerTilt(i), TweenValue::Scalar(s)) => {
                if let Some(r) = registry.rotation_mut(i) {
                    r.x = s;
                }
            }
            (Channel::MarkerSpin(i), TweenValue::Scalar(s)) => {
                if let Some(r) = registry.rotation_mut(i) {
                    r.y = s;
                }
            }
            (channel, value) => {
                log::warn!("[tween] {:?} cannot take {:?}", channel, value);
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct Tween {
    pub channel: Channel,
    pub from: TweenValue,
    pub to: TweenValue,
    pub start: Duration,
    pub duration: Duration,
    pub easing: Easing,
}

impl Tween {
    pub fn end(&self) -> Duration {
        self.start + self.duration
    }

    /// Value at clock time `now`; before `start` the tween holds `from`.
    pub fn sample(&self, now: Duration) -> TweenValue {
        if now >= self.end() {
            return self.to;
        }
        let elapsed = now.saturating_sub(self.start).as_secs_f32();
        let total = self.duration.as_secs_f32();
        let k = if total > 0.0 { elapsed / total } else { 1.0 };
        self.from.lerp(self.to, self.easing.apply(k))
    }
}

/// Running tweens, at most one per channel.
#[derive(Default)]
pub struct Animator {
    tweens: Vec<Tween>,
}

impl Animator {
    /// Start a tween from the channel's current value. Replaces any tween
    /// already running on the channel.
    pub fn start(
        &mut self,
        channel: Channel,
        to: TweenValue,
        start: Duration,
        duration: Duration,
        easing: Easing,
        rig: &SceneRig,
        registry: &SceneRegistry,
    ) {
        let Some(from) = channel.read(rig, registry) else {
            log::warn!("[tween] {:?} has no current value, skipped", channel);
            return;
        };
        self.tweens.retain(|t| t.channel != channel);
        self.tweens.push(Tween {
            channel,
            from,
            to,
            start,
            duration,
            easing,
        });
    }

    /// Drop any running tween on `channel` and write `value` immediately.
    pub fn snap(
        &mut self,
        channel: Channel,
        value: TweenValue,
        rig: &mut SceneRig,
        registry: &mut SceneRegistry,
    ) {
        self.tweens.retain(|t| t.channel != channel);
        channel.write(value, rig, registry);
    }

    /// Write every tween's value at `now`; finished tweens land exactly on
    /// their end value and are removed.
    pub fn apply(&mut self, now: Duration, rig: &mut SceneRig, registry: &mut SceneRegistry) {
        for t in &self.tweens {
            t.channel.write(t.sample(now), rig, registry);
        }
        self.tweens.retain(|t| t.end() > now);
    }

    pub fn is_animating(&self, channel: Channel) -> bool {
        self.tweens.iter().any(|t| t.channel == channel)
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }
}
