// SPDX-License-Identifier: MIT OR Apache-2.0
//! Easing-curve driven transform animation.
//!
//! One eased progress value drives every enabled channel:
//! - position towards a fixed point or another object
//! - rotation towards fixed euler angles or to face another object
//! - banking rotation derived from the slope of the curve
//! - uniform scale growth
//!
//! Start values are captured from the target on every activation, so
//! running the same animation twice continues from wherever the target
//! was left.

use crate::animation::{Animatable, FrameContext};
use crate::easing::{EasingFunction, Interpolation};
use crate::error::AnimationError;
use crate::rotation::{look_at_euler, normalize_euler, shortest_deltas, signed_angle};
use crate::scene::{TargetId, Transform};
use serde::{Deserialize, Serialize};

/// Progress past which the animation counts as finished
pub const COMPLETION_THRESHOLD: f32 = 0.999;

/// Where the position channel ends up
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PositionGoal {
    /// Fixed world position
    Point([f32; 3]),
    /// Position of another object, sampled on activation
    Object(TargetId),
}

/// Where the rotation channel ends up
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RotationGoal {
    /// Fixed euler angles (degrees)
    Euler([f32; 3]),
    /// Face another object, sampled on activation
    LookAt(TargetId),
}

/// Banking rotation following the direction of travel along the curve
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SlopeRotation {
    /// Drive the X axis
    pub x: bool,
    /// Drive the Z axis
    pub z: bool,
    /// Multiplier applied to the slope angle
    pub intensity: f32,
    /// Flip the sign of the angle
    pub inverse: bool,
}

impl SlopeRotation {
    /// Whether any axis is driven
    pub fn is_enabled(&self) -> bool {
        self.x || self.z
    }

    fn sign(&self) -> f32 {
        if self.inverse {
            -1.0
        } else {
            1.0
        }
    }
}

/// Values captured on activation
#[derive(Debug, Clone, Copy, Default)]
struct Snapshot {
    start: Transform,
    start_rotation: [f32; 3],
    position_range: Option<[f32; 3]>,
    rotation_range: Option<[f32; 3]>,
}

/// Animation that eases a target's transform along a named curve
#[derive(Debug, Clone)]
pub struct EasingAnimation {
    name: String,
    target: TargetId,
    function: EasingFunction,
    intensity: f32,
    initial_t: f32,
    duration: f32,
    position: Option<PositionGoal>,
    rotation: Option<RotationGoal>,
    slope: SlopeRotation,
    scale_range: f32,

    active: bool,
    time: f32,
    t: f32,
    value: f32,
    snapshot: Snapshot,
}

impl EasingAnimation {
    /// Create an animation with no channels enabled
    pub fn new(
        name: impl Into<String>,
        target: TargetId,
        function: EasingFunction,
        duration: f32,
    ) -> Self {
        Self {
            name: name.into(),
            target,
            function,
            intensity: 1.0,
            initial_t: 0.0,
            duration,
            position: None,
            rotation: None,
            slope: SlopeRotation::default(),
            scale_range: 0.0,
            active: false,
            time: 0.0,
            t: 0.0,
            value: 0.0,
            snapshot: Snapshot::default(),
        }
    }

    /// Exponent applied to the curve value; `0` means `1`
    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = if intensity == 0.0 { 1.0 } else { intensity };
        self
    }

    /// Skip the first `initial_t` fraction of the curve
    pub fn starting_at(mut self, initial_t: f32) -> Self {
        self.initial_t = initial_t.clamp(0.0, 1.0);
        self
    }

    /// Move towards a goal position
    pub fn with_position(mut self, goal: PositionGoal) -> Self {
        self.position = Some(goal);
        self
    }

    /// Rotate towards a goal orientation
    pub fn with_rotation(mut self, goal: RotationGoal) -> Self {
        self.rotation = Some(goal);
        self
    }

    /// Bank along the curve's slope
    pub fn with_slope(mut self, slope: SlopeRotation) -> Self {
        self.slope = slope;
        self
    }

    /// Grow uniformly by up to `range` (ignored unless positive)
    pub fn with_scale_range(mut self, range: f32) -> Self {
        self.scale_range = range;
        self
    }

    /// Animated object
    pub fn target(&self) -> TargetId {
        self.target
    }

    /// Curve shape
    pub fn function(&self) -> EasingFunction {
        self.function
    }

    /// Configured full-curve duration
    pub fn full_duration(&self) -> f32 {
        self.duration
    }

    /// Current normalized progress
    pub fn progress(&self) -> f32 {
        self.t
    }

    /// Current eased value (after intensity)
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Rotation delta per axis computed on the last activation
    pub fn rotation_range(&self) -> Option<[f32; 3]> {
        self.snapshot.rotation_range
    }

    fn normalized_time(&self, time: f32) -> f32 {
        if self.duration > 0.0 {
            time / self.duration
        } else {
            1.0
        }
    }

    fn eased(&self, t: f32) -> f32 {
        self.function.evaluate_with_intensity(t, self.intensity)
    }
}

impl Animatable for EasingAnimation {
    fn name(&self) -> &str {
        &self.name
    }

    fn activate(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), AnimationError> {
        if self.intensity == 0.0 {
            self.intensity = 1.0;
        }

        let start = ctx.transform(self.target)?;
        let start_rotation = normalize_euler(start.rotation);

        let position_range = match self.position {
            Some(goal) => {
                let end = match goal {
                    PositionGoal::Point(point) => point,
                    PositionGoal::Object(id) => ctx.transform(id)?.position,
                };
                Some([
                    end[0] - start.position[0],
                    end[1] - start.position[1],
                    end[2] - start.position[2],
                ])
            }
            None => None,
        };

        // All three axes take the shorter arc, Z included.
        let rotation_range = match self.rotation {
            Some(goal) => {
                let end = match goal {
                    RotationGoal::Euler(euler) => normalize_euler(euler),
                    RotationGoal::LookAt(id) => {
                        look_at_euler(start.position, ctx.transform(id)?.position)
                    }
                };
                Some(shortest_deltas(start_rotation, end))
            }
            None => None,
        };

        if self.slope.is_enabled() && rotation_range.is_some() {
            tracing::warn!(
                "'{}' drives rotation from both slope and goal; goal rotation wins",
                self.name
            );
        }

        self.snapshot = Snapshot {
            start,
            start_rotation,
            position_range,
            rotation_range,
        };
        self.t = self.initial_t;
        self.time = self.duration * self.initial_t;
        self.value = self.eased(self.t);
        self.active = true;

        tracing::debug!(
            "Activated '{}' ({}, {:.3}s from t={:.3})",
            self.name,
            self.function.name(),
            self.duration(),
            self.initial_t
        );
        Ok(())
    }

    fn tick(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), AnimationError> {
        if !self.active {
            return Ok(());
        }

        let previous = [self.normalized_time(self.time), self.value];
        self.time += ctx.delta();
        let current_time = self.normalized_time(self.time);
        self.t = current_time.clamp(0.0, 1.0);
        self.value = self.eased(self.t);

        let value = self.value;
        let snapshot = self.snapshot;
        let slope = self.slope;
        let scale_range = self.scale_range;
        let transform = ctx.transform_mut(self.target)?;

        if let Some(range) = snapshot.position_range {
            transform.position = Interpolation::offset_vec3(snapshot.start.position, range, value);
        }

        if slope.is_enabled() {
            let angle = slope.sign()
                * signed_angle([1.0, 0.0], [current_time - previous[0], value - previous[1]])
                * slope.intensity;
            if slope.z {
                transform.rotation[2] = angle;
            }
            if slope.x {
                transform.rotation[0] = angle;
            }
        }

        if let Some(range) = snapshot.rotation_range {
            transform.rotation = Interpolation::offset_vec3(snapshot.start_rotation, range, value);
        }

        if scale_range > 0.0 {
            transform.scale = Interpolation::offset_vec3(
                snapshot.start.scale,
                [scale_range, scale_range, scale_range],
                value,
            );
        }

        if self.t > COMPLETION_THRESHOLD {
            self.deactivate();
            tracing::debug!("Finished '{}'", self.name);
        }
        Ok(())
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.t = 0.0;
        self.time = 0.0;
    }

    fn duration(&self) -> f32 {
        self.duration - self.duration * self.initial_t
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
