// SPDX-License-Identifier: MIT OR Apache-2.0
//! The capability every animation variant implements.

use crate::error::AnimationError;
use crate::scene::{Scene, TargetId, Transform};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a top-level animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationId(pub Uuid);

impl AnimationId {
    /// Create a new random animation ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AnimationId {
    fn default() -> Self {
        Self::new()
    }
}

/// Time of the frame being processed
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Seconds since the clock started
    pub now: f64,
    /// Seconds since the previous frame
    pub delta: f32,
}

/// Everything an animation may read or write during a frame
pub struct FrameContext<'a> {
    /// Frame time
    pub time: FrameTime,
    /// Objects being animated
    pub scene: &'a mut Scene,
}

impl<'a> FrameContext<'a> {
    /// Create a context for one frame
    pub fn new(time: FrameTime, scene: &'a mut Scene) -> Self {
        Self { time, scene }
    }

    /// Current time in seconds
    pub fn now(&self) -> f64 {
        self.time.now
    }

    /// Seconds since the previous frame
    pub fn delta(&self) -> f32 {
        self.time.delta
    }

    /// Read a target's transform
    pub fn transform(&self, target: TargetId) -> Result<Transform, AnimationError> {
        self.scene
            .transform(target)
            .copied()
            .ok_or(AnimationError::TargetNotFound(target))
    }

    /// Write to a target's transform
    pub fn transform_mut(&mut self, target: TargetId) -> Result<&mut Transform, AnimationError> {
        self.scene
            .transform_mut(target)
            .ok_or(AnimationError::TargetNotFound(target))
    }
}

/// A one-shot call due at or after a point in time.
///
/// Held by the component that scheduled it; dropping the handle cancels the
/// call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deferred {
    due: f64,
}

impl Deferred {
    /// Schedule a call `delay` seconds after `now`
    pub fn after(now: f64, delay: f32) -> Self {
        Self {
            due: now + f64::from(delay.max(0.0)),
        }
    }

    /// Time at which the call fires
    pub fn due(&self) -> f64 {
        self.due
    }

    /// Whether the call should fire at `now`
    pub fn is_due(&self, now: f64) -> bool {
        now >= self.due
    }

    /// Take the handle out of `slot` if it is due
    pub fn take_due(slot: &mut Option<Deferred>, now: f64) -> Option<Deferred> {
        if slot.is_some_and(|d| d.is_due(now)) {
            slot.take()
        } else {
            None
        }
    }
}

/// Unit of animation driven by a frame loop.
///
/// `tick` is called every frame whether or not the animation is active, so
/// components can fire their own deferred restarts.
pub trait Animatable: std::fmt::Debug + Send {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Snapshot the target's state and start from the beginning
    fn activate(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), AnimationError>;

    /// Advance by one frame
    fn tick(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), AnimationError>;

    /// Stop updating, reset progress and cancel any pending restart
    fn deactivate(&mut self);

    /// Seconds this animation plays for once activated
    fn duration(&self) -> f32;

    /// Whether the animation is currently playing
    fn is_active(&self) -> bool;
}
