// SPDX-License-Identifier: MIT OR Apache-2.0
//! Tweening and animation sequencing for OrdoPlay.
//!
//! This crate provides frame-driven transform animation:
//! - Easing curves with intensity shaping
//! - Curve-driven, linear and oscillating transform animations
//! - Sequences with pre-delays, grouped steps and loops
//! - RON scene descriptions
//!
//! ## Architecture
//!
//! Every animation implements [`Animatable`] and is driven explicitly:
//! - [`Player`] owns the [`Scene`] and the clock
//! - each frame it passes a [`FrameContext`] to every animation
//! - waits are "resume at" times checked on each tick
//! - deferred restarts are [`Deferred`] handles, cancelled on deactivation

pub mod animation;
pub mod config;
pub mod easing;
pub mod easing_animation;
pub mod error;
pub mod lerp;
pub mod oscillator;
pub mod player;
pub mod rotation;
pub mod scene;
pub mod sequence;

pub use animation::{Animatable, AnimationId, Deferred, FrameContext, FrameTime};
pub use config::{
    AnimationConfig, EasingConfig, FollowConfig, LerpConfig, ObjectConfig, OscillatorConfig,
    PositionConfig, RotationConfig, SceneConfig, SequenceConfig,
};
pub use easing::{apply_intensity, EasingFunction, Interpolation};
pub use easing_animation::{
    EasingAnimation, PositionGoal, RotationGoal, SlopeRotation, COMPLETION_THRESHOLD,
};
pub use error::{AnimationError, ConfigError};
pub use lerp::{LerpPosition, LinearTween};
pub use oscillator::{OscillationMode, Oscillator};
pub use player::Player;
pub use scene::{Scene, SceneObject, TargetId, Transform};
pub use sequence::{DurationPolicy, Sequence, SequenceState, SequenceStep, GROUP_WITH_PREVIOUS};
