// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types.

use crate::animation::AnimationId;
use crate::scene::TargetId;

/// Error raised while an animation runs
#[derive(Debug, thiserror::Error)]
pub enum AnimationError {
    /// The animated object is not in the scene
    #[error("Target not found: {0:?}")]
    TargetNotFound(TargetId),

    /// No animation with this ID is registered with the player
    #[error("Animation not found: {0:?}")]
    AnimationNotFound(AnimationId),

    /// A step of a sequence failed
    #[error("Sequence '{sequence}' step {step}: {source}")]
    Step {
        /// Sequence name
        sequence: String,
        /// Index of the failing step
        step: usize,
        /// Underlying error
        #[source]
        source: Box<AnimationError>,
    },
}

/// Error in an animation or scene configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Step list and pre-delay list differ in length
    #[error("Sequence '{sequence}' has {animations} animations but {delays} pre-delays")]
    LengthMismatch {
        /// Sequence name
        sequence: String,
        /// Number of animations
        animations: usize,
        /// Number of pre-delays
        delays: usize,
    },

    /// No target was given
    #[error("Animation '{0}' has no target")]
    MissingTarget(String),

    /// Target name does not match any scene object
    #[error("Animation '{animation}' targets unknown object '{target}'")]
    UnknownTarget {
        /// Animation name
        animation: String,
        /// Target name
        target: String,
    },

    /// A pre-delay is neither non-negative nor the group sentinel
    #[error("Sequence '{sequence}' step {step}: invalid pre-delay {delay}")]
    InvalidDelay {
        /// Sequence name
        sequence: String,
        /// Step index
        step: usize,
        /// Offending value
        delay: f32,
    },

    /// The first step cannot join a previous one
    #[error("Sequence '{0}' starts with a group sentinel")]
    LeadingSentinel(String),

    /// A numeric parameter is outside its range
    #[error("Animation '{animation}': {field} = {value} is outside {min}..={max}")]
    OutOfRange {
        /// Animation name
        animation: String,
        /// Parameter name
        field: &'static str,
        /// Offending value
        value: f32,
        /// Lower bound
        min: f32,
        /// Upper bound
        max: f32,
    },

    /// A numeric parameter is NaN or infinite
    #[error("Animation '{animation}': {field} must be finite")]
    NonFinite {
        /// Animation name
        animation: String,
        /// Parameter name
        field: &'static str,
    },

    /// Two scene objects share a name
    #[error("Duplicate object name: {0}")]
    DuplicateObject(String),

    /// RON parse error
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// RON serialization error
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
