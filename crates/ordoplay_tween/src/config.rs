// SPDX-License-Identifier: MIT OR Apache-2.0
//! RON scene descriptions.
//!
//! A [`SceneConfig`] lists the objects to spawn and the animations to play on
//! them. Objects are referenced by name; [`SceneConfig::build`] resolves the
//! names, validates every parameter and returns a ready [`Player`].

use crate::animation::Animatable;
use crate::easing::EasingFunction;
use crate::easing_animation::{EasingAnimation, PositionGoal, RotationGoal, SlopeRotation};
use crate::error::ConfigError;
use crate::lerp::{LerpPosition, LinearTween};
use crate::oscillator::{OscillationMode, Oscillator};
use crate::player::Player;
use crate::scene::{Scene, TargetId, Transform};
use crate::sequence::{validate_pre_delays, DurationPolicy, Sequence};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Lowest intensity accepted besides the `0` placeholder
pub const MIN_INTENSITY: f32 = 1.0;
/// Highest intensity accepted
pub const MAX_INTENSITY: f32 = 4.0;

/// Objects and animations making up a scene
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Objects to spawn, in order
    #[serde(default)]
    pub objects: Vec<ObjectConfig>,
    /// Top-level animations
    #[serde(default)]
    pub animations: Vec<AnimationConfig>,
}

/// An object to spawn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectConfig {
    /// Unique name animations refer to
    pub name: String,
    /// Initial transform
    #[serde(default)]
    pub transform: Transform,
}

/// Any animation that can appear in a scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AnimationConfig {
    /// Curve-driven transform animation
    Easing(EasingConfig),
    /// Constant-speed transform tween
    Lerp(LerpConfig),
    /// Sine shake or pulse
    Oscillator(OscillatorConfig),
    /// Ordered list of animations
    Sequence(SequenceConfig),
}

/// Position goal of an easing animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PositionConfig {
    /// Fixed world position
    Point([f32; 3]),
    /// Named object's position
    Object(String),
}

/// Rotation goal of an easing animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RotationConfig {
    /// Fixed euler angles (degrees)
    Euler([f32; 3]),
    /// Face the named object
    LookAt(String),
}

/// Position goal of a linear tween
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FollowConfig {
    /// Fixed world position
    Point([f32; 3]),
    /// Named object's live position
    Follow(String),
}

/// [`EasingAnimation`] parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EasingConfig {
    /// Name used in logs
    pub name: String,
    /// Animated object
    #[serde(default)]
    pub target: Option<String>,
    /// Curve shape
    #[serde(default)]
    pub function: EasingFunction,
    /// Seconds for the full curve
    #[serde(default = "default_one")]
    pub duration: f32,
    /// Exponent on the curve value; `0` means `1`
    #[serde(default = "default_one")]
    pub intensity: f32,
    /// Fraction of the curve to skip
    #[serde(default)]
    pub initial_t: f32,
    /// Position goal
    #[serde(default)]
    pub position: Option<PositionConfig>,
    /// Rotation goal
    #[serde(default)]
    pub rotation: Option<RotationConfig>,
    /// Banking along the curve
    #[serde(default)]
    pub slope: SlopeRotation,
    /// Uniform scale growth
    #[serde(default)]
    pub scale_range: f32,
}

/// [`LinearTween`] parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LerpConfig {
    /// Name used in logs
    pub name: String,
    /// Animated object
    #[serde(default)]
    pub target: Option<String>,
    /// Seconds per run
    #[serde(default = "default_one")]
    pub duration: f32,
    /// Position goal
    #[serde(default)]
    pub position: Option<FollowConfig>,
    /// Rotation goal (degrees)
    #[serde(default)]
    pub rotation: Option<[f32; 3]>,
    /// Scale goal
    #[serde(default)]
    pub scale: Option<[f32; 3]>,
    /// Restart forever
    #[serde(default)]
    pub looping: bool,
    /// Seconds to hold the start state between runs
    #[serde(default)]
    pub pause: f32,
}

/// [`Oscillator`] parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OscillatorConfig {
    /// Name used in logs
    pub name: String,
    /// Animated object
    #[serde(default)]
    pub target: Option<String>,
    /// Driven channel
    #[serde(default)]
    pub mode: OscillationMode,
    /// Peak offset
    #[serde(default = "default_one")]
    pub amount: f32,
    /// Angular speed (radians per second)
    #[serde(default = "default_one")]
    pub speed: f32,
    /// Seconds per run (`<= 0` runs until deactivated)
    #[serde(default)]
    pub duration: f32,
    /// Stop only near the start value
    #[serde(default)]
    pub stop_at_origin: bool,
    /// Seconds between runs
    #[serde(default)]
    pub repeat_after: f32,
    /// Total number of runs
    #[serde(default)]
    pub repeat_count: u32,
}

/// [`Sequence`] parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceConfig {
    /// Name used in logs
    pub name: String,
    /// Steps in order
    #[serde(default)]
    pub animations: Vec<AnimationConfig>,
    /// Pre-delay per step; `-1` starts the step with the previous one
    #[serde(default)]
    pub wait_before: Vec<f32>,
    /// Restart forever
    #[serde(default)]
    pub looping: bool,
    /// Seconds between runs
    #[serde(default)]
    pub pause_loop_time: f32,
    /// Duration reported to a containing sequence
    #[serde(default)]
    pub duration_policy: DurationPolicy,
}

fn default_one() -> f32 {
    1.0
}

impl SceneConfig {
    /// Parse a RON document
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(source)?)
    }

    /// Read and parse a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_ron(&source)?;
        tracing::info!(
            "Loaded scene {} ({} objects, {} animations)",
            path.display(),
            config.objects.len(),
            config.animations.len()
        );
        Ok(config)
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// Spawn every object
    pub fn build_scene(&self) -> Result<Scene, ConfigError> {
        let mut scene = Scene::new();
        for object in &self.objects {
            if scene.find(&object.name).is_some() {
                return Err(ConfigError::DuplicateObject(object.name.clone()));
            }
            scene.spawn(object.name.clone(), object.transform);
        }
        Ok(scene)
    }

    /// Spawn the objects and build every animation into a player.
    ///
    /// Nothing is activated yet.
    pub fn build(&self) -> Result<Player, ConfigError> {
        let scene = self.build_scene()?;
        let animations = self
            .animations
            .iter()
            .map(|config| config.build(&scene))
            .collect::<Result<Vec<_>, _>>()?;

        let mut player = Player::new(scene);
        for animation in animations {
            player.add_boxed(animation);
        }
        Ok(player)
    }
}

impl AnimationConfig {
    /// Name of the configured animation
    pub fn name(&self) -> &str {
        match self {
            Self::Easing(config) => &config.name,
            Self::Lerp(config) => &config.name,
            Self::Oscillator(config) => &config.name,
            Self::Sequence(config) => &config.name,
        }
    }

    /// Validate and build against the objects of `scene`
    pub fn build(&self, scene: &Scene) -> Result<Box<dyn Animatable>, ConfigError> {
        let animation: Box<dyn Animatable> = match self {
            Self::Easing(config) => Box::new(config.build(scene)?),
            Self::Lerp(config) => Box::new(config.build(scene)?),
            Self::Oscillator(config) => Box::new(config.build(scene)?),
            Self::Sequence(config) => Box::new(config.build(scene)?),
        };
        Ok(animation)
    }
}

impl EasingConfig {
    /// Validate and build
    pub fn build(&self, scene: &Scene) -> Result<EasingAnimation, ConfigError> {
        let target = resolve_target(scene, &self.name, self.target.as_deref())?;
        check_finite(&self.name, "duration", self.duration)?;
        if self.intensity != 0.0 {
            check_range(&self.name, "intensity", self.intensity, MIN_INTENSITY, MAX_INTENSITY)?;
        }
        check_range(&self.name, "initial_t", self.initial_t, 0.0, 1.0)?;
        check_finite(&self.name, "scale_range", self.scale_range)?;

        let mut animation = EasingAnimation::new(&self.name, target, self.function, self.duration)
            .with_intensity(self.intensity)
            .starting_at(self.initial_t)
            .with_slope(self.slope)
            .with_scale_range(self.scale_range);

        if let Some(position) = &self.position {
            let goal = match position {
                PositionConfig::Point(point) => PositionGoal::Point(*point),
                PositionConfig::Object(name) => {
                    PositionGoal::Object(resolve(scene, &self.name, name)?)
                }
            };
            animation = animation.with_position(goal);
        }
        if let Some(rotation) = &self.rotation {
            let goal = match rotation {
                RotationConfig::Euler(euler) => RotationGoal::Euler(*euler),
                RotationConfig::LookAt(name) => {
                    RotationGoal::LookAt(resolve(scene, &self.name, name)?)
                }
            };
            animation = animation.with_rotation(goal);
        }
        Ok(animation)
    }
}

impl LerpConfig {
    /// Validate and build
    pub fn build(&self, scene: &Scene) -> Result<LinearTween, ConfigError> {
        let target = resolve_target(scene, &self.name, self.target.as_deref())?;
        check_finite(&self.name, "duration", self.duration)?;
        check_finite(&self.name, "pause", self.pause)?;

        let mut tween = LinearTween::new(&self.name, target, self.duration);
        if let Some(position) = &self.position {
            let goal = match position {
                FollowConfig::Point(point) => LerpPosition::Point(*point),
                FollowConfig::Follow(name) => {
                    LerpPosition::Follow(resolve(scene, &self.name, name)?)
                }
            };
            tween = tween.with_position(goal);
        }
        if let Some(rotation) = self.rotation {
            tween = tween.with_rotation(rotation);
        }
        if let Some(scale) = self.scale {
            tween = tween.with_scale(scale);
        }
        if self.looping {
            tween = tween.looping(self.pause);
        }
        Ok(tween)
    }
}

impl OscillatorConfig {
    /// Validate and build
    pub fn build(&self, scene: &Scene) -> Result<Oscillator, ConfigError> {
        let target = resolve_target(scene, &self.name, self.target.as_deref())?;
        check_finite(&self.name, "amount", self.amount)?;
        check_finite(&self.name, "speed", self.speed)?;
        check_finite(&self.name, "duration", self.duration)?;
        check_finite(&self.name, "repeat_after", self.repeat_after)?;

        Ok(
            Oscillator::new(&self.name, target, self.mode, self.amount, self.speed)
                .with_duration(self.duration)
                .stop_at_origin(self.stop_at_origin)
                .repeating(self.repeat_after, self.repeat_count),
        )
    }
}

impl SequenceConfig {
    /// Validate and build, including every nested step
    pub fn build(&self, scene: &Scene) -> Result<Sequence, ConfigError> {
        if self.animations.len() != self.wait_before.len() {
            return Err(ConfigError::LengthMismatch {
                sequence: self.name.clone(),
                animations: self.animations.len(),
                delays: self.wait_before.len(),
            });
        }
        validate_pre_delays(&self.name, &self.wait_before)?;
        check_finite(&self.name, "pause_loop_time", self.pause_loop_time)?;

        let steps = self
            .animations
            .iter()
            .map(|config| config.build(scene))
            .collect::<Result<Vec<_>, _>>()?;

        let mut sequence = Sequence::from_parts(&self.name, steps, self.wait_before.clone())?
            .with_duration_policy(self.duration_policy);
        if self.looping {
            sequence = sequence.looping(self.pause_loop_time);
        }
        Ok(sequence)
    }
}

fn resolve_target(
    scene: &Scene,
    animation: &str,
    target: Option<&str>,
) -> Result<TargetId, ConfigError> {
    let name = target.ok_or_else(|| ConfigError::MissingTarget(animation.to_string()))?;
    resolve(scene, animation, name)
}

fn resolve(scene: &Scene, animation: &str, name: &str) -> Result<TargetId, ConfigError> {
    scene.find(name).ok_or_else(|| ConfigError::UnknownTarget {
        animation: animation.to_string(),
        target: name.to_string(),
    })
}

fn check_finite(animation: &str, field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite {
            animation: animation.to_string(),
            field,
        })
    }
}

fn check_range(
    animation: &str,
    field: &'static str,
    value: f32,
    min: f32,
    max: f32,
) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            animation: animation.to_string(),
            field,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO: &str = r#"(
        objects: [
            (name: "Cube"),
            (name: "Target", transform: (position: (0.0, 2.0, 0.0))),
        ],
        animations: [
            Sequence((
                name: "intro",
                animations: [
                    Easing((
                        name: "rise",
                        target: Some("Cube"),
                        function: EaseOutQuint,
                        duration: 1.0,
                        position: Some(Object("Target")),
                    )),
                    Lerp((
                        name: "grow",
                        target: Some("Cube"),
                        duration: 0.5,
                        scale: Some((2.0, 2.0, 2.0)),
                    )),
                    Oscillator((
                        name: "wobble",
                        target: Some("Target"),
                        mode: Horizontal,
                        amount: 0.2,
                        speed: 6.0,
                        duration: 0.5,
                    )),
                ],
                wait_before: [0.0, 0.5, -1.0],
            )),
        ],
    )"#;

    fn easing(name: &str, target: Option<&str>) -> EasingConfig {
        EasingConfig {
            name: name.to_string(),
            target: target.map(str::to_string),
            function: EasingFunction::EaseInQuint,
            duration: 1.0,
            intensity: 1.0,
            initial_t: 0.0,
            position: None,
            rotation: None,
            slope: SlopeRotation::default(),
            scale_range: 0.0,
        }
    }

    fn one_cube() -> Scene {
        let mut scene = Scene::new();
        scene.spawn("Cube", Transform::default());
        scene
    }

    #[test]
    fn test_parse_and_play() {
        let config = SceneConfig::from_ron(DEMO).unwrap();
        assert_eq!(config.objects.len(), 2);
        assert_eq!(config.animations[0].name(), "intro");

        let mut player = config.build().unwrap();
        let cube = player.scene().find("Cube").unwrap();
        player.activate_all().unwrap();
        player.run_for(3.0, 20).unwrap();

        let transform = player.scene().transform(cube).unwrap();
        assert_eq!(transform.position, [0.0, 2.0, 0.0]);
        assert!(transform.scale.iter().all(|s| (s - 2.0).abs() < 1e-4));
        assert!(!player.is_playing());
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = SceneConfig::from_ron(
            r#"(animations: [Easing((name: "a", target: Some("Cube")))])"#,
        )
        .unwrap();
        let AnimationConfig::Easing(easing) = &config.animations[0] else {
            panic!("expected an easing animation");
        };
        assert_eq!(easing.duration, 1.0);
        assert_eq!(easing.intensity, 1.0);
        assert_eq!(easing.function, EasingFunction::EaseInOutElastic);
        assert!(config.objects.is_empty());

        let config = SceneConfig::from_ron(r#"(animations: [Oscillator((name: "o"))])"#).unwrap();
        let AnimationConfig::Oscillator(oscillator) = &config.animations[0] else {
            panic!("expected an oscillator");
        };
        assert_eq!(oscillator.amount, 1.0);
        assert_eq!(oscillator.speed, 1.0);
        assert_eq!(oscillator.duration, 0.0);
    }

    #[test]
    fn test_ron_round_trip() {
        let config = SceneConfig::from_ron(DEMO).unwrap();
        let ron_str = config.to_ron().unwrap();
        let reparsed = SceneConfig::from_ron(&ron_str).unwrap();
        assert_eq!(reparsed.objects.len(), 2);
        assert_eq!(reparsed.build().unwrap().len(), 1);
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            SceneConfig::from_ron("(objects: [ (name: ) ])"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_duplicate_object() {
        let config = SceneConfig {
            objects: vec![
                ObjectConfig {
                    name: "Cube".to_string(),
                    transform: Transform::default(),
                },
                ObjectConfig {
                    name: "Cube".to_string(),
                    transform: Transform::default(),
                },
            ],
            animations: Vec::new(),
        };
        assert!(matches!(
            config.build_scene(),
            Err(ConfigError::DuplicateObject(name)) if name == "Cube"
        ));
    }

    #[test]
    fn test_missing_and_unknown_target() {
        let scene = one_cube();
        assert!(matches!(
            easing("a", None).build(&scene),
            Err(ConfigError::MissingTarget(name)) if name == "a"
        ));
        assert!(matches!(
            easing("a", Some("Sphere")).build(&scene),
            Err(ConfigError::UnknownTarget { target, .. }) if target == "Sphere"
        ));

        let mut config = easing("a", Some("Cube"));
        config.rotation = Some(RotationConfig::LookAt("Ghost".to_string()));
        assert!(matches!(
            config.build(&scene),
            Err(ConfigError::UnknownTarget { target, .. }) if target == "Ghost"
        ));
    }

    #[test]
    fn test_intensity_range() {
        let scene = one_cube();
        let mut config = easing("a", Some("Cube"));

        config.intensity = 0.0;
        assert!(config.build(&scene).is_ok());
        config.intensity = 4.0;
        assert!(config.build(&scene).is_ok());
        config.intensity = 0.5;
        assert!(matches!(
            config.build(&scene),
            Err(ConfigError::OutOfRange {
                field: "intensity",
                ..
            })
        ));
        config.intensity = 5.0;
        assert!(config.build(&scene).is_err());
    }

    #[test]
    fn test_initial_t_and_duration_checks() {
        let scene = one_cube();
        let mut config = easing("a", Some("Cube"));
        config.initial_t = 1.5;
        assert!(matches!(
            config.build(&scene),
            Err(ConfigError::OutOfRange {
                field: "initial_t",
                ..
            })
        ));

        let mut config = easing("a", Some("Cube"));
        config.duration = f32::INFINITY;
        assert!(matches!(
            config.build(&scene),
            Err(ConfigError::NonFinite {
                field: "duration",
                ..
            })
        ));
    }

    #[test]
    fn test_sequence_validation_runs_before_steps() {
        let scene = one_cube();
        let mut sequence = SequenceConfig {
            name: "seq".to_string(),
            animations: vec![AnimationConfig::Easing(easing("a", None))],
            wait_before: Vec::new(),
            looping: false,
            pause_loop_time: 0.0,
            duration_policy: DurationPolicy::Aggregate,
        };
        assert!(matches!(
            sequence.build(&scene),
            Err(ConfigError::LengthMismatch { .. })
        ));

        sequence.wait_before = vec![-1.0];
        assert!(matches!(
            sequence.build(&scene),
            Err(ConfigError::LeadingSentinel(_))
        ));

        sequence.wait_before = vec![0.0];
        assert!(matches!(
            sequence.build(&scene),
            Err(ConfigError::MissingTarget(_))
        ));
    }

    #[test]
    fn test_sequence_flags_carry_over() {
        let scene = one_cube();
        let sequence = SequenceConfig {
            name: "seq".to_string(),
            animations: vec![
                AnimationConfig::Easing(easing("a", Some("Cube"))),
                AnimationConfig::Easing(easing("b", Some("Cube"))),
            ],
            wait_before: vec![0.0, -1.0],
            looping: true,
            pause_loop_time: 1.5,
            duration_policy: DurationPolicy::Playback,
        }
        .build(&scene)
        .unwrap();

        assert!(sequence.is_looping());
        assert_eq!(sequence.duration(), 1.0);
        assert_eq!(sequence.aggregate_duration(), 1.0);
    }
}
