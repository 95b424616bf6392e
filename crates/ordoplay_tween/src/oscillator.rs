// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sine-driven shake and pulse animation.

use crate::animation::{Animatable, Deferred, FrameContext};
use crate::error::AnimationError;
use crate::rotation::{normalize_degrees, shortest_delta};
use crate::scene::{TargetId, Transform};
use serde::{Deserialize, Serialize};

/// Rotation in degrees produced by a unit circular shake
const CIRCULAR_SWING: f32 = 89.0;

/// Channel an oscillator drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OscillationMode {
    /// Up and down along Y
    #[default]
    Vertical,
    /// Side to side along X
    Horizontal,
    /// Swing around Z
    Circular,
    /// Pulse larger than the start scale only
    SizeBig,
    /// Pulse larger and smaller than the start scale
    SizeBigSmall,
}

impl OscillationMode {
    fn direction(&self) -> [f32; 3] {
        match self {
            Self::Vertical => [0.0, 1.0, 0.0],
            Self::Horizontal => [1.0, 0.0, 0.0],
            Self::Circular => [0.0, 0.0, CIRCULAR_SWING],
            Self::SizeBig | Self::SizeBigSmall => [1.0, 1.0, 1.0],
        }
    }

    /// How close to its start value the channel must be to stop there
    pub fn tolerance(&self) -> f32 {
        match self {
            Self::Vertical | Self::Horizontal => 0.05,
            Self::Circular => 3.0,
            Self::SizeBig | Self::SizeBigSmall => 2.0,
        }
    }

    /// Scalar the stop check compares
    fn sample(&self, transform: &Transform) -> f32 {
        match self {
            Self::Vertical => transform.position[1],
            Self::Horizontal => transform.position[0],
            Self::Circular => normalize_degrees(transform.rotation[2]),
            Self::SizeBig | Self::SizeBigSmall => length(transform.scale),
        }
    }

    fn distance(&self, a: f32, b: f32) -> f32 {
        match self {
            Self::Circular => shortest_delta(a, b).abs(),
            _ => (a - b).abs(),
        }
    }
}

fn length(v: [f32; 3]) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

fn add(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

/// Animation shaking or pulsing a target with `sin(elapsed * speed) * amount`
#[derive(Debug, Clone)]
pub struct Oscillator {
    name: String,
    target: TargetId,
    mode: OscillationMode,
    amount: f32,
    speed: f32,
    stop_at_origin: bool,
    duration: f32,
    repeat_after: f32,
    repeat_count: u32,

    active: bool,
    elapsed: f32,
    sign: f32,
    runs: u32,
    start: Transform,
    start_value: f32,
    restart: Option<Deferred>,
}

impl Oscillator {
    /// Create an oscillator that runs until deactivated
    pub fn new(
        name: impl Into<String>,
        target: TargetId,
        mode: OscillationMode,
        amount: f32,
        speed: f32,
    ) -> Self {
        Self {
            name: name.into(),
            target,
            mode,
            amount,
            speed,
            stop_at_origin: false,
            duration: 0.0,
            repeat_after: 0.0,
            repeat_count: 0,
            active: false,
            elapsed: 0.0,
            sign: 1.0,
            runs: 1,
            start: Transform::default(),
            start_value: 0.0,
            restart: None,
        }
    }

    /// Stop once `duration` seconds have passed (`<= 0` runs forever)
    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    /// Only stop when the channel is back near its start value
    pub fn stop_at_origin(mut self, enabled: bool) -> Self {
        self.stop_at_origin = enabled;
        self
    }

    /// Play `count` runs in total, waiting `after` seconds between them
    pub fn repeating(mut self, after: f32, count: u32) -> Self {
        self.repeat_after = after;
        self.repeat_count = count;
        self
    }

    /// Driven channel
    pub fn mode(&self) -> OscillationMode {
        self.mode
    }

    /// Whether a restart is scheduled
    pub fn has_pending_restart(&self) -> bool {
        self.restart.is_some()
    }

    fn start_run(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), AnimationError> {
        self.start = ctx.transform(self.target)?;
        self.start_value = self.mode.sample(&self.start);
        self.sign = 1.0;
        self.elapsed = 0.0;
        self.active = true;
        Ok(())
    }

    fn shake(&mut self, transform: &mut Transform) {
        let shake = (self.elapsed * self.speed).sin() * self.amount * self.sign;
        let direction = self.mode.direction();
        let mut offset = direction.map(|d| d * shake);

        match self.mode {
            OscillationMode::Vertical | OscillationMode::Horizontal => {
                transform.position = add(self.start.position, offset);
            }
            OscillationMode::Circular => {
                transform.rotation = add(self.start.rotation, offset);
            }
            OscillationMode::SizeBig => {
                if length(self.start.scale) > length(add(self.start.scale, offset)) {
                    self.sign = -1.0;
                    offset = offset.map(|o| -o);
                }
                transform.scale = add(self.start.scale, offset);
            }
            OscillationMode::SizeBigSmall => {
                transform.scale = add(self.start.scale, offset);
            }
        }
    }

    fn restore(&self, transform: &mut Transform) {
        match self.mode {
            OscillationMode::Vertical | OscillationMode::Horizontal => {
                transform.position = self.start.position;
            }
            OscillationMode::Circular => transform.rotation = self.start.rotation,
            OscillationMode::SizeBig | OscillationMode::SizeBigSmall => {
                transform.scale = self.start.scale;
            }
        }
    }

    /// Finish the current run, scheduling the next one if repeats remain
    fn finish(&mut self, now: f64) {
        if self.repeat_after > 0.0 && self.runs < self.repeat_count {
            self.restart = Some(Deferred::after(now, self.repeat_after));
            self.runs += 1;
            tracing::debug!(
                "'{}' run {} of {} in {:.3}s",
                self.name,
                self.runs,
                self.repeat_count,
                self.repeat_after
            );
        }
        self.active = false;
        tracing::debug!("Finished '{}'", self.name);
    }
}

impl Animatable for Oscillator {
    fn name(&self) -> &str {
        &self.name
    }

    fn activate(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), AnimationError> {
        self.restart = None;
        self.runs = 1;
        self.start_run(ctx)?;
        tracing::debug!("Activated '{}' ({:?})", self.name, self.mode);
        Ok(())
    }

    fn tick(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), AnimationError> {
        if !self.active {
            if Deferred::take_due(&mut self.restart, ctx.now()).is_some() {
                self.start_run(ctx)?;
            }
            return Ok(());
        }

        self.elapsed += ctx.delta();
        let mut transform = ctx.transform(self.target)?;
        self.shake(&mut transform);

        if self.duration > 0.0 && self.elapsed > self.duration {
            if !self.stop_at_origin {
                self.finish(ctx.now());
            } else if self
                .mode
                .distance(self.mode.sample(&transform), self.start_value)
                < self.mode.tolerance()
            {
                self.restore(&mut transform);
                self.finish(ctx.now());
            }
        }

        *ctx.transform_mut(self.target)? = transform;
        Ok(())
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.elapsed = 0.0;
        self.restart = None;
    }

    fn duration(&self) -> f32 {
        self.duration
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::FrameTime;
    use crate::scene::Scene;
    use std::f32::consts::PI;

    struct Rig {
        scene: Scene,
        target: TargetId,
        now: f64,
    }

    impl Rig {
        fn new(transform: Transform) -> Self {
            let mut scene = Scene::new();
            let target = scene.spawn("Target", transform);
            Self {
                scene,
                target,
                now: 0.0,
            }
        }

        fn start(&mut self, osc: &mut Oscillator) {
            let time = FrameTime {
                now: self.now,
                delta: 0.0,
            };
            osc.activate(&mut FrameContext::new(time, &mut self.scene))
                .unwrap();
        }

        fn step(&mut self, osc: &mut Oscillator, delta: f32) {
            self.now += f64::from(delta);
            let time = FrameTime {
                now: self.now,
                delta,
            };
            osc.tick(&mut FrameContext::new(time, &mut self.scene))
                .unwrap();
        }

        fn transform(&self) -> Transform {
            *self.scene.transform(self.target).unwrap()
        }
    }

    #[test]
    fn test_vertical_peak() {
        let mut rig = Rig::new(Transform::at([0.0, 1.0, 0.0]));
        let mut osc = Oscillator::new("bob", rig.target, OscillationMode::Vertical, 2.0, PI);

        rig.start(&mut osc);
        rig.step(&mut osc, 0.5);
        let position = rig.transform().position;
        assert!((position[1] - 3.0).abs() < 1e-5);
        assert_eq!(position[0], 0.0);
    }

    #[test]
    fn test_horizontal_trough() {
        let mut rig = Rig::new(Transform::default());
        let mut osc = Oscillator::new("sway", rig.target, OscillationMode::Horizontal, 1.0, PI);

        rig.start(&mut osc);
        rig.step(&mut osc, 1.5);
        assert!((rig.transform().position[0] + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_circular_swings_z() {
        let mut rig = Rig::new(Transform::default().with_rotation([0.0, 0.0, 10.0]));
        let mut osc = Oscillator::new("swing", rig.target, OscillationMode::Circular, 0.5, PI);

        rig.start(&mut osc);
        rig.step(&mut osc, 0.5);
        assert!((rig.transform().rotation[2] - (10.0 + 44.5)).abs() < 1e-3);
    }

    #[test]
    fn test_size_big_never_shrinks() {
        let mut rig = Rig::new(Transform::default());
        let mut osc = Oscillator::new("pulse", rig.target, OscillationMode::SizeBig, 1.0, PI);

        rig.start(&mut osc);
        for _ in 0..8 {
            rig.step(&mut osc, 0.25);
            let scale = rig.transform().scale;
            assert!(scale.iter().all(|s| *s >= 1.0 - 1e-5), "{scale:?}");
        }
    }

    #[test]
    fn test_size_big_small_shrinks() {
        let mut rig = Rig::new(Transform::default().with_scale([2.0, 2.0, 2.0]));
        let mut osc =
            Oscillator::new("breathe", rig.target, OscillationMode::SizeBigSmall, 1.0, PI);

        rig.start(&mut osc);
        rig.step(&mut osc, 1.5);
        assert!((rig.transform().scale[0] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_stops_after_duration() {
        let mut rig = Rig::new(Transform::default());
        let mut osc = Oscillator::new("bob", rig.target, OscillationMode::Vertical, 1.0, PI)
            .with_duration(0.6);

        rig.start(&mut osc);
        rig.step(&mut osc, 0.5);
        assert!(osc.is_active());
        rig.step(&mut osc, 0.25);
        assert!(!osc.is_active());
        assert!(!osc.has_pending_restart());
        assert_eq!(osc.duration(), 0.6);
    }

    #[test]
    fn test_stop_at_origin_waits_for_start_value() {
        let mut rig = Rig::new(Transform::at([0.0, 5.0, 0.0]));
        let mut osc = Oscillator::new("bob", rig.target, OscillationMode::Vertical, 1.0, PI)
            .with_duration(0.3)
            .stop_at_origin(true);

        rig.start(&mut osc);
        rig.step(&mut osc, 0.25);
        rig.step(&mut osc, 0.25);
        assert!(osc.is_active());
        rig.step(&mut osc, 0.25);
        assert!(osc.is_active());
        rig.step(&mut osc, 0.25);
        assert!(!osc.is_active());
        assert_eq!(rig.transform().position, [0.0, 5.0, 0.0]);
    }

    #[test]
    fn test_repeats_after_pause() {
        let mut rig = Rig::new(Transform::default());
        let mut osc = Oscillator::new("bob", rig.target, OscillationMode::Vertical, 1.0, PI)
            .with_duration(0.4)
            .repeating(1.0, 2);

        rig.start(&mut osc);
        rig.step(&mut osc, 0.5);
        assert!(!osc.is_active());
        assert!(osc.has_pending_restart());

        rig.step(&mut osc, 0.5);
        assert!(!osc.is_active());
        rig.step(&mut osc, 0.5);
        assert!(osc.is_active());

        rig.step(&mut osc, 0.5);
        assert!(!osc.is_active());
        assert!(!osc.has_pending_restart());
    }

    #[test]
    fn test_deactivate_cancels_restart() {
        let mut rig = Rig::new(Transform::default());
        let mut osc = Oscillator::new("bob", rig.target, OscillationMode::Vertical, 1.0, PI)
            .with_duration(0.4)
            .repeating(1.0, 5);

        rig.start(&mut osc);
        rig.step(&mut osc, 0.5);
        assert!(osc.has_pending_restart());

        osc.deactivate();
        rig.step(&mut osc, 2.0);
        assert!(!osc.is_active());
    }
}
