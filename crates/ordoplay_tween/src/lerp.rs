// SPDX-License-Identifier: MIT OR Apache-2.0
//! Linear transform tween.

use crate::animation::{Animatable, Deferred, FrameContext};
use crate::easing::Interpolation;
use crate::error::AnimationError;
use crate::rotation::{euler_to_quat, normalize_euler, quat_to_euler};
use crate::scene::{TargetId, Transform};

/// Where a linear tween moves its target
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LerpPosition {
    /// Fixed world position
    Point([f32; 3]),
    /// Another object's position, re-read every frame
    Follow(TargetId),
}

/// Animation interpolating position, rotation and scale at constant speed
#[derive(Debug, Clone)]
pub struct LinearTween {
    name: String,
    target: TargetId,
    duration: f32,
    looping: bool,
    pause: f32,
    position: Option<LerpPosition>,
    rotation: Option<[f32; 3]>,
    scale: Option<[f32; 3]>,

    active: bool,
    elapsed: f32,
    start: Transform,
    resume: Option<Deferred>,
}

impl LinearTween {
    /// Create a tween with no channels enabled
    pub fn new(name: impl Into<String>, target: TargetId, duration: f32) -> Self {
        Self {
            name: name.into(),
            target,
            duration,
            looping: false,
            pause: 0.0,
            position: None,
            rotation: None,
            scale: None,
            active: false,
            elapsed: 0.0,
            start: Transform::default(),
            resume: None,
        }
    }

    /// Move to a position
    pub fn with_position(mut self, position: LerpPosition) -> Self {
        self.position = Some(position);
        self
    }

    /// Rotate to euler angles; all-zero angles snap straight to identity
    pub fn with_rotation(mut self, euler: [f32; 3]) -> Self {
        self.rotation = Some(euler);
        self
    }

    /// Scale to a size
    pub fn with_scale(mut self, scale: [f32; 3]) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Restart forever, holding the start state for `pause` seconds between runs
    pub fn looping(mut self, pause: f32) -> Self {
        self.looping = true;
        self.pause = pause;
        self
    }

    /// Whether the tween is holding between loops
    pub fn is_pausing(&self) -> bool {
        self.resume.is_some()
    }

    fn progress(&self) -> f32 {
        if self.duration > 0.0 {
            self.elapsed / self.duration
        } else {
            1.0
        }
    }

    fn apply(&self, ctx: &mut FrameContext<'_>, t: f32) -> Result<(), AnimationError> {
        let position = match self.position {
            Some(LerpPosition::Point(point)) => Some(point),
            Some(LerpPosition::Follow(id)) => Some(ctx.transform(id)?.position),
            None => None,
        };
        let start = self.start;
        let transform = ctx.transform_mut(self.target)?;

        if let Some(end) = position {
            transform.position = Interpolation::lerp_vec3(start.position, end, t);
        }
        if let Some(end) = self.rotation {
            if normalize_euler(end) == [0.0, 0.0, 0.0] {
                transform.rotation = [0.0, 0.0, 0.0];
            } else {
                let q = Interpolation::slerp(euler_to_quat(start.rotation), euler_to_quat(end), t);
                transform.rotation = quat_to_euler(q);
            }
        }
        if let Some(end) = self.scale {
            transform.scale = Interpolation::lerp_vec3(start.scale, end, t);
        }
        Ok(())
    }

    fn restore_start(&self, ctx: &mut FrameContext<'_>) -> Result<(), AnimationError> {
        *ctx.transform_mut(self.target)? = self.start;
        Ok(())
    }
}

impl Animatable for LinearTween {
    fn name(&self) -> &str {
        &self.name
    }

    fn activate(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), AnimationError> {
        self.start = ctx.transform(self.target)?;
        self.elapsed = 0.0;
        self.resume = None;
        self.active = true;
        tracing::debug!("Activated '{}' ({:.3}s)", self.name, self.duration);
        Ok(())
    }

    fn tick(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), AnimationError> {
        if !self.active {
            return Ok(());
        }

        if self.resume.is_some() {
            self.restore_start(ctx)?;
            if Deferred::take_due(&mut self.resume, ctx.now()).is_some() {
                self.elapsed = 0.0;
                tracing::debug!("Restarting '{}'", self.name);
            }
            return Ok(());
        }

        self.elapsed += ctx.delta();
        let t = self.progress().min(1.0);
        self.apply(ctx, t)?;

        if t >= 1.0 {
            if self.looping {
                self.restore_start(ctx)?;
                self.resume = Some(Deferred::after(ctx.now(), self.pause));
            } else {
                self.active = false;
                tracing::debug!("Finished '{}'", self.name);
            }
        }
        Ok(())
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.elapsed = 0.0;
        self.resume = None;
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

    fn step(anim: &mut LinearTween, scene: &mut Scene, now: f64, delta: f32) {
        anim.tick(&mut FrameContext::new(FrameTime { now, delta }, scene))
            .unwrap();
    }

    fn start(anim: &mut LinearTween, scene: &mut Scene) {
        anim.activate(&mut FrameContext::new(FrameTime::default(), scene))
            .unwrap();
    }

    #[test]
    fn test_position_and_scale_halfway() {
        let mut scene = Scene::new();
        let cube = scene.spawn("Cube", Transform::default());
        let mut tween = LinearTween::new("slide", cube, 2.0)
            .with_position(LerpPosition::Point([4.0, 0.0, -2.0]))
            .with_scale([3.0, 1.0, 1.0]);

        start(&mut tween, &mut scene);
        step(&mut tween, &mut scene, 1.0, 1.0);
        let transform = scene.transform(cube).unwrap();
        assert_eq!(transform.position, [2.0, 0.0, -1.0]);
        assert_eq!(transform.scale, [2.0, 1.0, 1.0]);

        step(&mut tween, &mut scene, 2.0, 1.0);
        assert!(!tween.is_active());
        assert_eq!(scene.transform(cube).unwrap().position, [4.0, 0.0, -2.0]);
    }

    #[test]
    fn test_follow_reads_live_position() {
        let mut scene = Scene::new();
        let cube = scene.spawn("Cube", Transform::default());
        let leader = scene.spawn("Leader", Transform::at([2.0, 0.0, 0.0]));
        let mut tween =
            LinearTween::new("chase", cube, 1.0).with_position(LerpPosition::Follow(leader));

        start(&mut tween, &mut scene);
        step(&mut tween, &mut scene, 0.5, 0.5);
        assert_eq!(scene.transform(cube).unwrap().position, [1.0, 0.0, 0.0]);

        scene.transform_mut(leader).unwrap().position = [10.0, 0.0, 0.0];
        step(&mut tween, &mut scene, 1.0, 0.5);
        assert_eq!(scene.transform(cube).unwrap().position, [10.0, 0.0, 0.0]);
    }

    #[test]
    fn test_rotation_slerps() {
        let mut scene = Scene::new();
        let cube = scene.spawn("Cube", Transform::default());
        let mut tween = LinearTween::new("turn", cube, 1.0).with_rotation([0.0, 90.0, 0.0]);

        start(&mut tween, &mut scene);
        step(&mut tween, &mut scene, 0.5, 0.5);
        assert!((scene.transform(cube).unwrap().rotation[1] - 45.0).abs() < 1e-3);
        step(&mut tween, &mut scene, 1.0, 0.5);
        assert!((scene.transform(cube).unwrap().rotation[1] - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_zero_rotation_snaps_to_identity() {
        let mut scene = Scene::new();
        let cube = scene.spawn("Cube", Transform::default().with_rotation([0.0, 0.0, 60.0]));
        let mut tween = LinearTween::new("reset", cube, 4.0).with_rotation([0.0, 0.0, 0.0]);

        start(&mut tween, &mut scene);
        step(&mut tween, &mut scene, 0.1, 0.1);
        assert_eq!(scene.transform(cube).unwrap().rotation, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_zero_duration_finishes_on_first_tick() {
        let mut scene = Scene::new();
        let cube = scene.spawn("Cube", Transform::default());
        let mut tween = LinearTween::new("snap", cube, 0.0).with_scale([2.0, 2.0, 2.0]);

        start(&mut tween, &mut scene);
        step(&mut tween, &mut scene, 0.016, 0.016);
        assert!(!tween.is_active());
        assert_eq!(scene.transform(cube).unwrap().scale, [2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_loop_holds_start_then_restarts() {
        let mut scene = Scene::new();
        let cube = scene.spawn("Cube", Transform::default());
        let mut tween = LinearTween::new("pulse", cube, 1.0)
            .with_position(LerpPosition::Point([1.0, 0.0, 0.0]))
            .looping(1.0);

        start(&mut tween, &mut scene);
        step(&mut tween, &mut scene, 0.5, 0.5);
        step(&mut tween, &mut scene, 1.0, 0.5);
        assert!(tween.is_active());
        assert!(tween.is_pausing());
        assert_eq!(scene.transform(cube).unwrap().position, [0.0, 0.0, 0.0]);

        step(&mut tween, &mut scene, 1.5, 0.5);
        assert!(tween.is_pausing());
        step(&mut tween, &mut scene, 2.0, 0.5);
        assert!(!tween.is_pausing());

        step(&mut tween, &mut scene, 2.5, 0.5);
        assert_eq!(scene.transform(cube).unwrap().position, [0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_deactivate_cancels_pause() {
        let mut scene = Scene::new();
        let cube = scene.spawn("Cube", Transform::default());
        let mut tween = LinearTween::new("pulse", cube, 0.5).looping(10.0);

        start(&mut tween, &mut scene);
        step(&mut tween, &mut scene, 0.5, 0.5);
        assert!(tween.is_pausing());
        tween.deactivate();
        assert!(!tween.is_pausing());
        assert!(!tween.is_active());
    }
}
