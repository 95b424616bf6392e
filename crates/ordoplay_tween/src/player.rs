// SPDX-License-Identifier: MIT OR Apache-2.0
//! Frame loop driving top-level animations.
//!
//! The player owns the scene, the animations and the clock. Each call to
//! [`Player::advance`] builds one [`FrameContext`] and ticks every animation
//! in insertion order.

use crate::animation::{Animatable, AnimationId, FrameContext, FrameTime};
use crate::error::AnimationError;
use crate::scene::Scene;
use indexmap::IndexMap;

/// Host for a scene and the animations playing on it
#[derive(Debug)]
pub struct Player {
    scene: Scene,
    /// Scene as it was before the first frame, restored by [`Player::reset`]
    initial_scene: Scene,
    animations: IndexMap<AnimationId, Box<dyn Animatable>>,
    now: f64,
    /// Multiplier applied to every frame delta (1.0 = normal speed)
    pub time_scale: f32,
    paused: bool,
    frame_count: u64,
}

impl Player {
    /// Create a player for a scene
    pub fn new(scene: Scene) -> Self {
        Self {
            initial_scene: scene.clone(),
            scene,
            animations: IndexMap::new(),
            now: 0.0,
            time_scale: 1.0,
            paused: false,
            frame_count: 0,
        }
    }

    /// Animated scene
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable access to the animated scene
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Seconds since the player started
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Frames processed since the player started
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Register an animation; it stays idle until activated
    pub fn add(&mut self, animation: impl Animatable + 'static) -> AnimationId {
        self.add_boxed(Box::new(animation))
    }

    /// Register an already boxed animation
    pub fn add_boxed(&mut self, animation: Box<dyn Animatable>) -> AnimationId {
        let id = AnimationId::new();
        tracing::debug!("Added animation '{}'", animation.name());
        self.animations.insert(id, animation);
        id
    }

    /// Unregister an animation, deactivating it first
    pub fn remove(&mut self, id: AnimationId) -> Option<Box<dyn Animatable>> {
        let mut animation = self.animations.shift_remove(&id)?;
        animation.deactivate();
        Some(animation)
    }

    /// Look up an animation
    pub fn get(&self, id: AnimationId) -> Option<&dyn Animatable> {
        self.animations.get(&id).map(|animation| -> &dyn Animatable { &**animation })
    }

    /// Find the first animation with the given name
    pub fn find(&self, name: &str) -> Option<AnimationId> {
        self.animations
            .iter()
            .find(|(_, animation)| animation.name() == name)
            .map(|(id, _)| *id)
    }

    /// Iterate over animations in insertion order
    pub fn animations(&self) -> impl Iterator<Item = (AnimationId, &dyn Animatable)> {
        self.animations
            .iter()
            .map(|(id, animation)| -> (AnimationId, &dyn Animatable) { (*id, &**animation) })
    }

    /// Number of registered animations
    pub fn len(&self) -> usize {
        self.animations.len()
    }

    /// Check if no animations are registered
    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    /// Whether any animation is playing
    pub fn is_playing(&self) -> bool {
        self.animations.values().any(|animation| animation.is_active())
    }

    /// Start (or restart) an animation at the current time
    pub fn activate(&mut self, id: AnimationId) -> Result<(), AnimationError> {
        let animation = self
            .animations
            .get_mut(&id)
            .ok_or(AnimationError::AnimationNotFound(id))?;
        let time = FrameTime {
            now: self.now,
            delta: 0.0,
        };
        animation.activate(&mut FrameContext::new(time, &mut self.scene))
    }

    /// Start every registered animation
    pub fn activate_all(&mut self) -> Result<(), AnimationError> {
        let now = self.now;
        let mut ctx = FrameContext::new(FrameTime { now, delta: 0.0 }, &mut self.scene);
        for animation in self.animations.values_mut() {
            animation.activate(&mut ctx)?;
        }
        tracing::info!("Activated {} animations", self.animations.len());
        Ok(())
    }

    /// Stop an animation
    pub fn deactivate(&mut self, id: AnimationId) -> Result<(), AnimationError> {
        self.animations
            .get_mut(&id)
            .ok_or(AnimationError::AnimationNotFound(id))?
            .deactivate();
        Ok(())
    }

    /// Stop every animation
    pub fn deactivate_all(&mut self) {
        for animation in self.animations.values_mut() {
            animation.deactivate();
        }
    }

    /// Freeze the clock; frames are ignored until [`Player::resume`]
    pub fn pause(&mut self) -> bool {
        if self.paused {
            return false;
        }
        self.paused = true;
        tracing::info!("Paused at {:.3}s", self.now);
        true
    }

    /// Unfreeze the clock
    pub fn resume(&mut self) -> bool {
        if !self.paused {
            return false;
        }
        self.paused = false;
        tracing::info!("Resumed at {:.3}s", self.now);
        true
    }

    /// Whether the clock is frozen
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Advance the clock by `delta` seconds and tick every animation.
    ///
    /// Every animation is ticked even if an earlier one fails. Failing
    /// animations are deactivated and the first error is returned.
    pub fn advance(&mut self, delta: f32) -> Result<(), AnimationError> {
        if self.paused {
            return Ok(());
        }

        let delta = delta * self.time_scale;
        self.now += f64::from(delta);
        self.frame_count += 1;

        let now = self.now;
        let mut ctx = FrameContext::new(FrameTime { now, delta }, &mut self.scene);
        let mut first_error = None;
        for animation in self.animations.values_mut() {
            if let Err(err) = animation.tick(&mut ctx) {
                tracing::error!("Animation '{}' failed: {err}", animation.name());
                animation.deactivate();
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Run fixed-step frames at `fps` for `seconds`; returns the frame count
    pub fn run_for(&mut self, seconds: f32, fps: u32) -> Result<u64, AnimationError> {
        let fps = fps.max(1);
        let delta = 1.0 / fps as f32;
        let frames = (seconds.max(0.0) * fps as f32).round() as u64;
        for _ in 0..frames {
            self.advance(delta)?;
        }
        Ok(frames)
    }

    /// Stop everything, restore the scene and rewind the clock
    pub fn reset(&mut self) {
        self.deactivate_all();
        self.scene = self.initial_scene.clone();
        self.now = 0.0;
        self.frame_count = 0;
        self.paused = false;
        tracing::info!("Player reset");
    }
}
