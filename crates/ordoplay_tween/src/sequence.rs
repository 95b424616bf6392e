// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timed sequences of animations.
//!
//! A sequence walks its steps in order. Each step waits for its pre-delay,
//! activates its animation, then waits for that animation's duration. Steps
//! whose pre-delay is [`GROUP_WITH_PREVIOUS`] start in the same frame as the
//! step before them, and the batch lasts as long as its longest member.
//!
//! Waits are measured from when the previous wait was due rather than from
//! the frame that noticed it, so frame jitter does not accumulate.

use crate::animation::{Animatable, Deferred, FrameContext};
use crate::error::{AnimationError, ConfigError};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Pre-delay marking a step that starts together with the previous one
pub const GROUP_WITH_PREVIOUS: f32 = -1.0;

/// One entry of a sequence
#[derive(Debug)]
pub struct SequenceStep {
    /// Animation to activate
    pub animation: Box<dyn Animatable>,
    /// Seconds to wait before activation, or [`GROUP_WITH_PREVIOUS`]
    pub pre_delay: f32,
}

impl SequenceStep {
    /// Create a step
    pub fn new(animation: Box<dyn Animatable>, pre_delay: f32) -> Self {
        Self {
            animation,
            pre_delay,
        }
    }

    /// Whether this step joins the previous step's batch
    pub fn is_grouped(&self) -> bool {
        self.pre_delay == GROUP_WITH_PREVIOUS
    }
}

/// Which duration a sequence reports to whoever contains it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DurationPolicy {
    /// Sum of every pre-delay and duration, sentinels included.
    ///
    /// Each grouped step subtracts one second relative to playback; kept
    /// because existing content is timed against it.
    #[default]
    Aggregate,
    /// Time that actually elapses during playback
    Playback,
}

/// Where a sequence is in its step list
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SequenceState {
    /// Not started, or waiting for a loop restart
    #[default]
    Idle,
    /// Waiting out the pre-delay of `step`
    Waiting {
        /// Step about to start
        step: usize,
        /// When the wait ends
        resume_at: f64,
    },
    /// Steps `first..=last` started together and are playing
    Playing {
        /// First step of the batch
        first: usize,
        /// Last step of the batch
        last: usize,
        /// When the batch ends
        resume_at: f64,
    },
    /// Finished without looping
    Dormant,
}

impl SequenceState {
    /// Whether steps are being processed
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Waiting { .. } | Self::Playing { .. })
    }
}

/// Ordered, optionally looping list of animations
#[derive(Debug)]
pub struct Sequence {
    name: String,
    steps: Vec<SequenceStep>,
    looping: bool,
    pause_loop_time: f32,
    duration_policy: DurationPolicy,

    state: SequenceState,
    rearm: Option<Deferred>,
    loops_completed: u32,
}

impl Sequence {
    /// Create an empty, non-looping sequence
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
            looping: false,
            pause_loop_time: 0.0,
            duration_policy: DurationPolicy::default(),
            state: SequenceState::Idle,
            rearm: None,
            loops_completed: 0,
        }
    }

    /// Build from index-aligned animation and pre-delay lists
    pub fn from_parts(
        name: impl Into<String>,
        animations: Vec<Box<dyn Animatable>>,
        pre_delays: Vec<f32>,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        if animations.len() != pre_delays.len() {
            return Err(ConfigError::LengthMismatch {
                sequence: name,
                animations: animations.len(),
                delays: pre_delays.len(),
            });
        }
        validate_pre_delays(&name, &pre_delays)?;

        let mut sequence = Self::new(name);
        sequence.steps = animations
            .into_iter()
            .zip(pre_delays)
            .map(|(animation, pre_delay)| SequenceStep::new(animation, pre_delay))
            .collect();
        Ok(sequence)
    }

    /// Append a step starting right after the previous batch
    pub fn then(self, animation: impl Animatable + 'static) -> Self {
        self.then_after(0.0, animation)
    }

    /// Append a step starting `delay` seconds after the previous batch.
    ///
    /// Negative delays are treated as zero.
    pub fn then_after(mut self, delay: f32, animation: impl Animatable + 'static) -> Self {
        self.steps
            .push(SequenceStep::new(Box::new(animation), delay.max(0.0)));
        self
    }

    /// Append a step starting together with the previous one.
    ///
    /// On an empty sequence this starts the first batch.
    pub fn alongside(mut self, animation: impl Animatable + 'static) -> Self {
        let pre_delay = if self.steps.is_empty() {
            0.0
        } else {
            GROUP_WITH_PREVIOUS
        };
        self.steps
            .push(SequenceStep::new(Box::new(animation), pre_delay));
        self
    }

    /// Restart forever, waiting `pause` seconds between runs
    pub fn looping(mut self, pause: f32) -> Self {
        self.looping = true;
        self.pause_loop_time = pause.max(0.0);
        self
    }

    /// Choose which duration is reported through [`Animatable::duration`]
    pub fn with_duration_policy(mut self, policy: DurationPolicy) -> Self {
        self.duration_policy = policy;
        self
    }

    /// Steps in order
    pub fn steps(&self) -> &[SequenceStep] {
        &self.steps
    }

    /// Current state
    pub fn state(&self) -> SequenceState {
        self.state
    }

    /// Whether the sequence restarts after finishing
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Whether a loop restart is scheduled
    pub fn has_pending_restart(&self) -> bool {
        self.rearm.is_some()
    }

    /// Number of times the last batch has finished
    pub fn loops_completed(&self) -> u32 {
        self.loops_completed
    }

    /// Sum of every step's pre-delay and duration.
    ///
    /// Grouped steps contribute their `-1` sentinel too, so this is one
    /// second short per grouped step compared to a plain sum, and in general
    /// differs from [`Sequence::playback_duration`].
    pub fn aggregate_duration(&self) -> f32 {
        self.steps
            .iter()
            .map(|step| step.pre_delay + step.animation.duration())
            .sum()
    }

    /// Seconds that elapse between activation and the last batch finishing
    pub fn playback_duration(&self) -> f32 {
        self.batches()
            .into_iter()
            .map(|batch| {
                let wait = self.steps[batch.start].pre_delay.max(0.0);
                let longest = self.steps[batch]
                    .iter()
                    .map(|step| step.animation.duration())
                    .fold(0.0, f32::max);
                wait + longest
            })
            .sum()
    }

    /// Index ranges of steps that start together
    pub fn batches(&self) -> Vec<Range<usize>> {
        let mut batches: Vec<Range<usize>> = Vec::new();
        for (i, step) in self.steps.iter().enumerate() {
            match batches.last_mut() {
                Some(batch) if step.is_grouped() => batch.end = i + 1,
                _ => batches.push(i..i + 1),
            }
        }
        batches
    }

    fn step_error(&self, step: usize, source: AnimationError) -> AnimationError {
        AnimationError::Step {
            sequence: self.name.clone(),
            step,
            source: Box::new(source),
        }
    }

    /// Begin at step 0 as if started at time `at`
    fn start(&mut self, at: f64, ctx: &mut FrameContext<'_>) -> Result<(), AnimationError> {
        tracing::debug!("Starting sequence '{}' ({} steps)", self.name, self.steps.len());
        if self.steps.is_empty() {
            self.complete(at);
            return Ok(());
        }
        self.enter_step(0, at, ctx)?;
        self.advance(ctx)
    }

    fn enter_step(
        &mut self,
        step: usize,
        at: f64,
        ctx: &mut FrameContext<'_>,
    ) -> Result<(), AnimationError> {
        let delay = self.steps[step].pre_delay;
        if delay > 0.0 {
            self.state = SequenceState::Waiting {
                step,
                resume_at: at + f64::from(delay),
            };
            Ok(())
        } else {
            self.play_batch(step, at, ctx)
        }
    }

    /// Activate `first` and every grouped step after it
    fn play_batch(
        &mut self,
        first: usize,
        at: f64,
        ctx: &mut FrameContext<'_>,
    ) -> Result<(), AnimationError> {
        let mut last = first;
        let mut duration = self.activate_step(first, ctx)?;

        while self.steps.get(last + 1).is_some_and(SequenceStep::is_grouped) {
            last += 1;
            duration = duration.max(self.activate_step(last, ctx)?);
        }

        self.state = SequenceState::Playing {
            first,
            last,
            resume_at: at + f64::from(duration.max(0.0)),
        };
        Ok(())
    }

    fn activate_step(
        &mut self,
        index: usize,
        ctx: &mut FrameContext<'_>,
    ) -> Result<f32, AnimationError> {
        let step = &mut self.steps[index];
        if let Err(err) = step.animation.activate(ctx) {
            return Err(self.step_error(index, err));
        }
        let duration = step.animation.duration();
        tracing::debug!(
            "Sequence '{}' step {index}: '{}' for {duration:.3}s",
            self.name,
            step.animation.name()
        );
        Ok(duration)
    }

    /// Process every wait that has run out by the current frame
    fn advance(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), AnimationError> {
        let now = ctx.now();
        loop {
            match self.state {
                SequenceState::Idle | SequenceState::Dormant => return Ok(()),
                SequenceState::Waiting { step, resume_at } => {
                    if now < resume_at {
                        return Ok(());
                    }
                    self.play_batch(step, resume_at, ctx)?;
                }
                SequenceState::Playing {
                    last, resume_at, ..
                } => {
                    if now < resume_at {
                        return Ok(());
                    }
                    if last + 1 >= self.steps.len() {
                        self.complete(resume_at);
                        return Ok(());
                    }
                    self.enter_step(last + 1, resume_at, ctx)?;
                }
            }
        }
    }

    fn complete(&mut self, at: f64) {
        self.loops_completed += 1;
        if self.looping {
            self.state = SequenceState::Idle;
            self.rearm = Some(Deferred::after(at, self.pause_loop_time));
            tracing::info!(
                "Sequence '{}' finished, restarting in {:.3}s",
                self.name,
                self.pause_loop_time
            );
        } else {
            self.state = SequenceState::Dormant;
            tracing::info!("Sequence '{}' finished", self.name);
        }
    }
}

impl Animatable for Sequence {
    fn name(&self) -> &str {
        &self.name
    }

    fn activate(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), AnimationError> {
        self.rearm = None;
        for step in &mut self.steps {
            step.animation.deactivate();
        }
        self.start(ctx.now(), ctx)
    }

    fn tick(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), AnimationError> {
        for index in 0..self.steps.len() {
            if let Err(err) = self.steps[index].animation.tick(ctx) {
                return Err(self.step_error(index, err));
            }
        }

        if let Some(rearm) = Deferred::take_due(&mut self.rearm, ctx.now()) {
            return self.start(rearm.due(), ctx);
        }

        self.advance(ctx)
    }

    fn deactivate(&mut self) {
        self.state = SequenceState::Idle;
        self.rearm = None;
        for step in &mut self.steps {
            step.animation.deactivate();
        }
    }

    fn duration(&self) -> f32 {
        match self.duration_policy {
            DurationPolicy::Aggregate => self.aggregate_duration(),
            DurationPolicy::Playback => self.playback_duration(),
        }
    }

    fn is_active(&self) -> bool {
        self.state.is_running()
    }
}

/// Check that every pre-delay is a usable wait or the group sentinel
pub fn validate_pre_delays(sequence: &str, pre_delays: &[f32]) -> Result<(), ConfigError> {
    for (step, &delay) in pre_delays.iter().enumerate() {
        let valid = delay == GROUP_WITH_PREVIOUS || (delay.is_finite() && delay >= 0.0);
        if !valid {
            return Err(ConfigError::InvalidDelay {
                sequence: sequence.to_string(),
                step,
                delay,
            });
        }
    }
    if pre_delays.first() == Some(&GROUP_WITH_PREVIOUS) {
        return Err(ConfigError::LeadingSentinel(sequence.to_string()));
    }
    Ok(())
}
