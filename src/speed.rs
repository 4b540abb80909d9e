//! Speed targets and smoothing.
//!
//! The state machine picks a desired speed each decision tick. When the
//! desired speed jumps by more than [`SMOOTHING_THRESHOLD`] the controller
//! eases toward it instead of snapping: a single [`SpeedSmoothing`] task per
//! controller advances one step per tick and is replaced (never stacked) when
//! the target jumps again.

use bevy::prelude::*;

use crate::config::SlidingConfig;

/// Desired-speed jumps larger than this are smoothed instead of snapped.
pub const SMOOTHING_THRESHOLD: f32 = 4.0;

/// Desired, previous desired and current movement speed.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub struct SpeedTarget {
    /// Target implied by the active state.
    pub desired: f32,
    /// `desired` as of the previous decision tick.
    pub last_desired: f32,
    /// Speed actually used for force scaling and clamping.
    pub current: f32,
}

/// Identifies one smoothing run. A handle stays valid until the run finishes
/// or is cancelled; a new run never reuses an old handle.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SmoothingHandle(u32);

#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
struct SmoothingTask {
    handle: SmoothingHandle,
    start: f32,
    elapsed: f32,
    duration: f32,
}

/// The at-most-one in-flight smoothing task of a controller.
#[derive(Reflect, Debug, Clone, Default, PartialEq)]
pub struct SpeedSmoothing {
    task: Option<SmoothingTask>,
    next_id: u32,
}

impl SpeedSmoothing {
    /// Start easing from `from` toward `to`, cancelling any running task.
    ///
    /// The run lasts until its elapsed time reaches `|to - from|`; elapsed time
    /// advances by `dt × rate` per step.
    pub fn start(&mut self, from: f32, to: f32) -> SmoothingHandle {
        let handle = SmoothingHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.task = Some(SmoothingTask {
            handle,
            start: from,
            elapsed: 0.0,
            duration: (to - from).abs(),
        });
        handle
    }

    /// Drop the running task, if any.
    pub fn cancel(&mut self) -> Option<SmoothingHandle> {
        self.task.take().map(|task| task.handle)
    }

    /// Handle of the running task.
    pub fn active(&self) -> Option<SmoothingHandle> {
        self.task.map(|task| task.handle)
    }

    pub fn is_live(&self, handle: SmoothingHandle) -> bool {
        self.active() == Some(handle)
    }

    /// Advance the running task by one tick toward `target`.
    ///
    /// Returns the speed to use this tick, or `None` when nothing is running.
    /// The final step returns `target` exactly and retires the task.
    pub fn step(&mut self, target: f32, dt: f32, rate: f32) -> Option<f32> {
        let task = self.task.as_mut()?;
        if task.elapsed < task.duration {
            let value = task.start + (target - task.start) * (task.elapsed / task.duration);
            task.elapsed += dt * rate;
            Some(value)
        } else {
            self.task = None;
            Some(target)
        }
    }
}

/// Smoothing rate for the current ground. Steeper slopes converge faster.
pub fn smoothing_rate(config: &SlidingConfig, slope_angle: Option<f32>) -> f32 {
    match slope_angle {
        Some(angle) => {
            config.speed_increase_multiplier
                * config.slope_increase_multiplier
                * (1.0 + angle / 90.0)
        }
        None => config.speed_increase_multiplier,
    }
}

/// Speed target plus its smoothing task.
#[derive(Reflect, Debug, Clone, Default, PartialEq)]
pub struct SpeedController {
    pub target: SpeedTarget,
    pub smoothing: SpeedSmoothing,
}

impl SpeedController {
    pub fn new(initial: f32) -> Self {
        Self {
            target: SpeedTarget {
                desired: initial,
                last_desired: initial,
                current: initial,
            },
            smoothing: SpeedSmoothing::default(),
        }
    }

    pub fn current(&self) -> f32 {
        self.target.current
    }

    pub fn desired(&self) -> f32 {
        self.target.desired
    }

    pub fn set_desired(&mut self, speed: f32) {
        self.target.desired = speed;
    }

    /// Reconcile current speed with the desired speed for this tick.
    ///
    /// A jump in desired speed beyond the threshold (while moving) restarts
    /// smoothing; otherwise current snaps to desired. A live task then takes
    /// its step and has the final say.
    pub fn update(&mut self, dt: f32, rate: f32) {
        let target = &mut self.target;
        if (target.desired - target.last_desired).abs() > SMOOTHING_THRESHOLD
            && target.current != 0.0
        {
            let handle = self.smoothing.start(target.current, target.desired);
            trace!(
                "speed smoothing {:?}: {} -> {}",
                handle,
                target.current,
                target.desired
            );
        } else {
            target.current = target.desired;
        }
        target.last_desired = target.desired;

        if let Some(speed) = self.smoothing.step(target.desired, dt, rate) {
            target.current = speed;
        }
    }

    /// Force both current and desired speed to `speed`. A running task keeps
    /// easing toward the new desired value.
    pub fn reset_to(&mut self, speed: f32) {
        self.target.current = speed;
        self.target.desired = speed;
    }

    /// Cancel smoothing and fall back to `speed` as the desired speed.
    pub fn cancel_to(&mut self, speed: f32) {
        self.smoothing.cancel();
        self.target.desired = speed;
    }

    /// Snap current speed to the desired speed.
    pub fn snap_to_desired(&mut self) {
        self.target.current = self.target.desired;
    }
}

/// Cap velocity at `speed`.
///
/// On a walkable slope the whole velocity is checked and, when too fast, cut to
/// half the cap along its own direction. Elsewhere only the horizontal part is
/// capped and vertical velocity is left alone. Returns `None` when within limits.
pub fn clamp_velocity(velocity: Vec3, speed: f32, slope_mode: bool) -> Option<Vec3> {
    if slope_mode {
        if velocity.length() > speed {
            return Some(velocity.normalize_or_zero() * speed * 0.5);
        }
        return None;
    }

    let flat = Vec3::new(velocity.x, 0.0, velocity.z);
    if flat.length() > speed {
        let limited = flat.normalize_or_zero() * speed;
        return Some(Vec3::new(limited.x, velocity.y, limited.z));
    }
    None
}
