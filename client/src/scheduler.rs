//! Deferred, fire-once tasks queued against the simulation clock.
//!
//! Tasks never run inline: whatever is scheduled during a tick becomes due
//! on a later [`TaskScheduler::advance`] call, at a tick boundary.

use crate::physics::BodyHandle;
use bevy::time::{Stopwatch, Timer, TimerMode};
use std::collections::BTreeMap;
use std::time::Duration;

/// Work the runtime defers to a later tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeferredTask {
    /// Stop the jump overlay clip if the character is still on the ground.
    StopJumpClip,
    /// Remove a prop or ephemeral body together with its visual.
    DestroyBody(BodyHandle),
}

/// Handle for cancelling a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskToken(u64);

#[derive(Debug, Clone)]
struct ScheduledTask<T> {
    timer: Timer,
    task: T,
}

/// One-shot timers keyed by token, ticked together by the runtime.
#[derive(Debug, Clone)]
pub struct TaskScheduler<T> {
    clock: Stopwatch,
    next_token: u64,
    tasks: BTreeMap<TaskToken, ScheduledTask<T>>,
}

impl<T> Default for TaskScheduler<T> {
    fn default() -> Self {
        Self {
            clock: Stopwatch::new(),
            next_token: 0,
            tasks: BTreeMap::new(),
        }
    }
}

impl<T> TaskScheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total time advanced so far.
    pub fn now(&self) -> Duration {
        self.clock.elapsed()
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_scheduled(&self, token: TaskToken) -> bool {
        self.tasks.contains_key(&token)
    }

    pub fn schedule(&mut self, delay: Duration, task: T) -> TaskToken {
        let token = TaskToken(self.next_token);
        self.next_token += 1;

        self.tasks.insert(
            token,
            ScheduledTask {
                timer: Timer::new(delay, TimerMode::Once),
                task,
            },
        );
        token
    }

    /// Drops a pending task. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, token: TaskToken) -> bool {
        self.tasks.remove(&token).is_some()
    }

    /// Ticks every timer by `dt` and returns the tasks whose timers finished,
    /// earliest due first, then in scheduling order.
    ///
    /// Negative or non-finite `dt` ticks by zero, which still fires
    /// zero-delay tasks.
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        let delta = Duration::try_from_secs_f32(dt).unwrap_or(Duration::ZERO);
        self.clock.tick(delta);

        let mut finished = Vec::new();
        for (token, scheduled) in &mut self.tasks {
            let remaining = scheduled.timer.remaining();
            if scheduled.timer.tick(delta).is_finished() {
                finished.push((remaining, *token));
            }
        }
        finished.sort_unstable();

        finished
            .into_iter()
            .filter_map(|(_, token)| self.tasks.remove(&token))
            .map(|scheduled| scheduled.task)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tasks_fire_in_due_order_then_schedule_order() {
        let mut scheduler = TaskScheduler::new();
        scheduler.schedule(Duration::from_millis(30), "late");
        scheduler.schedule(Duration::from_millis(10), "first");
        scheduler.schedule(Duration::from_millis(10), "second");

        assert_eq!(scheduler.advance(0.05), vec!["first", "second", "late"]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn zero_delay_waits_for_the_next_advance() {
        let mut scheduler = TaskScheduler::new();
        assert!(scheduler.advance(0.016).is_empty());

        scheduler.schedule(Duration::ZERO, 7);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.advance(0.016), vec![7]);
    }

    #[test]
    fn tasks_do_not_fire_early() {
        let mut scheduler = TaskScheduler::new();
        scheduler.schedule(Duration::from_secs(2), ());

        assert!(scheduler.advance(1.0).is_empty());
        assert!(scheduler.advance(0.5).is_empty());
        assert_eq!(scheduler.advance(0.5).len(), 1);
        assert!(scheduler.advance(10.0).is_empty());
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let mut scheduler = TaskScheduler::new();
        let token = scheduler.schedule(Duration::from_millis(5), "cancelled");
        scheduler.schedule(Duration::from_millis(5), "kept");

        assert!(scheduler.is_scheduled(token));
        assert!(scheduler.cancel(token));
        assert!(!scheduler.cancel(token));
        assert_eq!(scheduler.advance(1.0), vec!["kept"]);
    }

    #[test]
    fn cancelling_a_fired_task_reports_false() {
        let mut scheduler = TaskScheduler::new();
        let token = scheduler.schedule(Duration::ZERO, ());
        scheduler.advance(0.1);
        assert!(!scheduler.cancel(token));
    }

    #[test]
    fn invalid_deltas_do_not_move_the_clock() {
        let mut scheduler = TaskScheduler::new();
        scheduler.schedule(Duration::from_millis(1), ());
        scheduler.advance(-1.0);
        scheduler.advance(f32::NAN);
        assert_eq!(scheduler.now(), Duration::ZERO);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn frame_sized_steps_fire_on_the_exact_tick() {
        let mut scheduler = TaskScheduler::new();
        scheduler.schedule(Duration::from_secs(2), "ttl");
        scheduler.schedule(Duration::from_secs(1), "jump");

        let mut fired = Vec::new();
        for tick in 1..=150 {
            for task in scheduler.advance(1.0 / 60.0) {
                fired.push((tick, task));
            }
        }
        assert_eq!(fired, vec![(60, "jump"), (120, "ttl")]);
    }
}
