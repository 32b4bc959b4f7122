//! Fixed-step scheduler
//!
//! Decouples simulation ticks from the host's frame cadence. Tick `n` is due at
//! `start_time + n * tick_interval`; each frame runs every tick that has come due, so a
//! slow host catches up with several ticks and a fast host runs none.

use super::snapshot::Snapshot;
use super::tick::tick;
use super::world::World;
use crate::consts::TICK_INTERVAL_MS;
use crate::error::{ConfigError, ConfigResult};

/// The host side of the frame loop
pub trait FrameHost {
    /// Ask for one more frame callback
    fn request_frame(&mut self);
    /// Called once per frame in which at least one tick ran
    fn state_changed(&mut self, snapshot: &Snapshot);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchedulerState {
    Idle,
    Running { start_time: f64, tick_index: u64 },
}

#[derive(Debug, Clone)]
pub struct FixedStepScheduler {
    tick_interval: f64,
    state: SchedulerState,
}

impl Default for FixedStepScheduler {
    fn default() -> Self {
        Self {
            tick_interval: TICK_INTERVAL_MS,
            state: SchedulerState::Idle,
        }
    }
}

impl FixedStepScheduler {
    /// Scheduler with a custom tick interval (milliseconds)
    pub fn new(tick_interval: f64) -> ConfigResult<Self> {
        if !tick_interval.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "tick_interval",
                value: tick_interval,
            });
        }
        if tick_interval <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "tick_interval",
                value: tick_interval,
                reason: "must be positive",
            });
        }
        Ok(Self {
            tick_interval,
            state: SchedulerState::Idle,
        })
    }

    pub fn tick_interval(&self) -> f64 {
        self.tick_interval
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, SchedulerState::Running { .. })
    }

    /// Ticks run since `start`
    pub fn tick_index(&self) -> u64 {
        match self.state {
            SchedulerState::Running { tick_index, .. } => tick_index,
            SchedulerState::Idle => 0,
        }
    }

    /// Start (or restart) the clock at `now`
    pub fn start(&mut self, now: f64) {
        log::info!("Scheduler started ({:.2} ms/tick)", self.tick_interval);
        self.state = SchedulerState::Running {
            start_time: now,
            tick_index: 0,
        };
    }

    /// Stop ticking. The next frame callback will not request another.
    pub fn stop(&mut self) {
        if self.is_running() {
            log::info!("Scheduler stopped after {} ticks", self.tick_index());
        }
        self.state = SchedulerState::Idle;
    }

    /// Handle one host frame at time `now`. Returns the number of ticks run.
    pub fn on_frame<H: FrameHost>(&mut self, world: &mut World, now: f64, host: &mut H) -> u32 {
        let SchedulerState::Running {
            start_time,
            ref mut tick_index,
        } = self.state
        else {
            return 0;
        };

        let mut ticks_run = 0;
        while start_time + (*tick_index + 1) as f64 * self.tick_interval <= now {
            *tick_index += 1;
            tick(world);
            ticks_run += 1;
        }

        if ticks_run > 1 {
            log::trace!("Caught up {} ticks at {:.1} ms", ticks_run, now);
        }
        if ticks_run > 0 {
            host.state_changed(&world.snapshot());
        }
        // The simulation has no terminal state
        host.request_frame();
        ticks_run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;

    #[derive(Default)]
    struct RecordingHost {
        frames_requested: u32,
        redraws: Vec<u64>,
    }

    impl FrameHost for RecordingHost {
        fn request_frame(&mut self) {
            self.frames_requested += 1;
        }

        fn state_changed(&mut self, snapshot: &Snapshot) {
            self.redraws.push(snapshot.tick);
        }
    }

    fn world() -> World {
        World::new(WorldConfig::default(), 1)
    }

    #[test]
    fn test_catch_up_three_ticks() {
        let mut world = world();
        let mut host = RecordingHost::default();
        let mut scheduler = FixedStepScheduler::new(33.33).unwrap();
        scheduler.start(0.0);

        assert_eq!(scheduler.on_frame(&mut world, 100.0, &mut host), 3);
        assert_eq!(world.time_ticks, 3);
        assert_eq!(scheduler.tick_index(), 3);
        // One redraw for the whole batch
        assert_eq!(host.redraws, vec![3]);
        assert_eq!(host.frames_requested, 1);
    }

    #[test]
    fn test_fast_host_runs_no_ticks() {
        let mut world = world();
        let mut host = RecordingHost::default();
        let mut scheduler = FixedStepScheduler::default();
        scheduler.start(1000.0);

        assert_eq!(scheduler.on_frame(&mut world, 1010.0, &mut host), 0);
        assert_eq!(scheduler.on_frame(&mut world, 1020.0, &mut host), 0);
        assert_eq!(scheduler.on_frame(&mut world, 1034.0, &mut host), 1);
        assert_eq!(world.time_ticks, 1);
        assert_eq!(host.redraws.len(), 1);
        assert_eq!(host.frames_requested, 3);
    }

    #[test]
    fn test_tick_count_independent_of_frame_rate() {
        let mut slow_world = world();
        let mut fast_world = world();
        let mut host = RecordingHost::default();

        let mut slow = FixedStepScheduler::default();
        let mut fast = FixedStepScheduler::default();
        slow.start(0.0);
        fast.start(0.0);

        for frame in 1..=10 {
            slow.on_frame(&mut slow_world, frame as f64 * 100.0, &mut host);
        }
        for frame in 1..=100 {
            fast.on_frame(&mut fast_world, frame as f64 * 10.0, &mut host);
        }
        assert_eq!(slow_world.time_ticks, fast_world.time_ticks);
        assert_eq!(slow_world.balls[1].pos, fast_world.balls[1].pos);
    }

    #[test]
    fn test_clock_going_backwards_runs_nothing() {
        let mut world = world();
        let mut host = RecordingHost::default();
        let mut scheduler = FixedStepScheduler::new(10.0).unwrap();
        scheduler.start(500.0);
        assert_eq!(scheduler.on_frame(&mut world, 400.0, &mut host), 0);
        assert!(host.redraws.is_empty());
    }

    #[test]
    fn test_idle_scheduler_does_nothing() {
        let mut world = world();
        let mut host = RecordingHost::default();
        let mut scheduler = FixedStepScheduler::default();
        assert_eq!(scheduler.on_frame(&mut world, 10_000.0, &mut host), 0);
        assert_eq!(host.frames_requested, 0);

        scheduler.start(0.0);
        scheduler.on_frame(&mut world, 100.0, &mut host);
        scheduler.stop();
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.on_frame(&mut world, 10_000.0, &mut host), 0);
        assert_eq!(host.frames_requested, 1);
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[test]
    fn test_rejects_bad_interval() {
        assert!(FixedStepScheduler::new(0.0).is_err());
        assert!(FixedStepScheduler::new(-5.0).is_err());
        assert!(FixedStepScheduler::new(f64::NAN).is_err());
        assert_eq!(FixedStepScheduler::default().tick_interval(), TICK_INTERVAL_MS);
    }
}
