//! Pause-aware pacing of a sort.
//!
//! [`Stepper::suspend`] is the only place a run ever waits. It publishes the
//! run's stats, honours the pause flag by waiting in fixed increments, checks
//! for cancellation, and finally waits `101 - speed` time units.

use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

use crate::{
    config::TimingConfig, control::Checkpoint, ControlHandle, Result, SortVizError, Stats,
};

/// Source of time for the stepper.
pub trait Clock: Send + fmt::Debug {
    /// Monotonic time since the clock was created.
    fn now(&self) -> Duration;

    /// Blocks the calling thread for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by [`Instant`] and [`thread::sleep`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Virtual clock: sleeping advances time instantly. Clones share the same
/// timeline, so a test can keep one clone while the stepper owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    elapsed_nanos: Arc<AtomicU64>,
    sleeps: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, duration: Duration) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        let _ = self
            .elapsed_nanos
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |elapsed| {
                Some(elapsed.saturating_add(nanos))
            });
    }

    /// Number of `sleep` calls observed so far.
    pub fn sleeps(&self) -> u64 {
        self.sleeps.load(Ordering::SeqCst)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.elapsed_nanos.load(Ordering::SeqCst))
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.fetch_add(1, Ordering::SeqCst);
        self.advance(duration);
    }
}

/// Suspension point shared by every instrumented operation.
#[derive(Debug)]
pub struct Stepper {
    clock: Box<dyn Clock>,
    controls: ControlHandle,
    time_unit: Duration,
    pause_poll: Duration,
    run_started: Duration,
}

impl Stepper {
    pub fn new(clock: Box<dyn Clock>, controls: ControlHandle, timing: &TimingConfig) -> Self {
        let run_started = clock.now();
        Self {
            clock,
            controls,
            time_unit: timing.time_unit(),
            pause_poll: timing.pause_poll(),
            run_started,
        }
    }

    /// Marks the start of a run for elapsed time accounting.
    pub fn start_run(&mut self) {
        self.run_started = self.clock.now();
    }

    /// Time since the current run started.
    pub fn elapsed(&self) -> Duration {
        self.clock.now().saturating_sub(self.run_started)
    }

    pub fn controls(&self) -> &ControlHandle {
        &self.controls
    }

    /// Waits while paused, then waits one step. The step delay is read from
    /// the speed once the pause ends and is not revised mid-wait.
    ///
    /// Returns [`SortVizError::Cancelled`] when cancellation was requested
    /// before or during the wait.
    pub fn suspend(&mut self, stats: &mut Stats) -> Result<()> {
        loop {
            let checkpoint = self.checkpoint(stats)?;
            if checkpoint.cancelled {
                return Err(SortVizError::Cancelled);
            }
            if !checkpoint.paused {
                let units = u32::try_from(checkpoint.speed.delay_units()).unwrap_or(u32::MAX);
                let delay = self.time_unit.saturating_mul(units);
                tracing::trace!(?delay, "suspending");
                self.clock.sleep(delay);
                break;
            }
            self.clock.sleep(self.pause_poll);
        }

        if self.checkpoint(stats)?.cancelled {
            return Err(SortVizError::Cancelled);
        }
        Ok(())
    }

    fn checkpoint(&self, stats: &mut Stats) -> Result<Checkpoint> {
        stats.elapsed = self.elapsed();
        self.controls.checkpoint(stats)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::{Algorithm, RunState, Speed};

    fn timing() -> TimingConfig {
        TimingConfig::default()
    }

    fn running_handle(speed: Speed) -> ControlHandle {
        let handle = ControlHandle::new(speed);
        handle.select_algorithm(Algorithm::Bubble).unwrap();
        handle.begin_run().unwrap();
        handle
    }

    #[test]
    fn waits_one_step_derived_from_speed() {
        let clock = ManualClock::new();
        let handle = running_handle(Speed::new(81));
        let mut stepper = Stepper::new(Box::new(clock.clone()), handle, &timing());
        let mut stats = Stats::default();

        stepper.suspend(&mut stats).unwrap();

        assert_eq!(clock.sleeps(), 1);
        assert_eq!(clock.now(), Duration::from_millis(20));
        assert_eq!(stats.elapsed, Duration::from_millis(20));
    }

    /// Resumes after a fixed number of pause polls and records every sleep.
    #[derive(Debug, Clone)]
    struct ResumingClock {
        inner: ManualClock,
        handle: ControlHandle,
        polls_before_resume: u64,
        log: Arc<Mutex<Vec<Duration>>>,
    }

    impl Clock for ResumingClock {
        fn now(&self) -> Duration {
            self.inner.now()
        }

        fn sleep(&self, duration: Duration) {
            self.inner.sleep(duration);
            self.log.lock().unwrap().push(duration);
            if self.inner.sleeps() >= self.polls_before_resume {
                self.handle.resume().unwrap();
            }
        }
    }

    #[test]
    fn polls_in_fixed_increments_while_paused() {
        let handle = running_handle(Speed::new(100));
        handle.pause().unwrap();
        let clock = ResumingClock {
            inner: ManualClock::new(),
            handle: handle.clone(),
            polls_before_resume: 3,
            log: Arc::default(),
        };
        let log = clock.log.clone();
        let mut stepper = Stepper::new(Box::new(clock), handle.clone(), &timing());

        stepper.suspend(&mut Stats::default()).unwrap();

        let poll = Duration::from_millis(100);
        assert_eq!(
            *log.lock().unwrap(),
            vec![poll, poll, poll, Duration::from_millis(1)]
        );
        assert_eq!(handle.run_state().unwrap(), RunState::Running);
    }

    /// Raises the speed in the middle of the step wait.
    #[derive(Debug)]
    struct SpeedChangingClock {
        inner: ManualClock,
        handle: ControlHandle,
    }

    impl Clock for SpeedChangingClock {
        fn now(&self) -> Duration {
            self.inner.now()
        }

        fn sleep(&self, duration: Duration) {
            self.handle.set_speed(Speed::MAX).unwrap();
            self.inner.sleep(duration);
        }
    }

    #[test]
    fn in_flight_wait_keeps_its_delay() {
        let handle = running_handle(Speed::new(1));
        let inner = ManualClock::new();
        let clock = SpeedChangingClock {
            inner: inner.clone(),
            handle: handle.clone(),
        };
        let mut stepper = Stepper::new(Box::new(clock), handle.clone(), &timing());

        stepper.suspend(&mut Stats::default()).unwrap();
        assert_eq!(inner.now(), Duration::from_millis(100));

        stepper.suspend(&mut Stats::default()).unwrap();
        assert_eq!(inner.now(), Duration::from_millis(101));
    }

    #[test]
    fn cancellation_is_reported_before_waiting() {
        let clock = ManualClock::new();
        let handle = running_handle(Speed::default());
        handle.cancel().unwrap();
        let mut stepper = Stepper::new(Box::new(clock.clone()), handle, &timing());

        let err = stepper.suspend(&mut Stats::default()).unwrap_err();
        assert!(matches!(err, SortVizError::Cancelled));
        assert_eq!(clock.sleeps(), 0);
    }

    #[test]
    fn cancellation_wakes_a_paused_run() {
        let handle = running_handle(Speed::default());
        handle.pause().unwrap();

        #[derive(Debug)]
        struct CancellingClock(ManualClock, ControlHandle);
        impl Clock for CancellingClock {
            fn now(&self) -> Duration {
                self.0.now()
            }
            fn sleep(&self, duration: Duration) {
                self.0.sleep(duration);
                self.1.cancel().unwrap();
            }
        }

        let inner = ManualClock::new();
        let mut stepper = Stepper::new(
            Box::new(CancellingClock(inner.clone(), handle.clone())),
            handle,
            &timing(),
        );

        assert!(matches!(
            stepper.suspend(&mut Stats::default()),
            Err(SortVizError::Cancelled)
        ));
        assert_eq!(inner.sleeps(), 1);
    }

    #[test]
    fn elapsed_is_measured_from_run_start() {
        let clock = ManualClock::new();
        clock.advance(Duration::from_secs(3));
        let handle = running_handle(Speed::MAX);
        let mut stepper = Stepper::new(Box::new(clock.clone()), handle.clone(), &timing());
        stepper.start_run();

        let mut stats = Stats::default();
        stepper.suspend(&mut stats).unwrap();
        stepper.suspend(&mut stats).unwrap();

        assert_eq!(stepper.elapsed(), Duration::from_millis(2));
        assert_eq!(stats.elapsed, Duration::from_millis(2));
        assert_eq!(handle.stats().unwrap().elapsed, Duration::from_millis(2));
    }

    #[test]
    fn extreme_timing_saturates_instead_of_overflowing() {
        let timing = TimingConfig {
            default_speed: 50,
            pause_poll_units: u64::from(u32::MAX),
            unit_micros: u64::MAX,
        };
        let clock = ManualClock::new();
        let handle = running_handle(Speed::MIN);
        let mut stepper = Stepper::new(Box::new(clock.clone()), handle, &timing);

        stepper.suspend(&mut Stats::default()).unwrap();
        assert_eq!(clock.sleeps(), 1);
    }
}
