use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard},
};

use serde::Serialize;

use crate::{Algorithm, Result, SortVizError, Stats};

/// Animation speed in `1..=100`. Higher is faster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Speed(u8);

impl Speed {
    pub const MIN: Speed = Speed(1);
    pub const MAX: Speed = Speed(100);

    /// Creates a speed, clamping into `1..=100`.
    pub fn new(value: i64) -> Self {
        Self(value.clamp(1, 100) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Per-step delay in time units: `101 - speed`, so always in `1..=100`.
    pub fn delay_units(self) -> u64 {
        101 - u64::from(self.0)
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(50)
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Top-level state of the controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Paused,
    Finished,
}

impl RunState {
    /// Running or paused: a sort task is alive.
    pub fn is_active(self) -> bool {
        matches!(self, RunState::Running | RunState::Paused)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Paused => "paused",
            RunState::Finished => "finished",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Default)]
struct ControlState {
    run_state: RunState,
    speed: Speed,
    cancel_requested: bool,
    algorithm: Option<Algorithm>,
    stats: Stats,
}

/// What the running task sees at a suspension point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Checkpoint {
    pub paused: bool,
    pub cancelled: bool,
    pub speed: Speed,
}

/// Shared, thread-safe view over the controller's externally mutable state.
///
/// Clones observe the same state. The sort task only reads pause, speed and
/// cancellation at its suspension points, where it also publishes its
/// latest stats for pollers.
#[derive(Clone, Default)]
pub struct ControlHandle {
    shared: Arc<Mutex<ControlState>>,
}

impl ControlHandle {
    pub fn new(speed: Speed) -> Self {
        Self {
            shared: Arc::new(Mutex::new(ControlState {
                speed,
                ..Default::default()
            })),
        }
    }

    pub fn run_state(&self) -> Result<RunState> {
        Ok(self.lock()?.run_state)
    }

    pub fn is_paused(&self) -> Result<bool> {
        Ok(self.lock()?.run_state == RunState::Paused)
    }

    /// Flips between running and paused. Outside a run this is a no-op that
    /// reports the unchanged state.
    pub fn toggle_pause(&self) -> Result<RunState> {
        let mut state = self.lock()?;
        state.run_state = match state.run_state {
            RunState::Running => RunState::Paused,
            RunState::Paused => RunState::Running,
            other => other,
        };
        tracing::debug!(state = %state.run_state, "toggled pause");
        Ok(state.run_state)
    }

    pub fn pause(&self) -> Result<RunState> {
        let mut state = self.lock()?;
        if state.run_state == RunState::Running {
            state.run_state = RunState::Paused;
            tracing::debug!("paused");
        }
        Ok(state.run_state)
    }

    pub fn resume(&self) -> Result<RunState> {
        let mut state = self.lock()?;
        if state.run_state == RunState::Paused {
            state.run_state = RunState::Running;
            tracing::debug!("resumed");
        }
        Ok(state.run_state)
    }

    /// Takes effect at the next suspension point; an in-flight wait keeps
    /// the delay it started with.
    pub fn set_speed(&self, speed: Speed) -> Result<()> {
        self.lock()?.speed = speed;
        tracing::debug!(%speed, "speed changed");
        Ok(())
    }

    pub fn speed(&self) -> Result<Speed> {
        Ok(self.lock()?.speed)
    }

    /// Requests early termination of the active run. Ignored when idle.
    pub fn cancel(&self) -> Result<()> {
        let mut state = self.lock()?;
        if state.run_state.is_active() {
            state.cancel_requested = true;
            tracing::debug!("cancellation requested");
        }
        Ok(())
    }

    /// Chooses the algorithm for the next run. An active run keeps the
    /// algorithm it started with.
    pub fn select_algorithm(&self, algorithm: Algorithm) -> Result<()> {
        let mut state = self.lock()?;
        if state.run_state.is_active() {
            tracing::debug!(%algorithm, "algorithm selection deferred until the run ends");
        }
        state.algorithm = Some(algorithm);
        Ok(())
    }

    pub fn selected_algorithm(&self) -> Result<Option<Algorithm>> {
        Ok(self.lock()?.algorithm)
    }

    /// Latest stats published by the running task.
    pub fn stats(&self) -> Result<Stats> {
        Ok(self.lock()?.stats)
    }

    pub(crate) fn begin_run(&self) -> Result<Algorithm> {
        let mut state = self.lock()?;
        if state.run_state.is_active() {
            return Err(SortVizError::AlreadyRunning);
        }
        let algorithm = state.algorithm.ok_or(SortVizError::NoAlgorithmSelected)?;

        state.run_state = RunState::Running;
        state.cancel_requested = false;
        state.stats = Stats::default();
        Ok(algorithm)
    }

    pub(crate) fn checkpoint(&self, stats: &Stats) -> Result<Checkpoint> {
        let mut state = self.lock()?;
        state.stats = *stats;
        Ok(Checkpoint {
            paused: state.run_state == RunState::Paused,
            cancelled: state.cancel_requested,
            speed: state.speed,
        })
    }

    pub(crate) fn finish_run(&self, stats: &Stats) -> Result<()> {
        let mut state = self.lock()?;
        state.run_state = RunState::Finished;
        state.cancel_requested = false;
        state.stats = *stats;
        Ok(())
    }

    pub(crate) fn reset(&self) -> Result<()> {
        let mut state = self.lock()?;
        if state.run_state.is_active() {
            return Err(SortVizError::AlreadyRunning);
        }
        state.run_state = RunState::Idle;
        state.stats = Stats::default();
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, ControlState>> {
        self.shared
            .lock()
            .map_err(|_| SortVizError::msg("control state has been poisoned"))
    }
}

impl fmt::Debug for ControlHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlHandle").finish()
    }
}
