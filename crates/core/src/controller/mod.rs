use std::time::Duration;

use rand::Rng;
use serde::Serialize;

use crate::{
    config::{AppConfig, RandomConfig},
    Algorithm, Clock, ControlHandle, InstrumentedArray, Presenter, Result, RunState, Sequence,
    SortVizError, Speed, Stats, Stepper, SystemClock, VisualEvent,
};

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum RunOutcome {
    Completed,
    Cancelled,
    Aborted(String),
}

/// Summary returned by [`SortController::start`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub algorithm: Algorithm,
    #[serde(flatten)]
    pub outcome: RunOutcome,
    pub stats: Stats,
    pub values: Sequence,
}

/// Owns the sequence, the stats and the run state, and drives one sort at a
/// time to completion.
///
/// [`SortController::start`] blocks the calling thread for the whole run.
/// Pause, speed, cancellation and algorithm selection can be changed from
/// elsewhere through a [`ControlHandle`] obtained from
/// [`SortController::handle`].
pub struct SortController {
    sequence: Sequence,
    stats: Stats,
    stepper: Stepper,
    presenter: Box<dyn Presenter>,
    controls: ControlHandle,
    random: RandomConfig,
}

impl SortController {
    pub fn new(config: &AppConfig, clock: Box<dyn Clock>, presenter: Box<dyn Presenter>) -> Self {
        let controls = ControlHandle::new(Speed::new(i64::from(config.timing.default_speed)));
        Self::with_controls(config, controls, clock, presenter)
    }

    /// Controller driven by an existing handle, for callers that must hold
    /// the handle before the controller exists.
    pub fn with_controls(
        config: &AppConfig,
        controls: ControlHandle,
        clock: Box<dyn Clock>,
        presenter: Box<dyn Presenter>,
    ) -> Self {
        let stepper = Stepper::new(clock, controls.clone(), &config.timing);
        Self {
            sequence: Sequence::default(),
            stats: Stats::default(),
            stepper,
            presenter,
            controls,
            random: config.random.clone(),
        }
    }

    /// Controller paced by the wall clock.
    pub fn with_system_clock(config: &AppConfig, presenter: Box<dyn Presenter>) -> Self {
        Self::new(config, Box::new(SystemClock::new()), presenter)
    }

    /// Returns a handle for changing pause, speed and selection from other
    /// threads while a run is in progress.
    pub fn handle(&self) -> ControlHandle {
        self.controls.clone()
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn comparisons(&self) -> u64 {
        self.stats.comparisons
    }

    pub fn swaps(&self) -> u64 {
        self.stats.swaps
    }

    pub fn elapsed(&self) -> Duration {
        self.stats.elapsed
    }

    pub fn run_state(&self) -> Result<RunState> {
        self.controls.run_state()
    }

    pub fn algorithm(&self) -> Result<Option<Algorithm>> {
        self.controls.selected_algorithm()
    }

    /// Replaces the sequence and clears the stats.
    pub fn set_array(&mut self, sequence: Sequence) -> Result<()> {
        self.controls.reset()?;
        self.sequence = sequence;
        self.stats.reset();
        self.presenter.present(&VisualEvent::Loaded {
            values: self.sequence.as_slice().to_vec(),
        });
        tracing::debug!(len = self.sequence.len(), "loaded sequence");
        Ok(())
    }

    /// Parses and loads `input`. On error the current sequence is kept.
    pub fn load_str(&mut self, input: &str) -> Result<()> {
        match Sequence::parse(input) {
            Ok(sequence) => self.set_array(sequence),
            Err(err) => {
                tracing::warn!(%err, "rejected array input");
                Err(err)
            }
        }
    }

    /// Loads a random sequence drawn from the configured ranges.
    pub fn load_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let sequence = Sequence::random(&self.random, rng);
        self.set_array(sequence)
    }

    /// Selects the algorithm for the next run.
    pub fn set_algorithm(&mut self, algorithm: Algorithm) -> Result<()> {
        self.controls.select_algorithm(algorithm)
    }

    pub fn set_speed(&mut self, speed: Speed) -> Result<()> {
        self.controls.set_speed(speed)
    }

    pub fn toggle_pause(&self) -> Result<RunState> {
        self.controls.toggle_pause()
    }

    pub fn cancel(&self) -> Result<()> {
        self.controls.cancel()
    }

    /// Runs the selected algorithm over the current sequence.
    ///
    /// Fails with [`SortVizError::AlreadyRunning`] or
    /// [`SortVizError::NoAlgorithmSelected`] without touching any state.
    /// Every other failure ends the run and is reported in the
    /// [`RunReport`].
    pub fn start(&mut self) -> Result<RunReport> {
        let algorithm = match self.controls.begin_run() {
            Ok(algorithm) => algorithm,
            Err(err) => {
                tracing::debug!(%err, "start ignored");
                return Err(err);
            }
        };

        self.stats.reset();
        self.stepper.start_run();
        tracing::info!(%algorithm, len = self.sequence.len(), "starting sort");

        let result = {
            let mut array = InstrumentedArray::new(
                self.sequence.as_mut_slice(),
                &mut self.stats,
                &mut self.stepper,
                self.presenter.as_mut(),
            );
            algorithm.run(&mut array)
        };
        self.stats.elapsed = self.stepper.elapsed();

        let outcome = match result {
            Ok(()) => RunOutcome::Completed,
            Err(SortVizError::Cancelled) => RunOutcome::Cancelled,
            Err(err) => {
                tracing::warn!(%algorithm, %err, "sort aborted");
                RunOutcome::Aborted(err.to_string())
            }
        };

        self.controls.finish_run(&self.stats)?;

        let event = match &outcome {
            RunOutcome::Completed => VisualEvent::Sorted {
                values: self.sequence.as_slice().to_vec(),
            },
            RunOutcome::Cancelled => VisualEvent::Aborted {
                reason: SortVizError::Cancelled.to_string(),
            },
            RunOutcome::Aborted(reason) => VisualEvent::Aborted {
                reason: reason.clone(),
            },
        };
        self.presenter.present(&event);

        tracing::info!(
            %algorithm,
            ?outcome,
            comparisons = self.stats.comparisons,
            swaps = self.stats.swaps,
            writes = self.stats.writes,
            elapsed_ms = self.stats.elapsed.as_millis() as u64,
            "sort finished"
        );

        Ok(RunReport {
            algorithm,
            outcome,
            stats: self.stats,
            values: self.sequence.clone(),
        })
    }

    /// Clears the animation state and the stats. Refused while running.
    pub fn reset(&mut self) -> Result<()> {
        self.controls.reset()?;
        self.stats.reset();
        self.presenter.present(&VisualEvent::Reset {
            values: self.sequence.as_slice().to_vec(),
        });
        Ok(())
    }
}

impl std::fmt::Debug for SortController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortController")
            .field("sequence", &self.sequence)
            .field("stats", &self.stats)
            .field("stepper", &self.stepper)
            .finish()
    }
}
