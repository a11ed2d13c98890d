//! Core library for the Sorting Visualiser application.
//!
//! The crate runs classic comparison sorts one visible step at a time. Each
//! module owns one piece of that pipeline: the bounded input [`Sequence`],
//! the [`Stepper`] that paces and pauses a run, the [`InstrumentedArray`]
//! that counts and announces every compare, swap and write, the five
//! [`Algorithm`]s, and the [`SortController`] that ties them together and
//! reports to a [`Presenter`].

pub mod algorithm;
pub mod array;
pub mod config;
pub mod control;
pub mod controller;
pub mod error;
pub mod record;
pub mod render;
pub mod sequence;
pub mod stats;
pub mod stepper;

pub use algorithm::{Algorithm, AlgorithmInfo};
pub use array::InstrumentedArray;
pub use config::{AppConfig, RandomConfig, TimingConfig};
pub use control::{ControlHandle, RunState, Speed};
pub use controller::{RunOutcome, RunReport, SortController};
pub use error::{Result, SortVizError};
pub use record::JsonLinesRecorder;
pub use render::{Bar, BarBoard, EventLog, Fanout, Highlight, Presenter, VisualEvent};
pub use sequence::{Sequence, MAX_LEN, MAX_VALUE, MIN_VALUE};
pub use stats::Stats;
pub use stepper::{Clock, ManualClock, Stepper, SystemClock};
