//! Core domain types for the future-signals report generator.
//!
//! This crate provides the types shared by every stage of the pipeline:
//! - `CandidateSignal`: a filtered feed row, time still in feed time zone
//! - `AdjustedSignal`: a candidate shifted into the reporting time zone
//! - `SignalTime`, `TimeShift`: `HH:MM` arithmetic on a 24h clock
//! - `InstrumentFilter`: the approved-instrument whitelist

pub mod error;
pub mod instrument;
pub mod signal;
pub mod time;

pub use error::{CoreError, Result};
pub use instrument::{normalize_pair, InstrumentFilter, DEFAULT_APPROVED_INSTRUMENTS};
pub use signal::{Action, AdjustedSignal, CandidateSignal};
pub use time::{SignalTime, TimeShift, TIME_FORMAT};
