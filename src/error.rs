use crate::keeper::LifecycleState;

use thiserror::Error;

/// Errors from the scheduling-engine seam: trigger parsing, job
/// registration, and engine activation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
  #[error("invalid trigger expression {expr:?}: {reason}")]
  InvalidTrigger { expr: String, reason: String },
  #[error("job registration rejected: {0}")]
  Rejected(String),
  #[error("scheduling engine failed: {0}")]
  Engine(String),
}

/// Errors from `GraceKeeper::start`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StartError {
  #[error("start is only valid in the created state (currently {0})")]
  InvalidState(LifecycleState),
  #[error("scheduling engine failed to start")]
  Scheduler(#[source] ScheduleError),
}

/// Errors from `GraceKeeper::stop`.
///
/// A drain that outlives the caller's deadline is deliberately *not* an
/// error: stop logs the overrun and proceeds best-effort. The only failure
/// is calling stop from the wrong lifecycle state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StopError {
  #[error("stop is only valid in the started state (currently {0})")]
  InvalidState(LifecycleState),
}
