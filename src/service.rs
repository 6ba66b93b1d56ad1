//! Task registration facade: unguarded and guarded service contracts.
//!
//! Services bundle one or more periodic jobs and wire them into the engine
//! during setup. Two disjoint contracts exist on purpose; a guarded service
//! is not an unguarded service with an extra field:
//!
//! - [`CronService`]: jobs receive the cancellation token and the engine.
//!   They get **no drain guarantee**: stop does not wait for them, and they
//!   may still be mid-execution when shutdown returns. Fit for
//!   fire-and-forget work that tolerates being abandoned.
//! - [`GuardedCronService`]: jobs additionally receive a [`SharedGate`].
//!   Work done under a shared pass is drained before the token is cancelled.

use crate::barrier::SharedGate;
use crate::error::ScheduleError;
use crate::keeper::GraceKeeper;
use crate::scheduler::Scheduler;

use tokio_util::sync::CancellationToken;

/// A service registering jobs with no drain protection.
///
/// Job bodies are solely responsible for checking `ctx` before doing work;
/// shutdown will not wait for them.
pub trait CronService<S: Scheduler> {
  /// Registration hook, called once during setup.
  ///
  /// # Errors
  ///
  /// Propagates [`ScheduleError`] from the engine's `add_job`.
  fn register(&self, ctx: CancellationToken, scheduler: &S) -> Result<(), ScheduleError>;
}

/// A service registering jobs covered by the quiesce barrier.
///
/// Guarded job bodies follow a per-unit cycle: take a pass from `gate`,
/// check `ctx`, do one bounded unit of work, drop the pass. Under that cycle
/// a body that found `ctx` non-cancelled keeps it non-cancelled until the
/// pass is dropped, and shutdown waits for every live pass. Holding one pass
/// across a whole multi-unit job works but delays shutdown for the job's
/// full duration.
pub trait GuardedCronService<S: Scheduler> {
  /// Registration hook, called once during setup.
  ///
  /// # Errors
  ///
  /// Propagates [`ScheduleError`] from the engine's `add_job`.
  fn register(
    &self,
    ctx: CancellationToken,
    scheduler: &S,
    gate: SharedGate,
  ) -> Result<(), ScheduleError>;
}

/// Registers an unguarded service with the keeper's engine.
///
/// # Errors
///
/// Whatever the service's registration hook returns.
pub fn register_service<S, C>(keeper: &GraceKeeper<S>, service: &C) -> Result<(), ScheduleError>
where
  S: Scheduler,
  C: CronService<S> + ?Sized,
{
  service.register(keeper.context(), keeper.scheduler())
}

/// Registers a guarded service with the keeper's engine and barrier.
///
/// # Errors
///
/// Whatever the service's registration hook returns.
pub fn register_guarded_service<S, C>(
  keeper: &GraceKeeper<S>,
  service: &C,
) -> Result<(), ScheduleError>
where
  S: Scheduler,
  C: GuardedCronService<S> + ?Sized,
{
  service.register(keeper.context(), keeper.scheduler(), keeper.shared_gate())
}
