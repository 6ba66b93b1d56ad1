//! GraceKeeper: Quiesce-Barrier Graceful Shutdown for Recurring Schedulers
//!
//! Wraps any recurring-job scheduling engine with a lifecycle that shuts down
//! cleanly: stop dispatching, drain in-flight runs, block new guarded work,
//! and only then cancel the shared context. The one piece of real concurrency
//! machinery is the [`QuiesceBarrier`]: a read/write drain gate that lets
//! any number of task invocations run concurrently while a single shutdown
//! waits for all of them, with writer-preference fairness so new invocations
//! cannot starve the shutdown.
//!
//! # Guarantees
//!
//! - No new task invocation starts after shutdown suspends the engine.
//! - Every guarded invocation holding a shared pass runs to completion
//!   before the cancellation token fires.
//! - A guarded body that checks the token under a shared pass and finds it
//!   non-cancelled keeps that observation for the rest of the invocation:
//!   cancellation strictly follows exclusive barrier acquisition.
//!
//! # Features
//!
//! - Pluggable engine seam: implement [`Scheduler`] (start / drain-on-stop /
//!   register) and the keeper drives it.
//! - Two registration contracts: [`CronService`] for fire-and-forget jobs
//!   with no drain guarantee, [`GuardedCronService`] for jobs covered by the
//!   barrier.
//! - Best-effort deadline on the engine's own drain: an overrun is logged
//!   (`tracing`) and shutdown proceeds; the barrier wait itself is unbounded
//!   and relies on guarded bodies taking one pass per bounded unit of work.
//! - A ready-made fixed-interval engine, [`IntervalScheduler`], behind the
//!   default `interval_engine` feature.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::{
//!   atomic::{AtomicUsize, Ordering},
//!   Arc,
//! };
//! use std::time::Duration;
//! use std::{future::Future, pin::Pin};
//!
//! use tokio_util::sync::CancellationToken;
//!
//! use gracekeeper::{
//!   register_guarded_service, GraceKeeper, GuardedCronService, IntervalScheduler,
//!   ScheduleError, Scheduler, SharedGate,
//! };
//!
//! struct Heartbeat {
//!   beats: Arc<AtomicUsize>,
//! }
//!
//! impl GuardedCronService<IntervalScheduler> for Heartbeat {
//!   fn register(
//!     &self,
//!     ctx: CancellationToken,
//!     scheduler: &IntervalScheduler,
//!     gate: SharedGate,
//!   ) -> Result<(), ScheduleError> {
//!     let beats = self.beats.clone();
//!     scheduler.add_job(
//!       "250ms",
//!       Box::new(move || {
//!         let ctx = ctx.clone();
//!         let gate = gate.clone();
//!         let beats = beats.clone();
//!         let future = async move {
//!           // One pass per unit of work: acquire, check, work, release.
//!           let _pass = gate.acquire().await;
//!           if ctx.is_cancelled() {
//!             return;
//!           }
//!           beats.fetch_add(1, Ordering::SeqCst);
//!         };
//!         Box::pin(future) as Pin<Box<dyn Future<Output = ()> + Send + 'static>>
//!       }),
//!     )
//!   }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let engine = Arc::new(IntervalScheduler::new());
//!   let keeper = GraceKeeper::new(engine);
//!
//!   let service = Heartbeat {
//!     beats: Arc::new(AtomicUsize::new(0)),
//!   };
//!   register_guarded_service(&keeper, &service)?;
//!
//!   keeper.start()?;
//!   tokio::time::sleep(Duration::from_secs(1)).await;
//!
//!   // Suspend dispatch, wait up to 5s for the engine's own drain, then
//!   // wait (unbounded) for guarded passes before cancelling the token.
//!   keeper.stop(Some(Duration::from_secs(5))).await?;
//!   Ok(())
//! }
//! ```
//!
//! # Shutdown ordering
//!
//! `stop` waits on the engine's native drain signal *before* acquiring the
//! barrier and cancelling, so task bodies never observe cancellation while
//! the engine is still draining its own dispatch path. Unguarded jobs get no
//! drain guarantee past the engine wait's deadline: they may still be
//! mid-execution when `stop` returns, which is the accepted trade-off for
//! fire-and-forget work.

pub mod barrier;
pub mod error;
#[cfg(feature = "interval_engine")]
pub mod interval;
pub mod keeper;
pub mod scheduler;
pub mod service;

// --- Public Re-exports ---

// Core lifecycle components
pub use keeper::{GraceKeeper, LifecycleState};

// Drain barrier
pub use barrier::{ExclusivePass, QuiesceBarrier, SharedGate, SharedPass};

// Engine seam
pub use scheduler::{BoxedJobFn, Scheduler};
#[cfg(feature = "interval_engine")]
pub use interval::IntervalScheduler;

// Registration facade
pub use service::{
  register_guarded_service, register_service, CronService, GuardedCronService,
};

// Error types
pub use error::{ScheduleError, StartError, StopError};
