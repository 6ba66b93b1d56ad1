//! The seam to the external scheduling engine.
//!
//! The engine (trigger parsing, tick computation, dispatch) is a
//! collaborator, not part of this crate. [`Scheduler`] is the narrow contract
//! the lifecycle controller needs from it: activate, suspend-and-drain, and
//! register periodic jobs. The crate ships one implementation
//! ([`IntervalScheduler`](crate::interval::IntervalScheduler), behind the
//! `interval_engine` feature); anything satisfying the trait plugs in the
//! same way.

use crate::error::ScheduleError;

use std::future::Future;
use std::pin::Pin;

use futures::future::BoxFuture;

/// The function type periodic jobs execute.
///
/// The function must be callable repeatedly (once per dispatch), and each
/// call returns a fresh `Send + 'static` future for that invocation. Job
/// outcomes are not reported back through this seam; bodies log or record
/// their own results.
pub type BoxedJobFn =
  Box<dyn Fn() -> Pin<Box<dyn Future<Output = ()> + Send + 'static>> + Send + Sync + 'static>;

/// Contract for a recurring-job scheduling engine.
///
/// The lifecycle controller ([`GraceKeeper`](crate::keeper::GraceKeeper))
/// drives this trait in a fixed order: `add_job` calls during setup, one
/// `start`, one `stop`. Implementations may reject calls outside that order
/// but must not panic on them.
pub trait Scheduler: Send + Sync + 'static {
  /// Activates the engine; dispatch of registered jobs begins.
  ///
  /// # Errors
  ///
  /// Returns [`ScheduleError`] if the engine cannot start (for example,
  /// because it was already started or already shut down).
  fn start(&self) -> Result<(), ScheduleError>;

  /// Suspends dispatch and returns the engine's drain signal.
  ///
  /// After this call returns, no new job invocation may begin. The returned
  /// future resolves once every invocation that was already dispatched has
  /// returned. Callers that cannot wait indefinitely race the future against
  /// their own deadline; dropping it detaches from the drain without
  /// interrupting the in-flight work.
  fn stop(&self) -> BoxFuture<'static, ()>;

  /// Registers a periodic job under the given trigger expression.
  ///
  /// The trigger format is engine-defined and opaque to this crate.
  ///
  /// # Errors
  ///
  /// Returns [`ScheduleError::InvalidTrigger`] if the expression does not
  /// parse, or [`ScheduleError::Rejected`] if the engine refuses the
  /// registration (e.g. it no longer accepts jobs).
  fn add_job(&self, trigger: &str, job: BoxedJobFn) -> Result<(), ScheduleError>;
}
