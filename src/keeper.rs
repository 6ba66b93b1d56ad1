//! The lifecycle controller: start/stop sequencing around the quiesce barrier.

use crate::barrier::{QuiesceBarrier, SharedGate};
use crate::error::{StartError, StopError};
use crate::scheduler::Scheduler;

use core::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Lifecycle phase of a [`GraceKeeper`]. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
  Created,
  Started,
  Stopping,
  Stopped,
}

impl fmt::Display for LifecycleState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      LifecycleState::Created => "created",
      LifecycleState::Started => "started",
      LifecycleState::Stopping => "stopping",
      LifecycleState::Stopped => "stopped",
    };
    f.write_str(name)
  }
}

/// Wraps a scheduling engine with graceful-shutdown lifecycle management.
///
/// The keeper owns the cancellation token shared with every task body and the
/// [`QuiesceBarrier`] protecting guarded work. [`start`](GraceKeeper::start)
/// activates the engine; [`stop`](GraceKeeper::stop) suspends dispatch,
/// drains in-flight runs, and only then cancels the token.
///
/// The engine itself is held by `Arc` and outlives the keeper's interest in
/// it; the keeper never tears the engine down beyond calling
/// [`Scheduler::stop`].
pub struct GraceKeeper<S> {
  scheduler: Arc<S>,
  token: CancellationToken,
  barrier: QuiesceBarrier,
  state: Mutex<LifecycleState>,
}

impl<S: Scheduler> GraceKeeper<S> {
  /// Creates a keeper around the given engine. No tasks run until
  /// [`start`](GraceKeeper::start).
  pub fn new(scheduler: Arc<S>) -> Self {
    Self {
      scheduler,
      token: CancellationToken::new(),
      barrier: QuiesceBarrier::new(),
      state: Mutex::new(LifecycleState::Created),
    }
  }

  /// Current lifecycle phase.
  pub fn state(&self) -> LifecycleState {
    *self.state.lock()
  }

  /// A clone of the keeper's cancellation token.
  ///
  /// Cancellation is one-shot and monotonic: once cancelled, every clone
  /// reports cancelled forever. The token is cancelled by
  /// [`stop`](GraceKeeper::stop), strictly after all guarded work has
  /// drained.
  pub fn context(&self) -> CancellationToken {
    self.token.clone()
  }

  /// The engine this keeper manages.
  pub fn scheduler(&self) -> &S {
    &self.scheduler
  }

  /// Shared-acquisition capability over the keeper's barrier.
  ///
  /// Handed to guarded services at registration; exposing it here also lets
  /// callers wire guarded jobs manually. The gate can only take shared
  /// passes, never drain the barrier.
  pub fn shared_gate(&self) -> SharedGate {
    self.barrier.shared_gate()
  }

  /// Activates the scheduling engine.
  ///
  /// Valid only in the `Created` state. Does not block: dispatch happens on
  /// the engine's own tasks.
  ///
  /// # Errors
  ///
  /// - [`StartError::InvalidState`]: called after a previous start or stop.
  /// - [`StartError::Scheduler`]: the engine refused to start.
  pub fn start(&self) -> Result<(), StartError> {
    let mut state = self.state.lock();
    if *state != LifecycleState::Created {
      return Err(StartError::InvalidState(*state));
    }
    info!("keeper starting scheduling engine");
    self.scheduler.start().map_err(StartError::Scheduler)?;
    *state = LifecycleState::Started;
    Ok(())
  }

  /// Gracefully shuts the engine and all guarded work down.
  ///
  /// The sequence is fixed:
  ///
  /// 1. Suspend engine dispatch; no new invocation begins after this point.
  /// 2. Wait on the engine's drain signal, racing `timeout` if one is given.
  ///    A deadline overrun is logged and shutdown proceeds best-effort.
  /// 3. Acquire the barrier exclusively. This waits, without a deadline, for
  ///    every guarded invocation to drop its shared pass; guarded bodies are
  ///    expected to check cancellation once per pass, which bounds how long
  ///    each pass is held.
  /// 4. Cancel the token. A body that found the token non-cancelled under a
  ///    shared pass keeps that observation valid for the rest of its
  ///    invocation, because cancellation cannot happen while its pass is
  ///    live.
  /// 5. Release the exclusive pass and enter the terminal `Stopped` state.
  ///
  /// Concurrent stop calls are not supported; the second caller gets
  /// [`StopError::InvalidState`]. `timeout: None` waits on the engine drain
  /// indefinitely.
  ///
  /// # Errors
  ///
  /// - [`StopError::InvalidState`]: the keeper is not in the `Started` state.
  pub async fn stop(&self, timeout: Option<Duration>) -> Result<(), StopError> {
    {
      let mut state = self.state.lock();
      if *state != LifecycleState::Started {
        return Err(StopError::InvalidState(*state));
      }
      *state = LifecycleState::Stopping;
    }

    info!("keeper stopping; suspending engine dispatch");
    let drained = self.scheduler.stop();
    match timeout {
      Some(limit) => match tokio::time::timeout(limit, drained).await {
        Ok(()) => info!("engine dispatch drained"),
        Err(_) => warn!(deadline = ?limit, "engine drain exceeded deadline, proceeding"),
      },
      None => {
        drained.await;
        info!("engine dispatch drained");
      }
    }

    // Cancellation must wait for the exclusive pass: a guarded body that saw
    // the token non-cancelled must not have it flip mid-invocation.
    let pass = self.barrier.acquire_exclusive().await;
    self.token.cancel();
    drop(pass);

    *self.state.lock() = LifecycleState::Stopped;
    info!("keeper shutdown complete");
    Ok(())
  }
}

impl<S> fmt::Debug for GraceKeeper<S> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("GraceKeeper")
      .field("state", &*self.state.lock())
      .field("cancelled", &self.token.is_cancelled())
      .finish()
  }
}
