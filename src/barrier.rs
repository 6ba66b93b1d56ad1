//! Drain coordination for graceful shutdown.
//!
//! [`QuiesceBarrier`] is a read/write exclusion primitive used purely as a
//! drain gate, never to protect data. Every running protected task invocation
//! holds a [`SharedPass`]; shutdown acquires the barrier exclusively, which
//! waits for all shared passes to drop and blocks new ones from being issued
//! until the [`ExclusivePass`] is released.
//!
//! Fairness: the underlying `tokio::sync::RwLock` is write-preferring. Once an
//! exclusive acquisition is pending, new shared acquisitions queue behind it,
//! so a continuous stream of task invocations cannot starve shutdown.
//!
//! The barrier imposes no timeout of its own; callers bound their waits
//! externally (e.g. `tokio::time::timeout`) where needed.

use std::sync::Arc;

use tokio::sync::{OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};

/// The drain barrier owned by the lifecycle controller.
///
/// Task bodies never see this type. They receive a [`SharedGate`] (via
/// [`QuiesceBarrier::shared_gate`]), which can only take shared passes, so no
/// task body can accidentally drain the barrier out from under the others.
#[derive(Debug)]
pub struct QuiesceBarrier {
  lock: Arc<RwLock<()>>,
}

impl QuiesceBarrier {
  /// Creates a new, unheld barrier.
  pub fn new() -> Self {
    Self {
      lock: Arc::new(RwLock::new(())),
    }
  }

  /// Returns the shared-acquisition capability for this barrier.
  ///
  /// Gates are cheap to clone and hand into job closures; every gate refers
  /// to the same underlying barrier.
  pub fn shared_gate(&self) -> SharedGate {
    SharedGate {
      lock: self.lock.clone(),
    }
  }

  /// Acquires the barrier exclusively.
  ///
  /// Resolves once every outstanding [`SharedPass`] has been dropped. While
  /// this call is pending (and while the returned pass is live), new
  /// [`SharedGate::acquire`] calls wait.
  pub async fn acquire_exclusive(&self) -> ExclusivePass {
    ExclusivePass {
      _guard: self.lock.clone().write_owned().await,
    }
  }
}

impl Default for QuiesceBarrier {
  fn default() -> Self {
    Self::new()
  }
}

/// Shared-acquisition capability over a [`QuiesceBarrier`].
///
/// Protected job bodies should take one pass per bounded unit of work:
/// acquire, check cancellation, do the unit, drop the pass. Holding a single
/// pass across a long multi-unit job delays shutdown for its full duration,
/// since the exclusive acquisition must wait for every live pass.
#[derive(Debug, Clone)]
pub struct SharedGate {
  lock: Arc<RwLock<()>>,
}

impl SharedGate {
  /// Takes a shared pass.
  ///
  /// Never waits on other shared holders; waits only while an exclusive
  /// acquisition is pending or held.
  pub async fn acquire(&self) -> SharedPass {
    SharedPass {
      _guard: self.lock.clone().read_owned().await,
    }
  }
}

/// RAII pass representing one running protected invocation.
///
/// Dropping the pass releases the shared acquisition. The pass is `'static`
/// and may be held across await points inside a spawned task.
#[derive(Debug)]
pub struct SharedPass {
  _guard: OwnedRwLockReadGuard<()>,
}

/// RAII pass representing sole ownership of the barrier during drain.
///
/// While this pass is live, no shared pass exists and none can be issued.
#[derive(Debug)]
pub struct ExclusivePass {
  _guard: OwnedRwLockWriteGuard<()>,
}
