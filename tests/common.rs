//! tests/common.rs
//! Shared helper functions and engine doubles for integration tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;
use std::{future::Future, pin::Pin};

use futures::future::BoxFuture;
use tokio::sync::watch;
use tracing_subscriber::fmt::TestWriter;

use gracekeeper::{BoxedJobFn, ScheduleError, Scheduler};

// Initializes tracing subscriber for test output.
pub fn setup_tracing() {
  // Use try_init to avoid panic if called multiple times
  let _ = tracing_subscriber::fmt()
    .with_max_level(tracing::Level::DEBUG)
    .with_writer(TestWriter::new())
    .with_test_writer()
    .try_init();
}

/// Engine double whose drain signal is released by the test.
///
/// `start`/`stop` record that they were called; the future returned by
/// `stop` resolves only after [`ManualScheduler::release_drain`]. Lets
/// lifecycle tests hold the keeper at the drain step deliberately.
pub struct ManualScheduler {
  pub started: Arc<AtomicBool>,
  pub stop_requested: Arc<AtomicBool>,
  drain_tx: watch::Sender<bool>,
  // Hold a receiver so the channel is never without one; otherwise a
  // `release_drain()` that lands before `stop()` subscribes is dropped
  // (watch `send` fails with no receivers) and the stored value stays false.
  _drain_rx: watch::Receiver<bool>,
}

impl ManualScheduler {
  pub fn new() -> Self {
    let (drain_tx, _drain_rx) = watch::channel(false);
    Self {
      started: Arc::new(AtomicBool::new(false)),
      stop_requested: Arc::new(AtomicBool::new(false)),
      drain_tx,
      _drain_rx,
    }
  }

  /// Lets the drain signal returned by `stop` resolve.
  pub fn release_drain(&self) {
    let _ = self.drain_tx.send(true);
  }
}

impl Scheduler for ManualScheduler {
  fn start(&self) -> Result<(), ScheduleError> {
    self.started.store(true, Ordering::SeqCst);
    Ok(())
  }

  fn stop(&self) -> BoxFuture<'static, ()> {
    self.stop_requested.store(true, Ordering::SeqCst);
    let mut drain_rx = self.drain_tx.subscribe();
    Box::pin(async move {
      while !*drain_rx.borrow() {
        if drain_rx.changed().await.is_err() {
          break;
        }
      }
    })
  }

  fn add_job(&self, _trigger: &str, _job: BoxedJobFn) -> Result<(), ScheduleError> {
    Ok(())
  }
}

/// Engine double that refuses to start.
pub struct FailingScheduler;

impl Scheduler for FailingScheduler {
  fn start(&self) -> Result<(), ScheduleError> {
    Err(ScheduleError::Engine("refused to start".into()))
  }

  fn stop(&self) -> BoxFuture<'static, ()> {
    Box::pin(async {})
  }

  fn add_job(&self, _trigger: &str, _job: BoxedJobFn) -> Result<(), ScheduleError> {
    Ok(())
  }
}

// Creates a job function that increments a counter on every invocation.
pub fn job_counter(counter: Arc<AtomicUsize>) -> BoxedJobFn {
  Box::new(move || {
    let ctr = counter.clone();
    let future = async move {
      let count = ctr.fetch_add(1, Ordering::SeqCst) + 1;
      tracing::debug!("counter job executing (count: {})", count);
    };
    Box::pin(future) as Pin<Box<dyn Future<Output = ()> + Send + 'static>>
  })
}

// Creates a job function that sleeps, then sets a flag.
pub fn job_flag_after(flag: Arc<AtomicBool>, delay: StdDuration) -> BoxedJobFn {
  Box::new(move || {
    let flg = flag.clone();
    let future = async move {
      tracing::debug!("flag job executing");
      if delay > StdDuration::ZERO {
        tokio::time::sleep(delay).await;
      }
      flg.store(true, Ordering::SeqCst);
    };
    Box::pin(future) as Pin<Box<dyn Future<Output = ()> + Send + 'static>>
  })
}
