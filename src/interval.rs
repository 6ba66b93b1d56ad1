//! A minimal in-process engine: fixed-interval dispatch on tokio tasks.
//!
//! [`IntervalScheduler`] implements [`Scheduler`] without any calendar
//! machinery: triggers are duration strings (`"500ms"`, `"2s"`), and each
//! registered job gets its own runner task looping on
//! [`tokio::time::interval`]. It exists so the keeper is usable out of the
//! box and so the integration tests have a real collaborator; production
//! deployments with calendar or CRON needs bring their own engine behind the
//! same trait.

use crate::error::ScheduleError;
use crate::scheduler::{BoxedJobFn, Scheduler};

use std::time::Duration;

use futures::future::BoxFuture;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace};

struct StagedJob {
  period: Duration,
  job: BoxedJobFn,
}

struct Staging {
  started: bool,
  jobs: Vec<StagedJob>,
}

/// Fixed-interval scheduling engine.
///
/// Jobs are accepted only before [`start`](Scheduler::start); the runner set
/// is immutable while running, which keeps the drain signal a plain join
/// over a fixed set of tasks. Each job's first invocation fires immediately
/// on start, then repeats at its period. An invocation that overruns its
/// period delays the next tick rather than overlapping itself.
pub struct IntervalScheduler {
  staging: Mutex<Staging>,
  runners: Mutex<Vec<JoinHandle<()>>>,
  shutdown_tx: watch::Sender<bool>,
}

impl IntervalScheduler {
  /// Creates an engine with no jobs registered.
  pub fn new() -> Self {
    let (shutdown_tx, _) = watch::channel(false);
    Self {
      staging: Mutex::new(Staging {
        started: false,
        jobs: Vec::new(),
      }),
      runners: Mutex::new(Vec::new()),
      shutdown_tx,
    }
  }
}

impl Default for IntervalScheduler {
  fn default() -> Self {
    Self::new()
  }
}

impl Scheduler for IntervalScheduler {
  /// Spawns one runner task per registered job.
  ///
  /// Must be called from within a tokio runtime; panics otherwise.
  fn start(&self) -> Result<(), ScheduleError> {
    let jobs = {
      let mut staging = self.staging.lock();
      if staging.started {
        return Err(ScheduleError::Rejected("engine already started".into()));
      }
      staging.started = true;
      std::mem::take(&mut staging.jobs)
    };

    info!(jobs = jobs.len(), "interval engine starting");
    let mut runners = self.runners.lock();
    for (idx, staged) in jobs.into_iter().enumerate() {
      let mut shutdown_rx = self.shutdown_tx.subscribe();
      let StagedJob { period, job } = staged;
      debug!(job = idx, period = ?period, "spawning interval runner");

      runners.push(Handle::current().spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
          tokio::select! {
            biased;

            _ = shutdown_rx.changed() => {
              debug!(job = idx, "interval runner received shutdown signal");
              break;
            }

            _ = ticker.tick() => {
              trace!(job = idx, "dispatching interval job");
              // Run the invocation on its own task so a panicking job body
              // kills the invocation, not the runner. The runner still
              // awaits it inline: the next tick cannot begin, and the drain
              // join cannot resolve, until the invocation returns.
              let invocation = Handle::current().spawn(job());
              if let Err(err) = invocation.await {
                if err.is_panic() {
                  error!(job = idx, "interval job invocation panicked");
                }
              }
            }
          }
        }
        debug!(job = idx, "interval runner finished");
      }));
    }
    Ok(())
  }

  /// Signals every runner to stop dispatching, then returns a future that
  /// resolves once all runners (including any in-flight invocation) have
  /// returned.
  fn stop(&self) -> BoxFuture<'static, ()> {
    info!("interval engine stopping; suspending dispatch");
    let _ = self.shutdown_tx.send(true);
    let runners = std::mem::take(&mut *self.runners.lock());
    Box::pin(async move {
      for runner in runners {
        if runner.await.is_err() {
          error!("interval runner panicked before drain completed");
        }
      }
      info!("interval engine drained");
    })
  }

  fn add_job(&self, trigger: &str, job: BoxedJobFn) -> Result<(), ScheduleError> {
    let period = parse_trigger(trigger)?;
    let mut staging = self.staging.lock();
    if staging.started {
      return Err(ScheduleError::Rejected(
        "engine already started, registration window closed".into(),
      ));
    }
    staging.jobs.push(StagedJob { period, job });
    Ok(())
  }
}

/// Parses a duration-string trigger: an unsigned integer suffixed with
/// `ms` or `s`, e.g. `"250ms"` or `"5s"`.
fn parse_trigger(expr: &str) -> Result<Duration, ScheduleError> {
  let invalid = |reason: &str| ScheduleError::InvalidTrigger {
    expr: expr.to_string(),
    reason: reason.to_string(),
  };

  let trimmed = expr.trim();
  let (digits, from_value): (&str, fn(u64) -> Duration) =
    if let Some(value) = trimmed.strip_suffix("ms") {
      (value, Duration::from_millis)
    } else if let Some(value) = trimmed.strip_suffix('s') {
      (value, Duration::from_secs)
    } else {
      return Err(invalid("expected a duration like \"500ms\" or \"5s\""));
    };

  let value: u64 = digits
    .parse()
    .map_err(|_| invalid("period is not an unsigned integer"))?;
  if value == 0 {
    return Err(invalid("period must be non-zero"));
  }
  Ok(from_value(value))
}
