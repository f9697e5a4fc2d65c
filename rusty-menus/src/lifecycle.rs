//! Run-state bookkeeping for one menu.

use std::{sync::Mutex, time::Duration};

use tokio::{task::JoinHandle, time::Instant};
use tokio_util::sync::CancellationToken;

use crate::live::lock;

/// Where a menu is in its life.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    Idle,
    Running,
    Stopped,
    TimedOut,
    Finalized,
}

/// Signals handed to one run's wait-task.
pub(crate) struct RunSignals {
    pub(crate) run: u64,
    pub(crate) stop: CancellationToken,
    pub(crate) finished: CancellationToken,
}

pub(crate) struct Lifecycle {
    run: u64,
    phase: Phase,
    task: Option<JoinHandle<()>>,
    stop: CancellationToken,
    finished: CancellationToken,
    deadline: Instant,
}

impl Lifecycle {
    pub(crate) fn new() -> Self {
        Self {
            run: 0,
            phase: Phase::Idle,
            task: None,
            stop: CancellationToken::new(),
            finished: CancellationToken::new(),
            deadline: Instant::now(),
        }
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub(crate) fn has_task(&self) -> bool {
        self.task.is_some()
    }

    /// Open a new run with a fresh stop signal.
    ///
    /// The finished latch is kept while unfired so that a caller already
    /// waiting on a replaced run is released by the new one.
    pub(crate) fn prepare(&mut self) -> RunSignals {
        self.run += 1;
        self.stop = CancellationToken::new();
        if self.finished.is_cancelled() {
            self.finished = CancellationToken::new();
        }

        RunSignals {
            run: self.run,
            stop: self.stop.clone(),
            finished: self.finished.clone(),
        }
    }

    fn is_current(&self, run: u64) -> bool {
        self.run == run
    }

    /// Install `task` as the only wait-task, aborting any previous one.
    pub(crate) fn begin(&mut self, timeout: Duration, task: JoinHandle<()>) {
        if let Some(previous) = self.task.replace(task) {
            previous.abort();
        }

        self.phase = Phase::Running;
        self.deadline = Instant::now() + timeout;
    }

    pub(crate) fn stop(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Stopped;
        }
        self.stop.cancel();
    }

    pub(crate) fn touch(&mut self, timeout: Duration) {
        if self.phase == Phase::Running {
            self.deadline = Instant::now() + timeout;
        }
    }

    /// Record how `run` ended. Returns `false` when a newer run replaced it.
    pub(crate) fn end_wait(&mut self, run: u64, timed_out: bool) -> bool {
        if !self.is_current(run) {
            return false;
        }

        if self.phase == Phase::Running {
            self.phase = if timed_out {
                Phase::TimedOut
            } else {
                Phase::Stopped
            };
        }
        true
    }

    /// Mark `run` finalized and hand back the latch to fire, unless a newer
    /// run has started since.
    pub(crate) fn finish(&mut self, run: u64) -> Option<CancellationToken> {
        if !self.is_current(run) {
            return None;
        }

        if matches!(self.phase, Phase::Stopped | Phase::TimedOut) {
            self.phase = Phase::Finalized;
        }
        self.task = None;
        Some(self.finished.clone())
    }

    pub(crate) fn finished_signal(&self) -> CancellationToken {
        self.finished.clone()
    }
}

/// Block until the stop signal fires (`false`) or the inactivity deadline
/// passes without being pushed back (`true`).
pub(crate) async fn wait_for_end(lifecycle: &Mutex<Lifecycle>, stop: &CancellationToken) -> bool {
    loop {
        let deadline = lock(lifecycle).deadline;

        tokio::select! {
            biased;
            () = stop.cancelled() => return false,
            () = tokio::time::sleep_until(deadline) => {
                let current = lock(lifecycle).deadline;
                if current <= Instant::now() {
                    return true;
                }
            }
        }
    }
}
