//! Control loop manager implementation
//!
//! ControlLoopManager owns the Running/Stopped lifecycle of the background
//! polling task. Every start generation gets its own cancellation token; a
//! token that has been cancelled is never reused.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::controller::ConfigState;
use crate::cycle::{CycleReport, PollCycle};
use crate::domain::{LoopOutcome, LoopStatus};
use crate::error::{Result, WateringError};

/// What `start()` does when a loop is already running
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartPolicy {
    /// At most one loop per manager; a second start is a no-op
    #[default]
    Guarded,
    /// Spawn another loop sharing the running loop's cancellation token
    Stack,
}

/// Result of a `start()` request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new loop generation was spawned
    Started,
    /// A loop was already running and the policy is `Guarded`
    AlreadyRunning,
    /// An additional loop joined the running generation
    Stacked,
}

/// The running generation: one token, one or more tasks observing it
struct LoopHandle {
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<LoopOutcome>>,
}

impl LoopHandle {
    fn live_tasks(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_finished()).count()
    }

    fn is_live(&self) -> bool {
        !self.cancel.is_cancelled() && self.live_tasks() > 0
    }
}

#[derive(Default)]
struct ManagerState {
    active: Option<LoopHandle>,
    /// Tasks whose token has been cancelled but which may not have exited yet
    retired: Vec<JoinHandle<LoopOutcome>>,
}

impl ManagerState {
    fn prune(&mut self) {
        self.retired.retain(|t| !t.is_finished());
    }

    fn retire_active(&mut self) -> bool {
        match self.active.take() {
            Some(handle) => {
                handle.cancel.cancel();
                self.retired.extend(handle.tasks);
                true
            }
            None => false,
        }
    }
}

/// Counters and last report shared with the spawned loops
#[derive(Default)]
struct LoopStats {
    cycles: AtomicU64,
    failures: AtomicU64,
    last_report: Mutex<Option<CycleReport>>,
}

impl LoopStats {
    fn record(&self, report: CycleReport) {
        self.cycles.fetch_add(1, Ordering::SeqCst);
        *self.last_report.lock().unwrap_or_else(PoisonError::into_inner) = Some(report);
    }
}

/// Manages the background polling loop for one controller
pub struct ControlLoopManager {
    config: ConfigState,
    cycle: PollCycle,
    policy: StartPolicy,
    state: Mutex<ManagerState>,
    stats: Arc<LoopStats>,
}

impl ControlLoopManager {
    /// Create a stopped manager
    pub fn new(config: ConfigState, cycle: PollCycle, policy: StartPolicy) -> Self {
        Self {
            config,
            cycle,
            policy,
            state: Mutex::new(ManagerState::default()),
            stats: Arc::new(LoopStats::default()),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, ManagerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start the polling loop (spawns a tokio task)
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> Result<StartOutcome> {
        let runtime = current_runtime()?;

        let mut state = self.lock_state();
        state.prune();

        if let Some(handle) = state.active.as_mut() {
            if handle.is_live() {
                return match self.policy {
                    StartPolicy::Guarded => {
                        debug!("Start requested while already running; ignoring");
                        Ok(StartOutcome::AlreadyRunning)
                    }
                    StartPolicy::Stack => {
                        let task = self.spawn_loop(&runtime, handle.cancel.clone());
                        handle.tasks.push(task);
                        warn!(
                            "Stacked control loop started; {} loops now share one cancellation token",
                            handle.live_tasks()
                        );
                        Ok(StartOutcome::Stacked)
                    }
                };
            }
        }

        // Whatever is left in `active` ended on its own (cycle failure)
        state.retire_active();

        let cancel = CancellationToken::new();
        let task = self.spawn_loop(&runtime, cancel.clone());
        state.active = Some(LoopHandle {
            cancel,
            tasks: vec![task],
        });
        info!("Control loop started (settle {:?})", self.cycle.settle());
        Ok(StartOutcome::Started)
    }

    fn spawn_loop(&self, runtime: &Handle, cancel: CancellationToken) -> JoinHandle<LoopOutcome> {
        runtime.spawn(run_loop(
            self.config.clone(),
            self.cycle.clone(),
            cancel,
            self.stats.clone(),
        ))
    }

    /// Request the loop to stop. Never fails and does not wait.
    pub fn stop(&self) {
        let mut state = self.lock_state();
        if state.retire_active() {
            info!("Control loop stop requested");
        } else {
            debug!("Stop requested while not running");
        }
        state.prune();
    }

    /// Stop and wait (bounded) for every spawned loop to exit.
    ///
    /// Returns `false` if the timeout elapsed first; the loops stay cancelled.
    pub async fn stop_and_wait(&self, timeout: Duration) -> bool {
        let pending = {
            let mut state = self.lock_state();
            state.retire_active();
            std::mem::take(&mut state.retired)
        };

        if pending.is_empty() {
            return true;
        }

        match tokio::time::timeout(timeout, futures::future::join_all(pending)).await {
            Ok(results) => {
                for result in results {
                    match result {
                        Ok(outcome) if outcome.is_failure() => debug!("Joined failed control loop: {:?}", outcome),
                        Ok(_) => {}
                        Err(e) => warn!("Control loop task did not exit cleanly: {}", e),
                    }
                }
                true
            }
            Err(_) => {
                warn!("Control loop did not exit within {:?}", timeout);
                false
            }
        }
    }

    /// Derived lifecycle status
    pub fn status(&self) -> LoopStatus {
        let state = self.lock_state();
        match state.active.as_ref() {
            Some(handle) if handle.is_live() => LoopStatus::Running,
            _ => LoopStatus::Stopped,
        }
    }

    /// Number of live tasks in the running generation
    pub fn running_tasks(&self) -> usize {
        let state = self.lock_state();
        state
            .active
            .as_ref()
            .filter(|h| !h.cancel.is_cancelled())
            .map_or(0, LoopHandle::live_tasks)
    }

    /// Poll cycles completed over the manager's lifetime
    pub fn cycles_completed(&self) -> u64 {
        self.stats.cycles.load(Ordering::SeqCst)
    }

    /// Loop tasks that ended because a poll cycle failed
    pub fn failed_loops(&self) -> u64 {
        self.stats.failures.load(Ordering::SeqCst)
    }

    /// Most recent completed cycle
    pub fn last_report(&self) -> Option<CycleReport> {
        self.stats
            .last_report
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Runtime handle a loop would be spawned on
pub(crate) fn current_runtime() -> Result<Handle> {
    Handle::try_current().map_err(|e| WateringError::InvalidState(format!("cannot start control loop: {}", e)))
}

impl Drop for ControlLoopManager {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        if state.retire_active() {
            warn!("Control loop manager dropped while running; loop cancelled");
        }
    }
}

/// A spawned loop task; counts failed endings.
async fn run_loop(
    config: ConfigState,
    cycle: PollCycle,
    cancel: CancellationToken,
    stats: Arc<LoopStats>,
) -> LoopOutcome {
    let outcome = drive_loop(config, cycle, cancel, &stats).await;
    if outcome.is_failure() {
        stats.failures.fetch_add(1, Ordering::SeqCst);
    }
    outcome
}

/// Cycle, yield, repeat until cancelled.
async fn drive_loop(
    config: ConfigState,
    cycle: PollCycle,
    cancel: CancellationToken,
    stats: &LoopStats,
) -> LoopOutcome {
    while !cancel.is_cancelled() {
        let snapshot = config.current();

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = cycle.run(&snapshot) => match result {
                Ok(report) => stats.record(report),
                Err(e) => {
                    error!("Control loop terminated: {}", e);
                    return LoopOutcome::Failed(e.to_string());
                }
            },
        }

        tokio::task::yield_now().await;
    }

    info!("Control loop stopped");
    LoopOutcome::Cancelled
}
