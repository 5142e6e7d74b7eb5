// Workflow execution engine with pause/resume/stop for Cadence Workflows
//
// This module provides the core execution engine that sequences timed steps,
// coordinates the inter-step alert phase, and publishes an ordered stream of
// run-state snapshots while commands arrive concurrently from the host.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{broadcast, watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::capability::{AlertSound, Announcer, Haptics};

use super::state::{EndReason, RunPhase, RunSummary, RunUpdate};
use super::types::{TimedStep, Workflow};

/// Countdown resolution; every timed phase ticks at one second
const TICK: Duration = Duration::from_secs(1);

/// How long to wait for the announcer backend before degrading the run
/// to silent mode
const ANNOUNCER_READY_TIMEOUT: Duration = Duration::from_secs(3);

/// Capacity of the update broadcast channel. A run produces one update per
/// second plus a handful of transitions, so this holds minutes of backlog
/// for a slow subscriber.
const UPDATE_CHANNEL_CAPACITY: usize = 1024;

/// Errors surfaced by the engine's command surface
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// `start` was called while a run is active; the caller must stop the
    /// current run first, there is no queueing
    #[error("a workflow run is already active; stop it before starting another")]
    AlreadyRunning,
}

/// Hook invoked when a run completes naturally. Stopping a run does not
/// invoke it; stop is a distinct termination reason.
pub type CompletionHook = Box<dyn Fn() + Send + Sync>;

/// The sequencing task observed the cancellation signal
struct Interrupted;

/// Control handles for the live sequencing task.
///
/// Commands only touch these lightweight signals; run state is mutated
/// exclusively by the sequencing task at its own checkpoints.
struct ActiveRun {
    /// Pause flag; `true` freezes the step countdown
    pause: Arc<watch::Sender<bool>>,
    /// Stop signal observed at every suspension point
    cancel: CancellationToken,
    /// The sequencing task itself
    task: JoinHandle<()>,
}

/// Execution engine for running one workflow at a time.
///
/// The engine owns its collaborators for the lifetime of each run and
/// serializes every call into them. Cloning is cheap and shares the same
/// engine state, mirroring how the host and the sequencing task both hold
/// handles to it.
pub struct WorkflowExecutor {
    /// Spoken announcement collaborator
    announcer: Arc<dyn Announcer>,
    /// Alert sound collaborator
    alert: Arc<dyn AlertSound>,
    /// Haptic output collaborator
    haptics: Arc<dyn Haptics>,
    /// Broadcast side of the snapshot stream
    update_sender: broadcast::Sender<RunUpdate>,
    /// Latest published phase, for point-in-time queries
    current_phase: Arc<RwLock<RunPhase>>,
    /// Control handles for the active run, if any
    active: Arc<Mutex<Option<ActiveRun>>>,
    /// Hook invoked on natural completion
    on_complete: Arc<Mutex<Option<CompletionHook>>>,
}

impl WorkflowExecutor {
    /// Create a new executor around the given collaborators
    pub fn new(
        announcer: Arc<dyn Announcer>,
        alert: Arc<dyn AlertSound>,
        haptics: Arc<dyn Haptics>,
    ) -> Self {
        let (update_sender, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);

        Self {
            announcer,
            alert,
            haptics,
            update_sender,
            current_phase: Arc::new(RwLock::new(RunPhase::Idle)),
            active: Arc::new(Mutex::new(None)),
            on_complete: Arc::new(Mutex::new(None)),
        }
    }

    /// Register the hook invoked when a run completes naturally
    pub async fn set_completion_hook(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.on_complete.lock().await = Some(Box::new(hook));
    }

    /// Subscribe to the ordered update stream.
    ///
    /// Every phase transition and every per-second tick is exactly one
    /// snapshot, delivered in the order it occurred. Subscribers attach and
    /// detach freely without affecting the run.
    pub fn subscribe(&self) -> broadcast::Receiver<RunUpdate> {
        self.update_sender.subscribe()
    }

    /// Latest published run phase
    pub async fn current_phase(&self) -> RunPhase {
        self.current_phase.read().await.clone()
    }

    /// Whether a sequencing task is currently alive
    pub async fn is_running(&self) -> bool {
        self.active
            .lock()
            .await
            .as_ref()
            .is_some_and(|run| !run.task.is_finished())
    }

    /// Start executing a workflow.
    ///
    /// A workflow with zero steps transitions directly to `Completed` and
    /// invokes the completion hook; there is no countdown, announcement,
    /// alert, or rest. Starting while a run is active is a usage error.
    pub async fn start(&self, workflow: Workflow) -> Result<(), ExecutorError> {
        let mut active = self.active.lock().await;
        if let Some(run) = active.as_ref() {
            if !run.task.is_finished() {
                return Err(ExecutorError::AlreadyRunning);
            }
        }

        let run_id = Uuid::new_v4();
        let started_at = Utc::now();

        if workflow.steps.is_empty() {
            info!("workflow '{}' has no steps, completing immediately", workflow.name);
            *active = None;
            drop(active);

            self.publish_phase(RunPhase::Completed).await;
            let summary = Self::summarize(run_id, &workflow, 0, started_at);
            let _ = self.update_sender.send(RunUpdate::Ended {
                reason: EndReason::Completed,
                summary,
            });
            self.invoke_completion_hook().await;
            return Ok(());
        }

        info!(
            "starting workflow '{}' with {} steps",
            workflow.name,
            workflow.steps.len()
        );

        let (pause, _) = watch::channel(false);
        let pause = Arc::new(pause);
        let cancel = CancellationToken::new();

        let runner = self.clone();
        let task_pause = Arc::clone(&pause);
        let task_cancel = cancel.clone();
        let task = tokio::spawn(async move {
            runner
                .run(workflow, run_id, started_at, task_pause, task_cancel)
                .await;
        });

        *active = Some(ActiveRun {
            pause,
            cancel,
            task,
        });

        Ok(())
    }

    /// Freeze the current step countdown.
    ///
    /// Only effective while a step is `Running`; calling it while `Paused`,
    /// `Resting`, `Idle`, or `Completed` is a no-op, not an error. Rest
    /// phases are uninterruptible.
    pub async fn pause(&self) {
        let active = self.active.lock().await;
        let Some(run) = active.as_ref() else {
            return;
        };
        if run.task.is_finished() {
            return;
        }

        if !matches!(*self.current_phase.read().await, RunPhase::Running { .. }) {
            debug!("pause ignored: no step countdown active");
            return;
        }

        run.pause.send_replace(true);
        debug!("pause requested");
    }

    /// Continue a paused countdown from its frozen remaining seconds.
    ///
    /// No-op while not paused.
    pub async fn resume(&self) {
        let active = self.active.lock().await;
        let Some(run) = active.as_ref() else {
            return;
        };
        if run.task.is_finished() {
            return;
        }

        if run.pause.send_replace(false) {
            debug!("resume requested");
        }
    }

    /// Cancel the run and tear it down.
    ///
    /// Unblocks every suspension point, silences the announcer, stops the
    /// alert sound and haptics, releases collaborators, and resets the
    /// phase to `Idle`. No snapshot follows; the stream ends with
    /// `Ended { reason: Stopped }`. The sequencing task is no longer alive
    /// when this returns, and a subsequent `start` is accepted.
    pub async fn stop(&self) {
        let run = self.active.lock().await.take();
        let Some(run) = run else {
            debug!("stop ignored: no active run");
            return;
        };

        run.cancel.cancel();
        if let Err(e) = run.task.await {
            warn!("sequencing task ended abnormally: {}", e);
        }
    }

    /// Publish a snapshot and record it as the current phase
    async fn publish_phase(&self, phase: RunPhase) {
        *self.current_phase.write().await = phase.clone();
        // Send errors only mean no subscriber is currently attached
        let _ = self.update_sender.send(RunUpdate::Snapshot(phase));
    }

    async fn invoke_completion_hook(&self) {
        if let Some(hook) = self.on_complete.lock().await.as_ref() {
            hook();
        }
    }

    fn summarize(
        run_id: Uuid,
        workflow: &Workflow,
        steps_completed: usize,
        started_at: DateTime<Utc>,
    ) -> RunSummary {
        let ended_at = Utc::now();
        RunSummary {
            run_id,
            workflow_name: workflow.name.clone(),
            steps_completed,
            total_steps: workflow.steps.len(),
            started_at,
            ended_at,
            duration: ended_at - started_at,
        }
    }

    /// Body of the sequencing task: run the step sequence, then finish on
    /// whichever exit path was taken
    async fn run(
        self,
        workflow: Workflow,
        run_id: Uuid,
        started_at: DateTime<Utc>,
        pause: Arc<watch::Sender<bool>>,
        cancel: CancellationToken,
    ) {
        let mut steps_completed = 0usize;
        let result = self
            .sequence(&workflow, &pause, &cancel, &mut steps_completed)
            .await;

        match result {
            Ok(()) => {
                self.publish_phase(RunPhase::Completed).await;
                self.alert.release();

                info!("workflow '{}' completed", workflow.name);
                let summary = Self::summarize(run_id, &workflow, steps_completed, started_at);
                let _ = self.update_sender.send(RunUpdate::Ended {
                    reason: EndReason::Completed,
                    summary,
                });
                self.invoke_completion_hook().await;
            }
            Err(Interrupted) => {
                // The speech channel, audio channel, and vibration motor are
                // persistent resources; they are silenced actively, not left
                // to finish on their own
                self.announcer.silence();
                self.alert.stop();
                self.haptics.stop();
                self.alert.release();

                *self.current_phase.write().await = RunPhase::Idle;

                info!(
                    "workflow '{}' stopped after {} of {} steps",
                    workflow.name,
                    steps_completed,
                    workflow.steps.len()
                );
                let summary = Self::summarize(run_id, &workflow, steps_completed, started_at);
                let _ = self.update_sender.send(RunUpdate::Ended {
                    reason: EndReason::Stopped,
                    summary,
                });
            }
        }
    }

    /// Execute every step in order: announce, count down, rest, advance
    async fn sequence(
        &self,
        workflow: &Workflow,
        pause: &watch::Sender<bool>,
        cancel: &CancellationToken,
        steps_completed: &mut usize,
    ) -> Result<(), Interrupted> {
        let mut pause_rx = pause.subscribe();

        // A backend that never becomes ready degrades the whole run to
        // silent mode; the countdown proceeds regardless
        let announce = if workflow.announce_enabled {
            let ready = self
                .guarded(cancel, self.announcer.await_ready(ANNOUNCER_READY_TIMEOUT))
                .await?;
            if !ready {
                warn!(
                    "announcer not ready within {:?}, skipping announcements",
                    ANNOUNCER_READY_TIMEOUT
                );
            }
            ready
        } else {
            false
        };

        self.announce_if(announce, cancel, &format!("Starting {}", workflow.name))
            .await?;

        let step_count = workflow.steps.len();
        for (step_index, step) in workflow.steps.iter().enumerate() {
            let next_step = workflow.steps.get(step_index + 1).cloned();

            // Hard ordering contract: the countdown never starts before the
            // step announcement has finished, so no countdown time is
            // silently consumed by speech
            self.announce_if(announce, cancel, &format!("Starting {}", step.label))
                .await?;

            self.countdown_step(step, next_step, step_index, step_count, &mut pause_rx, cancel)
                .await?;

            self.rest_phase(workflow, step, step_index, step_count, announce, pause, cancel)
                .await?;

            *steps_completed += 1;
        }

        self.announce_if(announce, cancel, &format!("{} completed", workflow.name))
            .await?;

        Ok(())
    }

    /// One-second countdown for a single step, honoring pause and stop
    async fn countdown_step(
        &self,
        step: &TimedStep,
        next_step: Option<TimedStep>,
        step_index: usize,
        step_count: usize,
        pause_rx: &mut watch::Receiver<bool>,
        cancel: &CancellationToken,
    ) -> Result<(), Interrupted> {
        let total = step.duration_seconds;
        let mut remaining = total;

        while remaining > 0 {
            if *pause_rx.borrow() {
                self.publish_phase(RunPhase::Paused {
                    step: step.clone(),
                    step_index,
                    step_count,
                    remaining_seconds: remaining,
                    total_seconds: total,
                })
                .await;

                // Woken exactly on resume or stop, no polling
                tokio::select! {
                    _ = cancel.cancelled() => return Err(Interrupted),
                    changed = pause_rx.wait_for(|paused| !paused) => {
                        if changed.is_err() {
                            return Err(Interrupted);
                        }
                    }
                }
                continue;
            }

            self.publish_phase(RunPhase::Running {
                step: step.clone(),
                next_step: next_step.clone(),
                step_index,
                step_count,
                remaining_seconds: remaining,
                total_seconds: total,
            })
            .await;

            tokio::select! {
                _ = cancel.cancelled() => return Err(Interrupted),
                changed = pause_rx.wait_for(|paused| *paused) => {
                    if changed.is_err() {
                        return Err(Interrupted);
                    }
                    // Paused mid-second: the in-flight second is not
                    // consumed; the countdown restarts it on resume from
                    // the frozen remaining value
                    continue;
                }
                _ = sleep(TICK) => {
                    remaining -= 1;
                }
            }
        }

        Ok(())
    }

    /// Inter-step rest: completion announcement, alert sound, haptics, and
    /// a rest countdown. Uninterruptible by pause.
    async fn rest_phase(
        &self,
        workflow: &Workflow,
        step: &TimedStep,
        step_index: usize,
        step_count: usize,
        announce: bool,
        pause: &watch::Sender<bool>,
        cancel: &CancellationToken,
    ) -> Result<(), Interrupted> {
        // A pause request that landed in the final instants of the countdown
        // must not leak into the next step
        pause.send_replace(false);

        self.announce_if(announce, cancel, &format!("{} completed", step.label))
            .await?;

        if cancel.is_cancelled() {
            return Err(Interrupted);
        }

        let total = workflow.alert_duration_seconds;
        self.alert.play();
        if workflow.haptic_enabled {
            self.haptics.pulse(Duration::from_secs(u64::from(total)));
        }

        for remaining in (1..=total).rev() {
            self.publish_phase(RunPhase::Resting {
                completed_step: step.clone(),
                step_index,
                step_count,
                remaining_seconds: remaining,
                total_seconds: total,
            })
            .await;

            self.guarded(cancel, sleep(TICK)).await?;
        }

        self.alert.stop();
        if workflow.haptic_enabled {
            self.haptics.stop();
        }

        Ok(())
    }

    /// Announce `text` if announcements are active, observing stop before
    /// and during the call
    async fn announce_if(
        &self,
        enabled: bool,
        cancel: &CancellationToken,
        text: &str,
    ) -> Result<(), Interrupted> {
        if cancel.is_cancelled() {
            return Err(Interrupted);
        }
        if !enabled {
            return Ok(());
        }

        debug!("announcing: {}", text);
        self.guarded(cancel, self.announcer.announce(text)).await
    }

    /// Race a suspension point against the stop signal
    async fn guarded<T>(
        &self,
        cancel: &CancellationToken,
        fut: impl Future<Output = T>,
    ) -> Result<T, Interrupted> {
        if cancel.is_cancelled() {
            return Err(Interrupted);
        }
        tokio::select! {
            _ = cancel.cancelled() => Err(Interrupted),
            value = fut => Ok(value),
        }
    }
}

impl Clone for WorkflowExecutor {
    fn clone(&self) -> Self {
        Self {
            announcer: Arc::clone(&self.announcer),
            alert: Arc::clone(&self.alert),
            haptics: Arc::clone(&self.haptics),
            update_sender: self.update_sender.clone(),
            current_phase: Arc::clone(&self.current_phase),
            active: Arc::clone(&self.active),
            on_complete: Arc::clone(&self.on_complete),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;

    use crate::capability::{NullAlert, NullAnnouncer, NullHaptics};

    use super::*;

    #[derive(Default)]
    struct RecordingAnnouncer {
        lines: StdMutex<Vec<String>>,
        silenced: AtomicBool,
    }

    #[async_trait]
    impl Announcer for RecordingAnnouncer {
        async fn await_ready(&self, _timeout: Duration) -> bool {
            true
        }

        async fn announce(&self, text: &str) {
            self.lines.lock().unwrap().push(text.to_string());
        }

        fn silence(&self) {
            self.silenced.store(true, Ordering::SeqCst);
        }
    }

    /// Announcer whose backend never initializes
    #[derive(Default)]
    struct UnreadyAnnouncer {
        announcements: AtomicUsize,
    }

    #[async_trait]
    impl Announcer for UnreadyAnnouncer {
        async fn await_ready(&self, timeout: Duration) -> bool {
            sleep(timeout).await;
            false
        }

        async fn announce(&self, _text: &str) {
            self.announcements.fetch_add(1, Ordering::SeqCst);
        }

        fn silence(&self) {}
    }

    #[derive(Default)]
    struct RecordingAlert {
        plays: AtomicUsize,
        stops: AtomicUsize,
        releases: AtomicUsize,
    }

    impl AlertSound for RecordingAlert {
        fn play(&self) {
            self.plays.fetch_add(1, Ordering::SeqCst);
        }

        fn stop(&self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }

        fn release(&self) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Default)]
    struct RecordingHaptics {
        pulses: StdMutex<Vec<Duration>>,
        stops: AtomicUsize,
    }

    impl Haptics for RecordingHaptics {
        fn pulse(&self, duration: Duration) {
            self.pulses.lock().unwrap().push(duration);
        }

        fn stop(&self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn null_executor() -> WorkflowExecutor {
        WorkflowExecutor::new(
            Arc::new(NullAnnouncer),
            Arc::new(NullAlert),
            Arc::new(NullHaptics),
        )
    }

    async fn wait_for_end(receiver: &mut broadcast::Receiver<RunUpdate>) -> (EndReason, RunSummary) {
        loop {
            match receiver.recv().await.expect("update stream closed early") {
                RunUpdate::Ended { reason, summary } => return (reason, summary),
                RunUpdate::Snapshot(_) => {}
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_announcements_follow_run_order() {
        let announcer = Arc::new(RecordingAnnouncer::default());
        let executor = WorkflowExecutor::new(
            Arc::clone(&announcer) as Arc<dyn Announcer>,
            Arc::new(NullAlert),
            Arc::new(NullHaptics),
        );
        let mut updates = executor.subscribe();

        let mut workflow = Workflow::new("Workout", vec![TimedStep::new("Plank", 1)]);
        workflow.alert_duration_seconds = 1;
        workflow.haptic_enabled = false;
        executor.start(workflow).await.unwrap();

        wait_for_end(&mut updates).await;

        let lines = announcer.lines.lock().unwrap().clone();
        assert_eq!(
            lines,
            vec![
                "Starting Workout",
                "Starting Plank",
                "Plank completed",
                "Workout completed",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_unready_announcer_degrades_silently() {
        let announcer = Arc::new(UnreadyAnnouncer::default());
        let executor = WorkflowExecutor::new(
            Arc::clone(&announcer) as Arc<dyn Announcer>,
            Arc::new(NullAlert),
            Arc::new(NullHaptics),
        );
        let mut updates = executor.subscribe();

        let mut workflow = Workflow::new("Silent", vec![TimedStep::new("Breathe", 2)]);
        workflow.alert_duration_seconds = 1;
        executor.start(workflow).await.unwrap();

        let (reason, summary) = wait_for_end(&mut updates).await;
        assert_eq!(reason, EndReason::Completed);
        assert_eq!(summary.steps_completed, 1);
        assert_eq!(announcer.announcements.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_alert_and_haptics_bracket_each_rest_phase() {
        let alert = Arc::new(RecordingAlert::default());
        let haptics = Arc::new(RecordingHaptics::default());
        let executor = WorkflowExecutor::new(
            Arc::new(NullAnnouncer),
            Arc::clone(&alert) as Arc<dyn AlertSound>,
            Arc::clone(&haptics) as Arc<dyn Haptics>,
        );
        let mut updates = executor.subscribe();

        let mut workflow = Workflow::new(
            "Two Steps",
            vec![TimedStep::new("One", 1), TimedStep::new("Two", 1)],
        );
        workflow.alert_duration_seconds = 2;
        workflow.announce_enabled = false;
        executor.start(workflow).await.unwrap();

        wait_for_end(&mut updates).await;

        assert_eq!(alert.plays.load(Ordering::SeqCst), 2);
        assert_eq!(alert.stops.load(Ordering::SeqCst), 2);
        assert_eq!(alert.releases.load(Ordering::SeqCst), 1);
        assert_eq!(
            haptics.pulses.lock().unwrap().clone(),
            vec![Duration::from_secs(2), Duration::from_secs(2)]
        );
        assert_eq!(haptics.stops.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_while_running_is_rejected() {
        let executor = null_executor();
        let workflow = Workflow::new("Long", vec![TimedStep::new("Wait", 600)]);

        executor.start(workflow.clone()).await.unwrap();
        let second = executor.start(workflow).await;
        assert!(matches!(second, Err(ExecutorError::AlreadyRunning)));

        executor.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_workflow_invokes_completion_hook() {
        let executor = null_executor();
        let invoked = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&invoked);
        executor
            .set_completion_hook(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .await;
        let mut updates = executor.subscribe();

        executor
            .start(Workflow::new("Empty", Vec::new()))
            .await
            .unwrap();

        let first = updates.recv().await.unwrap();
        assert_eq!(first, RunUpdate::Snapshot(RunPhase::Completed));
        let (reason, summary) = wait_for_end(&mut updates).await;
        assert_eq!(reason, EndReason::Completed);
        assert_eq!(summary.total_steps, 0);
        assert_eq!(invoked.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_skips_completion_hook_and_silences_collaborators() {
        let announcer = Arc::new(RecordingAnnouncer::default());
        let alert = Arc::new(RecordingAlert::default());
        let haptics = Arc::new(RecordingHaptics::default());
        let executor = WorkflowExecutor::new(
            Arc::clone(&announcer) as Arc<dyn Announcer>,
            Arc::clone(&alert) as Arc<dyn AlertSound>,
            Arc::clone(&haptics) as Arc<dyn Haptics>,
        );
        let invoked = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&invoked);
        executor
            .set_completion_hook(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .await;
        let mut updates = executor.subscribe();

        let mut workflow = Workflow::new("Interrupted", vec![TimedStep::new("Hold", 1)]);
        workflow.alert_duration_seconds = 600;
        executor.start(workflow).await.unwrap();

        // Let the run reach the rest phase, where the alert is playing
        loop {
            if let RunUpdate::Snapshot(RunPhase::Resting { .. }) = updates.recv().await.unwrap() {
                break;
            }
        }

        executor.stop().await;

        let (reason, _) = wait_for_end(&mut updates).await;
        assert_eq!(reason, EndReason::Stopped);
        assert_eq!(invoked.load(Ordering::SeqCst), 0);
        assert!(announcer.silenced.load(Ordering::SeqCst));
        assert!(alert.stops.load(Ordering::SeqCst) >= 1);
        assert_eq!(alert.releases.load(Ordering::SeqCst), 1);
        assert!(haptics.stops.load(Ordering::SeqCst) >= 1);
        assert_eq!(executor.current_phase().await, RunPhase::Idle);
        assert!(!executor.is_running().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_duration_step_rests_immediately() {
        let executor = null_executor();
        let mut updates = executor.subscribe();

        let mut workflow = Workflow::new("Instant", vec![TimedStep::new("Blink", 0)]);
        workflow.alert_duration_seconds = 1;
        workflow.announce_enabled = false;
        workflow.haptic_enabled = false;
        executor.start(workflow).await.unwrap();

        let first = updates.recv().await.unwrap();
        match first {
            RunUpdate::Snapshot(RunPhase::Resting {
                remaining_seconds, ..
            }) => assert_eq!(remaining_seconds, 1),
            other => panic!("expected an immediate rest snapshot, got {:?}", other),
        }

        let (reason, _) = wait_for_end(&mut updates).await;
        assert_eq!(reason, EndReason::Completed);
    }
}
