// Execution host for Cadence Workflows
//
// The host owns exactly one execution engine and its collaborators, fronts
// the engine's commands for callers, and answers "what is running right now"
// queries so observers can reconnect to an in-flight run. Observers attach
// and detach through `subscribe` without affecting engine state.

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tracing::info;

use crate::capability::{AlertSound, Announcer, Haptics};
use crate::workflow::{ExecutorError, RunPhase, RunUpdate, Workflow, WorkflowExecutor};

/// Hosts one workflow execution engine instance.
///
/// Engine teardown is guaranteed through `shutdown` even when `stop` was
/// never explicitly called.
pub struct ExecutionHost {
    /// The single engine instance owned by this host
    executor: Arc<WorkflowExecutor>,
    /// Workflow of the active run, kept for reconnection queries
    current_workflow: Arc<Mutex<Option<Workflow>>>,
}

impl ExecutionHost {
    /// Create a host around the given collaborators
    pub async fn new(
        announcer: Arc<dyn Announcer>,
        alert: Arc<dyn AlertSound>,
        haptics: Arc<dyn Haptics>,
    ) -> Self {
        let executor = Arc::new(WorkflowExecutor::new(announcer, alert, haptics));
        let current_workflow = Arc::new(Mutex::new(None));

        // Natural completion clears the reconnection state; an explicit
        // stop clears it in `stop` itself
        let on_complete = Arc::clone(&current_workflow);
        executor
            .set_completion_hook(move || {
                let current = Arc::clone(&on_complete);
                tokio::spawn(async move {
                    *current.lock().await = None;
                });
            })
            .await;

        Self {
            executor,
            current_workflow,
        }
    }

    /// Start a workflow run
    pub async fn start(&self, workflow: Workflow) -> Result<(), ExecutorError> {
        if self.executor.is_running().await {
            return Err(ExecutorError::AlreadyRunning);
        }

        info!("host starting workflow '{}'", workflow.name);
        *self.current_workflow.lock().await = Some(workflow.clone());

        let result = self.executor.start(workflow).await;
        if result.is_err() {
            *self.current_workflow.lock().await = None;
        }
        result
    }

    /// Freeze the current step countdown
    pub async fn pause(&self) {
        self.executor.pause().await;
    }

    /// Continue a paused countdown
    pub async fn resume(&self) {
        self.executor.resume().await;
    }

    /// Stop the active run and tear it down
    pub async fn stop(&self) {
        self.executor.stop().await;
        *self.current_workflow.lock().await = None;
    }

    /// Subscribe to the run update stream
    pub fn subscribe(&self) -> broadcast::Receiver<RunUpdate> {
        self.executor.subscribe()
    }

    /// Phase of the active run, `None` when no run is active.
    ///
    /// This explicit query replaces any process-wide "is a run active"
    /// flag; the host's own state is the single source of truth.
    pub async fn current_run(&self) -> Option<RunPhase> {
        let phase = self.executor.current_phase().await;
        if phase.is_terminal() {
            None
        } else {
            Some(phase)
        }
    }

    /// Workflow of the active run, for observers reconnecting mid-run
    pub async fn current_workflow(&self) -> Option<Workflow> {
        self.current_workflow.lock().await.clone()
    }

    /// Whether a run is currently active
    pub async fn is_running(&self) -> bool {
        self.executor.is_running().await
    }

    /// The hosted engine, for direct access
    pub fn executor(&self) -> &Arc<WorkflowExecutor> {
        &self.executor
    }

    /// Stop any active run and release collaborator resources.
    ///
    /// Safe to call whether or not a run is active.
    pub async fn shutdown(&self) {
        info!("host shutting down");
        self.stop().await;
    }
}
