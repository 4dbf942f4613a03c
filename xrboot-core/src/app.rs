use crate::error::LifecycleError;
use crate::report::{Report, ReportSink, TracingSink};
use crate::runtime::XrRuntime;
use crate::session::InitializationResult;
use std::fmt;
use std::sync::Arc;

/// Where an [`Application`] is in its two-phase startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Created,
    Initializing,
    Ready,
    Running,
    Failed,
}

impl LifecycleState {
    /// `Running` and `Failed` are never left again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecycleState::Running | LifecycleState::Failed)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Created => "created",
            LifecycleState::Initializing => "initializing",
            LifecycleState::Ready => "ready",
            LifecycleState::Running => "running",
            LifecycleState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// The public operations guarded by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Initialize,
    Run,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Initialize => f.write_str("initialize"),
            Operation::Run => f.write_str("run"),
        }
    }
}

/// One running XR application instance.
///
/// Owns the runtime it boots and sequences the startup:
/// `initialize` exactly once, then `run` exactly once on success.
/// The entry point constructs it and keeps it; there is no global instance.
pub struct Application<R: XrRuntime> {
    state: LifecycleState,
    runtime: R,
    sink: Arc<dyn ReportSink>,
}

impl<R: XrRuntime> fmt::Debug for Application<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("state", &self.state)
            .field("runtime", &"XrRuntime")
            .field("sink", &"ReportSink")
            .finish()
    }
}

impl<R: XrRuntime> Application<R> {
    /// New application reporting through `tracing`.
    pub fn new(runtime: R) -> Self {
        Self::with_sink(runtime, Arc::new(TracingSink))
    }

    pub fn with_sink(runtime: R, sink: Arc<dyn ReportSink>) -> Self {
        Self {
            state: LifecycleState::Created,
            runtime,
            sink,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Negotiate the session with the runtime.
    ///
    /// Suspends until the runtime settles. The outcome is handed to the report
    /// sink before this future completes, so a caller reacting to the result
    /// always finds the report already emitted.
    pub async fn initialize(&mut self) -> Result<InitializationResult, LifecycleError> {
        self.guard(Operation::Initialize, LifecycleState::Created)?;

        tracing::info!("initializing...");
        self.state = LifecycleState::Initializing;

        match self.runtime.initialize().await {
            Ok(result) => {
                self.sink.report(&Report::Ready(result.clone()));
                self.state = LifecycleState::Ready;
                Ok(result)
            }
            Err(failure) => {
                self.sink.report(&Report::Failed(failure.clone()));
                self.state = LifecycleState::Failed;
                Err(LifecycleError::Initialization(failure))
            }
        }
    }

    /// Hand the calling thread to the runtime's frame loop.
    ///
    /// Under normal operation this does not return. It only comes back when
    /// the runtime ends the session on its own, or with the loop's error.
    pub fn run(&mut self) -> Result<(), LifecycleError> {
        self.guard(Operation::Run, LifecycleState::Ready)?;

        tracing::info!("running...");
        self.state = LifecycleState::Running;

        self.runtime.run().map_err(LifecycleError::Runtime)
    }

    fn guard(&self, operation: Operation, expected: LifecycleState) -> Result<(), LifecycleError> {
        if self.state == expected {
            return Ok(());
        }

        tracing::error!(%operation, state = %self.state, "lifecycle operation invoked out of order");
        Err(LifecycleError::InvalidState {
            operation,
            state: self.state,
        })
    }
}
