use crate::app::{LifecycleState, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of why negotiation did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureReason {
    /// No compatible session mode on this device.
    Unsupported,
    /// The user or the device refused the session request.
    Declined,
    /// Anything else the runtime tripped over.
    Runtime,
}

/// Negotiation with the runtime could not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{diagnostic}")]
pub struct InitializationFailure {
    pub reason: FailureReason,
    pub diagnostic: String,
}

impl InitializationFailure {
    pub fn new(reason: FailureReason, diagnostic: impl Into<String>) -> Self {
        Self {
            reason,
            diagnostic: diagnostic.into(),
        }
    }

    pub fn unsupported(diagnostic: impl Into<String>) -> Self {
        Self::new(FailureReason::Unsupported, diagnostic)
    }

    pub fn declined(diagnostic: impl Into<String>) -> Self {
        Self::new(FailureReason::Declined, diagnostic)
    }

    pub fn runtime(diagnostic: impl Into<String>) -> Self {
        Self::new(FailureReason::Runtime, diagnostic)
    }
}

/// Everything the lifecycle controller can hand back to its caller.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// A public operation was called in a state that does not allow it.
    /// This is a bug in the calling code, not an environmental condition.
    #[error("`{operation}` invoked out of order (state: {state})")]
    InvalidState {
        operation: Operation,
        state: LifecycleState,
    },

    #[error("initialization failed: {0}")]
    Initialization(#[from] InitializationFailure),

    #[error("runtime loop failed: {0:#}")]
    Runtime(#[source] anyhow::Error),
}

impl LifecycleError {
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, LifecycleError::InvalidState { .. })
    }

    /// The negotiation failure, if that is what this error carries.
    pub fn as_initialization_failure(&self) -> Option<&InitializationFailure> {
        match self {
            LifecycleError::Initialization(failure) => Some(failure),
            _ => None,
        }
    }
}
