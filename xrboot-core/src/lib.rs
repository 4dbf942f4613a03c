//! # xrboot core
//!
//! The lifecycle controller of an XR application: negotiate a session with the
//! runtime exactly once, report how it went, then hand the thread to the
//! runtime's frame loop.

pub mod app;
pub mod config;
pub mod error;
pub mod report;
pub mod runtime;
pub mod session;

// Re-export the main struct so users can just use `xrboot_core::Application`
pub use app::{Application, LifecycleState, Operation};

pub use config::{AppConfig, ConfigSource, DeviceProfile, ReportFormat};
pub use error::{FailureReason, InitializationFailure, LifecycleError};
pub use report::{JsonSink, MemorySink, Report, ReportSink, TracingSink};
pub use runtime::XrRuntime;
pub use session::{InitializationResult, SessionInfo, SessionMode};
