use crate::error::InitializationFailure;
use crate::session::InitializationResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};

/// The outcome of one initialization attempt, as seen by observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "kebab-case")]
pub enum Report {
    Ready(InitializationResult),
    Failed(InitializationFailure),
}

impl Report {
    pub fn is_ready(&self) -> bool {
        matches!(self, Report::Ready(_))
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Ready(result) => write!(f, "ready: {}", result),
            Report::Failed(failure) => write!(f, "failed: {}", failure),
        }
    }
}

/// The observability channel that receives initialization outcomes.
pub trait ReportSink: Send + Sync {
    fn report(&self, report: &Report);
}

// ════════════════════════════════════════════════════════════════════
// Sinks
// ════════════════════════════════════════════════════════════════════

/// Reports into the `tracing` stream. The default sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn report(&self, report: &Report) {
        match report {
            Report::Ready(result) => match &result.session {
                Some(session) => tracing::info!(
                    session_id = %session.id,
                    mode = %session.mode,
                    frame_rate = session.frame_rate,
                    "{}",
                    result.summary
                ),
                None => tracing::info!("{}", result.summary),
            },
            Report::Failed(failure) => {
                tracing::error!(reason = ?failure.reason, "{}", failure.diagnostic)
            }
        }
    }
}

/// Keeps every report in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    reports: Arc<Mutex<Vec<Report>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<Report> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Report>> {
        self.reports.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ReportSink for MemorySink {
    fn report(&self, report: &Report) {
        self.lock().push(report.clone());
    }
}

/// Writes each report as one line of JSON.
pub struct JsonSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> fmt::Debug for JsonSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSink").finish()
    }
}

impl<W: Write + Send> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_line(&self, report: &Report) -> anyhow::Result<()> {
        let line = serde_json::to_string(report)?;
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }
}

impl<W: Write + Send> ReportSink for JsonSink<W> {
    fn report(&self, report: &Report) {
        // The sink has nowhere to return an error to; fall back to the log.
        if let Err(e) = self.write_line(report) {
            tracing::warn!("JSON report write failed: {:#}", e);
            TracingSink.report(report);
        }
    }
}
