use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The kind of session requested from the XR runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionMode {
    /// Rendered into the page/window, no headset takeover.
    #[default]
    Inline,
    ImmersiveVr,
    ImmersiveAr,
}

impl SessionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMode::Inline => "inline",
            SessionMode::ImmersiveVr => "immersive-vr",
            SessionMode::ImmersiveAr => "immersive-ar",
        }
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptor of a negotiated session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: Uuid,
    pub mode: SessionMode,
    /// Target frame rate in Hz.
    pub frame_rate: u32,
    pub started_at: DateTime<Utc>,
}

impl SessionInfo {
    pub fn new(mode: SessionMode, frame_rate: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            frame_rate,
            started_at: Utc::now(),
        }
    }
}

/// What the runtime hands back once negotiation completes.
///
/// The lifecycle controller never looks inside this value. It only reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitializationResult {
    pub summary: String,
    pub session: Option<SessionInfo>,
}

impl InitializationResult {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            session: None,
        }
    }

    pub fn with_session(mut self, session: SessionInfo) -> Self {
        self.session = Some(session);
        self
    }
}

impl fmt::Display for InitializationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.session {
            Some(session) => write!(
                f,
                "{} (session {} [{}] @ {} Hz)",
                self.summary, session.id, session.mode, session.frame_rate
            ),
            None => f.write_str(&self.summary),
        }
    }
}
