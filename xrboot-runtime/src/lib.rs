//! # xrboot runtime
//!
//! The Headless XR Runtime.
//! Negotiates a session against a simulated device profile, then drives a
//! paced frame loop on the calling thread.

use anyhow::Context;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use xrboot_core::{
    AppConfig, DeviceProfile, InitializationFailure, InitializationResult, SessionInfo,
    SessionMode, XrRuntime,
};

pub mod frame;
pub mod scene;

pub use frame::{Frame, FrameControl, FrameHandler};
pub use scene::SpinningScene;

/// Summary reported when a session comes up.
pub const SESSION_READY: &str = "complete initialize session";

/// Knobs for the headless runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeSettings {
    pub mode: SessionMode,
    pub frame_rate: u32,
    pub max_frames: Option<u64>,
    pub negotiation_delay: Duration,
    pub device: DeviceProfile,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl RuntimeSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            mode: config.session_mode,
            frame_rate: config.frame_rate,
            max_frames: config.max_frames,
            negotiation_delay: Duration::from_millis(config.negotiation_delay_ms),
            device: config.device.clone(),
        }
    }

    fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frame_rate.max(1)))
    }
}

// Takes the settings, not `self`: frame handlers are `Send` but not `Sync`.
async fn check_support(settings: &RuntimeSettings, mode: SessionMode) -> bool {
    if !settings.negotiation_delay.is_zero() {
        tokio::time::sleep(settings.negotiation_delay).await;
    }
    settings.device.supports(mode)
}

/// Why the frame loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopExit {
    BudgetExhausted,
    HandlerExit,
}

/// The Headless Runtime Engine
pub struct HeadlessRuntime {
    settings: RuntimeSettings,
    session: Option<SessionInfo>,
    handler: Box<dyn FrameHandler>,
    frames_rendered: u64,
}

impl std::fmt::Debug for HeadlessRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessRuntime")
            .field("settings", &self.settings)
            .field("session", &self.session)
            .field("frames_rendered", &self.frames_rendered)
            .finish()
    }
}

impl HeadlessRuntime {
    pub fn new(settings: RuntimeSettings, handler: impl FrameHandler + 'static) -> Self {
        Self {
            settings,
            session: None,
            handler: Box::new(handler),
            frames_rendered: 0,
        }
    }

    pub fn settings(&self) -> &RuntimeSettings {
        &self.settings
    }

    /// The negotiated session, until the frame loop ends it.
    pub fn session(&self) -> Option<&SessionInfo> {
        self.session.as_ref()
    }

    /// Frames completed by the last (or current) loop.
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Ask the device whether it can host `mode`.
    pub async fn is_session_supported(&self, mode: SessionMode) -> bool {
        check_support(&self.settings, mode).await
    }

    fn frame_loop(&mut self, session: &SessionInfo) -> anyhow::Result<LoopExit> {
        let interval = self.settings.frame_interval();
        let start = Instant::now();
        let mut last = start;
        let mut deadline = start;

        loop {
            if let Some(max) = self.settings.max_frames {
                if self.frames_rendered >= max {
                    return Ok(LoopExit::BudgetExhausted);
                }
            }

            let now = Instant::now();
            let frame = Frame {
                session_id: session.id,
                index: self.frames_rendered,
                elapsed: now - start,
                delta: if self.frames_rendered == 0 {
                    Duration::ZERO
                } else {
                    now - last
                },
            };
            last = now;

            let control = self
                .handler
                .on_frame(&frame)
                .with_context(|| format!("Frame {} failed", frame.index))?;
            self.frames_rendered += 1;

            if control == FrameControl::Exit {
                return Ok(LoopExit::HandlerExit);
            }

            deadline += interval;
            let now = Instant::now();
            if deadline > now {
                std::thread::sleep(deadline - now);
            } else {
                // Fell behind; don't try to catch up with a burst of frames.
                deadline = now;
            }
        }
    }
}

#[async_trait]
impl XrRuntime for HeadlessRuntime {
    async fn initialize(&mut self) -> Result<InitializationResult, InitializationFailure> {
        let mode = self.settings.mode;
        let device = self.settings.device.name.clone();

        if self.session.is_some() {
            return Err(InitializationFailure::runtime("XR session already active"));
        }

        tracing::debug!(%mode, %device, "Requesting XR session");

        if !check_support(&self.settings, mode).await {
            return Err(InitializationFailure::unsupported(format!(
                "unsupported XR session: {} is not available on {}",
                mode, device
            )));
        }

        if self.settings.device.declines_session {
            return Err(InitializationFailure::declined(format!(
                "{} declined the {} session request",
                device, mode
            )));
        }

        let session = SessionInfo::new(mode, self.settings.frame_rate);
        self.session = Some(session.clone());

        Ok(InitializationResult::new(SESSION_READY).with_session(session))
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let session = self
            .session
            .clone()
            .context("No active XR session; initialize first")?;

        tracing::info!(
            session_id = %session.id,
            mode = %session.mode,
            frame_rate = session.frame_rate,
            "Frame loop started"
        );

        self.frames_rendered = 0;
        let outcome = self.frame_loop(&session);
        self.session = None;

        match &outcome {
            Ok(exit) => tracing::info!(
                session_id = %session.id,
                frames = self.frames_rendered,
                reason = ?exit,
                "Frame loop ended"
            ),
            Err(e) => tracing::error!(
                session_id = %session.id,
                frames = self.frames_rendered,
                "Frame loop failed: {:#}",
                e
            ),
        }

        outcome.map(|_| ())
    }
}
