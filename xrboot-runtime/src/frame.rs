use std::time::Duration;
use uuid::Uuid;

/// One tick of the frame loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub session_id: Uuid,
    /// Zero-based frame counter.
    pub index: u64,
    /// Time since the loop started.
    pub elapsed: Duration,
    /// Time since the previous frame (zero on the first one).
    pub delta: Duration,
}

/// What the loop should do after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    Continue,
    Exit,
}

/// Per-frame work driven by the runtime's loop.
pub trait FrameHandler: Send {
    fn on_frame(&mut self, frame: &Frame) -> anyhow::Result<FrameControl>;
}

impl<F> FrameHandler for F
where
    F: FnMut(&Frame) -> anyhow::Result<FrameControl> + Send,
{
    fn on_frame(&mut self, frame: &Frame) -> anyhow::Result<FrameControl> {
        self(frame)
    }
}
