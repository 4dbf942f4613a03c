use crate::frame::{Frame, FrameControl, FrameHandler};

/// Fraction of angular velocity kept from one frame to the next.
pub const AMORTIZATION: f32 = 0.95;

/// A free-spinning object: orientation plus a decaying angular velocity.
///
/// Rendering is someone else's job; this only advances the numbers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpinningScene {
    /// Rotation about Y, radians.
    pub theta: f32,
    /// Rotation about X, radians.
    pub phi: f32,
    dx: f32,
    dy: f32,
    held: bool,
}

impl SpinningScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an impulse, in radians per frame.
    pub fn nudge(&mut self, dx: f32, dy: f32) {
        self.dx = dx;
        self.dy = dy;
        self.theta += dx;
        self.phi += dy;
    }

    /// While held, the object does not coast.
    pub fn hold(&mut self) {
        self.held = true;
    }

    pub fn release(&mut self) {
        self.held = false;
    }

    pub fn velocity(&self) -> (f32, f32) {
        (self.dx, self.dy)
    }

    /// Advance one frame.
    pub fn step(&mut self) {
        if self.held {
            return;
        }
        self.dx *= AMORTIZATION;
        self.dy *= AMORTIZATION;
        self.theta += self.dx;
        self.phi += self.dy;
    }
}

impl FrameHandler for SpinningScene {
    fn on_frame(&mut self, frame: &Frame) -> anyhow::Result<FrameControl> {
        self.step();
        tracing::trace!(
            frame = frame.index,
            theta = self.theta,
            phi = self.phi,
            "scene advanced"
        );
        Ok(FrameControl::Continue)
    }
}
