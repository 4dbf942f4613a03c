use crate::error::InitializationFailure;
use crate::session::InitializationResult;
use async_trait::async_trait;

/// The XR runtime collaborator driven by [`crate::Application`].
///
/// Device/session negotiation and the per-frame work live behind this trait.
#[async_trait]
pub trait XrRuntime: Send {
    /// Negotiate a session. Settles exactly once, with either outcome.
    async fn initialize(&mut self) -> Result<InitializationResult, InitializationFailure>;

    /// Take over the calling thread and drive frames until the session ends.
    fn run(&mut self) -> anyhow::Result<()>;
}

#[async_trait]
impl<T: XrRuntime + ?Sized> XrRuntime for Box<T> {
    async fn initialize(&mut self) -> Result<InitializationResult, InitializationFailure> {
        (**self).initialize().await
    }

    fn run(&mut self) -> anyhow::Result<()> {
        (**self).run()
    }
}
