use anyhow::{Context, Result};
use std::sync::Arc;
use xrboot_core::{
    AppConfig, Application, JsonSink, ReportFormat, ReportSink, TracingSink, XrRuntime,
};
use xrboot_runtime::{HeadlessRuntime, RuntimeSettings, SpinningScene};

/// Impulse given to the demo scene so the first frames have something to do.
pub const INITIAL_SPIN: (f32, f32) = (0.05, 0.02);

pub fn build_sink(format: ReportFormat) -> Arc<dyn ReportSink> {
    match format {
        ReportFormat::Log => Arc::new(TracingSink),
        ReportFormat::Json => Arc::new(JsonSink::new(std::io::stdout())),
    }
}

/// The headless runtime with the spinning demo scene, per `config`.
pub fn build_application(
    config: &AppConfig,
    sink: Arc<dyn ReportSink>,
) -> Application<HeadlessRuntime> {
    let mut scene = SpinningScene::new();
    scene.nudge(INITIAL_SPIN.0, INITIAL_SPIN.1);

    let runtime = HeadlessRuntime::new(RuntimeSettings::from_config(config), scene);
    Application::with_sink(runtime, sink)
}

/// Boot `app` and give it the current thread.
///
/// Initialization is driven on a tokio runtime; the frame loop then runs on
/// this thread, outside of any async context.
pub fn launch<R: XrRuntime>(mut app: Application<R>) -> Result<()> {
    let rt = tokio::runtime::Runtime::new().context("Failed to build tokio runtime")?;

    // The sink has already reported the outcome by the time this returns.
    let result = rt
        .block_on(app.initialize())
        .context("XR startup halted")?;
    tracing::debug!(%result, "Handing control to the frame loop");

    app.run().context("XR frame loop")?;

    tracing::info!("Session ended");
    Ok(())
}

/// Everything `main` does after config and logging are set up.
pub fn run_with_config(config: &AppConfig) -> Result<()> {
    let sink = build_sink(config.report_format);
    launch(build_application(config, sink))
}
