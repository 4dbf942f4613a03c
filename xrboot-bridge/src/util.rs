use std::any::Any;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor the configured `log_filter` parses.
pub const FALLBACK_FILTER: &str = "info";

/// Which directive set ended up driving the subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChoice {
    /// `RUST_LOG` was set and valid.
    Env(String),
    /// The config's `log_filter`.
    Configured(String),
    /// The config's `log_filter` was rejected; [`FALLBACK_FILTER`] is in effect.
    Fallback { rejected: String, error: String },
}

/// Pick the filter for this process. `RUST_LOG` wins over `configured`.
pub fn choose_filter(rust_log: Option<&str>, configured: &str) -> (EnvFilter, FilterChoice) {
    // RUST_LOG=xrboot_core=debug,xrboot_runtime=trace
    if let Some(directives) = rust_log.filter(|d| !d.trim().is_empty()) {
        if let Ok(filter) = EnvFilter::try_new(directives) {
            return (filter, FilterChoice::Env(directives.to_string()));
        }
    }

    match EnvFilter::try_new(configured) {
        Ok(filter) => (filter, FilterChoice::Configured(configured.to_string())),
        Err(e) => (
            EnvFilter::new(FALLBACK_FILTER),
            FilterChoice::Fallback {
                rejected: configured.to_string(),
                error: e.to_string(),
            },
        ),
    }
}

/// Install the global subscriber on stderr. Stdout belongs to the JSON report stream.
pub fn init_tracing(default_filter: &str) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (filter, choice) = choose_filter(rust_log.as_deref(), default_filter);

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .compact()
        .try_init()
        .is_ok();

    if !installed {
        return;
    }

    if let FilterChoice::Fallback { rejected, error } = &choice {
        tracing::warn!(
            log_filter = %rejected,
            fallback = FALLBACK_FILTER,
            "Invalid log_filter in config: {}",
            error
        );
    }
}

/// Text of a panic payload, for the two payload types `panic!` produces.
pub fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string panic payload>")
}

/// Route panics through tracing so they land next to the lifecycle log.
///
/// The frame loop owns the main thread, so a panic in a frame handler ends the
/// session; the thread name tells a loop panic apart from a tokio worker one.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let thread = std::thread::current();
        let thread = thread.name().unwrap_or("<unnamed>");
        let location = info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "<unknown>".to_string());

        tracing::error!(
            target: "xrboot::panic",
            thread,
            %location,
            "xrboot panicked: {}",
            panic_message(info.payload())
        );
    }));
}
