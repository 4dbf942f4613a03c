use std::path::Path;
use std::process::{Command, Output};
use std::sync::Arc;
use xrboot_bridge::launcher::{self, INITIAL_SPIN};
use xrboot_bridge::util::{self, FALLBACK_FILTER, FilterChoice};
use xrboot_core::config::CONFIG_ENV_VAR;
use xrboot_core::{
    AppConfig, DeviceProfile, LifecycleError, LifecycleState, MemorySink, Report, ReportFormat,
    SessionMode,
};

fn quick_config(max_frames: u64) -> AppConfig {
    AppConfig {
        frame_rate: 1000,
        max_frames: Some(max_frames),
        ..AppConfig::default()
    }
}

// ============================================================================
// build_application Tests
// ============================================================================

#[test]
fn test_build_application_starts_created() {
    let app = launcher::build_application(&quick_config(1), Arc::new(MemorySink::new()));
    assert_eq!(app.state(), LifecycleState::Created);
    assert!(app.runtime().session().is_none());
}

#[test]
fn test_build_application_uses_config() {
    let config = AppConfig {
        session_mode: SessionMode::ImmersiveVr,
        frame_rate: 90,
        ..AppConfig::default()
    };
    let app = launcher::build_application(&config, Arc::new(MemorySink::new()));
    let settings = app.runtime().settings();
    assert_eq!(settings.mode, SessionMode::ImmersiveVr);
    assert_eq!(settings.frame_rate, 90);
    assert_eq!(settings.max_frames, None);
}

#[test]
fn test_initial_spin_is_nonzero() {
    assert!(INITIAL_SPIN.0 != 0.0 || INITIAL_SPIN.1 != 0.0);
}

// ============================================================================
// launch Tests
// ============================================================================

#[test]
fn test_launch_runs_frame_budget() {
    let sink = MemorySink::new();
    let app = launcher::build_application(&quick_config(3), Arc::new(sink.clone()));

    launcher::launch(app).unwrap();

    let reports = sink.reports();
    assert_eq!(reports.len(), 1);
    match &reports[0] {
        Report::Ready(result) => {
            let session = result.session.as_ref().unwrap();
            assert_eq!(session.mode, SessionMode::Inline);
        }
        other => panic!("Expected Ready report, got {:?}", other),
    }
}

#[test]
fn test_launch_unsupported_mode_halts_startup() {
    let config = AppConfig {
        session_mode: SessionMode::ImmersiveAr,
        ..quick_config(3)
    };
    let sink = MemorySink::new();
    let app = launcher::build_application(&config, Arc::new(sink.clone()));

    let err = launcher::launch(app).unwrap_err();

    let chain = format!("{:#}", err);
    assert!(chain.contains("XR startup halted"));
    assert!(chain.contains("unsupported XR session"));
    let lifecycle = err.downcast_ref::<LifecycleError>().unwrap();
    assert!(lifecycle.as_initialization_failure().is_some());

    assert_eq!(sink.len(), 1);
    assert!(!sink.reports()[0].is_ready());
}

#[test]
fn test_launch_declined_session() {
    let config = AppConfig {
        device: DeviceProfile {
            declines_session: true,
            ..DeviceProfile::default()
        },
        ..quick_config(3)
    };
    let sink = MemorySink::new();
    let app = launcher::build_application(&config, Arc::new(sink.clone()));

    let err = launcher::launch(app).unwrap_err();

    assert!(format!("{:#}", err).contains("declined"));
    assert_eq!(sink.len(), 1);
}

#[test]
fn test_run_with_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let config = AppConfig {
        negotiation_delay_ms: 2,
        ..quick_config(2)
    };
    std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();

    let loaded = AppConfig::from_file(&path).unwrap();
    assert_eq!(loaded, config);

    launcher::run_with_config(&loaded).unwrap();
}

// ============================================================================
// Binary Tests
// ============================================================================

fn write_config(dir: &Path, config: &AppConfig) -> std::path::PathBuf {
    let path = dir.join("config.json");
    std::fs::write(&path, serde_json::to_string(config).unwrap()).unwrap();
    path
}

/// Run the built `xrboot` binary against `config`, with debug logging on.
fn run_binary(config: &AppConfig) -> Output {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), config);
    Command::new(env!("CARGO_BIN_EXE_xrboot"))
        .arg(&path)
        .env("RUST_LOG", "debug")
        .env_remove(CONFIG_ENV_VAR)
        .output()
        .expect("failed to spawn xrboot")
}

fn stdout_json_lines(output: &Output) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            serde_json::from_str(line)
                .unwrap_or_else(|e| panic!("stdout line is not JSON ({}): {:?}", e, line))
        })
        .collect()
}

#[test]
fn test_binary_json_mode_keeps_stdout_pure() {
    let config = AppConfig {
        report_format: ReportFormat::Json,
        ..quick_config(1)
    };
    let output = run_binary(&config);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let lines = stdout_json_lines(&output);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["outcome"], "ready");
    assert_eq!(lines[0]["detail"]["session"]["mode"], "inline");

    // Logs still happen, just not on stdout.
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("starting..."));
    assert!(stderr.contains("Config loaded"));
}

#[test]
fn test_binary_json_mode_reports_failure() {
    let config = AppConfig {
        report_format: ReportFormat::Json,
        session_mode: SessionMode::ImmersiveAr,
        ..quick_config(1)
    };
    let output = run_binary(&config);
    assert!(!output.status.success());

    let lines = stdout_json_lines(&output);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["outcome"], "failed");
    assert_eq!(lines[0]["detail"]["reason"], "unsupported");
    assert!(String::from_utf8_lossy(&output.stderr).contains("XR startup halted"));
}

#[test]
fn test_binary_log_mode_writes_nothing_to_stdout() {
    let output = run_binary(&quick_config(1));
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("complete initialize session"));
}

#[test]
fn test_binary_rejects_invalid_config() {
    let config = AppConfig {
        frame_rate: 0,
        ..AppConfig::default()
    };
    let output = run_binary(&config);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("frame_rate"));
}

// ============================================================================
// util Tests
// ============================================================================

#[test]
fn test_init_tracing_is_idempotent() {
    util::init_tracing("debug");
    util::init_tracing("not a [valid filter");
}

#[test]
fn test_choose_filter_prefers_rust_log() {
    let (_, choice) = util::choose_filter(Some("xrboot_core=trace"), "warn");
    assert_eq!(choice, FilterChoice::Env("xrboot_core=trace".to_string()));
}

#[test]
fn test_choose_filter_ignores_empty_or_bad_rust_log() {
    let (_, choice) = util::choose_filter(Some("  "), "warn");
    assert_eq!(choice, FilterChoice::Configured("warn".to_string()));

    let (_, choice) = util::choose_filter(Some("=[oops"), "debug");
    assert_eq!(choice, FilterChoice::Configured("debug".to_string()));
}

#[test]
fn test_choose_filter_reports_invalid_config_filter() {
    let (filter, choice) = util::choose_filter(None, "xrboot_core=[");
    match choice {
        FilterChoice::Fallback { rejected, error } => {
            assert_eq!(rejected, "xrboot_core=[");
            assert!(!error.is_empty());
        }
        other => panic!("Expected Fallback, got {:?}", other),
    }
    assert_eq!(filter.to_string(), FALLBACK_FILTER);
}

#[test]
fn test_panic_message_reads_both_payload_kinds() {
    let static_str: Box<dyn std::any::Any + Send> = Box::new("frame handler exploded");
    assert_eq!(util::panic_message(static_str.as_ref()), "frame handler exploded");

    let owned: Box<dyn std::any::Any + Send> = Box::new(format!("frame {} failed", 7));
    assert_eq!(util::panic_message(owned.as_ref()), "frame 7 failed");

    let other: Box<dyn std::any::Any + Send> = Box::new(42_u32);
    assert_eq!(util::panic_message(other.as_ref()), "<non-string panic payload>");
}
