use crate::session::SessionMode;
use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Env var pointing at a config file. Beats the per-user config dir.
pub const CONFIG_ENV_VAR: &str = "XRBOOT_CONFIG";

pub const DEFAULT_FRAME_RATE: u32 = 72;
pub const MAX_FRAME_RATE: u32 = 1000;

/// The simulated device the headless runtime negotiates against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceProfile {
    pub name: String,
    pub supported_modes: Vec<SessionMode>,
    /// Refuse every session request, like a user dismissing the prompt.
    pub declines_session: bool,
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            name: "headless".to_string(),
            supported_modes: vec![SessionMode::Inline, SessionMode::ImmersiveVr],
            declines_session: false,
        }
    }
}

impl DeviceProfile {
    pub fn supports(&self, mode: SessionMode) -> bool {
        self.supported_modes.contains(&mode)
    }
}

/// How initialization outcomes are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportFormat {
    /// Through the tracing log stream.
    #[default]
    Log,
    /// One JSON object per line on stdout.
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub session_mode: SessionMode,
    /// Frame loop rate in Hz.
    pub frame_rate: u32,
    /// Stop the frame loop after this many frames. `None` runs until the process dies.
    pub max_frames: Option<u64>,
    /// Simulated negotiation latency.
    pub negotiation_delay_ms: u64,
    pub device: DeviceProfile,
    pub report_format: ReportFormat,
    /// Used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            session_mode: SessionMode::default(),
            frame_rate: DEFAULT_FRAME_RATE,
            max_frames: None,
            negotiation_delay_ms: 0,
            device: DeviceProfile::default(),
            report_format: ReportFormat::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Parse and validate a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the config for this process. See [`ConfigSource::discover`].
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::from_source(&ConfigSource::discover(explicit))
    }

    /// [`AppConfig::load`] with every candidate passed in.
    pub fn load_from(
        explicit: Option<&Path>,
        env_path: Option<&Path>,
        user_path: Option<&Path>,
    ) -> Result<Self> {
        Self::from_source(&ConfigSource::locate(explicit, env_path, user_path))
    }

    pub fn from_source(source: &ConfigSource) -> Result<Self> {
        match source.path() {
            Some(path) => Self::from_file(path),
            None => {
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.frame_rate == 0 || self.frame_rate > MAX_FRAME_RATE {
            bail!(
                "frame_rate must be between 1 and {} Hz, got {}",
                MAX_FRAME_RATE,
                self.frame_rate
            );
        }
        if self.max_frames == Some(0) {
            bail!("max_frames must be at least 1 when set");
        }
        Ok(())
    }
}

/// Where the process config comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Path given on the command line.
    Argument(PathBuf),
    /// Path taken from `$XRBOOT_CONFIG`.
    Env(PathBuf),
    /// `<config dir>/config.json`, which exists.
    UserDir(PathBuf),
    Defaults,
}

impl ConfigSource {
    /// Pick a source: `explicit`, then `$XRBOOT_CONFIG`, then the per-user
    /// config file if present, then defaults.
    pub fn discover(explicit: Option<&Path>) -> Self {
        let env_path = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        Self::locate(explicit, env_path.as_deref(), default_config_path().as_deref())
    }

    /// [`ConfigSource::discover`] with every candidate passed in.
    pub fn locate(explicit: Option<&Path>, env_path: Option<&Path>, user_path: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            return ConfigSource::Argument(path.to_path_buf());
        }
        if let Some(path) = env_path {
            return ConfigSource::Env(path.to_path_buf());
        }
        match user_path {
            Some(path) if path.exists() => ConfigSource::UserDir(path.to_path_buf()),
            _ => ConfigSource::Defaults,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Argument(path) | ConfigSource::Env(path) | ConfigSource::UserDir(path) => {
                Some(path)
            }
            ConfigSource::Defaults => None,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Argument(path) => write!(f, "argument {}", path.display()),
            ConfigSource::Env(path) => write!(f, "${} {}", CONFIG_ENV_VAR, path.display()),
            ConfigSource::UserDir(path) => write!(f, "user config {}", path.display()),
            ConfigSource::Defaults => f.write_str("built-in defaults"),
        }
    }
}

/// `<config dir>/config.json` for this user, if a home directory exists.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "DrTomLLC", "xrboot").map(|dirs| dirs.config_dir().join("config.json"))
}
