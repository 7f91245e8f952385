//! Harness configuration.
//!
//! Values are layered, later sources winning:
//! 1. Built-in defaults
//! 2. An optional TOML file
//! 3. `SYSPROBE_*` environment variables (e.g. `SYSPROBE_REPEAT_COUNT=5`)
//!
//! Command-line overrides are applied by the binary on top of the loaded value.

use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bluetooth::DEFAULT_SCAN_DURATION;
use crate::error::{Result, SysprobeError};

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "SYSPROBE";

/// Google public DNS, a well-known always-on address.
pub const DEFAULT_TARGET: IpAddr = IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8));

/// Main harness configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Host pinged by the reachability probes.
    pub target: IpAddr,

    /// Per-echo reply timeout. `None` keeps the ping utility's default.
    pub ping_timeout_secs: Option<u64>,

    /// How long the Bluetooth scan listens for advertisements.
    pub scan_duration_secs: u64,

    /// Pings issued by the repeated-operation probe.
    pub repeat_count: u32,

    /// CSV report location. Overwritten on every run.
    pub report_path: PathBuf,

    /// Diagnostic log location. Appended to on every run.
    pub log_file: PathBuf,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET,
            ping_timeout_secs: None,
            scan_duration_secs: DEFAULT_SCAN_DURATION.as_secs(),
            repeat_count: 3,
            report_path: PathBuf::from("test_report.csv"),
            log_file: PathBuf::from("system_test.log"),
        }
    }
}

impl HarnessConfig {
    /// Load configuration from defaults, `file` (or the default path) and the environment.
    ///
    /// A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed or the result fails validation.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let loaded = Self::load_unvalidated(file)?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Like [`HarnessConfig::load`], but leaves validation to the caller.
    ///
    /// Use this when further overrides are applied before the values are used.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or parsed.
    pub fn load_unvalidated(file: Option<&Path>) -> Result<Self> {
        let path = match file {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path(),
        };

        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(file.is_some()),
            );
        }

        let loaded = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        Ok(loaded)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigValidationError` naming every offending field.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        if self.repeat_count == 0 {
            problems.push("repeat_count: must be at least 1");
        }
        if self.scan_duration_secs == 0 {
            problems.push("scan_duration_secs: must be at least 1");
        }
        if self.ping_timeout_secs == Some(0) {
            problems.push("ping_timeout_secs: must be at least 1 when set");
        }
        if self.report_path.as_os_str().is_empty() {
            problems.push("report_path: must not be empty");
        }
        if self.log_file.as_os_str().is_empty() {
            problems.push("log_file: must not be empty");
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(SysprobeError::ConfigValidationError(problems.join("; ")))
        }
    }

    /// Scan window as a [`Duration`].
    #[must_use]
    pub const fn scan_duration(&self) -> Duration {
        Duration::from_secs(self.scan_duration_secs)
    }

    /// Ping timeout as a [`Duration`], if configured.
    #[must_use]
    pub fn ping_timeout(&self) -> Option<Duration> {
        self.ping_timeout_secs.map(Duration::from_secs)
    }
}

/// Platform config file location, e.g. `~/.config/sysprobe/config.toml`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "sysprobe").map(|dirs| dirs.config_dir().join("config.toml"))
}
