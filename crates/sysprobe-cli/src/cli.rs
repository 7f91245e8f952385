//! Command-line arguments.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;
use sysprobe_core::{HarnessConfig, Result};

/// Probe Wi-Fi reachability and Bluetooth discovery, then write a CSV report.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML config file (defaults to the platform config directory)
    #[arg(long, env = "SYSPROBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Host to ping
    #[arg(long)]
    pub target: Option<IpAddr>,

    /// CSV report path, overwritten on every run
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Diagnostic log path, appended to on every run
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Bluetooth scan window in seconds
    #[arg(long)]
    pub scan_secs: Option<u64>,

    /// Per-echo ping timeout in seconds
    #[arg(long)]
    pub ping_timeout_secs: Option<u64>,

    /// Number of pings in the repeated-operation test
    #[arg(long)]
    pub repeat: Option<u32>,
}

impl Cli {
    /// Load the layered configuration and apply command-line overrides.
    ///
    /// Validation runs once, on the final values.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or the overridden config is invalid.
    pub fn resolve_config(&self) -> Result<HarnessConfig> {
        let mut config = HarnessConfig::load_unvalidated(self.config.as_deref())?;
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut HarnessConfig) {
        if let Some(target) = self.target {
            config.target = target;
        }
        if let Some(report) = &self.report {
            config.report_path.clone_from(report);
        }
        if let Some(log_file) = &self.log_file {
            config.log_file.clone_from(log_file);
        }
        if let Some(secs) = self.scan_secs {
            config.scan_duration_secs = secs;
        }
        if self.ping_timeout_secs.is_some() {
            config.ping_timeout_secs = self.ping_timeout_secs;
        }
        if let Some(repeat) = self.repeat {
            config.repeat_count = repeat;
        }
    }
}
