//! # sysprobe
//!
//! Runs the connectivity diagnostics once:
//! - pings the configured target
//! - scans for nearby Bluetooth Low Energy devices
//! - pings the target repeatedly
//! - writes `test_report.csv` and appends to `system_test.log`
//!
//! ## Running
//!
//! ```bash
//! # On a BlueZ host
//! cargo run --package sysprobe-cli
//!
//! # Without Bluetooth hardware
//! cargo run --package sysprobe-cli --no-default-features --features mock-bluetooth
//! ```
//!
//! Probe failures are part of the report and never change the exit code.
//! The process exits non-zero only when configuration or the report fails.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use anyhow::Context;
use clap::Parser;
use sysprobe_cli::{cli::Cli, logging};
use sysprobe_core::{Harness, SystemPinger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config().context("Invalid configuration")?;

    let _guards = logging::init(&config.log_file).context("Failed to initialize logging")?;

    let pinger = config
        .ping_timeout()
        .map_or_else(SystemPinger::new, SystemPinger::with_timeout);

    #[cfg(all(feature = "bluetooth", not(feature = "mock-bluetooth")))]
    let scanner = sysprobe_core::BluezScanner::new();
    #[cfg(any(feature = "mock-bluetooth", not(feature = "bluetooth")))]
    let scanner = sysprobe_core::MockScanner::default();

    let harness = Harness::new(pinger, scanner, config);
    harness
        .run_and_report()
        .await
        .context("Failed to write test report")?;

    Ok(())
}
