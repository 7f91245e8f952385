//! Orchestration of a full diagnostic run.

use std::path::Path;

use tracing::{debug, info};

use crate::bluetooth::DeviceScanner;
use crate::config::HarnessConfig;
use crate::error::Result;
use crate::ping::Pinger;
use crate::probes::{
    check_reachability, discover_devices, repeated_reachability, BLUETOOTH_DISCOVERY,
    SIMULTANEOUS_OPERATIONS, WIFI_CONNECTIVITY,
};
use crate::report::write_report;
use crate::types::ResultLog;

/// Runs the probes in a fixed order against the given capabilities.
#[derive(Debug, Clone)]
pub struct Harness<P, S> {
    pinger: P,
    scanner: S,
    config: HarnessConfig,
}

impl<P: Pinger, S: DeviceScanner> Harness<P, S> {
    /// Create a harness.
    pub const fn new(pinger: P, scanner: S, config: HarnessConfig) -> Self {
        Self {
            pinger,
            scanner,
            config,
        }
    }

    /// Configuration in use.
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Run reachability, discovery, then repeated reachability.
    ///
    /// Every probe runs regardless of earlier failures; the returned log
    /// holds exactly one record per probe, in that order.
    pub async fn run(&self) -> ResultLog {
        let target = self.config.target;
        let mut log = ResultLog::new();

        log.push(check_reachability(&self.pinger, target).into_record(WIFI_CONNECTIVITY));

        log.push(
            discover_devices(&self.scanner, self.config.scan_duration())
                .await
                .into_record(BLUETOOTH_DISCOVERY),
        );

        log.push(
            repeated_reachability(&self.pinger, target, self.config.repeat_count)
                .into_record(SIMULTANEOUS_OPERATIONS),
        );

        log
    }

    /// Run all probes and write the CSV report to the configured path.
    ///
    /// # Errors
    ///
    /// Returns an error only if the report cannot be written.
    pub async fn run_and_report(&self) -> Result<ResultLog> {
        self.run_and_report_to(&self.config.report_path).await
    }

    /// Run all probes and write the CSV report to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the report cannot be written.
    pub async fn run_and_report_to(&self, path: &Path) -> Result<ResultLog> {
        info!("Starting system testing.");

        let log = self.run().await;
        write_report(path, &log)?;

        debug!(failures = log.failures(), "Run finished");
        info!(
            "System testing completed. Check '{}' and logs for details.",
            path.display()
        );
        Ok(log)
    }
}
