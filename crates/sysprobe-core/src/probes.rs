//! The three diagnostic probes.
//!
//! Every probe returns a [`ProbeOutcome`] and never an error: capability
//! failures are logged and folded into [`ProbeOutcome::Fail`].

use std::net::IpAddr;
use std::time::Duration;

use tracing::{error, info};

use crate::bluetooth::DeviceScanner;
use crate::ping::Pinger;
use crate::types::{DeviceDescriptor, ProbeOutcome};

/// Report name of the reachability probe.
pub const WIFI_CONNECTIVITY: &str = "Wi-Fi Connectivity";
/// Report name of the discovery probe.
pub const BLUETOOTH_DISCOVERY: &str = "Bluetooth Discovery";
/// Report name of the repeated-operation probe.
pub const SIMULTANEOUS_OPERATIONS: &str = "Simultaneous Operations";

const NO_RESPONSE: &str = "No response from server.";
const NO_DEVICES: &str = "No devices found.";
const OPERATION_FAILED: &str = "Operation failed during simultaneous execution.";
const ALL_OPERATIONS_OK: &str = "All operations executed successfully.";

/// Ping `target` once.
pub fn check_reachability<P: Pinger>(pinger: &P, target: IpAddr) -> ProbeOutcome {
    info!("Starting Wi-Fi connectivity test.");

    let outcome = match pinger.ping(target) {
        Ok(Some(rtt)) if rtt > 0.0 => {
            let details = format!("Ping response: {rtt:?} ms");
            info!("Wi-Fi test passed. {details}");
            return ProbeOutcome::Pass(details);
        }
        Ok(_) => NO_RESPONSE.to_string(),
        Err(e) => e.to_string(),
    };

    error!("Wi-Fi test failed: {outcome}");
    ProbeOutcome::Fail(outcome)
}

/// Run one unfiltered Bluetooth scan lasting `duration`.
pub async fn discover_devices<S: DeviceScanner>(scanner: &S, duration: Duration) -> ProbeOutcome {
    info!("Starting Bluetooth discovery test.");

    let reason = match scanner.scan(duration).await {
        Ok(devices) if !devices.is_empty() => {
            let listing = format_devices(&devices);
            info!("Bluetooth test passed. Found devices: {listing}");
            return ProbeOutcome::Pass(format!("Devices: {listing}"));
        }
        Ok(_) => NO_DEVICES.to_string(),
        Err(e) => e.to_string(),
    };

    error!("Bluetooth test failed: {reason}");
    ProbeOutcome::Fail(reason)
}

/// Ping `target` up to `attempts` times in sequence, stopping at the first miss.
pub fn repeated_reachability<P: Pinger>(pinger: &P, target: IpAddr, attempts: u32) -> ProbeOutcome {
    info!("Starting simultaneous operations test.");

    for attempt in 1..=attempts {
        let reason = match pinger.ping(target) {
            Ok(Some(rtt)) if rtt > 0.0 => {
                info!("Operation {attempt}: Ping response: {rtt:?} ms");
                continue;
            }
            Ok(_) => OPERATION_FAILED.to_string(),
            Err(e) => e.to_string(),
        };

        error!("Simultaneous operations test failed: {reason}");
        return ProbeOutcome::Fail(reason);
    }

    info!("Simultaneous operations test passed.");
    ProbeOutcome::Pass(ALL_OPERATIONS_OK.to_string())
}

/// Render devices as `[('name', 'address'), (None, 'address')]`.
fn format_devices(devices: &[DeviceDescriptor]) -> String {
    let pairs: Vec<String> = devices.iter().map(ToString::to_string).collect();
    format!("[{}]", pairs.join(", "))
}
