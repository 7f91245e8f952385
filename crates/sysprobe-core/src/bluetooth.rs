//! Bluetooth Low Energy discovery.
//!
//! This module provides:
//! - The [`DeviceScanner`] capability used by the discovery probe
//! - [`BluezScanner`], a BlueZ-backed scanner (feature `bluetooth`, Linux only)
//! - [`MockScanner`], a fixed-result scanner for hosts without BlueZ
//!   (feature `mock-bluetooth`, or when `bluetooth` is disabled)

use std::future::Future;
use std::time::Duration;

use crate::error::Result;
use crate::types::DeviceDescriptor;

/// Default scan window, matching common BLE scanner defaults.
pub const DEFAULT_SCAN_DURATION: Duration = Duration::from_secs(5);

/// An unfiltered scan for nearby peripherals.
pub trait DeviceScanner {
    /// Scan for `duration` and return every device seen, in first-seen order.
    ///
    /// # Errors
    ///
    /// Returns an error if the adapter is missing, powered off, or the scan fails.
    fn scan(&self, duration: Duration) -> impl Future<Output = Result<Vec<DeviceDescriptor>>>;
}

#[cfg(feature = "bluetooth")]
pub use bluez::BluezScanner;

#[cfg(feature = "bluetooth")]
mod bluez {
    use std::collections::HashSet;
    use std::time::Duration;

    use bluer::{AdapterEvent, Session};
    use futures::{pin_mut, StreamExt};
    use tracing::{debug, info};

    use super::DeviceScanner;
    use crate::error::{Result, SysprobeError};
    use crate::types::DeviceDescriptor;

    /// Scanner talking to `bluetoothd` over D-Bus.
    #[derive(Debug, Clone, Default)]
    pub struct BluezScanner {
        adapter_name: Option<String>,
    }

    impl BluezScanner {
        /// Scan with the system's default adapter.
        #[must_use]
        pub const fn new() -> Self {
            Self { adapter_name: None }
        }

        /// Scan with a specific adapter, e.g. `hci1`.
        #[must_use]
        pub fn with_adapter(name: impl Into<String>) -> Self {
            Self {
                adapter_name: Some(name.into()),
            }
        }
    }

    impl DeviceScanner for BluezScanner {
        async fn scan(&self, duration: Duration) -> Result<Vec<DeviceDescriptor>> {
            let session = Session::new().await?;
            let adapter = match &self.adapter_name {
                Some(name) => session.adapter(name)?,
                None => session.default_adapter().await?,
            };

            if !adapter.is_powered().await? {
                return Err(SysprobeError::BluetoothAdapterPoweredOff);
            }

            info!("Scanning for {duration:?} on adapter {}", adapter.name());

            let events = adapter.discover_devices().await?;
            pin_mut!(events);

            let deadline = tokio::time::sleep(duration);
            tokio::pin!(deadline);

            let mut seen = HashSet::new();
            let mut devices = Vec::new();

            loop {
                tokio::select! {
                    () = &mut deadline => break,
                    event = events.next() => match event {
                        Some(AdapterEvent::DeviceAdded(address)) => {
                            if !seen.insert(address) {
                                continue;
                            }
                            let name = adapter.device(address)?.name().await.unwrap_or(None);
                            debug!(%address, ?name, "Discovered device");
                            devices.push(DeviceDescriptor {
                                name,
                                address: address.to_string(),
                            });
                        }
                        Some(_) => {}
                        None => break,
                    },
                }
            }

            Ok(devices)
        }
    }
}

#[cfg(any(test, feature = "mock-bluetooth", not(feature = "bluetooth")))]
pub use mock::MockScanner;

#[cfg(any(test, feature = "mock-bluetooth", not(feature = "bluetooth")))]
mod mock {
    use std::time::Duration;

    use tracing::debug;

    use super::DeviceScanner;
    use crate::error::{Result, SysprobeError};
    use crate::types::DeviceDescriptor;

    /// Scanner returning a fixed device list or a fixed failure.
    #[derive(Debug, Clone)]
    pub struct MockScanner {
        devices: Vec<DeviceDescriptor>,
        failure: Option<String>,
    }

    impl MockScanner {
        /// Always report `devices`.
        #[must_use]
        pub const fn with_devices(devices: Vec<DeviceDescriptor>) -> Self {
            Self {
                devices,
                failure: None,
            }
        }

        /// Always fail with a scan error carrying `message`.
        #[must_use]
        pub fn failing(message: impl Into<String>) -> Self {
            Self {
                devices: Vec::new(),
                failure: Some(message.into()),
            }
        }
    }

    impl Default for MockScanner {
        fn default() -> Self {
            Self::with_devices(vec![
                DeviceDescriptor::new(Some("Mock Speaker"), "AA:BB:CC:DD:EE:FF"),
                DeviceDescriptor::new(None, "11:22:33:44:55:66"),
            ])
        }
    }

    impl DeviceScanner for MockScanner {
        async fn scan(&self, duration: Duration) -> Result<Vec<DeviceDescriptor>> {
            debug!(?duration, "Using mock Bluetooth scanner");
            match &self.failure {
                Some(message) => Err(SysprobeError::BluetoothScanFailed(message.clone())),
                None => Ok(self.devices.clone()),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_returns_devices() {
            let devices = MockScanner::default()
                .scan(Duration::from_millis(1))
                .await
                .unwrap();
            assert_eq!(devices.len(), 2);
            assert_eq!(devices[0].name.as_deref(), Some("Mock Speaker"));
        }

        #[tokio::test]
        async fn test_mock_failure() {
            let err = MockScanner::failing("adapter busy")
                .scan(Duration::from_millis(1))
                .await
                .unwrap_err();
            assert!(err.is_bluetooth_error());
        }
    }
}
