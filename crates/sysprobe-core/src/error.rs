//! Unified error types for the sysprobe core library.
//!
//! This module provides a unified error type [`SysprobeError`] that covers all failure
//! modes across the harness. Errors fall into two groups:
//!
//! - **Capability errors**: the ping utility or the Bluetooth stack failed. Probes
//!   contain these and turn them into a failed outcome record.
//! - **Fatal errors**: configuration or report output failed. These propagate to
//!   the binary and end the process with a non-zero exit code.
//!
//! # Example
//!
//! ```rust
//! use sysprobe_core::error::{Result, SysprobeError};
//!
//! fn check_repeat(count: u32) -> Result<()> {
//!     if count == 0 {
//!         return Err(SysprobeError::ConfigValidationError(
//!             "repeat_count: must be at least 1".into(),
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// The unified error type for all sysprobe operations.
#[derive(Debug, Error)]
pub enum SysprobeError {
    // =========================================================================
    // REACHABILITY ERRORS
    // =========================================================================
    /// The system `ping` utility could not be started.
    #[error("Failed to run the ping utility: {0}. Ensure 'ping' is installed and on PATH.")]
    PingUnavailable(#[source] std::io::Error),

    /// `ping` reported a reply but its output could not be understood.
    #[error("Could not read round-trip time from ping output: {0}")]
    PingOutputUnparseable(String),

    // =========================================================================
    // BLUETOOTH ERRORS
    // =========================================================================
    /// No Bluetooth adapter was found on this system.
    #[error(
        "No Bluetooth adapter found. Ensure Bluetooth hardware is present and drivers are loaded."
    )]
    BluetoothAdapterNotFound,

    /// The Bluetooth adapter exists but is powered off.
    #[error("Bluetooth adapter is powered off. Run 'bluetoothctl power on' to enable.")]
    BluetoothAdapterPoweredOff,

    /// Bluetooth device scanning failed.
    #[error("Bluetooth scan failed: {0}")]
    BluetoothScanFailed(String),

    // =========================================================================
    // CONFIGURATION ERRORS
    // =========================================================================
    /// The configuration sources could not be read or parsed.
    #[error("Failed to parse configuration: {0}")]
    ConfigParseError(String),

    /// The configuration was parsed but contains invalid values.
    #[error("Configuration validation failed: {0}")]
    ConfigValidationError(String),

    // =========================================================================
    // REPORT & I/O ERRORS
    // =========================================================================
    /// The CSV report could not be created or written.
    #[error("Failed to write report {}: {source}", path.display())]
    ReportWriteFailed {
        /// Report file path.
        path: PathBuf,
        /// Underlying CSV or I/O failure.
        #[source]
        source: csv::Error,
    },

    /// A low-level I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A specialized [`Result`] type for sysprobe operations.
pub type Result<T> = std::result::Result<T, SysprobeError>;

impl SysprobeError {
    /// Returns `true` if this error came from an external probe capability.
    ///
    /// Probes recover from these locally; they never reach the binary.
    #[inline]
    #[must_use]
    pub const fn is_capability_error(&self) -> bool {
        matches!(
            self,
            Self::PingUnavailable(_)
                | Self::PingOutputUnparseable(_)
                | Self::BluetoothAdapterNotFound
                | Self::BluetoothAdapterPoweredOff
                | Self::BluetoothScanFailed(_)
        )
    }

    /// Returns `true` if this error is related to Bluetooth operations.
    #[inline]
    #[must_use]
    pub const fn is_bluetooth_error(&self) -> bool {
        matches!(
            self,
            Self::BluetoothAdapterNotFound
                | Self::BluetoothAdapterPoweredOff
                | Self::BluetoothScanFailed(_)
        )
    }

    /// Returns `true` if this error is related to configuration.
    #[inline]
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigParseError(_) | Self::ConfigValidationError(_)
        )
    }

    /// Returns `true` if this error should terminate the process.
    #[inline]
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !self.is_capability_error()
    }

    /// Returns a machine-readable error code.
    #[inline]
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::PingUnavailable(_) => "PING_UNAVAILABLE",
            Self::PingOutputUnparseable(_) => "PING_OUTPUT_UNPARSEABLE",
            Self::BluetoothAdapterNotFound => "BLUETOOTH_ADAPTER_NOT_FOUND",
            Self::BluetoothAdapterPoweredOff => "BLUETOOTH_ADAPTER_POWERED_OFF",
            Self::BluetoothScanFailed(_) => "BLUETOOTH_SCAN_FAILED",
            Self::ConfigParseError(_) => "CONFIG_PARSE_ERROR",
            Self::ConfigValidationError(_) => "CONFIG_VALIDATION_ERROR",
            Self::ReportWriteFailed { .. } => "REPORT_WRITE_FAILED",
            Self::IoError(_) => "IO_ERROR",
        }
    }
}

// =============================================================================
// CONVERSIONS FROM LIBRARY ERRORS
// =============================================================================

impl From<config::ConfigError> for SysprobeError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigParseError(err.to_string())
    }
}

#[cfg(feature = "bluetooth")]
impl From<bluer::Error> for SysprobeError {
    fn from(err: bluer::Error) -> Self {
        match &err.kind {
            bluer::ErrorKind::NotFound => Self::BluetoothAdapterNotFound,
            bluer::ErrorKind::NotReady => Self::BluetoothAdapterPoweredOff,
            _ => Self::BluetoothScanFailed(err.to_string()),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
