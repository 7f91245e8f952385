//! # sysprobe-core
//!
//! Core logic for the sysprobe connectivity diagnostic harness.
//!
//! This crate provides:
//! - ICMP reachability checks through the host `ping` utility
//! - Bluetooth Low Energy discovery through BlueZ
//! - The three diagnostic probes and the orchestrator that sequences them
//! - CSV report output
//!
//! ## Architecture
//!
//! - [`ping`] - The [`Pinger`] capability and its `ping`-command implementation
//! - [`bluetooth`] - The [`DeviceScanner`] capability and its BlueZ/mock implementations
//! - [`probes`] - Reachability, discovery and repeated-operation probes
//! - [`runner`] - [`Harness`], running the probes in order and writing the report
//! - [`report`] - CSV serialization of the result log
//! - [`config`] - Layered configuration loading and validation
//! - [`error`] - Unified error types for the crate
//! - [`types`] - Outcome records, the result log, and device descriptors

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(missing_docs)]

pub mod bluetooth;
pub mod config;
pub mod error;
pub mod ping;
pub mod probes;
pub mod report;
pub mod runner;
pub mod types;

// Re-export primary types for convenience
#[cfg(feature = "bluetooth")]
pub use bluetooth::BluezScanner;
#[cfg(any(feature = "mock-bluetooth", not(feature = "bluetooth")))]
pub use bluetooth::MockScanner;
pub use bluetooth::{DeviceScanner, DEFAULT_SCAN_DURATION};
pub use config::{default_config_path, HarnessConfig, DEFAULT_TARGET};
pub use error::{Result, SysprobeError};
pub use ping::{parse_rtt, Pinger, SystemPinger};
pub use probes::{check_reachability, discover_devices, repeated_reachability};
pub use report::{write_report, write_report_to};
pub use runner::Harness;
pub use types::{DeviceDescriptor, OutcomeRecord, ProbeOutcome, ResultLog, TestStatus};
