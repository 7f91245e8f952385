//! # sysprobe-cli
//!
//! Command-line front end for the sysprobe diagnostic harness.
//!
//! This library provides argument parsing and diagnostic log setup for the
//! `sysprobe` binary.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod cli;
pub mod logging;
