//! ICMP reachability through the host `ping` utility.
//!
//! Building ICMP packets needs raw sockets and elevated privileges, so the
//! harness asks the system `ping` binary for a single echo and reads the
//! round-trip time from its output.

use std::net::IpAddr;
use std::process::Command;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::{Result, SysprobeError};

/// Matches `time=12.5 ms` (Linux, macOS) and `time<1ms` (sub-millisecond replies).
static RTT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"time[=<]\s*(?P<rtt>\d+(?:\.\d+)?)\s*ms").expect("RTT pattern is valid")
});

/// A reachability check against one host.
pub trait Pinger {
    /// Send one echo request to `target`.
    ///
    /// Returns `Ok(Some(rtt_ms))` on a reply, `Ok(None)` when the host did
    /// not answer.
    ///
    /// # Errors
    ///
    /// Returns an error if the check itself could not be performed.
    fn ping(&self, target: IpAddr) -> Result<Option<f64>>;
}

impl<P: Pinger + ?Sized> Pinger for &P {
    fn ping(&self, target: IpAddr) -> Result<Option<f64>> {
        (**self).ping(target)
    }
}

/// [`Pinger`] backed by the system `ping` command.
#[derive(Debug, Clone, Default)]
pub struct SystemPinger {
    timeout: Option<Duration>,
}

impl SystemPinger {
    /// Use the utility's own reply timeout.
    #[must_use]
    pub const fn new() -> Self {
        Self { timeout: None }
    }

    /// Wait at most `timeout` for the reply.
    #[must_use]
    pub const fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }

    /// Arguments passed to `ping` for one echo request.
    fn args(&self, target: IpAddr) -> Vec<String> {
        let mut args = vec!["-c".to_string(), "1".to_string()];
        if let Some(timeout) = self.timeout {
            let secs = timeout.as_secs().max(1).to_string();
            // BSD ping uses -W for per-packet wait in milliseconds; -t is the overall deadline.
            #[cfg(target_os = "macos")]
            args.extend(["-t".to_string(), secs]);
            #[cfg(not(target_os = "macos"))]
            args.extend(["-W".to_string(), secs]);
        }
        if target.is_ipv6() && cfg!(target_os = "linux") {
            args.push("-6".to_string());
        }
        args.push(target.to_string());
        args
    }
}

impl Pinger for SystemPinger {
    fn ping(&self, target: IpAddr) -> Result<Option<f64>> {
        let args = self.args(target);
        debug!(?args, "Running ping");

        let output = Command::new("ping")
            .args(&args)
            .output()
            .map_err(SysprobeError::PingUnavailable)?;

        if !output.status.success() {
            debug!(status = %output.status, "ping reported no reply");
            return Ok(None);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_rtt(&stdout)
            .map(Some)
            .ok_or_else(|| SysprobeError::PingOutputUnparseable(stdout.trim().to_string()))
    }
}

/// Extract the round-trip time in milliseconds from `ping` output.
#[must_use]
pub fn parse_rtt(output: &str) -> Option<f64> {
    RTT_PATTERN
        .captures(output)
        .and_then(|caps| caps.name("rtt"))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_parse_rtt_linux_output() {
        let output = "PING 8.8.8.8 (8.8.8.8) 56(84) bytes of data.\n\
                      64 bytes from 8.8.8.8: icmp_seq=1 ttl=117 time=12.5 ms\n\n\
                      --- 8.8.8.8 ping statistics ---\n\
                      1 packets transmitted, 1 received, 0% packet loss, time 0ms\n";
        assert_eq!(parse_rtt(output), Some(12.5));
    }

    #[test]
    fn test_parse_rtt_macos_output() {
        let output = "64 bytes from 8.8.8.8: icmp_seq=0 ttl=117 time=9.812 ms";
        assert_eq!(parse_rtt(output), Some(9.812));
    }

    #[test]
    fn test_parse_rtt_sub_millisecond() {
        assert_eq!(parse_rtt("Reply from 127.0.0.1: bytes=32 time<1ms TTL=128"), Some(1.0));
    }

    #[test]
    fn test_parse_rtt_without_reply() {
        assert_eq!(parse_rtt("1 packets transmitted, 0 received, 100% packet loss"), None);
    }

    #[test]
    fn test_args_default_timeout() {
        let args = SystemPinger::new().args(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)));
        assert_eq!(args, ["-c", "1", "8.8.8.8"]);
    }

    #[test]
    fn test_args_with_timeout() {
        let args = SystemPinger::with_timeout(Duration::from_secs(2))
            .args(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)));
        assert_eq!(args.len(), 5);
        assert_eq!(args[3], "2");
        assert_eq!(args.last().map(String::as_str), Some("8.8.8.8"));
    }
}
