//! Shared data model: outcome records, the result log, and device descriptors.

use std::fmt;

use serde::Serialize;

/// Final status of one probe run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TestStatus {
    /// The probe's capability answered positively.
    Pass,
    /// The capability failed or answered negatively.
    Fail,
}

impl TestStatus {
    /// Label written to the report.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "Pass",
            Self::Fail => "Fail",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a probe returns to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Success, with human-readable details.
    Pass(String),
    /// Failure, with the reason.
    Fail(String),
}

impl ProbeOutcome {
    /// Status half of the outcome.
    #[must_use]
    pub const fn status(&self) -> TestStatus {
        match self {
            Self::Pass(_) => TestStatus::Pass,
            Self::Fail(_) => TestStatus::Fail,
        }
    }

    /// Attach a test name, producing the record stored in the log.
    #[must_use]
    pub fn into_record(self, test: impl Into<String>) -> OutcomeRecord {
        let status = self.status();
        let details = match self {
            Self::Pass(details) | Self::Fail(details) => details,
        };
        OutcomeRecord {
            test: test.into(),
            status,
            details,
        }
    }
}

/// One row of the report.
///
/// Fields are private so a record cannot change after the probe produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeRecord {
    #[serde(rename = "Test")]
    test: String,
    #[serde(rename = "Status")]
    status: TestStatus,
    #[serde(rename = "Details")]
    details: String,
}

impl OutcomeRecord {
    /// Build a record directly.
    #[must_use]
    pub fn new(test: impl Into<String>, status: TestStatus, details: impl Into<String>) -> Self {
        Self {
            test: test.into(),
            status,
            details: details.into(),
        }
    }

    /// Name of the test that produced this record.
    #[must_use]
    pub fn test(&self) -> &str {
        &self.test
    }

    /// Pass or fail.
    #[must_use]
    pub const fn status(&self) -> TestStatus {
        self.status
    }

    /// Free-text details or failure reason.
    #[must_use]
    pub fn details(&self) -> &str {
        &self.details
    }
}

/// Ordered, append-only collection of outcome records for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultLog {
    records: Vec<OutcomeRecord>,
}

impl ResultLog {
    /// An empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append a record at the end.
    pub fn push(&mut self, record: OutcomeRecord) {
        self.records.push(record);
    }

    /// Records in execution order.
    #[must_use]
    pub fn records(&self) -> &[OutcomeRecord] {
        &self.records
    }

    /// Iterate over records in execution order.
    pub fn iter(&self) -> std::slice::Iter<'_, OutcomeRecord> {
        self.records.iter()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no probe has reported yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of failed records.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.status == TestStatus::Fail)
            .count()
    }
}

impl<'a> IntoIterator for &'a ResultLog {
    type Item = &'a OutcomeRecord;
    type IntoIter = std::slice::Iter<'a, OutcomeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// A peripheral seen during a Bluetooth scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Advertised name, if the device broadcast one.
    pub name: Option<String>,
    /// Bluetooth MAC address, e.g. `AA:BB:CC:DD:EE:FF`.
    pub address: String,
}

impl DeviceDescriptor {
    /// Create a descriptor.
    #[must_use]
    pub fn new(name: Option<&str>, address: impl Into<String>) -> Self {
        Self {
            name: name.map(str::to_owned),
            address: address.into(),
        }
    }
}

/// Renders as a Python-style tuple: `('Speaker', 'AA:BB:CC:DD:EE:FF')`.
impl fmt::Display for DeviceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        match &self.name {
            Some(name) => write_quoted(f, name)?,
            None => f.write_str("None")?,
        }
        f.write_str(", ")?;
        write_quoted(f, &self.address)?;
        f.write_str(")")
    }
}

/// Single-quote `s`, switching to double quotes when it contains only `'`.
fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    write!(f, "{quote}")?;
    for c in s.chars() {
        if c == quote || c == '\\' {
            write!(f, "\\")?;
        }
        write!(f, "{c}")?;
    }
    write!(f, "{quote}")
}
