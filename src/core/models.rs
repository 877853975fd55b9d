// src/core/models.rs

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{Display, EnumIter, IntoEnumIterator};

// --- Severity ---

/// Ordinal risk level of a finding: critical > high > medium > low > info.
///
/// The declaration order is the display order used everywhere badges or
/// counters are rendered.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
    Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    /// Single-letter abbreviation used in compact badges ("2C", "1M").
    pub fn letter(self) -> char {
        match self {
            Severity::Critical => 'C',
            Severity::High => 'H',
            Severity::Medium => 'M',
            Severity::Low => 'L',
            Severity::Info => 'I',
        }
    }
}

/// Per-severity counters as the service reports them.
///
/// The service omits severities it has never seen, so every field defaults
/// to zero and unknown keys are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    #[serde(default)]
    pub critical: u64,
    #[serde(default)]
    pub high: u64,
    #[serde(default)]
    pub medium: u64,
    #[serde(default)]
    pub low: u64,
    #[serde(default)]
    pub info: u64,
}

impl SeverityCounts {
    pub fn get(&self, severity: Severity) -> u64 {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
            Severity::Info => self.info,
        }
    }

    pub fn total(&self) -> u64 {
        Severity::iter().map(|s| self.get(s)).sum()
    }

    /// Non-zero counters in display order.
    pub fn non_zero(&self) -> impl Iterator<Item = (Severity, u64)> + '_ {
        Severity::iter()
            .map(|s| (s, self.get(s)))
            .filter(|(_, count)| *count > 0)
    }
}

// --- Scan lifecycle ---

/// Lifecycle status of a scan.
///
/// The service also reports `pending` before a worker picks the scan up and
/// `timeout` when the engine is killed; anything not listed here lands in
/// `Unknown` and is rendered as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ScanStatus {
    Pending,
    Running,
    Completed,
    Error,
    #[serde(other)]
    Unknown,
}

impl ScanStatus {
    pub fn is_finished(self) -> bool {
        !matches!(self, ScanStatus::Pending | ScanStatus::Running)
    }
}

/// Named preset selecting which scanning modules run.
///
/// Profile names outside the known presets are kept verbatim so a newer
/// service does not break the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Profile {
    #[default]
    Full,
    Light,
    Hardening,
    Api,
    Custom,
    Other(String),
}

impl Profile {
    /// The presets offered by the new-scan form, in form order.
    pub const PRESETS: [Profile; 5] = [
        Profile::Full,
        Profile::Light,
        Profile::Hardening,
        Profile::Api,
        Profile::Custom,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Profile::Full => "full",
            Profile::Light => "light",
            Profile::Hardening => "hardening",
            Profile::Api => "api",
            Profile::Custom => "custom",
            Profile::Other(name) => name,
        }
    }
}

impl From<String> for Profile {
    fn from(value: String) -> Self {
        match value.as_str() {
            "full" => Profile::Full,
            "light" => Profile::Light,
            "hardening" => Profile::Hardening,
            "api" => Profile::Api,
            "custom" => Profile::Custom,
            _ => Profile::Other(value),
        }
    }
}

impl From<Profile> for String {
    fn from(value: Profile) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Timestamps ---

/// A wall-clock instant reported by the service.
///
/// The service writes naive ISO-8601 strings (`2025-01-31T12:00:00.123456`);
/// RFC 3339 strings and integer epoch seconds are accepted as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub NaiveDateTime);

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

impl Timestamp {
    pub fn from_epoch_secs(secs: i64) -> Option<Self> {
        DateTime::from_timestamp(secs, 0).map(|dt| Timestamp(dt.naive_utc()))
    }

    pub fn parse(raw: &str) -> Option<Self> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(Timestamp(dt.naive_local()));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(Timestamp)
    }

    pub fn format(&self, pattern: &str) -> String {
        self.0.format(pattern).to_string()
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Secs(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Secs(secs) => Timestamp::from_epoch_secs(secs)
                .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {secs}"))),
            Raw::Text(text) => Timestamp::parse(&text)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {text}"))),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
    }
}

// --- Remote entities ---

/// One execution of the scanning engine against a target URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scan {
    pub id: u64,
    pub url: String,
    #[serde(default)]
    pub profile: Profile,
    pub status: ScanStatus,
    #[serde(default)]
    pub start_time: Option<Timestamp>,
    #[serde(default)]
    pub end_time: Option<Timestamp>,
    #[serde(default)]
    pub total_findings: u64,
    #[serde(default)]
    pub severity_counts: SeverityCounts,
    #[serde(default)]
    pub modules_used: Vec<String>,
    #[serde(default)]
    pub evasion: bool,
    /// Engine failure message, present for errored or timed-out scans.
    #[serde(default)]
    pub error: Option<String>,
}

impl Scan {
    pub fn is_completed(&self) -> bool {
        self.status == ScanStatus::Completed
    }
}

/// One discovered issue belonging to a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub title: String,
    #[serde(default)]
    pub detail: String,
    pub severity: Severity,
    #[serde(default)]
    pub module: String,
}

/// A scan together with its findings, as returned by `GET /api/scans/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanDetail {
    #[serde(flatten)]
    pub scan: Scan,
    #[serde(default)]
    pub findings: Vec<Finding>,
}

/// A finding lifted out of its scan, carrying a back-reference to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedFinding {
    pub finding: Finding,
    pub scan_id: u64,
    pub scan_url: String,
}

impl AnnotatedFinding {
    pub fn new(finding: Finding, scan: &Scan) -> Self {
        Self {
            finding,
            scan_id: scan.id,
            scan_url: scan.url.clone(),
        }
    }

    pub fn severity(&self) -> Severity {
        self.finding.severity
    }
}

/// Server-side aggregate recomputed on every poll. Never mutated locally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    #[serde(default)]
    pub total_scans: u64,
    #[serde(default)]
    pub in_progress: u64,
    #[serde(default)]
    pub latest_scan_id: Option<u64>,
    #[serde(default)]
    pub severity_totals: SeverityCounts,
}

// --- Scan creation ---

/// Default request-rate ceiling the service applies when none is given.
pub const DEFAULT_MAX_RPS: u32 = 6;

/// Body of `POST /api/scans`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewScanRequest {
    pub url: String,
    pub profile: Profile,
    /// Comma-separated module list; only read by the service for `custom`.
    pub modules: String,
    pub max_rps: u32,
    pub evasion: bool,
}

impl NewScanRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            profile: Profile::Full,
            modules: String::new(),
            max_rps: DEFAULT_MAX_RPS,
            evasion: false,
        }
    }
}

/// Acknowledgement returned by the service for an accepted scan.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedScan {
    pub scan_id: u64,
    pub status: ScanStatus,
}
