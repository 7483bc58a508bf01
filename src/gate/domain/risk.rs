use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Risk severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Default)]
pub enum Severity {
    #[default]
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "None",
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Severity::None),
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            _ => Err(format!(
                "Invalid severity: {}. Expected one of: none, low, medium, high, critical",
                s
            )),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Aggregated risk data returned by one successful remote fetch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RiskAggregation {
    pub vulnerability_count: u64,
    pub low_count: u64,
    pub medium_count: u64,
    pub high_count: u64,
    pub critical_count: u64,
    /// Severity label as reported by the API (kept verbatim).
    pub max_severity: String,
    pub max_score: f64,
    pub licenses: BTreeSet<String>,
}

impl RiskAggregation {
    pub fn counters(&self) -> RiskCounters {
        RiskCounters {
            total: self.vulnerability_count,
            low: self.low_count,
            medium: self.medium_count,
            high: self.high_count,
            critical: self.critical_count,
        }
    }
}

/// Per-severity risk counts read back from a scan record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RiskCounters {
    pub total: u64,
    pub low: u64,
    pub medium: u64,
    pub high: u64,
    pub critical: u64,
}

impl RiskCounters {
    /// Whether the counts violate `threshold`.
    ///
    /// `Low` blocks on any risk at all; every stricter level blocks on its own
    /// count and everything above it; `None` never blocks.
    pub fn exceeds(&self, threshold: Severity) -> bool {
        let at_or_above_critical = self.critical > 0;
        let at_or_above_high = at_or_above_critical || self.high > 0;
        let at_or_above_medium = at_or_above_high || self.medium > 0;

        match threshold {
            Severity::None => false,
            Severity::Low => at_or_above_medium || self.low > 0 || self.total > 0,
            Severity::Medium => at_or_above_medium,
            Severity::High => at_or_above_high,
            Severity::Critical => at_or_above_critical,
        }
    }
}
