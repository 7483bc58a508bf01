use super::{RiskAggregation, RiskCounters};
use crate::shared::{GateError, GateResult};
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashMap;

/// Property keys of a persisted scan record.
pub mod keys {
    pub const PACKAGE_IDENTIFICATION: &str = "Sca.PackageIdentification";
    pub const TOTAL_RISKS_COUNT: &str = "Sca.TotalRisksCount";
    pub const LOW_RISKS_COUNT: &str = "Sca.LowRisksCount";
    pub const MEDIUM_RISKS_COUNT: &str = "Sca.MediumRisksCount";
    pub const HIGH_RISKS_COUNT: &str = "Sca.HighRisksCount";
    pub const CRITICAL_RISKS_COUNT: &str = "Sca.CriticalRisksCount";
    pub const RISK_SCORE: &str = "Sca.RiskScore";
    pub const RISK_LEVEL: &str = "Sca.RiskLevel";
    pub const LICENSES: &str = "Sca.Licenses";
    pub const LAST_SCANNED: &str = "Sca.LastScanned";

    pub const IGNORE_THRESHOLD: &str = "Sca.IgnoreThreshold";
    pub const IGNORE_LICENSES: &str = "Sca.IgnoreLicenses";
    pub const PRIVATE_PACKAGE_SUGGESTED: &str = "Sca.PrivatePackageSuggested";

    /// Keys that must all be present for a record to count as complete.
    pub const REQUIRED: [&str; 8] = [
        TOTAL_RISKS_COUNT,
        LOW_RISKS_COUNT,
        MEDIUM_RISKS_COUNT,
        HIGH_RISKS_COUNT,
        CRITICAL_RISKS_COUNT,
        RISK_SCORE,
        RISK_LEVEL,
        LAST_SCANNED,
    ];
}

/// Risk data plus scan time, as written onto every physical location of an artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRecord {
    pub package_identification: Option<String>,
    pub risk: RiskAggregation,
    pub last_scanned: DateTime<Utc>,
}

impl ScanRecord {
    pub fn new(
        package_identification: Option<String>,
        risk: RiskAggregation,
        last_scanned: DateTime<Utc>,
    ) -> Self {
        Self {
            package_identification,
            risk,
            last_scanned,
        }
    }

    pub fn to_properties(&self) -> Vec<(&'static str, String)> {
        let mut properties = Vec::with_capacity(10);
        if let Some(id) = &self.package_identification {
            properties.push((keys::PACKAGE_IDENTIFICATION, id.clone()));
        }
        let licenses: Vec<&str> = self.risk.licenses.iter().map(String::as_str).collect();
        properties.extend([
            (keys::TOTAL_RISKS_COUNT, self.risk.vulnerability_count.to_string()),
            (keys::LOW_RISKS_COUNT, self.risk.low_count.to_string()),
            (keys::MEDIUM_RISKS_COUNT, self.risk.medium_count.to_string()),
            (keys::HIGH_RISKS_COUNT, self.risk.high_count.to_string()),
            (keys::CRITICAL_RISKS_COUNT, self.risk.critical_count.to_string()),
            (keys::RISK_SCORE, self.risk.max_score.to_string()),
            (keys::RISK_LEVEL, self.risk.max_severity.clone()),
            (keys::LICENSES, licenses.join(",")),
            (
                keys::LAST_SCANNED,
                self.last_scanned.to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
        ]);
        properties
    }
}

/// Whether every required key is present.
pub fn is_complete(properties: &HashMap<String, String>) -> bool {
    keys::REQUIRED
        .iter()
        .all(|key| properties.contains_key(*key))
}

/// Parses the `Sca.LastScanned` property, `None` when missing or malformed.
pub fn last_scanned(properties: &HashMap<String, String>) -> Option<DateTime<Utc>> {
    properties
        .get(keys::LAST_SCANNED)
        .and_then(|value| DateTime::parse_from_rfc3339(value.trim()).ok())
        .map(|timestamp| timestamp.with_timezone(&Utc))
}

/// Reads the risk counters of one location.
pub fn read_counters(location: &str, properties: &HashMap<String, String>) -> GateResult<RiskCounters> {
    let read = |key: &str| -> GateResult<u64> {
        properties
            .get(key)
            .and_then(|value| value.trim().parse::<u64>().ok())
            .ok_or_else(|| GateError::InvalidScanRecord {
                location: location.to_string(),
                key: key.to_string(),
            })
    };

    Ok(RiskCounters {
        total: read(keys::TOTAL_RISKS_COUNT)?,
        low: read(keys::LOW_RISKS_COUNT)?,
        medium: read(keys::MEDIUM_RISKS_COUNT)?,
        high: read(keys::HIGH_RISKS_COUNT)?,
        critical: read(keys::CRITICAL_RISKS_COUNT)?,
    })
}

/// Reads the comma-joined license list of one location.
pub fn read_licenses(location: &str, properties: &HashMap<String, String>) -> GateResult<Vec<String>> {
    let raw = properties
        .get(keys::LICENSES)
        .ok_or_else(|| GateError::InvalidScanRecord {
            location: location.to_string(),
            key: keys::LICENSES.to_string(),
        })?;

    Ok(raw
        .split(',')
        .map(str::trim)
        .filter(|license| !license.is_empty())
        .map(String::from)
        .collect())
}
