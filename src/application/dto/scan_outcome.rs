use serde::Serialize;

/// ScanOutcome - What the scan stage did for one event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// Every location already had a fresh record
    Fresh,
    /// Risk data was fetched and written to `locations_updated` locations
    Scanned { locations_updated: usize },
    /// Nothing was fetched; the stored records are left as they were
    Skipped { reason: String },
}

impl ScanOutcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        ScanOutcome::Skipped {
            reason: reason.into(),
        }
    }
}
