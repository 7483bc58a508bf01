use crate::gate::domain::scan_record;
use crate::gate::domain::PhysicalLocation;
use crate::ports::outbound::MetadataStore;
use crate::shared::Result;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, error, warn};

/// Lifetime of a scan record before it is considered stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanTtl(i64);

impl ScanTtl {
    pub const DEFAULT_SECONDS: i64 = 21600;
    pub const MIN_SECONDS: i64 = 1800;
    pub const MAX_SECONDS: i64 = 31_536_000;

    /// Builds a TTL from seconds, clamping to `[MIN_SECONDS, MAX_SECONDS]`.
    pub fn from_seconds(seconds: i64) -> Self {
        if seconds < Self::MIN_SECONDS {
            warn!(
                configured = seconds,
                minimum = Self::MIN_SECONDS,
                "Data expiration time is below the minimum, using the minimum"
            );
            return Self(Self::MIN_SECONDS);
        }
        if seconds > Self::MAX_SECONDS {
            warn!(
                configured = seconds,
                maximum = Self::MAX_SECONDS,
                "Data expiration time is above the maximum, using the maximum"
            );
            return Self(Self::MAX_SECONDS);
        }
        Self(seconds)
    }

    /// Parses a configured value; anything non-numeric falls back to the default.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<i64>() {
            Ok(seconds) => Self::from_seconds(seconds),
            Err(e) => {
                warn!(
                    value = raw,
                    error = %e,
                    default = Self::DEFAULT_SECONDS,
                    "Invalid data expiration time, using the default"
                );
                Self::default()
            }
        }
    }

    pub fn seconds(&self) -> i64 {
        self.0
    }
}

impl Default for ScanTtl {
    fn default() -> Self {
        Self(Self::DEFAULT_SECONDS)
    }
}

/// Decides whether the scan records of an artifact are still fresh
///
/// Fresh means every physical location exists, carries a complete record and
/// was scanned less than one TTL ago. Anything else, including store errors,
/// means the artifact must be scanned again.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanCache {
    ttl: ScanTtl,
}

impl ScanCache {
    pub fn new(ttl: ScanTtl) -> Self {
        Self { ttl }
    }

    pub fn ttl(&self) -> ScanTtl {
        self.ttl
    }

    pub fn is_fresh<S: MetadataStore + ?Sized>(&self, store: &S, locations: &[PhysicalLocation]) -> bool {
        self.is_fresh_at(store, locations, Utc::now())
    }

    pub fn is_fresh_at<S: MetadataStore + ?Sized>(
        &self,
        store: &S,
        locations: &[PhysicalLocation],
        now: DateTime<Utc>,
    ) -> bool {
        if locations.is_empty() {
            return false;
        }

        locations.iter().all(|location| {
            self.location_is_fresh(store, location, now)
                .unwrap_or_else(|e| {
                    error!(
                        location = %location,
                        error = %e,
                        "Unexpected error when checking the last scan date"
                    );
                    false
                })
        })
    }

    fn location_is_fresh<S: MetadataStore + ?Sized>(
        &self,
        store: &S,
        location: &PhysicalLocation,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        if !store.exists(location)? {
            return Ok(false);
        }

        let properties = store.get_all_properties(location)?;
        if !scan_record::is_complete(&properties) {
            debug!(location = %location, "Scan record is incomplete, the artifact will be scanned");
            return Ok(false);
        }

        let Some(last_scanned) = scan_record::last_scanned(&properties) else {
            debug!(location = %location, "Scan date is unreadable, the artifact will be scanned");
            return Ok(false);
        };

        let expiry = Duration::try_seconds(self.ttl.seconds())
            .and_then(|ttl| last_scanned.checked_add_signed(ttl));
        match expiry {
            Some(expiry) => Ok(now < expiry),
            None => {
                debug!(location = %location, "Scan date is out of range, the artifact will be scanned");
                Ok(false)
            }
        }
    }
}
