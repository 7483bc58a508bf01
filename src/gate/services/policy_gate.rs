use crate::gate::domain::scan_record::{self, keys};
use crate::gate::domain::{Decision, PhysicalLocation, PolicyConfig, PolicyViolation, Severity};
use crate::ports::outbound::MetadataStore;
use crate::shared::Result;
use tracing::{debug, error, warn};

/// Evaluates stored scan records against the security threshold and the license allow-list
///
/// Both checks follow the same shape: every location is first scanned for its
/// ignore flag (any `true` skips the check), then only the first location is
/// evaluated.
///
/// The checks are independent. A failing check does not stop the other one,
/// and a block from either wins. When nothing blocks, the first error
/// (unreadable counters, store failures) is returned to the caller, which
/// treats it as fail-open.
#[derive(Debug, Clone, Default)]
pub struct PolicyGate {
    config: PolicyConfig,
}

impl PolicyGate {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Runs the threshold check, then the license check.
    pub fn evaluate<S: MetadataStore + ?Sized>(
        &self,
        store: &S,
        artifact: &str,
        locations: &[PhysicalLocation],
    ) -> Result<Decision> {
        let threshold = self.check_security_threshold(store, artifact, locations);
        if let Ok(Some(violation)) = &threshold {
            return Ok(Decision::Block(violation.clone()));
        }

        match self.check_license_allowance(store, artifact, locations) {
            Ok(Some(violation)) => {
                if let Err(e) = &threshold {
                    error!(artifact, error = %e, "Failed to check the security risk threshold");
                }
                Ok(Decision::Block(violation))
            }
            Ok(None) => threshold.map(|_| Decision::Allow),
            Err(e) => {
                if let Err(threshold_error) = &threshold {
                    error!(artifact, error = %threshold_error, "Failed to check the security risk threshold");
                }
                Err(e)
            }
        }
    }

    pub fn check_security_threshold<S: MetadataStore + ?Sized>(
        &self,
        store: &S,
        artifact: &str,
        locations: &[PhysicalLocation],
    ) -> Result<Option<PolicyViolation>> {
        if self.config.threshold == Severity::None {
            return Ok(None);
        }
        let Some(first) = first_location(artifact, locations) else {
            return Ok(None);
        };

        if is_ignored(store, locations, keys::IGNORE_THRESHOLD)? {
            warn!(
                artifact,
                property = keys::IGNORE_THRESHOLD,
                "Ignoring the security risk threshold, artifact property is \"true\""
            );
            return Ok(None);
        }

        let threshold = self.config.threshold;
        debug!(%threshold, "Security risk threshold configured");

        let properties = store.get_all_properties(first)?;
        let counters = scan_record::read_counters(&first.to_string(), &properties)?;

        if counters.exceeds(threshold) {
            return Ok(Some(PolicyViolation::security_threshold(artifact)));
        }
        Ok(None)
    }

    pub fn check_license_allowance<S: MetadataStore + ?Sized>(
        &self,
        store: &S,
        artifact: &str,
        locations: &[PhysicalLocation],
    ) -> Result<Option<PolicyViolation>> {
        let Some(first) = first_location(artifact, locations) else {
            return Ok(None);
        };

        if is_ignored(store, locations, keys::IGNORE_LICENSES)? {
            warn!(
                artifact,
                property = keys::IGNORE_LICENSES,
                "Ignoring the license allowance, artifact property is \"true\""
            );
            return Ok(None);
        }

        let allowed = &self.config.allowed_licenses;
        debug!(allowed = ?allowed.entries(), "License allowance configured");

        if allowed.is_empty() {
            return Ok(None);
        }
        if allowed.forbids_all() {
            return Ok(Some(PolicyViolation::license(artifact)));
        }

        let properties = store.get_all_properties(first)?;
        let licenses = scan_record::read_licenses(&first.to_string(), &properties)?;

        if !allowed.allows_any(&licenses) {
            return Ok(Some(PolicyViolation::license(artifact)));
        }
        Ok(None)
    }
}

fn first_location<'a>(artifact: &str, locations: &'a [PhysicalLocation]) -> Option<&'a PhysicalLocation> {
    if locations.len() > 1 {
        warn!(artifact, count = locations.len(), "More than one physical location found for the artifact");
    }
    locations.first()
}

/// Whether any location sets `key` (matched case-insensitively) to `true`.
fn is_ignored<S: MetadataStore + ?Sized>(
    store: &S,
    locations: &[PhysicalLocation],
    key: &str,
) -> Result<bool> {
    for location in locations {
        let properties = store.get_all_properties(location)?;
        let flag = properties
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.trim());
        if flag.is_some_and(|v| v.eq_ignore_ascii_case("true")) {
            return Ok(true);
        }
    }
    Ok(false)
}
