use super::coordinate_locks::CoordinateLocks;
use crate::application::dto::{ArtifactEvent, ScanOutcome};
use crate::gate::domain::{ScanRecord, ValidCoordinate};
use crate::gate::services::{CoordinateResolver, ScanCache};
use crate::ports::outbound::{MetadataStore, PackageRegistry, RiskRepository};
use crate::shared::{GateError, GateResult};
use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// ScanArtifactUseCase - Refreshes the scan records of one artifact
///
/// Resolution, cache check, remote fetch and persistence, in that order.
/// Every failure ends the scan with `ScanOutcome::Skipped` and leaves the
/// stored records untouched; nothing here blocks a download.
///
/// # Type Parameters
/// * `RR` - RiskRepository implementation
/// * `PR` - PackageRegistry implementation used for Composer resolution
pub struct ScanArtifactUseCase<'a, RR, PR: PackageRegistry> {
    resolver: &'a CoordinateResolver<PR>,
    risk_repository: &'a RR,
    cache: ScanCache,
    locks: &'a CoordinateLocks,
}

impl<'a, RR, PR> ScanArtifactUseCase<'a, RR, PR>
where
    RR: RiskRepository,
    PR: PackageRegistry,
{
    pub fn new(
        resolver: &'a CoordinateResolver<PR>,
        risk_repository: &'a RR,
        cache: ScanCache,
        locks: &'a CoordinateLocks,
    ) -> Self {
        Self {
            resolver,
            risk_repository,
            cache,
            locks,
        }
    }

    pub async fn execute<S: MetadataStore + ?Sized>(
        &self,
        store: &S,
        event: &ArtifactEvent,
        cancel: &CancellationToken,
    ) -> ScanOutcome {
        let artifact = event.artifact_name();

        if self.cache.is_fresh(store, &event.locations) {
            info!(artifact, "Scan skipped, cached risk data is still fresh");
            return ScanOutcome::Fresh;
        }

        let coordinate = tokio::select! {
            biased;
            _ = cancel.cancelled() => return cancelled(artifact),
            coordinate = self.resolver.resolve(
                event.requested.path(),
                &event.layout,
                event.package_manager,
            ) => coordinate,
        };

        let coordinate = match coordinate.to_valid() {
            Ok(coordinate) => coordinate,
            Err(e) => {
                error!(artifact, error = %e, "The artifact coordinate was not resolved correctly");
                return ScanOutcome::skipped("invalid coordinate");
            }
        };

        let _flight = self.locks.acquire(&coordinate.flight_key()).await;

        // A concurrent scan of the same coordinate may have finished while we waited.
        if self.cache.is_fresh(store, &event.locations) {
            debug!(artifact, coordinate = %coordinate, "Scan completed by a concurrent event");
            return ScanOutcome::Fresh;
        }

        info!(artifact, coordinate = %coordinate, "Started artifact verification");

        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(GateError::Cancelled),
            fetched = self.fetch(&coordinate) => fetched,
        };

        let record = match fetched {
            Ok(record) => record,
            Err(GateError::Cancelled) => return cancelled(artifact),
            Err(e) => {
                if e.is_not_found() {
                    error!(artifact, name = %coordinate.name, error = %e, "Artifact not found");
                } else {
                    error!(artifact, name = %coordinate.name, error = %e, "Failed to get the artifact risk data");
                }
                return ScanOutcome::skipped(e.to_string());
            }
        };

        let locations_updated = persist(store, event, &record);
        info!(artifact, locations_updated, "Ended artifact verification");
        ScanOutcome::Scanned { locations_updated }
    }

    /// Artifact info first, then the aggregation under the name the API returned.
    async fn fetch(&self, coordinate: &ValidCoordinate) -> GateResult<ScanRecord> {
        let info = self
            .risk_repository
            .get_artifact_info(&coordinate.package_type, &coordinate.name, &coordinate.version)
            .await?;
        debug!(identifier = ?info.id(), "Artifact identified by the risk API");

        let risk = self
            .risk_repository
            .get_risk_aggregation(&info.package_type, &info.name, &info.version)
            .await?;

        Ok(ScanRecord::new(info.id().map(String::from), risk, Utc::now()))
    }
}

fn cancelled(artifact: &str) -> ScanOutcome {
    warn!(artifact, "Scan cancelled, the stored risk data is left as is");
    ScanOutcome::skipped(GateError::Cancelled.to_string())
}

/// Writes the record to every location; a failing location does not stop the others.
fn persist<S: MetadataStore + ?Sized>(store: &S, event: &ArtifactEvent, record: &ScanRecord) -> usize {
    let properties = record.to_properties();
    event
        .locations
        .iter()
        .filter(|location| {
            match store.set_properties(location, &properties) {
                Ok(()) => true,
                Err(e) => {
                    error!(location = %location, error = %e, "Failed to add risk data to the artifact properties");
                    false
                }
            }
        })
        .count()
}
