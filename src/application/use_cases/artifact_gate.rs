use super::coordinate_locks::CoordinateLocks;
use super::enforce_policy::EnforcePolicyUseCase;
use super::scan_artifact::ScanArtifactUseCase;
use super::suggest_private_package::{SuggestPrivatePackageUseCase, SuggestionOutcome};
use crate::application::dto::{ArtifactEvent, ScanOutcome};
use crate::gate::domain::Decision;
use crate::gate::services::artifact_filter;
use crate::gate::services::{CoordinateResolver, PolicyGate, ScanCache};
use crate::ports::inbound::ArtifactGatePort;
use crate::ports::outbound::{MetadataStore, PackageRegistry, RiskRepository};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info_span, warn, Instrument};
use uuid::Uuid;

/// ArtifactGate - The download gate and upload hook
///
/// Owns the object graph built by the composition root and runs, per event,
/// the scan stage followed by the policy stage.
///
/// # Type Parameters
/// * `S` - MetadataStore implementation
/// * `RR` - RiskRepository implementation
/// * `PR` - PackageRegistry implementation
pub struct ArtifactGate<S, RR, PR: PackageRegistry> {
    store: S,
    risk_repository: RR,
    resolver: CoordinateResolver<PR>,
    cache: ScanCache,
    policy: PolicyGate,
    locks: CoordinateLocks,
}

impl<S, RR, PR> ArtifactGate<S, RR, PR>
where
    S: MetadataStore,
    RR: RiskRepository,
    PR: PackageRegistry,
{
    pub fn new(
        store: S,
        risk_repository: RR,
        registry: PR,
        cache: ScanCache,
        policy: PolicyGate,
    ) -> Self {
        Self {
            store,
            risk_repository,
            resolver: CoordinateResolver::new(registry),
            cache,
            policy,
            locks: CoordinateLocks::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn risk_repository(&self) -> &RR {
        &self.risk_repository
    }

    pub fn resolver(&self) -> &CoordinateResolver<PR> {
        &self.resolver
    }

    /// Runs only the scan stage
    pub async fn scan(&self, event: &ArtifactEvent, cancel: &CancellationToken) -> ScanOutcome {
        ScanArtifactUseCase::new(&self.resolver, &self.risk_repository, self.cache, &self.locks)
            .execute(&self.store, event, cancel)
            .await
    }

    /// Runs only the policy stage
    pub fn enforce(&self, event: &ArtifactEvent) -> Decision {
        EnforcePolicyUseCase::new(&self.policy).execute(
            &self.store,
            event.artifact_name(),
            &event.locations,
        )
    }

    pub async fn suggest_private_package(&self, event: &ArtifactEvent) -> SuggestionOutcome {
        SuggestPrivatePackageUseCase::new(&self.resolver, &self.risk_repository)
            .execute(&self.store, event)
            .await
    }

    async fn run_before_download(&self, event: &ArtifactEvent, cancel: CancellationToken) -> Decision {
        let artifact = event.artifact_name();

        if event.locations.is_empty() {
            warn!(artifact, "Artifact not found in any repository");
            return Decision::Allow;
        }

        if !artifact_filter::is_scannable(event.package_manager, event.requested.path()) {
            debug!(artifact, "Not a package archive, ignored");
            return Decision::Allow;
        }

        let outcome = self.scan(event, &cancel).await;
        debug!(artifact, ?outcome, "Scan stage finished");

        self.enforce(event)
    }
}

#[async_trait]
impl<S, RR, PR> ArtifactGatePort for ArtifactGate<S, RR, PR>
where
    S: MetadataStore,
    RR: RiskRepository,
    PR: PackageRegistry,
{
    async fn before_download(&self, event: &ArtifactEvent, cancel: CancellationToken) -> Decision {
        let span = info_span!(
            "before_download",
            event_id = %Uuid::new_v4(),
            artifact = event.artifact_name(),
            package_manager = %event.package_manager,
        );
        self.run_before_download(event, cancel).instrument(span).await
    }

    async fn after_upload(&self, event: &ArtifactEvent) {
        let span = info_span!(
            "after_upload",
            event_id = %Uuid::new_v4(),
            artifact = event.artifact_name(),
            package_manager = %event.package_manager,
        );
        let outcome = self.suggest_private_package(event).instrument(span).await;
        debug!(artifact = event.artifact_name(), ?outcome, "Upload hook finished");
    }
}
