use crate::application::dto::ArtifactEvent;
use crate::gate::domain::scan_record::keys;
use crate::gate::services::CoordinateResolver;
use crate::ports::outbound::{MetadataStore, PackageRegistry, RiskRepository};
use tracing::{debug, error, info};

/// SuggestPrivatePackageUseCase - Declares uploaded packages as privately resolved
///
/// Runs once per location: a successful suggestion marks the uploaded
/// location with `Sca.PrivatePackageSuggested=true` and later uploads skip it.
pub struct SuggestPrivatePackageUseCase<'a, RR, PR: PackageRegistry> {
    resolver: &'a CoordinateResolver<PR>,
    risk_repository: &'a RR,
}

/// What the suggestion flow did for one upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionOutcome {
    Suggested,
    /// Suggested upstream, but the marker could not be written; the next upload suggests again
    SuggestedUnmarked,
    AlreadySuggested,
    Skipped,
}

impl<'a, RR, PR> SuggestPrivatePackageUseCase<'a, RR, PR>
where
    RR: RiskRepository,
    PR: PackageRegistry,
{
    pub fn new(resolver: &'a CoordinateResolver<PR>, risk_repository: &'a RR) -> Self {
        Self {
            resolver,
            risk_repository,
        }
    }

    pub async fn execute<S: MetadataStore + ?Sized>(
        &self,
        store: &S,
        event: &ArtifactEvent,
    ) -> SuggestionOutcome {
        let artifact = event.artifact_name();

        if !self.risk_repository.is_authenticated() {
            debug!(artifact, "Private package suggestion needs credentials, skipped");
            return SuggestionOutcome::Skipped;
        }

        if !event.locations.contains(&event.requested) {
            debug!(artifact, "Uploaded path is not one of the physical locations, skipped");
            return SuggestionOutcome::Skipped;
        }

        match store.get_property(&event.requested, keys::PRIVATE_PACKAGE_SUGGESTED) {
            Ok(Some(_)) => return SuggestionOutcome::AlreadySuggested,
            Ok(None) => {}
            Err(e) => {
                error!(artifact, error = %e, "Failed to read the artifact properties");
                return SuggestionOutcome::Skipped;
            }
        }

        let coordinate = self
            .resolver
            .resolve(event.requested.path(), &event.layout, event.package_manager)
            .await;
        let coordinate = match coordinate.to_valid() {
            Ok(coordinate) => coordinate,
            Err(e) => {
                error!(artifact, error = %e, "The artifact coordinate was not resolved correctly");
                return SuggestionOutcome::Skipped;
            }
        };

        match self.risk_repository.suggest_private_package(&coordinate).await {
            Ok(true) => {}
            Ok(false) => return SuggestionOutcome::Skipped,
            Err(e) => {
                error!(artifact, coordinate = %coordinate, error = %e, "Failed to suggest the private package");
                return SuggestionOutcome::Skipped;
            }
        }

        if let Err(e) = store.set_property(&event.requested, keys::PRIVATE_PACKAGE_SUGGESTED, "true") {
            error!(artifact, coordinate = %coordinate, error = %e, "Failed to mark the artifact as suggested");
            return SuggestionOutcome::SuggestedUnmarked;
        }
        info!(artifact, coordinate = %coordinate, "Private package suggested");
        SuggestionOutcome::Suggested
    }
}
