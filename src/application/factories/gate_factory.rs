use crate::adapters::outbound::network::{AccessTokenManager, PackagistClient, RiskApiClient};
use crate::application::use_cases::ArtifactGate;
use crate::config::GateSettings;
use crate::gate::services::{CoordinateResolver, PolicyGate, ScanCache};
use crate::ports::outbound::MetadataStore;
use crate::shared::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// The gate wired with the HTTP adapters
pub type DefaultGate<S> = ArtifactGate<S, RiskApiClient, PackagistClient>;

/// Composition root for the gate
///
/// Builds the object graph from validated settings. Authentication failures
/// never abort construction: the gate falls back to unauthenticated mode,
/// where only public endpoints are used.
pub struct GateFactory;

impl GateFactory {
    /// Builds the full gate over `store`
    pub async fn create<S: MetadataStore>(settings: &GateSettings, store: S) -> Result<DefaultGate<S>> {
        let risk_client = Self::create_risk_client(settings).await?;
        let registry = PackagistClient::new(&settings.packagist_url)?;

        Ok(ArtifactGate::new(
            store,
            risk_client,
            registry,
            ScanCache::new(settings.ttl),
            PolicyGate::new(settings.policy.clone()),
        ))
    }

    /// Builds the risk API client, authenticating when credentials are configured
    pub async fn create_risk_client(settings: &GateSettings) -> Result<RiskApiClient> {
        let client = RiskApiClient::new(&settings.api_url)?;

        let Some(credentials) = settings.credentials.clone() else {
            info!("No credentials configured, running unauthenticated");
            return Ok(client);
        };

        let token_manager = AccessTokenManager::new(&settings.authentication_url)?;
        if token_manager.authenticate(credentials).await {
            Ok(client
                .with_token_manager(Arc::new(token_manager))
                .with_private_packages(settings.private_packages_endpoint))
        } else {
            warn!("Authentication failed, running unauthenticated");
            Ok(client)
        }
    }

    /// Builds a standalone coordinate resolver backed by the configured Composer registry
    pub fn create_resolver(settings: &GateSettings) -> Result<CoordinateResolver<PackagistClient>> {
        Ok(CoordinateResolver::new(PackagistClient::new(&settings.packagist_url)?))
    }
}
