use crate::gate::domain::{ArtifactInfo, RiskAggregation, ValidCoordinate, Vulnerability};
use crate::shared::GateResult;
use async_trait::async_trait;

/// RiskRepository port for the third-party risk and license API
///
/// Errors use the `GateError` taxonomy so callers can tell a 404 from a
/// transport failure. Every error is fail-open at the pipeline boundary.
///
/// # Async Support
/// Implementations must be `Send + Sync` to support concurrent artifact events.
#[async_trait]
pub trait RiskRepository: Send + Sync {
    /// Whether authenticated endpoints are available
    fn is_authenticated(&self) -> bool;

    /// Fetches package metadata for a coordinate
    ///
    /// # Errors
    /// - `UnexpectedResponseCode(404)` when the package is unknown (after any fallback)
    /// - `UnexpectedResponseCode(code)` for any other non-200
    /// - `UnexpectedResponseBody` when a 200 carries no usable body
    async fn get_artifact_info(
        &self,
        package_type: &str,
        name: &str,
        version: &str,
    ) -> GateResult<ArtifactInfo>;

    /// Fetches the aggregated risk counts, merged with a best-effort license lookup
    async fn get_risk_aggregation(
        &self,
        package_type: &str,
        name: &str,
        version: &str,
    ) -> GateResult<RiskAggregation>;

    /// Fetches the vulnerabilities of a package by its opaque identifier (authenticated)
    async fn get_vulnerabilities(&self, identifier: &str) -> GateResult<Vec<Vulnerability>>;

    /// Declares a package as privately resolved (authenticated)
    async fn suggest_private_package(&self, coordinate: &ValidCoordinate) -> GateResult<bool>;
}
