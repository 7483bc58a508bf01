use crate::shared::GateResult;
use async_trait::async_trait;

/// One hit from a registry search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySearchHit {
    pub name: String,
    pub repository: String,
}

/// PackageRegistry port for the Composer package registry
///
/// Used by coordinate resolution to turn a `(name, commit reference)` pair
/// into a declared version.
#[async_trait]
pub trait PackageRegistry: Send + Sync {
    /// Returns the version whose source reference equals `reference`
    /// (case-insensitive), or `None` when the registry has no entry or no match
    async fn find_version_by_reference(
        &self,
        name: &str,
        reference: &str,
    ) -> GateResult<Option<String>>;

    /// Searches the registry by free-text term
    async fn search(&self, term: &str) -> GateResult<Vec<RegistrySearchHit>>;
}
