use artifact_gate::prelude::*;
use artifact_gate::ports::outbound::RegistrySearchHit;
use async_trait::async_trait;
use std::collections::HashMap;

/// Mock PackageRegistry for testing Composer resolution
pub struct MockPackageRegistry {
    /// `name -> [(reference, version)]`
    pub versions: HashMap<String, Vec<(String, String)>>,
    pub hits: Vec<RegistrySearchHit>,
}

impl MockPackageRegistry {
    pub fn new() -> Self {
        Self {
            versions: HashMap::new(),
            hits: Vec::new(),
        }
    }

    pub fn with_version(mut self, name: &str, reference: &str, version: &str) -> Self {
        self.versions
            .entry(name.to_string())
            .or_default()
            .push((reference.to_string(), version.to_string()));
        self
    }

    pub fn with_hit(mut self, name: &str, repository: &str) -> Self {
        self.hits.push(RegistrySearchHit {
            name: name.to_string(),
            repository: repository.to_string(),
        });
        self
    }
}

impl Default for MockPackageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PackageRegistry for MockPackageRegistry {
    async fn find_version_by_reference(
        &self,
        name: &str,
        reference: &str,
    ) -> GateResult<Option<String>> {
        Ok(self.versions.get(name).and_then(|versions| {
            versions
                .iter()
                .find(|(r, _)| r.eq_ignore_ascii_case(reference))
                .map(|(_, v)| v.clone())
        }))
    }

    async fn search(&self, _term: &str) -> GateResult<Vec<RegistrySearchHit>> {
        Ok(self.hits.clone())
    }
}
