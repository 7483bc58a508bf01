use artifact_gate::prelude::*;
use std::collections::HashMap;

/// MetadataStore that fails writes for one repository and delegates everything else
pub struct FailingMetadataStore {
    pub inner: InMemoryMetadataStore,
    pub failing_repo: String,
}

impl FailingMetadataStore {
    pub fn new(inner: InMemoryMetadataStore, failing_repo: &str) -> Self {
        Self {
            inner,
            failing_repo: failing_repo.to_string(),
        }
    }
}

impl MetadataStore for FailingMetadataStore {
    fn exists(&self, location: &PhysicalLocation) -> Result<bool> {
        self.inner.exists(location)
    }

    fn get_property(&self, location: &PhysicalLocation, key: &str) -> Result<Option<String>> {
        self.inner.get_property(location, key)
    }

    fn get_all_properties(&self, location: &PhysicalLocation) -> Result<HashMap<String, String>> {
        self.inner.get_all_properties(location)
    }

    fn set_property(&self, location: &PhysicalLocation, key: &str, value: &str) -> Result<()> {
        if location.repo_key() == self.failing_repo {
            anyhow::bail!("Mock metadata store write failure for {}", location);
        }
        self.inner.set_property(location, key, value)
    }
}
