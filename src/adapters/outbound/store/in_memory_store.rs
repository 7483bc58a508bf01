use crate::gate::domain::PhysicalLocation;
use crate::ports::outbound::MetadataStore;
use crate::shared::Result;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

type Properties = HashMap<String, String>;

/// InMemoryMetadataStore adapter holding properties in process memory
///
/// Cloning shares the underlying map, so a host and the gate can observe
/// the same records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMetadataStore {
    locations: Arc<Mutex<HashMap<PhysicalLocation, Properties>>>,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a location with no properties
    pub fn add_location(&self, location: PhysicalLocation) {
        self.lock().entry(location).or_default();
    }

    /// Builder-style variant of [`Self::add_location`]
    pub fn with_location(self, location: PhysicalLocation) -> Self {
        self.add_location(location);
        self
    }

    pub fn snapshot(&self, location: &PhysicalLocation) -> Option<Properties> {
        self.lock().get(location).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PhysicalLocation, Properties>> {
        self.locations.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MetadataStore for InMemoryMetadataStore {
    fn exists(&self, location: &PhysicalLocation) -> Result<bool> {
        Ok(self.lock().contains_key(location))
    }

    fn get_property(&self, location: &PhysicalLocation, key: &str) -> Result<Option<String>> {
        Ok(self
            .lock()
            .get(location)
            .and_then(|properties| properties.get(key).cloned()))
    }

    fn get_all_properties(&self, location: &PhysicalLocation) -> Result<Properties> {
        Ok(self.lock().get(location).cloned().unwrap_or_default())
    }

    fn set_property(&self, location: &PhysicalLocation, key: &str, value: &str) -> Result<()> {
        self.lock()
            .entry(location.clone())
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let location = PhysicalLocation::new("npm-remote", "lodash/-/lodash-0.2.1.tgz");
        let store = InMemoryMetadataStore::new();
        let host_view = store.clone();

        assert!(!store.exists(&location).unwrap());
        store.set_property(&location, "Sca.RiskLevel", "High").unwrap();

        assert!(host_view.exists(&location).unwrap());
        assert_eq!(
            host_view.get_property(&location, "Sca.RiskLevel").unwrap().as_deref(),
            Some("High")
        );
    }

    #[test]
    fn test_unknown_location_has_no_properties() {
        let store = InMemoryMetadataStore::new();
        let location = PhysicalLocation::new("pypi-remote", "x");
        assert!(store.get_all_properties(&location).unwrap().is_empty());
        assert_eq!(store.get_property(&location, "k").unwrap(), None);
    }

    #[test]
    fn test_add_location_keeps_existing_properties() {
        let location = PhysicalLocation::new("npm-remote", "a.tgz");
        let store = InMemoryMetadataStore::new().with_location(location.clone());
        store.set_property(&location, "k", "v").unwrap();
        store.add_location(location.clone());
        assert_eq!(store.snapshot(&location).unwrap().len(), 1);
    }
}
