use crate::gate::domain::PhysicalLocation;
use crate::shared::Result;
use std::collections::HashMap;

/// MetadataStore port for the host's per-artifact property store
///
/// Scan records are persisted here, one property per key, on every physical
/// location of an artifact. The gate depends only on this narrow interface,
/// not on any host repository model.
///
/// Implementations must be `Send + Sync`; concurrent writers to the same
/// location resolve as last-write-wins.
pub trait MetadataStore: Send + Sync {
    /// Whether the location exists in the host repository
    fn exists(&self, location: &PhysicalLocation) -> Result<bool>;

    /// Reads one property, `None` when unset
    fn get_property(&self, location: &PhysicalLocation, key: &str) -> Result<Option<String>>;

    /// Reads every property of a location, empty when the location is unknown
    ///
    /// # Errors
    /// Returns an error if the store cannot be read
    fn get_all_properties(&self, location: &PhysicalLocation) -> Result<HashMap<String, String>>;

    /// Writes one property, replacing any previous value
    fn set_property(&self, location: &PhysicalLocation, key: &str, value: &str) -> Result<()>;

    /// Writes several properties of one location
    ///
    /// The default writes them one at a time and stops at the first failure.
    /// Stores that persist on every write should override it with a single
    /// write.
    fn set_properties(&self, location: &PhysicalLocation, properties: &[(&str, String)]) -> Result<()> {
        properties
            .iter()
            .try_for_each(|(key, value)| self.set_property(location, key, value))
    }
}
