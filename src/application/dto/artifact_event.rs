use crate::gate::domain::{FileLayout, PackageManager, PhysicalLocation};

/// ArtifactEvent - A download or upload observed by the host
///
/// `locations` are the physical locations already resolved for the requested
/// (possibly virtual) path. The host owns that resolution.
#[derive(Debug, Clone)]
pub struct ArtifactEvent {
    /// The path the client asked for
    pub requested: PhysicalLocation,
    /// Ecosystem of the repository serving the path
    pub package_manager: PackageManager,
    /// Structured layout the host derived for the path
    pub layout: FileLayout,
    /// Physical locations backing the requested path
    pub locations: Vec<PhysicalLocation>,
}

impl ArtifactEvent {
    pub fn new(
        requested: PhysicalLocation,
        package_manager: PackageManager,
        layout: FileLayout,
        locations: Vec<PhysicalLocation>,
    ) -> Self {
        Self {
            requested,
            package_manager,
            layout,
            locations,
        }
    }

    /// File name of the requested artifact, used in logs and violation messages
    pub fn artifact_name(&self) -> &str {
        self.requested.name()
    }
}
