use super::PackageManager;
use crate::shared::{GateError, GateResult};
use serde::Serialize;
use std::fmt;

/// Ecosystem coordinate of an artifact, as produced by the resolver.
///
/// A coordinate missing its name or version (or belonging to an unsupported
/// ecosystem) is a terminal sentinel: it is logged and never turned into a
/// remote request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactCoordinate {
    package_manager: PackageManager,
    name: Option<String>,
    version: Option<String>,
}

impl ArtifactCoordinate {
    pub fn new(package_manager: PackageManager, name: Option<String>, version: Option<String>) -> Self {
        Self {
            package_manager,
            name,
            version,
        }
    }

    /// Sentinel for "could not be resolved"; the ecosystem is preserved for logging.
    pub fn invalid(package_manager: PackageManager) -> Self {
        Self::new(package_manager, None, None)
    }

    pub fn package_manager(&self) -> PackageManager {
        self.package_manager
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn is_valid(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        self.package_manager.package_type().is_some() && present(&self.name) && present(&self.version)
    }

    /// Converts into a coordinate that is safe to send to the risk API.
    pub fn to_valid(&self) -> GateResult<ValidCoordinate> {
        match (self.package_manager.package_type(), &self.name, &self.version) {
            (Some(package_type), Some(name), Some(version))
                if !name.trim().is_empty() && !version.trim().is_empty() =>
            {
                Ok(ValidCoordinate {
                    package_manager: self.package_manager,
                    package_type: package_type.to_string(),
                    name: name.clone(),
                    version: version.clone(),
                })
            }
            _ => Err(GateError::CoordinateInvalid {
                package_type: self.package_manager.package_type().unwrap_or("none").to_string(),
                name: self.name.clone(),
                version: self.version.clone(),
            }),
        }
    }
}

/// A coordinate with every component present.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidCoordinate {
    pub package_manager: PackageManager,
    pub package_type: String,
    pub name: String,
    pub version: String,
}

impl ValidCoordinate {
    /// Key used to serialise concurrent scans of the same package.
    pub fn flight_key(&self) -> String {
        format!("{}:{}@{}", self.package_type, self.name, self.version)
    }
}

impl fmt::Display for ValidCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}@{}", self.package_type, self.name, self.version)
    }
}
