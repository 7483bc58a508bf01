use serde::Serialize;
use std::fmt;

/// Packaging ecosystem an artifact belongs to.
///
/// `key()` is the repository-side name (what the host reports as the
/// repository package type), `package_type()` the ecosystem name used in
/// risk API paths. Several repository types share one API ecosystem
/// (every Maven-family layout maps to `maven`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Gradle,
    Maven,
    Sbt,
    Ivy,
    Npm,
    Bower,
    Go,
    PyPi,
    NuGet,
    Docker,
    Composer,
    CocoaPods,
    Unsupported,
}

/// Lookup table from normalized repository package type to variant
const PACKAGE_MANAGERS: &[(&str, PackageManager)] = &[
    ("gradle", PackageManager::Gradle),
    ("maven", PackageManager::Maven),
    ("sbt", PackageManager::Sbt),
    ("ivy", PackageManager::Ivy),
    ("npm", PackageManager::Npm),
    ("bower", PackageManager::Bower),
    ("go", PackageManager::Go),
    ("pypi", PackageManager::PyPi),
    ("nuget", PackageManager::NuGet),
    ("docker", PackageManager::Docker),
    ("composer", PackageManager::Composer),
    ("cocoapods", PackageManager::CocoaPods),
];

impl PackageManager {
    /// Maps a repository package type to a variant; anything unknown is `Unsupported`.
    pub fn from_repository_type(package_type: &str) -> Self {
        let normalized = package_type.trim().to_lowercase();
        PACKAGE_MANAGERS
            .iter()
            .find(|(key, _)| *key == normalized)
            .map(|(_, pm)| *pm)
            .unwrap_or(PackageManager::Unsupported)
    }

    pub fn key(&self) -> &'static str {
        match self {
            PackageManager::Gradle => "gradle",
            PackageManager::Maven => "maven",
            PackageManager::Sbt => "sbt",
            PackageManager::Ivy => "ivy",
            PackageManager::Npm => "npm",
            PackageManager::Bower => "bower",
            PackageManager::Go => "go",
            PackageManager::PyPi => "pypi",
            PackageManager::NuGet => "nuget",
            PackageManager::Docker => "docker",
            PackageManager::Composer => "composer",
            PackageManager::CocoaPods => "cocoapods",
            PackageManager::Unsupported => "not-supported",
        }
    }

    /// Ecosystem name used by the risk API. `None` only for `Unsupported`.
    pub fn package_type(&self) -> Option<&'static str> {
        match self {
            PackageManager::Gradle
            | PackageManager::Maven
            | PackageManager::Sbt
            | PackageManager::Ivy => Some("maven"),
            PackageManager::Npm | PackageManager::Bower => Some("npm"),
            PackageManager::Go => Some("go"),
            PackageManager::PyPi => Some("python"),
            PackageManager::NuGet => Some("nuget"),
            PackageManager::Docker => Some("docker"),
            PackageManager::Composer => Some("php"),
            PackageManager::CocoaPods => Some("ios"),
            PackageManager::Unsupported => None,
        }
    }

    /// Ecosystems whose names are `organization:module`.
    pub fn is_maven_family(&self) -> bool {
        self.package_type() == Some("maven")
    }

    /// Ecosystems that always resolve from the raw path, even with a valid layout.
    pub fn is_path_only(&self) -> bool {
        matches!(self, PackageManager::Npm)
    }
}

impl std::str::FromStr for PackageManager {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match PackageManager::from_repository_type(s) {
            PackageManager::Unsupported if s.trim().to_lowercase() != "not-supported" => Err(
                format!(
                    "Invalid package manager: {}. Expected one of: {}",
                    s,
                    PACKAGE_MANAGERS
                        .iter()
                        .map(|(key, _)| *key)
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            ),
            pm => Ok(pm),
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
