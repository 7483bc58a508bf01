use crate::gate::domain::PackageManager;

/// Whether a repository file is a package archive worth scanning.
///
/// NuGet only scans `.nupkg`, Go only `.zip`. Registry metadata
/// (`.json`, `.html`) is never scanned for any ecosystem.
pub fn is_scannable(package_manager: PackageManager, path: &str) -> bool {
    if path.ends_with(".json") || path.ends_with(".html") {
        return false;
    }
    match package_manager {
        PackageManager::NuGet => path.ends_with(".nupkg"),
        PackageManager::Go => path.ends_with(".zip"),
        _ => true,
    }
}
