use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Maximum size of a metadata store file (32 MB)
/// A store that grows past this is rejected rather than loaded into memory
pub const MAX_STORE_FILE_SIZE: u64 = 32 * 1024 * 1024;

/// Maximum length of a name or version placed into an API path
const MAX_URL_COMPONENT_LENGTH: usize = 512;

/// Validates that a path is not a symbolic link
///
/// # Security
/// Uses `symlink_metadata()` instead of `metadata()` so the link itself is
/// inspected, not its target.
///
/// # Arguments
/// * `path` - The path to validate
/// * `operation` - Description of the operation (e.g., "read", "write") for error messages
///
/// # Errors
/// Returns an error if the path is a symbolic link or if metadata cannot be read
pub fn validate_not_symlink(path: &Path, operation: &str) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to read metadata for {} operation on {}: {}",
            operation,
            path.display(),
            e
        )
    })?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} is a symbolic link. For security reasons, {} operations on symbolic links are not allowed.",
            path.display(),
            operation
        );
    }

    Ok(())
}

/// Validates that a path exists and is a regular file (not a directory or symlink)
///
/// # Errors
/// Returns an error if:
/// - The path doesn't exist
/// - The path is a symbolic link
/// - The path is not a regular file
pub fn validate_regular_file(path: &Path, file_description: &str) -> Result<()> {
    let metadata = fs::symlink_metadata(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {} metadata: {}", file_description, e))?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} is a symbolic link. For security reasons, symbolic links are not allowed.",
            path.display()
        );
    }

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    Ok(())
}

/// Validates file size is within acceptable limits
///
/// # Errors
/// Returns an error if the file size exceeds the maximum
pub fn validate_file_size(file_size: u64, path: &Path, max_size: u64) -> Result<()> {
    if file_size > max_size {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
            path.display(),
            file_size,
            max_size
        );
    }
    Ok(())
}

/// Validates a package name or version before it is percent-encoded into an API path
///
/// Scoped npm names (`@types/node`) and Go module paths legitimately contain `/`,
/// which is encoded rather than rejected. Traversal sequences and control
/// characters are refused outright.
pub fn validate_url_component(component: &str, component_type: &str) -> Result<()> {
    if component.trim().is_empty() {
        anyhow::bail!("{} must not be empty", component_type);
    }

    if component.len() > MAX_URL_COMPONENT_LENGTH {
        anyhow::bail!(
            "Security: {} is too long ({} bytes). Maximum allowed: {} bytes",
            component_type,
            component.len(),
            MAX_URL_COMPONENT_LENGTH
        );
    }

    if component.split('/').any(|segment| segment == "..") {
        anyhow::bail!(
            "Security: {} contains '..' which is not allowed",
            component_type
        );
    }

    if component.chars().any(|c| c.is_control()) {
        anyhow::bail!(
            "Security: {} contains control characters",
            component_type
        );
    }

    Ok(())
}
