//! Ecosystem-specific alternative names tried once after a 404.

/// Swaps the separator class of a PyPI name (`-` and `_`).
///
/// Dashes win when both are present. Returns `None` when the name has
/// neither separator.
pub fn pypi_alternative(name: &str) -> Option<String> {
    if name.contains('-') {
        Some(name.replace('-', "_"))
    } else if name.contains('_') {
        Some(name.replace('_', "-"))
    } else {
        None
    }
}

/// Alternative name for a package type, if that ecosystem has a fallback rule.
pub fn alternative_name(package_type: &str, name: &str) -> Option<String> {
    match package_type {
        "python" => pypi_alternative(name),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pypi_dash_to_underscore() {
        assert_eq!(pypi_alternative("fs-extra").as_deref(), Some("fs_extra"));
    }

    #[test]
    fn test_pypi_underscore_to_dash() {
        assert_eq!(pypi_alternative("fs_extra").as_deref(), Some("fs-extra"));
    }

    #[test]
    fn test_pypi_no_separator() {
        assert_eq!(pypi_alternative("request"), None);
    }

    #[test]
    fn test_pypi_mixed_separators_replace_dashes_only() {
        assert_eq!(pypi_alternative("a-b_c").as_deref(), Some("a_b_c"));
    }

    #[test]
    fn test_other_ecosystems_have_no_fallback() {
        assert_eq!(alternative_name("npm", "fs-extra"), None);
        assert_eq!(alternative_name("python", "fs-extra").as_deref(), Some("fs_extra"));
    }
}
