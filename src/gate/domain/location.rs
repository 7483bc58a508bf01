use std::fmt;

/// A concrete repository path backing a (possibly virtual) requested path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhysicalLocation {
    repo_key: String,
    path: String,
}

impl PhysicalLocation {
    pub fn new(repo_key: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            repo_key: repo_key.into(),
            path: path.into(),
        }
    }

    pub fn repo_key(&self) -> &str {
        &self.repo_key
    }

    /// Path inside the repository, without the repository key.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// File name: the last path segment.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

impl std::str::FromStr for PhysicalLocation {
    type Err = String;

    /// Parses `repo-key/path/inside/repo`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('/').split_once('/') {
            Some((repo, path)) if !repo.is_empty() && !path.is_empty() => {
                Ok(Self::new(repo, path))
            }
            _ => Err(format!(
                "Invalid location: {}. Expected <repository>/<path>",
                s
            )),
        }
    }
}

impl fmt::Display for PhysicalLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.repo_key, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_location() {
        let location = PhysicalLocation::from_str("npm-remote/lodash/-/lodash-0.2.1.tgz").unwrap();
        assert_eq!(location.repo_key(), "npm-remote");
        assert_eq!(location.path(), "lodash/-/lodash-0.2.1.tgz");
        assert_eq!(location.name(), "lodash-0.2.1.tgz");
        assert_eq!(location.to_string(), "npm-remote/lodash/-/lodash-0.2.1.tgz");
    }

    #[test]
    fn test_parse_location_without_path_fails() {
        assert!(PhysicalLocation::from_str("npm-remote").is_err());
        assert!(PhysicalLocation::from_str("npm-remote/").is_err());
    }

    #[test]
    fn test_name_of_flat_path() {
        let location = PhysicalLocation::new("nuget-local", "dbup-core.4.5.0.nupkg");
        assert_eq!(location.name(), "dbup-core.4.5.0.nupkg");
    }
}
