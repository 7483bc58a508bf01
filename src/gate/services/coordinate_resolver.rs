use crate::gate::domain::{ArtifactCoordinate, FileLayout, PackageManager};
use crate::ports::outbound::PackageRegistry;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, error, info, warn};

static NPM_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>.+?)/-/.+?-(?P<version>\d+\.\d+\.\d+[^/]*)\.tgz$").expect("invalid regex")
});

static PYPI_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^.+/(?P<name>[^/]+?)-(?P<version>\d+(?:\.[A-Za-z0-9]+)*)[^/]*\.(?:whl|egg|zip|tar\.gz)$",
    )
    .expect("invalid regex")
});

static NUGET_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:.*/)?(?P<name>[^/]+?)\.(?P<version>[0-9]+(?:\.[0-9]+){2,}(?:-[0-9A-Za-z.\-]+)?)\.nupkg$",
    )
    .expect("invalid regex")
});

static BOWER_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*/(?P<name>[^/]+?)-v?(?P<version>\d+(?:\.[0-9A-Za-z]+)*)[^/]*\.tar\.gz$")
        .expect("invalid regex")
});

static IVY_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<organization>.+?)/(?P<module>[^/]+)/(?P<version>\d[^/]*)/.+$")
        .expect("invalid regex")
});

static GO_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>.+)/@v/(?P<version>[^/]+)$").expect("invalid regex")
});

static COMPOSER_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>.+?)/commits/(?P<reference>[^/]+)/.+$").expect("invalid regex")
});

const GO_ARCHIVE_SUFFIXES: [&str; 3] = [".zip", ".mod", ".info"];
const GO_INCOMPATIBLE_SUFFIX: &str = "+incompatible";

/// Maps repository paths to ecosystem coordinates
///
/// Resolution never fails: anything that cannot be resolved produces an
/// invalid coordinate (ecosystem kept, name and version absent) and is logged.
///
/// Composer paths only carry a commit reference, so their version is looked
/// up through the `PackageRegistry` port.
pub struct CoordinateResolver<R: PackageRegistry> {
    registry: R,
}

impl<R: PackageRegistry> CoordinateResolver<R> {
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    /// Resolves the coordinate of the artifact at `path`
    ///
    /// # Arguments
    /// * `path` - Path inside the repository (without the repository key)
    /// * `layout` - Structured layout the host derived for the path
    /// * `package_manager` - Ecosystem of the repository
    pub async fn resolve(
        &self,
        path: &str,
        layout: &FileLayout,
        package_manager: PackageManager,
    ) -> ArtifactCoordinate {
        if package_manager == PackageManager::Unsupported {
            return ArtifactCoordinate::new(
                package_manager,
                layout.module().map(String::from),
                layout.base_revision().map(String::from),
            );
        }

        if layout.is_valid() && !package_manager.is_path_only() {
            return from_layout(layout, package_manager);
        }

        if package_manager == PackageManager::Composer {
            return self.resolve_composer(path).await;
        }

        match parse_path(path, package_manager) {
            Some((name, version)) => ArtifactCoordinate::new(package_manager, Some(name), Some(version)),
            None => ArtifactCoordinate::invalid(package_manager),
        }
    }

    async fn resolve_composer(&self, path: &str) -> ArtifactCoordinate {
        let package_manager = PackageManager::Composer;

        let Some((name, reference)) = parse_composer_path(path) else {
            error!(path, "Unable to parse Composer artifact path");
            return ArtifactCoordinate::invalid(package_manager);
        };

        match self.registry.find_version_by_reference(&name, &reference).await {
            Ok(Some(version)) => {
                return ArtifactCoordinate::new(package_manager, Some(name), Some(version));
            }
            Ok(None) => {}
            Err(e) => {
                error!(path, error = %e, "Failed to look up the Composer artifact version");
                return ArtifactCoordinate::invalid(package_manager);
            }
        }

        if let Some(alternative) = self.discover_alternative_name(&name).await {
            match self
                .registry
                .find_version_by_reference(&alternative, &reference)
                .await
            {
                Ok(Some(version)) => {
                    return ArtifactCoordinate::new(package_manager, Some(alternative), Some(version));
                }
                Ok(None) => {}
                Err(e) => {
                    error!(path, error = %e, "Failed to look up the Composer artifact version");
                    return ArtifactCoordinate::invalid(package_manager);
                }
            }
        }

        warn!(path, "Unable to get the artifact version from the Composer registry");
        ArtifactCoordinate::invalid(package_manager)
    }

    /// Searches the registry for a package whose repository URL contains `name`.
    ///
    /// Search failures yield `None`.
    async fn discover_alternative_name(&self, name: &str) -> Option<String> {
        debug!(name, "Using the Composer name fallback");

        let (_, rest) = name.split_once('/')?;

        let hits = match self.registry.search(rest).await {
            Ok(hits) => hits,
            Err(e) => {
                debug!(name, error = %e, "Composer registry search failed");
                return None;
            }
        };

        let found = hits
            .into_iter()
            .find(|hit| hit.repository.contains(name))
            .map(|hit| hit.name);

        if found.is_none() {
            debug!(name, "Composer fallback found no alternative name");
        }
        found
    }
}

fn from_layout(layout: &FileLayout, package_manager: PackageManager) -> ArtifactCoordinate {
    let module = layout.module().unwrap_or_default();
    let revision = layout.base_revision().unwrap_or_default();

    if !package_manager.is_maven_family() {
        return ArtifactCoordinate::new(
            package_manager,
            Some(module.to_string()),
            Some(revision.to_string()),
        );
    }

    let organization = layout.organization.as_deref().unwrap_or_default();
    let version = match layout.file_integration_revision.as_deref() {
        Some(integration) => format!("{}-{}", revision, integration),
        None => revision.to_string(),
    };

    ArtifactCoordinate::new(
        package_manager,
        Some(format!("{}:{}", organization, module)),
        Some(version),
    )
}

/// Applies the path grammar of an ecosystem, returning `(name, version)`.
pub fn parse_path(path: &str, package_manager: PackageManager) -> Option<(String, String)> {
    let captures = |re: &Regex, input: &str| {
        re.captures(input)
            .map(|c| (c["name"].to_string(), c["version"].to_string()))
    };

    let parsed = match package_manager {
        PackageManager::Npm => captures(&NPM_PATH, path),
        PackageManager::PyPi => captures(&PYPI_PATH, path),
        PackageManager::NuGet => captures(&NUGET_PATH, path),
        PackageManager::Bower => captures(&BOWER_PATH, path),
        PackageManager::Go => captures(&GO_PATH, &strip_go_suffixes(path)),
        PackageManager::Ivy | PackageManager::Sbt => IVY_PATH.captures(path).map(|c| {
            let organization = c["organization"].replace('/', ".");
            (format!("{}:{}", organization, &c["module"]), c["version"].to_string())
        }),
        _ => {
            info!(
                package_type = package_manager.package_type().unwrap_or("none"),
                path, "No path grammar for this package type"
            );
            return None;
        }
    };

    if parsed.is_none() {
        debug!(%package_manager, path, "Path does not match the ecosystem grammar");
    }
    parsed
}

/// Splits a Composer path into `(name, commit reference)`.
pub fn parse_composer_path(path: &str) -> Option<(String, String)> {
    COMPOSER_PATH
        .captures(path)
        .map(|c| (c["name"].to_string(), c["reference"].to_string()))
}

fn strip_go_suffixes(path: &str) -> String {
    let mut stripped = path;
    if let Some(suffix) = GO_ARCHIVE_SUFFIXES.iter().find(|s| stripped.ends_with(*s)) {
        stripped = &stripped[..stripped.len() - suffix.len()];
    }
    stripped
        .strip_suffix(GO_INCOMPATIBLE_SUFFIX)
        .unwrap_or(stripped)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::RegistrySearchHit;
    use crate::shared::{GateError, GateResult};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::str::FromStr;

    #[derive(Default)]
    struct StubRegistry {
        versions: HashMap<(String, String), String>,
        hits: Vec<RegistrySearchHit>,
        fail_lookup: bool,
    }

    impl StubRegistry {
        fn with_version(mut self, name: &str, reference: &str, version: &str) -> Self {
            self.versions.insert(
                (name.to_string(), reference.to_lowercase()),
                version.to_string(),
            );
            self
        }

        fn with_hit(mut self, name: &str, repository: &str) -> Self {
            self.hits.push(RegistrySearchHit {
                name: name.to_string(),
                repository: repository.to_string(),
            });
            self
        }
    }

    #[async_trait]
    impl PackageRegistry for StubRegistry {
        async fn find_version_by_reference(
            &self,
            name: &str,
            reference: &str,
        ) -> GateResult<Option<String>> {
            if self.fail_lookup {
                return Err(GateError::UnexpectedResponseCode { code: 500 });
            }
            Ok(self
                .versions
                .get(&(name.to_string(), reference.to_lowercase()))
                .cloned())
        }

        async fn search(&self, _term: &str) -> GateResult<Vec<RegistrySearchHit>> {
            Ok(self.hits.clone())
        }
    }

    fn resolver() -> CoordinateResolver<StubRegistry> {
        CoordinateResolver::new(StubRegistry::default())
    }

    async fn resolve_path(path: &str, pm: PackageManager) -> (Option<String>, Option<String>) {
        let c = resolver().resolve(path, &FileLayout::default(), pm).await;
        (c.name().map(String::from), c.version().map(String::from))
    }

    fn pair(name: &str, version: &str) -> (Option<String>, Option<String>) {
        (Some(name.to_string()), Some(version.to_string()))
    }

    #[tokio::test]
    async fn test_npm_paths() {
        assert_eq!(
            resolve_path("lodash/-/lodash-0.2.1.tgz", PackageManager::Npm).await,
            pair("lodash", "0.2.1")
        );
        assert_eq!(
            resolve_path("@types/fs-extra/-/fs-extra-9.0.13.tgz", PackageManager::Npm).await,
            pair("@types/fs-extra", "9.0.13")
        );
        assert_eq!(
            resolve_path("http/-/http-0.0.1-security.tgz", PackageManager::Npm).await,
            pair("http", "0.0.1-security")
        );
    }

    #[tokio::test]
    async fn test_npm_ignores_valid_layout() {
        let layout = FileLayout::from_str("npm:lodash:9.9.9").unwrap();
        let c = resolver()
            .resolve("lodash/-/lodash-0.2.1.tgz", &layout, PackageManager::Npm)
            .await;
        assert_eq!(c.version(), Some("0.2.1"));
    }

    #[tokio::test]
    async fn test_pypi_paths() {
        assert_eq!(
            resolve_path(
                "6d/1b/fb/requests-2.22.0-py2.py3-none-any.whl",
                PackageManager::PyPi
            )
            .await,
            pair("requests", "2.22.0")
        );
        assert_eq!(
            resolve_path("packages/fs-extra-1.0.tar.gz", PackageManager::PyPi).await,
            pair("fs-extra", "1.0")
        );
        assert_eq!(
            resolve_path("requests-2.22.0.tar.gz", PackageManager::PyPi).await,
            (None, None)
        );
    }

    #[tokio::test]
    async fn test_nuget_paths() {
        assert_eq!(
            resolve_path("dbup-core.4.5.0.nupkg", PackageManager::NuGet).await,
            pair("dbup-core", "4.5.0")
        );
        assert_eq!(
            resolve_path(
                "newtonsoft.json/Newtonsoft.Json.12.0.3.nupkg",
                PackageManager::NuGet
            )
            .await,
            pair("Newtonsoft.Json", "12.0.3")
        );
        assert_eq!(
            resolve_path("Serilog.2.10.0-dev-01187.nupkg", PackageManager::NuGet).await,
            pair("Serilog", "2.10.0-dev-01187")
        );
    }

    #[tokio::test]
    async fn test_bower_path() {
        assert_eq!(
            resolve_path("jquery/jquery-3.4.1.tar.gz", PackageManager::Bower).await,
            pair("jquery", "3.4.1")
        );
        assert_eq!(
            resolve_path("twbs/bootstrap-v4.0.0.tar.gz", PackageManager::Bower).await,
            pair("bootstrap", "4.0.0")
        );
    }

    #[tokio::test]
    async fn test_ivy_and_sbt_paths() {
        assert_eq!(
            resolve_path(
                "org/scala-lang/scala-library/2.13.1/jars/scala-library.jar",
                PackageManager::Sbt
            )
            .await,
            pair("org.scala-lang:scala-library", "2.13.1")
        );
        assert_eq!(
            resolve_path("commons-io/commons-io/2.6/ivy-2.6.xml", PackageManager::Ivy).await,
            pair("commons-io:commons-io", "2.6")
        );
    }

    #[tokio::test]
    async fn test_go_paths() {
        assert_eq!(
            resolve_path(
                "github.com/google/go-github/@v/v17.0.0+incompatible.zip",
                PackageManager::Go
            )
            .await,
            pair("github.com/google/go-github", "v17.0.0")
        );
        assert_eq!(
            resolve_path("h12.io/socks/@v/v1.0.1.mod", PackageManager::Go).await,
            pair("h12.io/socks", "v1.0.1")
        );
        assert_eq!(
            resolve_path(
                "github.com/golang/glog/@v/v0.0.0-20160126235308-23def4e6c14b.info",
                PackageManager::Go
            )
            .await,
            pair("github.com/golang/glog", "v0.0.0-20160126235308-23def4e6c14b")
        );
    }

    #[tokio::test]
    async fn test_unmatched_path_is_invalid() {
        let c = resolver()
            .resolve("lodash/latest", &FileLayout::default(), PackageManager::Npm)
            .await;
        assert!(!c.is_valid());
        assert_eq!(c.package_manager(), PackageManager::Npm);
    }

    #[tokio::test]
    async fn test_maven_without_layout_is_invalid() {
        assert_eq!(
            resolve_path("org/slf4j/slf4j-api/1.7.30/slf4j-api-1.7.30.jar", PackageManager::Maven)
                .await,
            (None, None)
        );
    }

    #[tokio::test]
    async fn test_maven_layout_composes_name_and_version() {
        let layout = FileLayout::from_str("org.slf4j:slf4j-api:1.7.30").unwrap();
        let c = resolver().resolve("ignored", &layout, PackageManager::Gradle).await;
        assert_eq!(c.name(), Some("org.slf4j:slf4j-api"));
        assert_eq!(c.version(), Some("1.7.30"));

        let snapshot = FileLayout::from_str("org:test:1.0-SNAPSHOT:20230101.120000-2").unwrap();
        let c = resolver().resolve("ignored", &snapshot, PackageManager::Maven).await;
        assert_eq!(c.version(), Some("1.0-SNAPSHOT-20230101.120000-2"));
    }

    #[tokio::test]
    async fn test_non_maven_layout_uses_module() {
        let layout = FileLayout::from_str("python:requests:2.22.0").unwrap();
        let c = resolver().resolve("ignored", &layout, PackageManager::PyPi).await;
        assert_eq!(c.name(), Some("requests"));
        assert_eq!(c.version(), Some("2.22.0"));
    }

    #[tokio::test]
    async fn test_unsupported_returns_layout_verbatim() {
        let layout = FileLayout::new(None, Some("thing".into()), Some("1.0".into()), None);
        let c = resolver()
            .resolve("thing-1.0.bin", &layout, PackageManager::Unsupported)
            .await;
        assert_eq!(c.name(), Some("thing"));
        assert_eq!(c.version(), Some("1.0"));
        assert!(!c.is_valid());
    }

    #[tokio::test]
    async fn test_composer_lookup_by_reference() {
        let registry = StubRegistry::default().with_version(
            "zircote/swagger-php",
            "9d172471e56433b5c7061006b9a766f262a3edfd",
            "3.1.0",
        );
        let c = CoordinateResolver::new(registry)
            .resolve(
                "zircote/swagger-php/commits/9D172471E56433B5C7061006B9A766F262A3EDFD/swagger-php.zip",
                &FileLayout::default(),
                PackageManager::Composer,
            )
            .await;
        assert_eq!(c.name(), Some("zircote/swagger-php"));
        assert_eq!(c.version(), Some("3.1.0"));
    }

    #[tokio::test]
    async fn test_composer_fallback_discovers_new_name() {
        let registry = StubRegistry::default()
            .with_version("psr/cache", "abc123", "1.0.1")
            .with_hit("other/cache", "https://github.com/other/cache")
            .with_hit("psr/cache", "https://github.com/php-fig/cache");
        let c = CoordinateResolver::new(registry)
            .resolve(
                "php-fig/cache/commits/abc123/cache.zip",
                &FileLayout::default(),
                PackageManager::Composer,
            )
            .await;
        assert_eq!(c.name(), Some("psr/cache"));
        assert_eq!(c.version(), Some("1.0.1"));
    }

    #[tokio::test]
    async fn test_composer_fallback_without_match_is_invalid() {
        let registry =
            StubRegistry::default().with_hit("other/cache", "https://github.com/other/cache");
        let c = CoordinateResolver::new(registry)
            .resolve(
                "php-fig/cache/commits/abc123/cache.zip",
                &FileLayout::default(),
                PackageManager::Composer,
            )
            .await;
        assert!(!c.is_valid());
        assert_eq!(c.package_manager(), PackageManager::Composer);
    }

    #[tokio::test]
    async fn test_composer_lookup_error_is_invalid() {
        let registry = StubRegistry {
            fail_lookup: true,
            ..Default::default()
        };
        let c = CoordinateResolver::new(registry)
            .resolve(
                "zircote/swagger-php/commits/abc/swagger-php.zip",
                &FileLayout::default(),
                PackageManager::Composer,
            )
            .await;
        assert!(!c.is_valid());
    }

    #[test]
    fn test_parse_composer_path() {
        assert_eq!(
            parse_composer_path("zircote/swagger-php/commits/abc/file.zip"),
            Some(("zircote/swagger-php".to_string(), "abc".to_string()))
        );
        assert_eq!(parse_composer_path("zircote/swagger-php/3.1.0.zip"), None);
    }
}
