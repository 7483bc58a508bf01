use super::api_headers::{build_client, REQUEST_TIMEOUT};
use crate::ports::outbound::{PackageRegistry, RegistrySearchHit};
use crate::shared::{GateError, GateResult, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

pub const DEFAULT_PACKAGIST_URL: &str = "https://packagist.org";

#[derive(Debug, Deserialize)]
struct PackageVersions {
    #[serde(default)]
    packages: HashMap<String, Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    name: String,
    #[serde(default)]
    repository: Option<String>,
}

/// PackagistClient adapter for the Composer package registry
///
/// Version listings come from the `p2/{name}.json` metadata endpoint. Entries
/// of the minified format may omit `source` or carry `"__unset"`; those are
/// skipped rather than treated as errors.
pub struct PackagistClient {
    client: reqwest::Client,
    base_url: String,
}

impl PackagistClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: build_client(REQUEST_TIMEOUT)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PackageRegistry for PackagistClient {
    async fn find_version_by_reference(
        &self,
        name: &str,
        reference: &str,
    ) -> GateResult<Option<String>> {
        if name.contains("..") || name.contains('?') || name.contains('#') {
            return Err(GateError::CoordinateInvalid {
                package_type: "php".to_string(),
                name: Some(name.to_string()),
                version: None,
            });
        }

        let url = format!("{}/p2/{}.json", self.base_url, name);
        let response = self.client.get(&url).send().await?;

        if response.status() != StatusCode::OK {
            debug!(name, status = response.status().as_u16(), "Package not listed by the registry");
            return Ok(None);
        }

        let body = response.text().await?;
        let listing: PackageVersions = serde_json::from_str(&body)
            .map_err(|_| GateError::UnexpectedResponseBody { body: body.clone() })?;

        let Some(versions) = listing.packages.get(name) else {
            return Ok(None);
        };

        let version = versions.iter().find_map(|entry| {
            let source_reference = entry.get("source")?.get("reference")?.as_str()?;
            if !source_reference.eq_ignore_ascii_case(reference) {
                return None;
            }
            entry.get("version")?.as_str().map(str::to_string)
        });
        Ok(version)
    }

    async fn search(&self, term: &str) -> GateResult<Vec<RegistrySearchHit>> {
        let url = format!("{}/search.json", self.base_url);
        let response = self.client.get(&url).query(&[("q", term)]).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(GateError::UnexpectedResponseCode {
                code: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&body)
            .map_err(|_| GateError::UnexpectedResponseBody { body: body.clone() })?;

        Ok(parsed
            .results
            .into_iter()
            .filter_map(|result| {
                result.repository.map(|repository| RegistrySearchHit {
                    name: result.name,
                    repository,
                })
            })
            .collect())
    }
}
