use super::access_token_manager::AccessTokenManager;
use super::api_headers::{build_client, with_trailing_slash, REQUEST_TIMEOUT};
use crate::gate::domain::{ArtifactInfo, RiskAggregation, ValidCoordinate, Vulnerability};
use crate::gate::services::name_fallback;
use crate::ports::outbound::RiskRepository;
use crate::shared::security::validate_url_component;
use crate::shared::{GateError, GateResult, Result};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

const RISK_AGGREGATION_PATH: &str = "public/risk-aggregation/aggregated-risks";
const VULNERABILITIES_PATH: &str = "vulnerabilities/search-requests";
const PRIVATE_DEPENDENCIES_PATH: &str = "private-dependencies-repository/dependencies";
const RESOLVED_BY: &str = "PrivateArtifactory";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RiskAggregationRequest<'a> {
    package_name: &'a str,
    version: &'a str,
    package_manager: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RiskAggregationResponse {
    package_vulnerabilities_aggregation: VulnerabilitiesAggregation,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VulnerabilitiesAggregation {
    #[serde(default)]
    vulnerabilities_count: u64,
    #[serde(default)]
    max_risk_severity: Option<String>,
    #[serde(default)]
    max_risk_score: f64,
    #[serde(default)]
    critical_risk_count: u64,
    #[serde(default)]
    high_risk_count: u64,
    #[serde(default)]
    medium_risk_count: u64,
    #[serde(default)]
    low_risk_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageLicenses {
    #[serde(default)]
    identified_licenses: Vec<IdentifiedLicense>,
}

#[derive(Debug, Deserialize)]
struct IdentifiedLicense {
    license: LicenseName,
}

#[derive(Debug, Deserialize)]
struct LicenseName {
    name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrivatePackage<'a> {
    name: &'a str,
    package_manager: &'a str,
    version: &'a str,
    resolved_by: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PackageEndpoint {
    Public,
    Private,
}

/// RiskApiClient adapter for the third-party risk and license API
///
/// Public endpoints are always available. Authenticated endpoints
/// (vulnerability search, private package suggestion) need an
/// `AccessTokenManager`; without one they fail with `UserNotAuthenticated`.
///
/// A 404 on package metadata or licenses is retried once under the
/// ecosystem's alternative name (see `name_fallback`).
pub struct RiskApiClient {
    client: reqwest::Client,
    api_url: String,
    token_manager: Option<Arc<AccessTokenManager>>,
    private_packages: bool,
}

impl RiskApiClient {
    /// Creates a client for the unauthenticated (public) API surface
    pub fn new(api_url: &str) -> Result<Self> {
        Ok(Self {
            client: build_client(REQUEST_TIMEOUT)?,
            api_url: with_trailing_slash(api_url),
            token_manager: None,
            private_packages: false,
        })
    }

    /// Enables authenticated endpoints
    pub fn with_token_manager(mut self, token_manager: Arc<AccessTokenManager>) -> Self {
        self.token_manager = Some(token_manager);
        self
    }

    /// Reads package metadata from the authenticated `packages/` endpoint
    /// instead of the public one. Licenses stay on the public surface.
    ///
    /// Has no effect until a token manager is attached.
    pub fn with_private_packages(mut self, enabled: bool) -> Self {
        self.private_packages = enabled;
        self
    }

    fn package_url(
        &self,
        endpoint: PackageEndpoint,
        package_type: &str,
        name: &str,
        version: &str,
    ) -> GateResult<String> {
        let invalid = || GateError::CoordinateInvalid {
            package_type: package_type.to_string(),
            name: Some(name.to_string()),
            version: Some(version.to_string()),
        };
        validate_url_component(package_type, "Package type").map_err(|_| invalid())?;
        validate_url_component(name, "Package name").map_err(|_| invalid())?;
        validate_url_component(version, "Version").map_err(|_| invalid())?;

        let (package_type, name, version) = (
            urlencoding::encode(package_type),
            urlencoding::encode(name),
            urlencoding::encode(version),
        );
        Ok(match endpoint {
            PackageEndpoint::Public => format!(
                "{}public/packages/{}/{}/versions/{}",
                self.api_url, package_type, name, version
            ),
            PackageEndpoint::Private => format!(
                "{}packages/{}/{}/{}",
                self.api_url, package_type, name, version
            ),
        })
    }

    async fn send_package_request(&self, endpoint: PackageEndpoint, url: &str) -> GateResult<Response> {
        let request = self.client.get(url);
        let request = match endpoint {
            PackageEndpoint::Public => request,
            PackageEndpoint::Private => self.authorize(request).await?,
        };
        Ok(request.send().await?)
    }

    async fn authorize(&self, request: RequestBuilder) -> GateResult<RequestBuilder> {
        let Some(token_manager) = &self.token_manager else {
            return Err(GateError::UserNotAuthenticated);
        };
        let (key, value) = token_manager.authorization_header().await?;
        Ok(request.header(key, value))
    }

    /// GETs a package resource, retrying once under the alternative name on 404.
    async fn get_package_resource(
        &self,
        endpoint: PackageEndpoint,
        package_type: &str,
        name: &str,
        version: &str,
        suffix: &str,
    ) -> GateResult<Response> {
        let url = format!(
            "{}{}",
            self.package_url(endpoint, package_type, name, version)?,
            suffix
        );
        let response = self.send_package_request(endpoint, &url).await?;

        if response.status() != StatusCode::NOT_FOUND {
            return Ok(response);
        }

        // Private packages are registered under their exact name
        if matches!(endpoint, PackageEndpoint::Private) {
            return Err(GateError::UnexpectedResponseCode { code: 404 });
        }

        let Some(alternative) = name_fallback::alternative_name(package_type, name) else {
            return Err(GateError::UnexpectedResponseCode { code: 404 });
        };

        debug!(name, alternative = %alternative, "Package not found, retrying under the alternative name");
        let url = format!(
            "{}{}",
            self.package_url(endpoint, package_type, &alternative, version)?,
            suffix
        );
        let retried = self.send_package_request(endpoint, &url).await?;

        if retried.status() == StatusCode::NOT_FOUND {
            return Err(GateError::UnexpectedResponseCode { code: 404 });
        }
        Ok(retried)
    }

    async fn get_licenses(&self, package_type: &str, name: &str, version: &str) -> GateResult<Vec<String>> {
        let response = self
            .get_package_resource(PackageEndpoint::Public, package_type, name, version, "/licenses")
            .await?;
        let licenses: PackageLicenses = parse_json(response).await?;
        Ok(licenses
            .identified_licenses
            .into_iter()
            .map(|identified| identified.license.name)
            .collect())
    }
}

/// Requires a 200 and a parsable, non-null JSON body.
async fn parse_json<T: DeserializeOwned>(response: Response) -> GateResult<T> {
    let status = response.status();
    if status != StatusCode::OK {
        return Err(GateError::UnexpectedResponseCode {
            code: status.as_u16(),
        });
    }

    let body = response.text().await?;
    serde_json::from_str::<Option<T>>(&body)
        .ok()
        .flatten()
        .ok_or(GateError::UnexpectedResponseBody { body })
}

#[async_trait]
impl RiskRepository for RiskApiClient {
    fn is_authenticated(&self) -> bool {
        self.token_manager.is_some()
    }

    async fn get_artifact_info(
        &self,
        package_type: &str,
        name: &str,
        version: &str,
    ) -> GateResult<ArtifactInfo> {
        let endpoint = if self.private_packages && self.token_manager.is_some() {
            PackageEndpoint::Private
        } else {
            PackageEndpoint::Public
        };
        let response = self
            .get_package_resource(endpoint, package_type, name, version, "")
            .await?;
        parse_json(response).await
    }

    async fn get_risk_aggregation(
        &self,
        package_type: &str,
        name: &str,
        version: &str,
    ) -> GateResult<RiskAggregation> {
        let request = RiskAggregationRequest {
            package_name: name,
            version,
            package_manager: package_type,
        };
        let response = self
            .client
            .post(format!("{}{}", self.api_url, RISK_AGGREGATION_PATH))
            .json(&request)
            .send()
            .await?;
        let parsed: RiskAggregationResponse = parse_json(response).await?;
        let aggregation = parsed.package_vulnerabilities_aggregation;

        let licenses = match self.get_licenses(package_type, name, version).await {
            Ok(licenses) => licenses,
            Err(e) => {
                debug!(name, error = %e, "License lookup failed, continuing without licenses");
                Vec::new()
            }
        };

        Ok(RiskAggregation {
            vulnerability_count: aggregation.vulnerabilities_count,
            low_count: aggregation.low_risk_count,
            medium_count: aggregation.medium_risk_count,
            high_count: aggregation.high_risk_count,
            critical_count: aggregation.critical_risk_count,
            max_severity: aggregation
                .max_risk_severity
                .unwrap_or_else(|| "None".to_string()),
            max_score: aggregation.max_risk_score,
            licenses: licenses.into_iter().collect(),
        })
    }

    async fn get_vulnerabilities(&self, identifier: &str) -> GateResult<Vec<Vulnerability>> {
        let request = self
            .client
            .post(format!("{}{}", self.api_url, VULNERABILITIES_PATH))
            .json(&[identifier]);
        let response = self.authorize(request).await?.send().await?;
        parse_json(response).await
    }

    async fn suggest_private_package(&self, coordinate: &ValidCoordinate) -> GateResult<bool> {
        let body = [PrivatePackage {
            name: &coordinate.name,
            package_manager: &coordinate.package_type,
            version: &coordinate.version,
            resolved_by: RESOLVED_BY,
        }];
        let request = self
            .client
            .post(format!("{}{}", self.api_url, PRIVATE_DEPENDENCIES_PATH))
            .json(&body[..]);
        let response = self.authorize(request).await?.send().await?;

        if response.status() != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(GateError::UnexpectedResponseBody { body });
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_url_encodes_scoped_names() {
        let client = RiskApiClient::new("https://api.example").unwrap();
        let url = client
            .package_url(PackageEndpoint::Public, "npm", "@types/fs-extra", "9.0.13")
            .unwrap();
        assert_eq!(
            url,
            "https://api.example/public/packages/npm/%40types%2Ffs-extra/versions/9.0.13"
        );
    }

    #[test]
    fn test_private_package_url() {
        let client = RiskApiClient::new("https://api.example/").unwrap();
        let url = client
            .package_url(PackageEndpoint::Private, "python", "requests", "2.22.0")
            .unwrap();
        assert_eq!(url, "https://api.example/packages/python/requests/2.22.0");
    }

    #[test]
    fn test_package_url_rejects_traversal() {
        let client = RiskApiClient::new("https://api.example/").unwrap();
        assert!(matches!(
            client.package_url(PackageEndpoint::Public, "npm", "../admin", "1.0.0"),
            Err(GateError::CoordinateInvalid { .. })
        ));
    }

    #[tokio::test]
    async fn test_authenticated_endpoints_need_token_manager() {
        let client = RiskApiClient::new("http://127.0.0.1:9").unwrap();
        assert!(!client.is_authenticated());
        assert_eq!(
            client.get_vulnerabilities("id").await.unwrap_err(),
            GateError::UserNotAuthenticated
        );
    }

    #[test]
    fn test_aggregation_response_shape() {
        let json = r#"{"packageVulnerabilitiesAggregation": {
            "vulnerabilitiesCount": 4, "maxRiskSeverity": "High", "maxRiskScore": 7.5,
            "criticalRiskCount": 0, "highRiskCount": 1, "mediumRiskCount": 2, "lowRiskCount": 1
        }}"#;
        let parsed: RiskAggregationResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.package_vulnerabilities_aggregation.vulnerabilities_count, 4);
        assert_eq!(parsed.package_vulnerabilities_aggregation.high_risk_count, 1);
    }
}
