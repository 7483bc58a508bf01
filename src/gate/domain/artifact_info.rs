use serde::{Deserialize, Serialize};

/// Package metadata returned by the risk API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactInfo {
    #[serde(default)]
    pub package_id: Option<String>,
    /// Opaque identifier used by the vulnerability search.
    #[serde(default)]
    pub legacy_package_id: Option<String>,
    pub name: String,
    pub version: String,
    #[serde(rename = "type")]
    pub package_type: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ArtifactInfo {
    pub fn id(&self) -> Option<&str> {
        self.legacy_package_id
            .as_deref()
            .or(self.package_id.as_deref())
    }
}

/// A single vulnerability from the authenticated search endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vulnerability {
    pub id: String,
    #[serde(default)]
    pub cwe: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub severity: Option<String>,
}
