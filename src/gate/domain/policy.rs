use super::Severity;
use serde::Serialize;
use std::fmt;

/// HTTP-like status carried by every policy block.
pub const POLICY_VIOLATION_CODE: u16 = 403;

/// Threshold and license allow-list, loaded once per process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PolicyConfig {
    pub threshold: Severity,
    pub allowed_licenses: LicenseAllowList,
}

impl PolicyConfig {
    pub fn new(threshold: Severity, allowed_licenses: LicenseAllowList) -> Self {
        Self {
            threshold,
            allowed_licenses,
        }
    }
}

/// Allowed license names, parsed from a comma-separated value.
///
/// Entries are trimmed and de-duplicated; order of first appearance is kept.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LicenseAllowList(Vec<String>);

impl LicenseAllowList {
    pub fn parse(raw: &str) -> Self {
        let mut entries: Vec<String> = Vec::new();
        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            if !entries.iter().any(|existing| existing == entry) {
                entries.push(entry.to_string());
            }
        }
        Self(entries)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A single `none` entry forbids every license.
    pub fn forbids_all(&self) -> bool {
        matches!(self.0.as_slice(), [only] if only.eq_ignore_ascii_case("none"))
    }

    pub fn allows_any<S: AsRef<str>>(&self, licenses: &[S]) -> bool {
        licenses
            .iter()
            .any(|license| self.0.iter().any(|allowed| allowed == license.as_ref()))
    }

    pub fn entries(&self) -> &[String] {
        &self.0
    }
}

/// A blocking outcome from the threshold or license check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyViolation {
    pub code: u16,
    pub message: String,
}

impl PolicyViolation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: POLICY_VIOLATION_CODE,
            message: message.into(),
        }
    }

    pub fn security_threshold(artifact: &str) -> Self {
        Self::new(format!(
            "Artifact has risks that do not comply with the security risk threshold. Artifact Name: {}",
            artifact
        ))
    }

    pub fn license(artifact: &str) -> Self {
        Self::new(format!(
            "License allowance not compliant for the artifact: {}",
            artifact
        ))
    }
}

impl fmt::Display for PolicyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

/// Result of gating an artifact request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "lowercase")]
pub enum Decision {
    Allow,
    Block(PolicyViolation),
}

impl Decision {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Decision::Block(_))
    }

    pub fn violation(&self) -> Option<&PolicyViolation> {
        match self {
            Decision::Allow => None,
            Decision::Block(violation) => Some(violation),
        }
    }
}
