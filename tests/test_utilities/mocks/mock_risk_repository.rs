use artifact_gate::gate::domain::{ArtifactInfo, RiskAggregation, ValidCoordinate, Vulnerability};
use artifact_gate::prelude::*;
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Mock RiskRepository for testing
///
/// Packages are keyed by `type:name@version`. Unknown packages answer 404.
pub struct MockRiskRepository {
    pub packages: HashMap<String, (ArtifactInfo, RiskAggregation)>,
    pub failure: Option<GateError>,
    pub delay: Option<Duration>,
    pub authenticated: bool,
    pub info_calls: AtomicUsize,
    pub aggregation_calls: AtomicUsize,
    pub suggested: Mutex<Vec<ValidCoordinate>>,
}

impl MockRiskRepository {
    pub fn new() -> Self {
        Self {
            packages: HashMap::new(),
            failure: None,
            delay: None,
            authenticated: false,
            info_calls: AtomicUsize::new(0),
            aggregation_calls: AtomicUsize::new(0),
            suggested: Mutex::new(Vec::new()),
        }
    }

    /// Registers a package with the given `[total, low, medium, high, critical]` counts
    pub fn with_package(
        mut self,
        package_type: &str,
        name: &str,
        version: &str,
        counts: [u64; 5],
        licenses: &[&str],
    ) -> Self {
        let info = ArtifactInfo {
            package_id: Some(format!("{}-{}-{}", package_type, name, version)),
            legacy_package_id: None,
            name: name.to_string(),
            version: version.to_string(),
            package_type: package_type.to_string(),
            release_date: None,
            description: None,
        };
        let [total, low, medium, high, critical] = counts;
        let risk = RiskAggregation {
            vulnerability_count: total,
            low_count: low,
            medium_count: medium,
            high_count: high,
            critical_count: critical,
            max_severity: if critical > 0 {
                "Critical".to_string()
            } else if high > 0 {
                "High".to_string()
            } else {
                "None".to_string()
            },
            max_score: if total > 0 { 7.5 } else { 0.0 },
            licenses: licenses.iter().map(|l| l.to_string()).collect::<BTreeSet<_>>(),
        };
        self.packages
            .insert(format!("{}:{}@{}", package_type, name, version), (info, risk));
        self
    }

    pub fn with_failure(mut self, failure: GateError) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn authenticated(mut self) -> Self {
        self.authenticated = true;
        self
    }

    pub fn info_calls(&self) -> usize {
        self.info_calls.load(Ordering::SeqCst)
    }

    pub fn aggregation_calls(&self) -> usize {
        self.aggregation_calls.load(Ordering::SeqCst)
    }

    fn lookup(&self, package_type: &str, name: &str, version: &str) -> GateResult<&(ArtifactInfo, RiskAggregation)> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        self.packages
            .get(&format!("{}:{}@{}", package_type, name, version))
            .ok_or(GateError::UnexpectedResponseCode { code: 404 })
    }
}

impl Default for MockRiskRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RiskRepository for MockRiskRepository {
    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    async fn get_artifact_info(
        &self,
        package_type: &str,
        name: &str,
        version: &str,
    ) -> GateResult<ArtifactInfo> {
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.lookup(package_type, name, version).map(|(info, _)| info.clone())
    }

    async fn get_risk_aggregation(
        &self,
        package_type: &str,
        name: &str,
        version: &str,
    ) -> GateResult<RiskAggregation> {
        self.aggregation_calls.fetch_add(1, Ordering::SeqCst);
        self.lookup(package_type, name, version).map(|(_, risk)| risk.clone())
    }

    async fn get_vulnerabilities(&self, _identifier: &str) -> GateResult<Vec<Vulnerability>> {
        if !self.authenticated {
            return Err(GateError::UserNotAuthenticated);
        }
        Ok(Vec::new())
    }

    async fn suggest_private_package(&self, coordinate: &ValidCoordinate) -> GateResult<bool> {
        if !self.authenticated {
            return Err(GateError::UserNotAuthenticated);
        }
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        self.suggested.lock().unwrap().push(coordinate.clone());
        Ok(true)
    }
}
