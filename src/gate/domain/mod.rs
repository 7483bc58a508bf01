pub mod access_token;
pub mod artifact_info;
pub mod coordinate;
pub mod credentials;
pub mod file_layout;
pub mod location;
pub mod package_manager;
pub mod policy;
pub mod risk;
pub mod scan_record;

pub use access_token::AccessToken;
pub use artifact_info::{ArtifactInfo, Vulnerability};
pub use coordinate::{ArtifactCoordinate, ValidCoordinate};
pub use credentials::Credentials;
pub use file_layout::FileLayout;
pub use location::PhysicalLocation;
pub use package_manager::PackageManager;
pub use policy::{Decision, LicenseAllowList, PolicyConfig, PolicyViolation};
pub use risk::{RiskAggregation, RiskCounters, Severity};
pub use scan_record::ScanRecord;
