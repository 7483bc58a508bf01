/// Mock implementations for testing
mod mock_metadata_store;
mod mock_package_registry;
mod mock_risk_repository;

pub use mock_metadata_store::FailingMetadataStore;
pub use mock_package_registry::MockPackageRegistry;
pub use mock_risk_repository::MockRiskRepository;
