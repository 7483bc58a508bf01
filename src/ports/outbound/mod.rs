/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the gate core uses
/// to interact with external systems (host metadata store, risk API, package registry).
pub mod metadata_store;
pub mod package_registry;
pub mod risk_repository;

pub use metadata_store::MetadataStore;
pub use package_registry::{PackageRegistry, RegistrySearchHit};
pub use risk_repository::RiskRepository;
