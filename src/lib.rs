//! artifact-gate - download gate for binary package repositories
//!
//! Resolves the ecosystem coordinate of each requested artifact, caches
//! third-party vulnerability and license risk data on the artifact, and
//! enforces a security threshold and license allow-list before the artifact
//! is served. Follows hexagonal architecture.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Gate** (`gate`): Domain model and pure domain services (resolution, cache, policy)
//! - **Application Layer** (`application`): Use cases, DTOs and the composition root
//! - **Ports** (`ports`): Interface definitions for the host and infrastructure
//! - **Adapters** (`adapters`): HTTP clients and metadata stores
//! - **Shared** (`shared`): Error taxonomy, `Result` aliases and filesystem checks
//!
//! # Example
//!
//! ```no_run
//! use artifact_gate::prelude::*;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<()> {
//! let store = InMemoryMetadataStore::new();
//! let gate = GateFactory::create(&GateSettings::default(), store).await?;
//!
//! let requested: PhysicalLocation = "npm-remote/lodash/-/lodash-0.2.1.tgz".parse().map_err(anyhow::Error::msg)?;
//! let event = ArtifactEvent::new(
//!     requested.clone(),
//!     PackageManager::Npm,
//!     FileLayout::default(),
//!     vec![requested],
//! );
//!
//! match gate.before_download(&event, CancellationToken::new()).await {
//!     Decision::Allow => println!("allowed"),
//!     Decision::Block(violation) => println!("{}", violation.message),
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod gate;
pub mod logging;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::network::{AccessTokenManager, PackagistClient, RiskApiClient};
    pub use crate::adapters::outbound::store::{InMemoryMetadataStore, JsonFileMetadataStore};
    pub use crate::application::dto::{ArtifactEvent, ScanOutcome};
    pub use crate::application::factories::{DefaultGate, GateFactory};
    pub use crate::application::use_cases::ArtifactGate;
    pub use crate::config::{ConfigFile, GateSettings};
    pub use crate::gate::domain::{
        ArtifactCoordinate, Credentials, Decision, FileLayout, LicenseAllowList, PackageManager,
        PhysicalLocation, PolicyConfig, PolicyViolation, Severity,
    };
    pub use crate::gate::services::{CoordinateResolver, PolicyGate, ScanCache, ScanTtl};
    pub use crate::ports::inbound::ArtifactGatePort;
    pub use crate::ports::outbound::{MetadataStore, PackageRegistry, RiskRepository};
    pub use crate::shared::{GateError, GateResult, Result};
}
