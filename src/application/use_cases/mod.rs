/// Use cases module containing the gate's pipeline orchestration
mod artifact_gate;
mod coordinate_locks;
mod enforce_policy;
mod scan_artifact;
mod suggest_private_package;

pub use artifact_gate::ArtifactGate;
pub use coordinate_locks::{CoordinateGuard, CoordinateLocks};
pub use enforce_policy::EnforcePolicyUseCase;
pub use scan_artifact::ScanArtifactUseCase;
pub use suggest_private_package::{SuggestPrivatePackageUseCase, SuggestionOutcome};
