/// Data Transfer Objects for application layer
///
/// DTOs carry host events into the pipeline and report what a scan did,
/// keeping the gate domain isolated from the host's repository model.
mod artifact_event;
mod scan_outcome;

pub use artifact_event::ArtifactEvent;
pub use scan_outcome::ScanOutcome;
