use crate::application::dto::ArtifactEvent;
use crate::gate::domain::Decision;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// ArtifactGatePort - Inbound port invoked by the host on artifact events
///
/// Neither operation returns an error: every failure other than a policy
/// block is logged and the transfer proceeds.
#[async_trait]
pub trait ArtifactGatePort: Send + Sync {
    /// Scans (when stale) and gates an artifact before it is served
    ///
    /// # Arguments
    /// * `event` - The requested path, its ecosystem and its physical locations
    /// * `cancel` - Cancels the remote stage; cancellation behaves like a transient failure
    ///
    /// # Returns
    /// `Decision::Block` with a 403 violation when the policy forbids the artifact
    async fn before_download(&self, event: &ArtifactEvent, cancel: CancellationToken) -> Decision;

    /// Runs the private-package suggestion flow after an upload
    async fn after_upload(&self, event: &ArtifactEvent);
}
