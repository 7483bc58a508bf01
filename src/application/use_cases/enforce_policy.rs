use crate::gate::domain::{Decision, PhysicalLocation};
use crate::gate::services::PolicyGate;
use crate::ports::outbound::MetadataStore;
use tracing::{error, info};

/// EnforcePolicyUseCase - Turns stored scan records into a download decision
///
/// Policy blocks are fail-closed. Anything else that goes wrong while reading
/// the records is logged and the artifact is allowed.
pub struct EnforcePolicyUseCase<'a> {
    gate: &'a PolicyGate,
}

impl<'a> EnforcePolicyUseCase<'a> {
    pub fn new(gate: &'a PolicyGate) -> Self {
        Self { gate }
    }

    pub fn execute<S: MetadataStore + ?Sized>(
        &self,
        store: &S,
        artifact: &str,
        locations: &[PhysicalLocation],
    ) -> Decision {
        match self.gate.evaluate(store, artifact, locations) {
            Ok(Decision::Allow) => Decision::Allow,
            Ok(Decision::Block(violation)) => {
                info!(artifact, code = violation.code, reason = %violation.message, "Download blocked by policy");
                Decision::Block(violation)
            }
            Err(e) => {
                error!(artifact, error = %e, "Failed to evaluate the policy, allowing the artifact");
                Decision::Allow
            }
        }
    }
}
