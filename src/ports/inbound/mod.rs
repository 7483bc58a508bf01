/// Inbound ports (Driving ports) - Use case interfaces
///
/// These ports define the interfaces that hosts (plugin runtime, CLI)
/// use to drive the gate.
pub mod artifact_gate_port;

pub use artifact_gate_port::ArtifactGatePort;
