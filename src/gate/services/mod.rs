pub mod artifact_filter;
pub mod coordinate_resolver;
pub mod name_fallback;
pub mod policy_gate;
pub mod scan_cache;

pub use coordinate_resolver::CoordinateResolver;
pub use policy_gate::PolicyGate;
pub use scan_cache::{ScanCache, ScanTtl};
