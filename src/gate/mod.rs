/// Gate domain: artifact coordinates, scan records and policy evaluation
///
/// Everything here is free of I/O apart from the registry lookup the
/// coordinate resolver delegates through the `PackageRegistry` port.
pub mod domain;
pub mod services;
