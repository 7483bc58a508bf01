/// Adapters layer - Infrastructure implementations
///
/// This layer contains concrete implementations of the outbound ports:
/// HTTP clients for the risk API and Composer registry, and metadata stores.
pub mod outbound;
