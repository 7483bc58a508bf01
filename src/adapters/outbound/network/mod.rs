/// Network adapters for the risk API, its token endpoint and the Composer registry
mod access_token_manager;
pub mod api_headers;
mod packagist_client;
mod risk_client;

pub use access_token_manager::AccessTokenManager;
pub use packagist_client::{PackagistClient, DEFAULT_PACKAGIST_URL};
pub use risk_client::RiskApiClient;
