//! Internal implementation details

pub mod conversions;
pub mod gas;
pub mod rpc;

pub use conversions::{format_token_amount, parse_token_amount, u256_to_u128};
pub use gas::{gas_used, GasEntry, GasReport, GasSummary};
pub use rpc::mainnet_provider_url;
