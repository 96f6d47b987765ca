//! RPC URL helpers

use crate::errors::{Result, VmError};

/// Archive node used as the fork upstream, read from `MAINNET_PROVIDER_URL`
pub fn mainnet_provider_url() -> Result<String> {
    dotenv::var("MAINNET_PROVIDER_URL")
        .map_err(|_| VmError::InvalidConfig("MAINNET_PROVIDER_URL is not set".to_string()))
}
