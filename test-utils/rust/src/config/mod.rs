//! Environment-driven configuration
//!
//! Everything is read once at startup from the process environment and an
//! optional `.env` file. Nothing here carries protocol logic.

mod accounts;
mod networks;

use std::path::PathBuf;
use std::time::Duration;

use alloy::primitives::Address;

pub use accounts::{
    derive_signers, AccountSource, NamedAccount, NamedAccounts, DEFAULT_ACCOUNT_COUNT,
    DEFAULT_MNEMONIC,
};
pub use networks::{NetworkKind, NetworkProfile, LOCAL_NODE_URL, MAINNET_CHAIN_ID};

use crate::errors::{Result, VmError};

pub const DEFAULT_NETWORK: &str = "hardhat";
pub const SOLIDITY_VERSION: &str = "0.8.4";
pub const TEST_TIMEOUT_MS: u64 = 20_000_000;

/// Gas reporter switches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasReporterConfig {
    pub enabled: bool,
    pub currency: String,
    pub output_file: Option<PathBuf>,
}

/// Framework configuration
#[derive(Debug, Clone)]
pub struct FrameworkConfig {
    pub solidity_version: String,
    pub selected_network: String,
    pub networks: Vec<NetworkProfile>,
    pub named_accounts: NamedAccounts,
    pub gas_reporter: GasReporterConfig,
    pub etherscan_api_key: Option<String>,
    pub test_timeout: Duration,
}

impl FrameworkConfig {
    /// Load from the environment (and `.env`)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    /// Load from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mnemonic = non_empty("MNEMONIC").unwrap_or_else(|| {
            tracing::warn!("MNEMONIC not set, using the development mnemonic");
            DEFAULT_MNEMONIC.to_string()
        });
        let accounts = AccountSource::mnemonic(mnemonic);

        let deployer = non_empty("DEPLOYER_ADDRESS")
            .map(|raw| {
                raw.trim().parse::<Address>().map_err(|e| {
                    VmError::InvalidConfig(format!("DEPLOYER_ADDRESS `{}`: {}", raw, e))
                })
            })
            .transpose()?;

        let networks = vec![
            NetworkProfile::ropsten(lookup("ROPSTEN_URL").unwrap_or_default(), accounts.clone()),
            NetworkProfile::hardhat(non_empty("MAINNET_PROVIDER_URL"), accounts),
            NetworkProfile::local(),
        ];

        let selected_network = non_empty("NETWORK").unwrap_or_else(|| DEFAULT_NETWORK.to_string());
        if !networks.iter().any(|n| n.name == selected_network) {
            return Err(VmError::InvalidConfig(format!(
                "unknown network `{}`",
                selected_network
            )));
        }

        Ok(Self {
            solidity_version: SOLIDITY_VERSION.to_string(),
            selected_network,
            networks,
            named_accounts: NamedAccounts::with_deployer(deployer),
            gas_reporter: GasReporterConfig {
                // any value, including empty, turns it on
                enabled: lookup("REPORT_GAS").is_some(),
                currency: "USD".to_string(),
                output_file: non_empty("GAS_REPORT_FILE").map(PathBuf::from),
            },
            etherscan_api_key: non_empty("ETHERSCAN_API_KEY"),
            test_timeout: Duration::from_millis(TEST_TIMEOUT_MS),
        })
    }

    pub fn network(&self, name: &str) -> Result<&NetworkProfile> {
        self.networks
            .iter()
            .find(|n| n.name == name)
            .ok_or_else(|| VmError::InvalidConfig(format!("unknown network `{}`", name)))
    }

    /// Profile named by `NETWORK`, `hardhat` by default
    pub fn active_network(&self) -> Result<&NetworkProfile> {
        self.network(&self.selected_network)
    }

    /// Upstream url the `hardhat` profile forks from
    pub fn mainnet_provider_url(&self) -> Result<String> {
        self.network(DEFAULT_NETWORK)?
            .url()
            .map(str::to_string)
            .ok_or_else(|| VmError::InvalidConfig("MAINNET_PROVIDER_URL is not set".to_string()))
    }
}
