//! Named network profiles

use super::accounts::AccountSource;

pub const LOCAL_NODE_URL: &str = "http://127.0.0.1:8545";
pub const MAINNET_CHAIN_ID: u64 = 1;

/// How a profile reaches its chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkKind {
    /// An already running node
    Remote { url: String },
    /// A local Anvil node forking `upstream_url`
    Fork {
        upstream_url: Option<String>,
        gas_price: u128,
        base_fee: u64,
    },
}

/// A named network: endpoint, account set and chain settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkProfile {
    pub name: String,
    pub kind: NetworkKind,
    pub accounts: AccountSource,
    pub chain_id: Option<u64>,
    pub hardfork: Option<String>,
}

impl NetworkProfile {
    /// Public testnet reached over `url`
    pub fn ropsten(url: impl Into<String>, accounts: AccountSource) -> Self {
        Self {
            name: "ropsten".to_string(),
            kind: NetworkKind::Remote { url: url.into() },
            accounts,
            chain_id: None,
            hardfork: None,
        }
    }

    /// Mainnet simulation: zero gas price and base fee, chain id 1 so wallets
    /// treat it as mainnet. Node request logging is not carried over; the
    /// node's output stays with the node bindings.
    pub fn hardhat(upstream_url: Option<String>, accounts: AccountSource) -> Self {
        Self {
            name: "hardhat".to_string(),
            kind: NetworkKind::Fork {
                upstream_url,
                gas_price: 0,
                base_fee: 0,
            },
            accounts,
            chain_id: Some(MAINNET_CHAIN_ID),
            hardfork: None,
        }
    }

    /// Node on localhost with its own unlocked accounts
    pub fn local() -> Self {
        Self {
            name: "local".to_string(),
            kind: NetworkKind::Remote {
                url: LOCAL_NODE_URL.to_string(),
            },
            accounts: AccountSource::Node,
            chain_id: None,
            hardfork: Some("berlin".to_string()),
        }
    }

    pub fn is_fork(&self) -> bool {
        matches!(self.kind, NetworkKind::Fork { .. })
    }

    /// RPC url of a remote profile, or the upstream url of a fork
    pub fn url(&self) -> Option<&str> {
        match &self.kind {
            NetworkKind::Remote { url } => Some(url),
            NetworkKind::Fork { upstream_url, .. } => upstream_url.as_deref(),
        }
    }
}
