//! Account sources and named accounts

use std::collections::BTreeMap;
use std::fmt;

use alloy::primitives::Address;
use alloy::signers::local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};

use crate::errors::{Result, VmError};

/// Well-known development mnemonic shared by Anvil and Hardhat.
pub const DEFAULT_MNEMONIC: &str = "test test test test test test test test test test test junk";

/// Number of accounts derived from a mnemonic.
pub const DEFAULT_ACCOUNT_COUNT: u32 = 20;

/// Where a network's signing accounts come from
#[derive(Clone, PartialEq, Eq)]
pub enum AccountSource {
    /// HD accounts derived from a seed phrase (`m/44'/60'/0'/0/i`)
    Mnemonic { phrase: String, count: u32 },
    /// Accounts unlocked by the node itself (`eth_accounts`)
    Node,
}

impl fmt::Debug for AccountSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountSource::Mnemonic { count, .. } => f
                .debug_struct("Mnemonic")
                .field("phrase", &"<redacted>")
                .field("count", count)
                .finish(),
            AccountSource::Node => write!(f, "Node"),
        }
    }
}

impl Default for AccountSource {
    fn default() -> Self {
        AccountSource::mnemonic(DEFAULT_MNEMONIC)
    }
}

impl AccountSource {
    pub fn mnemonic(phrase: impl Into<String>) -> Self {
        AccountSource::Mnemonic {
            phrase: phrase.into(),
            count: DEFAULT_ACCOUNT_COUNT,
        }
    }

    /// Local signers for this source. Node-managed sources have none.
    pub fn signers(&self) -> Result<Vec<PrivateKeySigner>> {
        match self {
            AccountSource::Mnemonic { phrase, count } => derive_signers(phrase, *count),
            AccountSource::Node => Ok(vec![]),
        }
    }

    pub fn phrase(&self) -> Option<&str> {
        match self {
            AccountSource::Mnemonic { phrase, .. } => Some(phrase),
            AccountSource::Node => None,
        }
    }

    pub fn count(&self) -> Option<u32> {
        match self {
            AccountSource::Mnemonic { count, .. } => Some(*count),
            AccountSource::Node => None,
        }
    }
}

/// Derive the first `count` accounts of a mnemonic
pub fn derive_signers(phrase: &str, count: u32) -> Result<Vec<PrivateKeySigner>> {
    (0..count)
        .map(|index| {
            MnemonicBuilder::<English>::default()
                .phrase(phrase)
                .index(index)
                .map_err(|e| VmError::SignerError(e.to_string()))?
                .build()
                .map_err(|e| VmError::SignerError(e.to_string()))
        })
        .collect()
}

/// A named account: an index into the signer list, overridable per chain id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedAccount {
    pub default_index: usize,
    pub per_chain: BTreeMap<u64, Address>,
}

impl NamedAccount {
    pub fn index(default_index: usize) -> Self {
        Self {
            default_index,
            per_chain: BTreeMap::new(),
        }
    }

    pub fn on_chain(mut self, chain_id: u64, address: Address) -> Self {
        self.per_chain.insert(chain_id, address);
        self
    }
}

/// Named accounts resolved against the active chain and signer list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedAccounts {
    accounts: BTreeMap<String, NamedAccount>,
}

impl NamedAccounts {
    /// `deployer` (index 0, overridden on mainnet and rinkeby), `tokenOwner`
    /// (index 1) and `randomAddress` (index 2).
    pub fn with_deployer(deployer: Option<Address>) -> Self {
        let mut deployer_account = NamedAccount::index(0);
        if let Some(address) = deployer {
            deployer_account = deployer_account.on_chain(1, address).on_chain(4, address);
        }

        let mut named = Self::default();
        named.insert("deployer", deployer_account);
        named.insert("tokenOwner", NamedAccount::index(1));
        named.insert("randomAddress", NamedAccount::index(2));
        named
    }

    pub fn insert(&mut self, name: impl Into<String>, account: NamedAccount) {
        self.accounts.insert(name.into(), account);
    }

    pub fn get(&self, name: &str) -> Option<&NamedAccount> {
        self.accounts.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.accounts.keys().map(String::as_str)
    }

    /// Resolve `name` for `chain_id`, falling back to its index in `accounts`
    pub fn resolve(&self, name: &str, chain_id: u64, accounts: &[Address]) -> Option<Address> {
        let account = self.accounts.get(name)?;
        account
            .per_chain
            .get(&chain_id)
            .copied()
            .or_else(|| accounts.get(account.default_index).copied())
    }
}
