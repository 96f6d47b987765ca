use alloy::node_bindings::{Anvil, AnvilInstance};
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use tokio::runtime::Runtime;

use crate::{
    config::{AccountSource, NetworkKind, NetworkProfile},
    core::{accounts::AccountManager, vm::Vm},
    errors::{Result, VmError},
    fork::ForkProvider,
};

#[derive(Debug, Clone)]
enum VmMode {
    /// Fresh Anvil node with an empty chain
    Local,
    Fork(ForkSettings),
    /// Already running node
    Connect(String),
}

#[derive(Debug, Clone)]
struct ForkSettings {
    rpc_url: String,
    block_number: Option<u64>,
}

/// Builder for the test environment
#[derive(Debug, Clone)]
pub struct VmBuilder {
    mode: VmMode,
    accounts: AccountSource,
    tracked_contracts: Vec<Address>,
    labels: Vec<(Address, String)>,
    pin_block: bool,
    chain_id: Option<u64>,
    gas_price: Option<u128>,
    base_fee: Option<u64>,
    hardfork: Option<String>,
    report_gas: bool,
}

impl Default for VmBuilder {
    fn default() -> Self {
        Self {
            mode: VmMode::Local,
            accounts: AccountSource::default(),
            tracked_contracts: vec![],
            labels: vec![],
            pin_block: true,
            chain_id: None,
            gas_price: None,
            base_fee: None,
            hardfork: None,
            report_gas: false,
        }
    }
}

impl VmBuilder {
    /// Start local environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the builder to fork from the provided RPC url.
    pub fn fork(rpc_url: impl Into<String>) -> Self {
        Self {
            mode: VmMode::Fork(ForkSettings {
                rpc_url: rpc_url.into(),
                block_number: None,
            }),
            ..Self::default()
        }
    }

    /// Attach to a node that is already running. Uses the node's unlocked accounts by default.
    pub fn connect(url: impl Into<String>) -> Self {
        Self {
            mode: VmMode::Connect(url.into()),
            accounts: AccountSource::Node,
            ..Self::default()
        }
    }

    /// Builder matching a configured network profile.
    pub fn from_profile(profile: &NetworkProfile) -> Result<Self> {
        let builder = match &profile.kind {
            NetworkKind::Remote { url } => Self::connect(url.clone()),
            NetworkKind::Fork {
                upstream_url,
                gas_price,
                base_fee,
            } => {
                let url = upstream_url.clone().ok_or_else(|| {
                    VmError::InvalidConfig(format!(
                        "network {} forks mainnet but MAINNET_PROVIDER_URL is not set",
                        profile.name
                    ))
                })?;
                Self::fork(url).gas_price(*gas_price).base_fee(*base_fee)
            }
        };

        let mut builder = builder.accounts(profile.accounts.clone());
        builder.chain_id = profile.chain_id;
        builder.hardfork = profile.hardfork.clone();
        Ok(builder)
    }

    pub fn accounts(mut self, accounts: AccountSource) -> Self {
        self.accounts = accounts;
        self
    }

    pub fn mnemonic(self, phrase: impl Into<String>) -> Self {
        self.accounts(AccountSource::mnemonic(phrase))
    }

    /// Fork at a fixed upstream block instead of the head.
    pub fn fork_block_number(mut self, block_number: u64) -> Self {
        if let VmMode::Fork(settings) = &mut self.mode {
            settings.block_number = Some(block_number);
        }
        self
    }

    /// Pin the fork to the upstream head observed at build time (defaults to true).
    pub fn pin_block(mut self, pin: bool) -> Self {
        self.pin_block = pin;
        self
    }

    pub fn chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn gas_price(mut self, wei: u128) -> Self {
        self.gas_price = Some(wei);
        self
    }

    pub fn base_fee(mut self, wei: u64) -> Self {
        self.base_fee = Some(wei);
        self
    }

    pub fn hardfork(mut self, name: impl Into<String>) -> Self {
        self.hardfork = Some(name.into());
        self
    }

    /// Require contract code at an address before tests run.
    pub fn track_contract(mut self, address: Address) -> Self {
        self.tracked_contracts.push(address);
        self
    }

    /// Require contract code at a batch of addresses.
    pub fn track_contracts<I>(mut self, contracts: I) -> Self
    where
        I: IntoIterator<Item = Address>,
    {
        self.tracked_contracts.extend(contracts);
        self
    }

    pub fn label(mut self, address: Address, name: impl Into<String>) -> Self {
        self.labels.push((address, name.into()));
        self
    }

    /// Record gas used by every transaction.
    pub fn report_gas(mut self, enabled: bool) -> Self {
        self.report_gas = enabled;
        self
    }

    /// Build the VM asynchronously.
    pub async fn build(self) -> Result<Vm> {
        let mut vm = match &self.mode {
            VmMode::Local => {
                let node = self.spawn_node(None)?;
                self.attach(node).await?
            }
            VmMode::Fork(settings) => {
                let fork = ForkProvider::connect(&settings.rpc_url).await?;
                fork.clone_codes(&self.tracked_contracts).await?;

                let block_number = match settings.block_number {
                    Some(number) => Some(number),
                    None if self.pin_block => {
                        let head = fork.sync_clock().await?;
                        tracing::info!(block = %head, "pinning fork to upstream head");
                        Some(head.number)
                    }
                    None => None,
                };

                let node = self.spawn_node(Some((&settings.rpc_url, block_number)))?;
                self.attach(node).await?
            }
            VmMode::Connect(url) => {
                if self.hardfork.is_some() || self.gas_price.is_some() {
                    tracing::debug!(url = %url, "node settings are ignored for a running node");
                }
                Vm::connect(url, self.accounts.signers()?).await?
            }
        };

        for address in &self.tracked_contracts {
            if !vm.has_code(*address).await? {
                return Err(VmError::AccountNotFound(format!(
                    "no contract code at {}",
                    address
                )));
            }
        }

        for (address, name) in &self.labels {
            vm.set_label(*address, name.clone());
        }

        if self.report_gas {
            vm.enable_gas_report();
        }

        tracing::info!(
            endpoint = %vm.endpoint(),
            chain_id = vm.chain_id(),
            accounts = vm.accounts().len(),
            "vm ready"
        );
        Ok(vm)
    }

    /// Blocking helper for callers without a runtime.
    pub fn build_blocking(self) -> Result<Vm> {
        Runtime::new()
            .map_err(|e| VmError::Custom(format!("Failed to create runtime: {e}")))?
            .block_on(self.build())
    }

    /// Connect to a spawned node and hand it to the VM
    async fn attach(&self, node: AnvilInstance) -> Result<Vm> {
        let signers = match &self.accounts {
            AccountSource::Mnemonic { .. } => self.accounts.signers()?,
            AccountSource::Node => node
                .keys()
                .iter()
                .map(|key| PrivateKeySigner::from_signing_key(key.clone().into()))
                .collect(),
        };

        let vm = Vm::connect(&node.endpoint(), signers).await?;
        Ok(vm.attach_node(node))
    }

    fn spawn_node(&self, fork: Option<(&str, Option<u64>)>) -> Result<AnvilInstance> {
        let mut anvil = Anvil::new();

        if let Some((url, block_number)) = fork {
            anvil = anvil.fork(url);
            if let Some(number) = block_number {
                anvil = anvil.fork_block_number(number);
            }
        }
        if let Some(chain_id) = self.chain_id {
            anvil = anvil.chain_id(chain_id);
        }
        if let Some(phrase) = self.accounts.phrase() {
            anvil = anvil.mnemonic(phrase);
        }
        if let Some(count) = self.accounts.count() {
            anvil = anvil.args(["--accounts".to_string(), count.to_string()]);
        }
        if let Some(price) = self.gas_price {
            anvil = anvil.args(["--gas-price".to_string(), price.to_string()]);
        }
        if let Some(fee) = self.base_fee {
            anvil = anvil.args(["--base-fee".to_string(), fee.to_string()]);
        }
        if let Some(hardfork) = &self.hardfork {
            anvil = anvil.args(["--hardfork".to_string(), hardfork.clone()]);
        }

        anvil
            .try_spawn()
            .map_err(|e| VmError::NodeSpawnFailed(e.to_string()))
    }
}
