//! Core VM functionality including node ownership and pranking

use std::collections::{HashMap, HashSet};

use alloy::network::EthereumWallet;
use alloy::node_bindings::AnvilInstance;
use alloy::primitives::{Address, B256, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;

use crate::{
    errors::{Result, VmError},
    internal::gas::GasReport,
};

/// Sender override for upcoming transactions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Prank {
    address: Option<Address>,
    persistent: bool,
}

impl Prank {
    /// Next transaction only
    pub fn once(&mut self, address: Address) {
        self.address = Some(address);
        self.persistent = false;
    }

    /// Every transaction until `stop`
    pub fn start(&mut self, address: Address) {
        self.address = Some(address);
        self.persistent = true;
    }

    pub fn stop(&mut self) {
        self.address = None;
        self.persistent = false;
    }

    pub fn current(&self) -> Option<Address> {
        self.address
    }

    /// Sender for the transaction being built; single-use pranks are cleared
    pub fn take(&mut self) -> Option<Address> {
        let address = self.address;
        if !self.persistent {
            self.address = None;
        }
        address
    }
}

/// Structure for transaction execution and state management on a node
pub struct Vm {
    /// Anvil child process, killed when the VM is dropped
    node: Option<AnvilInstance>,

    endpoint: String,

    /// Provider signing with the configured wallet
    provider: DynProvider,

    /// Provider relying on `eth_sendTransaction` (impersonated or node-unlocked senders)
    unsigned: DynProvider,

    /// Accounts in signer order; the first one is the operator
    accounts: Vec<Address>,

    /// Accounts the wallet can sign for
    local_signers: HashSet<Address>,

    chain_id: u64,

    prank: Prank,

    /// Accounts currently impersonated on the node
    pub(crate) impersonated: HashSet<Address>,

    /// Local snapshot id -> node snapshot id
    pub(crate) snapshots: HashMap<u64, U256>,

    /// Next snapshot ID
    pub(crate) next_snapshot_id: u64,

    /// Human readable names for addresses in logs
    labels: HashMap<Address, String>,

    gas_report: Option<GasReport>,

    /// Hashes of confirmed transactions
    tx_history: Vec<B256>,

    /// Error of the most recent failed transaction (if any)
    last_error: Option<String>,
}

impl Vm {
    /// Connect to a running node. Without local signers the node's own
    /// unlocked accounts are used.
    pub async fn connect(endpoint: &str, signers: Vec<PrivateKeySigner>) -> Result<Self> {
        let unsigned = ProviderBuilder::new().connect(endpoint).await?.erased();

        let local_signers: HashSet<Address> = signers.iter().map(|s| s.address()).collect();
        let (provider, accounts) = match signers.split_first() {
            Some((first, rest)) => {
                let mut wallet = EthereumWallet::from(first.clone());
                for signer in rest {
                    wallet.register_signer(signer.clone());
                }
                let provider = ProviderBuilder::new()
                    .wallet(wallet)
                    .connect(endpoint)
                    .await?
                    .erased();
                let accounts = signers.iter().map(|s| s.address()).collect();
                (provider, accounts)
            }
            None => {
                let accounts = unsigned.get_accounts().await?;
                (unsigned.clone(), accounts)
            }
        };

        let chain_id = provider.get_chain_id().await?;

        Ok(Self {
            node: None,
            endpoint: endpoint.to_string(),
            provider,
            unsigned,
            accounts,
            local_signers,
            chain_id,
            prank: Prank::default(),
            impersonated: HashSet::new(),
            snapshots: HashMap::new(),
            next_snapshot_id: 0,
            labels: HashMap::new(),
            gas_report: None,
            tx_history: vec![],
            last_error: None,
        })
    }

    /// Take ownership of the node process backing this VM
    pub(crate) fn attach_node(mut self, node: AnvilInstance) -> Self {
        self.node = Some(node);
        self
    }

    /// Whether the VM owns a spawned node
    pub fn owns_node(&self) -> bool {
        self.node.is_some()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn accounts(&self) -> &[Address] {
        &self.accounts
    }

    /// Account that sends transactions unless a prank says otherwise
    pub fn operator(&self) -> Result<Address> {
        self.accounts.first().copied().ok_or(VmError::NoSigners)
    }

    /// Provider able to send on behalf of `sender`
    pub(crate) fn client_for(&self, sender: &Address) -> DynProvider {
        if self.local_signers.contains(sender) {
            self.provider.clone()
        } else {
            self.unsigned.clone()
        }
    }

    /// Set prank address for next transaction only
    pub fn prank(&mut self, address: Address) {
        self.prank.once(address);
    }

    /// Set persistent impersonation until stop_prank is called
    pub fn start_prank(&mut self, address: Address) {
        self.prank.start(address);
    }

    /// Clear impersonation
    pub fn stop_prank(&mut self) {
        self.prank.stop();
    }

    /// Get current prank address
    pub fn get_prank(&self) -> Option<Address> {
        self.prank.current()
    }

    pub(crate) fn take_prank(&mut self) -> Option<Address> {
        self.prank.take()
    }

    pub fn is_impersonating(&self, address: &Address) -> bool {
        self.impersonated.contains(address)
    }

    /// Set a name for an address (for logs and gas reports)
    pub fn set_label(&mut self, address: Address, name: impl Into<String>) {
        self.labels.insert(address, name.into());
    }

    pub fn label(&self, address: &Address) -> String {
        self.labels
            .get(address)
            .cloned()
            .unwrap_or_else(|| address.to_string())
    }

    pub fn enable_gas_report(&mut self) {
        if self.gas_report.is_none() {
            self.gas_report = Some(GasReport::default());
        }
    }

    /// Gas recorded so far, when reporting is enabled
    pub fn gas_report(&self) -> Option<&GasReport> {
        self.gas_report.as_ref()
    }

    pub fn tx_history(&self) -> &[B256] {
        &self.tx_history
    }

    pub fn last_tx(&self) -> Option<B256> {
        self.tx_history.last().copied()
    }

    pub(crate) fn record_success(&mut self, label: &str, tx_hash: B256, gas_used: u64, gas_price: u128) {
        self.last_error = None;
        self.tx_history.push(tx_hash);
        if let Some(report) = self.gas_report.as_mut() {
            report.record(label, gas_used, gas_price);
        }
    }

    /// Store the error of a failed transaction and hand it back
    pub(crate) fn record_failure(&mut self, err: VmError) -> VmError {
        self.last_error = Some(err.to_string());
        err
    }

    /// Clear the error captured from the last failed transaction
    pub fn clear_last_error(&mut self) {
        self.last_error = None;
    }

    /// Get the error of the last failed transaction, if any
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
