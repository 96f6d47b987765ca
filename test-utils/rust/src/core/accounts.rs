//! Account operations including impersonation, ETH balances, and code checks

use alloy::primitives::{Address, U256};
use alloy::providers::ext::AnvilApi;
use alloy::providers::Provider;
use alloy::signers::local::PrivateKeySigner;

use crate::errors::{Result, VmError};

use super::vm::Vm;

/// ETH given to impersonated accounts that cannot pay for gas (10 ETH)
pub const IMPERSONATION_GAS_FUNDS: U256 = U256::from_limbs([10_000_000_000_000_000_000, 0, 0, 0]);

/// Trait for managing accounts on the node
#[allow(async_fn_in_trait)]
pub trait AccountManager {
    /// Let the node accept transactions from `address` without its key.
    /// Accounts short on ETH are topped up so they can pay for gas.
    async fn impersonate(&mut self, address: Address) -> Result<()>;

    async fn stop_impersonating(&mut self, address: Address) -> Result<()>;

    /// Overwrite the ETH balance of an address
    async fn set_eth_balance(&mut self, address: Address, wei: U256) -> Result<()>;

    /// Get ETH balance
    async fn eth_balance(&self, address: Address) -> Result<U256>;

    /// Check if the address holds contract code
    async fn has_code(&self, address: Address) -> Result<bool>;
}

impl AccountManager for Vm {
    async fn impersonate(&mut self, address: Address) -> Result<()> {
        self.provider()
            .anvil_impersonate_account(address)
            .await
            .map_err(|e| VmError::ImpersonationFailed(format!("{}: {}", address, e)))?;

        if self.eth_balance(address).await? < IMPERSONATION_GAS_FUNDS {
            self.set_eth_balance(address, IMPERSONATION_GAS_FUNDS).await?;
        }

        self.impersonated.insert(address);
        tracing::debug!(account = %self.label(&address), "impersonating");
        Ok(())
    }

    async fn stop_impersonating(&mut self, address: Address) -> Result<()> {
        self.provider()
            .anvil_stop_impersonating_account(address)
            .await
            .map_err(|e| VmError::ImpersonationFailed(format!("{}: {}", address, e)))?;

        self.impersonated.remove(&address);
        Ok(())
    }

    async fn set_eth_balance(&mut self, address: Address, wei: U256) -> Result<()> {
        self.provider()
            .anvil_set_balance(address, wei)
            .await
            .map_err(|e| VmError::SetAccountFailed(format!("{}: {}", address, e)))
    }

    async fn eth_balance(&self, address: Address) -> Result<U256> {
        Ok(self.provider().get_balance(address).await?)
    }

    async fn has_code(&self, address: Address) -> Result<bool> {
        let code = self.provider().get_code_at(address).await?;
        Ok(!code.is_empty())
    }
}

impl Vm {
    /// Create a fresh funded account that can send transactions through impersonation
    pub async fn make_account(&mut self, wei: U256) -> Result<Address> {
        let address = PrivateKeySigner::random().address();
        self.impersonate(address).await?;
        self.set_eth_balance(address, wei).await?;
        Ok(address)
    }
}
