use crate::core::state::BlockStamp;
use crate::errors::{Result, VmError};
use alloy::eips::BlockNumberOrTag;
use alloy::primitives::{Address, Bytes};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use dashmap::DashMap;

/// Read-only client for the chain being forked
pub struct ForkProvider {
    client: DynProvider,
    cache: DashMap<Address, Bytes>,
}

impl ForkProvider {
    pub async fn connect(rpc_url: &str) -> Result<Self> {
        let client = ProviderBuilder::new()
            .connect(rpc_url)
            .await
            .map_err(|e| VmError::ForkError(format!("{}: {}", rpc_url, e)))?
            .erased();

        Ok(Self {
            client,
            cache: DashMap::new(),
        })
    }

    /// Fetch deployed code, failing when the address holds none
    pub async fn clone_code(&self, address: &Address) -> Result<Bytes> {
        // Check cache first
        if let Some(cached) = self.cache.get(address) {
            return Ok(cached.clone());
        }

        let code = self.client.get_code_at(*address).await?;
        if code.is_empty() {
            return Err(VmError::AccountNotFound(format!(
                "no contract code at {} upstream",
                address
            )));
        }

        self.cache.insert(*address, code.clone());
        Ok(code)
    }

    /// Fetch code for several contracts
    pub async fn clone_codes(&self, addresses: &[Address]) -> Result<Vec<(Address, Bytes)>> {
        let mut result = Vec::with_capacity(addresses.len());
        for address in addresses {
            let code = self.clone_code(address).await?;
            result.push((*address, code));
        }
        Ok(result)
    }

    pub async fn latest_block(&self) -> Result<u64> {
        Ok(self.client.get_block_number().await?)
    }

    /// Number and timestamp of the upstream head
    pub async fn sync_clock(&self) -> Result<BlockStamp> {
        let block = self
            .client
            .get_block_by_number(BlockNumberOrTag::Latest)
            .await?
            .ok_or_else(|| VmError::ForkError("upstream returned no latest block".to_string()))?;

        Ok(BlockStamp {
            number: block.header.number,
            timestamp: block.header.timestamp,
        })
    }

    pub async fn chain_id(&self) -> Result<u64> {
        Ok(self.client.get_chain_id().await?)
    }

    /// Drop cached code so the next clone refetches it
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
