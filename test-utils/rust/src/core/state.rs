//! Time warping, mining, snapshots, and state management

use std::fmt;

use alloy::eips::BlockNumberOrTag;
use alloy::providers::ext::AnvilApi;
use alloy::providers::Provider;
use alloy::rpc::types::TransactionReceipt;
use chrono::{DateTime, Utc};

use crate::errors::{Result, VmError};

use super::vm::Vm;

/// Block number paired with its timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BlockStamp {
    pub number: u64,
    pub timestamp: u64,
}

impl BlockStamp {
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(i64::try_from(self.timestamp).ok()?, 0)
    }

    pub fn blocks_since(&self, earlier: &BlockStamp) -> u64 {
        self.number.saturating_sub(earlier.number)
    }

    pub fn seconds_since(&self, earlier: &BlockStamp) -> u64 {
        self.timestamp.saturating_sub(earlier.timestamp)
    }
}

impl fmt::Display for BlockStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.datetime() {
            Some(time) => write!(f, "#{} ({})", self.number, time.to_rfc3339()),
            None => write!(f, "#{} (t={})", self.number, self.timestamp),
        }
    }
}

/// Trait for managing node state (time, blocks, snapshots)
#[allow(async_fn_in_trait)]
pub trait StateManager {
    /// Move the clock forward and mine a block carrying the new time
    async fn advance_time(&mut self, seconds: u64) -> Result<()>;

    /// Set the timestamp of the next mined block
    async fn set_next_timestamp(&mut self, timestamp: u64) -> Result<()>;

    /// Mine `blocks` empty blocks
    async fn mine(&mut self, blocks: u64) -> Result<()>;

    /// Get current block number
    async fn current_block(&self) -> Result<u64>;

    /// Get timestamp of the latest block
    async fn timestamp(&self) -> Result<u64>;

    async fn block_stamp(&self, number: u64) -> Result<BlockStamp>;

    /// Take a snapshot of current state
    async fn snapshot(&mut self) -> Result<u64>;

    /// Revert to a snapshot state. Node snapshots are single use.
    async fn revert(&mut self, snapshot_id: u64) -> Result<()>;
}

impl StateManager for Vm {
    async fn advance_time(&mut self, seconds: u64) -> Result<()> {
        self.provider()
            .raw_request::<_, serde_json::Value>("evm_increaseTime".into(), (seconds,))
            .await?;
        self.mine(1).await
    }

    async fn set_next_timestamp(&mut self, timestamp: u64) -> Result<()> {
        self.provider()
            .raw_request::<_, serde_json::Value>("evm_setNextBlockTimestamp".into(), (timestamp,))
            .await?;
        Ok(())
    }

    async fn mine(&mut self, blocks: u64) -> Result<()> {
        self.provider().anvil_mine(Some(blocks), None).await?;
        Ok(())
    }

    async fn current_block(&self) -> Result<u64> {
        Ok(self.provider().get_block_number().await?)
    }

    async fn timestamp(&self) -> Result<u64> {
        Ok(self.latest_stamp().await?.timestamp)
    }

    async fn block_stamp(&self, number: u64) -> Result<BlockStamp> {
        self.stamp_at(BlockNumberOrTag::Number(number)).await
    }

    async fn snapshot(&mut self) -> Result<u64> {
        let node_id = self.provider().anvil_snapshot().await?;

        let id = self.next_snapshot_id;
        self.next_snapshot_id += 1;
        self.snapshots.insert(id, node_id);
        Ok(id)
    }

    async fn revert(&mut self, snapshot_id: u64) -> Result<()> {
        let node_id = self
            .snapshots
            .remove(&snapshot_id)
            .ok_or(VmError::SnapshotNotFound(snapshot_id))?;

        if !self.provider().anvil_revert(node_id).await? {
            return Err(VmError::SnapshotNotFound(snapshot_id));
        }
        Ok(())
    }
}

impl Vm {
    pub async fn latest_stamp(&self) -> Result<BlockStamp> {
        self.stamp_at(BlockNumberOrTag::Latest).await
    }

    /// Block the receipt's transaction was mined in
    pub async fn stamp_of(&self, receipt: &TransactionReceipt) -> Result<BlockStamp> {
        let number = receipt.block_number.ok_or_else(|| {
            VmError::TransactionFailed(format!("{} is still pending", receipt.transaction_hash))
        })?;
        self.block_stamp(number).await
    }

    async fn stamp_at(&self, tag: BlockNumberOrTag) -> Result<BlockStamp> {
        let block = self
            .provider()
            .get_block_by_number(tag)
            .await?
            .ok_or_else(|| VmError::RpcError(format!("block {} not found", tag)))?;

        Ok(BlockStamp {
            number: block.header.number,
            timestamp: block.header.timestamp,
        })
    }
}
