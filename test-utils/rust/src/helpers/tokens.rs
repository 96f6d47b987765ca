use alloy::primitives::{Address, U256};
use alloy::rpc::types::TransactionReceipt;
use alloy::sol;

use crate::core::{accounts::AccountManager, vm::Vm};
use crate::errors::{Result, VmError};

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function totalSupply() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
        function approve(address spender, uint256 amount) external returns (bool);
        function transferFrom(address from, address to, uint256 amount) external returns (bool);
    }
}

/// Token management trait
#[allow(async_fn_in_trait)]
pub trait TokenHelper {
    /// Get token balance for an owner
    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256>;

    async fn token_allowance(&self, token: Address, owner: Address, spender: Address)
        -> Result<U256>;

    /// Get token metadata
    async fn token_info(&self, token: Address) -> Result<TokenInfo>;

    /// `transfer` sent by `from`
    async fn transfer_tokens(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<TransactionReceipt>;

    /// `approve` sent by `owner`
    async fn approve_tokens(
        &mut self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TransactionReceipt>;

    /// Move `amount` from a funded holder to `recipient` by impersonating the holder.
    /// Returns the recipient's balance afterwards.
    async fn fund_from_holder(
        &mut self,
        token: Address,
        holder: Address,
        recipient: Address,
        amount: U256,
    ) -> Result<U256>;
}

/// Token metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: U256,
}

impl TokenHelper for Vm {
    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256> {
        let erc20 = IERC20::new(token, self.provider());
        Ok(erc20.balanceOf(owner).call().await?)
    }

    async fn token_allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256> {
        let erc20 = IERC20::new(token, self.provider());
        Ok(erc20.allowance(owner, spender).call().await?)
    }

    async fn token_info(&self, token: Address) -> Result<TokenInfo> {
        let erc20 = IERC20::new(token, self.provider());

        Ok(TokenInfo {
            address: token,
            symbol: erc20.symbol().call().await?,
            decimals: erc20.decimals().call().await?,
            total_supply: erc20.totalSupply().call().await?,
        })
    }

    async fn transfer_tokens(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<TransactionReceipt> {
        let label = format!("{}.transfer", self.label(&token));
        self.tx(label)
            .from(from)
            .call(token, &IERC20::transferCall { to, amount })
            .execute()
            .await
    }

    async fn approve_tokens(
        &mut self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TransactionReceipt> {
        let label = format!("{}.approve", self.label(&token));
        self.tx(label)
            .from(owner)
            .call(token, &IERC20::approveCall { spender, amount })
            .execute()
            .await
    }

    async fn fund_from_holder(
        &mut self,
        token: Address,
        holder: Address,
        recipient: Address,
        amount: U256,
    ) -> Result<U256> {
        let holder_balance = self.token_balance(token, holder).await?;
        if holder_balance < amount {
            return Err(VmError::TokenError(format!(
                "Insufficient balance: {} < {}",
                holder_balance, amount
            )));
        }

        let was_impersonating = self.is_impersonating(&holder);
        self.impersonate(holder).await?;
        let transfer = self.transfer_tokens(token, holder, recipient, amount).await;
        let stopped = if was_impersonating {
            Ok(())
        } else {
            self.stop_impersonating(holder).await
        };
        first_error(transfer, stopped)?;

        self.token_balance(token, recipient).await
    }
}

/// Outcome of an operation followed by its cleanup; the operation's error wins
fn first_error<T>(outcome: Result<T>, cleanup: Result<()>) -> Result<T> {
    let value = outcome?;
    cleanup?;
    Ok(value)
}

/// Mainnet token addresses
pub mod addresses {
    use alloy::primitives::{address, Address};

    pub const USDC: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
    pub const COMP: Address = address!("c00e94Cb662C3520282E6f5717214004A7f26888");
}

/// Token enum for easier handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKey {
    USDC,
    COMP,
}

impl TokenKey {
    pub fn address(&self) -> Address {
        match self {
            TokenKey::USDC => addresses::USDC,
            TokenKey::COMP => addresses::COMP,
        }
    }

    pub fn decimals(&self) -> u8 {
        match self {
            TokenKey::USDC => 6,
            TokenKey::COMP => 18,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TokenKey::USDC => "USDC",
            TokenKey::COMP => "COMP",
        }
    }

    pub fn all() -> Vec<TokenKey> {
        vec![TokenKey::USDC, TokenKey::COMP]
    }
}
