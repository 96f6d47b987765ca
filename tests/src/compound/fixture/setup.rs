//! Operations and reads against the forked Compound deployment

use {
    super::{CErc20, CompoundFixture, Comptroller},
    crate::addresses::addresses::{MAKER_ADDRESS, USDC_MAINNET},
    alloy::rpc::types::{Log, TransactionReceipt},
    fork_test_framework::helpers::ProtocolFixture,
    fork_test_framework::prelude::*,
    fork_test_framework::Result as VmResult,
};

impl CompoundFixture {
    /// Move `amount` USDC from Maker to the operator; returns the operator's balance
    pub async fn fund_operator(&mut self, amount: U256) -> VmResult<U256> {
        let operator = self.operator();
        self.vm()
            .fund_from_holder(USDC_MAINNET, MAKER_ADDRESS, operator, amount)
            .await
    }

    /// Approve and mint cUSDC for `amount` USDC
    pub async fn supply(&mut self, amount: U256) -> VmResult<TransactionReceipt> {
        let operator = self.operator();
        let c_usdc = self.contracts.c_usdc;

        self.vm()
            .approve_tokens(USDC_MAINNET, operator, c_usdc, amount)
            .await?;

        let receipt = self
            .vm()
            .tx("cUSDC.mint")
            .from(operator)
            .call(c_usdc, &CErc20::mintCall { mintAmount: amount })
            .execute()
            .await?;
        ensure_no_failure("cUSDC.mint", c_usdc, receipt.inner.logs())?;
        Ok(receipt)
    }

    /// Redeem `ctokens` cUSDC for USDC
    pub async fn redeem(&mut self, ctokens: U256) -> VmResult<TransactionReceipt> {
        let operator = self.operator();
        let c_usdc = self.contracts.c_usdc;

        let receipt = self
            .vm()
            .tx("cUSDC.redeem")
            .from(operator)
            .call(c_usdc, &CErc20::redeemCall { redeemTokens: ctokens })
            .execute()
            .await?;
        ensure_no_failure("cUSDC.redeem", c_usdc, receipt.inner.logs())?;
        Ok(receipt)
    }

    pub async fn claim_comp(&mut self, holder: Address) -> VmResult<TransactionReceipt> {
        let operator = self.operator();
        let comptroller = self.contracts.comptroller;

        self.vm()
            .tx("Comptroller.claimComp")
            .from(operator)
            .call(comptroller, &Comptroller::claimCompCall { holder })
            .execute()
            .await
    }

    pub async fn usdc_balance(&self, owner: Address) -> VmResult<U256> {
        self.vm_ref().token_balance(USDC_MAINNET, owner).await
    }

    pub async fn comp_balance(&self, owner: Address) -> VmResult<U256> {
        self.vm_ref().token_balance(self.contracts.comp, owner).await
    }

    pub async fn ctoken_balance(&self, owner: Address) -> VmResult<U256> {
        let c_usdc = CErc20::new(self.contracts.c_usdc, self.vm_ref().provider());
        Ok(c_usdc.balanceOf(owner).call().await?)
    }

    pub async fn exchange_rate_stored(&self) -> VmResult<U256> {
        let c_usdc = CErc20::new(self.contracts.c_usdc, self.vm_ref().provider());
        Ok(c_usdc.exchangeRateStored().call().await?)
    }

    pub async fn supply_rate_per_block(&self) -> VmResult<U256> {
        let c_usdc = CErc20::new(self.contracts.c_usdc, self.vm_ref().provider());
        Ok(c_usdc.supplyRatePerBlock().call().await?)
    }

    pub async fn ctoken_total_supply(&self) -> VmResult<U256> {
        let c_usdc = CErc20::new(self.contracts.c_usdc, self.vm_ref().provider());
        Ok(c_usdc.totalSupply().call().await?)
    }

    pub async fn ctoken_underlying(&self) -> VmResult<Address> {
        let c_usdc = CErc20::new(self.contracts.c_usdc, self.vm_ref().provider());
        Ok(c_usdc.underlying().call().await?)
    }
}

/// Compound rejects some operations with a `Failure` event from the cToken
/// instead of a revert
fn ensure_no_failure(label: &str, c_token: Address, logs: &[Log]) -> VmResult<()> {
    let failure = logs
        .iter()
        .filter(|log| log.address() == c_token)
        .find_map(|log| log.log_decode::<CErc20::Failure>().ok());

    match failure {
        Some(failure) => {
            let event = failure.inner.data;
            Err(VmError::ContractError(format!(
                "{} failed with Compound error {} (info {}, detail {})",
                label, event.error, event.info, event.detail
            )))
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::sol_types::SolEvent;

    const C_USDC: Address = address!("39AA39c021dfbaE8faC545936693aC917d5E7563");

    fn failure_log(emitter: Address) -> Log {
        let event = CErc20::Failure {
            error: U256::from(9u64),
            info: U256::from(38u64),
            detail: U256::ZERO,
        };
        Log {
            inner: alloy::primitives::Log {
                address: emitter,
                data: event.encode_log_data(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_failure_event_is_an_error() {
        let logs = vec![failure_log(C_USDC)];

        let err = ensure_no_failure("cUSDC.redeem", C_USDC, &logs).unwrap_err();
        match err {
            VmError::ContractError(message) => {
                assert!(message.contains("cUSDC.redeem"));
                assert!(message.contains("Compound error 9"));
                assert!(message.contains("info 38"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_failure_event_from_other_contract_is_ignored() {
        let logs = vec![failure_log(USDC_MAINNET)];

        assert!(ensure_no_failure("cUSDC.mint", C_USDC, &logs).is_ok());
        assert!(ensure_no_failure("cUSDC.mint", C_USDC, &[]).is_ok());
    }
}
