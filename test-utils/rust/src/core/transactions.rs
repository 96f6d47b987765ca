//! Transaction building and execution

use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::Provider;
use alloy::rpc::types::{TransactionInput, TransactionReceipt, TransactionRequest};
use alloy::sol_types::SolCall;

use crate::{
    core::vm::Vm,
    errors::{Result, VmError},
};

/// Transaction builder for constructing and executing transactions
pub struct TransactionBuilder<'vm> {
    vm: &'vm mut Vm,
    /// Name used in logs and gas reports
    label: String,
    request: TransactionRequest,
    sender: Option<Address>,
}

impl<'vm> TransactionBuilder<'vm> {
    pub fn new(vm: &'vm mut Vm, label: impl Into<String>) -> Self {
        Self {
            vm,
            label: label.into(),
            request: TransactionRequest::default(),
            sender: None,
        }
    }

    /// ABI-encode `call` as calldata for `to`
    pub fn call<C: SolCall>(self, to: Address, call: &C) -> Self {
        self.raw_call(to, call.abi_encode().into())
    }

    pub fn raw_call(mut self, to: Address, calldata: Bytes) -> Self {
        self.request = self.request.to(to).input(TransactionInput::new(calldata));
        self
    }

    pub fn value(mut self, value: U256) -> Self {
        self.request = self.request.value(value);
        self
    }

    /// Explicit sender; takes precedence over any active prank
    pub fn from(mut self, sender: Address) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Execute the transaction and expect a successful receipt
    pub async fn execute(self) -> Result<TransactionReceipt> {
        let TransactionBuilder {
            vm,
            label,
            request,
            sender,
        } = self;

        let sender = match sender.or_else(|| vm.take_prank()) {
            Some(sender) => sender,
            None => vm.operator()?,
        };
        let client = vm.client_for(&sender);

        tracing::debug!(tx = %label, from = %vm.label(&sender), "sending transaction");

        let pending = match client.send_transaction(request.from(sender)).await {
            Ok(pending) => pending,
            Err(e) => {
                return Err(vm.record_failure(VmError::TransactionFailed(format!(
                    "{}: {}",
                    label, e
                ))))
            }
        };

        let receipt = match pending.get_receipt().await {
            Ok(receipt) => receipt,
            Err(e) => {
                return Err(vm.record_failure(VmError::TransactionFailed(format!(
                    "{}: {}",
                    label, e
                ))))
            }
        };

        if !receipt.status() {
            return Err(vm.record_failure(VmError::TransactionReverted(format!(
                "{} ({})",
                label, receipt.transaction_hash
            ))));
        }

        tracing::debug!(
            tx = %label,
            hash = %receipt.transaction_hash,
            block = ?receipt.block_number,
            gas_used = receipt.gas_used,
            "transaction confirmed"
        );

        vm.record_success(
            &label,
            receipt.transaction_hash,
            receipt.gas_used,
            receipt.effective_gas_price,
        );
        Ok(receipt)
    }

    /// Execute and return the failure, panicking if the transaction succeeds
    pub async fn execute_expect_fail(self) -> VmError {
        match self.execute().await {
            Ok(receipt) => panic!(
                "Expected transaction to fail, got {}",
                receipt.transaction_hash
            ),
            Err(e) => e,
        }
    }
}

impl Vm {
    pub fn tx(&mut self, label: impl Into<String>) -> TransactionBuilder<'_> {
        TransactionBuilder::new(self, label)
    }
}
