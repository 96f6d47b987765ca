use alloy::primitives::{Address, U256};

use crate::helpers::tokens::TokenHelper;
use crate::{
    core::{accounts::AccountManager, vm::Vm},
    errors::VmError,
};

/// Result of an `expect_revert` check, containing details about the failure
#[derive(Debug, Clone)]
pub struct RevertInfo {
    /// The error that caused the revert
    pub error: String,
    /// Error stored by the VM for the last failed transaction
    pub last_error: Option<String>,
}

impl RevertInfo {
    pub fn new(error: &VmError, last_error: Option<&str>) -> Self {
        Self {
            error: error.to_string(),
            last_error: last_error.map(str::to_string),
        }
    }

    /// Check if the error or the stored failure contain the expected message
    pub fn contains(&self, message: &str) -> bool {
        self.error.contains(message)
            || self
                .last_error
                .as_ref()
                .map(|last| last.contains(message))
                .unwrap_or(false)
    }

    /// Whether the node reported an on-chain revert (as opposed to a send failure)
    pub fn is_revert(&self) -> bool {
        self.error.starts_with("Transaction reverted")
    }
}

/// Assert approximate equality with absolute delta
pub fn assert_approx_eq(actual: u128, expected: u128, delta: u128) {
    let diff = actual.abs_diff(expected);

    assert!(
        diff <= delta,
        "Values not approximately equal.\nExpected: {}\nActual:   {}\nDiff:     {} (max allowed: {})",
        expected, actual, diff, delta
    );
}

/// Core assertion trait
#[allow(async_fn_in_trait)]
pub trait Assertions {
    /// Assert ETH balance equals expected
    async fn assert_eth_balance_eq(&self, address: Address, expected: U256);

    /// Assert ETH balance is greater than minimum
    async fn assert_eth_balance_gt(&self, address: Address, minimum: U256);

    /// Assert token balance equals expected
    async fn assert_token_balance_eq(&self, token: Address, owner: Address, expected: U256);

    /// Assert token balance is greater than minimum
    async fn assert_token_balance_gt(&self, token: Address, owner: Address, minimum: U256);

    /// Assert contract code exists at address
    async fn assert_has_code(&self, address: Address);
}

impl Assertions for Vm {
    async fn assert_eth_balance_eq(&self, address: Address, expected: U256) {
        let actual = self
            .eth_balance(address)
            .await
            .unwrap_or_else(|e| panic!("balance read failed for {}: {}", self.label(&address), e));
        assert_eq!(
            actual, expected,
            "Balance mismatch for {}.\nExpected: {} wei\nActual:   {} wei",
            self.label(&address), expected, actual
        );
    }

    async fn assert_eth_balance_gt(&self, address: Address, minimum: U256) {
        let actual = self
            .eth_balance(address)
            .await
            .unwrap_or_else(|e| panic!("balance read failed for {}: {}", self.label(&address), e));
        assert!(
            actual > minimum,
            "Balance {} is not greater than minimum {} for {}",
            actual,
            minimum,
            self.label(&address)
        );
    }

    async fn assert_token_balance_eq(&self, token: Address, owner: Address, expected: U256) {
        let actual = self.read_token_balance(token, owner).await;
        assert_eq!(
            actual,
            expected,
            "Token balance mismatch for owner {} token {}.\nExpected: {}\nActual:   {}",
            self.label(&owner),
            self.label(&token),
            expected,
            actual
        );
    }

    async fn assert_token_balance_gt(&self, token: Address, owner: Address, minimum: U256) {
        let actual = self.read_token_balance(token, owner).await;
        assert!(
            actual > minimum,
            "Token balance {} of {} is not greater than {} for {}",
            actual,
            self.label(&token),
            minimum,
            self.label(&owner)
        );
    }

    async fn assert_has_code(&self, address: Address) {
        let has_code = self
            .has_code(address)
            .await
            .unwrap_or_else(|e| panic!("code read failed for {}: {}", self.label(&address), e));
        assert!(
            has_code,
            "Contract {} should have code but does not",
            self.label(&address)
        );
    }
}

impl Vm {
    async fn read_token_balance(&self, token: Address, owner: Address) -> U256 {
        self.token_balance(token, owner).await.unwrap_or_else(|e| {
            panic!(
                "balance read failed for {} on {}: {}",
                self.label(&owner),
                self.label(&token),
                e
            )
        })
    }
}

/// Extension trait for asserting that a `Result` is a revert.
///
/// # Example
/// ```ignore
/// fixture.supply(amount)
///     .await
///     .expect_revert_containing(fixture.vm(), "reverted");
/// ```
pub trait ExpectRevertResultExt<T> {
    /// Assert that the result is an error containing the expected message.
    /// Also matches against the VM's stored error.
    fn expect_revert_containing(self, vm: &Vm, expected_message: &str) -> RevertInfo;

    /// Assert that the result is an error containing any of the expected messages.
    fn expect_revert_containing_any(self, vm: &Vm, expected_messages: &[&str]) -> RevertInfo;

    /// Assert that the result is an error, returning the `RevertInfo` for further inspection.
    fn expect_failure(self, vm: &Vm) -> RevertInfo;
}

impl<T, E> ExpectRevertResultExt<T> for std::result::Result<T, E>
where
    E: Into<VmError>,
{
    fn expect_revert_containing(self, vm: &Vm, expected_message: &str) -> RevertInfo {
        self.expect_revert_containing_any(vm, &[expected_message])
    }

    fn expect_revert_containing_any(self, vm: &Vm, expected_messages: &[&str]) -> RevertInfo {
        let info = expect_err(self, vm.last_error(), expected_messages);

        let matched = expected_messages
            .iter()
            .any(|expected| info.contains(expected));
        if !matched {
            panic!(
                "Expected revert containing {:?}, but got error: {}",
                expected_messages, info.error
            );
        }
        info
    }

    fn expect_failure(self, vm: &Vm) -> RevertInfo {
        expect_err(self, vm.last_error(), &[])
    }
}

fn expect_err<T, E: Into<VmError>>(
    result: std::result::Result<T, E>,
    last_error: Option<&str>,
    expected_messages: &[&str],
) -> RevertInfo {
    match result {
        Ok(_) if expected_messages.is_empty() => {
            panic!("Expected action to fail, but it succeeded")
        }
        Ok(_) => panic!(
            "Expected revert containing {:?}, but the call succeeded",
            expected_messages
        ),
        Err(err) => RevertInfo::new(&err.into(), last_error),
    }
}
