pub mod builder;
pub mod config;
pub mod core;
pub mod errors;
pub mod fork;
pub mod helpers;
pub mod logging;

mod internal;

pub mod prelude {
    pub use crate::builder::VmBuilder;
    pub use crate::config::{
        AccountSource, FrameworkConfig, NamedAccounts, NetworkKind, NetworkProfile,
    };
    pub use crate::core::{
        AccountManager, BlockStamp, StateManager, TransactionBuilder, Vm, IMPERSONATION_GAS_FUNDS,
    };
    pub use crate::errors::*;
    pub use crate::fork::ForkProvider;
    pub use crate::helpers::{
        addresses, assert_approx_eq, Assertions, BaseFixture, ExpectRevertResultExt,
        ProtocolFixture, RevertInfo, TokenHelper, TokenInfo, TokenKey, IERC20,
    };
    pub use crate::internal::{
        format_token_amount, gas_used, mainnet_provider_url, parse_token_amount, u256_to_u128,
        GasReport, GasSummary,
    };
    pub use crate::logging::init_tracing;

    pub use alloy::primitives::{address, Address, U256};
}

pub use config::FrameworkConfig;
pub use crate::core::{AccountManager, BlockStamp, StateManager, TransactionBuilder, Vm};
pub use errors::{Result, VmError};
pub use fork::ForkProvider;
pub use helpers::{BaseFixture, ProtocolFixture, TokenHelper};
pub use internal::{gas_used, mainnet_provider_url, GasEntry, GasReport, GasSummary};
pub use logging::init_tracing;
