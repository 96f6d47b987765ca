//! Core VM functionality

pub mod accounts;
pub mod state;
pub mod transactions;
pub mod vm;

pub use accounts::{AccountManager, IMPERSONATION_GAS_FUNDS};
pub use state::{BlockStamp, StateManager};
pub use transactions::TransactionBuilder;
pub use vm::{Prank, Vm};
