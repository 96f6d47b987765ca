//! Testing helpers and utilities

pub mod assertions;
pub mod fixtures;
pub mod tokens;

pub use assertions::{assert_approx_eq, Assertions, ExpectRevertResultExt, RevertInfo};
pub use fixtures::{BaseFixture, ProtocolFixture};
pub use tokens::{addresses, TokenHelper, TokenInfo, TokenKey, IERC20};
