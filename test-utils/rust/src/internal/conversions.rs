//! Conversions between on-chain integers and token amounts

use alloy::primitives::utils::{format_units, parse_units};
use alloy::primitives::U256;
use library::LibraryError;

use crate::errors::{Result, VmError};

pub fn u256_to_u128(value: U256) -> Result<u128> {
    u128::try_from(value).map_err(|_| VmError::MathError(LibraryError::CastingFailure))
}

/// Render minor units as a decimal string, e.g. `100000000` with 6 decimals is `100.000000`
pub fn format_token_amount(value: U256, decimals: u8) -> Result<String> {
    format_units(value, decimals).map_err(|e| VmError::TokenError(e.to_string()))
}

/// Parse a decimal string into minor units
pub fn parse_token_amount(amount: &str, decimals: u8) -> Result<U256> {
    let parsed = parse_units(amount, decimals).map_err(|e| VmError::TokenError(e.to_string()))?;
    Ok(parsed.into())
}
