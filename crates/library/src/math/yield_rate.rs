//! Annualized yield estimation for a supply/redeem round trip.
//!
//! Two independent figures are produced:
//!
//! * an empirical APR derived from the balance delta of the round trip and
//!   the number of blocks it spanned, and
//! * the protocol-reported APY, compounding the per-block supply rate daily
//!   over a year.
//!
//! The protocol figure assumes the per-block rate stays constant for the
//! whole year. Real supply rates move with utilization, so the result is an
//! approximation of the rate at the observed block only.

use crate::errors::{LibraryError, LibraryResult};
use crate::math::{casting::Cast, safe_math::SafeMath};

/// Blocks per day at 13.15 seconds per block.
pub const BLOCKS_PER_DAY: u64 = 6570;
pub const DAYS_PER_YEAR: u32 = 365;
pub const SECONDS_PER_BLOCK: f64 = 13.15;
/// Fixed-point scale of per-block rates.
pub const ETH_MANTISSA: f64 = 1e18;

/// Chain timing assumptions shared by both estimators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YieldParams {
    pub blocks_per_day: u64,
    pub days_per_year: u32,
    pub seconds_per_block: f64,
    pub mantissa: f64,
}

impl Default for YieldParams {
    fn default() -> Self {
        Self {
            blocks_per_day: BLOCKS_PER_DAY,
            days_per_year: DAYS_PER_YEAR,
            seconds_per_block: SECONDS_PER_BLOCK,
            mantissa: ETH_MANTISSA,
        }
    }
}

impl YieldParams {
    pub fn blocks_per_year(&self) -> u64 {
        self.blocks_per_day * self.days_per_year as u64
    }
}

/// Balances observed around one supply/redeem round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTrip {
    /// Supplied amount in whole token units.
    pub principal: u128,
    /// Decimals of the supplied token.
    pub decimals: u8,
    /// Balance before supplying, in minor units.
    pub start_balance: u128,
    /// Balance after redeeming, in minor units.
    pub end_balance: u128,
    /// Blocks between the supply and the redemption.
    pub elapsed_blocks: u64,
}

impl RoundTrip {
    /// Signed balance delta in minor units.
    pub fn profit(&self) -> LibraryResult<i128> {
        let end: i128 = self.end_balance.cast()?;
        let start: i128 = self.start_balance.cast()?;
        end.safe_sub(start)
    }

    pub fn elapsed_seconds(&self, params: &YieldParams) -> f64 {
        self.elapsed_blocks as f64 * params.seconds_per_block
    }
}

/// Empirical APR in percent.
///
/// `profit * periods / principal * days_per_year * 100 / 10^(decimals + 1)`
/// where `periods = blocks_per_year / elapsed_blocks`. The terms are applied
/// left to right so results are reproducible bit for bit.
pub fn empirical_apr(trip: &RoundTrip, params: &YieldParams) -> LibraryResult<f64> {
    if trip.elapsed_blocks == 0 {
        return Err(LibraryError::DivisionByZero("elapsed blocks"));
    }
    if trip.principal == 0 {
        return Err(LibraryError::ZeroPrincipal);
    }

    let profit = trip.profit()? as f64;
    let periods = params.blocks_per_year() as f64 / trip.elapsed_blocks as f64;
    let scale = 10f64.powi(trip.decimals as i32 + 1);

    Ok(profit * periods / trip.principal as f64 * params.days_per_year as f64 * 100.0 / scale)
}

/// Protocol-reported supply APY in percent from a mantissa-scaled per-block
/// rate: `((rate / mantissa * blocks_per_day + 1) ^ days_per_year - 1) * 100`.
pub fn protocol_supply_apy(supply_rate_per_block: u128, params: &YieldParams) -> f64 {
    let daily = supply_rate_per_block as f64 / params.mantissa * params.blocks_per_day as f64;
    ((daily + 1.0).powi(params.days_per_year as i32) - 1.0) * 100.0
}

/// Yearly earnings in whole token units for `apr` percent on `principal`,
/// rounded to three decimals with halves going up (also for losses).
pub fn profit_per_year(apr: f64, principal: u128) -> f64 {
    let yearly = apr * principal as f64 / 100.0;
    (yearly * 1000.0 + 0.5).floor() / 1000.0
}
