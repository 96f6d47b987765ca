pub mod addresses {
    use alloy::primitives::{address, Address};

    pub const USDC_MAINNET: Address = address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");

    /// Largest USDC holder at the time of writing (Maker)
    pub const MAKER_ADDRESS: Address = address!("0a59649758aa4d66e25f08dd01271e891fe52199");
}
