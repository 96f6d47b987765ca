use alloy::sol;

sol! {
    /// Compound v2 cToken with an ERC-20 underlying
    #[sol(rpc)]
    interface CErc20 {
        /// Emitted instead of reverting when an operation is rejected
        event Failure(uint256 error, uint256 info, uint256 detail);

        function mint(uint256 mintAmount) external returns (uint256);
        function redeem(uint256 redeemTokens) external returns (uint256);
        function balanceOf(address owner) external view returns (uint256);
        function exchangeRateStored() external view returns (uint256);
        function supplyRatePerBlock() external view returns (uint256);
        function totalSupply() external view returns (uint256);
        function underlying() external view returns (address);
    }

    #[sol(rpc)]
    interface Comptroller {
        function claimComp(address holder) external;
    }
}
