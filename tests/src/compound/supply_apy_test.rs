//! Compound USDC supply APY tests
//!
//! Chain-free tests cover the observation window and report helpers; the
//! mainnet fork tests need `MAINNET_PROVIDER_URL`.

#[cfg(test)]
mod tests {
    use {
        crate::compound::estimate::*,
        crate::compound::fixture::CompoundFixture,
        crate::addresses::addresses::USDC_MAINNET,
        crate::connection::load_config,
        fork_test_framework::helpers::ProtocolFixture,
        fork_test_framework::prelude::*,
        fork_test_framework::Result as VmResult,
        std::collections::HashMap,
        std::time::Duration,
    };

    /// Chain double that records what the observation window asks of it
    #[derive(Default)]
    struct RecordingChain {
        block: u64,
        timestamp: u64,
        advanced: Vec<u64>,
        mined: Vec<u64>,
    }

    impl StateManager for RecordingChain {
        async fn advance_time(&mut self, seconds: u64) -> VmResult<()> {
            self.advanced.push(seconds);
            self.timestamp += seconds;
            self.block += 1;
            Ok(())
        }

        async fn set_next_timestamp(&mut self, timestamp: u64) -> VmResult<()> {
            self.timestamp = timestamp;
            Ok(())
        }

        async fn mine(&mut self, blocks: u64) -> VmResult<()> {
            self.mined.push(blocks);
            self.block += blocks;
            Ok(())
        }

        async fn current_block(&self) -> VmResult<u64> {
            Ok(self.block)
        }

        async fn timestamp(&self) -> VmResult<u64> {
            Ok(self.timestamp)
        }

        async fn block_stamp(&self, number: u64) -> VmResult<BlockStamp> {
            Ok(BlockStamp {
                number,
                timestamp: self.timestamp,
            })
        }

        async fn snapshot(&mut self) -> VmResult<u64> {
            Ok(0)
        }

        async fn revert(&mut self, _snapshot_id: u64) -> VmResult<()> {
            Ok(())
        }
    }

    fn window_from(pairs: &[(&str, &str)]) -> VmResult<ObservationWindow> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ObservationWindow::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_observation_window_defaults() {
        let window = window_from(&[]).unwrap();

        assert_eq!(window.wall_clock, Duration::from_secs(30));
        assert_eq!(window.warp_seconds, 0);
        assert_eq!(window.mine_blocks, 0);
    }

    #[test]
    fn test_observation_window_from_env() {
        let window = window_from(&[
            ("OBSERVATION_WINDOW_SECS", "0"),
            ("OBSERVATION_WARP_SECS", "86400"),
            ("OBSERVATION_MINE_BLOCKS", " 6570 "),
        ])
        .unwrap();

        assert_eq!(window.wall_clock, Duration::ZERO);
        assert_eq!(window.warp_seconds, 86_400);
        assert_eq!(window.mine_blocks, 6570);
    }

    #[test]
    fn test_observation_window_rejects_garbage() {
        assert!(matches!(
            window_from(&[("OBSERVATION_WINDOW_SECS", "thirty")]),
            Err(VmError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_observation_window_drives_chain() {
        let mut chain = RecordingChain::default();
        let window = ObservationWindow {
            wall_clock: Duration::ZERO,
            warp_seconds: 3600,
            mine_blocks: 10,
        };

        window.elapse(&mut chain).await.unwrap();

        assert_eq!(chain.advanced, vec![3600]);
        assert_eq!(chain.mined, vec![10]);
        assert_eq!(chain.current_block().await.unwrap(), 11);
        assert_eq!(chain.timestamp().await.unwrap(), 3600);
    }

    #[tokio::test]
    async fn test_wall_clock_only_window_leaves_chain_alone() {
        let mut chain = RecordingChain::default();
        let window = ObservationWindow {
            wall_clock: Duration::from_millis(1),
            ..ObservationWindow::default()
        };

        window.elapse(&mut chain).await.unwrap();

        assert!(chain.advanced.is_empty());
        assert!(chain.mined.is_empty());
    }

    #[test]
    fn test_unfunded_operator_aborts_setup() {
        assert!(matches!(
            ensure_funded(U256::ZERO),
            Err(VmError::TokenError(_))
        ));
        assert_eq!(
            ensure_funded(U256::from(100_000_000u64)).unwrap(),
            U256::from(100_000_000u64)
        );
    }

    #[test]
    fn test_format_signed_amount() {
        assert_eq!(format_signed_amount(50_000, 6).unwrap(), "0.050000");
        assert_eq!(format_signed_amount(-1, 6).unwrap(), "-0.000001");
    }

    async fn round_trip(window: ObservationWindow) -> VmResult<YieldReport> {
        init_tracing();
        let config = load_config()?;

        let run = async {
            let mut fixture = CompoundFixture::fork(&config).await?;
            let ctx = setup_context(&mut fixture, SUPPLY_PRINCIPAL).await?;
            let report = run_supply_round_trip(&mut fixture, &ctx, &window).await?;

            assert_eq!(fixture.ctoken_balance(ctx.operator).await?, U256::ZERO);
            fixture.report_gas(&config)?;
            Ok::<_, VmError>(report)
        };

        tokio::time::timeout(config.test_timeout, run)
            .await
            .map_err(|_| VmError::Timeout(config.test_timeout))?
    }

    #[tokio::test]
    #[ignore = "Requires MAINNET_PROVIDER_URL"]
    async fn test_estimate_usdc_apy_based_on_earnings() {
        let window = ObservationWindow::from_env().unwrap();
        let report = round_trip(window).await.unwrap();

        assert!(report.end.number > report.start.number);
        assert!(report.ctokens_minted > U256::ZERO);
        assert!(report.empirical_apr.is_finite());
        assert!(report.protocol_apy >= 0.0 && report.protocol_apy < 100.0);
        assert!(report.exchange_rate_stored > U256::ZERO);
    }

    #[tokio::test]
    #[ignore = "Requires MAINNET_PROVIDER_URL"]
    async fn test_warped_window_accrues_interest() {
        let window = ObservationWindow {
            wall_clock: Duration::ZERO,
            warp_seconds: 86_400,
            mine_blocks: 6570,
        };
        let report = round_trip(window).await.unwrap();

        assert!(report.end.blocks_since(&report.start) > 6570);
        assert!(report.profit > 0, "no interest after a day: {:?}", report);
        assert!(report.empirical_apr > 0.0);
    }

    #[tokio::test]
    #[ignore = "Requires MAINNET_PROVIDER_URL"]
    async fn test_snapshot_restores_operator_balance() {
        let config = load_config().unwrap();
        let mut fixture = CompoundFixture::fork(&config).await.unwrap();
        let ctx = setup_context(&mut fixture, SUPPLY_PRINCIPAL).await.unwrap();

        fixture.vm_ref().assert_has_code(ctx.contracts.c_usdc).await;
        assert_eq!(fixture.ctoken_underlying().await.unwrap(), USDC_MAINNET);

        let snapshot = fixture.vm().snapshot().await.unwrap();
        fixture.supply(ctx.supply_amount).await.unwrap();
        assert!(fixture.ctoken_balance(ctx.operator).await.unwrap() > U256::ZERO);
        assert_eq!(
            fixture
                .vm_ref()
                .token_allowance(USDC_MAINNET, ctx.operator, ctx.contracts.c_usdc)
                .await
                .unwrap(),
            U256::ZERO
        );

        fixture.vm().revert(snapshot).await.unwrap();
        assert_eq!(
            fixture.ctoken_balance(ctx.operator).await.unwrap(),
            U256::ZERO
        );
        fixture
            .vm_ref()
            .assert_token_balance_eq(USDC_MAINNET, ctx.operator, ctx.start_balance)
            .await;
    }

    #[tokio::test]
    #[ignore = "Requires MAINNET_PROVIDER_URL"]
    async fn test_redeem_more_than_minted_fails() {
        let config = load_config().unwrap();
        let mut fixture = CompoundFixture::fork(&config).await.unwrap();
        let ctx = setup_context(&mut fixture, SUPPLY_PRINCIPAL).await.unwrap();

        fixture.supply(ctx.supply_amount).await.unwrap();
        let minted = fixture.ctoken_balance(ctx.operator).await.unwrap();

        let result = fixture.redeem(minted * U256::from(2u64)).await;
        result.expect_revert_containing_any(
            fixture.vm_ref(),
            &["cUSDC.redeem", "Compound error"],
        );
    }
}
