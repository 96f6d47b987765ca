//! Compound test fixture module
//!
//! Contract addresses come from `networks/compound_mainnet.json`; the VM is a
//! mainnet fork built from the active network profile.

mod interfaces;
mod setup;

pub use interfaces::{CErc20, Comptroller};

use {
    crate::addresses::addresses::{MAKER_ADDRESS, USDC_MAINNET},
    crate::connection::network_builder,
    fork_test_framework::helpers::{BaseFixture, ProtocolFixture},
    fork_test_framework::prelude::*,
    fork_test_framework::Result as VmResult,
    serde::Deserialize,
};

const COMPOUND_MAINNET_JSON: &str = include_str!("../../../networks/compound_mainnet.json");

/// Deployed Compound v2 contracts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CompoundContracts {
    #[serde(rename = "cUSDC")]
    pub c_usdc: Address,
    #[serde(rename = "Comptroller")]
    pub comptroller: Address,
    #[serde(rename = "COMP")]
    pub comp: Address,
}

#[derive(Deserialize)]
struct NetworkFile {
    #[serde(rename = "Contracts")]
    contracts: CompoundContracts,
}

impl CompoundContracts {
    pub fn from_json(json: &str) -> VmResult<Self> {
        let file: NetworkFile = serde_json::from_str(json)?;
        Ok(file.contracts)
    }

    pub fn mainnet() -> VmResult<Self> {
        Self::from_json(COMPOUND_MAINNET_JSON)
    }
}

/// Compound test fixture
pub struct CompoundFixture {
    base: BaseFixture,
    pub contracts: CompoundContracts,
}

impl CompoundFixture {
    /// Fork the active network profile and check that every contract the scenario touches is deployed
    pub async fn fork(config: &FrameworkConfig) -> VmResult<Self> {
        let contracts = CompoundContracts::mainnet()?;

        let vm = network_builder(config)?
            .track_contracts([
                contracts.c_usdc,
                contracts.comptroller,
                contracts.comp,
                USDC_MAINNET,
            ])
            .report_gas(config.gas_reporter.enabled)
            .build()
            .await?;

        tracing::info!(network = %config.selected_network, "compound fixture ready");
        Self::new(vm, contracts)
    }

    pub fn new(vm: Vm, contracts: CompoundContracts) -> VmResult<Self> {
        let mut base = BaseFixture::new(vm)?;

        base.register_contract("cUSDC", contracts.c_usdc);
        base.register_contract("Comptroller", contracts.comptroller);
        base.register_contract("COMP", contracts.comp);
        base.register_contract("USDC", USDC_MAINNET);
        base.vm().set_label(MAKER_ADDRESS, "Maker");

        Ok(Self { base, contracts })
    }

    /// Print the gas table and write it to `GAS_REPORT_FILE` when configured
    pub fn report_gas(&self, config: &FrameworkConfig) -> VmResult<()> {
        let Some(report) = self.vm_ref().gas_report() else {
            return Ok(());
        };

        println!("{}", report.render());
        if let Some(path) = &config.gas_reporter.output_file {
            report.write_json(path)?;
        }
        Ok(())
    }
}

impl ProtocolFixture for CompoundFixture {
    fn base_ref(&self) -> &BaseFixture {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseFixture {
        &mut self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_contracts_parse() {
        let contracts = CompoundContracts::mainnet().unwrap();

        assert_eq!(
            contracts.c_usdc,
            address!("39AA39c021dfbaE8faC545936693aC917d5E7563")
        );
        assert_eq!(
            contracts.comptroller,
            address!("3d9819210A31b4961b30EF54bE2aeD79B9c9Cd3B")
        );
        assert_eq!(contracts.comp, TokenKey::COMP.address());
    }

    #[test]
    fn test_contracts_missing_entry() {
        let json = r#"{ "Contracts": { "cUSDC": "0x39AA39c021dfbaE8faC545936693aC917d5E7563" } }"#;
        assert!(CompoundContracts::from_json(json).is_err());
    }
}
