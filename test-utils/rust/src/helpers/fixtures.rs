use std::collections::BTreeMap;

use alloy::primitives::Address;

use crate::{
    core::vm::Vm,
    errors::{Result, VmError},
};

/// Boilerplate state shared by all protocol fixtures.
pub struct BaseFixture {
    vm: Vm,
    operator: Address,
    contracts: BTreeMap<String, Address>,
}

impl BaseFixture {
    /// Fixture acting through the VM's first account
    pub fn new(vm: Vm) -> Result<Self> {
        let operator = vm.operator()?;
        Ok(Self::with_operator(vm, operator))
    }

    pub fn with_operator(vm: Vm, operator: Address) -> Self {
        Self {
            vm,
            operator,
            contracts: BTreeMap::new(),
        }
    }

    /// Mutable access to the VM.
    pub fn vm(&mut self) -> &mut Vm {
        &mut self.vm
    }

    pub fn vm_ref(&self) -> &Vm {
        &self.vm
    }

    pub fn operator(&self) -> Address {
        self.operator
    }

    /// Register a deployed contract under a name and label it in the VM.
    pub fn register_contract(&mut self, name: impl Into<String>, address: Address) {
        let name = name.into();
        self.vm.set_label(address, name.clone());
        self.contracts.insert(name, address);
    }

    pub fn contract(&self, name: &str) -> Result<Address> {
        self.contracts
            .get(name)
            .copied()
            .ok_or_else(|| VmError::AccountNotFound(format!("contract {} is not registered", name)))
    }

    pub fn contracts(&self) -> impl Iterator<Item = (&str, Address)> {
        self.contracts.iter().map(|(name, address)| (name.as_str(), *address))
    }

}

/// Trait that protocol fixtures can implement to gain convenience methods for accessing the [`BaseFixture`].
pub trait ProtocolFixture {
    /// Immutable access to the shared base fixture.
    fn base_ref(&self) -> &BaseFixture;

    /// Mutable access to the shared base fixture.
    fn base_mut(&mut self) -> &mut BaseFixture;

    /// Borrow the underlying VM.
    fn vm(&mut self) -> &mut Vm {
        self.base_mut().vm()
    }

    fn vm_ref(&self) -> &Vm {
        self.base_ref().vm_ref()
    }

    /// Account that sends most transactions during tests.
    fn operator(&self) -> Address {
        self.base_ref().operator()
    }

    /// Address of a registered contract.
    fn contract(&self, name: &str) -> Result<Address> {
        self.base_ref().contract(name)
    }
}
