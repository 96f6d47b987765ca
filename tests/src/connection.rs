use fork_test_framework::prelude::*;

/// Configuration from the environment and `.env`
pub fn load_config() -> Result<FrameworkConfig> {
    FrameworkConfig::from_env()
}

/// Builder for the network profile selected by `NETWORK`
pub fn network_builder(config: &FrameworkConfig) -> Result<VmBuilder> {
    let profile = config.active_network()?;
    VmBuilder::from_profile(profile)
}
