//! Prints the accounts of the active network profile, then the named accounts.
//!
//! `NETWORK=local cargo run --bin accounts`

use fork_test_framework::config::{AccountSource, NetworkKind};
use fork_test_framework::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = FrameworkConfig::from_env()?;
    let network = config.active_network()?;

    let (accounts, chain_id) = match &network.accounts {
        AccountSource::Mnemonic { .. } => {
            let accounts: Vec<Address> = network
                .accounts
                .signers()?
                .iter()
                .map(|signer| signer.address())
                .collect();
            let chain_id = match (&network.kind, network.chain_id) {
                (_, Some(chain_id)) => Some(chain_id),
                (NetworkKind::Remote { url }, None) if !url.is_empty() => {
                    Some(ForkProvider::connect(url).await?.chain_id().await?)
                }
                _ => None,
            };
            (accounts, chain_id)
        }
        AccountSource::Node => {
            let vm = VmBuilder::from_profile(network)?.build().await?;
            (vm.accounts().to_vec(), Some(vm.chain_id()))
        }
    };

    println!("network: {}", network.name);
    for account in &accounts {
        println!("{}", account);
    }

    match chain_id {
        Some(chain_id) => {
            println!();
            for name in config.named_accounts.names() {
                match config.named_accounts.resolve(name, chain_id, &accounts) {
                    Some(address) => println!("{:<14} {}", name, address),
                    None => println!("{:<14} <unresolved>", name),
                }
            }
        }
        None => tracing::warn!(network = %network.name, "chain id unknown, skipping named accounts"),
    }

    Ok(())
}
