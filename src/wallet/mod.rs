//! Deployer wallet derived from the vaulted mnemonic

mod signer;

pub use signer::DeployerWallet;
