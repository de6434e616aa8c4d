//! Orderbook OApp deployment CLI
//!
//! Signs and submits contract-deployment and ownership-transfer
//! transactions to EVM-compatible chains. The deployer mnemonic is kept
//! encrypted at rest and only ever decrypted into process memory for the
//! duration of a single run.
//!
//! # Security Model
//!
//! - Ciphertext internals are visible only inside [`vault`]; everything
//!   else receives the mnemonic as a [`secrecy::SecretString`]
//! - The derived signing key lives in [`wallet`] and is never logged,
//!   serialized, or persisted
//! - Every state-changing action is gated behind an interactive
//!   confirmation prompt

pub mod artifact;
pub mod chain;
pub mod config;
pub mod deploy;
pub mod operator;
pub mod transfer;
pub mod vault;
pub mod wallet;

mod error;

// Re-export commonly used types
pub use artifact::ContractArtifact;
pub use config::{ChainProfile, ChainRegistry, ConstructorArg};
pub use error::{Error, Result};
pub use vault::EncryptedWallet;
pub use wallet::DeployerWallet;
