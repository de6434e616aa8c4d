//! Per-chain deployment configuration
//!
//! One [`ChainProfile`] per target network, resolved from the
//! [`ChainRegistry`]. Constructor signatures differ between chains
//! (older deployments used a three-argument constructor, newer ones
//! four), so each profile carries its own explicit, ordered argument
//! list instead of assuming one canonical shape.

pub mod registry;

use std::fmt;
use std::str::FromStr;

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// Re-export the registry
pub use registry::ChainRegistry;

/// A constructor argument as recorded in per-chain configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructorArg {
    /// The profile's LayerZero endpoint address.
    Endpoint,
    /// The profile's numeric LayerZero endpoint ID.
    Eid,
    /// Resolved to the deployer wallet address at run time.
    Deployer,
    /// A fixed address from configuration.
    Address(Address),
    /// A fixed unsigned integer.
    Uint(u64),
}

/// A constructor argument with all placeholders bound to concrete values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedArg {
    Address(Address),
    Uint(u64),
}

impl ResolvedArg {
    pub fn to_sol_value(&self) -> DynSolValue {
        match self {
            ResolvedArg::Address(addr) => DynSolValue::Address(*addr),
            ResolvedArg::Uint(value) => DynSolValue::Uint(U256::from(*value), 256),
        }
    }
}

impl fmt::Display for ResolvedArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Checksummed, 0x-prefixed
            ResolvedArg::Address(addr) => write!(f, "{addr}"),
            ResolvedArg::Uint(value) => write!(f, "{value}"),
        }
    }
}

/// Network-specific parameters for one target chain.
///
/// Immutable once resolved; constructed from static configuration plus
/// environment overrides, never derived at run time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainProfile {
    /// Registry key and `--network` identifier (lowercase).
    pub name: String,
    /// Human-readable chain name for operator output.
    pub display_name: String,
    pub rpc_url: String,
    pub explorer_url: String,
    /// Native currency symbol (ETH, APE, MNT, ...).
    pub currency: String,
    /// LayerZero endpoint contract on this chain.
    pub endpoint_address: Address,
    /// LayerZero endpoint ID.
    pub endpoint_id: u64,
    /// Ordered constructor arguments for this chain's deployment.
    pub constructor_args: Vec<ConstructorArg>,
}

impl ChainProfile {
    /// Bind placeholder arguments to concrete values.
    pub fn resolve_args(&self, deployer: Address) -> Vec<ResolvedArg> {
        self.constructor_args
            .iter()
            .map(|arg| match arg {
                ConstructorArg::Endpoint => ResolvedArg::Address(self.endpoint_address),
                ConstructorArg::Eid => ResolvedArg::Uint(self.endpoint_id),
                ConstructorArg::Deployer => ResolvedArg::Address(deployer),
                ConstructorArg::Address(addr) => ResolvedArg::Address(*addr),
                ConstructorArg::Uint(value) => ResolvedArg::Uint(*value),
            })
            .collect()
    }

    /// Check that every field required before touching the network is
    /// present. A wrong endpoint on a live chain cannot be cheaply
    /// undone, so absence is a hard failure rather than a default.
    pub fn validate(&self) -> Result<()> {
        if self.rpc_url.trim().is_empty() {
            return Err(Error::MissingConfiguration(format!(
                "no RPC URL configured for {} (set {})",
                self.name,
                registry::rpc_env_var(&self.name)
            )));
        }
        if self.explorer_url.trim().is_empty() {
            return Err(Error::MissingConfiguration(format!(
                "no explorer URL configured for {}",
                self.name
            )));
        }
        if self.endpoint_address == Address::ZERO {
            return Err(Error::MissingConfiguration(format!(
                "no LayerZero endpoint address configured for {}",
                self.name
            )));
        }
        if self.constructor_args.is_empty() {
            return Err(Error::MissingConfiguration(format!(
                "no constructor arguments configured for {}",
                self.name
            )));
        }
        Ok(())
    }

    pub fn address_link(&self, address: Address) -> String {
        format!("{}/address/{address}", self.explorer_url.trim_end_matches('/'))
    }

    pub fn tx_link(&self, tx_hash: B256) -> String {
        format!("{}/tx/{tx_hash}", self.explorer_url.trim_end_matches('/'))
    }
}

/// Parse an operator-supplied address string.
pub fn parse_address(input: &str) -> Result<Address> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument("address must not be empty".into()));
    }
    Address::from_str(trimmed)
        .map_err(|e| Error::InvalidArgument(format!("invalid address {trimmed:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    fn profile() -> ChainProfile {
        ChainProfile {
            name: "testnet".to_string(),
            display_name: "Testnet".to_string(),
            rpc_url: "https://rpc.example".to_string(),
            explorer_url: "https://scan.example".to_string(),
            currency: "ETH".to_string(),
            endpoint_address: address!("0x1a44076050125825900e736c501f859c50fE728c"),
            endpoint_id: 30110,
            constructor_args: vec![
                ConstructorArg::Endpoint,
                ConstructorArg::Deployer,
                ConstructorArg::Eid,
            ],
        }
    }

    #[test]
    fn resolve_args_binds_placeholders_in_order() {
        let deployer = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        let args = profile().resolve_args(deployer);

        assert_eq!(
            args,
            vec![
                ResolvedArg::Address(address!("0x1a44076050125825900e736c501f859c50fE728c")),
                ResolvedArg::Address(deployer),
                ResolvedArg::Uint(30110),
            ]
        );
    }

    #[test]
    fn validate_rejects_empty_rpc_url() {
        let mut p = profile();
        p.rpc_url = String::new();
        assert!(matches!(
            p.validate().unwrap_err(),
            Error::MissingConfiguration(_)
        ));
    }

    #[test]
    fn validate_rejects_zero_endpoint() {
        let mut p = profile();
        p.endpoint_address = Address::ZERO;
        assert!(matches!(
            p.validate().unwrap_err(),
            Error::MissingConfiguration(_)
        ));
    }

    #[test]
    fn explorer_links_are_well_formed() {
        let p = profile();
        let addr = address!("0xE15f0BD64033cCCD807129D98732392C7aebceD6");
        assert_eq!(
            p.address_link(addr),
            format!("https://scan.example/address/{addr}")
        );
        let hash = B256::repeat_byte(0xab);
        assert_eq!(p.tx_link(hash), format!("https://scan.example/tx/{hash}"));
    }

    #[test]
    fn resolved_arg_display() {
        let addr = address!("0x451F52446EBD4376d4a05f4267eF1a03Acf1aAf4");
        assert_eq!(
            ResolvedArg::Address(addr).to_string(),
            "0x451F52446EBD4376d4a05f4267eF1a03Acf1aAf4"
        );
        assert_eq!(ResolvedArg::Uint(30312).to_string(), "30312");
    }

    #[test]
    fn parse_address_accepts_checksummed_and_rejects_garbage() {
        assert!(parse_address("0x451F52446EBD4376d4a05f4267eF1a03Acf1aAf4").is_ok());
        assert!(matches!(
            parse_address("").unwrap_err(),
            Error::InvalidArgument(_)
        ));
        assert!(matches!(
            parse_address("not-an-address").unwrap_err(),
            Error::InvalidArgument(_)
        ));
    }
}
