//! Built-in chain profile table with environment overrides
//!
//! RPC endpoints follow Ethereum ecosystem conventions: a per-chain env
//! var (`APECHAIN_RPC_URL`, `ARBITRUM_RPC_URL`, ...) takes priority over
//! the built-in default. Chains without a reliable public endpoint ship
//! with no default at all, so resolution fails until the operator
//! configures one.

use std::collections::HashMap;

use alloy::primitives::address;

use super::{ChainProfile, ConstructorArg};
use crate::{Error, Result};

/// Env var that overrides the RPC URL for the named profile.
pub fn rpc_env_var(name: &str) -> String {
    format!("{}_RPC_URL", name.to_uppercase())
}

/// Registry of chain profiles keyed by network name.
#[derive(Debug, Clone)]
pub struct ChainRegistry {
    profiles: HashMap<String, ChainProfile>,
}

impl ChainRegistry {
    /// The chains this tool knows how to deploy to, with their LayerZero
    /// endpoints, endpoint IDs, and per-chain constructor signatures.
    pub fn builtin() -> Self {
        let mut profiles = HashMap::new();

        // Production OApp owner pair used by the four-argument
        // constructor deployments.
        let oapp_owner = address!("0x451F52446EBD4376d4a05f4267eF1a03Acf1aAf4");
        let contract_owner = address!("0x033a1B4b586EFc07f7377c522E693fd855a505b1");

        for profile in [
            ChainProfile {
                name: "apechain".to_string(),
                display_name: "ApeChain".to_string(),
                // No trustworthy public endpoint; APECHAIN_RPC_URL is required.
                rpc_url: String::new(),
                explorer_url: "https://apescan.io".to_string(),
                currency: "APE".to_string(),
                endpoint_address: address!("0x6F475642a6e85809B1c36Fa62763669b1b48DD5B"),
                endpoint_id: 30312,
                constructor_args: vec![
                    ConstructorArg::Endpoint,
                    ConstructorArg::Address(oapp_owner),
                    ConstructorArg::Address(contract_owner),
                    ConstructorArg::Eid,
                ],
            },
            ChainProfile {
                name: "mantle".to_string(),
                display_name: "Mantle".to_string(),
                rpc_url: "https://rpc.mantle.xyz".to_string(),
                explorer_url: "https://mantlescan.xyz".to_string(),
                currency: "MNT".to_string(),
                endpoint_address: address!("0x1a44076050125825900e736c501f859c50fE728c"),
                endpoint_id: 30181,
                constructor_args: vec![
                    ConstructorArg::Endpoint,
                    ConstructorArg::Address(oapp_owner),
                    ConstructorArg::Address(contract_owner),
                    ConstructorArg::Eid,
                ],
            },
            ChainProfile {
                name: "arbitrum".to_string(),
                display_name: "Arbitrum One".to_string(),
                rpc_url: "https://arb1.arbitrum.io/rpc".to_string(),
                explorer_url: "https://arbiscan.io".to_string(),
                currency: "ETH".to_string(),
                endpoint_address: address!("0x1a44076050125825900e736c501f859c50fE728c"),
                endpoint_id: 30110,
                // Older three-argument constructor: the deployer is the owner.
                constructor_args: vec![
                    ConstructorArg::Endpoint,
                    ConstructorArg::Deployer,
                    ConstructorArg::Eid,
                ],
            },
            ChainProfile {
                name: "sepolia".to_string(),
                display_name: "Sepolia".to_string(),
                rpc_url: "https://eth-sepolia.public.blastapi.io".to_string(),
                explorer_url: "https://sepolia.etherscan.io".to_string(),
                currency: "ETH".to_string(),
                endpoint_address: address!("0x6EDCE65403992e310A62460808c4b910D972f10f"),
                endpoint_id: 40161,
                constructor_args: vec![
                    ConstructorArg::Endpoint,
                    ConstructorArg::Deployer,
                    ConstructorArg::Eid,
                ],
            },
        ] {
            profiles.insert(profile.name.clone(), profile);
        }

        Self { profiles }
    }

    /// Built-in table with per-chain RPC env overrides applied.
    ///
    /// Environment is read once here, at construction; resolution itself
    /// is a pure function of the resulting table.
    pub fn from_env() -> Self {
        let mut registry = Self::builtin();
        for profile in registry.profiles.values_mut() {
            if let Ok(url) = std::env::var(rpc_env_var(&profile.name)) {
                if !url.trim().is_empty() {
                    tracing::debug!(network = %profile.name, "using RPC URL from environment");
                    profile.rpc_url = url;
                }
            }
        }
        registry
    }

    /// Add or replace a profile.
    pub fn insert(&mut self, profile: ChainProfile) {
        self.profiles.insert(profile.name.clone(), profile);
    }

    /// Resolve a network identifier to a validated profile.
    ///
    /// Unknown names and profiles missing required fields both fail
    /// here, before any network call is attempted.
    pub fn resolve(&self, name: &str) -> Result<ChainProfile> {
        let key = name.trim().to_lowercase();
        let profile = self.profiles.get(&key).ok_or_else(|| {
            let mut known = self.names();
            known.sort_unstable();
            Error::UnknownNetwork(format!("{name} (known networks: {})", known.join(", ")))
        })?;
        profile.validate()?;
        Ok(profile.clone())
    }

    pub fn names(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }

    /// All profiles, sorted by name, for operator-facing listings.
    pub fn profiles(&self) -> Vec<&ChainProfile> {
        let mut all: Vec<&ChainProfile> = self.profiles.values().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }
}
