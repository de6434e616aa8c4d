//! Compiled contract artifact loading
//!
//! The contract itself is an external collaborator: an already compiled
//! Hardhat-style artifact whose creation bytecode this tool submits with
//! the chain profile's constructor arguments appended.

use std::path::Path;

use alloy::primitives::Bytes;
use serde::Deserialize;

use crate::{Error, Result};

/// Env var overriding the artifact path.
pub const ARTIFACT_PATH_ENV: &str = "CONTRACT_ARTIFACT";

/// Default location produced by the contract build.
pub const DEFAULT_ARTIFACT_PATH: &str = "artifacts/contracts/Orderbook.sol/Orderbook.json";

/// The subset of a Hardhat artifact this tool needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractArtifact {
    #[serde(rename = "contractName")]
    pub contract_name: String,
    pub bytecode: String,
}

impl ContractArtifact {
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::Artifact(format!("cannot read artifact {}: {e}", path.display()))
        })?;
        let artifact: Self = serde_json::from_str(&json).map_err(|e| {
            Error::Artifact(format!("malformed artifact {}: {e}", path.display()))
        })?;
        // Surface a missing build before any network work.
        artifact.creation_code()?;
        Ok(artifact)
    }

    /// Load from `CONTRACT_ARTIFACT` or the default build output path.
    pub fn load_default() -> Result<Self> {
        let path = std::env::var(ARTIFACT_PATH_ENV)
            .unwrap_or_else(|_| DEFAULT_ARTIFACT_PATH.to_string());
        Self::load(Path::new(&path))
    }

    /// Decoded creation bytecode, without constructor arguments.
    pub fn creation_code(&self) -> Result<Bytes> {
        let stripped = self.bytecode.strip_prefix("0x").unwrap_or(&self.bytecode);
        if stripped.is_empty() {
            return Err(Error::Artifact(format!(
                "artifact for {} has empty bytecode (unlinked or abstract contract?)",
                self.contract_name
            )));
        }
        let bytes = hex::decode(stripped)
            .map_err(|e| Error::Artifact(format!("invalid bytecode hex: {e}")))?;
        Ok(Bytes::from(bytes))
    }
}
