//! Signer factory
//!
//! SECURITY: This is the ONLY place the seed phrase is turned into key
//! material.
//! - The key lives in alloy's PrivateKeySigner which handles crypto securely
//! - The key is never serialized, logged, or passed outside this type
//! - Derivation is deterministic: standard path, account index 0

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};
use secrecy::{ExposeSecret, SecretString};

use crate::{Error, Result};

/// Account index used for the deployer key. Fixed so every run derives
/// the same account from the same seed.
const ACCOUNT_INDEX: u32 = 0;

/// The deployer's signing wallet for one run.
///
/// Created per invocation and discarded at process exit. Reusable for
/// multiple sequential transactions within the run.
pub struct DeployerWallet {
    address: Address,
    wallet: EthereumWallet,
}

impl DeployerWallet {
    /// Derive the default account from a BIP-39 mnemonic.
    ///
    /// Fails with [`Error::KeyDerivation`] on a malformed phrase.
    pub fn from_mnemonic(mnemonic: &SecretString) -> Result<Self> {
        let signer: PrivateKeySigner = MnemonicBuilder::<English>::default()
            .phrase(mnemonic.expose_secret())
            .index(ACCOUNT_INDEX)
            .map_err(|e| Error::KeyDerivation(format!("invalid derivation index: {e}")))?
            .build()
            .map_err(|e| Error::KeyDerivation(format!("invalid mnemonic: {e}")))?;

        let address = signer.address();
        let wallet = EthereumWallet::from(signer);

        Ok(Self { address, wallet })
    }

    /// The deployer's public address (safe to share).
    pub fn address(&self) -> Address {
        self.address
    }

    /// The wallet for binding to an alloy provider.
    ///
    /// Safe to hand out: `EthereumWallet` only exposes signing
    /// operations, not the raw key.
    pub fn ethereum_wallet(&self) -> &EthereumWallet {
        &self.wallet
    }
}

// Manual Debug so key material can never leak through logging.
impl std::fmt::Debug for DeployerWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeployerWallet")
            .field("address", &self.address)
            .field("signer", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Standard well-known test mnemonic (DO NOT fund in production!)
    const TEST_MNEMONIC: &str =
        "test test test test test test test test test test test junk";

    #[test]
    fn derives_index_zero_account() {
        let wallet =
            DeployerWallet::from_mnemonic(&SecretString::from(TEST_MNEMONIC.to_string())).unwrap();

        assert_eq!(
            wallet.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn derivation_is_deterministic() {
        let secret = SecretString::from(TEST_MNEMONIC.to_string());
        let a = DeployerWallet::from_mnemonic(&secret).unwrap();
        let b = DeployerWallet::from_mnemonic(&secret).unwrap();
        assert_eq!(a.address(), b.address());
    }

    #[test]
    fn malformed_mnemonic_fails() {
        let err = DeployerWallet::from_mnemonic(&SecretString::from(
            "definitely not twelve valid bip39 words".to_string(),
        ))
        .unwrap_err();
        assert!(matches!(err, Error::KeyDerivation(_)));
    }

    #[test]
    fn debug_redacts_key_material() {
        let wallet =
            DeployerWallet::from_mnemonic(&SecretString::from(TEST_MNEMONIC.to_string())).unwrap();
        let debug = format!("{wallet:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("junk"));
    }
}
