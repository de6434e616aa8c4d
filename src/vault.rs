//! Encrypted wallet vault
//!
//! The deployer mnemonic is stored at rest as an AES-256-GCM ciphertext
//! whose key is derived from an operator passphrase with
//! PBKDF2-HMAC-SHA256. This module is the only place ciphertext
//! internals are visible: callers hand in a passphrase and get back a
//! [`SecretString`], nothing else.
//!
//! SECURITY:
//! - The plaintext mnemonic is never written to disk or logs
//! - The derived AES key is zeroized when decryption finishes
//! - A failed decryption yields no partial plaintext (GCM authenticates
//!   before releasing any output)

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::{Zeroize, Zeroizing};

use crate::{Error, Result};

const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const CIPHER: &str = "aes-256-gcm";
const KDF: &str = "pbkdf2-sha256";
const BLOB_VERSION: u32 = 1;

/// Environment variable holding the encrypted wallet blob as JSON.
pub const ENCRYPTED_WALLET_ENV: &str = "ENCRYPTED_WALLET";

/// Default PBKDF2 iteration count for newly sealed wallets.
pub const DEFAULT_KDF_ITERATIONS: u32 = 600_000;

/// An at-rest encrypted mnemonic with the metadata needed to recover it.
///
/// Serialized as JSON with hex-encoded binary fields, e.g.:
///
/// ```json
/// {"version":1,"cipher":"aes-256-gcm","kdf":"pbkdf2-sha256",
///  "iterations":600000,"salt":"..","nonce":"..","ciphertext":".."}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedWallet {
    pub version: u32,
    pub cipher: String,
    pub kdf: String,
    pub iterations: u32,
    pub salt: String,
    pub nonce: String,
    pub ciphertext: String,
}

impl EncryptedWallet {
    /// Parse and structurally validate a blob from its JSON encoding.
    pub fn from_json(json: &str) -> Result<Self> {
        let blob: Self = serde_json::from_str(json)
            .map_err(|e| Error::SecretRecovery(format!("malformed encrypted wallet: {e}")))?;
        blob.validate()?;
        Ok(blob)
    }

    /// Read the blob from the `ENCRYPTED_WALLET` environment variable.
    pub fn from_env() -> Result<Self> {
        let json = std::env::var(ENCRYPTED_WALLET_ENV).map_err(|_| {
            Error::MissingConfiguration(format!(
                "{ENCRYPTED_WALLET_ENV} is not set. Generate one with the `seal` subcommand."
            ))
        })?;
        Self::from_json(&json)
    }

    fn validate(&self) -> Result<()> {
        if self.version != BLOB_VERSION {
            return Err(Error::SecretRecovery(format!(
                "unsupported wallet blob version {}",
                self.version
            )));
        }
        if self.cipher != CIPHER {
            return Err(Error::SecretRecovery(format!(
                "unsupported cipher {:?} (expected {CIPHER:?})",
                self.cipher
            )));
        }
        if self.kdf != KDF {
            return Err(Error::SecretRecovery(format!(
                "unsupported KDF {:?} (expected {KDF:?})",
                self.kdf
            )));
        }
        if self.iterations == 0 {
            return Err(Error::SecretRecovery("KDF iteration count is zero".into()));
        }
        let salt = decode_hex_field(&self.salt, "salt")?;
        if salt.len() != SALT_LEN {
            return Err(Error::SecretRecovery(format!(
                "salt must be {SALT_LEN} bytes, got {}",
                salt.len()
            )));
        }
        let nonce = decode_hex_field(&self.nonce, "nonce")?;
        if nonce.len() != NONCE_LEN {
            return Err(Error::SecretRecovery(format!(
                "nonce must be {NONCE_LEN} bytes, got {}",
                nonce.len()
            )));
        }
        let ciphertext = decode_hex_field(&self.ciphertext, "ciphertext")?;
        if ciphertext.is_empty() {
            return Err(Error::SecretRecovery("ciphertext is empty".into()));
        }
        Ok(())
    }

    /// Recover the mnemonic using the supplied passphrase.
    ///
    /// Fails with [`Error::SecretRecovery`] on a wrong passphrase or a
    /// corrupted blob; the GCM tag check guarantees nothing is returned
    /// in that case.
    pub fn decrypt(&self, passphrase: &SecretString) -> Result<SecretString> {
        self.validate()?;

        let salt = decode_hex_field(&self.salt, "salt")?;
        let nonce = decode_hex_field(&self.nonce, "nonce")?;
        let ciphertext = decode_hex_field(&self.ciphertext, "ciphertext")?;

        let key = derive_key(passphrase, &salt, self.iterations);
        let cipher = Aes256Gcm::new_from_slice(key.as_ref())
            .map_err(|e| Error::SecretRecovery(format!("cipher init failed: {e}")))?;

        let plaintext = cipher
            .decrypt(Nonce::from_slice(&nonce), ciphertext.as_slice())
            .map_err(|_| {
                Error::SecretRecovery(
                    "decryption failed (wrong passphrase or corrupted blob)".into(),
                )
            })?;

        let phrase = match String::from_utf8(plaintext) {
            Ok(phrase) => phrase,
            Err(e) => {
                let mut bytes = e.into_bytes();
                bytes.zeroize();
                return Err(Error::SecretRecovery(
                    "decrypted payload is not valid UTF-8".into(),
                ));
            }
        };

        Ok(SecretString::from(phrase))
    }

    /// Encrypt a mnemonic into a fresh blob with a random salt and nonce.
    ///
    /// Counterpart of [`EncryptedWallet::decrypt`]; used by the `seal`
    /// subcommand to produce the at-rest representation.
    pub fn seal(
        mnemonic: &SecretString,
        passphrase: &SecretString,
        iterations: u32,
    ) -> Result<Self> {
        if iterations == 0 {
            return Err(Error::InvalidArgument("KDF iteration count must be nonzero".into()));
        }

        let mut salt = [0u8; SALT_LEN];
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut salt);
        OsRng.fill_bytes(&mut nonce);

        let key = derive_key(passphrase, &salt, iterations);
        let cipher = Aes256Gcm::new_from_slice(key.as_ref())
            .map_err(|e| Error::SecretRecovery(format!("cipher init failed: {e}")))?;

        let ciphertext = cipher
            .encrypt(
                Nonce::from_slice(&nonce),
                mnemonic.expose_secret().as_bytes(),
            )
            .map_err(|e| Error::SecretRecovery(format!("encryption failed: {e}")))?;

        Ok(Self {
            version: BLOB_VERSION,
            cipher: CIPHER.to_string(),
            kdf: KDF.to_string(),
            iterations,
            salt: hex::encode(salt),
            nonce: hex::encode(nonce),
            ciphertext: hex::encode(ciphertext),
        })
    }
}

/// Derive the AES-256 key. The returned buffer zeroizes itself on drop.
fn derive_key(passphrase: &SecretString, salt: &[u8], iterations: u32) -> Zeroizing<[u8; 32]> {
    let mut key = Zeroizing::new([0u8; 32]);
    pbkdf2_hmac::<Sha256>(
        passphrase.expose_secret().as_bytes(),
        salt,
        iterations,
        key.as_mut(),
    );
    key
}

fn decode_hex_field(value: &str, field: &str) -> Result<Vec<u8>> {
    hex::decode(value)
        .map_err(|e| Error::SecretRecovery(format!("invalid hex in {field} field: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MNEMONIC: &str =
        "test test test test test test test test test test test junk";

    // Small iteration count so the test suite stays fast.
    fn sealed(passphrase: &str) -> EncryptedWallet {
        EncryptedWallet::seal(
            &SecretString::from(TEST_MNEMONIC.to_string()),
            &SecretString::from(passphrase.to_string()),
            1_000,
        )
        .unwrap()
    }

    #[test]
    fn seal_then_decrypt_recovers_mnemonic() {
        let blob = sealed("hunter2");
        let mnemonic = blob
            .decrypt(&SecretString::from("hunter2".to_string()))
            .unwrap();
        assert_eq!(mnemonic.expose_secret(), TEST_MNEMONIC);
    }

    #[test]
    fn wrong_passphrase_fails() {
        let blob = sealed("right-passphrase");
        let err = blob
            .decrypt(&SecretString::from("wrong-passphrase".to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::SecretRecovery(_)));
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let mut blob = sealed("pw");
        let mut bytes = hex::decode(&blob.ciphertext).unwrap();
        bytes[0] ^= 0xff;
        blob.ciphertext = hex::encode(bytes);

        let err = blob
            .decrypt(&SecretString::from("pw".to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::SecretRecovery(_)));
    }

    #[test]
    fn serialized_blob_never_contains_plaintext() {
        let blob = sealed("pw");
        let json = serde_json::to_string(&blob).unwrap();
        assert!(!json.contains("test test"));
        assert!(!json.contains("junk"));

        // Debug output must not leak it either.
        let debug = format!("{blob:?}");
        assert!(!debug.contains("junk"));
    }

    #[test]
    fn two_seals_produce_distinct_blobs() {
        let a = sealed("pw");
        let b = sealed("pw");
        // Fresh salt and nonce every time.
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_json_is_a_recovery_error() {
        let err = EncryptedWallet::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::SecretRecovery(_)));
    }

    #[test]
    fn unsupported_cipher_is_rejected() {
        let mut blob = sealed("pw");
        blob.cipher = "rot13".to_string();
        let err = EncryptedWallet::from_json(&serde_json::to_string(&blob).unwrap()).unwrap_err();
        assert!(matches!(err, Error::SecretRecovery(_)));
    }

    #[test]
    fn short_salt_is_rejected() {
        let mut blob = sealed("pw");
        blob.salt = "abcd".to_string();
        let err = blob
            .decrypt(&SecretString::from("pw".to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::SecretRecovery(_)));
    }

    #[test]
    fn zero_iterations_rejected_on_seal() {
        let err = EncryptedWallet::seal(
            &SecretString::from(TEST_MNEMONIC.to_string()),
            &SecretString::from("pw".to_string()),
            0,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn json_round_trip_preserves_blob() {
        let blob = sealed("pw");
        let parsed = EncryptedWallet::from_json(&serde_json::to_string(&blob).unwrap()).unwrap();
        assert_eq!(parsed, blob);
    }
}
