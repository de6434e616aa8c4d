//! Ownership transfer orchestrator
//!
//! Transfers ownership of an already deployed contract. Gas is estimated
//! with a fixed +20% safety margin; when estimation fails the operator
//! supplies a manual limit (or accepts the fallback constant). Only the
//! estimation step is recoverable; a revert after broadcast is fatal for
//! the run.

use alloy::primitives::{Address, Bytes, B256};

use crate::chain::ChainClient;
use crate::config::ChainProfile;
use crate::operator::Operator;
use crate::{Error, Result};

/// Safety margin applied to a successful gas estimate.
pub const GAS_MARGIN_NUMERATOR: u64 = 120;
pub const GAS_MARGIN_DENOMINATOR: u64 = 100;

/// Gas limit used when estimation fails and the operator supplies no
/// manual value.
pub const FALLBACK_GAS_LIMIT: u64 = 2_000_000;

/// `transferOwnership(address)` function selector.
const TRANSFER_OWNERSHIP_SELECTOR: [u8; 4] = [0xf2, 0xfd, 0xe3, 0x8b];

/// `floor(estimated * 120 / 100)`, widened to avoid overflow and
/// saturating at `u64::MAX`.
pub fn apply_safety_margin(estimated: u64) -> u64 {
    let limit = u128::from(estimated) * u128::from(GAS_MARGIN_NUMERATOR)
        / u128::from(GAS_MARGIN_DENOMINATOR);
    u64::try_from(limit).unwrap_or(u64::MAX)
}

/// Calldata for `transferOwnership(newOwner)`: selector plus the address
/// left-padded to 32 bytes.
pub fn transfer_ownership_calldata(new_owner: Address) -> Bytes {
    let mut data = Vec::with_capacity(36);
    data.extend_from_slice(&TRANSFER_OWNERSHIP_SELECTOR);
    data.extend_from_slice(&[0u8; 12]);
    data.extend_from_slice(new_owner.as_slice());
    Bytes::from(data)
}

/// Transfer ownership of `contract` to `new_owner`.
pub async fn run(
    client: &dyn ChainClient,
    profile: &ChainProfile,
    contract: Address,
    new_owner: Address,
    operator: &mut dyn Operator,
) -> Result<B256> {
    println!("Preparing to transfer ownership of contract {contract} to {new_owner}");

    if !operator.confirm("Do you want to proceed with the ownership transfer? (Y/N) ")? {
        return Err(Error::Cancelled);
    }

    let calldata = transfer_ownership_calldata(new_owner);

    println!("Estimating gas for the transferOwnership call...");
    let gas_limit = match client.estimate_gas(contract, calldata.clone()).await {
        Ok(estimated) => {
            let limit = apply_safety_margin(estimated);
            println!("Estimated gas: {estimated}, using gas limit: {limit}");
            limit
        }
        Err(err) => {
            tracing::warn!(error = %err, "gas estimation failed, falling back to manual input");
            println!("Gas estimation failed: {err}");
            let input = operator.prompt_line(&format!(
                "Enter a manual gas limit (or press Enter to use fallback {FALLBACK_GAS_LIMIT}): "
            ))?;
            if input.is_empty() {
                FALLBACK_GAS_LIMIT
            } else {
                input
                    .parse()
                    .map_err(|_| Error::InvalidArgument(format!("invalid gas limit: {input:?}")))?
            }
        }
    };

    println!("Sending transaction to transfer ownership...");
    let tx_hash = client.send_call(contract, calldata, gas_limit).await?;

    tracing::info!(tx = %tx_hash, network = %profile.name, "ownership transferred");
    println!(
        "Ownership transferred. Check transaction: {}",
        profile.tx_link(tx_hash)
    );

    Ok(tx_hash)
}
