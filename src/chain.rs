//! EVM chain client
//!
//! Thin wrapper around an alloy provider with the deployer wallet bound
//! as the transaction filler. [`ChainClient`] is the seam the
//! orchestrators are written against; tests substitute a recording
//! client instead of a live provider.
//!
//! All calls are strictly sequential: at most one in-flight network
//! request per run, each awaited to completion.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;

use crate::config::ChainProfile;
use crate::wallet::DeployerWallet;
use crate::{Error, Result};

/// Result of a mined contract-creation transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployed {
    pub address: Address,
    pub tx_hash: B256,
}

/// Network operations the orchestrators need.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// The deployer address transactions are sent from.
    fn sender(&self) -> Address;

    /// Native currency balance of the sender.
    async fn native_balance(&self) -> Result<U256>;

    /// Broadcast a contract-creation transaction, wait for it to be
    /// mined, and verify code is observable at the resulting address.
    async fn deploy_contract(&self, init_code: Bytes) -> Result<Deployed>;

    /// Estimate gas for a call. Failure here is recoverable; the
    /// transfer orchestrator falls back to manual input.
    async fn estimate_gas(&self, to: Address, calldata: Bytes) -> Result<u64>;

    /// Broadcast a call with an explicit gas limit and wait for it to be
    /// mined. A revert is fatal for the run.
    async fn send_call(&self, to: Address, calldata: Bytes, gas_limit: u64) -> Result<B256>;
}

/// Live client over an alloy HTTP provider.
pub struct EvmClient {
    provider: DynProvider,
    sender: Address,
}

impl EvmClient {
    /// Bind the deployer wallet to the profile's RPC endpoint.
    pub fn connect(wallet: &DeployerWallet, profile: &ChainProfile) -> Result<Self> {
        let url: url::Url = profile.rpc_url.parse().map_err(|e| {
            Error::MissingConfiguration(format!("invalid RPC URL for {}: {e}", profile.name))
        })?;

        let provider = ProviderBuilder::new()
            .wallet(wallet.ethereum_wallet().clone())
            .connect_http(url)
            .erased();

        Ok(Self {
            provider,
            sender: wallet.address(),
        })
    }
}

#[async_trait]
impl ChainClient for EvmClient {
    fn sender(&self) -> Address {
        self.sender
    }

    async fn native_balance(&self) -> Result<U256> {
        self.provider
            .get_balance(self.sender)
            .await
            .map_err(|e| Error::Rpc(format!("balance query failed: {e}")))
    }

    async fn deploy_contract(&self, init_code: Bytes) -> Result<Deployed> {
        let tx = TransactionRequest::default()
            .with_from(self.sender)
            .with_deploy_code(init_code);

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| Error::TransactionSubmission(e.to_string()))?;

        tracing::info!(tx = %pending.tx_hash(), "deployment transaction broadcast");

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| Error::TransactionSubmission(e.to_string()))?;

        if !receipt.status() {
            return Err(Error::TransactionSubmission(format!(
                "deployment transaction {} reverted",
                receipt.transaction_hash
            )));
        }

        let address = receipt.contract_address.ok_or_else(|| {
            Error::TransactionSubmission("receipt carries no contract address".into())
        })?;

        let code = self
            .provider
            .get_code_at(address)
            .await
            .map_err(|e| Error::Rpc(format!("code query failed: {e}")))?;
        if code.is_empty() {
            return Err(Error::TransactionSubmission(format!(
                "no code observable at {address} after deployment"
            )));
        }

        Ok(Deployed {
            address,
            tx_hash: receipt.transaction_hash,
        })
    }

    async fn estimate_gas(&self, to: Address, calldata: Bytes) -> Result<u64> {
        let tx = TransactionRequest::default()
            .with_from(self.sender)
            .with_to(to)
            .with_input(calldata);

        self.provider
            .estimate_gas(tx)
            .await
            .map_err(|e| Error::GasEstimation(e.to_string()))
    }

    async fn send_call(&self, to: Address, calldata: Bytes, gas_limit: u64) -> Result<B256> {
        let tx = TransactionRequest::default()
            .with_from(self.sender)
            .with_to(to)
            .with_input(calldata)
            .with_gas_limit(gas_limit);

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| Error::TransactionSubmission(e.to_string()))?;

        tracing::info!(tx = %pending.tx_hash(), gas_limit, "transaction broadcast");

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| Error::TransactionSubmission(e.to_string()))?;

        if !receipt.status() {
            return Err(Error::TransactionSubmission(format!(
                "transaction {} reverted",
                receipt.transaction_hash
            )));
        }

        Ok(receipt.transaction_hash)
    }
}
