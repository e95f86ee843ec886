//! The chain-facing half of the deploy scripts.
//!
//! A [`DeployBackend`] exposes the two things a deployment step can do, deploy a
//! contract or call a method on one, each of which resolves only once the transaction
//! has been confirmed.

use std::time::Duration;

use alloy::{
    network::TransactionBuilder,
    providers::{DynProvider, Provider},
    rpc::types::{TransactionReceipt, TransactionRequest},
};
use alloy_primitives::{Address, Bytes, TxHash};
use tracing::debug;

use crate::{
    artifacts::ContractBytecodes, constants::RECEIPT_POLL_INTERVAL_MS, errors::ScriptError,
    types::MarketplaceContract,
};

/// A uniform "send and await confirmation" capability for deployment steps
#[allow(async_fn_in_trait)]
pub trait DeployBackend {
    /// Deploy a fresh instance of the contract, returning its address once mined
    async fn deploy(&self, contract: MarketplaceContract) -> Result<Address, ScriptError>;

    /// Send a transaction with the given calldata to `target`, returning its hash
    /// once it has been confirmed
    async fn call(&self, target: Address, calldata: Bytes) -> Result<TxHash, ScriptError>;
}

/// A backend sending transactions through a signing RPC provider
pub struct RpcBackend {
    /// The signing provider
    provider: DynProvider,
    /// The creation bytecode of each contract
    bytecodes: ContractBytecodes,
    /// The number of confirmations to wait for on each transaction, at least one
    confirmations: u64,
}

impl RpcBackend {
    /// Create a new RPC backend
    pub fn new(provider: DynProvider, bytecodes: ContractBytecodes, confirmations: u64) -> Self {
        Self { provider, bytecodes, confirmations: confirmations.max(1) }
    }

    /// Send a transaction and wait for a successful, sufficiently confirmed receipt
    async fn send_and_confirm(&self, tx: TransactionRequest) -> Result<TransactionReceipt, String> {
        let pending_tx = self.provider.send_transaction(tx).await.map_err(|e| e.to_string())?;
        let tx_hash = *pending_tx.tx_hash();
        debug!("sent transaction {:#x}", tx_hash);

        let receipt = self.wait_for_receipt(tx_hash).await?;
        if !receipt.status() {
            return Err(format!("transaction {:#x} reverted", tx_hash));
        }

        self.wait_for_confirmations(&receipt).await?;
        Ok(receipt)
    }

    /// Poll for the receipt of a sent transaction until it is mined
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TransactionReceipt, String> {
        loop {
            let receipt =
                self.provider.get_transaction_receipt(tx_hash).await.map_err(|e| e.to_string())?;
            match receipt {
                Some(receipt) => return Ok(receipt),
                None => tokio::time::sleep(Duration::from_millis(RECEIPT_POLL_INTERVAL_MS)).await,
            }
        }
    }

    /// Poll the chain tip until the mined transaction has the required confirmations
    async fn wait_for_confirmations(&self, receipt: &TransactionReceipt) -> Result<(), String> {
        if self.confirmations <= 1 {
            return Ok(());
        }

        let mined_at = receipt.block_number.ok_or_else(|| {
            format!("receipt of {:#x} has no block number", receipt.transaction_hash)
        })?;
        loop {
            let tip = self.provider.get_block_number().await.map_err(|e| e.to_string())?;
            if tip.saturating_sub(mined_at) + 1 >= self.confirmations {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(RECEIPT_POLL_INTERVAL_MS)).await;
        }
    }
}

impl DeployBackend for RpcBackend {
    async fn deploy(&self, contract: MarketplaceContract) -> Result<Address, ScriptError> {
        let bytecode = self.bytecodes.get(&contract).cloned().ok_or_else(|| {
            ScriptError::ArtifactParsing(format!("no bytecode loaded for `{contract}`"))
        })?;

        let tx = TransactionRequest::default().with_deploy_code(bytecode);
        let receipt = self
            .send_and_confirm(tx)
            .await
            .map_err(|e| ScriptError::ContractDeployment(format!("{contract}: {e}")))?;

        receipt.contract_address.ok_or_else(|| {
            ScriptError::ContractDeployment(format!("{contract}: receipt has no contract address"))
        })
    }

    async fn call(&self, target: Address, calldata: Bytes) -> Result<TxHash, ScriptError> {
        let tx = TransactionRequest::default().with_to(target).with_input(calldata);
        let receipt = self
            .send_and_confirm(tx)
            .await
            .map_err(|e| ScriptError::ContractInteraction(format!("{target:#x}: {e}")))?;

        Ok(receipt.transaction_hash)
    }
}
