mod web3_wallet;

pub use web3_wallet::Web3Wallet;

use crate::contracts::ContractCall;
use crate::error::AirdropError;
use futures_util::future::BoxFuture;
use serde::Serialize;
use std::sync::Arc;
use web3::ethabi::Token;
use web3::types::{Address, H256, U256};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReceiptStatus {
    Success,
    Reverted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    pub tx_hash: H256,
    pub status: ReceiptStatus,
    pub block_number: Option<u64>,
    pub gas_used: Option<U256>,
}

impl TxReceipt {
    pub fn is_success(&self) -> bool {
        self.status == ReceiptStatus::Success
    }
}

/// Active network and connected account
pub trait WalletSession: Send + Sync {
    fn chain_id(&self) -> u64;

    fn account(&self) -> Option<Address>;
}

/// Read-only contract calls (no wallet prompt)
pub trait ContractReader: Send + Sync {
    fn read(
        &self,
        contract: Address,
        call: ContractCall,
    ) -> BoxFuture<'_, Result<Vec<Token>, AirdropError>>;
}

/// Wallet-signed contract calls. Resolves to the transaction hash once the transaction is
/// handed to the network, fails with a wallet rejection when signing is refused.
pub trait ContractWriter: Send + Sync {
    fn write(
        &self,
        contract: Address,
        call: ContractCall,
    ) -> BoxFuture<'_, Result<H256, AirdropError>>;
}

/// Waits until the network reports inclusion of the transaction
pub trait ReceiptWaiter: Send + Sync {
    fn wait(&self, tx_hash: H256) -> BoxFuture<'_, Result<TxReceipt, AirdropError>>;
}

/// The four collaborators the airdrop flow talks to. Usually all of them are backed by
/// the same wallet object.
#[derive(Clone)]
pub struct WalletHandle {
    pub session: Arc<dyn WalletSession>,
    pub reader: Arc<dyn ContractReader>,
    pub writer: Arc<dyn ContractWriter>,
    pub waiter: Arc<dyn ReceiptWaiter>,
}

impl WalletHandle {
    pub fn from_wallet<W>(wallet: Arc<W>) -> Self
    where
        W: WalletSession + ContractReader + ContractWriter + ReceiptWaiter + 'static,
    {
        Self {
            session: wallet.clone(),
            reader: wallet.clone(),
            writer: wallet.clone(),
            waiter: wallet,
        }
    }
}
