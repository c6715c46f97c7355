use super::{
    ContractReader, ContractWriter, ReceiptStatus, ReceiptWaiter, TxReceipt, WalletSession,
};
use crate::config::{Chain, Engine};
use crate::contracts::ContractCall;
use crate::error::*;
use crate::signer::Signer;
use crate::utils::{gwei_to_u256, U256ConvExt};
use crate::{err_create, err_custom_create, err_from};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use web3::ethabi::Token;
use web3::transports::Http;
use web3::types::{
    Address, BlockNumber, Bytes, CallRequest, TransactionParameters, H256, U256, U64,
};
use web3::Web3;

const ADD_GAS_SAFETY_MARGIN: u64 = 20000;

/// Wallet talking to a JSON-RPC node directly and signing locally
pub struct Web3Wallet {
    web3: Web3<Http>,
    chain_id: u64,
    account: Option<Address>,
    signer: Arc<dyn Signer>,
    max_fee_per_gas: U256,
    priority_fee: U256,
    receipt_poll_interval: Duration,
    transaction_timeout: Option<Duration>,
    confirmation_blocks: u64,
}

impl Web3Wallet {
    pub fn new(
        chain: &Chain,
        engine: &Engine,
        account: Option<Address>,
        signer: Arc<dyn Signer>,
    ) -> Result<Self, AirdropError> {
        let endpoint = chain.rpc_endpoints.first().ok_or(err_custom_create!(
            "No rpc endpoints configured for chain {}",
            chain.chain_name
        ))?;
        let transport = Http::new(endpoint).map_err(err_from!())?;
        Ok(Self {
            web3: Web3::new(transport),
            chain_id: chain.chain_id,
            account,
            signer,
            max_fee_per_gas: gwei_to_u256(chain.max_fee_per_gas).map_err(err_from!())?,
            priority_fee: gwei_to_u256(chain.priority_fee).map_err(err_from!())?,
            receipt_poll_interval: Duration::from_secs_f64(
                engine.receipt_poll_interval.max(0.05),
            ),
            transaction_timeout: chain.transaction_timeout.map(Duration::from_secs),
            confirmation_blocks: chain.confirmation_blocks.max(1),
        })
    }

    /// Fails when the node serves a different chain than the configured one
    pub async fn verify_chain_id(&self) -> Result<(), AirdropError> {
        let node_chain_id = self.web3.eth().chain_id().await.map_err(err_from!())?;
        if node_chain_id != U256::from(self.chain_id) {
            return Err(err_custom_create!(
                "Rpc endpoint serves chain id {}, expected {}",
                node_chain_id,
                self.chain_id
            ));
        }
        Ok(())
    }

    async fn estimate_gas(&self, call_request: CallRequest) -> Result<U256, AirdropError> {
        log::debug!("Check transaction with gas estimation: {:?}", call_request);
        let gas_est = match self.web3.eth().estimate_gas(call_request, None).await {
            Ok(gas_est) => gas_est,
            Err(e) => {
                if e.to_string().contains("gas required exceeds allowance") {
                    log::error!("Gas estimation failed - probably insufficient funds: {}", e);
                    return Err(err_create!(TransactionFailedError::new(
                        "Gas estimation failed - probably insufficient funds"
                    )));
                }
                return Err(err_create!(TransactionFailedError::new(&format!(
                    "Gas estimation failed: {e}"
                ))));
            }
        };
        log::info!("Set gas limit basing on gas estimation: {gas_est}");
        Ok(gas_est + U256::from(ADD_GAS_SAFETY_MARGIN))
    }

    async fn send_call(&self, contract: Address, call: ContractCall) -> Result<H256, AirdropError> {
        let from = self
            .account
            .ok_or(err_create!(ErrorBag::WalletNotConnected))?;
        self.signer
            .check_if_sign_possible(from)
            .await
            .map_err(|err| err_create!(WalletRejectionError::new(&err.message)))?;

        let data = call.encode().map_err(err_from!())?;
        let gas_limit = self
            .estimate_gas(CallRequest {
                from: Some(from),
                to: Some(contract),
                data: Some(Bytes(data.clone())),
                transaction_type: Some(U64::from(2)),
                max_fee_per_gas: Some(self.max_fee_per_gas),
                max_priority_fee_per_gas: Some(self.priority_fee),
                ..Default::default()
            })
            .await?;

        let nonce = self
            .web3
            .eth()
            .transaction_count(from, Some(BlockNumber::Pending))
            .await
            .map_err(err_from!())?;

        let tx_object = TransactionParameters {
            nonce: Some(nonce),
            to: Some(contract),
            gas: gas_limit,
            gas_price: None,
            value: U256::zero(),
            data: Bytes(data),
            chain_id: Some(self.chain_id),
            transaction_type: Some(U64::from(2)),
            access_list: None,
            max_fee_per_gas: Some(self.max_fee_per_gas),
            max_priority_fee_per_gas: Some(self.priority_fee),
        };
        log::debug!(
            "Signing {} call to {:#x}, nonce {}, max fee {} gwei",
            call.function,
            contract,
            nonce,
            self.max_fee_per_gas.to_gwei_f64()
        );
        let signed = self
            .signer
            .sign(from, tx_object)
            .await
            .map_err(|err| err_create!(WalletRejectionError::new(&err.message)))?;

        self.web3
            .eth()
            .send_raw_transaction(signed.raw_transaction)
            .await
            .map_err(|err| {
                err_create!(TransactionFailedError::new(&format!(
                    "Error sending transaction: {err}"
                )))
            })?;
        log::info!(
            "Transaction {:#x} sent ({})",
            signed.transaction_hash,
            call.function
        );
        Ok(signed.transaction_hash)
    }

    async fn poll_receipt(&self, tx_hash: H256) -> Result<TxReceipt, AirdropError> {
        let started = Instant::now();
        loop {
            match self.web3.eth().transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) => {
                    let block_number = receipt.block_number.map(|b| b.as_u64());
                    let enough_confirmations = match block_number {
                        Some(block_number) if self.confirmation_blocks > 1 => {
                            match self.web3.eth().block_number().await {
                                Ok(current) => {
                                    current.as_u64() + 1
                                        >= block_number + self.confirmation_blocks
                                }
                                Err(err) => {
                                    log::warn!("Failed to get block number: {}", err);
                                    false
                                }
                            }
                        }
                        Some(_) => true,
                        None => false,
                    };
                    if enough_confirmations {
                        let status = if receipt.status == Some(U64::from(1)) {
                            ReceiptStatus::Success
                        } else {
                            ReceiptStatus::Reverted
                        };
                        return Ok(TxReceipt {
                            tx_hash,
                            status,
                            block_number,
                            gas_used: receipt.gas_used,
                        });
                    }
                }
                Ok(None) => {
                    log::debug!("Receipt for {:#x} not found yet", tx_hash);
                }
                Err(err) => {
                    log::warn!("Failed to get receipt for {:#x}: {}", tx_hash, err);
                }
            }
            if let Some(transaction_timeout) = self.transaction_timeout {
                let elapsed = started.elapsed();
                if elapsed > transaction_timeout {
                    return Err(err_create!(elapsed));
                }
            }
            tokio::time::sleep(self.receipt_poll_interval).await;
        }
    }
}

impl WalletSession for Web3Wallet {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn account(&self) -> Option<Address> {
        self.account
    }
}

impl ContractReader for Web3Wallet {
    fn read(
        &self,
        contract: Address,
        call: ContractCall,
    ) -> BoxFuture<'_, Result<Vec<Token>, AirdropError>> {
        async move {
            let data = call.encode().map_err(err_from!())?;
            let res = self
                .web3
                .eth()
                .call(
                    CallRequest {
                        from: self.account,
                        to: Some(contract),
                        data: Some(Bytes(data)),
                        ..Default::default()
                    },
                    None,
                )
                .await
                .map_err(err_from!())?;
            call.decode_output(&res.0).map_err(err_from!())
        }
        .boxed()
    }
}

impl ContractWriter for Web3Wallet {
    fn write(
        &self,
        contract: Address,
        call: ContractCall,
    ) -> BoxFuture<'_, Result<H256, AirdropError>> {
        self.send_call(contract, call).boxed()
    }
}

impl ReceiptWaiter for Web3Wallet {
    fn wait(&self, tx_hash: H256) -> BoxFuture<'_, Result<TxReceipt, AirdropError>> {
        self.poll_receipt(tx_hash).boxed()
    }
}
