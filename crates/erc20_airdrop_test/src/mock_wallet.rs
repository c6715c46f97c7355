use crate::{addr, TEST_CHAIN_ID, TEST_OWNER};
use erc20_airdrop_common::err_create;
use erc20_airdrop_common::error::{AirdropError, TransactionFailedError, WalletRejectionError};
use erc20_airdrop_lib::contracts::ContractCall;
use erc20_airdrop_lib::wallet::{
    ContractReader, ContractWriter, ReceiptStatus, ReceiptWaiter, TxReceipt, WalletSession,
};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;
use web3::ethabi::Token;
use web3::types::{Address, H256, U256};

#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Read { contract: Address, call: ContractCall },
    Write { contract: Address, call: ContractCall },
    Wait { tx_hash: H256 },
}

#[derive(Default)]
struct MockState {
    allowance: U256,
    calls: Vec<MockCall>,
    sent: BTreeMap<H256, ContractCall>,
}

/// In-memory stand-in for a connected wallet. Records every call it receives.
/// Successful receipts update the stored allowance the way the token would
/// (approve sets it, the batch transfer spends the total).
pub struct MockWallet {
    chain_id: u64,
    account: Option<Address>,
    token_name: Option<String>,
    token_decimals: Option<u8>,
    rejected: BTreeSet<&'static str>,
    reverted: BTreeSet<&'static str>,
    wait_failures: BTreeSet<&'static str>,
    state: Mutex<MockState>,
}

impl Default for MockWallet {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWallet {
    pub fn new() -> Self {
        Self {
            chain_id: TEST_CHAIN_ID,
            account: Some(addr(TEST_OWNER)),
            token_name: Some("Test Token".to_string()),
            token_decimals: Some(18),
            rejected: BTreeSet::new(),
            reverted: BTreeSet::new(),
            wait_failures: BTreeSet::new(),
            state: Mutex::new(MockState::default()),
        }
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn with_account(mut self, account: Option<Address>) -> Self {
        self.account = account;
        self
    }

    pub fn with_allowance(self, allowance: U256) -> Self {
        self.state.lock().unwrap().allowance = allowance;
        self
    }

    pub fn with_token(mut self, name: Option<&str>, decimals: Option<u8>) -> Self {
        self.token_name = name.map(|s| s.to_string());
        self.token_decimals = decimals;
        self
    }

    /// Wallet refuses to sign calls of the given function
    pub fn reject_write(mut self, function: &'static str) -> Self {
        self.rejected.insert(function);
        self
    }

    /// Transactions calling the given function are mined but revert
    pub fn revert(mut self, function: &'static str) -> Self {
        self.reverted.insert(function);
        self
    }

    /// Waiting for transactions calling the given function fails
    pub fn fail_wait(mut self, function: &'static str) -> Self {
        self.wait_failures.insert(function);
        self
    }

    pub fn allowance(&self) -> U256 {
        self.state.lock().unwrap().allowance
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn write_calls(&self) -> Vec<(Address, ContractCall)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                MockCall::Write { contract, call } => Some((contract, call)),
                _ => None,
            })
            .collect()
    }

    pub fn write_functions(&self) -> Vec<&'static str> {
        self.write_calls()
            .into_iter()
            .map(|(_, call)| call.function)
            .collect()
    }

    fn record(&self, call: MockCall) {
        self.state.lock().unwrap().calls.push(call);
    }
}

impl WalletSession for MockWallet {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn account(&self) -> Option<Address> {
        self.account
    }
}

impl ContractReader for MockWallet {
    fn read(
        &self,
        contract: Address,
        call: ContractCall,
    ) -> BoxFuture<'_, Result<Vec<Token>, AirdropError>> {
        async move {
            self.record(MockCall::Read {
                contract,
                call: call.clone(),
            });
            let res = match call.function {
                "allowance" => Some(Token::Uint(self.allowance())),
                "name" => self.token_name.clone().map(Token::String),
                "decimals" => self.token_decimals.map(|d| Token::Uint(U256::from(d))),
                _ => None,
            };
            res.map(|token| vec![token]).ok_or(err_create!(
                TransactionFailedError::new(&format!("execution reverted: {}", call.function))
            ))
        }
        .boxed()
    }
}

impl ContractWriter for MockWallet {
    fn write(
        &self,
        contract: Address,
        call: ContractCall,
    ) -> BoxFuture<'_, Result<H256, AirdropError>> {
        async move {
            self.record(MockCall::Write {
                contract,
                call: call.clone(),
            });
            if self.rejected.contains(call.function) {
                return Err(err_create!(WalletRejectionError::new(
                    "User rejected the request"
                )));
            }
            let mut state = self.state.lock().unwrap();
            let tx_hash = H256::from_low_u64_be(state.sent.len() as u64 + 1);
            state.sent.insert(tx_hash, call);
            Ok(tx_hash)
        }
        .boxed()
    }
}

impl ReceiptWaiter for MockWallet {
    fn wait(&self, tx_hash: H256) -> BoxFuture<'_, Result<TxReceipt, AirdropError>> {
        async move {
            self.record(MockCall::Wait { tx_hash });
            let mut state = self.state.lock().unwrap();
            let call = state.sent.get(&tx_hash).cloned().ok_or(err_create!(
                TransactionFailedError::new(&format!("Unknown transaction {tx_hash:#x}"))
            ))?;
            if self.wait_failures.contains(call.function) {
                return Err(err_create!(TransactionFailedError::new(
                    "Timed out while waiting for transaction"
                )));
            }
            let status = if self.reverted.contains(call.function) {
                ReceiptStatus::Reverted
            } else {
                ReceiptStatus::Success
            };
            if status == ReceiptStatus::Success {
                match (call.function, call.args.as_slice()) {
                    ("approve", [_, Token::Uint(amount)]) => state.allowance = *amount,
                    ("airdropERC20", [_, _, _, Token::Uint(total)]) => {
                        state.allowance = state.allowance.saturating_sub(*total)
                    }
                    _ => {}
                }
            }
            Ok(TxReceipt {
                tx_hash,
                status,
                block_number: Some(state.sent.len() as u64),
                gas_used: Some(U256::from(50000)),
            })
        }
        .boxed()
    }
}
