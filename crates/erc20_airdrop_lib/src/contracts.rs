use lazy_static::lazy_static;

use crate::err_custom_create;
use crate::error::AirdropError;
use serde::Serialize;
use std::str::FromStr;
use web3::contract::tokens::Tokenize;
use web3::contract::Contract;
use web3::ethabi::Token;
use web3::transports::Http;
use web3::types::{Address, U256};
use web3::Web3;

lazy_static! {
    pub static ref DUMMY_RPC_PROVIDER: Web3<Http> = {
        let transport = web3::transports::Http::new("http://noconn").unwrap();
        Web3::new(transport)
    };
    pub static ref ERC20_CONTRACT_TEMPLATE: Contract<Http> =
        prepare_contract_template(include_bytes!("contracts/ierc20.json")).unwrap();
    pub static ref TSENDER_CONTRACT_TEMPLATE: Contract<Http> =
        prepare_contract_template(include_bytes!("contracts/tsender.json")).unwrap();
}

pub fn prepare_contract_template(json_abi: &[u8]) -> Result<Contract<Http>, AirdropError> {
    let contract = Contract::from_json(DUMMY_RPC_PROVIDER.eth(), Address::zero(), json_abi)
        .map_err(|err| err_custom_create!("Failed to create contract {err}"))?;

    Ok(contract)
}

/// ABI a contract call is resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ContractAbi {
    Erc20,
    TSender,
}

impl ContractAbi {
    pub fn template(&self) -> &'static Contract<Http> {
        match self {
            ContractAbi::Erc20 => &ERC20_CONTRACT_TEMPLATE,
            ContractAbi::TSender => &TSENDER_CONTRACT_TEMPLATE,
        }
    }
}

/// ABI fragment, function name and arguments of a single contract call.
/// Readers and writers receive it unencoded, so test doubles can inspect the arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractCall {
    pub abi: ContractAbi,
    pub function: &'static str,
    pub args: Vec<Token>,
}

impl ContractCall {
    pub fn new(abi: ContractAbi, function: &'static str, args: impl Tokenize) -> Self {
        Self {
            abi,
            function,
            args: args.into_tokens(),
        }
    }

    pub fn erc20_name() -> Self {
        Self::new(ContractAbi::Erc20, "name", ())
    }

    pub fn erc20_decimals() -> Self {
        Self::new(ContractAbi::Erc20, "decimals", ())
    }

    pub fn erc20_allowance(owner: Address, spender: Address) -> Self {
        Self::new(ContractAbi::Erc20, "allowance", (owner, spender))
    }

    pub fn erc20_approve(spender: Address, amount: U256) -> Self {
        Self::new(ContractAbi::Erc20, "approve", (spender, amount))
    }

    pub fn airdrop_erc20(
        token: Address,
        recipients: Vec<Address>,
        amounts: Vec<U256>,
        total: U256,
    ) -> Self {
        Self::new(
            ContractAbi::TSender,
            "airdropERC20",
            (token, recipients, amounts, total),
        )
    }

    pub fn encode(&self) -> Result<Vec<u8>, web3::ethabi::Error> {
        self.abi
            .template()
            .abi()
            .function(self.function)
            .and_then(|function| function.encode_input(&self.args))
    }

    pub fn decode_output(&self, data: &[u8]) -> Result<Vec<Token>, web3::ethabi::Error> {
        self.abi
            .template()
            .abi()
            .function(self.function)
            .and_then(|function| function.decode_output(data))
    }
}

pub fn parse_address(addr: &str) -> Result<Address, AirdropError> {
    Address::from_str(addr).map_err(|err| err_custom_create!("Invalid address {addr}: {err}"))
}
