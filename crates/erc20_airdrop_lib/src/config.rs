use serde::Deserialize;
use std::collections::btree_map::BTreeMap as Map;

use std::path::Path;

use crate::error::*;
use crate::{err_create, err_custom_create, err_from};
use tokio::fs;
use web3::types::Address;

fn default_receipt_poll_interval() -> f64 {
    1.0
}

fn default_draft_file() -> String {
    "airdrop-draft.json".to_string()
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Engine {
    /// Seconds between receipt queries while waiting for inclusion
    #[serde(default = "default_receipt_poll_interval")]
    pub receipt_poll_interval: f64,
    #[serde(default = "default_draft_file")]
    pub draft_file: String,
}

impl Default for Engine {
    fn default() -> Self {
        Engine {
            receipt_poll_interval: default_receipt_poll_interval(),
            draft_file: default_draft_file(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub chain: Map<String, Chain>,
    #[serde(default)]
    pub engine: Engine,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Chain {
    pub chain_name: String,
    pub chain_id: u64,
    pub rpc_endpoints: Vec<String>,
    pub currency_symbol: String,
    pub priority_fee: f64,
    pub max_fee_per_gas: f64,
    /// Batch transfer contract, missing when the chain is not supported
    pub tsender: Option<Address>,
    /// Seconds the receipt waiter gives up after, no limit when missing
    pub transaction_timeout: Option<u64>,
    #[serde(default = "default_confirmation_blocks")]
    pub confirmation_blocks: u64,
    pub block_explorer_url: Option<String>,
}

fn default_confirmation_blocks() -> u64 {
    1
}

impl Config {
    pub fn load_from_str(str: &str) -> Result<Self, AirdropError> {
        match toml::from_str(str) {
            Ok(config) => Ok(config),
            Err(e) => Err(err_custom_create!("Failed to parse toml {}: {}", str, e)),
        }
    }

    pub async fn load<P: AsRef<Path> + std::fmt::Display>(path: P) -> Result<Self, AirdropError> {
        match toml::from_str(&fs::read_to_string(&path).await.map_err(err_from!())?) {
            Ok(config) => Ok(config),
            Err(e) => Err(err_custom_create!("Failed to parse toml {}: {}", path, e)),
        }
    }

    pub fn get_chain(&self, chain_name: &str) -> Result<&Chain, AirdropError> {
        self.chain
            .get(chain_name)
            .ok_or(err_custom_create!("Chain {} not found in config file", chain_name))
    }
}

/// Static mapping from chain id to the batch transfer contract deployed there
#[derive(Debug, Clone, Default)]
pub struct NetworkDirectory {
    tsender: Map<u64, Address>,
}

impl NetworkDirectory {
    pub fn from_config(config: &Config) -> Self {
        let tsender = config
            .chain
            .values()
            .filter_map(|chain| chain.tsender.map(|addr| (chain.chain_id, addr)))
            .collect();
        Self { tsender }
    }

    pub fn with_tsender(mut self, chain_id: u64, address: Address) -> Self {
        self.tsender.insert(chain_id, address);
        self
    }

    pub fn tsender_for(&self, chain_id: u64) -> Result<Address, AirdropError> {
        self.tsender
            .get(&chain_id)
            .copied()
            .ok_or(err_create!(UnsupportedNetworkError { chain_id }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
[engine]
receipt-poll-interval = 0.5

[chain.anvil]
chain-name = "Anvil"
chain-id = 31337
rpc-endpoints = ["http://127.0.0.1:8545"]
currency-symbol = "ETH"
priority-fee = 1.0
max-fee-per-gas = 20.0
tsender = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
transaction-timeout = 100

[chain.holesky]
chain-name = "Holesky"
chain-id = 17000
rpc-endpoints = ["https://ethereum-holesky-rpc.publicnode.com"]
currency-symbol = "tETH"
priority-fee = 1.5
max-fee-per-gas = 30.0
"#;

    #[test]
    fn test_load_config() {
        let config = Config::load_from_str(CONFIG).unwrap();
        assert_eq!(config.engine.receipt_poll_interval, 0.5);
        assert_eq!(config.engine.draft_file, "airdrop-draft.json");

        let anvil = config.get_chain("anvil").unwrap();
        assert_eq!(anvil.chain_id, 31337);
        assert_eq!(anvil.confirmation_blocks, 1);
        assert_eq!(anvil.transaction_timeout, Some(100));
        assert!(config.get_chain("mainnet").is_err());
    }

    #[test]
    fn test_network_directory() {
        let config = Config::load_from_str(CONFIG).unwrap();
        let directory = NetworkDirectory::from_config(&config);

        let tsender = directory.tsender_for(31337).unwrap();
        assert_eq!(
            format!("{tsender:#x}"),
            "0x5fbdb2315678afecb367f032d93f642f64180aa3"
        );
        //chain present in config but without contract
        assert!(directory
            .tsender_for(17000)
            .unwrap_err()
            .is_unsupported_network());

        let directory = directory.with_tsender(17000, Address::from_low_u64_be(9));
        assert_eq!(
            directory.tsender_for(17000).unwrap(),
            Address::from_low_u64_be(9)
        );
    }
}
