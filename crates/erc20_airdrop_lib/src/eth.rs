use crate::contracts::ContractCall;
use crate::err_custom_create;
use crate::error::AirdropError;
use crate::wallet::ContractReader;
use futures::join;
use secp256k1::{PublicKey, SecretKey};
use serde::Serialize;
use sha3::Digest;
use sha3::Keccak256;
use web3::ethabi::Token;
use web3::types::{Address, U256};

pub fn get_eth_addr_from_secret(secret_key: &SecretKey) -> Address {
    Address::from_slice(
        &Keccak256::digest(
            &PublicKey::from_secret_key(&secp256k1::Secp256k1::new(), secret_key)
                .serialize_uncompressed()[1..65],
        )
        .as_slice()[12..],
    )
}

fn single_uint(tokens: Vec<Token>, what: &str) -> Result<U256, AirdropError> {
    match tokens.into_iter().next() {
        Some(Token::Uint(val)) => Ok(val),
        other => Err(err_custom_create!(
            "Invalid response from ERC20 {what} call {other:?}"
        )),
    }
}

pub async fn check_allowance(
    reader: &dyn ContractReader,
    owner: Address,
    token: Address,
    spender: Address,
) -> Result<U256, AirdropError> {
    log::debug!("Checking batch transfer contract for allowance...");
    let res = reader
        .read(token, ContractCall::erc20_allowance(owner, spender))
        .await?;
    let allowance = single_uint(res, "allowance")?;
    log::debug!(
        "Check allowance: owner: {:#x}, token: {:#x}, contract: {:#x}, allowance: {}",
        owner,
        token,
        spender,
        allowance
    );

    Ok(allowance)
}

/// Token metadata shown next to the form. Each field is read separately and is `None`
/// when that read fails, so a token without `name` still shows its decimals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDetails {
    pub name: Option<String>,
    pub decimals: Option<u8>,
}

pub async fn get_token_details(reader: &dyn ContractReader, token: Address) -> TokenDetails {
    let (name, decimals) = join!(
        reader.read(token, ContractCall::erc20_name()),
        reader.read(token, ContractCall::erc20_decimals())
    );

    let name = match name {
        Ok(tokens) => match tokens.into_iter().next() {
            Some(Token::String(name)) => Some(name),
            other => {
                log::warn!("Unexpected name() response from {:#x}: {:?}", token, other);
                None
            }
        },
        Err(err) => {
            log::debug!("Failed to read token name from {:#x}: {}", token, err);
            None
        }
    };

    let decimals = match decimals {
        Ok(tokens) => match single_uint(tokens, "decimals") {
            Ok(val) if val <= U256::from(u8::MAX) => Some(val.low_u32() as u8),
            Ok(val) => {
                log::warn!("Token {:#x} reports too many decimals: {}", token, val);
                None
            }
            Err(err) => {
                log::warn!("{}", err);
                None
            }
        },
        Err(err) => {
            log::debug!("Failed to read token decimals from {:#x}: {}", token, err);
            None
        }
    };

    log::debug!("tokenName: {:?} tokenDecimals: {:?}", name, decimals);
    TokenDetails { name, decimals }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::future::BoxFuture;
    use futures_util::FutureExt;
    use std::str::FromStr;

    #[test]
    fn test_get_eth_addr_from_secret() {
        let sk =
            SecretKey::from_str("0000000000000000000000000000000000000000000000000000000000000001")
                .unwrap();
        let addr = format!("{:#x}", get_eth_addr_from_secret(&sk));
        assert_eq!(addr, "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf");
    }

    struct NamelessToken;

    impl ContractReader for NamelessToken {
        fn read(
            &self,
            _contract: Address,
            call: ContractCall,
        ) -> BoxFuture<'_, Result<Vec<Token>, AirdropError>> {
            async move {
                match call.function {
                    "decimals" => Ok(vec![Token::Uint(U256::from(6))]),
                    "allowance" => Ok(vec![Token::Uint(U256::from(100))]),
                    _ => Err(err_custom_create!("execution reverted")),
                }
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn test_token_details_partial() {
        let details = get_token_details(&NamelessToken, Address::zero()).await;
        assert_eq!(
            details,
            TokenDetails {
                name: None,
                decimals: Some(6)
            }
        );
    }

    #[tokio::test]
    async fn test_check_allowance() {
        let allowance = check_allowance(
            &NamelessToken,
            Address::from_low_u64_be(1),
            Address::from_low_u64_be(2),
            Address::from_low_u64_be(3),
        )
        .await
        .unwrap();
        assert_eq!(allowance, U256::from(100));
    }
}
