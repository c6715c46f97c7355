use crate::contracts::DUMMY_RPC_PROVIDER;
use crate::eth::get_eth_addr_from_secret;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use secp256k1::SecretKey;

use super::{Signer, SignerError};
use web3::types::{SignedTransaction, TransactionParameters, H160};

/// PrivateKeySigner is implementation of Signer trait that stores private keys in memory and use
/// them to sign transactions matching them by public addresses
pub struct PrivateKeySigner {
    secret_keys: Vec<SecretKey>,
}

impl PrivateKeySigner {
    pub fn new(secret_keys: Vec<SecretKey>) -> Self {
        Self { secret_keys }
    }

    fn get_private_key(&self, pub_address: H160) -> Result<&SecretKey, SignerError> {
        self.secret_keys
            .iter()
            .find(|sk| get_eth_addr_from_secret(sk) == pub_address)
            .ok_or(SignerError {
                message: format!("Failed to find private key for address: {pub_address:#x}"),
            })
    }
}

impl Signer for PrivateKeySigner {
    fn check_if_sign_possible(&self, pub_address: H160) -> BoxFuture<'_, Result<(), SignerError>> {
        async move {
            self.get_private_key(pub_address)?;
            Ok(())
        }
        .boxed()
    }

    fn sign(
        &self,
        pub_address: H160,
        tp: TransactionParameters,
    ) -> BoxFuture<'_, Result<SignedTransaction, SignerError>> {
        async move {
            let secret_key = self.get_private_key(pub_address)?;
            let signed = DUMMY_RPC_PROVIDER
                .accounts()
                .sign_transaction(tp, secret_key)
                .await
                .map_err(|err| SignerError {
                    message: format!("Error when signing transaction in PrivateKeySigner {err}"),
                })?;
            Ok(signed)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use web3::types::{U256, U64};

    fn test_key() -> SecretKey {
        SecretKey::from_str("0000000000000000000000000000000000000000000000000000000000000001")
            .unwrap()
    }

    #[tokio::test]
    async fn test_sign_known_address() {
        let sk = test_key();
        let signer = PrivateKeySigner::new(vec![sk]);
        let addr = get_eth_addr_from_secret(&sk);
        signer.check_if_sign_possible(addr).await.unwrap();

        let tp = TransactionParameters {
            nonce: Some(U256::zero()),
            to: Some(H160::from_low_u64_be(2)),
            gas: U256::from(100000),
            gas_price: None,
            value: U256::zero(),
            data: Default::default(),
            chain_id: Some(31337),
            transaction_type: Some(U64::from(2)),
            access_list: None,
            max_fee_per_gas: Some(U256::from(2_000_000_000_u64)),
            max_priority_fee_per_gas: Some(U256::from(1_000_000_000_u64)),
        };
        let signed = signer.sign(addr, tp).await.unwrap();
        assert!(!signed.raw_transaction.0.is_empty());
    }

    #[tokio::test]
    async fn test_sign_unknown_address() {
        let signer = PrivateKeySigner::new(vec![test_key()]);
        let err = signer
            .check_if_sign_possible(H160::from_low_u64_be(5))
            .await
            .unwrap_err();
        assert!(err.message.contains("0x0000000000000000000000000000000000000005"));
    }
}
