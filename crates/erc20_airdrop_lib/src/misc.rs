use crate::err_custom_create;
use crate::error::AirdropError;
use crate::eth::get_eth_addr_from_secret;
use secp256k1::SecretKey;
use std::str::FromStr;
use web3::types::Address;

pub fn load_private_keys(str: &str) -> Result<(Vec<SecretKey>, Vec<Address>), AirdropError> {
    let mut keys = Vec::new();
    let mut addrs = Vec::new();
    if str.is_empty() {
        return Ok((keys, addrs));
    }
    for key in str.split(',') {
        let key = key.trim();
        let key = key.strip_prefix("0x").unwrap_or(key);
        //do not disclose the private key in error message
        let secret = SecretKey::from_str(key)
            .map_err(|_| err_custom_create!("Failed to parse private key"))?;
        let public_addr = get_eth_addr_from_secret(&secret);
        keys.push(secret);
        addrs.push(public_addr);
    }
    Ok((keys, addrs))
}

pub fn display_private_keys(keys: &[SecretKey]) {
    if keys.is_empty() {
        log::info!("No Eth accounts loaded");
    } else {
        for (idx, key) in keys.iter().enumerate() {
            let public_addr = get_eth_addr_from_secret(key);
            log::info!("Eth account loaded {}: {:#x}", idx + 1, public_addr);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_private_keys() {
        let (keys, addrs) = load_private_keys(
            "0x0000000000000000000000000000000000000000000000000000000000000001, 0000000000000000000000000000000000000000000000000000000000000002",
        )
        .unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(
            format!("{:#x}", addrs[0]),
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
        assert_ne!(addrs[0], addrs[1]);

        let (keys, _) = load_private_keys("").unwrap();
        assert!(keys.is_empty());

        let err = load_private_keys("zz").unwrap_err();
        assert!(!err.to_string().contains("zz"));
    }
}
