use crate::contracts::parse_address;
use crate::error::*;
use crate::utils::{parse_u256_amount, ConversionError};
use crate::{err_create, err_custom_create, err_from_msg};
use serde::Serialize;
use web3::types::{Address, U256};

/// One airdrop, created fresh from the raw form fields on every submit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AirdropRequest {
    pub token_address: Address,
    pub recipients: Vec<Address>,
    pub amounts: Vec<U256>,
    pub total: U256,
}

/// Splits human entered text on commas and whitespace in any combination,
/// dropping empty entries.
pub fn split_entries(text: &str) -> Vec<&str> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .collect()
}

pub fn parse_amounts(amounts_text: &str) -> Result<Vec<U256>, AirdropError> {
    split_entries(amounts_text)
        .into_iter()
        .enumerate()
        .map(|(idx, amount)| {
            parse_u256_amount(amount).map_err(err_from_msg!("Invalid amount no {}", idx + 1))
        })
        .collect()
}

pub fn parse_recipients(recipients_text: &str) -> Result<Vec<Address>, AirdropError> {
    split_entries(recipients_text)
        .into_iter()
        .map(parse_address)
        .collect()
}

/// Exact sum of amounts, fails instead of wrapping when the sum exceeds U256
pub fn sum_amounts(amounts: &[U256]) -> Result<U256, AirdropError> {
    amounts.iter().try_fold(U256::zero(), |acc, amount| {
        acc.checked_add(*amount).ok_or_else(|| {
            err_create!(ConversionError::from(
                "Sum of amounts does not fit into uint256".to_string()
            ))
        })
    })
}

/// Total shown while typing. Text that does not parse yet counts as zero.
pub fn calculate_total(amounts_text: &str) -> U256 {
    parse_amounts(amounts_text)
        .and_then(|amounts| sum_amounts(&amounts))
        .unwrap_or_default()
}

/// Turns the three raw form fields into an [`AirdropRequest`].
///
/// The count check runs on the split entries before anything is parsed, so a mismatch is
/// reported as [`InputMismatchError`] even when some entries are malformed as well.
/// Addresses are accepted in any letter case, checksums are not verified.
pub fn normalize_input(
    token_text: &str,
    recipients_text: &str,
    amounts_text: &str,
) -> Result<AirdropRequest, AirdropError> {
    let recipient_entries = split_entries(recipients_text);
    let amount_entries = split_entries(amounts_text);
    if recipient_entries.len() != amount_entries.len() {
        return Err(err_create!(InputMismatchError {
            recipients: recipient_entries.len(),
            amounts: amount_entries.len(),
        }));
    }

    let token_text = token_text.trim();
    if token_text.is_empty() {
        return Err(err_custom_create!("Token address is required"));
    }
    let token_address = parse_address(token_text)?;

    let recipients = parse_recipients(recipients_text)?;
    let amounts = parse_amounts(amounts_text)?;
    let total = sum_amounts(&amounts)?;

    Ok(AirdropRequest {
        token_address,
        recipients,
        amounts,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
    const ADDR_A: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const ADDR_B: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    #[test]
    fn test_split_entries() {
        assert_eq!(split_entries("a, b\nc"), vec!["a", "b", "c"]);
        assert_eq!(split_entries(" ,, a ,\n\n b ,  "), vec!["a", "b"]);
        assert_eq!(split_entries("a\r\nb\tc"), vec!["a", "b", "c"]);
        assert!(split_entries("").is_empty());
        assert!(split_entries(" \n , \n").is_empty());
    }

    #[test]
    fn test_normalize_two_recipients() {
        let req = normalize_input(TOKEN, &format!("{ADDR_A}, {ADDR_B}"), "10, 20").unwrap();
        assert_eq!(req.recipients.len(), 2);
        assert_eq!(format!("{:#x}", req.recipients[0]), ADDR_A);
        assert_eq!(format!("{:#x}", req.recipients[1]), ADDR_B);
        assert_eq!(req.amounts, vec![U256::from(10), U256::from(20)]);
        assert_eq!(req.total, U256::from(30));
    }

    #[test]
    fn test_normalize_mixed_delimiters() {
        let recipients = format!("\n{ADDR_A}\n\n{ADDR_B} ,{ADDR_A}\n");
        let req = normalize_input(TOKEN, &recipients, "1\n2,,3").unwrap();
        assert_eq!(req.recipients.len(), 3);
        assert_eq!(req.amounts.len(), 3);
        assert_eq!(req.total, U256::from(6));
    }

    #[test]
    fn test_normalize_mismatch() {
        let err = normalize_input(TOKEN, "0xAAA", "10,20").unwrap_err();
        assert!(err.is_input_mismatch());
        match &err.inner {
            ErrorBag::InputMismatch(mismatch) => {
                assert_eq!(mismatch.recipients, 1);
                assert_eq!(mismatch.amounts, 2);
            }
            _ => panic!("Unexpected error {err}"),
        }

        //mismatch is reported even without a token address
        let err = normalize_input("", ADDR_A, "").unwrap_err();
        assert!(err.is_input_mismatch());
    }

    #[test]
    fn test_normalize_invalid_entries() {
        let err = normalize_input(TOKEN, "0xAAA", "10").unwrap_err();
        assert!(err.to_string().contains("0xAAA"));

        let err = normalize_input(TOKEN, ADDR_A, "1.5").unwrap_err();
        assert!(err.to_string().contains("Invalid amount no 1"));

        let err = normalize_input("  ", ADDR_A, "1").unwrap_err();
        assert!(err.to_string().contains("Token address is required"));
    }

    #[test]
    fn test_total_is_exact() {
        let big = "57896044618658097711785492504343953926634992332820282019728792003956564819967";
        let req = normalize_input(TOKEN, &format!("{ADDR_A} {ADDR_B}"), &format!("{big} 1"))
            .unwrap();
        assert_eq!(
            req.total,
            U256::from_dec_str(
                "57896044618658097711785492504343953926634992332820282019728792003956564819968"
            )
            .unwrap()
        );

        let max = U256::max_value().to_string();
        let err = normalize_input(TOKEN, &format!("{ADDR_A} {ADDR_B}"), &format!("{max} 1"))
            .unwrap_err();
        assert!(err.to_string().contains("does not fit"));
    }

    #[test]
    fn test_calculate_total() {
        assert_eq!(calculate_total("10, 20\n0x0a"), U256::from(40));
        assert_eq!(calculate_total(""), U256::zero());
        assert_eq!(calculate_total("10, abc"), U256::zero());
    }

    #[test]
    fn test_equal_lengths_property() {
        let addrs = [ADDR_A, ADDR_B];
        for count in 0..20_usize {
            let recipients: Vec<&str> = (0..count).map(|i| addrs[i % 2]).collect();
            let amounts: Vec<String> = (0..count).map(|i| (i * 7).to_string()).collect();
            let req = normalize_input(TOKEN, &recipients.join("\n"), &amounts.join(", ")).unwrap();
            assert_eq!(req.recipients.len(), count);
            assert_eq!(req.amounts.len(), count);
            let expected: usize = (0..count).map(|i| i * 7).sum();
            assert_eq!(req.total, U256::from(expected));

            let err =
                normalize_input(TOKEN, &recipients.join("\n"), &format!("{} 1", amounts.join(" ")))
                    .unwrap_err();
            assert!(err.is_input_mismatch());
        }
    }
}
