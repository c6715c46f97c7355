use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};
use web3::types::U256;

#[derive(Debug, Clone)]
pub struct ConversionError {
    pub msg: String,
}

impl ConversionError {
    pub fn from(msg: String) -> Self {
        Self { msg }
    }
}

impl Display for ConversionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error during conversion: {}", self.msg)
    }
}

impl Error for ConversionError {}

/// Parses an integer amount the way users type it: decimal digits or `0x` prefixed hex.
/// No fractional part and no sign are accepted.
pub fn parse_u256_amount(val: &str) -> Result<U256, ConversionError> {
    let (digits, radix) = match val.strip_prefix("0x").or_else(|| val.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (val, 10),
    };
    if digits.is_empty() {
        return Err(ConversionError::from(format!(
            "Cannot convert {val} to an integer amount"
        )));
    }
    U256::from_str_radix(digits, radix).map_err(|err| {
        ConversionError::from(format!(
            "Cannot convert {val} to an integer amount: {err:?}"
        ))
    })
}

pub fn gwei_to_u256(gas: f64) -> Result<U256, ConversionError> {
    const GWEI: f64 = 1.0E9;
    if gas.is_nan() {
        return Err(ConversionError {
            msg: "Gas price cannot be NaN".to_string(),
        });
    }
    if gas < 0.0 {
        return Err(ConversionError {
            msg: "Gas price cannot be negative".to_string(),
        });
    }
    if gas > 1.0E9 {
        return Err(ConversionError {
            msg: "Gas price cannot be greater than 1E9".to_string(),
        });
    }
    Ok(U256::from((gas * GWEI) as u64))
}

fn compute_base(num_decimals: u32) -> Decimal {
    Decimal::from(10_u128.pow(num_decimals))
}

fn u256_to_rust_dec(amount: U256, num_decimals: u32) -> Result<Decimal, ConversionError> {
    if num_decimals > 18 {
        return Err(ConversionError {
            msg: format!("Decimals: {num_decimals} cannot be greater than 18"),
        });
    }

    //max value supported by rust_decimal
    if amount >= U256::from(79228162514264337593543950336_u128) {
        return Err(ConversionError {
            msg: format!(
                "Amount greater than max rust_decimal: {amount}>=79228162514264337593543950336"
            ),
        });
    }

    Ok(Decimal::from(amount.as_u128()) / compute_base(num_decimals))
}

pub trait U256ConvExt {
    fn to_gwei(&self) -> Result<Decimal, ConversionError>;
    fn to_gwei_f64(&self) -> f64;
}

impl U256ConvExt for U256 {
    fn to_gwei(&self) -> Result<Decimal, ConversionError> {
        u256_to_rust_dec(*self, 9)
    }
    fn to_gwei_f64(&self) -> f64 {
        self.to_gwei()
            .ok()
            .and_then(|dec| dec.to_f64())
            .unwrap_or(f64::MAX)
    }
}

/// Exact base unit to token unit formatting, works for the whole U256 range.
/// Trailing zeros of the fraction are dropped.
pub fn u256_to_decimal_string(amount: U256, decimals: u32) -> String {
    let decimals = decimals as usize;
    let mut str_rev: Vec<char> = amount.to_string().chars().rev().collect();
    str_rev.extend(std::iter::repeat('0').take(decimals));
    str_rev.insert(decimals, '.');

    let str: String = str_rev.iter().rev().collect();
    let str = str.trim_matches('0');
    let str = if str.starts_with('.') {
        format!("0{str}")
    } else {
        str.to_string()
    };
    str.trim_end_matches('.').to_string()
}
