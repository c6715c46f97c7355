use std::error::Error;
use std::fmt::Display;

/// A custom error type for convenient error creation
#[derive(Debug)]
pub struct CustomError {
    message: String,
}

impl CustomError {
    pub fn from_owned_string(message: String) -> CustomError {
        CustomError { message }
    }
}
impl Error for CustomError {}

impl Display for CustomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CustomError: {}", self.message)
    }
}

/// On-chain revert or a failure while waiting for inclusion
#[derive(Debug)]
pub struct TransactionFailedError {
    pub message: String,
}

impl TransactionFailedError {
    pub fn new(message: &str) -> TransactionFailedError {
        TransactionFailedError {
            message: message.to_string(),
        }
    }
}
impl Error for TransactionFailedError {}

impl Display for TransactionFailedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TransactionFailedError: {}", self.message)
    }
}

/// The wallet refused to sign or submit the transaction
#[derive(Debug)]
pub struct WalletRejectionError {
    pub message: String,
}

impl WalletRejectionError {
    pub fn new(message: &str) -> WalletRejectionError {
        WalletRejectionError {
            message: message.to_string(),
        }
    }
}
impl Error for WalletRejectionError {}

impl Display for WalletRejectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WalletRejectionError: {}", self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedNetworkError {
    pub chain_id: u64,
}

impl Error for UnsupportedNetworkError {}

impl Display for UnsupportedNetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "No batch transfer contract known for chain id {}, please use a supported chain",
            self.chain_id
        )
    }
}
