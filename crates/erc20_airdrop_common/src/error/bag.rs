use super::{
    CustomError, InputMismatchError, TransactionFailedError, UnsupportedNetworkError,
    WalletRejectionError,
};
use crate::utils::ConversionError;
use std::fmt::Display;
use std::time::Duration;

/// Enum containing all possible errors used in the library
#[derive(Debug)]
pub enum ErrorBag {
    InputMismatch(InputMismatchError),
    UnsupportedNetwork(UnsupportedNetworkError),
    WalletNotConnected,
    WalletRejection(WalletRejectionError),
    TransactionFailedError(TransactionFailedError),
    CustomError(CustomError),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
    EthAbiError(web3::ethabi::Error),
    Web3Error(web3::Error),
    ConversionError(ConversionError),
    TimeLimitReached(Duration),
}

impl Display for ErrorBag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorBag::InputMismatch(input_mismatch) => write!(f, "{input_mismatch}"),
            ErrorBag::UnsupportedNetwork(unsupported) => write!(f, "{unsupported}"),
            ErrorBag::WalletNotConnected => write!(f, "No wallet account connected"),
            ErrorBag::WalletRejection(rejection) => write!(f, "{rejection}"),
            ErrorBag::TransactionFailedError(transaction_failed_error) => {
                write!(f, "{transaction_failed_error}")
            }
            ErrorBag::CustomError(custom_error) => write!(f, "{custom_error}"),
            ErrorBag::IoError(io_error) => write!(f, "{io_error}"),
            ErrorBag::JsonError(json_error) => write!(f, "{json_error}"),
            ErrorBag::EthAbiError(eth_abi_error) => write!(f, "{eth_abi_error:?}"),
            ErrorBag::Web3Error(web3_error) => write!(f, "{web3_error:?}"),
            ErrorBag::ConversionError(conversion_error) => write!(f, "{conversion_error}"),
            ErrorBag::TimeLimitReached(duration) => write!(f, "Time limit reached: {duration:?}"),
        }
    }
}

impl std::error::Error for ErrorBag {}

impl From<InputMismatchError> for ErrorBag {
    fn from(err: InputMismatchError) -> Self {
        ErrorBag::InputMismatch(err)
    }
}

impl From<UnsupportedNetworkError> for ErrorBag {
    fn from(err: UnsupportedNetworkError) -> Self {
        ErrorBag::UnsupportedNetwork(err)
    }
}

impl From<WalletRejectionError> for ErrorBag {
    fn from(err: WalletRejectionError) -> Self {
        ErrorBag::WalletRejection(err)
    }
}

impl From<TransactionFailedError> for ErrorBag {
    fn from(err: TransactionFailedError) -> Self {
        ErrorBag::TransactionFailedError(err)
    }
}

impl From<CustomError> for ErrorBag {
    fn from(err: CustomError) -> Self {
        ErrorBag::CustomError(err)
    }
}

impl From<std::io::Error> for ErrorBag {
    fn from(err: std::io::Error) -> Self {
        ErrorBag::IoError(err)
    }
}

impl From<serde_json::Error> for ErrorBag {
    fn from(err: serde_json::Error) -> Self {
        ErrorBag::JsonError(err)
    }
}

impl From<web3::ethabi::Error> for ErrorBag {
    fn from(err: web3::ethabi::Error) -> Self {
        ErrorBag::EthAbiError(err)
    }
}

impl From<web3::Error> for ErrorBag {
    fn from(err: web3::Error) -> Self {
        ErrorBag::Web3Error(err)
    }
}

impl From<ConversionError> for ErrorBag {
    fn from(err: ConversionError) -> Self {
        ErrorBag::ConversionError(err)
    }
}

impl From<Duration> for ErrorBag {
    fn from(err: Duration) -> Self {
        ErrorBag::TimeLimitReached(err)
    }
}
