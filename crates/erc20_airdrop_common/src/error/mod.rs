mod bag;
mod custom;
mod input;
mod wrapped;

pub use bag::ErrorBag;
pub use custom::{
    CustomError, TransactionFailedError, UnsupportedNetworkError, WalletRejectionError,
};
pub use input::InputMismatchError;
pub use wrapped::AirdropError;

/// Export macros for creating errors
mod macros;
