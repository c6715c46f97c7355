use super::ErrorBag;
use std::error::Error;

/// Error type build over ErrorBag, containing source code location and optional message
/// Note that only creating via macro is possible to catch line and file
#[derive(Debug)]
pub struct AirdropError {
    pub inner: ErrorBag,
    pub msg: Option<String>,
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
}

impl AirdropError {
    pub fn is_input_mismatch(&self) -> bool {
        matches!(self.inner, ErrorBag::InputMismatch(_))
    }

    pub fn is_unsupported_network(&self) -> bool {
        matches!(self.inner, ErrorBag::UnsupportedNetwork(_))
    }

    pub fn is_wallet_rejection(&self) -> bool {
        matches!(self.inner, ErrorBag::WalletRejection(_))
    }

    pub fn is_transaction_failure(&self) -> bool {
        matches!(
            self.inner,
            ErrorBag::TransactionFailedError(_) | ErrorBag::TimeLimitReached(_)
        )
    }
}

impl Error for AirdropError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.inner)
    }
}

impl std::fmt::Display for AirdropError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let file_loc = self.file.replace('\\', "/");

        if let Some(msg) = &self.msg {
            write!(
                f,
                "{}, {}, {}:{}:{}",
                msg, self.inner, file_loc, self.line, self.column
            )
        } else {
            write!(
                f,
                "{}, {}:{}:{}",
                self.inner, file_loc, self.line, self.column
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::*;
    use crate::utils::parse_u256_amount;
    use crate::{err_create, err_custom_create, err_from_msg};

    #[test]
    fn test_error_taxonomy() {
        let err = err_create!(InputMismatchError {
            recipients: 1,
            amounts: 2
        });
        assert!(err.is_input_mismatch());
        assert!(!err.is_transaction_failure());
        assert!(err.to_string().contains("1 recipients, 2 amounts"));

        let err = err_create!(UnsupportedNetworkError { chain_id: 5 });
        assert!(err.is_unsupported_network());

        let err = err_create!(WalletRejectionError::new("User rejected the request"));
        assert!(err.is_wallet_rejection());

        let err = err_create!(std::time::Duration::from_secs(3));
        assert!(err.is_transaction_failure());

        let err = err_custom_create!("Something {}", "odd");
        assert!(err.to_string().starts_with("CustomError: Something odd"));
    }

    #[test]
    fn test_error_with_message() {
        let res: Result<_, AirdropError> =
            parse_u256_amount("abc").map_err(err_from_msg!("Parsing {}", "amount"));
        let err = res.unwrap_err();
        assert!(matches!(err.inner, ErrorBag::ConversionError(_)));
        let text = err.to_string();
        assert!(text.starts_with("Parsing amount, "));
        assert!(text.contains("wrapped.rs"));
    }
}
