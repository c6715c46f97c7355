use std::error::Error;
use std::fmt::Display;

/// Recipients and amounts do not pair up after splitting the raw text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputMismatchError {
    pub recipients: usize,
    pub amounts: usize,
}

impl Error for InputMismatchError {}

impl Display for InputMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Mismatch between number of recipients and amounts: {} recipients, {} amounts",
            self.recipients, self.amounts
        )
    }
}
