pub mod allowance;
pub mod config;
pub mod contracts;
pub mod draft;
pub mod eth;
pub mod flow;
pub mod form;
pub mod input;
pub mod misc;
pub mod signer;
pub mod status;
pub mod wallet;

pub use erc20_airdrop_common::error;
pub use erc20_airdrop_common::utils;
pub use erc20_airdrop_common::{err_create, err_custom_create, err_from, err_from_msg};
