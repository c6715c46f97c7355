mod mock_wallet;
mod shared_store;

pub use erc20_airdrop_lib::draft::MemoryStore;
pub use mock_wallet::{MockCall, MockWallet};
pub use shared_store::SharedStore;

use erc20_airdrop_lib::config::NetworkDirectory;
use erc20_airdrop_lib::flow::AirdropFlow;
use erc20_airdrop_lib::wallet::WalletHandle;
use std::str::FromStr;
use std::sync::Arc;
use web3::types::Address;

pub const TEST_CHAIN_ID: u64 = 31337;
pub const TEST_TSENDER: &str = "0x5fbdb2315678afecb367f032d93f642f64180aa3";
pub const TEST_TOKEN: &str = "0xe7f1725e7734ce288f8367e1bb143e90bb3f0512";
pub const TEST_OWNER: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";
pub const RECIPIENT_A: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
pub const RECIPIENT_B: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

pub fn addr(str: &str) -> Address {
    Address::from_str(str).unwrap()
}

pub fn test_directory() -> NetworkDirectory {
    NetworkDirectory::default().with_tsender(TEST_CHAIN_ID, addr(TEST_TSENDER))
}

pub fn create_test_flow(wallet: Arc<MockWallet>) -> AirdropFlow {
    AirdropFlow::new(WalletHandle::from_wallet(wallet), test_directory())
}

pub fn init_test_logger() {
    let _ = env_logger::builder()
        .is_test(true)
        .parse_filters("debug")
        .try_init();
}
