use erc20_airdrop_common::error::AirdropError;
use erc20_airdrop_lib::draft::{KeyValueStore, MemoryStore};
use std::sync::{Arc, Mutex};

/// Memory store that outlives the form owning it, used to simulate page reloads
#[derive(Clone, Default)]
pub struct SharedStore {
    inner: Arc<Mutex<MemoryStore>>,
}

impl SharedStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Result<Option<String>, AirdropError> {
        self.inner.lock().unwrap().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), AirdropError> {
        self.inner.lock().unwrap().set(key, value)
    }
}
