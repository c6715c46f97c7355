use crate::error::*;
use crate::input::{normalize_input, AirdropRequest};
use crate::{err_custom_create, err_from};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const TOKEN_ADDRESS_KEY: &str = "tokenAddress";
pub const RECIPIENTS_KEY: &str = "recipients";
pub const AMOUNTS_KEY: &str = "amounts";

/// Client local key-value persistence. Single writer, single reader.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, AirdropError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), AirdropError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AirdropError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), AirdropError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Keeps all values in one JSON object on disk, rewritten on every `set`
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AirdropError> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(err_from!())?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).map_err(|err| {
                    err_custom_create!("Draft file {} is not valid: {}", path.display(), err)
                })?
            }
        } else {
            log::debug!("Draft file {} not found, starting empty", path.display());
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, AirdropError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), AirdropError> {
        if self.values.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }
        self.values.insert(key.to_string(), value.to_string());
        let content = serde_json::to_string_pretty(&self.values).map_err(err_from!())?;
        std::fs::write(&self.path, content).map_err(err_from!())?;
        Ok(())
    }
}

/// Raw text of the three form fields, stored without any validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedDraft {
    pub token_address: String,
    pub recipients_text: String,
    pub amounts_text: String,
}

impl PersistedDraft {
    /// Missing and empty values both leave the field empty
    pub fn load(store: &dyn KeyValueStore) -> Result<Self, AirdropError> {
        Ok(Self {
            token_address: store.get(TOKEN_ADDRESS_KEY)?.unwrap_or_default(),
            recipients_text: store.get(RECIPIENTS_KEY)?.unwrap_or_default(),
            amounts_text: store.get(AMOUNTS_KEY)?.unwrap_or_default(),
        })
    }

    /// Normalized request for the current field text. Runs without any network access.
    pub fn to_request(&self) -> Result<AirdropRequest, AirdropError> {
        normalize_input(
            &self.token_address,
            &self.recipients_text,
            &self.amounts_text,
        )
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), AirdropError> {
        store.set(TOKEN_ADDRESS_KEY, &self.token_address)?;
        store.set(RECIPIENTS_KEY, &self.recipients_text)?;
        store.set(AMOUNTS_KEY, &self.amounts_text)?;
        Ok(())
    }
}
