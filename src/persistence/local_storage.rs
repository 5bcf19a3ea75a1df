use super::Store;
use crate::error::StoreError;

/// Browser LocalStorage
pub struct LocalStorageStore {
    storage: web_sys::Storage,
}

impl LocalStorageStore {
    pub fn new() -> Result<Self, StoreError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StoreError::Unavailable {
                reason: "LocalStorage is not accessible".to_string(),
            })?;
        Ok(Self { storage })
    }
}

impl Store for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage
            .get_item(key)
            .map_err(|e| StoreError::Unavailable {
                reason: format!("getItem({key}) failed: {e:?}"),
            })
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StoreError::Unavailable {
                reason: format!("setItem({key}) failed: {e:?}"),
            })
    }
}
