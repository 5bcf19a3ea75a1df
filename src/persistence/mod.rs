//! Key/value persistence collaborator
//!
//! High scores and settings are stored as JSON strings under fixed keys.
//! - `MemoryStore`: tests and ephemeral sessions
//! - `FileStore`: one JSON file per key (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm)

mod memory;
pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(target_arch = "wasm32")]
mod local_storage;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StoreError;

/// A string key/value store
pub trait Store {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Read and decode a JSON value; `Ok(None)` when the key was never written
pub fn load_json<T: DeserializeOwned>(store: &dyn Store, key: &str) -> Result<Option<T>, StoreError> {
    match store.get(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

pub fn save_json<T: Serialize>(store: &mut dyn Store, key: &str, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_helpers() {
        let mut store = MemoryStore::new();
        assert_eq!(load_json::<Vec<u32>>(&store, "k").ok().flatten(), None);

        save_json(&mut store, "k", &vec![1u32, 2, 3]).unwrap();
        assert_eq!(load_json::<Vec<u32>>(&store, "k").unwrap(), Some(vec![1, 2, 3]));

        store.set("bad", "{not json").unwrap();
        assert!(matches!(
            load_json::<Vec<u32>>(&store, "bad"),
            Err(StoreError::Serialization(_))
        ));
    }
}
