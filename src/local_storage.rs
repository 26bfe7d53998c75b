use advent_core::{StorageError, StoragePort};

/// `window.localStorage`, looked up on every call so a storage that appears
/// late (privacy modes) is still picked up.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct LocalStorage;

#[cfg(target_arch = "wasm32")]
fn storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|window| window.local_storage().ok().flatten())
}

impl StoragePort for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        #[cfg(target_arch = "wasm32")]
        {
            let Some(storage) = storage() else {
                gloo::console::log!("local storage: unavailable", key);
                return None;
            };
            storage.get_item(key).ok().flatten()
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            None
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        #[cfg(target_arch = "wasm32")]
        {
            let storage = storage().ok_or(StorageError::Unavailable)?;
            storage.set_item(key, value).map_err(|err| {
                StorageError::Rejected(err.as_string().unwrap_or_else(|| format!("{err:?}")))
            })
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (key, value);
            Err(StorageError::Unavailable)
        }
    }

    fn remove(&self, key: &str) {
        #[cfg(target_arch = "wasm32")]
        {
            if let Some(storage) = storage() {
                let _ = storage.remove_item(key);
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
        }
    }
}
