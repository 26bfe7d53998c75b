use crate::codec::{decode, encode};
use crate::layout::CachedLayout;
use crate::storage::{StorageError, StoragePort};

pub const LAYOUT_CACHE_KEY: &str = "advent-calendar-windows";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutCacheError {
    #[error("layout could not be encoded")]
    Encode,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Whole-record cache of the computed layout. Reads never fail; anything
/// that does not decode into a valid layout is a miss.
pub struct LayoutCache<S> {
    storage: S,
    key: &'static str,
}

impl<S: StoragePort> LayoutCache<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, LAYOUT_CACHE_KEY)
    }

    pub fn with_key(storage: S, key: &'static str) -> Self {
        Self { storage, key }
    }

    pub fn load(&self) -> Option<CachedLayout> {
        let raw = self.storage.get(self.key)?;
        let layout = decode::<CachedLayout>(&raw)?;
        layout.is_valid().then_some(layout)
    }

    pub fn save(&self, layout: &CachedLayout) -> Result<(), LayoutCacheError> {
        let raw = encode(layout).ok_or(LayoutCacheError::Encode)?;
        self.storage.set(self.key, &raw)?;
        Ok(())
    }

    pub fn clear(&self) {
        self.storage.remove(self.key);
    }
}
