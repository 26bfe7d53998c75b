pub mod calendar;
pub mod codec;
pub mod config;
pub mod content;
pub mod door;
pub mod gesture;
pub mod layout;
pub mod layout_cache;
pub mod storage;
pub mod timeline;

pub use calendar::{DoorGate, Season};
pub use config::CalendarConfig;
pub use door::{DoorController, DoorIntent, DoorSinks, DoorSnapshot};
pub use gesture::{classify_gesture, DoorFace, Gesture, Point};
pub use layout::{CachedLayout, ViewportSize, Window};
pub use layout_cache::{LayoutCache, LayoutCacheError, LAYOUT_CACHE_KEY};
pub use storage::{MemoryStorage, StorageError, StoragePort};
