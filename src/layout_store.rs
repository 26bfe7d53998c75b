use advent_core::layout::{resolve_layout, LayoutSource};
use advent_core::{CachedLayout, CalendarConfig, LayoutCache, ViewportSize, Window};

use crate::local_storage::LocalStorage;

pub(crate) fn current_viewport() -> ViewportSize {
    let Some(window) = web_sys::window() else {
        return ViewportSize::new(0.0, 0.0);
    };
    let width = window
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0);
    ViewportSize::new(width, height)
}

/// Startup read of the layout cache; recomputes and writes back unless the
/// cached record fits this viewport.
pub(crate) fn load_windows(config: &CalendarConfig, viewport: ViewportSize) -> Vec<Window> {
    let cache = LayoutCache::new(LocalStorage);
    let (windows, source) = resolve_layout(
        cache.load(),
        viewport,
        config.door_count,
        config.layout_seed,
    );
    match source {
        LayoutSource::Cached => log("layout cache: hit"),
        LayoutSource::Recomputed => {
            log("layout cache: viewport changed, recomputed");
            save_windows(&windows, viewport);
        }
        LayoutSource::Fresh => {
            log("layout cache: miss");
            save_windows(&windows, viewport);
        }
    }
    windows
}

pub(crate) fn save_windows(windows: &[Window], viewport: ViewportSize) {
    let cache = LayoutCache::new(LocalStorage);
    let layout = CachedLayout::new(windows.to_vec(), viewport);
    if let Err(err) = cache.save(&layout) {
        #[cfg(target_arch = "wasm32")]
        {
            gloo::console::warn!("layout cache: save failed", err.to_string());
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = err;
        }
    }
}

fn log(message: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        gloo::console::log!(message);
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
    }
}

/// New layout for a resized viewport, or `None` when the current one still
/// fits. Open doors survive the relayout.
pub(crate) fn relayout(
    config: &CalendarConfig,
    windows: &[Window],
    previous: ViewportSize,
    current: ViewportSize,
) -> Option<Vec<Window>> {
    let cached = CachedLayout::new(windows.to_vec(), previous);
    let (next, source) = resolve_layout(
        Some(cached),
        current,
        config.door_count,
        config.layout_seed,
    );
    if source == LayoutSource::Cached {
        return None;
    }
    log("layout: viewport resized, recomputed");
    save_windows(&next, current);
    Some(next)
}
