use serde::{Deserialize, Serialize};

pub const DEFAULT_DOOR_COUNT: u32 = 24;
pub const MAX_DOOR_COUNT: u32 = 31;
pub const VIEWPORT_TOLERANCE_PX: f64 = 1.0;
pub const LAYOUT_PADDING_RATIO: f64 = 0.04;
pub const LAYOUT_GAP_RATIO: f64 = 0.12;
pub const LAYOUT_TARGET_CELL_ASPECT: f64 = 0.8;
pub const LAYOUT_SCORE_ASPECT: f64 = 1.0;
pub const LAYOUT_SCORE_EMPTY: f64 = 0.6;
pub const FOCUS_FILL_RATIO: f64 = 0.8;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// One door rectangle in viewport pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Window {
    pub day: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub is_open: bool,
}

impl Window {
    pub fn is_valid(&self) -> bool {
        self.day >= 1
            && self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width >= 0.0
            && self.height >= 0.0
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }
}

/// Whole-record layout persisted between reloads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedLayout {
    pub windows: Vec<Window>,
    pub viewport_size: ViewportSize,
}

impl CachedLayout {
    pub fn new(windows: Vec<Window>, viewport_size: ViewportSize) -> Self {
        Self {
            windows,
            viewport_size,
        }
    }

    /// Rejects records no layout pass could have produced: bad numbers or a
    /// day listed twice.
    pub fn is_valid(&self) -> bool {
        if !self.viewport_size.width.is_finite() || !self.viewport_size.height.is_finite() {
            return false;
        }
        let mut seen = Vec::with_capacity(self.windows.len());
        for window in &self.windows {
            if !window.is_valid() || seen.contains(&window.day) {
                return false;
            }
            seen.push(window.day);
        }
        true
    }

    /// True when the record holds exactly one door for each of `1..=count`.
    pub fn covers_days(&self, count: u32) -> bool {
        let mut days: Vec<u32> = self.windows.iter().map(|window| window.day).collect();
        days.sort_unstable();
        days.into_iter().eq(1..=count)
    }
}

/// Caller-side staleness policy; the cache itself never checks this.
pub fn viewport_matches(cached: ViewportSize, current: ViewportSize, tolerance: f64) -> bool {
    let tolerance = tolerance.max(0.0);
    (cached.width - current.width).abs() <= tolerance
        && (cached.height - current.height).abs() <= tolerance
}

pub fn splitmix32(mut value: u32) -> u32 {
    value = value.wrapping_add(0x9E37_79B9);
    let mut z = value;
    z = (z ^ (z >> 16)).wrapping_mul(0x85EB_CA6B);
    z = (z ^ (z >> 13)).wrapping_mul(0xC2B2_AE35);
    z ^ (z >> 16)
}

/// Days `1..=count` in a seed-stable order.
pub fn shuffled_days(count: u32, seed: u32) -> Vec<u32> {
    let mut days: Vec<u32> = (1..=count).collect();
    for i in (1..days.len()).rev() {
        let mixed = splitmix32(seed ^ (i as u32).wrapping_mul(0x2545_F491));
        let j = (mixed as usize) % (i + 1);
        days.swap(i, j);
    }
    days
}

/// Column count whose cells come closest to the target door shape without
/// leaving many empty slots.
pub fn best_columns(viewport: ViewportSize, count: u32) -> u32 {
    if count == 0 || !viewport.is_usable() {
        return 1;
    }
    let padding = viewport.width.min(viewport.height) * LAYOUT_PADDING_RATIO;
    let usable_w = (viewport.width - padding * 2.0).max(1.0);
    let usable_h = (viewport.height - padding * 2.0).max(1.0);
    let mut best: Option<(u32, f64)> = None;
    for cols in 1..=count {
        let rows = count.div_ceil(cols);
        let cell_aspect = (usable_w / cols as f64) / (usable_h / rows as f64);
        let aspect_term = (cell_aspect / LAYOUT_TARGET_CELL_ASPECT).ln().powi(2);
        let empty = (rows * cols - count) as f64 / count as f64;
        let score = LAYOUT_SCORE_ASPECT * aspect_term + LAYOUT_SCORE_EMPTY * empty;
        match best {
            Some((_, best_score)) if score >= best_score => {}
            _ => best = Some((cols, score)),
        }
    }
    best.map(|(cols, _)| cols).unwrap_or(1)
}

/// Lays `count` closed doors on a grid filling the viewport.
pub fn compute_layout(viewport: ViewportSize, count: u32, seed: u32) -> Vec<Window> {
    if count == 0 || !viewport.is_usable() {
        return Vec::new();
    }
    let cols = best_columns(viewport, count);
    let rows = count.div_ceil(cols);
    let padding = viewport.width.min(viewport.height) * LAYOUT_PADDING_RATIO;
    let cell_w = (viewport.width - padding * 2.0).max(1.0) / cols as f64;
    let cell_h = (viewport.height - padding * 2.0).max(1.0) / rows as f64;
    let gap = cell_w.min(cell_h) * LAYOUT_GAP_RATIO;
    shuffled_days(count, seed)
        .into_iter()
        .enumerate()
        .map(|(slot, day)| {
            let col = slot as u32 % cols;
            let row = slot as u32 / cols;
            Window {
                day,
                x: padding + col as f64 * cell_w + gap * 0.5,
                y: padding + row as f64 * cell_h + gap * 0.5,
                width: cell_w - gap,
                height: cell_h - gap,
                is_open: false,
            }
        })
        .collect()
}

pub fn window_for_day(windows: &[Window], day: u32) -> Option<&Window> {
    windows.iter().find(|window| window.day == day)
}

/// Returns whether the door's state actually changed.
pub fn set_open(windows: &mut [Window], day: u32, open: bool) -> bool {
    match windows.iter_mut().find(|window| window.day == day) {
        Some(window) if window.is_open != open => {
            window.is_open = open;
            true
        }
        _ => false,
    }
}

/// Carries open doors over from an older layout of the same calendar.
pub fn restore_open_state(windows: &mut [Window], previous: &[Window]) {
    for window in windows.iter_mut() {
        if let Some(old) = window_for_day(previous, window.day) {
            window.is_open = old.is_open;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutSource {
    Cached,
    /// The cache was for another viewport; open doors were carried over.
    Recomputed,
    Fresh,
}

/// Reuses a cached layout only when it was computed for this viewport and
/// holds exactly the doors `1..=count`.
pub fn resolve_layout(
    cached: Option<CachedLayout>,
    viewport: ViewportSize,
    count: u32,
    seed: u32,
) -> (Vec<Window>, LayoutSource) {
    let Some(cached) = cached else {
        return (compute_layout(viewport, count, seed), LayoutSource::Fresh);
    };
    if cached.covers_days(count)
        && viewport_matches(cached.viewport_size, viewport, VIEWPORT_TOLERANCE_PX)
    {
        return (cached.windows, LayoutSource::Cached);
    }
    let mut windows = compute_layout(viewport, count, seed);
    restore_open_state(&mut windows, &cached.windows);
    (windows, LayoutSource::Recomputed)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocusTransform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl FocusTransform {
    pub const IDENTITY: FocusTransform = FocusTransform {
        scale: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    pub fn to_css(&self) -> String {
        format!(
            "translate({:.2}px, {:.2}px) scale({:.4})",
            self.translate_x, self.translate_y, self.scale
        )
    }
}

/// Transform (translate then scale, origin top-left) that zooms the board
/// onto one door.
pub fn focus_transform(window: &Window, viewport: ViewportSize) -> FocusTransform {
    if !viewport.is_usable() || window.width <= 0.0 || window.height <= 0.0 {
        return FocusTransform::IDENTITY;
    }
    let scale = (viewport.width / window.width)
        .min(viewport.height / window.height)
        * FOCUS_FILL_RATIO;
    let (cx, cy) = window.center();
    FocusTransform {
        scale,
        translate_x: viewport.width * 0.5 - cx * scale,
        translate_y: viewport.height * 0.5 - cy * scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shuffled_days_is_a_stable_permutation() {
        let days = shuffled_days(24, 7);
        let mut sorted = days.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (1..=24).collect::<Vec<_>>());
        assert_eq!(days, shuffled_days(24, 7));
        assert_ne!(days, shuffled_days(24, 8));
    }

    #[test]
    fn portrait_viewport_gets_fewer_columns() {
        let landscape = best_columns(ViewportSize::new(1600.0, 900.0), 24);
        let portrait = best_columns(ViewportSize::new(400.0, 900.0), 24);
        assert!(portrait < landscape, "{portrait} vs {landscape}");
    }

    #[test]
    fn layout_stays_inside_viewport() {
        let viewport = ViewportSize::new(1280.0, 720.0);
        let windows = compute_layout(viewport, 24, 1);
        assert_eq!(windows.len(), 24);
        for window in &windows {
            assert!(window.is_valid());
            assert!(!window.is_open);
            assert!(window.x >= 0.0 && window.x + window.width <= viewport.width);
            assert!(window.y >= 0.0 && window.y + window.height <= viewport.height);
        }
    }

    #[test]
    fn unusable_viewport_yields_no_windows() {
        assert!(compute_layout(ViewportSize::new(0.0, 720.0), 24, 1).is_empty());
        assert!(compute_layout(ViewportSize::new(f64::NAN, 720.0), 24, 1).is_empty());
    }

    #[test]
    fn set_open_reports_changes_only() {
        let mut windows = compute_layout(ViewportSize::new(800.0, 600.0), 4, 0);
        assert!(set_open(&mut windows, 3, true));
        assert!(!set_open(&mut windows, 3, true));
        assert!(!set_open(&mut windows, 9, true));
        assert!(window_for_day(&windows, 3).is_some_and(|window| window.is_open));
    }

    #[test]
    fn restore_keeps_open_doors() {
        let viewport = ViewportSize::new(800.0, 600.0);
        let mut old = compute_layout(viewport, 4, 0);
        set_open(&mut old, 2, true);
        let mut fresh = compute_layout(ViewportSize::new(600.0, 800.0), 4, 0);
        restore_open_state(&mut fresh, &old);
        assert!(window_for_day(&fresh, 2).is_some_and(|window| window.is_open));
        assert!(window_for_day(&fresh, 1).is_some_and(|window| !window.is_open));
    }

    #[test]
    fn duplicate_days_invalidate_layout() {
        let viewport = ViewportSize::new(800.0, 600.0);
        let mut windows = compute_layout(viewport, 2, 0);
        windows[1].day = windows[0].day;
        assert!(!CachedLayout::new(windows, viewport).is_valid());
    }

    #[test]
    fn viewport_tolerance_is_inclusive() {
        let cached = ViewportSize::new(800.0, 600.0);
        assert!(viewport_matches(cached, ViewportSize::new(801.0, 599.0), 1.0));
        assert!(!viewport_matches(cached, ViewportSize::new(802.0, 600.0), 1.0));
    }

    #[test]
    fn resolve_prefers_matching_cache() {
        let viewport = ViewportSize::new(800.0, 600.0);
        let mut windows = compute_layout(viewport, 24, 9);
        set_open(&mut windows, 4, true);
        let cached = CachedLayout::new(windows.clone(), viewport);

        let (hit, source) = resolve_layout(Some(cached.clone()), viewport, 24, 9);
        assert_eq!(source, LayoutSource::Cached);
        assert_eq!(hit, windows);

        let rotated = ViewportSize::new(600.0, 800.0);
        let (fresh, source) = resolve_layout(Some(cached.clone()), rotated, 24, 9);
        assert_eq!(source, LayoutSource::Recomputed);
        assert!(window_for_day(&fresh, 4).is_some_and(|window| window.is_open));
        assert!(fresh.iter().all(|window| window.x + window.width <= rotated.width));

        let (_, source) = resolve_layout(Some(cached), viewport, 12, 9);
        assert_eq!(source, LayoutSource::Recomputed);
        let (_, source) = resolve_layout(None, viewport, 24, 9);
        assert_eq!(source, LayoutSource::Fresh);
    }

    #[test]
    fn cache_with_foreign_day_is_recomputed() {
        let viewport = ViewportSize::new(800.0, 600.0);
        let mut windows = compute_layout(viewport, 24, 9);
        set_open(&mut windows, 3, true);
        if let Some(window) = windows.iter_mut().find(|window| window.day == 24) {
            window.day = 99;
        }
        let cached = CachedLayout::new(windows, viewport);
        assert!(cached.is_valid());
        assert!(!cached.covers_days(24));

        let (resolved, source) = resolve_layout(Some(cached), viewport, 24, 9);
        assert_eq!(source, LayoutSource::Recomputed);
        assert!(window_for_day(&resolved, 24).is_some());
        assert!(window_for_day(&resolved, 99).is_none());
        assert!(window_for_day(&resolved, 3).is_some_and(|window| window.is_open));
    }

    #[test]
    fn focus_centers_the_door() {
        let viewport = ViewportSize::new(1000.0, 800.0);
        let window = Window {
            day: 5,
            x: 100.0,
            y: 100.0,
            width: 100.0,
            height: 200.0,
            is_open: false,
        };
        let transform = focus_transform(&window, viewport);
        assert!((transform.scale - 3.2).abs() < 1e-9);
        let (cx, cy) = window.center();
        assert!((cx * transform.scale + transform.translate_x - 500.0).abs() < 1e-9);
        assert!((cy * transform.scale + transform.translate_y - 400.0).abs() < 1e-9);
    }
}
