pub const TAP_MAX_MOVE_PX: f64 = 10.0;
pub const TAP_MAX_DURATION_MS: f64 = 300.0;
/// Browsers emit a synthetic click shortly after `touchend`.
pub const GHOST_CLICK_WINDOW_MS: f64 = 500.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    Tap,
    Drag,
}

/// Part of a door a pointer landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoorFace {
    Front,
    Back,
    /// The picture behind an open door.
    Content,
}

/// Tap only when both displacement and duration stay under their limits;
/// anything doubtful is a drag.
pub fn classify_gesture(start: Point, end: Point, elapsed_ms: f64) -> Gesture {
    classify_touch(start, end, elapsed_ms, 0.0)
}

/// Like [`classify_gesture`], but also weighs the distance accumulated by
/// moves, so a finger that wanders off and comes back still counts as a drag.
pub fn classify_touch(start: Point, end: Point, elapsed_ms: f64, path_travel: f64) -> Gesture {
    let travel = start.distance(end).max(path_travel);
    if !travel.is_finite() || !elapsed_ms.is_finite() || elapsed_ms < 0.0 {
        return Gesture::Drag;
    }
    if travel < TAP_MAX_MOVE_PX && elapsed_ms < TAP_MAX_DURATION_MS {
        Gesture::Tap
    } else {
        Gesture::Drag
    }
}

#[derive(Clone, Copy, Debug)]
pub struct TouchTracker {
    start: Point,
    last: Point,
    start_ms: f64,
    travel: f64,
    face: DoorFace,
    active: bool,
}

impl Default for TouchTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl TouchTracker {
    pub fn new() -> Self {
        Self {
            start: Point::default(),
            last: Point::default(),
            start_ms: 0.0,
            travel: 0.0,
            face: DoorFace::Front,
            active: false,
        }
    }

    pub fn arm(&mut self, face: DoorFace, point: Point, now_ms: f64) {
        self.start = point;
        self.last = point;
        self.start_ms = now_ms;
        self.travel = 0.0;
        self.face = face;
        self.active = true;
    }

    pub fn update(&mut self, point: Point) {
        if !self.active {
            return;
        }
        self.travel += self.last.distance(point);
        self.last = point;
    }

    /// Ends the sequence. `end` falls back to the last move when the platform
    /// reports no final position.
    pub fn finish(&mut self, end: Option<Point>, now_ms: f64) -> Option<(Gesture, DoorFace)> {
        if !self.active {
            return None;
        }
        let end = end.unwrap_or(self.last);
        self.update(end);
        self.active = false;
        let gesture = classify_touch(self.start, end, now_ms - self.start_ms, self.travel);
        Some((gesture, self.face))
    }

    pub fn cancel(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn short_still_press_is_tap() {
        let origin = Point::new(10.0, 10.0);
        assert_eq!(
            classify_gesture(origin, Point::new(13.0, 14.0), 120.0),
            Gesture::Tap
        );
    }

    #[test]
    fn thresholds_are_exclusive() {
        let origin = Point::new(0.0, 0.0);
        let edge = Point::new(TAP_MAX_MOVE_PX, 0.0);
        assert_eq!(classify_gesture(origin, edge, 10.0), Gesture::Drag);
        assert_eq!(
            classify_gesture(origin, origin, TAP_MAX_DURATION_MS),
            Gesture::Drag
        );
    }

    #[test]
    fn non_finite_input_is_drag() {
        let origin = Point::new(0.0, 0.0);
        assert_eq!(
            classify_gesture(origin, Point::new(f64::NAN, 0.0), 10.0),
            Gesture::Drag
        );
        assert_eq!(classify_gesture(origin, origin, -5.0), Gesture::Drag);
    }

    #[test]
    fn tracker_counts_return_trip_as_drag() {
        let mut tracker = TouchTracker::new();
        tracker.arm(DoorFace::Front, Point::new(0.0, 0.0), 0.0);
        tracker.update(Point::new(8.0, 0.0));
        tracker.update(Point::new(0.0, 0.0));
        let result = tracker.finish(None, 100.0);
        assert_eq!(result, Some((Gesture::Drag, DoorFace::Front)));
        assert!(!tracker.is_active());
    }

    #[test]
    fn tracker_keeps_face_and_ignores_unarmed_end() {
        let mut tracker = TouchTracker::new();
        assert_eq!(tracker.finish(Some(Point::new(0.0, 0.0)), 10.0), None);
        tracker.arm(DoorFace::Back, Point::new(5.0, 5.0), 1000.0);
        let result = tracker.finish(Some(Point::new(6.0, 5.0)), 1100.0);
        assert_eq!(result, Some((Gesture::Tap, DoorFace::Back)));
    }

    #[test]
    fn cancelled_tracker_reports_nothing() {
        let mut tracker = TouchTracker::new();
        tracker.arm(DoorFace::Front, Point::new(0.0, 0.0), 0.0);
        tracker.cancel();
        assert_eq!(tracker.finish(None, 10.0), None);
    }

    proptest! {
        #[test]
        fn displacement_at_threshold_is_never_a_tap(
            angle in 0.0f64..std::f64::consts::TAU,
            extra in 0.0f64..500.0,
            elapsed in 0.0f64..1000.0,
        ) {
            let start = Point::new(100.0, 100.0);
            let distance = TAP_MAX_MOVE_PX + extra;
            let end = Point::new(start.x + distance * angle.cos(), start.y + distance * angle.sin());
            // Rounding can shave a hair off the exact threshold.
            let travel = start.distance(end).max(distance);
            prop_assert_eq!(classify_touch(start, end, elapsed, travel), Gesture::Drag);
        }

        #[test]
        fn long_presses_are_never_taps(
            dx in -5.0f64..5.0,
            dy in -5.0f64..5.0,
            elapsed in TAP_MAX_DURATION_MS..10_000.0,
        ) {
            let start = Point::new(0.0, 0.0);
            prop_assert_eq!(classify_gesture(start, Point::new(dx, dy), elapsed), Gesture::Drag);
        }

        #[test]
        fn small_quick_presses_are_taps(
            dx in -7.0f64..7.0,
            dy in -7.0f64..7.0,
            elapsed in 0.0f64..(TAP_MAX_DURATION_MS - 1.0),
        ) {
            let start = Point::new(50.0, 50.0);
            let end = Point::new(start.x + dx, start.y + dy);
            prop_assert_eq!(classify_gesture(start, end, elapsed), Gesture::Tap);
        }
    }
}
