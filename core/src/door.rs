//! Per-door interaction state.
//!
//! [`DoorController`] turns pointer input and the door's open/active inputs
//! into display flags and outbound [`DoorIntent`]s. All delays go through a
//! [`Timeline`], so the host drives time explicitly.

use crate::calendar::DoorGate;
use crate::content::{full_image_url, thumbnail_url};
use crate::gesture::{DoorFace, Gesture, Point, TouchTracker, GHOST_CLICK_WINDOW_MS};
use crate::timeline::Timeline;

pub const SHAKE_DURATION_MS: f64 = 500.0;
pub const MESSAGE_VISIBLE_MS: f64 = 2000.0;
pub const MESSAGE_FADE_MS: f64 = 300.0;
pub const DOOR_OPEN_ANIMATION_MS: f64 = 700.0;
pub const CLICK_HINT_DELAY_MS: f64 = 500.0;
/// How often a locked door re-checks the date while nothing else is pending.
pub const GATE_RECHECK_MS: f64 = 60_000.0;
pub const FIRST_DAY: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoorIntent {
    OpenRequest(u32),
    CloseRequest(u32),
    /// Zoom in on an already open door.
    Focus(u32),
    /// The opening animation finished while the door is focused.
    Opened(u32),
}

impl DoorIntent {
    pub fn notify(&self, sinks: &dyn DoorSinks) {
        match *self {
            DoorIntent::OpenRequest(day) | DoorIntent::Focus(day) => sinks.notify_open_intent(day),
            DoorIntent::CloseRequest(day) => sinks.notify_close_intent(day),
            DoorIntent::Opened(day) => sinks.notify_opened(day),
        }
    }
}

/// Collaborators that only listen: modal presentation and analytics.
pub trait DoorSinks {
    fn notify_opened(&self, day: u32);
    fn notify_open_intent(&self, day: u32);
    fn notify_close_intent(&self, day: u32);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Transition {
    StopShake,
    FadeMessage,
    HideMessage,
    RevealContent,
    AnnounceOpened,
    ShowClickHint,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DoorSnapshot {
    pub day: u32,
    pub is_open: bool,
    pub is_active: bool,
    pub can_open_door: bool,
    pub is_shaking: bool,
    pub is_fading_out: bool,
    pub show_message: bool,
    pub show_content: bool,
    pub show_click_hint: bool,
    pub show_start_label: bool,
    pub opening_date_message: String,
}

impl DoorSnapshot {
    pub fn door_class(&self) -> String {
        let mut class = String::from("door");
        if self.is_open {
            class.push_str(" open");
        }
        if !self.can_open_door {
            class.push_str(" locked");
        }
        if self.is_shaking {
            class.push_str(" shake");
        }
        class
    }

    pub fn message_class(&self) -> &'static str {
        if self.is_fading_out {
            "date-message fade-out"
        } else {
            "date-message"
        }
    }

    pub fn thumbnail_url(&self) -> String {
        thumbnail_url(self.day)
    }

    pub fn full_image_url(&self) -> String {
        full_image_url(self.day)
    }

    /// The full image replaces the thumbnail while the door is zoomed in.
    pub fn prefers_full_image(&self) -> bool {
        self.is_active
    }
}

#[derive(Clone, Debug)]
pub struct DoorController {
    day: u32,
    is_open: bool,
    active_day: Option<u32>,
    gate: DoorGate,
    is_shaking: bool,
    show_message: bool,
    is_fading_out: bool,
    show_content: bool,
    show_click_hint: bool,
    touch: TouchTracker,
    suppress_click_until: Option<f64>,
    timeline: Timeline<Transition>,
}

impl DoorController {
    /// A door that is already open at creation shows its content at once;
    /// there is no swing to wait for.
    pub fn new(
        day: u32,
        is_open: bool,
        active_day: Option<u32>,
        gate: DoorGate,
        now_ms: f64,
    ) -> Self {
        let mut controller = Self {
            day,
            is_open,
            active_day,
            gate,
            is_shaking: false,
            show_message: false,
            is_fading_out: false,
            show_content: is_open,
            show_click_hint: false,
            touch: TouchTracker::new(),
            suppress_click_until: None,
            timeline: Timeline::new(),
        };
        controller.sync_announcement(now_ms);
        controller.sync_click_hint(now_ms);
        controller
    }

    pub fn can_open_door(&self) -> bool {
        self.gate.can_open
    }

    pub fn is_shaking(&self) -> bool {
        self.is_shaking
    }

    pub fn show_message(&self) -> bool {
        self.show_message
    }

    pub fn is_fading_out(&self) -> bool {
        self.is_fading_out
    }

    pub fn show_content(&self) -> bool {
        self.show_content
    }

    pub fn show_click_hint(&self) -> bool {
        self.show_click_hint
    }

    pub fn is_torn_down(&self) -> bool {
        self.timeline.is_closed()
    }

    /// Re-evaluates date gating; hosts call this before handling input.
    pub fn set_gate(&mut self, gate: DoorGate) {
        self.gate = gate;
    }

    /// Applies new inputs from the parent.
    pub fn sync(&mut self, is_open: bool, active_day: Option<u32>, now_ms: f64) {
        if self.is_torn_down() {
            return;
        }
        let open_changed = is_open != self.is_open;
        let active_changed = active_day != self.active_day;
        self.is_open = is_open;
        self.active_day = active_day;
        if open_changed {
            self.show_content = false;
            if is_open {
                self.stop_locked_feedback();
                self.timeline
                    .schedule(now_ms, DOOR_OPEN_ANIMATION_MS, Transition::RevealContent);
            } else {
                self.timeline.cancel_kind(Transition::RevealContent);
            }
        }
        if open_changed || active_changed {
            self.sync_announcement(now_ms);
            self.sync_click_hint(now_ms);
        }
    }

    pub fn touch_start(&mut self, face: DoorFace, point: Point, now_ms: f64) {
        if self.is_torn_down() {
            return;
        }
        self.dismiss_message();
        self.touch.arm(face, point, now_ms);
    }

    pub fn touch_move(&mut self, point: Point) {
        self.touch.update(point);
    }

    pub fn touch_end(&mut self, point: Option<Point>, now_ms: f64) -> Vec<DoorIntent> {
        let Some((gesture, face)) = self.touch.finish(point, now_ms) else {
            return Vec::new();
        };
        self.suppress_click_until = Some(now_ms + GHOST_CLICK_WINDOW_MS);
        match gesture {
            Gesture::Tap => self.tap(face, now_ms),
            Gesture::Drag => Vec::new(),
        }
    }

    pub fn touch_cancel(&mut self) {
        self.touch.cancel();
    }

    /// Mouse click, always a tap unless it is the echo of a finished touch.
    pub fn click(&mut self, face: DoorFace, now_ms: f64) -> Vec<DoorIntent> {
        if let Some(until) = self.suppress_click_until.take() {
            if now_ms <= until {
                return Vec::new();
            }
        }
        self.tap(face, now_ms)
    }

    fn tap(&mut self, face: DoorFace, now_ms: f64) -> Vec<DoorIntent> {
        if self.is_torn_down() {
            return Vec::new();
        }
        self.dismiss_message();
        match (face, self.is_open) {
            (DoorFace::Front, false) => {
                if self.gate.can_open {
                    self.show_click_hint = false;
                    self.timeline.cancel_kind(Transition::ShowClickHint);
                    vec![DoorIntent::OpenRequest(self.day)]
                } else {
                    self.start_shake(now_ms);
                    Vec::new()
                }
            }
            (DoorFace::Back, true) => vec![DoorIntent::CloseRequest(self.day)],
            (DoorFace::Content, true) if self.active_day.is_none() => {
                vec![DoorIntent::Focus(self.day)]
            }
            _ => Vec::new(),
        }
    }

    /// Fires every transition due by `now_ms`. Chained delays are measured
    /// from the due time of their predecessor, not from `now_ms`.
    pub fn advance(&mut self, now_ms: f64) -> Vec<DoorIntent> {
        let mut intents = Vec::new();
        loop {
            let due = self.timeline.drain_due(now_ms);
            if due.is_empty() {
                break;
            }
            for entry in due {
                self.apply(entry.kind, entry.due_ms, &mut intents);
            }
        }
        intents
    }

    pub fn next_deadline(&self) -> Option<f64> {
        self.timeline.next_deadline()
    }

    /// When the host should wake this door next: the next transition, or a
    /// coarse gate re-check while the door is still locked.
    pub fn next_wakeup(&self, now_ms: f64) -> Option<f64> {
        if self.is_torn_down() {
            return None;
        }
        let recheck = (!self.gate.can_open).then_some(now_ms + GATE_RECHECK_MS);
        match (self.next_deadline(), recheck) {
            (Some(due), Some(recheck)) => Some(due.min(recheck)),
            (due, recheck) => due.or(recheck),
        }
    }

    /// Cancels every pending transition; the controller ignores input after.
    pub fn teardown(&mut self) {
        self.timeline.close();
        self.touch.cancel();
        self.suppress_click_until = None;
    }

    pub fn snapshot(&self) -> DoorSnapshot {
        DoorSnapshot {
            day: self.day,
            is_open: self.is_open,
            is_active: self.is_focused(),
            can_open_door: self.gate.can_open,
            is_shaking: self.is_shaking,
            is_fading_out: self.is_fading_out,
            show_message: self.show_message && !self.gate.can_open,
            show_content: self.show_content,
            show_click_hint: self.show_click_hint,
            show_start_label: self.day == FIRST_DAY && !self.is_open && self.active_day.is_none(),
            opening_date_message: self.gate.message.clone(),
        }
    }

    fn apply(&mut self, transition: Transition, due_ms: f64, intents: &mut Vec<DoorIntent>) {
        match transition {
            Transition::StopShake => {
                self.is_shaking = false;
                self.show_message = true;
                self.is_fading_out = false;
                self.timeline
                    .schedule(due_ms, MESSAGE_VISIBLE_MS, Transition::FadeMessage);
            }
            Transition::FadeMessage => {
                self.is_fading_out = true;
                self.timeline
                    .schedule(due_ms, MESSAGE_FADE_MS, Transition::HideMessage);
            }
            Transition::HideMessage => {
                self.show_message = false;
                self.is_fading_out = false;
            }
            Transition::RevealContent => {
                if self.is_open {
                    self.show_content = true;
                }
            }
            Transition::AnnounceOpened => {
                if self.is_open && self.is_focused() {
                    intents.push(DoorIntent::Opened(self.day));
                }
            }
            Transition::ShowClickHint => {
                if self.wants_click_hint() {
                    self.show_click_hint = true;
                }
            }
        }
    }

    fn is_focused(&self) -> bool {
        self.active_day == Some(self.day)
    }

    fn wants_click_hint(&self) -> bool {
        self.day == FIRST_DAY && self.is_focused() && !self.is_open
    }

    fn sync_announcement(&mut self, now_ms: f64) {
        if self.is_open && self.is_focused() {
            self.timeline
                .schedule(now_ms, DOOR_OPEN_ANIMATION_MS, Transition::AnnounceOpened);
        } else {
            self.timeline.cancel_kind(Transition::AnnounceOpened);
        }
    }

    fn sync_click_hint(&mut self, now_ms: f64) {
        if self.wants_click_hint() {
            if !self.show_click_hint && !self.timeline.is_pending(Transition::ShowClickHint) {
                self.timeline
                    .schedule(now_ms, CLICK_HINT_DELAY_MS, Transition::ShowClickHint);
            }
        } else {
            self.show_click_hint = false;
            self.timeline.cancel_kind(Transition::ShowClickHint);
        }
    }

    fn start_shake(&mut self, now_ms: f64) {
        self.is_shaking = true;
        self.timeline
            .schedule(now_ms, SHAKE_DURATION_MS, Transition::StopShake);
    }

    fn dismiss_message(&mut self) {
        self.show_message = false;
        self.is_fading_out = false;
        self.timeline.cancel_kind(Transition::FadeMessage);
        self.timeline.cancel_kind(Transition::HideMessage);
    }

    fn stop_locked_feedback(&mut self) {
        self.is_shaking = false;
        self.timeline.cancel_kind(Transition::StopShake);
        self.dismiss_message();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locked() -> DoorGate {
        DoorGate::locked("Opens on December 9")
    }

    #[test]
    fn snapshot_classes_follow_state() {
        let controller = DoorController::new(9, false, None, locked(), 0.0);
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.door_class(), "door locked");
        assert_eq!(snapshot.message_class(), "date-message");
        assert_eq!(snapshot.thumbnail_url(), "/content/day9-thumb.jpeg");
        assert_eq!(snapshot.full_image_url(), "/content/day9.jpg");
        assert!(!snapshot.show_start_label);
    }

    #[test]
    fn start_label_only_on_first_closed_door_when_zoomed_out() {
        let first = DoorController::new(FIRST_DAY, false, None, DoorGate::open(), 0.0);
        assert!(first.snapshot().show_start_label);
        let focused = DoorController::new(FIRST_DAY, false, Some(FIRST_DAY), DoorGate::open(), 0.0);
        assert!(!focused.snapshot().show_start_label);
        let opened = DoorController::new(FIRST_DAY, true, None, DoorGate::open(), 0.0);
        assert!(!opened.snapshot().show_start_label);
    }

    #[test]
    fn door_created_open_shows_content_immediately() {
        let controller = DoorController::new(4, true, None, DoorGate::open(), 0.0);
        assert!(controller.show_content());
        assert_eq!(controller.next_deadline(), None);
    }

    #[test]
    fn locked_door_wakes_for_gate_recheck() {
        let mut controller = DoorController::new(9, false, None, locked(), 0.0);
        assert_eq!(controller.next_deadline(), None);
        assert_eq!(controller.next_wakeup(1000.0), Some(1000.0 + GATE_RECHECK_MS));

        controller.click(DoorFace::Front, 1000.0);
        assert_eq!(
            controller.next_wakeup(1000.0),
            Some(1000.0 + SHAKE_DURATION_MS)
        );

        controller.set_gate(DoorGate::open());
        controller.advance(100_000.0);
        assert_eq!(controller.next_wakeup(100_000.0), None);
        assert_eq!(controller.snapshot().door_class(), "door");

        controller.set_gate(locked());
        controller.teardown();
        assert_eq!(controller.next_wakeup(200_000.0), None);
    }

    #[test]
    fn back_face_of_closed_door_is_inert() {
        let mut controller = DoorController::new(4, false, None, DoorGate::open(), 0.0);
        assert!(controller.click(DoorFace::Back, 0.0).is_empty());
        assert!(controller.click(DoorFace::Content, 0.0).is_empty());
    }
}
