//! Date gating for doors.
//!
//! Door `n` unlocks at local midnight on day `n` of the season month.

use chrono::{Month, NaiveDate, NaiveDateTime};

pub const DEFAULT_MONTH: Month = Month::December;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Season {
    pub year: i32,
    pub month: Month,
    /// Unlocks every door regardless of date.
    pub preview: bool,
}

impl Season {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            month: DEFAULT_MONTH,
            preview: false,
        }
    }

    pub fn with_month(mut self, month: Month) -> Self {
        self.month = month;
        self
    }

    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    /// `None` when the month has no such day.
    pub fn unlock_date(&self, day: u32) -> Option<NaiveDateTime> {
        let month = self.month.number_from_month();
        NaiveDate::from_ymd_opt(self.year, month, day)?.and_hms_opt(0, 0, 0)
    }

    pub fn can_open_door(&self, day: u32, now: NaiveDateTime) -> bool {
        if self.preview {
            return true;
        }
        self.unlock_date(day).is_some_and(|unlock| now >= unlock)
    }

    pub fn opening_date_message(&self, day: u32) -> String {
        match self.unlock_date(day) {
            Some(_) => format!("Opens on {} {}", self.month.name(), day),
            None => "This door stays closed".to_string(),
        }
    }

    pub fn gate(&self, day: u32, now: NaiveDateTime) -> DoorGate {
        DoorGate {
            can_open: self.can_open_door(day, now),
            message: self.opening_date_message(day),
        }
    }
}

/// Gate result for one door at one instant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DoorGate {
    pub can_open: bool,
    pub message: String,
}

impl DoorGate {
    pub fn open() -> Self {
        Self {
            can_open: true,
            message: String::new(),
        }
    }

    pub fn locked(message: impl Into<String>) -> Self {
        Self {
            can_open: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, 0, 0))
            .unwrap()
    }

    #[test]
    fn door_unlocks_at_midnight_of_its_day() {
        let season = Season::new(2025);
        let unlock = season.unlock_date(5).unwrap();
        assert_eq!(unlock, at(2025, 12, 5, 0));
        assert!(!season.can_open_door(5, unlock - Duration::seconds(1)));
        assert!(season.can_open_door(5, unlock));
    }

    #[test]
    fn later_seasons_stay_locked() {
        let season = Season::new(2026);
        assert!(!season.can_open_door(1, at(2025, 12, 24, 12)));
    }

    #[test]
    fn invalid_day_never_opens() {
        let season = Season::new(2025).with_month(Month::November);
        assert_eq!(season.unlock_date(31), None);
        assert!(!season.can_open_door(31, at(2030, 1, 1, 0)));
        assert!(!season.can_open_door(0, at(2030, 1, 1, 0)));
        assert_eq!(season.opening_date_message(31), "This door stays closed");
    }

    #[test]
    fn preview_unlocks_everything() {
        let season = Season::new(2025).with_preview(true);
        assert!(season.can_open_door(24, at(2025, 1, 1, 0)));
    }

    #[test]
    fn message_names_month_and_day() {
        let season = Season::new(2025);
        assert_eq!(season.opening_date_message(5), "Opens on December 5");
        let gate = season.gate(5, at(2025, 12, 1, 9));
        assert!(!gate.can_open);
        assert_eq!(gate.message, "Opens on December 5");
    }

    proptest! {
        #[test]
        fn gate_never_relocks(day in 1u32..=24, first in 0i64..(40 * 24 * 60), step in 0i64..(40 * 24 * 60)) {
            let season = Season::new(2025);
            let earlier = at(2025, 11, 20, 0) + Duration::minutes(first);
            let later = earlier + Duration::minutes(step);
            if season.can_open_door(day, earlier) {
                prop_assert!(season.can_open_door(day, later));
            }
        }
    }
}
