use chrono::{Month, NaiveDate, NaiveDateTime};

use crate::calendar::{Season, DEFAULT_MONTH};
use crate::layout::{DEFAULT_DOOR_COUNT, MAX_DOOR_COUNT};

pub const DEFAULT_LAYOUT_SEED: u32 = 0x00AD_7E27;

#[derive(Clone, Debug, PartialEq)]
pub struct CalendarConfig {
    pub season_year: i32,
    pub month: Month,
    pub door_count: u32,
    pub layout_seed: u32,
    pub preview: bool,
    /// Pretend the wall clock reads this instead.
    pub now_override: Option<NaiveDateTime>,
}

impl CalendarConfig {
    pub fn new(season_year: i32) -> Self {
        Self {
            season_year,
            month: DEFAULT_MONTH,
            door_count: DEFAULT_DOOR_COUNT,
            layout_seed: DEFAULT_LAYOUT_SEED,
            preview: false,
            now_override: None,
        }
    }

    pub fn season(&self) -> Season {
        Season::new(self.season_year)
            .with_month(self.month)
            .with_preview(self.preview)
    }

    pub fn now_or(&self, wall_clock: NaiveDateTime) -> NaiveDateTime {
        self.now_override.unwrap_or(wall_clock)
    }

    /// Build-time defaults; unset or unparsable values keep the current one.
    pub fn with_build_env(mut self, year: Option<&str>, seed: Option<&str>) -> Self {
        if let Some(year) = year.and_then(parse_year) {
            self.season_year = year;
        }
        if let Some(seed) = seed.and_then(parse_seed) {
            self.layout_seed = seed;
        }
        self
    }

    /// URL query overrides. Unknown keys and invalid values are ignored.
    pub fn with_query<'a, I>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, value) in pairs {
            match key {
                "year" => {
                    if let Some(year) = parse_year(value) {
                        self.season_year = year;
                    }
                }
                "month" => {
                    if let Some(month) = parse_month(value) {
                        self.month = month;
                    }
                }
                "doors" => {
                    if let Some(count) = parse_door_count(value) {
                        self.door_count = count;
                    }
                }
                "seed" => {
                    if let Some(seed) = parse_seed(value) {
                        self.layout_seed = seed;
                    }
                }
                "preview" => {
                    if let Some(flag) = parse_flag(value) {
                        self.preview = flag;
                    }
                }
                "now" => {
                    if let Some(now) = parse_now(value) {
                        self.now_override = Some(now);
                    }
                }
                _ => {}
            }
        }
        self
    }
}

fn parse_year(value: &str) -> Option<i32> {
    let year = value.trim().parse::<i32>().ok()?;
    (1970..=9999).contains(&year).then_some(year)
}

fn parse_month(value: &str) -> Option<Month> {
    let number = value.trim().parse::<u8>().ok()?;
    Month::try_from(number).ok()
}

fn parse_door_count(value: &str) -> Option<u32> {
    let count = value.trim().parse::<u32>().ok()?;
    (1..=MAX_DOOR_COUNT).contains(&count).then_some(count)
}

fn parse_seed(value: &str) -> Option<u32> {
    let value = value.trim();
    match value.strip_prefix("0x") {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => value.parse::<u32>().ok(),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_now(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(now) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(now);
    }
    if let Ok(now) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M") {
        return Some(now);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_env_applies_valid_values_only() {
        let config = CalendarConfig::new(2025).with_build_env(Some("2027"), Some("0x10"));
        assert_eq!(config.season_year, 2027);
        assert_eq!(config.layout_seed, 16);
        let config = CalendarConfig::new(2025).with_build_env(Some("soon"), None);
        assert_eq!(config.season_year, 2025);
        assert_eq!(config.layout_seed, DEFAULT_LAYOUT_SEED);
    }

    #[test]
    fn query_overrides_and_ignores_junk() {
        let config = CalendarConfig::new(2025).with_query([
            ("year", "2024"),
            ("month", "13"),
            ("doors", "40"),
            ("preview", ""),
            ("now", "2024-12-03T08:30"),
            ("utm_source", "mail"),
        ]);
        assert_eq!(config.season_year, 2024);
        assert_eq!(config.month, Month::December);
        assert_eq!(config.door_count, DEFAULT_DOOR_COUNT);
        assert!(config.preview);
        let expected = NaiveDate::from_ymd_opt(2024, 12, 3)
            .and_then(|date| date.and_hms_opt(8, 30, 0));
        assert_eq!(config.now_override, expected);
        assert!(config.season().preview);
    }

    #[test]
    fn date_only_override_means_midnight() {
        let config = CalendarConfig::new(2025).with_query([("now", "2025-12-07")]);
        let wall = NaiveDate::from_ymd_opt(2000, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap();
        let now = config.now_or(wall);
        assert_eq!(now.to_string(), "2025-12-07 00:00:00");
    }
}
