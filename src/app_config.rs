use std::cell::RefCell;

use advent_core::CalendarConfig;
use web_sys::UrlSearchParams;

use crate::clock;

thread_local! {
    static CALENDAR_CONFIG: RefCell<Option<CalendarConfig>> = RefCell::new(None);
}

pub(crate) fn calendar_config() -> CalendarConfig {
    if let Some(config) = CALENDAR_CONFIG.with(|slot| slot.borrow().clone()) {
        return config;
    }
    let config = load_calendar_config();
    CALENDAR_CONFIG.with(|slot| {
        *slot.borrow_mut() = Some(config.clone());
    });
    config
}

fn load_calendar_config() -> CalendarConfig {
    let config = CalendarConfig::new(clock::current_year()).with_build_env(
        option_env!("ADVENT_SEASON_YEAR").or(option_env!("TRUNK_PUBLIC_ADVENT_SEASON_YEAR")),
        option_env!("ADVENT_LAYOUT_SEED").or(option_env!("TRUNK_PUBLIC_ADVENT_LAYOUT_SEED")),
    );
    let pairs = query_pairs();
    let config = config.with_query(pairs.iter().map(|(key, value)| (key.as_str(), value.as_str())));
    #[cfg(target_arch = "wasm32")]
    {
        gloo::console::log!(
            "calendar config",
            config.season_year,
            config.door_count,
            config.preview
        );
    }
    config
}

fn query_pairs() -> Vec<(String, String)> {
    let Some(window) = web_sys::window() else {
        return Vec::new();
    };
    let Ok(search) = window.location().search() else {
        return Vec::new();
    };
    let Ok(params) = UrlSearchParams::new_with_str(&search) else {
        return Vec::new();
    };
    const KEYS: [&str; 6] = ["year", "month", "doors", "seed", "preview", "now"];
    KEYS.iter()
        .filter_map(|key| params.get(key).map(|value| (key.to_string(), value)))
        .collect()
}
