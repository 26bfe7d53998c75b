use chrono::{Datelike, Local, NaiveDateTime};

pub(crate) fn now_ms() -> f64 {
    js_sys::Date::now()
}

pub(crate) fn wall_clock() -> NaiveDateTime {
    Local::now().naive_local()
}

pub(crate) fn current_year() -> i32 {
    wall_clock().year()
}
