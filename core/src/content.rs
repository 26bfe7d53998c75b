pub const CONTENT_BASE: &str = "/content";

pub fn thumbnail_url(day: u32) -> String {
    format!("{CONTENT_BASE}/day{day}-thumb.jpeg")
}

pub fn full_image_url(day: u32) -> String {
    format!("{CONTENT_BASE}/day{day}.jpg")
}
