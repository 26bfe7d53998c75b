use serde::de::DeserializeOwned;
use serde::Serialize;

pub fn encode<T>(value: &T) -> Option<String>
where
    T: Serialize,
{
    serde_json::to_string(value).ok()
}

pub fn decode<T>(raw: &str) -> Option<T>
where
    T: DeserializeOwned,
{
    if raw.trim().is_empty() {
        return None;
    }
    serde_json::from_str::<T>(raw).ok()
}
