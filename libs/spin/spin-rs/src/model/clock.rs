use chrono::Utc;

pub type UnixTimeMillis = u64;

pub const DAY_MILLIS: UnixTimeMillis = 24 * 60 * 60 * 1000;

pub fn get_time() -> UnixTimeMillis {
    Utc::now().timestamp_millis().max(0) as UnixTimeMillis
}
