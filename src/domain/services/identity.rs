#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;

use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

const SUFFIX_CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

/// Generates the per-session client identifier baked into the channel
/// endpoint. A millisecond timestamp plus a random base36 suffix is unique
/// enough to keep widget instances from colliding.
pub fn client_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix = (0..SUFFIX_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..SUFFIX_CHARS.len());
            return SUFFIX_CHARS[idx] as char;
        })
        .collect::<String>();

    return format!("user_{}_{suffix}", Utc::now().timestamp_millis());
}

pub fn session_id(client_id: &str) -> String {
    return format!("session_{client_id}");
}

pub fn message_id() -> String {
    return Uuid::new_v4().to_string();
}
