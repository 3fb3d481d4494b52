//! Annotation id generation
//!
//! Format: `ann_<base36 millis>_<9 random base36 chars>`. The time prefix
//! keeps ids roughly sortable, the random suffix separates ids minted within
//! the same millisecond.

use uuid::Uuid;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

/// Generate a fresh id for an annotation created at `timestamp_ms`
pub fn generate_id(timestamp_ms: i64) -> String {
    let mut entropy = Uuid::new_v4().as_u128();
    let mut suffix = String::with_capacity(SUFFIX_LEN);
    for _ in 0..SUFFIX_LEN {
        suffix.push(ALPHABET[(entropy % 36) as usize] as char);
        entropy /= 36;
    }

    format!("ann_{}_{}", to_base36(timestamp_ms.max(0) as u64), suffix)
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}
