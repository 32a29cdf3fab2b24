pub mod path_validator;

/// Hard upper bound accepted on lookup; generated UIDs are much shorter.
pub const MAX_UID_LENGTH: usize = 64;

pub fn generate_uid(length: usize) -> String {
    use std::iter;

    let chars = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

    iter::repeat_with(|| chars[rand::random_range(0..chars.len())] as char)
        .take(length)
        .collect()
}

/// Shape check applied before any storage or SQL sees a UID.
///
/// Accepts `[A-Za-z0-9_-]`, non-empty, bounded length. Anything else is
/// treated as "no such record" by callers.
pub fn is_valid_uid(uid: &str) -> bool {
    !uid.is_empty()
        && uid.len() <= MAX_UID_LENGTH
        && uid
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
