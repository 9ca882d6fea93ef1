/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Lowercase slug of a display name: whitespace runs become `-`, anything
/// outside `[a-z0-9-]` is dropped.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;
    for ch in input.trim().chars() {
        if ch.is_whitespace() || ch == '-' {
            pending_dash = !slug.is_empty();
            continue;
        }
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_alphanumeric() {
            if pending_dash {
                slug.push('-');
                pending_dash = false;
            }
            slug.push(ch);
        }
    }
    slug
}
