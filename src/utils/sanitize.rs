//! Log sanitisation helpers.

/// Strip control characters (including CR/LF) and cap the length of a
/// caller-supplied value before it is written to a log line.
pub fn sanitize_for_log(value: &str, max_len: usize) -> String {
    let mut chars = value.chars().filter(|c| !c.is_control());
    let mut sanitized: String = chars.by_ref().take(max_len).collect();

    if chars.next().is_some() {
        sanitized.push_str("...");
    }

    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_newlines() {
        assert_eq!(
            sanitize_for_log("line1\nFAKE LOG ENTRY\r\n", 100),
            "line1FAKE LOG ENTRY"
        );
    }

    #[test]
    fn test_caps_length() {
        assert_eq!(sanitize_for_log("abcdefghij", 4), "abcd...");
        assert_eq!(sanitize_for_log("abcd", 4), "abcd");
        assert_eq!(sanitize_for_log("", 4), "");
    }
}
