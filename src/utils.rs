//! Shared utility functions and constants

/// Maximum width of a row key in terminal output
pub const KEY_PREVIEW_LEN: usize = 48;

/// Truncate a string to max characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("hi", 2), "hi");
        assert_eq!(truncate("abc", 3), "abc");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("émission spéciale", 8), "émiss...");
    }
}
