//! Small text formatting helpers shared across services

/// Truncate text to `max_chars` characters, appending `...` when cut
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{cut}...")
    }
}

/// Render a duration in seconds as a short human string
pub fn format_duration(seconds: f64) -> String {
    if seconds < 60.0 {
        format!("{seconds:.1} seconds")
    } else if seconds < 3600.0 {
        format!("{:.1} minutes", seconds / 60.0)
    } else {
        format!("{:.1} hours", seconds / 3600.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_leaves_short_text_alone() {
        assert_eq!(truncate("hello", 100), "hello");
        assert_eq!(truncate("", 10), "");
    }

    #[test]
    fn test_truncate_appends_ellipsis() {
        assert_eq!(truncate("hello world", 5), "hello...");
    }

    #[test]
    fn test_truncate_is_char_safe() {
        // Multi-byte characters must not split
        assert_eq!(truncate("héllo wörld", 4), "héll...");
    }

    #[test]
    fn test_format_duration_units() {
        assert_eq!(format_duration(5.0), "5.0 seconds");
        assert_eq!(format_duration(90.0), "1.5 minutes");
        assert_eq!(format_duration(7200.0), "2.0 hours");
    }
}
