//! CLI command implementations

pub mod chat;
pub mod list;
pub mod new;
pub mod read;

use chrono::NaiveDateTime;

/// SQLite CURRENT_TIMESTAMP ("YYYY-MM-DD HH:MM:SS") shortened for display.
pub(crate) fn format_timestamp(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.format("%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub(crate) fn truncate(text: &str, max_length: usize) -> String {
    if text.chars().count() > max_length {
        let cut: String = text.chars().take(max_length).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_display() {
        assert_eq!(format_timestamp("2026-03-01 09:30:00"), "03-01 09:30");
        // Unparseable values pass through untouched.
        assert_eq!(format_timestamp("whenever"), "whenever");
    }

    #[test]
    fn truncation() {
        assert_eq!(truncate("short", 30), "short");
        assert_eq!(truncate("abcdefgh", 5), "abcde...");
    }
}
