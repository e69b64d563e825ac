use chrono::{DateTime, Local};

const EXPORT_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Truncate to at most `max_chars` characters, marking the cut with "..."
pub fn truncate_string(text: &str, max_chars: usize) -> String {
    let single_line = text.lines().next().unwrap_or("");
    let char_count = single_line.chars().count();
    let was_multiline = text.lines().nth(1).is_some();

    if char_count <= max_chars && !was_multiline {
        return single_line.to_string();
    }

    if max_chars <= 3 {
        return ".".repeat(max_chars);
    }

    let kept: String = single_line.chars().take(max_chars - 3).collect();
    format!("{}...", kept)
}

/// Pad `text` with spaces to `width` characters
pub fn pad_to_width(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}

/// Empty values shown as a dash
pub fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() { "-" } else { value }
}

/// Default file name for exports taken at `now`
pub fn export_file_name(now: DateTime<Local>) -> String {
    format!("fengshui-export-{}.json", now.format(EXPORT_TIMESTAMP_FORMAT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate_string("Thiên Bồng", 20), "Thiên Bồng");
        assert_eq!(truncate_string("Thiên Bồng tinh", 8), "Thiên...");
        assert_eq!(truncate_string("first\nsecond", 20), "first...");
        assert_eq!(truncate_string("abcdef", 2), "..");
    }

    #[test]
    fn test_pad_to_width() {
        assert_eq!(pad_to_width("Âm", 4), "Âm  ");
        assert_eq!(pad_to_width("Dương", 3), "Dương");
    }

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(""), "-");
        assert_eq!(or_dash("Kim"), "Kim");
    }

    #[test]
    fn test_export_file_name() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(export_file_name(now), "fengshui-export-20240309-070501.json");
    }
}
