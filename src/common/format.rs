use std::time::SystemTime;

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Bytes as a binary-unit size: whole bytes, one decimal for KB, two above
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    match unit {
        0 => format!("{} B", bytes),
        1 => format!("{:.1} KB", value),
        _ => format!("{:.2} {}", value, UNITS[unit]),
    }
}

/// Format directory count with appropriate plural
pub fn format_count(count: usize) -> String {
    if count == 1 {
        "1 directory".to_string()
    } else {
        format!("{} directories", count)
    }
}

/// Format a path for display, replacing home directory with ~
pub fn format_path(path: &std::path::Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

/// Whole days between `then` and `now`, zero if `then` is in the future
pub fn age_in_days(then: SystemTime, now: SystemTime) -> u64 {
    now.duration_since(then)
        .map(|d| d.as_secs() / 86_400)
        .unwrap_or(0)
}

/// Truncate a string to max length with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}
