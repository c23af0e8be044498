// src/utils/formatter.rs
use chrono::{DateTime, Utc};

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Human-readable size: repeatedly divide by 1024 and pick the largest
/// unit that keeps the scaled value below 1024, two decimal places.
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

pub fn format_modified(modified: Option<DateTime<Utc>>) -> String {
    match modified {
        Some(timestamp) => timestamp.format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_bytes() {
        assert_eq!(format_size(0), "0.00 B");
        assert_eq!(format_size(1023), "1023.00 B");
    }

    #[test]
    fn test_format_size_scales_units() {
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1048576), "1.00 MB");
        assert_eq!(format_size(1073741824), "1.00 GB");
    }

    #[test]
    fn test_format_size_caps_at_terabytes() {
        assert_eq!(format_size(1 << 50), "1024.00 TB");
    }

    #[test]
    fn test_format_modified() {
        let timestamp = DateTime::from_timestamp(0, 0);
        assert_eq!(format_modified(timestamp), "1970-01-01 00:00");
        assert_eq!(format_modified(None), "-");
    }
}
