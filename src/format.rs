/// Unit labels for `format_file_size`, one step per power of 1024.
const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Formats a duration in seconds as `m:ss`.
///
/// Minutes are not wrapped into hours, so an hour-long video reads `60:00`.
pub fn format_duration(seconds: u64) -> String {
    if seconds == 0 {
        return "Unknown duration".to_string();
    }
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Formats a byte count with two decimals, scaled by 1024 up to GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "Unknown size".to_string();
    }
    let mut unit = 0;
    let mut scaled = bytes as f64;
    while scaled >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", scaled, SIZE_UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_zero_is_unknown() {
        assert_eq!(format_duration(0), "Unknown duration");
    }

    #[test]
    fn duration_pads_seconds() {
        assert_eq!(format_duration(65), "1:05");
        assert_eq!(format_duration(59), "0:59");
        assert_eq!(format_duration(600), "10:00");
        assert_eq!(format_duration(3725), "62:05");
    }

    #[test]
    fn size_zero_is_unknown() {
        assert_eq!(format_file_size(0), "Unknown size");
    }

    #[test]
    fn size_scales_by_1024() {
        assert_eq!(format_file_size(512), "512.00 Bytes");
        assert_eq!(format_file_size(1024), "1.00 KB");
        assert_eq!(format_file_size(1536), "1.50 KB");
        assert_eq!(format_file_size(1_048_576), "1.00 MB");
        assert_eq!(format_file_size(1_073_741_824), "1.00 GB");
    }

    #[test]
    fn size_caps_at_gigabytes() {
        assert_eq!(format_file_size(2 * 1024 * 1_073_741_824), "2048.00 GB");
    }
}
