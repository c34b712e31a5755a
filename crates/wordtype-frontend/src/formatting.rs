/// Formats a window opacity as the percentage shown on the footer button.
pub fn format_opacity(opacity: f64) -> String {
    format!("{:.0}%", opacity * 100.0)
}

/// Formats a zero-based chapter index as the one-based number shown to the
/// user.
pub fn format_chapter(index: u32) -> String {
    index.saturating_add(1).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_render_as_whole_percentages() {
        assert_eq!(format_opacity(0.1), "10%");
        assert_eq!(format_opacity(0.25), "25%");
        assert_eq!(format_opacity(0.5), "50%");
        assert_eq!(format_opacity(1.0), "100%");
    }

    #[test]
    fn chapters_are_one_based() {
        assert_eq!(format_chapter(0), "1");
        assert_eq!(format_chapter(41), "42");
    }

    #[test]
    fn largest_restored_chapter_does_not_overflow() {
        assert_eq!(format_chapter(u32::MAX), u32::MAX.to_string());
    }
}
