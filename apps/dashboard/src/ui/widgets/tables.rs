/// First row to draw so that `selected_index` stays on screen.
pub const fn scroll_offset(
    total_rows: usize,
    max_visible_rows: usize,
    selected_index: usize,
) -> usize {
    if total_rows <= max_visible_rows || selected_index < max_visible_rows {
        return 0;
    }

    selected_index + 1 - max_visible_rows
}

/// Clamps a free scroll position so the last page stays full.
pub const fn clamp_offset(total_rows: usize, max_visible_rows: usize, offset: usize) -> usize {
    let last_page = total_rows.saturating_sub(max_visible_rows);
    if offset > last_page {
        last_page
    } else {
        offset
    }
}

/// Thousands-separated value, `-` when the period has no figure.
pub fn format_value(value: Option<f64>) -> String {
    let Some(value) = value else {
        return "-".to_string();
    };

    #[allow(clippy::cast_possible_truncation)]
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0 {
        grouped.push('-');
    }
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_stays_visible() {
        assert_eq!(scroll_offset(5, 10, 4), 0);
        assert_eq!(scroll_offset(30, 10, 3), 0);
        assert_eq!(scroll_offset(30, 10, 10), 1);
        assert_eq!(scroll_offset(30, 10, 29), 20);
    }

    #[test]
    fn offset_never_passes_last_page() {
        assert_eq!(clamp_offset(30, 10, 5), 5);
        assert_eq!(clamp_offset(30, 10, 50), 20);
        assert_eq!(clamp_offset(4, 10, 3), 0);
    }

    #[test]
    fn values_are_grouped() {
        assert_eq!(format_value(None), "-");
        assert_eq!(format_value(Some(0.0)), "0");
        assert_eq!(format_value(Some(999.4)), "999");
        assert_eq!(format_value(Some(1234567.0)), "1,234,567");
        assert_eq!(format_value(Some(-12500.0)), "-12,500");
    }
}
