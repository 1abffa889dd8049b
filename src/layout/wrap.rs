//! Measured word wrapping and ellipsis truncation.

use crate::error::Result;
use crate::metrics::TextMetrics;

/// Greedily wrap `text` into lines no wider than `max_width` points.
///
/// Words are appended to the current line while the measured width of the
/// joined line fits; otherwise the line is flushed. A word wider than the
/// column on its own gets a line to itself and is never split. Runs of
/// whitespace collapse to one space. Blank text gives no lines.
pub fn wrap_text(
    metrics: &dyn TextMetrics,
    text: &str,
    font_name: &str,
    font_size: f32,
    max_width: f32,
) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate = format!("{} {}", current, word);
        if metrics.measure(&candidate, font_name, font_size)?.width <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    Ok(lines)
}

/// Shorten `line` to the longest prefix that fits `max_width` with `ellipsis`
/// appended.
///
/// The prefix length is found by binary search over characters. Trailing
/// whitespace of the prefix is dropped. If not even an empty prefix fits, the
/// bare ellipsis is returned.
pub fn truncate_with_ellipsis(
    metrics: &dyn TextMetrics,
    line: &str,
    font_name: &str,
    font_size: f32,
    max_width: f32,
    ellipsis: &str,
) -> Result<String> {
    let chars: Vec<char> = line.chars().collect();
    let candidate = |k: usize| -> String {
        let prefix: String = chars[..k].iter().collect();
        format!("{}{}", prefix.trim_end(), ellipsis)
    };

    let mut low = 0usize;
    let mut high = chars.len();
    let mut best = 0usize;
    while low <= high {
        let mid = (low + high) / 2;
        if metrics.measure(&candidate(mid), font_name, font_size)?.width <= max_width {
            best = mid;
            low = mid + 1;
        } else if mid == 0 {
            break;
        } else {
            high = mid - 1;
        }
    }

    Ok(candidate(best))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::FontMetrics;

    fn width(metrics: &FontMetrics, text: &str) -> f32 {
        metrics.measure(text, "Helvetica", 10.0).unwrap().width
    }

    #[test]
    fn test_wrap_fits_column() {
        let metrics = FontMetrics::new();
        let text = "Alloy Steel Socket Head Screw Black-Oxide";
        let lines = wrap_text(&metrics, text, "Helvetica", 10.0, 60.0).unwrap();
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(width(&metrics, line) <= 60.0, "{line} too wide");
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_single_line_when_wide() {
        let metrics = FontMetrics::new();
        let lines = wrap_text(&metrics, "Hex Nut", "Helvetica", 10.0, 500.0).unwrap();
        assert_eq!(lines, vec!["Hex Nut".to_string()]);
    }

    #[test]
    fn test_wrap_long_word_on_own_line() {
        let metrics = FontMetrics::new();
        let lines = wrap_text(
            &metrics,
            "M3 Supercalifragilistic screw",
            "Helvetica",
            10.0,
            30.0,
        )
        .unwrap();
        assert!(lines.contains(&"Supercalifragilistic".to_string()));
    }

    #[test]
    fn test_wrap_collapses_whitespace() {
        let metrics = FontMetrics::new();
        let lines = wrap_text(&metrics, "  a \t b\n c ", "Helvetica", 10.0, 500.0).unwrap();
        assert_eq!(lines, vec!["a b c".to_string()]);
        assert!(wrap_text(&metrics, "   ", "Helvetica", 10.0, 500.0)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_truncate_fits_and_is_longest() {
        let metrics = FontMetrics::new();
        let line = "Stainless Steel Flat Washer";
        let result =
            truncate_with_ellipsis(&metrics, line, "Helvetica", 10.0, 70.0, "...").unwrap();
        assert!(result.ends_with("..."));
        assert!(width(&metrics, &result) <= 70.0);

        // One more character would not fit.
        let kept = result.trim_end_matches("...").len();
        let longer = format!("{}...", &line[..(kept + 1).min(line.len())].trim_end());
        assert!(longer == result || width(&metrics, &longer) > 70.0);
    }

    #[test]
    fn test_truncate_whole_line_when_room() {
        let metrics = FontMetrics::new();
        let result =
            truncate_with_ellipsis(&metrics, "Nut", "Helvetica", 10.0, 200.0, "...").unwrap();
        assert_eq!(result, "Nut...");
    }

    #[test]
    fn test_truncate_degenerate_column() {
        let metrics = FontMetrics::new();
        let result =
            truncate_with_ellipsis(&metrics, "Washer", "Helvetica", 10.0, 1.0, "...").unwrap();
        assert_eq!(result, "...");
    }
}
