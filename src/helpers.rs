//! Layout helpers for overlays

use ratatui::layout::Rect;
use ratatui::text::Text;

/// Create a centered rect with a fixed size, shrunk to fit `r`
pub fn centered_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}

/// Truncate a string to `max_len` characters with an ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 1).collect();
        format!("{head}…")
    }
}

/// Rows `text` needs when word-wrapped to `width` columns (approximate)
pub fn wrapped_height(text: &Text<'_>, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    text.lines
        .iter()
        .map(|line| line.width().max(1).div_ceil(width))
        .sum::<usize>()
        .try_into()
        .unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_fixed_fits_inside() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(centered_fixed(40, 10, area), Rect::new(20, 7, 40, 10));

        let tiny = Rect::new(0, 0, 20, 5);
        assert_eq!(centered_fixed(40, 10, tiny), tiny);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hetzner", 10), "Hetzner");
        assert_eq!(truncate("Blocked Bank Ltd", 8), "Blocked…");
        assert_eq!(truncate("héllo wörld", 5), "héll…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn test_wrapped_height() {
        let text = Text::from("aaaa aaaa aaaa\nb");
        assert_eq!(wrapped_height(&text, 5), 4);
        assert_eq!(wrapped_height(&text, 80), 2);
        assert_eq!(wrapped_height(&Text::default(), 10), 0);
    }
}
