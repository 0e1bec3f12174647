/// Extract the vertical component from a translate transform.
///
/// Chart renderers position axis ticks with SVG attributes like
/// `translate(0, 234.5)` (comma or whitespace separated) and bars with
/// inline styles like `transform: translate3d(100.9px, 166px, 0px)`.
/// Both forms carry the y coordinate as the second argument.
pub fn translate_y(transform: &str) -> Option<f64> {
    let start = transform.find("translate")?;
    let rest = &transform[start..];
    let open = rest.find('(')?;
    let close = rest[open..].find(')')? + open;
    let inner = &rest[open + 1..close];

    let second = if inner.contains(',') {
        inner.split(',').nth(1)?
    } else {
        inner.split_whitespace().nth(1)?
    };

    parse_px(second)
}

/// Parse a pixel-ish scalar: `"166px"`, `" 290 "`, `"234.5"`.
fn parse_px(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix("px").unwrap_or(trimmed);
    trimmed.trim().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_comma_form() {
        assert_eq!(translate_y("translate(0, 290)"), Some(290.0));
        assert_eq!(translate_y("translate(12.5, 234.5)"), Some(234.5));
    }

    #[test]
    fn test_translate_whitespace_form() {
        assert_eq!(translate_y("translate(0 290)"), Some(290.0));
    }

    #[test]
    fn test_translate3d_in_style() {
        let style = "transform: translate3d(100.914286px, 166px, 0px);";
        assert_eq!(translate_y(style), Some(166.0));
    }

    #[test]
    fn test_ignores_leading_properties() {
        let style = "opacity: 1; transform: translate3d(80px, 42px, 0px);";
        assert_eq!(translate_y(style), Some(42.0));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(translate_y(""), None);
        assert_eq!(translate_y("rotate(45)"), None);
        assert_eq!(translate_y("translate(10)"), None);
        assert_eq!(translate_y("translate(a, b)"), None);
    }
}
