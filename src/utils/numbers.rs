/// Parse a human-formatted count out of rendered text.
///
/// Dashboards format the same figure as `1,234` or `1.234.567` depending
/// on locale, usually embedded in prose. The first contiguous run of
/// digits and `,`/`.` separators is the count; later numbers in the text
/// are unrelated figures and must not bleed in. Returns None when no
/// digit is present.
pub fn parse_count(text: &str) -> Option<i64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .filter(char::is_ascii_digit)
        .collect();
    digits.parse::<i64>().ok()
}

/// Parse an axis tick value. Tick labels are plain numbers, so locale
/// separators are not expected here.
pub fn parse_tick_value(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count_comma_separated() {
        assert_eq!(parse_count("1,234"), Some(1234));
        assert_eq!(parse_count("12,345,678"), Some(12_345_678));
    }

    #[test]
    fn test_parse_count_dot_separated() {
        assert_eq!(parse_count("1.234.567"), Some(1_234_567));
    }

    #[test]
    fn test_parse_count_with_prose() {
        assert_eq!(parse_count("2.412.061 monatliche Hörer"), Some(2_412_061));
        assert_eq!(parse_count(" 815 "), Some(815));
    }

    #[test]
    fn test_parse_count_reads_first_number_only() {
        assert_eq!(
            parse_count("2,412,061 monthly listeners · 4 albums"),
            Some(2_412_061)
        );
        assert_eq!(parse_count("1,234 Streams on 3 tracks"), Some(1234));
    }

    #[test]
    fn test_parse_count_without_digits() {
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("—"), None);
        assert_eq!(parse_count("n/a"), None);
    }

    #[test]
    fn test_parse_tick_value() {
        assert_eq!(parse_tick_value("120"), Some(120.0));
        assert_eq!(parse_tick_value(" 0 "), Some(0.0));
        assert_eq!(parse_tick_value("1.5"), Some(1.5));
        assert_eq!(parse_tick_value("12k"), None);
    }
}
