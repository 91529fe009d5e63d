/// Parse a number written with Polish locale conventions: spaces (including
/// non-breaking) group thousands, the first comma is the decimal separator,
/// dots are grouping noise. Returns None unless the result is positive.
pub fn parse_locale_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .collect();

    let (int_part, frac_part) = match cleaned.find(',') {
        Some(i) => (&cleaned[..i], Some(&cleaned[i + 1..])),
        None => (cleaned.as_str(), None),
    };

    let mut digits: String = int_part.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }

    if let Some(frac) = frac_part {
        let frac_digits: String = frac.chars().take_while(|c| c.is_ascii_digit()).collect();
        if !frac_digits.is_empty() {
            digits.push('.');
            digits.push_str(&frac_digits);
        }
    }

    let value: f64 = digits.parse().ok()?;
    (value > 0.0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_grouped() {
        assert_eq!(parse_locale_number("12 500"), Some(12500.0));
        assert_eq!(parse_locale_number("450 000"), Some(450000.0));
    }

    #[test]
    fn comma_decimal() {
        assert_eq!(parse_locale_number("12,5"), Some(12.5));
        assert_eq!(parse_locale_number("1 234,5"), Some(1234.5));
    }

    #[test]
    fn dot_is_grouping_not_decimal() {
        assert_eq!(parse_locale_number("12.000"), Some(12000.0));
    }

    #[test]
    fn non_breaking_spaces() {
        assert_eq!(parse_locale_number("620\u{a0}000"), Some(620000.0));
    }

    #[test]
    fn trailing_comma_keeps_integer_part() {
        assert_eq!(parse_locale_number("55,"), Some(55.0));
    }

    #[test]
    fn garbage_is_none() {
        assert_eq!(parse_locale_number(""), None);
        assert_eq!(parse_locale_number("brak"), None);
        assert_eq!(parse_locale_number(",,"), None);
    }

    #[test]
    fn zero_is_none() {
        assert_eq!(parse_locale_number("0"), None);
        assert_eq!(parse_locale_number("0,0"), None);
    }
}
