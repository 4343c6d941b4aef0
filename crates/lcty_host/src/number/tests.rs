use super::*;

#[test]
fn test_format_integral() {
    assert_eq!(format_number(12.0), "12");
    assert_eq!(format_number(-7.0), "-7");
    assert_eq!(format_number(0.0), "0");
}

#[test]
fn test_format_fractional() {
    assert_eq!(format_number(2.5), "2.5");
    assert_eq!(format_number(0.1 + 0.2), "0.3");
    assert_eq!(format_number(1.0 / 3.0), "0.33333333333333");
}

#[test]
fn test_format_large_and_small() {
    assert_eq!(format_number(1e20), "1e+20");
    assert_eq!(format_number(1.5e-7), "1.5e-07");
}

#[test]
fn test_format_special() {
    assert_eq!(format_number(f64::INFINITY), "inf");
    assert_eq!(format_number(f64::NEG_INFINITY), "-inf");
    assert_eq!(format_number(f64::NAN), "nan");
}

#[test]
fn test_parse_numerals() {
    assert_eq!(parse_numeral("3"), Some(3.0));
    assert_eq!(parse_numeral("  -2.5 "), Some(-2.5));
    assert_eq!(parse_numeral("1e3"), Some(1000.0));
    assert_eq!(parse_numeral("0x10"), Some(16.0));
}

#[test]
fn test_parse_rejects_non_numerals() {
    assert_eq!(parse_numeral(""), None);
    assert_eq!(parse_numeral("abc"), None);
    assert_eq!(parse_numeral("inf"), None);
    assert_eq!(parse_numeral("nan"), None);
    assert_eq!(parse_numeral("+-1"), None);
    assert_eq!(parse_numeral("."), None);
}
