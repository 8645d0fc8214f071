use pattern_forecast::format::{number_suffix, round_display, round_display_f64};
use pattern_forecast::ForecastError;
use rstest::rstest;

#[rstest]
#[case("1", "")]
#[case("10", "")]
#[case("100", "")]
#[case("1000", "k")]
#[case("10000", "k")]
#[case("100000", "k")]
#[case("1000000", "M")]
#[case("10000000", "M")]
#[case("100000000", "M")]
#[case("1000000000", "B")]
#[case("10000000000", "B")]
#[case("100000000000", "B")]
#[case("1000000000000", "T")]
#[case("10000000000000", "T")]
#[case("100000000000000", "T")]
fn test_number_suffix(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(number_suffix(input).unwrap(), expected);
}

#[rstest]
#[case("")]
#[case("5.30")]
#[case("1,234")]
fn test_number_suffix_rejects_non_integers(#[case] input: &str) {
    assert!(matches!(
        number_suffix(input),
        Err(ForecastError::ParseError(_))
    ));
}

#[test]
fn test_number_suffix_too_long() {
    assert!(matches!(
        number_suffix("1000000000000000"),
        Err(ForecastError::InvalidParameter(_))
    ));
}

#[rstest]
#[case("379", "379")]
#[case("182.5", "182.50")]
#[case("1.445", "1.45")]
#[case("2.675", "2.68")]
#[case("1.995", "2")]
#[case("1072", "1.07k")]
#[case("10072", "10.07k")]
#[case("7485275", "7.49M")]
#[case("74852750", "74.85M")]
#[case("748527500", "748.53M")]
#[case("1072.99", "1.07k")]
#[case("0.001", "0")]
fn test_round_display(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(round_display(input).unwrap(), expected);
}

#[rstest]
#[case("")]
#[case("1.1.1")]
#[case("abc")]
fn test_round_display_invalid(#[case] input: &str) {
    assert!(matches!(
        round_display(input),
        Err(ForecastError::ParseError(_))
    ));
}

#[test]
fn test_round_display_f64() {
    assert_eq!(round_display_f64(4321.5).unwrap(), "4.32k");
    assert_eq!(round_display_f64(12.0).unwrap(), "12");
    assert!(round_display_f64(f64::NAN).is_err());
}
