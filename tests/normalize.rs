use chrono::{Datelike, NaiveDate};
use csv_refinery::normalize::{
    NAME_VERIFICATION_SENTINEL, normalize_date, normalize_email, normalize_name, normalize_phone,
    normalize_price, normalize_quantity,
};
use proptest::prelude::*;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[test]
fn date_formats_seen_in_real_exports() {
    assert_eq!(normalize_date(Some("2022-01-15")), Some(date(2022, 1, 15)));
    assert_eq!(normalize_date(Some("01/15/2022")), Some(date(2022, 1, 15)));
    assert_eq!(normalize_date(Some("15-01-2022")), Some(date(2022, 1, 15)));
    assert_eq!(normalize_date(Some("01/15/22")), Some(date(2022, 1, 15)));
    assert_eq!(normalize_date(Some("20220115")), Some(date(2022, 1, 15)));
    assert_eq!(normalize_date(Some("03-2022")), Some(date(2022, 3, 1)));
    assert_eq!(normalize_date(Some("2022")), Some(date(2022, 1, 1)));
    assert_eq!(
        normalize_date(Some("shipped 2022-01-15")),
        Some(date(2022, 1, 15))
    );
}

#[test]
fn impossible_and_placeholder_dates_null_out() {
    assert_eq!(normalize_date(Some("31/02/2022")), None);
    assert_eq!(normalize_date(Some("pending")), None);
    assert_eq!(normalize_date(Some("N/A")), None);
    assert_eq!(normalize_date(Some("")), None);
    assert_eq!(normalize_date(None), None);
}

#[test]
fn day_first_slash_dates_fall_back_when_month_first_is_impossible() {
    assert_eq!(normalize_date(Some("15/01/2022")), Some(date(2022, 1, 15)));
    // Both readings possible: month-first wins.
    assert_eq!(normalize_date(Some("05/06/2022")), Some(date(2022, 5, 6)));
}

#[test]
fn prices_lose_currency_noise_and_keep_two_decimals() {
    assert_eq!(
        normalize_price(Some("$1,234.56")).map(|value| value.to_string()),
        Some("1234.56".to_string())
    );
    assert_eq!(
        normalize_price(Some(" 12.5 ")).map(|value| value.to_string()),
        Some("12.50".to_string())
    );
    assert_eq!(normalize_price(Some("N/A")), None);
    assert_eq!(normalize_price(Some("free")), None);
    assert_eq!(normalize_price(Some("")), None);
}

#[test]
fn quantities_accept_words_and_clamp_to_one() {
    assert_eq!(normalize_quantity(Some("three")), Some(3));
    assert_eq!(normalize_quantity(Some("TEN")), Some(10));
    assert_eq!(normalize_quantity(Some("0")), Some(1));
    assert_eq!(normalize_quantity(Some("-2")), Some(2));
    assert_eq!(normalize_quantity(Some("many")), None);
    assert_eq!(normalize_quantity(Some("")), None);
}

#[test]
fn emails_repair_typos_and_reject_garbage() {
    assert_eq!(
        normalize_email(Some("  John.Smith@gmal.com ")),
        Some("John.Smith@gmail.com".to_string())
    );
    assert_eq!(
        normalize_email(Some("info@otlook.com")),
        Some("info@outlook.com".to_string())
    );
    assert_eq!(normalize_email(Some("nobody")), None);
}

#[test]
fn phones_regroup_around_the_country_code() {
    assert_eq!(
        normalize_phone(Some("(555) 123-4567")),
        Some("1-555-123-4567".to_string())
    );
    assert_eq!(
        normalize_phone(Some("+1 555 123 4567")),
        Some("1-555-123-4567".to_string())
    );
    assert_eq!(normalize_phone(Some("123-4567")), None);
}

#[test]
fn verification_sentinel_survives_name_normalization() {
    assert_eq!(
        normalize_name(Some(NAME_VERIFICATION_SENTINEL)),
        Some(NAME_VERIFICATION_SENTINEL.to_string())
    );
}

proptest! {
    #[test]
    fn normalized_names_are_single_spaced_title_case(raw in "[a-zA-Z ]{0,40}") {
        prop_assume!(raw != NAME_VERIFICATION_SENTINEL);
        let cleaned = normalize_name(Some(raw.as_str())).expect("present cell");
        prop_assert!(!cleaned.contains("  "));
        prop_assert!(!cleaned.starts_with(' ') && !cleaned.ends_with(' '));
        for word in cleaned.split(' ').filter(|word| !word.is_empty()) {
            let mut chars = word.chars();
            prop_assert!(chars.next().expect("non-empty word").is_ascii_uppercase());
            prop_assert!(chars.all(|ch| ch.is_ascii_lowercase()));
        }
    }

    #[test]
    fn ten_digit_phones_always_gain_the_nanp_prefix(digits in "[0-9]{10}") {
        let formatted = normalize_phone(Some(digits.as_str())).expect("ten digits");
        let expected = format!("1-{}-{}-{}", &digits[..3], &digits[3..6], &digits[6..]);
        prop_assert_eq!(formatted, expected);
    }

    #[test]
    fn email_normalization_is_idempotent(
        local in "[A-Za-z0-9][A-Za-z0-9.]{0,11}",
        domain in prop::sample::select(vec![
            "gmal.com", "gmai.com", "yaho.com", "hotmal.com", "otlook.com",
            "aol.cm", "gmil.com", "yhaoo.com", "gmail.com", "example.org",
        ]),
    ) {
        let raw = format!(" {local}@{domain} ");
        let once = normalize_email(Some(raw.as_str())).expect("repairable address");
        let twice = normalize_email(Some(once.as_str())).expect("canonical address");
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn digit_quantities_clamp_to_at_least_one(digits in "[0-9]{1,6}") {
        let parsed = normalize_quantity(Some(digits.as_str())).expect("digits present");
        let expected = digits.parse::<i64>().expect("fits i64").max(1);
        prop_assert_eq!(parsed, expected);
    }

    #[test]
    fn two_digit_slash_years_resolve_to_the_2000s(
        month in 1u32..=12,
        day in 1u32..=28,
        year in 0u32..=68,
    ) {
        let raw = format!("{month:02}/{day:02}/{year:02}");
        let parsed = normalize_date(Some(raw.as_str())).expect("well-formed date");
        prop_assert_eq!(parsed.year(), 2000 + year as i32);
    }
}
