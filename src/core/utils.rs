use chrono::{DateTime, FixedOffset};

pub fn datetime_to_string(datetime: DateTime<FixedOffset>) -> String {
    // America/Sao_Paulo, no DST since 2019
    let offset = FixedOffset::west_opt(3 * 60 * 60).expect("valid offset");
    datetime
        .with_timezone(&offset)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Leading integer of `value`, ignoring surrounding text: `"42abc"` is 42 and
/// `"4.2"` is 4. `None` when no digits lead or the number overflows `i64`.
pub fn parse_leading_int(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let (sign, rest) = match value.as_bytes().first() {
        Some(b'-') => ("-", &value[1..]),
        Some(b'+') => ("", &value[1..]),
        _ => ("", value),
    };
    let digits_len = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits_len == 0 {
        return None;
    }
    format!("{}{}", sign, &rest[..digits_len]).parse::<i64>().ok()
}

pub fn datetime_to_string_opt(datetime: Option<DateTime<FixedOffset>>) -> Option<String> {
    datetime.map(datetime_to_string)
}
