use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, SubsecRound, Utc};

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Postgres `TIMESTAMPTZ` keeps microseconds.
const STORED_SUBSEC_DIGITS: u16 = 6;

/// Current UTC time at storage precision.
pub fn now() -> DateTime<FixedOffset> {
    Utc::now()
        .trunc_subsecs(STORED_SUBSEC_DIGITS)
        .fixed_offset()
}

pub fn datetime_to_string(datetime: DateTime<FixedOffset>) -> String {
    datetime.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

/// Parse an ISO-8601 timestamp. Values without an offset are taken as UTC and
/// a bare date means midnight. Sub-microsecond digits are truncated.
pub fn parse_iso_datetime(value: &str) -> Option<DateTime<FixedOffset>> {
    parse_iso_datetime_exact(value.trim())
        .map(|val| val.trunc_subsecs(STORED_SUBSEC_DIGITS))
}

fn parse_iso_datetime_exact(value: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(val) = DateTime::parse_from_rfc3339(value) {
        return Some(val);
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(val) = NaiveDateTime::parse_from_str(value, format) {
            return Some(val.and_utc().fixed_offset());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|val| val.and_hms_opt(0, 0, 0))
        .map(|val| val.and_utc().fixed_offset())
}

/// Parse a query-string flag, `None` when it is neither true nor false.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_parse_iso_datetime() {
        let expected = Utc
            .with_ymd_and_hms(2023, 12, 1, 10, 30, 0)
            .unwrap()
            .fixed_offset();
        assert_eq!(parse_iso_datetime("2023-12-01T10:30:00+00:00"), Some(expected));
        assert_eq!(parse_iso_datetime("2023-12-01T10:30:00Z"), Some(expected));
        assert_eq!(parse_iso_datetime("2023-12-01T10:30:00"), Some(expected));
        assert_eq!(parse_iso_datetime("2023-12-01 10:30:00"), Some(expected));
        assert_eq!(
            parse_iso_datetime("2023-12-01"),
            Some(
                Utc.with_ymd_and_hms(2023, 12, 1, 0, 0, 0)
                    .unwrap()
                    .fixed_offset()
            )
        );
        assert_eq!(parse_iso_datetime("Wrong Date"), None);
        assert_eq!(parse_iso_datetime(""), None);
    }

    #[test]
    fn test_datetime_to_string_round_trip() {
        let datetime = parse_iso_datetime("2024-01-05T08:00:00.250+07:00").unwrap();
        let rendered = datetime_to_string(datetime);
        assert_eq!(rendered, "2024-01-05T08:00:00.250+07:00");
        assert_eq!(parse_iso_datetime(&rendered), Some(datetime));
    }

    #[test]
    fn test_parse_iso_datetime_truncates_to_micros() {
        let datetime = parse_iso_datetime("2023-12-01T00:00:00.123456789+00:00").unwrap();
        assert_eq!(datetime_to_string(datetime), "2023-12-01T00:00:00.123456+00:00");
    }

    #[test]
    fn test_now_has_micro_precision() {
        assert_eq!(now().timestamp_subsec_nanos() % 1_000, 0);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("True"), Some(true));
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
