// Wall-clock helpers used by report timestamps

use chrono::{DateTime, Utc};

pub fn now_utc() -> DateTime<Utc> {
    #[cfg(miri)]
    {
        DateTime::<Utc>::UNIX_EPOCH
    }
    #[cfg(not(miri))]
    {
        Utc::now()
    }
}

/// Render a timestamp in HTTP date form, e.g. `Mon, 19 Oct 2026 12:00:00 GMT`.
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Milliseconds between two instants, clamped at zero.
pub fn elapsed_ms(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds().max(0) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_http_date_format() {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 8, 5, 3).unwrap();
        assert_eq!(http_date(at), "Mon, 19 Oct 2026 08:05:03 GMT");
    }

    #[test]
    fn test_elapsed_ms_never_negative() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 1).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(elapsed_ms(start, end), 0.0);
        assert_eq!(elapsed_ms(end, start), 1000.0);
    }
}
