//! Delivery window string, e.g. `10:00 a 12:00`

/// Leading integer of `s` after leading whitespace, with an optional sign
///
/// `"05abc"` → 5, `" 7"` → 7, `"+9"` → 9, `"-1"` → -1, `"abc"` / `""` / `"-"` → None.
fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let digits_from = usize::from(s.starts_with(['+', '-']));
    let end = s[digits_from..]
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| digits_from + i)
        .unwrap_or(s.len());
    s[..end].parse().ok()
}

fn pad2(n: i64) -> String {
    format!("{:0>2}", n)
}

/// Format the visit window starting at `visit_time` and lasting `window_hours`
///
/// The start is echoed as written. The end hour is not wrapped at midnight:
/// `("23:30", 1)` gives `"23:30 a 24:30"`. A value that is not `H:M` comes
/// back as `"<value> a <value>"`.
pub fn build_time_range_string(visit_time: &str, window_hours: u32) -> String {
    let mut parts = visit_time.split(':');
    let hours = parts.next().and_then(leading_int);
    let minutes = parts.next().and_then(leading_int);

    match (hours, minutes) {
        (Some(h), Some(m)) => {
            let end = h
                .saturating_mul(60)
                .saturating_add(m)
                .saturating_add(i64::from(window_hours) * 60);
            format!("{} a {}:{}", visit_time, pad2(end.div_euclid(60)), pad2(end % 60))
        }
        _ => format!("{} a {}", visit_time, visit_time),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_window() {
        assert_eq!(build_time_range_string("10:00", 2), "10:00 a 12:00");
        assert_eq!(build_time_range_string("14:45", 3), "14:45 a 17:45");
    }

    #[test]
    fn test_end_hour_is_not_wrapped() {
        assert_eq!(build_time_range_string("23:30", 1), "23:30 a 24:30");
        assert_eq!(build_time_range_string("22:15", 4), "22:15 a 26:15");
    }

    #[test]
    fn test_end_is_zero_padded() {
        assert_eq!(build_time_range_string("7:5", 2), "7:5 a 09:05");
        assert_eq!(build_time_range_string("0:00", 2), "0:00 a 02:00");
    }

    #[test]
    fn test_minutes_overflow_carries_into_hours() {
        assert_eq!(build_time_range_string("10:75", 2), "10:75 a 13:15");
    }

    #[test]
    fn test_malformed_value_degrades() {
        assert_eq!(build_time_range_string("abc:def", 2), "abc:def a abc:def");
        assert_eq!(build_time_range_string("10", 2), "10 a 10");
        assert_eq!(build_time_range_string("", 2), " a ");
        assert_eq!(build_time_range_string("+:30", 2), "+:30 a +:30");
    }

    #[test]
    fn test_leading_int_semantics() {
        assert_eq!(build_time_range_string("10:00hs", 2), "10:00hs a 12:00");
        assert_eq!(leading_int(" 9"), Some(9));
        assert_eq!(leading_int("x9"), None);
    }

    #[test]
    fn test_signed_components_are_computed() {
        assert_eq!(build_time_range_string("+9:30", 2), "+9:30 a 11:30");
        assert_eq!(build_time_range_string("-1:30", 2), "-1:30 a 01:30");
        assert_eq!(build_time_range_string("-1:00", 0), "-1:00 a -1:00");
        assert_eq!(leading_int("-"), None);
    }
}
