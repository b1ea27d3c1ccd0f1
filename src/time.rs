use nom::bytes::complete::{tag, take_while_m_n};
use nom::combinator::{consumed, map_res};
use nom::IResult;

pub const MICROS_PER_HOUR: i64 = 3_600_000_000;
pub const MICROS_PER_MINUTE: i64 = 60_000_000;
pub const MICROS_PER_SECOND: i64 = 1_000_000;
pub const MICROS_PER_MILLI: i64 = 1_000;

// Keeps the hour term within i64 microseconds.
const HOURS_MAX_DIGITS: usize = 9;

/// A `start --> end` line, with both timestamps as written and in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange<'a> {
    pub start: &'a str,
    pub end: &'a str,
    pub start_micros: i64,
    pub end_micros: i64,
}

pub fn to_micros(hours: i64, minutes: i64, seconds: i64, millis: i64) -> i64 {
    hours * MICROS_PER_HOUR
        + minutes * MICROS_PER_MINUTE
        + seconds * MICROS_PER_SECOND
        + millis * MICROS_PER_MILLI
}

/// Matches a time-range line. Anything after the end timestamp (cue settings,
/// coordinates) is ignored.
pub fn time_range(line: &str) -> Option<TimeRange<'_>> {
    show_hide(line).ok().map(|(_, range)| range)
}

fn show_hide(input: &str) -> IResult<&str, TimeRange<'_>> {
    let (input, (start, start_micros)) = consumed(timestamp)(input)?;
    let (input, _) = tag(" --> ")(input)?;
    let (input, (end, end_micros)) = consumed(timestamp)(input)?;

    Ok((
        input,
        TimeRange {
            start,
            end,
            start_micros,
            end_micros,
        },
    ))
}

/// `HH:MM:SS,mmm` to microseconds. Only the digit counts are checked, so a
/// minute value of `75` is accepted and simply adds up.
pub fn timestamp(input: &str) -> IResult<&str, i64> {
    let (input, hours) = number(2, HOURS_MAX_DIGITS)(input)?;
    let (input, _) = tag(":")(input)?;
    let (input, minutes) = number(2, 2)(input)?;
    let (input, _) = tag(":")(input)?;
    let (input, seconds) = number(2, 2)(input)?;
    let (input, _) = tag(",")(input)?;
    let (input, millis) = number(3, 3)(input)?;

    Ok((input, to_micros(hours, minutes, seconds, millis)))
}

fn number<'a>(min: usize, max: usize) -> impl FnMut(&'a str) -> IResult<&'a str, i64> {
    map_res(
        take_while_m_n(min, max, |c: char| c.is_ascii_digit()),
        |s: &str| s.parse::<i64>(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_timestamp {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (input, expected) = $value;

                let (_, micros) = timestamp(input).unwrap();

                assert_eq!(micros, expected);
            }
        )*
        }
    }

    test_timestamp! {
        test_timestamp_0: ("00:00:00,000", 0),
        test_timestamp_1: ("00:00:01,200", 1_200_000),
        test_timestamp_2: ("00:00:01,002", 1_002_000),
        test_timestamp_3: ("01:01:01,200", 3_661_200_000),
        test_timestamp_4: ("12:34:56,789", 45_296_789_000),
        test_timestamp_5: ("00:75:99,000", 75 * 60_000_000 + 99_000_000),
        test_timestamp_6: ("100:00:00,001", 360_000_001_000),
    }

    #[test]
    fn rejects_short_groups() {
        assert!(timestamp("1:1:1,200").is_err());
        assert!(timestamp("00:00:01,2").is_err());
        assert!(timestamp("00:00:01").is_err());
    }

    #[test]
    fn formula_matches_components() {
        for (h, m, s, ms) in [(0, 0, 0, 0), (1, 2, 3, 4), (99, 59, 59, 999)] {
            let line = format!("{:02}:{:02}:{:02},{:03}", h, m, s, ms);
            let (_, micros) = timestamp(&line).unwrap();
            assert_eq!(
                micros,
                h * 3_600_000_000 + m * 60_000_000 + s * 1_000_000 + ms * 1_000
            );
        }
    }

    #[test]
    fn parses_time_range_line() {
        let range = time_range("00:00:01,000 --> 00:00:03,500").unwrap();
        assert_eq!(range.start, "00:00:01,000");
        assert_eq!(range.end, "00:00:03,500");
        assert_eq!(range.start_micros, 1_000_000);
        assert_eq!(range.end_micros, 3_500_000);
    }

    #[test]
    fn ignores_trailing_cue_settings() {
        let range = time_range("00:00:01,000 --> 00:00:02,000 X1:10 X2:20").unwrap();
        assert_eq!(range.end_micros, 2_000_000);
    }

    #[test]
    fn keeps_backwards_ranges() {
        let range = time_range("00:00:05,000 --> 00:00:02,000").unwrap();
        assert_eq!(range.end_micros - range.start_micros, -3_000_000);
    }

    #[test]
    fn rejects_other_separators() {
        assert_eq!(time_range("00:00:01,000->00:00:02,000"), None);
        assert_eq!(time_range("00:00:01.000 --> 00:00:02.000"), None);
        assert_eq!(time_range("Hello world"), None);
    }
}
