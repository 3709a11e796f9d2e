//! Parsing of the display counts and dates shared by every source.

use crate::consts;
use crate::error::{ErrorKind, Result};
use crate::models::Chapters;
use exn::{OptionExt, ResultExt};
use time::{Date, Month};
use tracing::instrument;

/// Lenient integer parsing for display counts such as `1,234`: thousands
/// separators and spaces are ignored, anything unparsable counts as zero.
pub fn count(text: &str) -> u64 {
    let digits: String = text.chars().filter(|c| !matches!(c, ',' | '.' | ' ')).collect();
    digits.trim().parse().unwrap_or(0)
}

/// Parses a `written/total` chapter count, where the total may be `?`.
#[instrument(level = "trace")]
pub fn chapters(text: &str) -> Result<Chapters> {
    let captures = consts::CHAPTERS_REGEX.captures(text).ok_or_raise(|| ErrorKind::ParseError {
        field: "chapters",
        value: text.to_string(),
    })?;
    let written = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    let written = u32::try_from(count(written)).or_raise(|| ErrorKind::ParseError {
        field: "chapters",
        value: written.to_string(),
    })?;
    let total = match captures.get(2).map(|m| m.as_str()) {
        None | Some("?") => None,
        Some(total) => Some(u32::try_from(count(total)).or_raise(|| ErrorKind::ParseError {
            field: "chapters",
            value: total.to_string(),
        })?),
    };
    Ok(Chapters::new(written, total))
}

/// Parses the first `YYYY-MM-DD` date found in `text`.
#[instrument(level = "trace")]
pub fn date(field: &'static str, text: &str) -> Result<Date> {
    let parse_error = || ErrorKind::ParseError {
        field,
        value: text.to_string(),
    };
    let captures = consts::DATE_REGEX.captures(text).ok_or_raise(parse_error)?;
    let part = |index: usize| captures.get(index).map(|m| m.as_str()).unwrap_or_default();
    let year = part(1).parse::<i32>().or_raise(parse_error)?;
    let month = part(2).parse::<u8>().or_raise(parse_error)?;
    let day = part(3).parse::<u8>().or_raise(parse_error)?;
    let month = Month::try_from(month).or_raise(parse_error)?;
    Date::from_calendar_date(year, month, day).or_raise(parse_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rstest::rstest;
    use time::macros::date;

    #[rstest]
    #[case("1,234", 1234)]
    #[case(" 12 345 ", 12345)]
    #[case("1.000", 1000)]
    #[case("0", 0)]
    #[case("", 0)]
    #[case("lots", 0)]
    fn counts(#[case] input: &str, #[case] expected: u64) {
        assert_eq!(count(input), expected);
    }

    #[rstest]
    #[case("3/10", Chapters::new(3, Some(10)))]
    #[case("1/?", Chapters::new(1, None))]
    #[case("1,024/1,100", Chapters::new(1024, Some(1100)))]
    #[case("5 / 5", Chapters::new(5, Some(5)))]
    fn chapter_counts(#[case] input: &str, #[case] expected: Chapters) {
        assert_eq!(chapters(input).unwrap(), expected);
    }

    #[test]
    fn chapters_without_slash() {
        let err = chapters("three").unwrap_err();
        assert!(matches!(&*err, ErrorKind::ParseError { field: "chapters", .. }));
    }

    #[rstest]
    #[case("2023-01-15", date!(2023 - 01 - 15))]
    #[case("  2019-7-4 ", date!(2019 - 07 - 04))]
    fn dates(#[case] input: &str, #[case] expected: Date) {
        assert_eq!(date("published", input).unwrap(), expected);
    }

    #[rstest]
    #[case("yesterday")]
    #[case("2023-13-01")]
    #[case("2023-02-30")]
    fn invalid_dates(#[case] input: &str) {
        let err = date("updated", input).unwrap_err();
        assert!(matches!(&*err, ErrorKind::ParseError { field: "updated", .. }));
    }
}
