use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use super::sanitize;
use crate::error::{Error, ErrorKind};

/// Content rating, covering both AO3's ratings and FanFiction.Net's
/// `Fiction K`/`K+`/`T`/`M` scale (`T` and `M` map onto their AO3
/// equivalents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rating {
    /// (K) Suitable for all ages; FFN only
    Kids,
    /// (K+) Suitable for ages 9 and up; FFN only
    KidsPlus,
    /// (G) General Audiences
    GeneralAudiences,
    /// (T) Teen And Up Audiences
    TeenAndUp,
    /// (M) Mature
    Mature,
    /// (E) Explicit
    Explicit,
    /// Work is not rated
    NotRated,
}

/// Every rating alongside its short code, display name and the sanitized
/// spellings accepted by [`FromStr`].
const RATINGS: &[(Rating, &str, &str, &[&str])] = &[
    (Rating::Kids, "K", "K", &["k", "fictionk"]),
    (Rating::KidsPlus, "K+", "K+", &["k+", "fictionk+"]),
    (Rating::GeneralAudiences, "G", "General Audiences", &["g", "general", "generalaudiences"]),
    (
        Rating::TeenAndUp,
        "T",
        "Teen And Up Audiences",
        &["t", "teen", "teenandup", "teenaudiences", "teenandupaudiences", "fictiont"],
    ),
    (Rating::Mature, "M", "Mature", &["m", "mature", "fictionm"]),
    (Rating::Explicit, "E", "Explicit", &["e", "explicit"]),
    (Rating::NotRated, "N", "Not Rated", &["n", "notrated"]),
];

impl Rating {
    fn entry(&self) -> &'static (Rating, &'static str, &'static str, &'static [&'static str]) {
        RATINGS.iter().find(|(rating, ..)| rating == self).unwrap_or(&RATINGS[RATINGS.len() - 1])
    }

    /// Returns the short display string for the rating (`T`, `K+`, ...).
    pub fn as_short_str(&self) -> &'static str {
        self.entry().1
    }

    /// Returns the full display string for the rating.
    pub fn as_str(&self) -> &'static str {
        self.entry().2
    }
}
impl FromStr for Rating {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sanitized = sanitize(s);
        RATINGS
            .iter()
            .find(|(.., aliases)| aliases.contains(&sanitized.as_str()))
            .map(|(rating, ..)| *rating)
            .ok_or_else(|| {
                Error::from(ErrorKind::ParseError {
                    field: "rating",
                    value: format!("unknown rating: {s}"),
                })
            })
    }
}
impl TryFrom<String> for Rating {
    type Error = Error;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.as_str().parse()
    }
}
impl Display for Rating {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("General Audiences", Rating::GeneralAudiences)]
    #[case("Teen And Up Audiences", Rating::TeenAndUp)]
    #[case("Explicit", Rating::Explicit)]
    #[case("Not Rated", Rating::NotRated)]
    #[case("Fiction K+", Rating::KidsPlus)]
    #[case("Fiction K", Rating::Kids)]
    #[case("Fiction T", Rating::TeenAndUp)]
    #[case("M", Rating::Mature)]
    fn parses(#[case] input: &str, #[case] expected: Rating) {
        assert_eq!(input.parse::<Rating>().unwrap(), expected);
    }

    #[test]
    fn rejects_unknown() {
        assert!("Fiction Z".parse::<Rating>().is_err());
        assert!("".parse::<Rating>().is_err());
    }

    #[test]
    fn display_names() {
        assert_eq!(Rating::TeenAndUp.to_string(), "Teen And Up Audiences");
        assert_eq!(Rating::TeenAndUp.as_short_str(), "T");
        assert_eq!(Rating::KidsPlus.as_short_str(), "K+");
    }
}
