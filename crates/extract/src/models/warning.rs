use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use super::sanitize;
use crate::error::{Error, ErrorKind};

/// AO3 archive warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Warning {
    NoWarningsApply,
    CreatorChoseNotToUse,
    GraphicViolence,
    MajorCharacterDeath,
    Underage,
    NonCon,
}

/// Display text as it appears on AO3, plus the sanitized spellings accepted
/// when parsing.
const WARNINGS: &[(Warning, &str, &[&str])] = &[
    (Warning::NoWarningsApply, "No Archive Warnings Apply", &["noarchivewarningsapply", "nowarningsapply"]),
    (
        Warning::CreatorChoseNotToUse,
        "Creator Chose Not To Use Archive Warnings",
        &[
            "creatorchosenottousearchivewarnings",
            "creatorchosenottousewarnings",
            "creatorchosenottouse",
            "chosenottousearchivewarnings",
            "chosenottouse",
        ],
    ),
    (
        Warning::GraphicViolence,
        "Graphic Depictions Of Violence",
        &["graphicdepictionsofviolence", "graphicviolence", "depictionsofviolence"],
    ),
    (Warning::MajorCharacterDeath, "Major Character Death", &["majorcharacterdeath"]),
    (Warning::Underage, "Underage", &["underage", "underagesex"]),
    (Warning::NonCon, "Rape/Non-Con", &["rapenoncon", "noncon"]),
];

impl Warning {
    /// Returns the display string for the warning.
    pub fn as_str(&self) -> &'static str {
        WARNINGS.iter().find(|(warning, ..)| warning == self).map(|(_, name, _)| *name).unwrap_or_default()
    }
}
impl FromStr for Warning {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sanitized = sanitize(s);
        WARNINGS
            .iter()
            .find(|(_, _, aliases)| aliases.contains(&sanitized.as_str()))
            .map(|(warning, ..)| *warning)
            .ok_or_else(|| {
                Error::from(ErrorKind::ParseError {
                    field: "warnings",
                    value: format!("unknown warning: {s}"),
                })
            })
    }
}
impl Display for Warning {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_display_text() {
        for (warning, name, _) in WARNINGS {
            assert_eq!(name.parse::<Warning>().unwrap(), *warning);
            assert_eq!(warning.to_string(), *name);
        }
    }

    #[test]
    fn unknown_warning() {
        assert!("Spoilers".parse::<Warning>().is_err());
    }
}
