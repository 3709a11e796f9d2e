//! Follow-up lookups triggered by reacting to a series summary.

use regex::Regex;
use std::sync::LazyLock;

static SERIES_LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://(?:www\.)?archiveofourown\.org(?:/collections/[^/\s?#]+)?/series/(\d+)").unwrap()
});

/// Keycap emoji accepted as reactions.
const KEYCAPS: &[(&str, usize)] = &[
    ("1️⃣", 1),
    ("2️⃣", 2),
    ("3️⃣", 3),
    ("4️⃣", 4),
    ("5️⃣", 5),
    ("6️⃣", 6),
    ("7️⃣", 7),
    ("8️⃣", 8),
    ("9️⃣", 9),
    ("🔟", 10),
];

/// Highest member position a reaction can select.
pub const MAX_REACTION: usize = 10;

/// Member position selected by `reaction`: a keycap emoji or a plain number,
/// between 1 and [`MAX_REACTION`].
pub fn resolve_reaction(reaction: &str) -> Option<usize> {
    let reaction = reaction.trim();
    KEYCAPS
        .iter()
        .find(|(keycap, _)| *keycap == reaction)
        .map(|(_, position)| *position)
        .or_else(|| reaction.parse().ok())
        .filter(|position| (1..=MAX_REACTION).contains(position))
}

/// The series a summary is about: the first AO3 series link on its first line.
pub fn series_id(message: &str) -> Option<u64> {
    let first_line = message.lines().next()?;
    SERIES_LINK_REGEX.captures(first_line)?.get(1)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1️⃣", Some(1))]
    #[case("9️⃣", Some(9))]
    #[case("🔟", Some(10))]
    #[case(" 3 ", Some(3))]
    #[case("10", Some(10))]
    #[case("0", None)]
    #[case("11", None)]
    #[case("👍", None)]
    #[case("", None)]
    fn reactions(#[case] reaction: &str, #[case] expected: Option<usize>) {
        assert_eq!(resolve_reaction(reaction), expected);
    }

    #[rstest]
    #[case("**Homeward** (<https://archiveofourown.org/series/2468>) by **writer**\n**Words:** 1", Some(2468))]
    #[case(":lock:**S** (<https://www.archiveofourown.org/series/7>) by **a**", Some(7))]
    #[case("**W** (<https://archiveofourown.org/works/1>) by **a**\nhttps://archiveofourown.org/series/2", None)]
    #[case("", None)]
    fn series_on_first_line(#[case] message: &str, #[case] expected: Option<u64>) {
        assert_eq!(series_id(message), expected);
    }
}
