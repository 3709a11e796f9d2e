use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;

const SAFE_END: &str = "(?:$|\\?|#|/)";
const SCHEME_HOST: &str = "(?:https?://(?:www\\.)?archiveofourown\\.org)?";

macro_rules! selector {
    ($name:ident, $css:expr) => {
        pub(crate) static $name: LazyLock<Selector> = LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// Shared
selector!(DT_SELECTOR, "dt");
selector!(ANCHOR_SELECTOR, "a");
selector!(RESTRICTED_SELECTOR, "img[title='Restricted']");
regex!(
    AUTHOR_REGEX,
    format!(r"^{}/users/([^/?#]+)/pseuds/([^/?#]+){}", SCHEME_HOST, SAFE_END).as_str()
);
regex!(WORK_PATH_REGEX, format!(r"{}/works/(\d+){}", SCHEME_HOST, SAFE_END).as_str());
regex!(SERIES_PATH_REGEX, format!(r"{}/series/(\d+){}", SCHEME_HOST, SAFE_END).as_str());
regex!(DATE_REGEX, r"(\d{4})-(\d{1,2})-(\d{1,2})");

// Work page
selector!(WORK_META_SELECTOR, "dl.work.meta.group");
selector!(TITLE_SELECTOR, "div.preface.group h2.title");
selector!(BYLINE_SELECTOR, "div.preface.group h3.byline");
selector!(SUMMARY_SELECTOR, "div.preface.group div.summary blockquote.userstuff");
selector!(KUDOS_COMMENTABLE_SELECTOR, "#kudo_commentable_id");
selector!(SERIES_POSITION_SELECTOR, "span.position");
regex!(CHAPTERS_REGEX, r"(\d{1,3}(?:,?\d{3})*)\s*/\s*(\d{1,3}(?:,?\d{3})*|\?)");
regex!(POSITION_REGEX, r"Part\s+(\d{1,3}(?:,?\d{3})*)");

// Series page
selector!(SERIES_META_SELECTOR, "dl.series.meta.group");
selector!(SERIES_TITLE_SELECTOR, "h2.heading");
selector!(SERIES_BLURB_SELECTOR, "li.work.blurb.group");
selector!(BLURB_HEADING_LINK_SELECTOR, "h4.heading a");

// Field formatting
regex!(BLANK_LINES_REGEX, r"\n{3,}");
