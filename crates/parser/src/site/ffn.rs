use super::{SiteParser, invalid_link, parse_fichub};
use crate::cache::ParsedCache;
use crate::context::Context;
use crate::entity::{Entity, LinkMatch};
use crate::error::Result;
use abstractor_extract::models::{EntityKind, Site};
use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use tracing::instrument;

static LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://(?:www\.|m\.)?fanfiction\.net/s/(\d+)(?:$|[/?#])").unwrap());

/// FanFiction.Net stories, described through FicHub.
#[derive(Debug)]
pub struct FfnParser {
    context: Context,
    cache: ParsedCache,
}
impl FfnParser {
    pub fn new(context: Context) -> Self {
        Self {
            context,
            cache: ParsedCache::default(),
        }
    }
}

#[async_trait]
impl SiteParser for FfnParser {
    fn site(&self) -> Site {
        Site::FanFictionNet
    }

    fn recognize(&self, url: &str) -> Option<LinkMatch> {
        let id = LINK_REGEX.captures(url)?.get(1)?.as_str();
        Some(LinkMatch {
            site: Site::FanFictionNet,
            kind: EntityKind::Work,
            id: id.to_string(),
            raw: url.to_string(),
            canonical: format!("https://www.fanfiction.net/s/{id}"),
        })
    }

    #[instrument(skip(self))]
    async fn parse(&mut self, url: &str) -> Result<Entity> {
        let link = self.recognize(url).ok_or_else(|| invalid_link(url))?;
        parse_fichub(&self.context, &mut self.cache, link).await
    }

    fn cache(&self) -> &ParsedCache {
        &self.cache
    }

    fn cache_mut(&mut self) -> &mut ParsedCache {
        &mut self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use abstractor_fetch::{MockFetcher, MockResponse};
    use rstest::rstest;
    use std::sync::Arc;

    const API: &str = "https://fichub.test/api";
    const QUERY: &str = "https://fichub.test/api?q=https://www.fanfiction.net/s/5782108";

    fn parser(fetcher: Arc<MockFetcher>) -> FfnParser {
        FfnParser::new(Context::new(fetcher, API))
    }

    #[rstest]
    #[case("https://www.fanfiction.net/s/5782108")]
    #[case("https://www.fanfiction.net/s/5782108/1/Harry-Potter-and-the-Methods-of-Rationality")]
    #[case("http://m.fanfiction.net/s/5782108/12/")]
    #[case("https://fanfiction.net/s/5782108?ref=x")]
    #[case("HTTPS://WWW.FanFiction.net/s/5782108#top")]
    fn host_and_path_variants_share_a_key(#[case] url: &str) {
        let parser = parser(Arc::default());
        let link = parser.recognize(url).unwrap();
        assert_eq!(link.key().to_string(), "ffn:work:5782108");
        assert_eq!(link.canonical, "https://www.fanfiction.net/s/5782108");
    }

    #[rstest]
    #[case("https://www.fanfiction.net/u/12345/Author")]
    #[case("https://www.fanfiction.net/s/")]
    #[case("https://www.fanfiction.net/s/123abc")]
    #[case("https://www.fictionpress.com/s/123")]
    fn rejects(#[case] url: &str) {
        assert!(!parser(Arc::default()).is_valid_link(url));
    }

    #[tokio::test]
    async fn parses_once() {
        let fetcher = Arc::new(MockFetcher::with_pages([(
            QUERY,
            include_str!("../../../extract/fixtures/fichub_ffn.json"),
        )]));
        let mut parser = parser(fetcher.clone());
        let first = parser.parse("https://m.fanfiction.net/s/5782108/3/").await.unwrap();
        let second = parser.parse("https://www.fanfiction.net/s/5782108").await.unwrap();
        assert!(first.same_instance(&second));
        assert_eq!(fetcher.hits(QUERY).await, 1);
        assert_eq!(parser.parsed_count(), 1);
        let work = first.as_work().unwrap();
        assert_eq!(work.url, "https://www.fanfiction.net/s/5782108");
        assert_eq!(work.kudos, 21000);
    }

    #[tokio::test]
    async fn fetch_and_extraction_failures() {
        let fetcher = Arc::new(
            MockFetcher::default()
                .with_response(QUERY, MockResponse::Body("{\"err\": 1, \"msg\": \"not found\"}".into())),
        );
        let mut parser = parser(fetcher);
        let err = parser.parse("https://www.fanfiction.net/s/5782108").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::ExtractionFailure(_)));
        let err = parser.parse("https://www.fanfiction.net/s/1").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::FetchFailure(_)));
        let err = parser.parse("https://example.com/s/1").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidLink(_)));
        assert_eq!(parser.parsed_count(), 0);
    }
}
