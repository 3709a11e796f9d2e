use crate::context::Context;
use crate::entity::Entity;
use crate::error::Result;
use crate::site::{Ao3Parser, FfnParser, SbParser, SiteParser};
use tracing::debug;

/// Routes links to the site parsers, in a fixed registration order: AO3,
/// FanFiction.Net, SpaceBattles.
///
/// One instance serves one message; its caches are dropped with it.
pub struct GlobalParser {
    parsers: Vec<Box<dyn SiteParser>>,
}
impl GlobalParser {
    pub fn new(context: Context) -> Self {
        Self {
            parsers: vec![
                Box::new(Ao3Parser::new(context.clone())),
                Box::new(FfnParser::new(context.clone())),
                Box::new(SbParser::new(context)),
            ],
        }
    }

    pub fn is_valid_link(&self, url: &str) -> bool {
        self.parsers.iter().any(|parser| parser.is_valid_link(url))
    }

    /// Parses `url` with the first parser that accepts it. `None` when no
    /// parser does (nothing is fetched).
    pub async fn parse(&mut self, url: &str) -> Result<Option<Entity>> {
        let Some(parser) = self.parsers.iter_mut().find(|parser| parser.is_valid_link(url)) else {
            debug!(url, "no parser accepts link");
            return Ok(None);
        };
        debug!(url, site = parser.site().name(), "routing link");
        parser.parse(url).await.map(Some)
    }

    /// Up to `limit` summaries, every entity of the first site before any of
    /// the next.
    pub fn generate_summaries(&self, limit: usize) -> Vec<String> {
        let mut summaries = Vec::new();
        for parser in &self.parsers {
            if summaries.len() >= limit {
                break;
            }
            summaries.extend(parser.generate_summaries(limit - summaries.len()));
        }
        summaries
    }

    pub fn parsed_count(&self) -> usize {
        self.parsers.iter().map(|parser| parser.parsed_count()).sum()
    }

    pub fn clear(&mut self) {
        self.parsers.iter_mut().for_each(|parser| parser.clear());
    }
}
impl std::fmt::Debug for GlobalParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.parsers.iter().map(|parser| parser.site())).finish()
    }
}
