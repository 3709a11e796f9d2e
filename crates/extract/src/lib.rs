mod ao3;
mod consts;
pub mod error;
mod fichub;
mod format;
pub mod models;
mod stats;

use tracing::instrument;

pub use crate::ao3::{Datalist, SeriesPage, WorkPage, series_url, work_url};
use crate::error::{ErrorKind, Result};
pub use crate::fichub::{ExtraMeta, FicHubMeta, FicHubResponse};
pub use crate::format::{MAX_FIELD_CHARS, MAX_PARAGRAPHS, format_element, format_html};
use crate::models::{Series, UniqueKey, Work};

/// Easy, top-level entrypoint for the extraction of a [`Work`] from an AO3
/// work or chapter page.
///
/// `final_url` is where the page was served from after redirects (used to
/// identify the owning work of a chapter), and `restricted` marks pages that
/// required a logged-in session. See [`WorkPage`] for more details.
#[instrument(skip(html), fields(html_size = html.len()))]
pub fn extract_work(html: &str, final_url: Option<&str>, restricted: bool) -> Result<Work> {
    let mut page = WorkPage::from_html(html).with_restricted(restricted);
    if !page.is_valid() {
        exn::bail!(ErrorKind::InvalidDocument);
    }
    if let Some(url) = final_url {
        page = page.with_url(url);
    }
    page.work()
}

/// Extraction of a [`Series`] from an AO3 series page.
#[instrument(skip(html), fields(html_size = html.len()))]
pub fn extract_series(id: u64, html: &str, restricted: bool) -> Result<Series> {
    let page = SeriesPage::new(id, html).with_restricted(restricted);
    if !page.is_valid() {
        exn::bail!(ErrorKind::InvalidDocument);
    }
    page.series()
}

/// Extraction of a [`Work`] from a FicHub metadata response. The site is
/// taken from `key`.
#[instrument(skip(json), fields(json_size = json.len()))]
pub fn extract_fichub(json: &str, key: UniqueKey, url: &str) -> Result<Work> {
    FicHubResponse::from_json(json)?.into_meta()?.into_work(key, url)
}
