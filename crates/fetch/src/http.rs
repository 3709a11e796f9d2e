use crate::error::{ErrorKind, Result};
use crate::session::{Credentials, Session};
use crate::{Fetcher, Page};
use async_trait::async_trait;
use exn::ResultExt;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Configuration for the [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub user_agent: String,
    /// Whole-request timeout.
    pub timeout: Duration,
    /// AO3 account for restricted works; without one they fail with
    /// [`ErrorKind::AuthRequired`].
    pub credentials: Option<Credentials>,
}
impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "fanfiction-abstractor-bot".to_string(),
            timeout: Duration::from_secs(30),
            credentials: None,
        }
    }
}

/// [`Fetcher`] backed by a shared `reqwest` client with a cookie store, which
/// also carries the AO3 login session.
#[derive(Debug)]
pub struct HttpFetcher {
    client: Client,
    session: Session,
}
impl HttpFetcher {
    pub fn new(config: HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .cookie_store(true)
            .gzip(true)
            .use_rustls_tls()
            .build()
            .or_raise(|| ErrorKind::Network)?;
        Ok(Self {
            client,
            session: Session::new(config.credentials),
        })
    }

    async fn get(&self, url: &str) -> Result<(String, String)> {
        let response = transport(self.client.get(url).send().await)?;
        let status = response.status();
        if !status.is_success() {
            exn::bail!(ErrorKind::Status(status.as_u16()));
        }
        let final_url = response.url().to_string();
        let body = response.text().await.or_raise(|| ErrorKind::Decode)?;
        Ok((final_url, body))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<Page> {
        let generation = self.session.generation().await;
        let (final_url, body) = self.get(url).await?;
        if !is_login_wall(&final_url) {
            debug!(%final_url, bytes = body.len(), "fetched");
            return Ok(Page {
                url: url.to_string(),
                final_url,
                body,
                restricted: false,
            });
        }
        if !self.session.has_credentials() {
            exn::bail!(ErrorKind::AuthRequired);
        }
        let logged_in = self.session.is_logged_in().await;
        debug!(logged_in, "hit the AO3 login wall, authenticating");
        self.session.login(&self.client, generation).await.or_raise(|| ErrorKind::AuthRequired)?;
        let (final_url, body) = self.get(url).await?;
        if is_login_wall(&final_url) {
            warn!("still restricted after logging in");
            exn::bail!(ErrorKind::AuthRequired);
        }
        Ok(Page {
            url: url.to_string(),
            final_url,
            body,
            restricted: true,
        })
    }
}

/// Where AO3 sends anonymous visitors of a restricted work or series:
/// `/users/login?restricted=true`, on any AO3 host and with any other query
/// parameters.
fn is_login_wall(final_url: &str) -> bool {
    let Ok(url) = Url::parse(final_url) else {
        return false;
    };
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    host.trim_start_matches("www.") == "archiveofourown.org"
        && url.path().trim_end_matches('/') == "/users/login"
        && url.query_pairs().any(|(key, value)| key == "restricted" && value == "true")
}

/// Classifies transport failures; timeouts are reported separately.
fn transport<T>(result: reqwest::Result<T>) -> Result<T> {
    let kind = match &result {
        Err(err) if err.is_timeout() => ErrorKind::Timeout,
        _ => ErrorKind::Network,
    };
    result.or_raise(|| kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://archiveofourown.org/users/login?restricted=true", true)]
    #[case("https://www.archiveofourown.org/users/login?restricted=true", true)]
    #[case("https://archiveofourown.org/users/login/?restricted=true&return_to=%2Fworks%2F1", true)]
    #[case("https://archiveofourown.org/users/login?return_to=%2Fworks%2F1&restricted=true", true)]
    #[case("https://archiveofourown.org/users/login", false)]
    #[case("https://archiveofourown.org/users/login?restricted=false", false)]
    #[case("https://archiveofourown.org/works/1?restricted=true", false)]
    #[case("https://example.com/users/login?restricted=true", false)]
    #[case("not a url", false)]
    fn login_wall(#[case] url: &str, #[case] expected: bool) {
        assert_eq!(is_login_wall(url), expected);
    }

    #[test]
    fn builds_client() {
        let fetcher = HttpFetcher::new(HttpConfig::default()).unwrap();
        assert_eq!(fetcher.name(), "http");
        assert!(!fetcher.session.has_credentials());
    }
}
