use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use reqwest::Client;
use scraper::{Html, Selector};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::LazyLock;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument};

const LOGIN_URL: &str = "https://archiveofourown.org/users/login";

static TOKEN_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("input[name='authenticity_token']").unwrap());

/// AO3 account used to read restricted works.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}
impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}
impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Credentials").field("username", &self.username).field("password", &"<redacted>").finish()
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct SessionState {
    logged_in: bool,
    /// Bumped by every successful login.
    generation: u64,
}

/// The process-wide AO3 login.
///
/// Readers only ever take the state lock briefly; logins are serialized by a
/// separate mutex so concurrent requests that all hit a login wall trigger a
/// single re-authentication.
#[derive(Debug)]
pub(crate) struct Session {
    credentials: Option<Credentials>,
    state: RwLock<SessionState>,
    login: Mutex<()>,
}
impl Session {
    pub(crate) fn new(credentials: Option<Credentials>) -> Self {
        Self {
            credentials,
            state: RwLock::new(SessionState::default()),
            login: Mutex::new(()),
        }
    }

    pub(crate) fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    pub(crate) async fn generation(&self) -> u64 {
        self.state.read().await.generation
    }

    pub(crate) async fn is_logged_in(&self) -> bool {
        self.state.read().await.logged_in
    }

    /// Logs in unless another request already did so since `seen` (the
    /// generation observed before the request that hit the login wall).
    #[instrument(skip(self, client))]
    pub(crate) async fn login(&self, client: &Client, seen: u64) -> Result<()> {
        let credentials = self.credentials.as_ref().ok_or_raise(|| ErrorKind::AuthRequired)?;
        let _guard = self.login.lock().await;
        if self.state.read().await.generation > seen {
            debug!("session refreshed by a concurrent request");
            return Ok(());
        }
        let form = client.get(LOGIN_URL).send().await.or_raise(|| ErrorKind::Login)?;
        let form = form.text().await.or_raise(|| ErrorKind::Login)?;
        let token = authenticity_token(&form).ok_or_raise(|| ErrorKind::Login)?;
        let response = client
            .post(LOGIN_URL)
            .form(&[
                ("authenticity_token", token.as_str()),
                ("user[login]", credentials.username.as_str()),
                ("user[password]", credentials.password.as_str()),
                ("user[remember_me]", "1"),
                ("commit", "Log in"),
            ])
            .send()
            .await
            .or_raise(|| ErrorKind::Login)?;
        // A failed login re-renders the form instead of redirecting away.
        if !response.status().is_success() || response.url().path().starts_with("/users/login") {
            let mut state = self.state.write().await;
            state.logged_in = false;
            exn::bail!(ErrorKind::Login);
        }
        let mut state = self.state.write().await;
        state.logged_in = true;
        state.generation += 1;
        info!(username = %credentials.username, "logged in to AO3");
        Ok(())
    }
}

fn authenticity_token(html: &str) -> Option<String> {
    Html::parse_document(html)
        .select(&TOKEN_SELECTOR)
        .find_map(|input| input.value().attr("value"))
        .map(str::to_string)
        .filter(|token| !token.is_empty())
}
