//! Layered configuration.
//!
//! Loading precedence (highest wins):
//! 1. Environment variables prefixed with `ABSTRACTOR_` (nested keys joined
//!    with `__`, e.g. `ABSTRACTOR_AO3__USERNAME`)
//! 2. The configuration file: an explicit path (TOML, YAML or JSON by
//!    extension), otherwise `config.toml` in the platform config directory
//! 3. Built-in defaults

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

pub const ENV_PREFIX: &str = "ABSTRACTOR_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Most summaries posted for a single message.
    pub max_links: usize,
    /// Marker that, placed directly before a link, suppresses its summary.
    pub prefix: String,
    pub user_agent: String,
    /// HTTP request timeout, in seconds.
    pub timeout: u64,
    /// FicHub metadata endpoint.
    pub fichub_api: String,
    pub ao3: Ao3Config,
}

/// AO3 account used to read restricted works.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ao3Config {
    pub username: Option<String>,
    pub password: Option<String>,
}
impl std::fmt::Debug for Ao3Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ao3Config")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_links: 3,
            prefix: "!".to_string(),
            user_agent: "fanfiction-abstractor-bot".to_string(),
            timeout: 30,
            fichub_api: "https://fichub.net/api/v0/epub".to_string(),
            ao3: Ao3Config::default(),
        }
    }
}

impl Config {
    /// `config.toml` in the platform configuration directory.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "abstractor").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Builds the layered [`Figment`] without extracting it.
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        match path {
            Some(path) => {
                figment = match path.extension().and_then(|ext| ext.to_str()) {
                    Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
                    Some("json") => figment.merge(Json::file(path)),
                    _ => figment.merge(Toml::file(path)),
                }
            },
            None => {
                if let Some(path) = Self::default_path() {
                    figment = figment.merge(Toml::file(path));
                }
            },
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads and validates the configuration.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::Load`] if an explicit file does not exist or any source
    ///   cannot be parsed
    /// - [`ErrorKind::Invalid`] naming the first setting that fails validation
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path
            && !path.is_file()
        {
            exn::bail!(ErrorKind::Load);
        }
        Self::from_figment(Self::figment(path))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        debug!(?config, "configuration loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_links == 0 {
            exn::bail!(ErrorKind::Invalid("max_links"));
        }
        if self.prefix.is_empty() || self.prefix.chars().any(char::is_whitespace) {
            exn::bail!(ErrorKind::Invalid("prefix"));
        }
        if self.user_agent.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("user_agent"));
        }
        if self.timeout == 0 {
            exn::bail!(ErrorKind::Invalid("timeout"));
        }
        if !(self.fichub_api.starts_with("https://") || self.fichub_api.starts_with("http://")) {
            exn::bail!(ErrorKind::Invalid("fichub_api"));
        }
        if self.ao3.username.is_some() != self.ao3.password.is_some() {
            exn::bail!(ErrorKind::Invalid("ao3"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Username and password, when both are configured.
    pub fn ao3_credentials(&self) -> Option<(&str, &str)> {
        self.ao3.username.as_deref().zip(self.ao3.password.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.max_links, 3);
        assert_eq!(config.prefix, "!");
        assert_eq!(config.user_agent, "fanfiction-abstractor-bot");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.fichub_api, "https://fichub.net/api/v0/epub");
        assert_eq!(config.ao3_credentials(), None);
        config.validate().unwrap();
    }

    #[rstest]
    #[case(".toml", "max_links = 5\nprefix = \"?\"\n[ao3]\nusername = \"reader\"\npassword = \"secret\"\n")]
    #[case(".yaml", "max_links: 5\nprefix: \"?\"\nao3:\n  username: reader\n  password: secret\n")]
    #[case(".json", r#"{"max_links": 5, "prefix": "?", "ao3": {"username": "reader", "password": "secret"}}"#)]
    fn file_formats(#[case] suffix: &str, #[case] contents: &str) {
        let file = file_with(suffix, contents);
        // Inside a jail so environment overrides set by other tests can't leak in.
        Jail::expect_with(|_jail| {
            let config = Config::from_figment(Config::figment(Some(file.path()))).unwrap();
            assert_eq!(config.max_links, 5);
            assert_eq!(config.prefix, "?");
            assert_eq!(config.timeout, 30);
            assert_eq!(config.ao3_credentials(), Some(("reader", "secret")));
            Ok(())
        });
    }

    #[test]
    fn missing_explicit_file() {
        let err = Config::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Load));
    }

    #[test]
    fn malformed_file() {
        let file = file_with(".toml", "max_links = \"many\"");
        Jail::expect_with(|_jail| {
            let err = Config::from_figment(Config::figment(Some(file.path()))).unwrap_err();
            assert!(matches!(&*err, ErrorKind::Load));
            Ok(())
        });
    }

    #[rstest]
    #[case(Config { max_links: 0, ..Config::default() }, "max_links")]
    #[case(Config { prefix: String::new(), ..Config::default() }, "prefix")]
    #[case(Config { prefix: "! ".into(), ..Config::default() }, "prefix")]
    #[case(Config { timeout: 0, ..Config::default() }, "timeout")]
    #[case(Config { user_agent: " ".into(), ..Config::default() }, "user_agent")]
    #[case(Config { fichub_api: "fichub.net".into(), ..Config::default() }, "fichub_api")]
    #[case(Config { ao3: Ao3Config { username: Some("reader".into()), password: None }, ..Config::default() }, "ao3")]
    fn invalid(#[case] config: Config, #[case] key: &str) {
        let err = config.validate().unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid(k) if *k == key));
    }

    #[test]
    fn environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("abstractor.toml", "max_links = 5\nprefix = \"?\"")?;
            jail.set_env("ABSTRACTOR_MAX_LINKS", "7");
            jail.set_env("ABSTRACTOR_AO3__USERNAME", "reader");
            jail.set_env("ABSTRACTOR_AO3__PASSWORD", "secret");
            let config = Config::from_figment(Config::figment(Some(Path::new("abstractor.toml")))).unwrap();
            assert_eq!(config.max_links, 7);
            assert_eq!(config.prefix, "?");
            assert_eq!(config.ao3_credentials(), Some(("reader", "secret")));
            Ok(())
        });
    }

    #[test]
    fn password_is_not_logged() {
        let config = Config {
            ao3: Ao3Config { username: Some("reader".into()), password: Some("hunter2".into()) },
            ..Config::default()
        };
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
