use std::fmt::{Display, Formatter, Result as FmtResult};

/// A credited author of a work or series.
///
/// AO3 distinguishes an account (`username`) from the pseudonym a work is
/// published under; other sites only ever populate `username`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Author {
    pub username: String,
    /// Display name, only kept when it differs from the username.
    pub pseudonym: Option<String>,
}
impl Author {
    pub fn new<P: Into<String>>(username: impl Into<String>, pseudonym: Option<P>) -> Self {
        let username = username.into();
        let pseudonym = pseudonym.map(Into::into).filter(|p: &String| *p != username);
        Self { username, pseudonym }
    }
}
impl From<String> for Author {
    fn from(username: String) -> Self {
        Self::new(username, None::<String>)
    }
}
impl From<&str> for Author {
    fn from(username: &str) -> Self {
        Self::new(username, None::<String>)
    }
}
impl<U: Into<String>, P: Into<String>> From<(U, Option<P>)> for Author {
    fn from((username, pseudonym): (U, Option<P>)) -> Self {
        Self::new(username, pseudonym)
    }
}
impl Display for Author {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.pseudonym {
            Some(pseud) => write!(f, "{} ({})", pseud, self.username),
            None => write!(f, "{}", self.username),
        }
    }
}
