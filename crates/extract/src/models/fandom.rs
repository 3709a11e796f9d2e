use std::fmt::{Display, Formatter, Result as FmtResult};

/// A fandom tag associated with a work.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fandom {
    /// Fandom name as it appears on the site
    pub name: String,
}
impl From<String> for Fandom {
    fn from(name: String) -> Self {
        Self { name }
    }
}
impl From<&str> for Fandom {
    fn from(name: &str) -> Self {
        Self { name: name.to_string() }
    }
}
impl AsRef<str> for Fandom {
    fn as_ref(&self) -> &str {
        &self.name
    }
}
impl Display for Fandom {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.name)
    }
}
