use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::StreamError;

/// Resolved `file:///absolute/path` locator.
///
/// URI forms and their support:
///
/// ```text
/// file:///path       yes
/// file:/path         no
/// file://host/path   no
/// file://./path      no
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    uri: String,
    path: PathBuf,
}

const FILE_SCHEME: &str = "file://";

impl Locator {
    pub fn parse(uri: &str) -> Result<Self, StreamError> {
        let path = uri
            .strip_prefix(FILE_SCHEME)
            .filter(|rest| rest.starts_with('/'))
            .ok_or_else(|| StreamError::UnsupportedLocator {
                locator: uri.to_string(),
            })?;

        Ok(Self {
            uri: uri.to_string(),
            path: PathBuf::from(path),
        })
    }

    /// The locator exactly as given.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}
