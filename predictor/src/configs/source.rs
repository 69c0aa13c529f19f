use std::{fmt, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::{PredictorError, Result};

/// Where the property table comes from. Also the identity under which a loaded table is cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// The small sample table compiled into the binary.
    #[default]
    Embedded,
    /// A CSV file on disk.
    Local { path: PathBuf },
    /// A CSV file fetched over HTTP(S) with a single GET.
    Remote { url: String },
}

impl SourceConfig {
    /// Checks the source can be attempted at all.
    ///
    /// # Returns
    /// An error for an empty path or a url that isn't http(s).
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Embedded => Ok(()),
            Self::Local { path } if path.as_os_str().is_empty() => Err(
                PredictorError::InvalidConfig("local source path must not be empty".into()),
            ),
            Self::Local { .. } => Ok(()),
            Self::Remote { url } => {
                let parsed = reqwest::Url::parse(url)
                    .map_err(|e| PredictorError::InvalidConfig(format!("invalid url {url}: {e}")))?;

                match parsed.scheme() {
                    "http" | "https" => Ok(()),
                    scheme => Err(PredictorError::InvalidConfig(format!(
                        "unsupported url scheme {scheme}, expected http or https"
                    ))),
                }
            }
        }
    }
}

impl fmt::Display for SourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embedded => write!(f, "embedded sample"),
            Self::Local { path } => write!(f, "{}", path.display()),
            Self::Remote { url } => write!(f, "{url}"),
        }
    }
}
