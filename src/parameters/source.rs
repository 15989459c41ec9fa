use std::{
    convert::Infallible,
    fmt::{Display, Formatter},
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

use ureq::Agent;

use crate::prelude::*;

/// Where a parameter table or document is read from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Source {
    /// Fetched over HTTP, for example a spreadsheet CSV export link.
    Url(String),

    Path(PathBuf),
}

impl FromStr for Source {
    type Err = Infallible;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        if text.starts_with("http://") || text.starts_with("https://") {
            Ok(Self::Url(text.to_owned()))
        } else {
            Ok(Self::Path(PathBuf::from(text)))
        }
    }
}

impl Display for Source {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

impl Source {
    /// Read the whole source as text.
    pub fn fetch(&self) -> Result<String> {
        String::from_utf8(self.fetch_bytes()?)
            .with_context(|| format!("`{self}` is not UTF-8 text"))
    }

    /// Read the whole source as raw bytes.
    #[instrument(skip_all, fields(source = %self))]
    pub fn fetch_bytes(&self) -> Result<Vec<u8>> {
        let bytes = match self {
            Self::Path(path) => std::fs::read(path)
                .with_context(|| format!("failed to read `{}`", path.display()))?,
            Self::Url(url) => {
                info!("fetching…");
                let agent: Agent = Agent::config_builder()
                    .timeout_global(Some(Duration::from_secs(10)))
                    .build()
                    .into();
                agent
                    .get(url)
                    .call()
                    .with_context(|| format!("failed to request `{url}`"))?
                    .body_mut()
                    .read_to_vec()
                    .with_context(|| format!("failed to read the response from `{url}`"))?
            }
        };
        debug!(len = bytes.len(), "fetched");
        Ok(bytes)
    }
}
