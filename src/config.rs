// src/config.rs

use std::path::PathBuf;
use url::Url;

use crate::error::Result;
use crate::extract::status::ExpectedStatuses;

pub const MAIN_DOC_URL: &str = "https://docs.python.org/3/";
pub const PEP_URL: &str = "https://peps.python.org/";

/// Where the pages come from.
#[derive(Debug, Clone)]
pub struct Sources {
    pub doc_url: Url,
    pub pep_url: Url,
}

impl Sources {
    /// Both URLs are treated as directories: a missing trailing slash is added so
    /// relative links resolve beneath them.
    pub fn new(doc_url: &str, pep_url: &str) -> Result<Self> {
        Ok(Self {
            doc_url: as_directory(Url::parse(doc_url)?),
            pep_url: as_directory(Url::parse(pep_url)?),
        })
    }
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            doc_url: Url::parse(MAIN_DOC_URL).expect("MAIN_DOC_URL is a valid url"),
            pep_url: Url::parse(PEP_URL).expect("PEP_URL is a valid url"),
        }
    }
}

fn as_directory(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Run-relative output layout.
#[derive(Debug, Clone)]
pub struct Dirs {
    base: PathBuf,
}

impl Dirs {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn downloads(&self) -> PathBuf {
        self.base.join("downloads")
    }

    pub fn results(&self) -> PathBuf {
        self.base.join("results")
    }

    pub fn logs(&self) -> PathBuf {
        self.base.join("logs")
    }

    pub fn cache(&self) -> PathBuf {
        self.base.join("cache")
    }
}

impl Default for Dirs {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Immutable run configuration threaded into every extractor.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub sources: Sources,
    pub statuses: ExpectedStatuses,
    pub dirs: Dirs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_gain_a_trailing_slash() {
        let sources = Sources::new("http://127.0.0.1:8080/3", "http://127.0.0.1:8080/peps/").unwrap();
        assert_eq!(sources.doc_url.as_str(), "http://127.0.0.1:8080/3/");
        assert_eq!(
            sources.doc_url.join("whatsnew/").unwrap().as_str(),
            "http://127.0.0.1:8080/3/whatsnew/"
        );
        assert_eq!(sources.pep_url.as_str(), "http://127.0.0.1:8080/peps/");
    }

    #[test]
    fn rejects_garbage_urls() {
        assert!(Sources::new("not a url", PEP_URL).is_err());
    }

    #[test]
    fn layout_hangs_off_base() {
        let dirs = Dirs::new("/tmp/run");
        assert_eq!(dirs.downloads(), PathBuf::from("/tmp/run/downloads"));
        assert_eq!(dirs.results(), PathBuf::from("/tmp/run/results"));
        assert_eq!(dirs.logs(), PathBuf::from("/tmp/run/logs"));
        assert_eq!(dirs.cache(), PathBuf::from("/tmp/run/cache"));
    }
}
