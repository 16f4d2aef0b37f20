// src/extract/versions.rs

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use tracing::{error, warn};

use super::VersionStatus;
use crate::config::Sources;
use crate::error::{Error, Result};
use crate::fetch::{fetch_page, Session};
use crate::html::{attr, find_all, find_in, text, TagQuery};

const ALL_VERSIONS_MARKER: &str = "All versions";

static VERSION_STATUS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Python (?P<version>\d\.\d+) \((?P<status>.*)\)")
        .expect("VERSION_STATUS_RE should compile")
});

/// `"Python 3.9 (stable)"` → `("3.9", "stable")`; anything else is all version, no status.
pub fn parse_version_status(label: &str) -> (String, String) {
    match VERSION_STATUS_RE.captures(label) {
        Some(caps) => (caps["version"].to_string(), caps["status"].to_string()),
        None => (label.to_string(), String::new()),
    }
}

/// Every entry of the sidebar list that carries the "All versions" marker.
///
/// Lists without the marker are passed over; only a sidebar where no list has it is
/// an error, since the page layout has then changed under us.
pub fn parse_versions(page: &str) -> Result<Vec<VersionStatus>> {
    let doc = Html::parse_document(page);
    let sidebar = find_in(
        &doc,
        &TagQuery::new("div").attr("class", "sphinxsidebarwrapper"),
    )?;

    let Some(list) = find_all(sidebar, &TagQuery::new("ul"))
        .into_iter()
        .find(|ul| text(*ul).contains(ALL_VERSIONS_MARKER))
    else {
        error!(marker = ALL_VERSIONS_MARKER, "no sidebar list holds the version marker");
        return Err(Error::MarkerNotFound {
            marker: ALL_VERSIONS_MARKER.to_string(),
        });
    };

    let mut versions = Vec::new();
    for a in find_all(list, &TagQuery::new("a")) {
        let link = match attr(a, "href") {
            Ok(href) => href.to_string(),
            Err(e) => {
                warn!(error = %e, "skipping anchor");
                continue;
            }
        };
        let (version, status) = parse_version_status(&text(a));
        versions.push(VersionStatus {
            link,
            version,
            status,
        });
    }
    Ok(versions)
}

/// Documentation versions and their support status from the main docs sidebar.
/// `None` when the page cannot be fetched.
pub async fn latest_versions(
    session: &Session,
    sources: &Sources,
) -> Result<Option<Vec<VersionStatus>>> {
    let Some(page) = fetch_page(session, &sources.doc_url).await else {
        return Ok(None);
    };
    parse_versions(&page).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIDEBAR: &str = r#"<html><body>
      <div class="sphinxsidebar"><div class="sphinxsidebarwrapper">
        <h3>Navigation</h3>
        <ul><li><a href="genindex.html">Index</a></li></ul>
        <h3>Docs by version</h3>
        <ul>
          <li><a href="https://docs.python.org/3.14/">Python 3.14 (in development)</a></li>
          <li><a href="https://docs.python.org/3.13/">Python 3.13 (stable)</a></li>
          <li><a href="https://docs.python.org/3.12/">Python 3.12 (security-fixes)</a></li>
          <li><a href="https://docs.python.org/2.7/">Python 2.7 (EOL)</a></li>
          <li><a href="https://www.python.org/doc/versions/">All versions</a></li>
        </ul>
      </div></div>
    </body></html>"#;

    #[test]
    fn splits_version_and_status() {
        assert_eq!(
            parse_version_status("Python 3.9 (stable)"),
            ("3.9".to_string(), "stable".to_string())
        );
        assert_eq!(
            parse_version_status("Python 3.14 (in development)"),
            ("3.14".to_string(), "in development".to_string())
        );
        assert_eq!(
            parse_version_status("Legacy"),
            ("Legacy".to_string(), String::new())
        );
    }

    #[test]
    fn marker_list_need_not_be_first() {
        let versions = parse_versions(SIDEBAR).unwrap();
        assert_eq!(versions.len(), 5);
        assert_eq!(
            versions[1],
            VersionStatus {
                link: "https://docs.python.org/3.13/".into(),
                version: "3.13".into(),
                status: "stable".into(),
            }
        );
        assert_eq!(versions[4].version, "All versions");
        assert_eq!(versions[4].status, "");
    }

    #[test]
    fn missing_marker_is_structural_failure() {
        let page = SIDEBAR.replace("All versions", "Other resources");
        assert!(matches!(
            parse_versions(&page),
            Err(Error::MarkerNotFound { .. })
        ));
    }

    #[test]
    fn missing_sidebar_is_not_found() {
        let err = parse_versions("<html><body><ul><li>All versions</li></ul></body></html>")
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
