// src/extract/archive.rs

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use std::path::{Path, PathBuf};
use tracing::info;
use url::Url;

use crate::config::Sources;
use crate::error::Result;
use crate::fetch::{download_to_dir, fetch_page, Session};
use crate::html::{attr, find, find_in, resolve, TagQuery};

static PDF_A4_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r".+pdf-a4\.zip$").expect("PDF_A4_RE should compile"));

/// Absolute URL of the A4 PDF archive listed on the downloads page.
pub fn archive_url(page: &str, base: &Url) -> Result<Url> {
    let doc = Html::parse_document(page);
    let main = find_in(&doc, &TagQuery::new("div").attr("role", "main"))?;
    let table = find(main, &TagQuery::new("table").attr("class", "docutils"))?;
    let a = find(
        table,
        &TagQuery::new("a").attr_pattern("href", PDF_A4_RE.clone()),
    )?;
    resolve(base, attr(a, "href")?)
}

/// Save the A4 PDF documentation archive into `dest_dir`.
///
/// Returns the saved path, or `None` when the downloads page could not be fetched.
/// A failure fetching the archive itself is an error.
pub async fn download(
    session: &Session,
    sources: &Sources,
    dest_dir: impl AsRef<Path>,
) -> Result<Option<PathBuf>> {
    let downloads_url = sources.doc_url.join("download.html")?;
    let Some(page) = fetch_page(session, &downloads_url).await else {
        return Ok(None);
    };
    let url = archive_url(&page, &downloads_url)?;

    let path = download_to_dir(session, &url, dest_dir).await?;
    info!(path = %path.display(), "archive saved");
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::RetryPolicy;
    use reqwest::Client;
    use tempfile::tempdir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DOWNLOADS: &str = r#"<html><body>
      <div class="body" role="main">
        <h1>Download Python documentation</h1>
        <table class="docutils align-default">
          <tr><td>PDF (US-Letter paper size)</td>
              <td><a class="reference external" href="archives/python-3.13-docs-pdf-letter.zip">Download</a></td></tr>
          <tr><td>PDF (A4 paper size)</td>
              <td><a class="reference external" href="archives/python-3.13-docs-pdf-a4.zip">Download</a></td></tr>
        </table>
      </div>
    </body></html>"#;

    #[test]
    fn picks_the_a4_archive() {
        let base = Url::parse("https://docs.python.org/3/download.html").unwrap();
        let url = archive_url(DOWNLOADS, &base).unwrap();
        assert_eq!(
            url.as_str(),
            "https://docs.python.org/3/archives/python-3.13-docs-pdf-a4.zip"
        );
    }

    #[test]
    fn page_without_a4_link_fails() {
        let base = Url::parse("https://docs.python.org/3/download.html").unwrap();
        let page = DOWNLOADS.replace("pdf-a4.zip", "pdf-a4.tar.bz2");
        assert!(archive_url(&page, &base).unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn downloads_archive_into_directory() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/download.html"))
            .respond_with(ResponseTemplate::new(200).set_body_string(DOWNLOADS))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/3/archives/python-3.13-docs-pdf-a4.zip"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK\x03\x04zip".to_vec()))
            .mount(&server)
            .await;

        let tmp = tempdir().unwrap();
        let session = Session::new(Client::new(), None, RetryPolicy::none());
        let sources = Sources::new(&format!("{}/3/", server.uri()), &server.uri()).unwrap();

        let saved = download(&session, &sources, tmp.path().join("downloads"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            saved,
            tmp.path().join("downloads").join("python-3.13-docs-pdf-a4.zip")
        );
        assert_eq!(std::fs::read(&saved).unwrap(), b"PK\x03\x04zip");
    }

    #[tokio::test]
    async fn unreachable_downloads_page_yields_none() {
        let server = MockServer::start().await;
        let tmp = tempdir().unwrap();
        let session = Session::new(Client::new(), None, RetryPolicy::none());
        let sources = Sources::new(&format!("{}/3/", server.uri()), &server.uri()).unwrap();
        assert!(download(&session, &sources, tmp.path()).await.unwrap().is_none());
    }
}
