// src/extract/whats_new.rs

use scraper::{ElementRef, Html};
use tracing::{info, warn};
use url::Url;

use super::{progress_bar, ReleaseNote};
use crate::config::Sources;
use crate::error::Result;
use crate::fetch::{fetch_page, Session};
use crate::html::{attr, find, find_all, find_in, resolve, text, TagQuery};

/// Absolute link of one changelog entry in the "What's New" table of contents.
fn item_link(item: ElementRef<'_>, base: &Url) -> Result<Url> {
    let a = find(item, &TagQuery::new("a"))?;
    resolve(base, attr(a, "href")?)
}

/// Links to every per-version article, in document order.
fn article_links(page: &str, base: &Url) -> Result<Vec<Url>> {
    let doc = Html::parse_document(page);
    let main = find_in(&doc, &TagQuery::new("section").attr("id", "what-s-new-in-python"))?;
    let toc = find(main, &TagQuery::new("div").attr("class", "toctree-wrapper"))?;

    let mut links = Vec::new();
    for item in find_all(toc, &TagQuery::new("li").attr("class", "toctree-l1")) {
        match item_link(item, base) {
            Ok(link) => links.push(link),
            Err(e) if e.is_item_local() => warn!(error = %e, "skipping entry"),
            Err(e) => return Err(e),
        }
    }
    Ok(links)
}

/// Heading plus the first definition list, line breaks flattened.
fn parse_note(page: &str, link: &Url) -> Result<ReleaseNote> {
    let doc = Html::parse_document(page);
    let h1 = find_in(&doc, &TagQuery::new("h1"))?;
    let dl = find_in(&doc, &TagQuery::new("dl"))?;
    Ok(ReleaseNote {
        link: link.to_string(),
        title: text(h1),
        summary: text(dl).replace('\n', " "),
    })
}

/// Title and editors of every "What's New In Python X.Y" article.
///
/// `None` when the index page itself cannot be fetched. Articles that fail to load
/// or lack the expected markup are skipped.
pub async fn whats_new(session: &Session, sources: &Sources) -> Result<Option<Vec<ReleaseNote>>> {
    let index_url = sources.doc_url.join("whatsnew/")?;
    let Some(page) = fetch_page(session, &index_url).await else {
        return Ok(None);
    };
    let links = article_links(&page, &index_url)?;

    let pb = progress_bar(links.len());
    let mut notes = Vec::with_capacity(links.len());
    for link in links {
        pb.inc(1);
        let Some(article) = fetch_page(session, &link).await else {
            continue;
        };
        match parse_note(&article, &link) {
            Ok(note) => notes.push(note),
            Err(e) if e.is_item_local() => warn!(%link, error = %e, "skipping article"),
            Err(e) => return Err(e),
        }
    }
    pb.finish_and_clear();

    info!(articles = notes.len(), "collected release notes");
    Ok(Some(notes))
}
