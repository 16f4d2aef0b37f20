// src/extract/pep.rs

use scraper::{ElementRef, Html};
use tracing::{error, info, warn};
use url::Url;

use super::progress_bar;
use super::status::{ExpectedStatuses, StatusCheck, StatusTally};
use super::StatusCount;
use crate::config::Sources;
use crate::error::Result;
use crate::fetch::{fetch_page, Session};
use crate::html::{attr, find, find_all, find_in, labelled_value, resolve, text, TagQuery};

/// One row of the PEP numerical index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    /// Status letter from the first cell, type letter dropped. Empty for drafts.
    pub code: String,
    pub link: Url,
}

fn index_entry(row: ElementRef<'_>, base: &Url) -> Result<IndexEntry> {
    let cell = find(row, &TagQuery::new("td"))?;
    let code = text(cell).chars().skip(1).collect();
    let a = find(
        row,
        &TagQuery::new("a").attr("class", "pep reference internal"),
    )?;
    Ok(IndexEntry {
        code,
        link: resolve(base, attr(a, "href")?)?,
    })
}

/// Rows of the numerical index table. Rows missing their cells or with a broken link
/// are skipped.
pub fn index_entries(page: &str, base: &Url) -> Result<Vec<IndexEntry>> {
    let doc = Html::parse_document(page);
    let content = find_in(&doc, &TagQuery::new("section").attr("id", "pep-content"))?;
    let numerical = find(content, &TagQuery::new("section").attr("id", "numerical-index"))?;
    let tbody = find(numerical, &TagQuery::new("tbody"))?;

    let mut entries = Vec::new();
    for row in find_all(tbody, &TagQuery::new("tr")) {
        match index_entry(row, base) {
            Ok(entry) => entries.push(entry),
            Err(e) if e.is_item_local() => warn!(error = %e, "skipping index row"),
            Err(e) => return Err(e),
        }
    }
    Ok(entries)
}

/// The value after the "Status" label in a PEP's header block.
pub fn detail_status(page: &str) -> Result<String> {
    let doc = Html::parse_document(page);
    let content = find_in(&doc, &TagQuery::new("section").attr("id", "pep-content"))?;
    let fields = find(content, &TagQuery::new("dl"))?;
    Ok(text(labelled_value(fields, "Status")?))
}

/// Count `pep_status` only when it agrees with the index letter.
pub fn record_status(
    tally: &mut StatusTally,
    statuses: &ExpectedStatuses,
    code: &str,
    pep_status: &str,
) -> StatusCheck {
    let check = statuses.check(code, pep_status);
    if check == StatusCheck::Consistent {
        tally.record(pep_status);
    }
    check
}

/// Tally of PEP statuses, read from each PEP's own page and cross-checked against
/// the letter shown in the index. Mismatched PEPs are logged and left out.
///
/// `None` when the index page cannot be fetched.
pub async fn pep(
    session: &Session,
    sources: &Sources,
    statuses: &ExpectedStatuses,
) -> Result<Option<Vec<StatusCount>>> {
    let Some(page) = fetch_page(session, &sources.pep_url).await else {
        return Ok(None);
    };
    let entries = index_entries(&page, &sources.pep_url)?;

    let pb = progress_bar(entries.len());
    let mut tally = StatusTally::default();
    let mut mismatches = 0usize;
    for entry in entries {
        pb.inc(1);
        let Some(detail) = fetch_page(session, &entry.link).await else {
            continue;
        };
        let pep_status = match detail_status(&detail) {
            Ok(s) => s,
            Err(e) if e.is_item_local() => {
                warn!(link = %entry.link, error = %e, "skipping PEP");
                continue;
            }
            Err(e) => return Err(e),
        };

        if let StatusCheck::Violation(mismatch) =
            record_status(&mut tally, statuses, &entry.code, &pep_status)
        {
            mismatches += 1;
            error!(link = %entry.link, "{}", mismatch);
        }
    }
    pb.finish_and_clear();

    info!(counted = tally.total(), mismatches, "tallied PEP statuses");
    Ok(Some(tally.finish()))
}
