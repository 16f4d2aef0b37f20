// src/extract/mod.rs

use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use tracing::info;

use crate::config::Settings;
use crate::error::Result;
use crate::fetch::Session;

pub mod archive;
pub mod pep;
pub mod status;
pub mod versions;
pub mod whats_new;

/// A fixed-arity output row with a static header.
pub trait Record {
    fn header() -> &'static [&'static str];
    fn fields(&self) -> Vec<String>;
}

/// One "What's New" article.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseNote {
    pub link: String,
    pub title: String,
    pub summary: String,
}

impl Record for ReleaseNote {
    fn header() -> &'static [&'static str] {
        &["Article link", "Title", "Editor, author"]
    }

    fn fields(&self) -> Vec<String> {
        vec![self.link.clone(), self.title.clone(), self.summary.clone()]
    }
}

/// One documentation version from the sidebar.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionStatus {
    pub link: String,
    pub version: String,
    pub status: String,
}

impl Record for VersionStatus {
    fn header() -> &'static [&'static str] {
        &["Documentation link", "Version", "Status"]
    }

    fn fields(&self) -> Vec<String> {
        vec![self.link.clone(), self.version.clone(), self.status.clone()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
}

impl Record for StatusCount {
    fn header() -> &'static [&'static str] {
        &["Status", "Count"]
    }

    fn fields(&self) -> Vec<String> {
        vec![self.status.clone(), self.count.to_string()]
    }
}

/// Header row first, then one row per record.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn from_records<R: Record>(records: &[R]) -> Self {
        let header = R::header().iter().map(|h| h.to_string()).collect();
        let mut rows = Vec::with_capacity(records.len() + 1);
        rows.push(header);
        rows.extend(records.iter().map(R::fields));
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn header(&self) -> &[String] {
        &self.rows[0]
    }

    pub fn body(&self) -> &[Vec<String>] {
        &self.rows[1..]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    WhatsNew,
    LatestVersions,
    Download,
    Pep,
}

/// The mode's command-line name, e.g. `latest-versions`.
impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_possible_value() {
            Some(value) => f.write_str(value.get_name()),
            None => write!(f, "{:?}", self),
        }
    }
}

/// Run one extractor. The download mode persists its archive and yields no table.
pub async fn run_mode(mode: Mode, session: &Session, settings: &Settings) -> Result<Option<Table>> {
    info!(mode = %mode, "extracting");
    let table = match mode {
        Mode::WhatsNew => whats_new::whats_new(session, &settings.sources)
            .await?
            .map(|notes| Table::from_records(&notes)),
        Mode::LatestVersions => versions::latest_versions(session, &settings.sources)
            .await?
            .map(|versions| Table::from_records(&versions)),
        Mode::Download => {
            archive::download(session, &settings.sources, settings.dirs.downloads()).await?;
            None
        }
        Mode::Pep => pep::pep(session, &settings.sources, &settings.statuses)
            .await?
            .map(|counts| Table::from_records(&counts)),
    };
    Ok(table)
}

pub(crate) fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    pb
}
