//! Scrapes the Python documentation and PEP index into small tables: release
//! notes, documentation versions, PEP status tallies, and the A4 PDF archive.

pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod html;
pub mod logging;
pub mod output;

pub use config::{Dirs, Settings, Sources};
pub use error::{Error, FetchError, Result};
pub use extract::{run_mode, Mode, Table};
pub use fetch::{fetch_page, PageCache, RetryPolicy, Session};
