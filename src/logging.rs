// src/logging.rs

use std::{
    fs::{self, OpenOptions},
    io,
    path::Path,
    sync::Mutex,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE: &str = "parser.log";
const MAX_LOG_BYTES: u64 = 1_000_000;
const BACKUP_COUNT: usize = 5;

/// Shift `parser.log` → `parser.log.1` → … → `parser.log.5` once it outgrows the limit.
pub fn rotate(log_dir: &Path) -> io::Result<()> {
    let current = log_dir.join(LOG_FILE);
    match fs::metadata(&current) {
        Ok(meta) if meta.len() > MAX_LOG_BYTES => {}
        _ => return Ok(()),
    }

    let backup = |i: usize| log_dir.join(format!("{}.{}", LOG_FILE, i));
    let oldest = backup(BACKUP_COUNT);
    if oldest.exists() {
        fs::remove_file(&oldest)?;
    }
    for i in (1..BACKUP_COUNT).rev() {
        let from = backup(i);
        if from.exists() {
            fs::rename(&from, backup(i + 1))?;
        }
    }
    fs::rename(&current, backup(1))
}

/// Log to stderr and to `<log_dir>/parser.log`. `RUST_LOG` overrides the `info` default.
pub fn init(log_dir: &Path) -> io::Result<()> {
    fs::create_dir_all(log_dir)?;
    rotate(log_dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join(LOG_FILE))?;

    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env)
        .with(fmt::layer().with_writer(io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}
