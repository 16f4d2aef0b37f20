// src/fetch/cache.rs

use sha2::{Digest, Sha256};
use std::{
    fs, io,
    path::PathBuf,
};
use tracing::{debug, warn};
use url::Url;

/// On-disk store of successful response bodies, one file per URL.
pub struct PageCache {
    dir: PathBuf,
}

impl PageCache {
    /// Open the cache at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn entry_path(&self, url: &Url) -> PathBuf {
        let key = Sha256::digest(url.as_str().as_bytes());
        self.dir.join(format!("{:x}", key))
    }

    pub fn get(&self, url: &Url) -> Option<Vec<u8>> {
        match fs::read(self.entry_path(url)) {
            Ok(body) => Some(body),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(%url, error = %e, "unreadable cache entry");
                None
            }
        }
    }

    pub fn put(&self, url: &Url, body: &[u8]) {
        let path = self.entry_path(url);
        if let Err(e) = fs::write(&path, body) {
            warn!(%url, path = %path.display(), error = %e, "failed to cache response");
        }
    }

    /// Remove every entry. Returns the number of files deleted.
    pub fn clear(&self) -> io::Result<usize> {
        let mut removed = 0;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file() {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        debug!(dir = %self.dir.display(), removed, "cache cleared");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn entries_are_keyed_by_url() {
        let tmp = tempdir().unwrap();
        let cache = PageCache::new(tmp.path()).unwrap();
        let a = Url::parse("https://peps.python.org/").unwrap();
        let b = Url::parse("https://peps.python.org/pep-0008/").unwrap();

        assert!(cache.get(&a).is_none());
        cache.put(&a, b"index");
        cache.put(&b, b"pep 8");
        assert_eq!(cache.get(&a).unwrap(), b"index");
        assert_eq!(cache.get(&b).unwrap(), b"pep 8");

        assert_eq!(cache.clear().unwrap(), 2);
        assert!(cache.get(&a).is_none());
        assert_eq!(cache.clear().unwrap(), 0);
    }

    #[test]
    fn clear_leaves_subdirectories_and_reports_a_vanished_dir() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("cache");
        let cache = PageCache::new(&dir).unwrap();
        cache.put(&Url::parse("https://docs.python.org/3/").unwrap(), b"doc");
        fs::create_dir(dir.join("nested")).unwrap();

        assert_eq!(cache.clear().unwrap(), 1);
        assert!(dir.join("nested").is_dir());

        fs::remove_dir_all(&dir).unwrap();
        assert_eq!(cache.clear().unwrap_err().kind(), io::ErrorKind::NotFound);
    }
}
