// SPDX-License-Identifier: PMPL-1.0-or-later

//! Registry download with a `File-Date` staleness check
//!
//! The registry is downloaded into a temporary file next to the cache. The
//! cache is replaced only when the remote `File-Date` differs from the
//! cached one (or nothing is cached yet); otherwise the download is thrown
//! away. The temporary file never outlives the call.

mod progress;

pub use progress::{DownloadProgress, ProgressReader};

use crate::error::{RegistryError, Result};
use crate::registry::read_file_date;
use chrono::NaiveDate;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Where registry text comes from
pub trait RegistrySource {
    /// URL or other human-readable location, for messages.
    fn location(&self) -> &str;

    /// Stream the full registry text into `sink`, reporting progress.
    /// Returns the number of bytes written.
    fn fetch(
        &self,
        sink: &mut dyn Write,
        progress: &mut dyn FnMut(DownloadProgress),
    ) -> Result<u64>;
}

/// The registry served over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl RegistrySource for HttpSource {
    fn location(&self) -> &str {
        &self.url
    }

    fn fetch(
        &self,
        sink: &mut dyn Write,
        progress: &mut dyn FnMut(DownloadProgress),
    ) -> Result<u64> {
        let fetch_error = |source| RegistryError::Fetch {
            url: self.url.clone(),
            source,
        };
        debug!(url = %self.url, "downloading registry");
        let response = reqwest::blocking::get(&self.url)
            .map_err(fetch_error)?
            .error_for_status()
            .map_err(fetch_error)?;
        let total = response.content_length();

        let mut reader = ProgressReader::new(response, total, progress);
        io::copy(&mut reader, sink).map_err(|source| RegistryError::Download {
            url: self.url.clone(),
            source,
        })
    }
}

/// Result of a cache update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// No cache existed; it now holds the remote registry
    Created { date: NaiveDate },
    /// The cache was replaced. `previous` is `None` when the old header
    /// could not be read.
    Updated {
        previous: Option<NaiveDate>,
        current: NaiveDate,
    },
    /// The cache already had the remote `File-Date`; nothing was written
    UpToDate { date: NaiveDate },
}

/// Download the registry from `source` and refresh `cache_path` if stale.
pub fn update_cache(
    source: &dyn RegistrySource,
    cache_path: &Path,
    progress: &mut dyn FnMut(DownloadProgress),
) -> Result<FetchOutcome> {
    let dir = match cache_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| RegistryError::io(dir, e))?;

    let mut download = NamedTempFile::new_in(dir).map_err(|e| RegistryError::io(dir, e))?;
    let bytes = source.fetch(&mut download, progress)?;
    download
        .flush()
        .map_err(|e| RegistryError::io(download.path(), e))?;
    let remote = read_file_date(download.path())?;
    debug!(location = source.location(), bytes, %remote, "registry downloaded");

    let existed = cache_path.is_file();
    let local = if existed {
        match read_file_date(cache_path) {
            Ok(date) => Some(date),
            Err(err) => {
                warn!(path = %cache_path.display(), error = %err, "cached registry has no readable File-Date");
                None
            }
        }
    } else {
        None
    };

    if local == Some(remote) {
        return Ok(FetchOutcome::UpToDate { date: remote });
    }

    download
        .persist(cache_path)
        .map_err(|e| RegistryError::io(cache_path, e.error))?;

    Ok(if existed {
        FetchOutcome::Updated {
            previous: local,
            current: remote,
        }
    } else {
        FetchOutcome::Created { date: remote }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Canned(&'static str);

    impl RegistrySource for Canned {
        fn location(&self) -> &str {
            "canned"
        }

        fn fetch(
            &self,
            sink: &mut dyn Write,
            progress: &mut dyn FnMut(DownloadProgress),
        ) -> Result<u64> {
            let mut reader = ProgressReader::new(self.0.as_bytes(), None, progress);
            io::copy(&mut reader, sink).map_err(|e| RegistryError::io("canned", e))
        }
    }

    fn entries(dir: &Path) -> usize {
        fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn creates_cache_directory_and_file() {
        let dir = TempDir::new().unwrap();
        let cache = dir.path().join("language_registry/language-subtag-registry");
        let outcome = update_cache(&Canned("File-Date: 2024-05-01\n%%\n"), &cache, &mut |_| {}).unwrap();
        assert_eq!(
            outcome,
            FetchOutcome::Created {
                date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
            }
        );
        assert_eq!(entries(cache.parent().unwrap()), 1);
    }

    #[test]
    fn newer_remote_replaces_cache() {
        let dir = TempDir::new().unwrap();
        let cache = dir.path().join("language-subtag-registry");
        fs::write(&cache, "File-Date: 2020-01-01\n").unwrap();
        let outcome = update_cache(&Canned("File-Date: 2021-02-03\n"), &cache, &mut |_| {}).unwrap();
        assert!(matches!(outcome, FetchOutcome::Updated { previous: Some(_), .. }));
        assert_eq!(fs::read_to_string(&cache).unwrap(), "File-Date: 2021-02-03\n");
        assert_eq!(entries(dir.path()), 1);
    }

    #[test]
    fn unreadable_local_header_counts_as_stale() {
        let dir = TempDir::new().unwrap();
        let cache = dir.path().join("language-subtag-registry");
        fs::write(&cache, "garbage\n").unwrap();
        let outcome = update_cache(&Canned("File-Date: 2021-02-03\n"), &cache, &mut |_| {}).unwrap();
        assert!(matches!(outcome, FetchOutcome::Updated { previous: None, .. }));
    }

    #[test]
    fn bad_remote_header_leaves_cache_alone() {
        let dir = TempDir::new().unwrap();
        let cache = dir.path().join("language-subtag-registry");
        fs::write(&cache, "File-Date: 2020-01-01\n").unwrap();
        let err = update_cache(&Canned("<html>oops</html>\n"), &cache, &mut |_| {}).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidFileDate { .. }));
        assert_eq!(fs::read_to_string(&cache).unwrap(), "File-Date: 2020-01-01\n");
        assert_eq!(entries(dir.path()), 1);
    }
}
