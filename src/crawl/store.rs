// src/crawl/store.rs
// =============================================================================
// The page store writes fetched pages to disk as `{dest_dir}/{identifier}.html`.
//
// The files it writes double as our resume state: if a page's file already
// exists, the visited tracker treats that page as done, even across restarts.
// That is why `contains()` and `save()` share one path function.
//
// Rust concepts:
// - `impl Into<PathBuf>`: `new` accepts a &str, String, &Path or PathBuf
// - tokio::fs: async versions of std::fs calls; the blocking work runs on
//   tokio's blocking thread pool so workers keep running
// - #[cfg(unix)]: the permission bits only exist on Unix, so that code is
//   compiled out everywhere else
// =============================================================================

use std::io;
use std::path::{Path, PathBuf};

/// Extension given to every stored page.
pub const PAGE_EXTENSION: &str = ".html";

/// Longest path (in bytes) we will try to create.
///
/// Longer paths are cut off here, so two very deep URLs that share the first
/// 256 bytes of their path end up in the same file.
pub const MAX_PATH_LEN: usize = 256;

/// Writes pages under a destination directory.
#[derive(Debug, Clone)]
pub struct PageStore {
    dest_dir: PathBuf,
}

impl PageStore {
    pub fn new(dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            dest_dir: dest_dir.into(),
        }
    }

    /// The on-disk path for an identifier, truncated to `MAX_PATH_LEN` bytes.
    pub fn path_for(&self, identifier: &str) -> PathBuf {
        let full = self
            .dest_dir
            .join(format!("{}{}", identifier, PAGE_EXTENSION))
            .to_string_lossy()
            .into_owned();

        PathBuf::from(truncate_at_char_boundary(full, MAX_PATH_LEN))
    }

    /// Whether a page has already been stored for this identifier.
    ///
    /// Any stat failure (not just "not found") counts as absent: we would
    /// rather fetch a page twice than silently skip it.
    ///
    /// This is a plain blocking stat. The visited tracker calls it with its
    /// lock released, and a single metadata lookup is cheap next to a fetch.
    pub fn contains(&self, identifier: &str) -> bool {
        std::fs::metadata(self.path_for(identifier)).is_ok()
    }

    /// Saves `content` for `identifier`, creating parent directories as needed
    /// and overwriting any previous copy. Returns the path written.
    pub async fn save(&self, identifier: &str, content: &[u8]) -> io::Result<PathBuf> {
        let path = self.path_for(identifier);

        // Recursive creation is a no-op for directories that already exist,
        // so there is no blocking exists() check up front.
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                create_dirs(parent).await?;
            }
        }

        write_page(&path, content).await?;
        Ok(path)
    }
}

#[cfg(unix)]
async fn create_dirs(dir: &Path) -> io::Result<()> {
    tokio::fs::DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(dir)
        .await
}

#[cfg(not(unix))]
async fn create_dirs(dir: &Path) -> io::Result<()> {
    tokio::fs::create_dir_all(dir).await
}

async fn write_page(path: &Path, content: &[u8]) -> io::Result<()> {
    use tokio::io::AsyncWriteExt;

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o644);

    let mut file = options.open(path).await?;
    file.write_all(content).await?;
    file.flush().await
}

// Cuts `s` down to at most `max` bytes without splitting a UTF-8 character.
fn truncate_at_char_boundary(mut s: String, max: usize) -> String {
    if s.len() > max {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        s.truncate(end);
    }
    s
}
