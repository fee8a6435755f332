//! Versioned on-disk store for fetched cover art.
//!
//! One PNG per album digest, under `<root>/art<version>`. There is no
//! manifest: a digest is cached if and only if its file exists and is
//! non-empty. Bump [`ART_VERSION`] when the stored size or format changes;
//! directories from earlier versions are purged lazily on first use.
//!
//! The store itself does no locking. The single background worker is the
//! only writer, which the loader's one-job-at-a-time queue guarantees.

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use tracing::{debug, info};

use crate::error::Result;

/// Version of art on disk.
///
/// Increment when the downsampled size or stored format changes, or if old
/// art should be cleared and re-downloaded.
pub const ART_VERSION: u32 = 1;

const ART_FOLDER: &str = "art";

/// Disk store rooted at the application cache directory.
pub struct ArtStore {
    root: PathBuf,
    dir: PathBuf,
    stale_purged: bool,
}

impl ArtStore {
    /// Create a store under `root`, ensuring the current version directory
    /// exists.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let dir = root.join(format!("{ART_FOLDER}{ART_VERSION}"));
        let _ = fs::create_dir_all(&dir);
        Self {
            root,
            dir,
            stale_purged: false,
        }
    }

    /// Path of the art file for a digest, whether or not it exists yet.
    pub fn art_path(&self, digest: &str) -> PathBuf {
        self.dir.join(format!("{digest}.png"))
    }

    /// Is the file existent and non-empty?
    ///
    /// Zero-length files are treated as absent; an interrupted write must
    /// never be served as art.
    pub fn is_valid(path: &Path) -> bool {
        fs::metadata(path)
            .map(|m| m.is_file() && m.len() > 0)
            .unwrap_or(false)
    }

    /// Read the stored bytes for a digest, if present and valid.
    pub fn read(&self, digest: &str) -> Option<Vec<u8>> {
        let path = self.art_path(digest);
        if !Self::is_valid(&path) {
            return None;
        }
        fs::read(&path).ok()
    }

    /// Write decoded art back to the store as PNG.
    ///
    /// The worker calls this with the downsampled decode of a fresh fetch,
    /// so later runs decode a small file instead of the full-size original.
    pub fn write(&self, digest: &str, image: &RgbaImage) -> Result<PathBuf> {
        let path = self.art_path(digest);
        image.save_with_format(&path, image::ImageFormat::Png)?;
        Ok(path)
    }

    /// Remove art directories left over from earlier cache versions.
    ///
    /// Deletes every `art<N>` with `N` below [`ART_VERSION`] plus the
    /// unversioned legacy directory. Runs at most once per store; failures
    /// are ignored, a leftover directory just wastes space until next time.
    pub fn purge_stale_versions(&mut self) {
        if self.stale_purged {
            return;
        }
        self.stale_purged = true;

        remove_tree(&self.root.join(ART_FOLDER));
        for version in 0..ART_VERSION {
            remove_tree(&self.root.join(format!("{ART_FOLDER}{version}")));
        }
    }
}

/// Recursively delete a directory or file if it exists, best-effort.
fn remove_tree(path: &Path) {
    let Ok(meta) = fs::symlink_metadata(path) else {
        return;
    };

    info!("Removing stale art at {:?}", path);
    let removed = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    if let Err(e) = removed {
        debug!("Failed to remove {:?}: {}", path, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_image() -> RgbaImage {
        RgbaImage::from_pixel(4, 4, image::Rgba([200, 100, 50, 255]))
    }

    #[test]
    fn test_art_path_uses_digest_and_png_suffix() {
        let temp = TempDir::new().unwrap();
        let store = ArtStore::new(temp.path());

        let path = store.art_path("abc123");
        assert_eq!(path.file_name().unwrap(), "abc123.png");
        assert!(path.starts_with(temp.path().join("art1")));
    }

    #[test]
    fn test_is_valid_rejects_missing_and_empty() {
        let temp = TempDir::new().unwrap();
        let store = ArtStore::new(temp.path());

        let path = store.art_path("missing");
        assert!(!ArtStore::is_valid(&path));

        // A zero-length file is corrupt, not cached
        fs::write(&path, b"").unwrap();
        assert!(!ArtStore::is_valid(&path));

        fs::write(&path, b"png bytes").unwrap();
        assert!(ArtStore::is_valid(&path));
    }

    #[test]
    fn test_write_then_read() {
        let temp = TempDir::new().unwrap();
        let store = ArtStore::new(temp.path());

        let path = store.write("deadbeef", &sample_image()).unwrap();
        assert!(ArtStore::is_valid(&path));

        let bytes = store.read("deadbeef").unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_read_missing_digest() {
        let temp = TempDir::new().unwrap();
        let store = ArtStore::new(temp.path());

        assert!(store.read("0000000000").is_none());
    }

    #[test]
    fn test_purge_removes_old_versions_keeps_current() {
        let temp = TempDir::new().unwrap();

        // Art from a legacy unversioned folder and version 0
        let legacy = temp.path().join("art");
        let old = temp.path().join("art0");
        fs::create_dir_all(&legacy).unwrap();
        fs::create_dir_all(&old).unwrap();
        fs::write(legacy.join("stale.png"), b"old").unwrap();
        fs::write(old.join("stale.png"), b"old").unwrap();

        let mut store = ArtStore::new(temp.path());
        let kept = store.write("cafef00d", &sample_image()).unwrap();

        store.purge_stale_versions();

        assert!(!legacy.exists());
        assert!(!old.exists());
        assert!(ArtStore::is_valid(&kept));

        // Entries that only existed under the old version are gone
        assert!(!ArtStore::is_valid(&old.join("stale.png")));
    }

    #[test]
    fn test_purge_runs_once() {
        let temp = TempDir::new().unwrap();
        let old = temp.path().join("art0");

        let mut store = ArtStore::new(temp.path());
        store.purge_stale_versions();

        // A directory appearing after the purge is left alone this process
        fs::create_dir_all(&old).unwrap();
        store.purge_stale_versions();
        assert!(old.exists());
    }
}
