//! Test utilities and fixtures for cover-cache tests.
//!
//! Provides stub fetchers, a recording display surface, and PNG fixtures
//! to reduce boilerplate in tests.
//!
//! # Example
//!
//! ```ignore
//! use cover_cache::test_utils::{CountingFetcher, TestSurface, test_song};
//!
//! let fetcher = CountingFetcher::serving(16, 16);
//! let cache = ArtCache::new(&config, fetcher.clone()).unwrap();
//! // ... drive the cache, then assert fetcher.calls()
//! ```

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use image::RgbaImage;
use parking_lot::Mutex;

use crate::config::ArtConfig;
use crate::fetch::ArtFetcher;
use crate::model::Song;
use crate::surface::{ArtSurface, RequestTag};

/// Install a tracing subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call wins.
pub fn init_test_logging() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Write a solid-color PNG of the given size, as fetched art.
pub fn write_test_png(path: &Path, width: u32, height: u32) {
    let image = RgbaImage::from_pixel(width, height, image::Rgba([40, 80, 160, 255]));
    image
        .save_with_format(path, image::ImageFormat::Png)
        .expect("Failed to write test PNG");
}

/// A song with the given id and album identity.
pub fn test_song(
    id: impl Into<String>,
    artist: impl Into<String>,
    album: impl Into<String>,
) -> Song {
    let id = id.into();
    Song {
        title: format!("Track {id}"),
        id,
        artist: artist.into(),
        album: album.into(),
        starred: false,
    }
}

/// Art settings rooted in a temp directory, defaults otherwise.
pub fn test_art_config(root: &Path) -> ArtConfig {
    ArtConfig {
        cache_root: Some(root.to_path_buf()),
        ..ArtConfig::default()
    }
}

/// Fetcher stub that counts calls and either serves a generated PNG of a
/// fixed size or fails every request.
pub struct CountingFetcher {
    calls: AtomicUsize,
    size: Option<(u32, u32)>,
}

impl CountingFetcher {
    /// Every fetch succeeds with a `width` x `height` PNG.
    pub fn serving(width: u32, height: u32) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            size: Some((width, height)),
        })
    }

    /// Every fetch fails.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            size: None,
        })
    }

    /// Number of fetches attempted so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ArtFetcher for CountingFetcher {
    fn fetch(&self, _song: &Song, dest: &Path) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.size {
            Some((width, height)) => {
                write_test_png(dest, width, height);
                true
            }
            None => false,
        }
    }
}

/// Adapter turning a closure into an [`ArtFetcher`], for tests that need
/// gating or per-song behavior.
pub struct FnFetcher<F>(pub F);

impl<F> ArtFetcher for FnFetcher<F>
where
    F: Fn(&Song, &Path) -> bool + Send + Sync,
{
    fn fetch(&self, song: &Song, dest: &Path) -> bool {
        (self.0)(song, dest)
    }
}

/// What a surface was told to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shown {
    Placeholder,
    Art { width: u32, height: u32 },
}

/// In-memory display surface that records everything applied to it.
#[derive(Default)]
pub struct TestSurface {
    tag: Mutex<Option<RequestTag>>,
    history: Mutex<Vec<Shown>>,
}

impl TestSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently displayed content, if any.
    pub fn last(&self) -> Option<Shown> {
        self.history.lock().last().cloned()
    }

    /// Everything displayed, oldest first.
    pub fn history(&self) -> Vec<Shown> {
        self.history.lock().clone()
    }
}

impl ArtSurface for TestSurface {
    fn clear_to_placeholder(&self) {
        self.history.lock().push(Shown::Placeholder);
    }

    fn set_request_tag(&self, tag: Option<RequestTag>) {
        *self.tag.lock() = tag;
    }

    fn request_tag(&self) -> Option<RequestTag> {
        self.tag.lock().clone()
    }

    fn apply_image(&self, art: &crate::memory::Art) {
        self.history.lock().push(Shown::Art {
            width: art.width(),
            height: art.height(),
        });
    }
}
