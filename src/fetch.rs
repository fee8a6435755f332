//! Remote art retrieval boundary.
//!
//! The cache doesn't care where bytes come from; it requires only that a
//! successful fetch leaves a complete image at the destination path, and a
//! failed one leaves nothing a validity check would accept. Failed fetches
//! are never retried by the cache.
//!
//! [`HttpArtFetcher`] is the production implementation, pulling art from
//! the queue server's art endpoint.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::model::Song;

/// Source of raw art bytes for an album.
pub trait ArtFetcher: Send + Sync {
    /// Retrieve art for `song` into `dest`.
    ///
    /// Returns `false` on any failure. On failure no partial file may
    /// remain at `dest`.
    fn fetch(&self, song: &Song, dest: &Path) -> bool;
}

/// Fetches art over HTTP from the play server.
///
/// The server exposes one PNG per song at `images/art/<id>.png` and
/// answers 404 for songs it has no art for.
pub struct HttpArtFetcher {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpArtFetcher {
    /// Create a fetcher for the server at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("cover-cache/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn art_url(&self, song: &Song) -> String {
        format!("{}/images/art/{}.png", self.base_url, song.id)
    }

    /// Download art to `dest`, returning the number of bytes written.
    fn download(&self, song: &Song, dest: &Path) -> Result<u64> {
        let mut response = self
            .client
            .get(self.art_url(song))
            .send()?
            .error_for_status()?;

        let mut file = fs::File::create(dest)?;
        let written = response.copy_to(&mut file)?;
        Ok(written)
    }
}

impl ArtFetcher for HttpArtFetcher {
    fn fetch(&self, song: &Song, dest: &Path) -> bool {
        match self.download(song, dest) {
            Ok(written) if written > 0 => true,
            Ok(_) => {
                // Server answered with an empty body; don't keep the husk
                debug!("Empty art response for {}", song);
                let _ = fs::remove_file(dest);
                false
            }
            Err(e) => {
                debug!("Fetching art for {} failed: {}", song, e);
                let _ = fs::remove_file(dest);
                false
            }
        }
    }
}
