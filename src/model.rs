//! Core data models for the queue client.
//!
//! A [`Song`] is whatever the queue server says is playing or queued; the
//! art subsystem only ever looks at its artist/album pair, captured as an
//! [`AlbumIdentity`]. Every track on an album shares one identity and
//! therefore one piece of cover art.

use std::fmt;

/// A song in the play queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    /// Server-assigned song id, unique per track
    pub id: String,
    /// Track title
    pub title: String,
    /// Artist name
    pub artist: String,
    /// Album title
    pub album: String,
    /// Whether the user starred this song
    pub starred: bool,
}

impl Song {
    /// The identity of the album this song's art belongs to.
    pub fn album_identity(&self) -> AlbumIdentity {
        AlbumIdentity {
            artist: self.artist.clone(),
            album: self.album.clone(),
        }
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {} from {}", self.title, self.artist, self.album)
    }
}

/// Artist/album pair identifying a shared piece of cover art.
///
/// Not unique per song: all tracks on an album map to the same identity.
/// Identities are only ever hashed into a digest, never compared directly
/// when looking up art.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlbumIdentity {
    pub artist: String,
    pub album: String,
}

impl AlbumIdentity {
    pub fn new(artist: impl Into<String>, album: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            album: album.into(),
        }
    }

    /// Joined form fed to the digest. The separator is not expected to
    /// appear in either field.
    pub(crate) fn key(&self) -> String {
        format!("{}#{}", self.artist, self.album)
    }
}
