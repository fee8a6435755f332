//! Album-art cache for the play queue client.
//!
//! Given a song's artist/album identity, this crate fetches cover art from
//! the queue server at most once per distinct album, persists it on disk,
//! keeps a bounded in-memory set of decoded images, downsamples art to a
//! display-appropriate resolution, and delivers results asynchronously to
//! reusable display surfaces without ever applying a stale image to a
//! surface that has been recycled for a different song.
//!
//! # Design Principles
//!
//! - **Non-blocking**: the request path never waits on disk or network;
//!   one background worker resolves misses in FIFO order
//! - **Graceful degradation**: missing or corrupt art means the
//!   placeholder stays, never an error
//! - **Content-addressed**: the SHA-1 of artist+album names both cache
//!   tiers, so every track on an album shares one image
//!
//! The rest of the client (queue/search/star calls, push updates, views)
//! lives elsewhere; it reaches this crate through [`ArtCache`] and the
//! [`ArtSurface`]/[`ArtFetcher`] boundary traits.

pub mod cache;
pub mod config;
pub mod decode;
pub mod digest;
pub mod error;
pub mod fetch;
pub mod memory;
pub mod model;
pub mod store;
pub mod surface;
#[cfg(test)]
pub mod test_utils;

pub use cache::ArtCache;
pub use error::{Error, Result};
pub use fetch::{ArtFetcher, HttpArtFetcher};
pub use memory::{Art, MemoryCache, Partition};
pub use model::{AlbumIdentity, Song};
pub use surface::{ArtSurface, RequestTag};
