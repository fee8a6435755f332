//! Display-surface boundary for asynchronous art delivery.
//!
//! List rows are recycled: by the time an album's art resolves, the widget
//! that asked for it may already be showing a different song. Each surface
//! therefore carries a [`RequestTag`] naming the request that currently
//! owns it. The tag is stamped when a load is queued and compared when the
//! result comes back; a mismatch means the surface moved on and the result
//! is dropped without comment.
//!
//! The cache calls these four methods and nothing else - layout, recycling
//! and placeholder artwork all belong to the UI layer.

use crate::memory::Art;

/// Identity of the request that currently owns a surface.
///
/// Compared by value. The surface object itself is reused across unrelated
/// songs, so object identity would pass the staleness check exactly when
/// it must fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTag(String);

impl RequestTag {
    /// Tag a request with a stable song id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// A reusable UI slot that can show cover art.
///
/// Implementations are expected to be called from the UI side of the
/// hand-off only; the trait is `Send + Sync` so completed loads can carry
/// the surface back across the worker boundary.
pub trait ArtSurface: Send + Sync {
    /// Show the neutral placeholder for this surface's visual context.
    fn clear_to_placeholder(&self);

    /// Record which request owns this surface, or release it with `None`.
    fn set_request_tag(&self, tag: Option<RequestTag>);

    /// The owning request, if any.
    fn request_tag(&self) -> Option<RequestTag>;

    /// Show decoded art.
    fn apply_image(&self, art: &Art);
}
