//! Album-art cache service.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        UI / event thread                        │
//! │   request_art: memory hit applies now, miss stamps the surface  │
//! │   apply_completed: drains finished loads, drops stale ones      │
//! └───────────────┬──────────────────────────────▲──────────────────┘
//!                 │ job queue (FIFO)             │ completion queue
//!                 ▼                              │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Art worker (one thread)                      │
//! │      re-check memory → disk → fetch → decode → memory put       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Exactly one worker resolves requests in arrival order. A burst of
//! scroll-triggered requests queues up behind a single network/disk
//! pipeline instead of stampeding it, and a duplicate request for an
//! album already resolved earlier in the queue is satisfied by the
//! worker's memory re-check without a second fetch. The price is that a
//! slow fetch stalls everything behind it; with one small image per
//! album that trade is acceptable.
//!
//! There is no cancellation. A request whose surface was reassigned runs
//! to completion and its result is discarded at apply time by the
//! [`RequestTag`] comparison.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::{debug, trace, warn};

use crate::config::ArtConfig;
use crate::decode;
use crate::digest::album_digest;
use crate::error::{Error, Result};
use crate::fetch::ArtFetcher;
use crate::memory::{Art, MemoryCache, Partition};
use crate::model::Song;
use crate::store::ArtStore;
use crate::surface::{ArtSurface, RequestTag};

/// A queued resolution for one surface.
struct Job {
    surface: Arc<dyn ArtSurface>,
    partition: Partition,
    tag: RequestTag,
    song: Song,
    digest: String,
}

/// A finished resolution waiting to be applied on the UI side.
struct Completion {
    surface: Arc<dyn ArtSurface>,
    tag: RequestTag,
    art: Option<Art>,
}

/// Two-tier album-art cache with a single background loader.
///
/// Construct one per process and inject it wherever art requests
/// originate. Dropping the cache disconnects the job queue and joins the
/// worker.
pub struct ArtCache {
    memory: Arc<MemoryCache>,
    job_tx: Option<Sender<Job>>,
    completion_rx: Receiver<Completion>,
    worker: Option<JoinHandle<()>>,
}

impl ArtCache {
    /// Create a cache and start its worker thread.
    pub fn new(config: &ArtConfig, fetcher: Arc<dyn ArtFetcher>) -> Result<Self> {
        let memory = Arc::new(MemoryCache::new(config.memory_capacity));
        let store = ArtStore::new(config.cache_root());
        let max_dimension = config.max_dimension();

        let (job_tx, job_rx) = unbounded();
        let (completion_tx, completion_rx) = unbounded();

        let worker_memory = Arc::clone(&memory);
        let worker = thread::Builder::new()
            .name("art-loader".to_string())
            .spawn(move || {
                worker_main(
                    store,
                    fetcher,
                    worker_memory,
                    max_dimension,
                    job_rx,
                    completion_tx,
                );
            })
            .map_err(Error::WorkerSpawn)?;

        Ok(Self {
            memory,
            job_tx: Some(job_tx),
            completion_rx,
            worker: Some(worker),
        })
    }

    /// Show art for `song` on `surface`.
    ///
    /// A memory hit is applied before this returns. On a miss the surface
    /// is reset to its placeholder, stamped with the song's tag, and a
    /// background resolve is queued; the result lands on a later
    /// [`apply_completed`](Self::apply_completed) call. Never blocks and
    /// never fails - a song with no retrievable art keeps the placeholder.
    pub fn request_art(&self, surface: Arc<dyn ArtSurface>, partition: Partition, song: &Song) {
        let digest = album_digest(&song.album_identity());

        if let Some(art) = self.memory.get(partition, &digest) {
            surface.set_request_tag(None);
            surface.apply_image(&art);
            return;
        }

        surface.clear_to_placeholder();
        let tag = RequestTag::new(song.id.clone());
        surface.set_request_tag(Some(tag.clone()));

        let job = Job {
            surface,
            partition,
            tag,
            song: song.clone(),
            digest,
        };
        if let Some(tx) = &self.job_tx {
            if tx.send(job).is_err() {
                warn!("Art worker is gone, dropping request for {}", song);
            }
        }
    }

    /// Apply every finished load whose surface still belongs to it.
    ///
    /// Call from the UI thread. Returns the number of surfaces updated;
    /// stale results are discarded silently.
    pub fn apply_completed(&self) -> usize {
        let mut applied = 0;
        while let Ok(done) = self.completion_rx.try_recv() {
            if self.apply(done) {
                applied += 1;
            }
        }
        applied
    }

    /// Block up to `timeout` for one finished load, then apply it.
    ///
    /// Returns `true` if a surface was updated, `false` on timeout or if
    /// the load was stale. Intended for UI glue that parks between
    /// events (and for tests).
    pub fn wait_and_apply(&self, timeout: Duration) -> bool {
        match self.completion_rx.recv_timeout(timeout) {
            Ok(done) => self.apply(done),
            Err(_) => false,
        }
    }

    /// Step 6: hand a finished load to its surface if it still owns it.
    fn apply(&self, done: Completion) -> bool {
        if done.surface.request_tag().as_ref() != Some(&done.tag) {
            trace!("Surface reassigned, discarding resolved art");
            return false;
        }

        done.surface.set_request_tag(None);
        match &done.art {
            Some(art) => done.surface.apply_image(art),
            None => done.surface.clear_to_placeholder(),
        }
        true
    }
}

impl Drop for ArtCache {
    fn drop(&mut self) {
        // Disconnect the queue so the worker drains and exits
        self.job_tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn worker_main(
    mut store: ArtStore,
    fetcher: Arc<dyn ArtFetcher>,
    memory: Arc<MemoryCache>,
    max_dimension: u32,
    jobs: Receiver<Job>,
    completions: Sender<Completion>,
) {
    while let Ok(job) = jobs.recv() {
        store.purge_stale_versions();

        // A duplicate queued behind the request that already resolved this
        // album is satisfied here without touching disk or network.
        let art = match memory.get(job.partition, &job.digest) {
            Some(art) => Some(art),
            None => {
                let resolved = resolve(&store, fetcher.as_ref(), &job, max_dimension);
                if let Some(art) = &resolved {
                    memory.put(job.partition, &job.digest, Arc::clone(art));
                }
                resolved
            }
        };

        let done = Completion {
            surface: job.surface,
            tag: job.tag,
            art,
        };
        if completions.send(done).is_err() {
            break;
        }
    }
}

/// Resolve art from disk, else fetch and decode it. `None` means the
/// placeholder stays; nothing is retried.
fn resolve(store: &ArtStore, fetcher: &dyn ArtFetcher, job: &Job, max_dimension: u32) -> Option<Art> {
    let path = store.art_path(&job.digest);

    if ArtStore::is_valid(&path) {
        return decode::decode(&path, max_dimension).map(Arc::new);
    }

    if !fetcher.fetch(&job.song, &path) {
        debug!("No art available for {}", job.song);
        return None;
    }

    let art = Arc::new(decode::decode(&path, max_dimension)?);
    // Keep the downsampled decode so the next run skips the full-size file
    if let Err(e) = store.write(&job.digest, &art) {
        debug!("Caching decoded art for {} failed: {}", job.song, e);
    }
    Some(art)
}
