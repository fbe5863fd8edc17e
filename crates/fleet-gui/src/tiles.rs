//! Base map tiles as egui textures
//!
//! Downloads and decoding run on the tokio runtime; decoded images come back
//! over a channel and are uploaded as textures on the UI thread.

use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui::{self, ColorImage, TextureHandle};
use fleet_domain::model::TileId;
use fleet_infra::TileFetcher;
use tokio::runtime::Handle;
use tracing::{debug, warn};

/// Tiles kept in memory; the least recently drawn go first
const MAX_CACHED_TILES: usize = 256;

/// Wait before a failed tile is downloaded again
const RETRY_AFTER: Duration = Duration::from_secs(10);

enum Slot<T> {
    Pending,
    Ready(T),
    Failed { at: Instant },
}

struct Entry<T> {
    slot: Slot<T>,
    last_used: u64,
}

/// What the caller should do after touching a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileStatus {
    Ready,
    Loading,
    /// Start a download now
    Fetch,
}

/// Bounded LRU map of tile states
pub struct TileCache<T> {
    entries: HashMap<TileId, Entry<T>>,
    clock: u64,
    capacity: usize,
    retry_after: Duration,
}

impl<T> TileCache<T> {
    pub fn new(capacity: usize, retry_after: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            clock: 0,
            capacity: capacity.max(1),
            retry_after,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Mark `tile` as used. Unknown tiles, and failed ones past the retry
    /// delay, become pending and report [`TileStatus::Fetch`].
    pub fn touch(&mut self, tile: TileId, now: Instant) -> TileStatus {
        self.clock += 1;
        let clock = self.clock;
        let retry_after = self.retry_after;

        match self.entries.get_mut(&tile) {
            Some(entry) => {
                entry.last_used = clock;
                let retry = matches!(
                    entry.slot,
                    Slot::Failed { at } if now.saturating_duration_since(at) >= retry_after
                );
                if retry {
                    entry.slot = Slot::Pending;
                    return TileStatus::Fetch;
                }
                match entry.slot {
                    Slot::Ready(_) => TileStatus::Ready,
                    _ => TileStatus::Loading,
                }
            }
            None => {
                self.entries.insert(
                    tile,
                    Entry {
                        slot: Slot::Pending,
                        last_used: clock,
                    },
                );
                self.evict();
                TileStatus::Fetch
            }
        }
    }

    pub fn get(&self, tile: &TileId) -> Option<&T> {
        match self.entries.get(tile).map(|e| &e.slot) {
            Some(Slot::Ready(value)) => Some(value),
            _ => None,
        }
    }

    /// Record a finished download. Results for evicted tiles are dropped.
    pub fn complete(&mut self, tile: TileId, result: Option<T>, now: Instant) -> bool {
        let Some(entry) = self.entries.get_mut(&tile) else {
            return false;
        };
        entry.slot = match result {
            Some(value) => Slot::Ready(value),
            None => Slot::Failed { at: now },
        };
        true
    }

    fn evict(&mut self) {
        while self.entries.len() > self.capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(tile, _)| *tile);
            match oldest {
                Some(tile) => {
                    self.entries.remove(&tile);
                }
                None => break,
            }
        }
    }
}

/// Downloads tiles and keeps their textures
pub struct TileLayer {
    fetcher: Arc<TileFetcher>,
    runtime: Handle,
    cache: TileCache<TextureHandle>,
    tx: Sender<(TileId, Result<ColorImage, String>)>,
    rx: Receiver<(TileId, Result<ColorImage, String>)>,
}

impl TileLayer {
    pub fn new(fetcher: TileFetcher, runtime: Handle) -> Self {
        let (tx, rx) = channel();
        Self {
            fetcher: Arc::new(fetcher),
            runtime,
            cache: TileCache::new(MAX_CACHED_TILES, RETRY_AFTER),
            tx,
            rx,
        }
    }

    /// Upload finished downloads
    pub fn poll(&mut self, ctx: &egui::Context) {
        while let Ok((tile, result)) = self.rx.try_recv() {
            let texture = match result {
                Ok(image) => Some(ctx.load_texture(
                    format!("tile_{}_{}_{}", tile.z, tile.x, tile.y),
                    image,
                    egui::TextureOptions::LINEAR,
                )),
                Err(e) => {
                    warn!(z = tile.z, x = tile.x, y = tile.y, error = %e, "tile unavailable");
                    ctx.request_repaint_after(RETRY_AFTER);
                    None
                }
            };
            if !self.cache.complete(tile, texture, Instant::now()) {
                debug!(
                    z = tile.z,
                    x = tile.x,
                    y = tile.y,
                    cached = self.cache.len(),
                    "tile evicted before download finished"
                );
            }
        }
    }

    /// Texture for `tile`, starting a download when needed
    pub fn texture(&mut self, ctx: &egui::Context, tile: TileId) -> Option<&TextureHandle> {
        if self.cache.touch(tile, Instant::now()) == TileStatus::Fetch {
            self.spawn_download(ctx.clone(), tile);
        }
        self.cache.get(&tile)
    }

    fn spawn_download(&self, ctx: egui::Context, tile: TileId) {
        let fetcher = self.fetcher.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = match fetcher.fetch(tile).await {
                Ok(bytes) => decode(&bytes),
                Err(e) => Err(e.to_string()),
            };
            if tx.send((tile, result)).is_ok() {
                ctx.request_repaint();
            }
        });
    }
}

fn decode(bytes: &[u8]) -> Result<ColorImage, String> {
    let img = image::load_from_memory(bytes).map_err(|e| e.to_string())?;
    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let pixels = rgba.into_raw();
    Ok(ColorImage::from_rgba_unmultiplied(size, &pixels))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(x: u32, y: u32) -> TileId {
        TileId { x, y, z: 10 }
    }

    #[test]
    fn test_same_zoom_panning_stays_bounded() {
        let mut cache: TileCache<u32> = TileCache::new(256, RETRY_AFTER);
        let now = Instant::now();
        for i in 0..600 {
            assert_eq!(cache.touch(tile(i, 0), now), TileStatus::Fetch);
            cache.complete(tile(i, 0), Some(i), now);
        }
        assert_eq!(cache.len(), 256);
        assert_eq!(cache.get(&tile(599, 0)), Some(&599));
        assert!(cache.get(&tile(0, 0)).is_none());
    }

    #[test]
    fn test_recently_drawn_tiles_survive_eviction() {
        let mut cache: TileCache<u32> = TileCache::new(3, RETRY_AFTER);
        let now = Instant::now();
        for i in 0..3 {
            cache.touch(tile(i, 0), now);
            cache.complete(tile(i, 0), Some(i), now);
        }
        assert_eq!(cache.touch(tile(0, 0), now), TileStatus::Ready);
        cache.touch(tile(9, 9), now);

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get(&tile(0, 0)), Some(&0));
        assert!(cache.get(&tile(1, 0)).is_none());
    }

    #[test]
    fn test_failed_tile_is_retried_after_delay() {
        let mut cache: TileCache<u32> = TileCache::new(16, Duration::from_secs(10));
        let start = Instant::now();
        cache.touch(tile(1, 1), start);
        cache.complete(tile(1, 1), None, start);

        assert_eq!(cache.touch(tile(1, 1), start + Duration::from_secs(3)), TileStatus::Loading);
        assert_eq!(cache.touch(tile(1, 1), start + Duration::from_secs(10)), TileStatus::Fetch);
        assert_eq!(cache.touch(tile(1, 1), start + Duration::from_secs(11)), TileStatus::Loading);

        cache.complete(tile(1, 1), Some(7), start + Duration::from_secs(12));
        assert_eq!(cache.get(&tile(1, 1)), Some(&7));
    }

    #[test]
    fn test_pending_tile_is_not_fetched_twice() {
        let mut cache: TileCache<u32> = TileCache::new(16, RETRY_AFTER);
        let now = Instant::now();
        assert_eq!(cache.touch(tile(2, 2), now), TileStatus::Fetch);
        assert_eq!(cache.touch(tile(2, 2), now), TileStatus::Loading);
    }

    #[test]
    fn test_result_for_evicted_tile_is_dropped() {
        let mut cache: TileCache<u32> = TileCache::new(1, RETRY_AFTER);
        let now = Instant::now();
        cache.touch(tile(0, 0), now);
        cache.touch(tile(1, 0), now);
        assert!(!cache.complete(tile(0, 0), Some(1), now));
        assert_eq!(cache.len(), 1);
    }
}
