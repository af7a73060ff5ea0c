// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Views over memory shared with a compute kernel.
//!
//! Kernels write their output (usually RGBA pixels) into a buffer they own and
//! report where it lives as a [`Region`]. The page reads it through a view
//! created over the module's linear memory. Such views go stale whenever that
//! memory grows: the old buffer is detached and its length reads zero.
//! [`CachedView`] keeps one view and re-creates it in that case.

use core::fmt;

use crate::error::HostError;

/// A byte range in the compute module's linear memory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Region {
    /// Byte offset of the first byte.
    pub ptr: usize,
    /// Length in bytes.
    pub len: usize,
}

impl Region {
    /// Creates a region.
    #[must_use]
    pub const fn new(ptr: usize, len: usize) -> Self {
        Self { ptr, len }
    }

    /// Whether the region covers no bytes.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }

    /// One past the last byte, or `None` on overflow.
    #[must_use]
    pub const fn end(self) -> Option<usize> {
        self.ptr.checked_add(self.len)
    }
}

/// A compute kernel that exposes an output buffer.
pub trait SharedMemory {
    /// Where the kernel's output currently lives.
    ///
    /// The region may move when the kernel reallocates, so callers should ask
    /// again before every read.
    fn shared_region(&self) -> Region;
}

/// A platform view over a [`Region`].
pub trait RegionView: Sized {
    /// How the bytes are interpreted (image dimensions, say).
    type Layout: Copy + PartialEq;

    /// Creates a view over `region`.
    fn acquire(region: Region, layout: Self::Layout) -> Result<Self, HostError>;

    /// Current byte length as seen through the view; zero once detached.
    fn byte_len(&self) -> usize;
}

/// Holds a [`RegionView`] and re-acquires it when it goes stale.
pub struct CachedView<V: RegionView> {
    view: Option<V>,
    key: Option<(Region, V::Layout)>,
    acquisitions: u32,
}

impl<V: RegionView> CachedView<V> {
    /// Creates an empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            view: None,
            key: None,
            acquisitions: 0,
        }
    }

    /// Returns a live view over `region`.
    ///
    /// A new view is acquired when there is none yet, when the region or
    /// layout changed, or when the cached view's byte length reads zero.
    pub fn get(&mut self, region: Region, layout: V::Layout) -> Result<&V, HostError> {
        let key = Some((region, layout));
        let view = match self.view.take() {
            Some(v) if v.byte_len() != 0 && self.key == key => v,
            _ => {
                let v = V::acquire(region, layout)?;
                self.key = key;
                self.acquisitions += 1;
                v
            }
        };
        Ok(&*self.view.insert(view))
    }

    /// Drops the cached view.
    pub fn invalidate(&mut self) {
        self.view = None;
        self.key = None;
    }

    /// How many views were acquired so far.
    #[must_use]
    pub const fn acquisitions(&self) -> u32 {
        self.acquisitions
    }
}

impl<V: RegionView> Default for CachedView<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: RegionView> fmt::Debug for CachedView<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedView")
            .field("region", &self.key.map(|(region, _)| region))
            .field("cached", &self.view.is_some())
            .field("acquisitions", &self.acquisitions)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicU32, Ordering};

    /// Bumped to simulate memory growth detaching every live view.
    static MEMORY_GENERATION: AtomicU32 = AtomicU32::new(0);

    #[derive(Debug)]
    struct FakeView {
        len: usize,
        generation: u32,
    }

    impl RegionView for FakeView {
        type Layout = u32;

        fn acquire(region: Region, _width: u32) -> Result<Self, HostError> {
            if region.end().is_none() {
                return Err(HostError::SharedMemory("region overflows".into()));
            }
            Ok(Self {
                len: region.len,
                generation: MEMORY_GENERATION.load(Ordering::Relaxed),
            })
        }

        fn byte_len(&self) -> usize {
            if self.generation == MEMORY_GENERATION.load(Ordering::Relaxed) {
                self.len
            } else {
                0
            }
        }
    }

    #[test]
    fn view_is_reused_until_detached_or_moved() {
        let pixels = Region::new(1024, 160 * 160 * 4);
        let mut cache = CachedView::<FakeView>::new();
        assert_eq!(cache.get(pixels, 160).unwrap().len, pixels.len);
        cache.get(pixels, 160).unwrap();
        assert_eq!(cache.acquisitions(), 1, "live view must be reused");

        MEMORY_GENERATION.fetch_add(1, Ordering::Relaxed);
        assert_eq!(cache.get(pixels, 160).unwrap().byte_len(), pixels.len);
        assert_eq!(cache.acquisitions(), 2, "detached view must be re-acquired");

        cache.get(Region::new(4096, pixels.len), 160).unwrap();
        assert_eq!(cache.acquisitions(), 3, "moved region must be re-acquired");

        cache.get(Region::new(4096, pixels.len), 80).unwrap();
        assert_eq!(cache.acquisitions(), 4, "new layout must be re-acquired");
    }

    #[test]
    fn failed_acquire_leaves_cache_empty() {
        let mut cache = CachedView::<FakeView>::new();
        assert!(matches!(
            cache.get(Region::new(usize::MAX, 8), 2),
            Err(HostError::SharedMemory(_))
        ));
        assert_eq!(cache.acquisitions(), 0);
        cache.invalidate();
        assert!(Region::new(0, 0).is_empty());
    }
}
