// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel views over the module's own linear memory.

use alloc::format;

use js_sys::{Uint8ClampedArray, WebAssembly};
use wasm_bindgen::JsCast as _;
use web_sys::ImageData;

use vizhost_core::compute::{Region, RegionView};
use vizhost_core::error::HostError;

/// Width and height of an RGBA image in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageSize {
    /// Creates a size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Bytes of an RGBA buffer of this size.
    #[must_use]
    pub const fn rgba_len(self) -> Option<usize> {
        match (self.width as usize).checked_mul(self.height as usize) {
            Some(px) => px.checked_mul(4),
            None => None,
        }
    }
}

/// An `ImageData` backed directly by wasm memory, without copying.
///
/// Goes stale when the memory grows; keep it in a
/// [`CachedView`](vizhost_core::compute::CachedView).
pub struct PixelView {
    bytes: Uint8ClampedArray,
    image: ImageData,
}

impl core::fmt::Debug for PixelView {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PixelView")
            .field("byte_len", &self.bytes.byte_length())
            .finish_non_exhaustive()
    }
}

impl PixelView {
    /// The image, ready for `putImageData`.
    #[must_use]
    pub fn image_data(&self) -> &ImageData {
        &self.image
    }
}

/// Checks that `region` holds exactly one `size` image and returns its
/// offset and length as 32-bit memory indices.
fn checked_span(region: Region, size: ImageSize) -> Result<(u32, u32), HostError> {
    if size.rgba_len() != Some(region.len) {
        return Err(HostError::SharedMemory(format!(
            "region of {} bytes does not hold a {}x{} RGBA image",
            region.len, size.width, size.height
        )));
    }
    let to_u32 = |v: usize| {
        u32::try_from(v)
            .map_err(|_| HostError::SharedMemory(format!("{v} exceeds 32-bit memory")))
    };
    Ok((to_u32(region.ptr)?, to_u32(region.len)?))
}

impl RegionView for PixelView {
    type Layout = ImageSize;

    fn acquire(region: Region, size: ImageSize) -> Result<Self, HostError> {
        let (offset, len) = checked_span(region, size)?;
        let memory: WebAssembly::Memory = wasm_bindgen::memory().unchecked_into();
        let bytes = Uint8ClampedArray::new_with_byte_offset_and_length(&memory.buffer(), offset, len);
        let image = ImageData::new_with_js_u8_clamped_array_and_sh(&bytes, size.width, size.height)
            .map_err(|e| HostError::SharedMemory(crate::scaffold::js_error("new ImageData", &e)))?;
        Ok(Self { bytes, image })
    }

    fn byte_len(&self) -> usize {
        self.bytes.byte_length() as usize
    }
}
