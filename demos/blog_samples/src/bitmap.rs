// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bitmaps decoded from image URLs.
//!
//! Decoding goes through an off-screen canvas: the image is drawn once and
//! read back with `getImageData`. [`BitmapCache`] keeps one promise per URL,
//! so placeholders sharing a sprite decode it once and a later request for a
//! URL that is still loading waits on the same promise.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::future::Future;
use std::rc::Rc;

use js_sys::Promise;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, future_to_promise};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement, ImageData};

use vizhost_backend_web::ImageSize;
use vizhost_core::error::DemoError;

use crate::page;
use crate::pixels::Rgba;

/// A decoded RGBA image.
#[derive(Clone, Debug, PartialEq)]
pub struct Bitmap {
    size: ImageSize,
    pixels: Vec<Rgba>,
}

impl Bitmap {
    /// Wraps row-major RGBA bytes.
    pub fn from_rgba(size: ImageSize, bytes: &[u8]) -> Result<Self, DemoError> {
        if size.rgba_len() != Some(bytes.len()) {
            return Err(DemoError::new(format!(
                "{} bytes do not hold a {}x{} RGBA image",
                bytes.len(),
                size.width,
                size.height
            )));
        }
        let pixels = bytemuck::try_cast_slice::<u8, Rgba>(bytes)
            .map_err(|e| DemoError::new(format!("bitmap bytes: {e}")))?
            .to_vec();
        Ok(Self { size, pixels })
    }

    /// A single-color image.
    #[must_use]
    pub fn solid(size: ImageSize, color: Rgba) -> Self {
        Self {
            size,
            pixels: vec![color; size.width as usize * size.height as usize],
        }
    }

    /// Copies the pixels out of an `ImageData`.
    pub fn from_image_data(image: &ImageData) -> Result<Self, DemoError> {
        Self::from_rgba(
            ImageSize::new(image.width(), image.height()),
            &image.data().0,
        )
    }

    /// Dimensions in pixels.
    #[must_use]
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Row-major pixels.
    #[must_use]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// The pixel at `(x, y)`, or `None` outside the image.
    #[must_use]
    pub fn pixel(&self, x: i64, y: i64) -> Option<Rgba> {
        let (w, h) = (i64::from(self.size.width), i64::from(self.size.height));
        if !(0..w).contains(&x) || !(0..h).contains(&y) {
            return None;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "bounds checked against the u32 size above"
        )]
        let index = (y * w + x) as usize;
        self.pixels.get(index).copied()
    }

    /// Nearest pixel at normalized `(u, v)`. `u` wraps around, `v` clamps
    /// to the top and bottom rows.
    #[must_use]
    pub fn sample_wrapped(&self, u: f64, v: f64) -> Rgba {
        if self.size.width == 0 || self.size.height == 0 {
            return Rgba::BLACK;
        }
        let (w, h) = (f64::from(self.size.width), f64::from(self.size.height));
        #[expect(
            clippy::cast_possible_truncation,
            reason = "wrapped and clamped into the image"
        )]
        let (x, y) = (
            (u.rem_euclid(1.0) * w).floor().min(w - 1.0) as i64,
            (v.clamp(0.0, 1.0) * h).floor().min(h - 1.0) as i64,
        );
        self.pixel(x, y).unwrap_or(Rgba::BLACK)
    }
}

/// Page-wide cache of bitmap loads, keyed by URL.
///
/// Clones share the cache. Failed loads stay cached, so a broken URL is
/// reported to every placeholder using it without being fetched again.
#[derive(Clone, Debug, Default)]
pub struct BitmapCache {
    loads: Rc<RefCell<BTreeMap<String, Promise>>>,
}

impl BitmapCache {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// URLs requested so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.loads.borrow().len()
    }

    /// Whether nothing was requested yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loads.borrow().is_empty()
    }

    /// Loads and decodes the image at `url`, starting the request only if no
    /// earlier call did.
    pub fn load(
        &self,
        document: &Document,
        url: &str,
    ) -> impl Future<Output = Result<Bitmap, DemoError>> + 'static {
        let promise = self
            .loads
            .borrow_mut()
            .entry(url.to_owned())
            .or_insert_with(|| {
                let (document, url) = (document.clone(), url.to_owned());
                future_to_promise(async move { decode(&document, &url).await.map(JsValue::from) })
            })
            .clone();
        let url = url.to_owned();
        async move {
            let value = JsFuture::from(promise)
                .await
                .map_err(|e| page::js_error(&format!("loading {url}"), &e))?;
            let image: ImageData = value
                .dyn_into()
                .map_err(|_| DemoError::new(format!("{url} did not decode to pixels")))?;
            Bitmap::from_image_data(&image)
        }
    }
}

async fn decode(document: &Document, url: &str) -> Result<ImageData, JsValue> {
    let image = HtmlImageElement::new()?;
    image.set_src(url);
    JsFuture::from(image.decode()).await?;
    let (width, height) = (image.natural_width(), image.natural_height());

    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_width(width);
    canvas.set_height(height);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into()?;
    ctx.draw_image_with_html_image_element(&image, 0.0, 0.0)?;
    ctx.get_image_data(0.0, 0.0, f64::from(width), f64::from(height))
}
