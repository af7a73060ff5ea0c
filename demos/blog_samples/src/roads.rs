// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pseudo-3D road driven with the keyboard.
//!
//! Placeholder attributes: `data-bg` is the URL of the sky panorama and
//! `data-tree` the URL of the roadside sprite; both are required and fetched
//! when the demo first becomes visible. With the canvas focused, `w`/`s` (or
//! the up and down arrows) drive forward and back and `a`/`d` (or left and
//! right) steer.

use std::cell::Cell;
use std::rc::Rc;

use web_sys::{CanvasRenderingContext2d, HtmlElement};

use vizhost_backend_web::{DomPlaceholder, ImageSize, PixelView};
use vizhost_core::bootstrap::Placeholder as _;
use vizhost_core::compute::{CachedView, Region, SharedMemory};
use vizhost_core::error::{DemoError, HostError};
use vizhost_core::host::{Creation, VisualizationHost};
use vizhost_core::panel::{ControlSpec, Field, PanelBuilder};

use crate::SharedTrace;
use crate::bitmap::{Bitmap, BitmapCache};
use crate::page::{self, KeyListener};
use crate::pixels::{PixelBuffer, Rgba};

/// Sample kind in `data-sample`.
pub const KIND: &str = "Roads";

/// Rendered image size.
pub const SIZE: ImageSize = ImageSize::new(640, 480);

/// Distance covered per update while a drive key is held.
pub const SPEED: f64 = 0.6;

/// Sideways movement per update while a steer key is held.
pub const STEER: f64 = 0.05;

/// How far the car may leave the road center.
pub const MAX_OFFSET: f64 = 1.5;

/// Horizon height as a fraction of the image height.
const HORIZON: f64 = 0.5;
const CAMERA_HEIGHT: f64 = 1.0;
const ROAD_HALF_WIDTH: f64 = 0.6;
const LANE_HALF_WIDTH: f64 = 0.03;
/// Rumble strips reach this far out, relative to the road half width.
const RUMBLE: f64 = 1.15;
const STRIPE_LENGTH: f64 = 2.0;
const CURVE_AMOUNT: f64 = 3.0;
const CURVE_PERIOD: f64 = 40.0;
const TREE_SPACING: f64 = 8.0;
const TREE_OFFSET: f64 = 1.8;
const TREE_HEIGHT: f64 = 2.0;
const DRAW_DISTANCE: f64 = 60.0;
const NEAR: f64 = 0.5;
/// Sky panorama turns this many times per second.
const SKY_DRIFT: f64 = 0.002;
/// Sprite pixels below this alpha are see-through.
const ALPHA_CUTOFF: u8 = 128;

/// Light grass band.
pub const GRASS_LIGHT: Rgba = Rgba::opaque(16, 170, 16);
/// Dark grass band.
pub const GRASS_DARK: Rgba = Rgba::opaque(0, 154, 0);
const RUMBLE_RED: Rgba = Rgba::opaque(170, 20, 20);
const RUMBLE_WHITE: Rgba = Rgba::opaque(235, 235, 235);
const ROAD_LIGHT: Rgba = Rgba::opaque(107, 107, 107);
const ROAD_DARK: Rgba = Rgba::opaque(100, 100, 100);
const LANE: Rgba = Rgba::opaque(204, 204, 204);

/// Held drive and steer keys: `x` is -1 (left), 0 or 1 (right), `y` is -1
/// (back), 0 or 1 (forward).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Direction {
    /// Steering.
    pub x: i8,
    /// Driving.
    pub y: i8,
}

impl Direction {
    /// Driving forward, not steering.
    pub const FORWARD: Self = Self { x: 0, y: 1 };

    /// Applies a `keydown`; returns whether the key is a driving key.
    pub fn press(&mut self, key: &str) -> bool {
        match key {
            "w" | "ArrowUp" => self.y = 1,
            "s" | "ArrowDown" => self.y = -1,
            "a" | "ArrowLeft" => self.x = -1,
            "d" | "ArrowRight" => self.x = 1,
            _ => return false,
        }
        true
    }

    /// Applies a `keyup`; returns whether the key is a driving key.
    pub fn release(&mut self, key: &str) -> bool {
        match key {
            "w" | "ArrowUp" | "s" | "ArrowDown" => self.y = 0,
            "a" | "ArrowLeft" | "d" | "ArrowRight" => self.x = 0,
            _ => return false,
        }
        true
    }
}

/// Lateral offset of the road center at distance `z` along it.
fn curve(z: f64) -> f64 {
    CURVE_AMOUNT * (z / CURVE_PERIOD).sin()
}

fn ground_color(lateral: f64, stripe: bool) -> Rgba {
    match (lateral, stripe) {
        (l, true) if l <= LANE_HALF_WIDTH => LANE,
        (l, true) if l <= ROAD_HALF_WIDTH => ROAD_LIGHT,
        (l, false) if l <= ROAD_HALF_WIDTH => ROAD_DARK,
        (l, true) if l <= ROAD_HALF_WIDTH * RUMBLE => RUMBLE_RED,
        (l, false) if l <= ROAD_HALF_WIDTH * RUMBLE => RUMBLE_WHITE,
        (_, true) => GRASS_LIGHT,
        (_, false) => GRASS_DARK,
    }
}

/// The road compute kernel.
#[derive(Clone, Debug)]
pub struct Roads {
    size: ImageSize,
    background: Bitmap,
    tree: Bitmap,
    position: f64,
    offset: f64,
    buffer: PixelBuffer,
}

impl Roads {
    /// A road seen from its start, with no bitmaps yet.
    #[must_use]
    pub fn new(size: ImageSize) -> Self {
        let empty = Bitmap::solid(ImageSize::new(0, 0), Rgba::BLACK);
        Self {
            size,
            background: empty.clone(),
            tree: empty,
            position: 0.0,
            offset: 0.0,
            buffer: PixelBuffer::new(size),
        }
    }

    /// Replaces the sky panorama and the roadside sprite.
    pub fn set_bitmaps(&mut self, background: Bitmap, tree: Bitmap) {
        self.background = background;
        self.tree = tree;
    }

    /// Distance driven.
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Distance from the road center, negative to the left.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// The output image.
    #[must_use]
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Drives one step in `direction` and repaints. `t` turns the sky.
    pub fn update(&mut self, t: f64, direction: Direction) {
        self.position += SPEED * f64::from(direction.y);
        self.offset = (self.offset + STEER * f64::from(direction.x)).clamp(-MAX_OFFSET, MAX_OFFSET);
        self.draw_ground(t);
        self.draw_trees();
    }

    fn draw_ground(&mut self, t: f64) {
        let (w, h) = (f64::from(self.size.width), f64::from(self.size.height));
        let width = self.size.width as usize;
        let horizon = h * HORIZON;
        let camera_curve = curve(self.position);
        let heading = (camera_curve + self.offset) * 0.05 + t * SKY_DRIFT;
        let pixels = self.buffer.pixels_mut();

        for (y, row) in pixels.chunks_exact_mut(width).enumerate() {
            let yc = y as f64 + 0.5;
            if yc < horizon {
                let v = yc / horizon;
                for (x, px) in row.iter_mut().enumerate() {
                    *px = self.background.sample_wrapped(x as f64 / w * 0.5 + heading, v);
                }
                continue;
            }
            let z = CAMERA_HEIGHT * (h / 2.0) / (yc - horizon);
            let world = self.position + z;
            let scale = w / 2.0 / z;
            let center = w / 2.0 + (curve(world) - camera_curve - self.offset) * scale;
            let stripe = (world / STRIPE_LENGTH).floor().rem_euclid(2.0) < 1.0;
            for (x, px) in row.iter_mut().enumerate() {
                let lateral = ((x as f64 + 0.5 - center) / scale).abs();
                *px = ground_color(lateral, stripe);
            }
        }
    }

    /// Draws the roadside sprites far to near, one on each side every
    /// `TREE_SPACING`.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "tree indices along the drawn stretch are small"
    )]
    fn draw_trees(&mut self) {
        let tree = self.tree.size();
        if tree.width == 0 || tree.height == 0 {
            return;
        }
        let aspect = f64::from(tree.width) / f64::from(tree.height);
        let (w, h) = (f64::from(self.size.width), f64::from(self.size.height));
        let horizon = h * HORIZON;
        let camera_curve = curve(self.position);

        let first = (self.position / TREE_SPACING).floor() as i64 + 1;
        let last = ((self.position + DRAW_DISTANCE) / TREE_SPACING).floor() as i64;
        for k in (first..=last).rev() {
            let along = k as f64 * TREE_SPACING;
            let z = along - self.position;
            if z < NEAR {
                continue;
            }
            let (sx, sy) = (w / 2.0 / z, h / 2.0 / z);
            let base = horizon + CAMERA_HEIGHT * sy;
            let height = TREE_HEIGHT * sy;
            let width = height * aspect;
            for side in [-1.0, 1.0] {
                let center = w / 2.0
                    + (curve(along) - camera_curve - self.offset + side * TREE_OFFSET) * sx;
                self.blit_tree(center - width / 2.0, base - height, width, height);
            }
        }
    }

    fn blit_tree(&mut self, left: f64, top: f64, width: f64, height: f64) {
        if width < 1.0 || height < 1.0 {
            return;
        }
        let (w, h) = (f64::from(self.size.width), f64::from(self.size.height));
        let (x0, x1) = (left.floor().max(0.0), (left + width).ceil().min(w));
        let (y0, y1) = (top.floor().max(0.0), (top + height).ceil().min(h));
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "clamped to the image above"
        )]
        let (x0, x1, y0, y1) = (x0 as usize, x1 as usize, y0 as usize, y1 as usize);
        let stride = self.size.width as usize;
        let pixels = self.buffer.pixels_mut();
        for y in y0..y1 {
            let v = (y as f64 + 0.5 - top) / height;
            for x in x0..x1 {
                let u = (x as f64 + 0.5 - left) / width;
                if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
                    continue;
                }
                let color = self.tree.sample_wrapped(u, v);
                if color.a >= ALPHA_CUTOFF {
                    pixels[y * stride + x] = color;
                }
            }
        }
    }
}

impl SharedMemory for Roads {
    fn shared_region(&self) -> Region {
        self.buffer.shared_region()
    }
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

struct RoadsState {
    t: f64,
    direction: Rc<Cell<Direction>>,
    bitmaps: Option<(Bitmap, Bitmap)>,
    ctx: CanvasRenderingContext2d,
    view: CachedView<PixelView>,
    _keys: [KeyListener; 2],
}

/// Builds and creates a road host on `placeholder`.
///
/// Fails when the placeholder lacks `data-bg` or `data-tree`.
pub fn mount(
    placeholder: &DomPlaceholder,
    bitmaps: &BitmapCache,
    trace: &SharedTrace,
) -> Result<(), HostError> {
    let required = |name: &str| {
        placeholder.attribute(name).ok_or_else(|| {
            HostError::Create(DemoError::new(format!("Roads needs a data-{name} image")))
        })
    };
    let background = required("bg")?;
    let tree = required("tree")?;
    let bitmaps = bitmaps.clone();

    VisualizationHost::new(
        KIND,
        placeholder.platform(),
        Roads::new(SIZE),
        move |content: &HtmlElement, panel: Option<&mut PanelBuilder<RoadsState>>| {
            build(content, panel, &bitmaps, &background, &tree)
        },
        render,
    )
    .with_update(|state, t| {
        state.t = t;
        Ok(())
    })
    .with_options(placeholder.options())
    .with_trace(Rc::clone(trace))
    .create()
}

fn build(
    content: &HtmlElement,
    panel: Option<&mut PanelBuilder<RoadsState>>,
    bitmaps: &BitmapCache,
    background: &str,
    tree: &str,
) -> Result<Creation<RoadsState>, DemoError> {
    let document = page::document_of(content)?;
    let (canvas, ctx) = page::append_canvas(content, SIZE)?;
    // Focusable, so it receives key events.
    canvas.set_tab_index(0);

    let direction = Rc::new(Cell::new(Direction::FORWARD));
    let key = |kind: &str, apply: fn(&mut Direction, &str) -> bool| {
        let direction = Rc::clone(&direction);
        page::on_key(&canvas, kind, move |key| {
            let mut d = direction.get();
            let handled = apply(&mut d, key);
            direction.set(d);
            handled
        })
    };
    let keys = [key("keydown", Direction::press)?, key("keyup", Direction::release)?];

    if let Some(panel) = panel {
        panel.add_control(
            Field::number("t", |s: &RoadsState| s.t, |s, v| s.t = v),
            ControlSpec::number(),
        );
    }

    let background = bitmaps.load(&document, background);
    let tree = bitmaps.load(&document, tree);
    Ok(Creation::Pending(Box::pin(async move {
        let bitmaps = (background.await?, tree.await?);
        Ok(RoadsState {
            t: 0.0,
            direction,
            bitmaps: Some(bitmaps),
            ctx,
            view: CachedView::new(),
            _keys: keys,
        })
    })))
}

fn render(state: &mut RoadsState, kernel: &mut Roads) -> Result<(), DemoError> {
    if let Some((background, tree)) = state.bitmaps.take() {
        kernel.set_bitmaps(background, tree);
    }
    kernel.update(state.t, state.direction.get());
    page::present(&state.ctx, &mut state.view, kernel, SIZE)
}
