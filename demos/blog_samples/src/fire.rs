// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stateful doom fire.
//!
//! Heat lives in a byte grid that persists between frames. The pointer
//! keeps a circle at full heat; every update moves each cell one row up,
//! cooling it by a random amount up to the attenuation and shifting it
//! sideways by a random amount inside the wind range.

use std::cell::Cell;
use std::rc::Rc;

use kurbo::Point;
use web_sys::{CanvasRenderingContext2d, HtmlElement};

use vizhost_backend_web::{DomPlaceholder, ImageSize, PixelView};
use vizhost_core::compute::{CachedView, Region, SharedMemory};
use vizhost_core::error::{DemoError, HostError};
use vizhost_core::host::{Creation, VisualizationHost};
use vizhost_core::panel::{ControlSpec, Field, PanelBuilder};

use crate::SharedTrace;
use crate::page::{self, PointerListener};
use crate::pixels::{PixelBuffer, Rgba};
use crate::random::XorShift32;

/// Sample kind in `data-sample`.
pub const KIND: &str = "firestate";

/// Rendered image size.
pub const SIZE: ImageSize = ImageSize::new(32 * 4, 32 * 4);

/// Hottest heat level; the palette has one entry per level.
pub const MAX_HEAT: u8 = 36;

const PALETTE_KEYS: [(u8, Rgba); 6] = [
    (0, Rgba::opaque(7, 7, 7)),
    (8, Rgba::opaque(143, 39, 7)),
    (16, Rgba::opaque(223, 87, 7)),
    (24, Rgba::opaque(207, 111, 15)),
    (30, Rgba::opaque(191, 167, 39)),
    (MAX_HEAT, Rgba::opaque(255, 255, 255)),
];

/// Color per heat level, interpolated between fixed keys.
#[must_use]
pub fn fire_palette() -> Vec<Rgba> {
    (0..=MAX_HEAT)
        .map(|level| {
            let upper = PALETTE_KEYS
                .iter()
                .position(|(key, _)| *key >= level)
                .unwrap_or(PALETTE_KEYS.len() - 1);
            let (hi, hi_color) = PALETTE_KEYS[upper];
            if upper == 0 || hi == level {
                return hi_color;
            }
            let (lo, lo_color) = PALETTE_KEYS[upper - 1];
            let t = f64::from(level - lo) / f64::from(hi - lo);
            lo_color.lerp(hi_color, t)
        })
        .collect()
}

/// The fire compute kernel.
#[derive(Clone, Debug)]
pub struct StatefulFire {
    width: usize,
    height: usize,
    heat: Vec<u8>,
    palette: Vec<Rgba>,
    buffer: PixelBuffer,
    rng: XorShift32,
}

impl StatefulFire {
    /// A cold fire of `size`.
    #[must_use]
    pub fn new(size: ImageSize) -> Self {
        let (width, height) = (size.width as usize, size.height as usize);
        Self {
            width,
            height,
            heat: vec![0; width * height],
            palette: fire_palette(),
            buffer: PixelBuffer::new(size),
            rng: XorShift32::default(),
        }
    }

    /// Heat grid, row-major.
    #[must_use]
    pub fn heat(&self) -> &[u8] {
        &self.heat
    }

    /// The output image.
    #[must_use]
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Sets every cell within `radius` pixels of `center` to full heat.
    /// Parts outside the grid are ignored.
    pub fn circle(&mut self, center: Point, radius: f64) {
        let radius = radius.max(0.0);
        let (w, h) = (self.width as f64, self.height as f64);
        let x0 = (center.x - radius).floor().max(0.0);
        let x1 = (center.x + radius).ceil().min(w - 1.0);
        let y0 = (center.y - radius).floor().max(0.0);
        let y1 = (center.y + radius).ceil().min(h - 1.0);
        if x0 > x1 || y0 > y1 {
            return;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "bounds clamped to the grid above"
        )]
        let (x0, x1, y0, y1) = (x0 as usize, x1 as usize, y0 as usize, y1 as usize);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = Point::new(x as f64, y as f64).distance(center);
                if d <= radius {
                    self.heat[y * self.width + x] = MAX_HEAT;
                }
            }
        }
    }

    /// Advances the fire by one step and repaints the image.
    ///
    /// `attenuation` bounds the random cooling per row. Each cell drifts
    /// sideways by a random whole number of pixels in `wind_min..=wind_max`
    /// (the bounds may come in either order), wrapping at the edges.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "cooling is below 256 and the wrapped column is below the width"
    )]
    pub fn update(&mut self, attenuation: u8, wind_min: i32, wind_max: i32) {
        let (lo, hi) = if wind_min <= wind_max {
            (wind_min, wind_max)
        } else {
            (wind_max, wind_min)
        };
        let span = hi.abs_diff(lo) + 1;
        let cooling = u32::from(attenuation) + 1;
        let width = self.width;

        for y in 1..self.height {
            for x in 0..width {
                let rnd = self.rng.next_u32();
                let cool = (rnd % cooling) as u8;
                let drift = lo + ((rnd >> 8) % span) as i32;
                let target = (x as i64 - i64::from(drift)).rem_euclid(width as i64) as usize;
                let heat = self.heat[y * width + x].saturating_sub(cool);
                self.heat[(y - 1) * width + target] = heat;
            }
        }

        for (px, heat) in self.buffer.pixels_mut().iter_mut().zip(&self.heat) {
            *px = self.palette[usize::from((*heat).min(MAX_HEAT))];
        }
    }
}

impl SharedMemory for StatefulFire {
    fn shared_region(&self) -> Region {
        self.buffer.shared_region()
    }
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

struct FireState {
    t: f64,
    radius: f64,
    attenuation: f64,
    wind_min: f64,
    wind_max: f64,
    pointer: Rc<Cell<Point>>,
    ctx: CanvasRenderingContext2d,
    view: CachedView<PixelView>,
    _listener: PointerListener,
}

/// Builds and creates a fire host on `placeholder`.
pub fn mount(placeholder: &DomPlaceholder, trace: &SharedTrace) -> Result<(), HostError> {
    VisualizationHost::new(
        "Fire",
        placeholder.platform(),
        StatefulFire::new(SIZE),
        build,
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
    panel: Option<&mut PanelBuilder<FireState>>,
) -> Result<Creation<FireState>, DemoError> {
    let (canvas, ctx) = page::append_canvas(content, SIZE)?;

    let pointer = Rc::new(Cell::new(Point::new(
        f64::from(SIZE.width / 2),
        f64::from(SIZE.height / 2),
    )));
    let listener = {
        let pointer = Rc::clone(&pointer);
        page::on_pointer_move(&canvas, move |p| {
            pointer.set(Point::new(
                (p.x * f64::from(SIZE.width)).floor(),
                (p.y * f64::from(SIZE.height)).floor(),
            ));
        })?
    };

    if let Some(panel) = panel {
        let steps = |min, max| ControlSpec::range(min, max).with_step(1.0);
        panel
            .add_control(
                Field::number("r", |s: &FireState| s.radius, |s, v| s.radius = v)
                    .labeled("mouse radius"),
                steps(1.0, 50.0),
            )
            .add_monitor(Field::number_readout("t", |s: &FireState| s.t))
            .add_control(
                Field::number("attenuation", |s: &FireState| s.attenuation, |s, v| {
                    s.attenuation = v;
                }),
                steps(0.0, 8.0),
            )
            .add_control(
                Field::number("x_min", |s: &FireState| s.wind_min, |s, v| s.wind_min = v)
                    .labeled("x min"),
                steps(-8.0, 8.0),
            )
            .add_control(
                Field::number("x_max", |s: &FireState| s.wind_max, |s, v| s.wind_max = v)
                    .labeled("x max"),
                steps(-8.0, 8.0),
            );
    }

    Ok(Creation::Ready(FireState {
        t: 0.0,
        radius: 5.0,
        attenuation: 1.0,
        wind_min: -1.0,
        wind_max: 3.0,
        pointer,
        ctx,
        view: CachedView::new(),
        _listener: listener,
    }))
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "panel values are clamped to small ranges"
)]
fn render(state: &mut FireState, kernel: &mut StatefulFire) -> Result<(), DemoError> {
    kernel.circle(state.pointer.get(), state.radius);
    kernel.update(
        state.attenuation.round().clamp(0.0, 255.0) as u8,
        state.wind_min.round() as i32,
        state.wind_max.round() as i32,
    );
    page::present(&state.ctx, &mut state.view, kernel, SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fire(w: u32, h: u32) -> StatefulFire {
        StatefulFire::new(ImageSize::new(w, h))
    }

    #[test]
    fn palette_runs_dark_to_white() {
        let palette = fire_palette();
        assert_eq!(palette.len(), usize::from(MAX_HEAT) + 1);
        assert_eq!(palette[0], Rgba::opaque(7, 7, 7));
        assert_eq!(palette[usize::from(MAX_HEAT)], Rgba::opaque(255, 255, 255));
        assert_eq!(palette[4], Rgba::opaque(75, 23, 7), "halfway between keys 0 and 8");
    }

    #[test]
    fn circle_heats_inside_radius_only() {
        let mut f = fire(9, 9);
        f.circle(Point::new(4.0, 4.0), 1.0);
        let hot: Vec<_> = (0..81).filter(|&i| f.heat()[i] == MAX_HEAT).collect();
        assert_eq!(hot, [31, 39, 40, 41, 49]);
    }

    #[test]
    fn circle_is_clipped_at_edges() {
        let mut f = fire(4, 4);
        f.circle(Point::new(0.0, 0.0), 1.5);
        assert_eq!(f.heat()[0], MAX_HEAT);
        assert_eq!(f.heat()[5], MAX_HEAT);
        f.circle(Point::new(-10.0, 50.0), 2.0);
        assert_eq!(f.heat().iter().filter(|&&h| h == MAX_HEAT).count(), 4);
    }

    #[test]
    fn calm_fire_rises_unchanged() {
        let mut f = fire(4, 3);
        f.circle(Point::new(1.0, 2.0), 0.0);
        f.update(0, 0, 0);
        assert_eq!(f.heat()[4 + 1], MAX_HEAT, "heat moved up one row");
        assert_eq!(f.buffer().pixels()[4 + 1], Rgba::opaque(255, 255, 255));
        assert_eq!(f.buffer().pixels()[0], Rgba::opaque(7, 7, 7));
    }

    #[test]
    fn wind_shifts_and_wraps() {
        let mut f = fire(4, 2);
        f.circle(Point::new(0.0, 1.0), 0.0);
        f.update(0, 1, 1);
        assert_eq!(f.heat()[3], MAX_HEAT, "drift of 1 from column 0 wraps to 3");
    }

    #[test]
    fn cooling_is_bounded_by_attenuation() {
        let mut f = fire(8, 2);
        for y in 0..2 {
            for x in 0..8 {
                f.circle(Point::new(f64::from(x), f64::from(y)), 0.0);
            }
        }
        f.update(3, 2, -2);
        assert!(
            f.heat()[..8].iter().all(|&h| (MAX_HEAT - 3..=MAX_HEAT).contains(&h)),
            "top row: {:?}",
            &f.heat()[..8]
        );
    }
}
