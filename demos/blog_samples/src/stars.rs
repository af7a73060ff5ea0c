// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Star field flying towards the pointer, past a spinning planet.
//!
//! Placeholder attributes: `data-planet` is the URL of the planet texture
//! (required) and `data-step` picks what is drawn ([`StarsStep`]). The
//! texture is fetched when the demo first becomes visible, so creation
//! finishes asynchronously.

use std::cell::Cell;
use std::f64::consts::FRAC_1_PI;
use std::rc::Rc;

use kurbo::{Point, Vec2};
use web_sys::{CanvasRenderingContext2d, HtmlElement};

use vizhost_backend_web::{DomPlaceholder, ImageSize, PixelView};
use vizhost_core::bootstrap::Placeholder as _;
use vizhost_core::compute::{CachedView, Region, SharedMemory};
use vizhost_core::error::{DemoError, HostError};
use vizhost_core::host::{Creation, VisualizationHost};
use vizhost_core::panel::{ControlSpec, Field, PanelBuilder};

use crate::SharedTrace;
use crate::bitmap::{Bitmap, BitmapCache};
use crate::page::{self, PointerListener};
use crate::pixels::{PixelBuffer, Rgba};
use crate::random::XorShift32;

/// Sample kind in `data-sample`.
pub const KIND: &str = "Stars";

/// Rendered image size.
pub const SIZE: ImageSize = ImageSize::new(512, 512);

/// Stars in the field.
pub const STAR_COUNT: usize = 800;

/// Stars closer than this are recycled to the far plane.
const NEAR: f64 = 0.05;

/// Planet radius as a fraction of the smaller image side.
const PLANET_RADIUS: f64 = 0.2;

/// Planet turns this many times per second.
const PLANET_SPIN: f64 = 0.02;

/// What the kernel draws.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StarsStep {
    /// Stars as single dots.
    Points,
    /// Stars as streaks away from the vanishing point.
    Radial,
    /// Streaks in front of the planet.
    #[default]
    All,
}

impl StarsStep {
    /// Every step, in declaration order.
    pub const ALL: [Self; 3] = [Self::Points, Self::Radial, Self::All];

    /// The attribute spelling.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Points => "Points",
            Self::Radial => "Radial",
            Self::All => "All",
        }
    }

    /// Parses the attribute spelling.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    /// Starting speed; streaks alone read better slowly.
    #[must_use]
    pub fn default_speed(self) -> f64 {
        match self {
            Self::Radial => 0.01,
            Self::Points | Self::All => 0.06,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Star {
    /// Position on the far plane, both axes in `-1..1`.
    at: Vec2,
    /// Depth in `NEAR..=1`.
    z: f64,
}

/// Screen position of a point at `at` and depth `z`, seen from a camera
/// whose vanishing point is `vanish`.
fn project(at: Vec2, z: f64, vanish: Point, size: ImageSize) -> Point {
    vanish + at * (f64::from(size.width) / 2.0 / z)
}

/// The star field compute kernel.
#[derive(Clone, Debug)]
pub struct Stars {
    size: ImageSize,
    step: StarsStep,
    sprite: Bitmap,
    stars: Vec<Star>,
    rng: XorShift32,
    buffer: PixelBuffer,
}

impl Stars {
    /// A field of [`STAR_COUNT`] stars, scattered in depth, with no planet
    /// texture yet.
    #[must_use]
    pub fn new(size: ImageSize, step: StarsStep) -> Self {
        let mut rng = XorShift32::new(0x5eed);
        let stars = (0..STAR_COUNT)
            .map(|_| Star {
                at: Vec2::new(rng.next_signed(), rng.next_signed()),
                z: NEAR + rng.next_unit() * (1.0 - NEAR),
            })
            .collect();
        Self {
            size,
            step,
            sprite: Bitmap::solid(ImageSize::new(0, 0), Rgba::BLACK),
            stars,
            rng,
            buffer: PixelBuffer::new(size),
        }
    }

    /// What is drawn.
    #[must_use]
    pub fn step(&self) -> StarsStep {
        self.step
    }

    /// Replaces the planet texture.
    pub fn set_sprite(&mut self, sprite: Bitmap) {
        self.sprite = sprite;
    }

    /// Depth of every star.
    pub fn depths(&self) -> impl Iterator<Item = f64> + '_ {
        self.stars.iter().map(|s| s.z)
    }

    /// The output image.
    #[must_use]
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Moves every star `speed` closer and repaints.
    ///
    /// `pointer` is the vanishing point, normalized to the image. `t` turns
    /// the planet.
    pub fn update(&mut self, t: f64, pointer: Point, speed: f64) {
        let vanish = Point::new(
            pointer.x * f64::from(self.size.width),
            pointer.y * f64::from(self.size.height),
        );
        self.buffer.pixels_mut().fill(Rgba::BLACK);
        if self.step == StarsStep::All {
            self.draw_planet(t, vanish);
        }

        for i in 0..self.stars.len() {
            let star = self.stars[i];
            let z = star.z - speed.max(0.0);
            if z < NEAR {
                self.stars[i] = Star {
                    at: Vec2::new(self.rng.next_signed(), self.rng.next_signed()),
                    z: 1.0,
                };
                continue;
            }
            self.stars[i].z = z;

            let color = Rgba::opaque(255, 255, 255).scaled(1.0 - z);
            let to = project(star.at, z, vanish, self.size);
            match self.step {
                StarsStep::Points => self.plot(to, color),
                StarsStep::Radial | StarsStep::All => {
                    let from = project(star.at, star.z, vanish, self.size);
                    self.streak(from, to, color);
                }
            }
        }
    }

    /// Shades a textured sphere centered on `center`.
    fn draw_planet(&mut self, t: f64, center: Point) {
        let size = self.size;
        let radius = PLANET_RADIUS * f64::from(size.width.min(size.height));
        if radius <= 0.0 || self.sprite.size().width == 0 {
            return;
        }
        let width = size.width as usize;
        for (i, px) in self.buffer.pixels_mut().iter_mut().enumerate() {
            let (x, y) = (i % width, i / width);
            let n = (Point::new(x as f64 + 0.5, y as f64 + 0.5) - center) / radius;
            let depth = 1.0 - n.length_squared();
            if depth <= 0.0 {
                continue;
            }
            let nz = depth.sqrt();
            let u = n.x.atan2(nz) * 0.5 * FRAC_1_PI + 0.5 + t * PLANET_SPIN;
            let v = n.y.asin() * FRAC_1_PI + 0.5;
            *px = self.sprite.sample_wrapped(u, v).scaled(nz);
        }
    }

    fn plot(&mut self, p: Point, color: Rgba) {
        let (w, h) = (f64::from(self.size.width), f64::from(self.size.height));
        if !(0.0..w).contains(&p.x) || !(0.0..h).contains(&p.y) {
            return;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "inside the image, checked above"
        )]
        let index = p.y as usize * self.size.width as usize + p.x as usize;
        if let Some(px) = self.buffer.pixels_mut().get_mut(index) {
            *px = px.max(color);
        }
    }

    fn streak(&mut self, from: Point, to: Point, color: Rgba) {
        let steps = (to - from).length().ceil().clamp(1.0, 64.0);
        #[expect(clippy::cast_possible_truncation, reason = "clamped to 1..=64")]
        let count = steps as usize;
        for k in 0..=count {
            self.plot(from.lerp(to, k as f64 / steps), color);
        }
    }
}

impl SharedMemory for Stars {
    fn shared_region(&self) -> Region {
        self.buffer.shared_region()
    }
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

struct StarsState {
    t: f64,
    speed: f64,
    pointer: Rc<Cell<Point>>,
    sprite: Option<Bitmap>,
    ctx: CanvasRenderingContext2d,
    view: CachedView<PixelView>,
    _listener: PointerListener,
}

/// Builds and creates a star field host on `placeholder`.
///
/// Fails when the placeholder has no `data-planet`.
pub fn mount(
    placeholder: &DomPlaceholder,
    bitmaps: &BitmapCache,
    trace: &SharedTrace,
) -> Result<(), HostError> {
    let planet = placeholder
        .attribute("planet")
        .ok_or_else(|| HostError::Create(DemoError::new("Stars needs a data-planet image")))?;
    let step = placeholder
        .attribute("step")
        .and_then(|name| StarsStep::from_name(&name))
        .unwrap_or_default();
    let bitmaps = bitmaps.clone();

    VisualizationHost::new(
        KIND,
        placeholder.platform(),
        Stars::new(SIZE, step),
        move |content: &HtmlElement, panel: Option<&mut PanelBuilder<StarsState>>| {
            build(content, panel, step, &bitmaps, &planet)
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
    panel: Option<&mut PanelBuilder<StarsState>>,
    step: StarsStep,
    bitmaps: &BitmapCache,
    planet: &str,
) -> Result<Creation<StarsState>, DemoError> {
    let document = page::document_of(content)?;
    let (canvas, ctx) = page::append_canvas(content, SIZE)?;

    let pointer = Rc::new(Cell::new(Point::new(0.5, 0.5)));
    let listener = {
        let pointer = Rc::clone(&pointer);
        page::on_pointer_move(&canvas, move |p| pointer.set(p))?
    };

    if let Some(panel) = panel {
        panel
            .add_control(
                Field::number("t", |s: &StarsState| s.t, |s, v| s.t = v),
                ControlSpec::range(0.0, 1000.0),
            )
            .add_control(
                Field::number("speed_factor", |s: &StarsState| s.speed, |s, v| s.speed = v)
                    .labeled("speed"),
                ControlSpec::range(0.01, 0.2).with_step(0.01),
            );
    }

    let sprite = bitmaps.load(&document, planet);
    Ok(Creation::Pending(Box::pin(async move {
        let sprite = sprite.await?;
        Ok(StarsState {
            t: 0.0,
            speed: step.default_speed(),
            pointer,
            sprite: Some(sprite),
            ctx,
            view: CachedView::new(),
            _listener: listener,
        })
    })))
}

fn render(state: &mut StarsState, kernel: &mut Stars) -> Result<(), DemoError> {
    if let Some(sprite) = state.sprite.take() {
        kernel.set_sprite(sprite);
    }
    kernel.update(state.t, state.pointer.get(), state.speed);
    page::present(&state.ctx, &mut state.view, kernel, SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: ImageSize = ImageSize::new(64, 64);
    const CENTER: Point = Point::new(0.5, 0.5);

    fn pixel(stars: &Stars, x: usize, y: usize) -> Rgba {
        stars.buffer().pixels()[y * SMALL.width as usize + x]
    }

    #[test]
    fn names_parse_back() {
        for step in StarsStep::ALL {
            assert_eq!(StarsStep::from_name(step.name()), Some(step));
        }
        assert_eq!(StarsStep::from_name("radial"), None);
        assert!(StarsStep::Radial.default_speed() < StarsStep::All.default_speed());
    }

    #[test]
    fn projection_scales_with_depth() {
        let vanish = Point::new(32.0, 32.0);
        assert_eq!(project(Vec2::ZERO, 0.3, vanish, SMALL), vanish);
        assert_eq!(
            project(Vec2::new(0.5, -0.25), 0.5, vanish, SMALL),
            Point::new(64.0, 16.0)
        );
    }

    #[test]
    fn stars_approach_and_recycle() {
        let mut stars = Stars::new(SMALL, StarsStep::Points);
        let before: Vec<_> = stars.depths().collect();
        assert_eq!(before.len(), STAR_COUNT);
        stars.update(0.0, CENTER, 0.01);
        let after: Vec<_> = stars.depths().collect();
        for (b, a) in before.iter().zip(&after) {
            assert!(*a < *b || *a == 1.0, "{b} -> {a}");
        }

        stars.update(0.0, CENTER, 1.0);
        assert!(stars.depths().all(|z| z == 1.0), "every star recycled");
    }

    #[test]
    fn planet_sits_on_the_vanishing_point() {
        let red = Rgba::opaque(255, 0, 0);
        let mut stars = Stars::new(SMALL, StarsStep::All);
        stars.set_sprite(Bitmap::solid(ImageSize::new(4, 4), red));
        stars.update(0.0, CENTER, 0.0);
        assert_eq!(pixel(&stars, 32, 32).r, 255, "lit face of the planet");
        assert_eq!(pixel(&stars, 1, 1).r, pixel(&stars, 1, 1).g, "space stays grey");

        let mut dots = Stars::new(SMALL, StarsStep::Points);
        dots.set_sprite(Bitmap::solid(ImageSize::new(4, 4), red));
        dots.update(0.0, CENTER, 0.0);
        assert!(pixel(&dots, 32, 32).r < 255, "no planet without the full step");
    }

    #[test]
    fn moving_stars_leave_light() {
        let mut stars = Stars::new(SMALL, StarsStep::Radial);
        stars.update(0.0, CENTER, 0.05);
        assert!(
            stars.buffer().pixels().iter().any(|px| px.r > 0),
            "some streak is on screen"
        );
    }
}
