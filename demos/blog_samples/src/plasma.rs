// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Palette-cycling plasma.
//!
//! Placeholder attributes: `data-step` picks which terms of the field are
//! summed ([`Step`]), `data-palette` the starting [`Palette`]. The panel edits
//! the time and switches palettes; a swatch under the image shows the active
//! palette.

use std::f64::consts::TAU;
use std::rc::Rc;

use web_sys::{CanvasRenderingContext2d, HtmlElement};

use vizhost_backend_web::{DomPlaceholder, ImageSize, PixelView};
use vizhost_core::bootstrap::Placeholder as _;
use vizhost_core::compute::{CachedView, Region, SharedMemory};
use vizhost_core::error::{DemoError, HostError};
use vizhost_core::host::{Creation, VisualizationHost};
use vizhost_core::panel::{ControlSpec, Field, PanelBuilder};

use crate::SharedTrace;
use crate::page;
use crate::pixels::{PixelBuffer, Rgba};

/// Sample kind in `data-sample`.
pub const KIND: &str = "Plasma";

/// Rendered image size.
pub const SIZE: ImageSize = ImageSize::new(160, 160);

const SWATCH: ImageSize = ImageSize::new(256, 20);

/// Time wraps at this many seconds.
const PERIOD: f64 = 20.0;

/// Which terms make up the plasma field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Step {
    /// Rings around the center.
    FixedCircle,
    /// Rings around a wandering center.
    ShiftedCircle,
    /// Interfering plane waves.
    Perturbation,
    /// All of the above, averaged.
    #[default]
    All,
}

impl Step {
    /// Every step, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::FixedCircle,
        Self::ShiftedCircle,
        Self::Perturbation,
        Self::All,
    ];

    /// The attribute spelling.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::FixedCircle => "FixedCircle",
            Self::ShiftedCircle => "ShiftedCircle",
            Self::Perturbation => "Perturbation",
            Self::All => "All",
        }
    }

    /// Parses the attribute spelling.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }
}

/// The 256-entry color ramp the field indexes into.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Palette {
    /// Black to white.
    Greyscale,
    /// Black to white and back.
    GreyscaleLooped,
    /// Three phase-shifted sine waves.
    #[default]
    Colors,
    /// [`Colors`](Self::Colors) in eight bands.
    ColorsStepped,
    /// A full hue circle.
    Rainbow,
    /// [`Rainbow`](Self::Rainbow) in eight bands.
    RainbowStepped,
}

impl Palette {
    /// Every palette; the position is the palette's index.
    pub const ALL: [Self; 6] = [
        Self::Greyscale,
        Self::GreyscaleLooped,
        Self::Colors,
        Self::ColorsStepped,
        Self::Rainbow,
        Self::RainbowStepped,
    ];

    /// The attribute spelling.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Greyscale => "Greyscale",
            Self::GreyscaleLooped => "GreyscaleLooped",
            Self::Colors => "Colors",
            Self::ColorsStepped => "ColorsStepped",
            Self::Rainbow => "Rainbow",
            Self::RainbowStepped => "RainbowStepped",
        }
    }

    /// Parses the attribute spelling.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Position in [`ALL`](Self::ALL).
    #[must_use]
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|p| *p == self).unwrap_or_default()
    }

    /// The palette at a panel value, if it names one.
    #[must_use]
    pub fn from_value(value: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.index() as f64 == value)
    }

    /// The 256 colors of the ramp.
    #[must_use]
    pub fn colors(self) -> Vec<Rgba> {
        (0..=255_u8).map(|i| self.color(i)).collect()
    }

    fn color(self, i: u8) -> Rgba {
        let f = f64::from(i) / 255.0;
        match self {
            Self::Greyscale => Rgba::opaque(i, i, i),
            Self::GreyscaleLooped => {
                let v = 1.0 - (2.0 * f - 1.0).abs();
                Rgba::from_unit(v, v, v)
            }
            Self::Colors => {
                let wave = |phase: f64| 0.5 + 0.5 * (TAU * (f + phase)).sin();
                Rgba::from_unit(wave(0.0), wave(1.0 / 3.0), wave(2.0 / 3.0))
            }
            Self::ColorsStepped => Self::Colors.color(band(i)),
            Self::Rainbow => hue(f),
            Self::RainbowStepped => Self::Rainbow.color(band(i)),
        }
    }
}

/// Middle of the eighth of the ramp `i` falls in.
fn band(i: u8) -> u8 {
    (i / 32) * 32 + 16
}

/// Fully saturated color at hue `h` turns.
fn hue(h: f64) -> Rgba {
    let channel = |offset: f64| {
        let k = (h * 6.0 + offset) % 6.0;
        1.0 - (k.min(4.0 - k).clamp(0.0, 1.0))
    };
    Rgba::from_unit(channel(5.0), channel(3.0), channel(1.0))
}

/// The plasma compute kernel.
#[derive(Clone, Debug)]
pub struct Plasma {
    step: Step,
    palette: Palette,
    colors: Vec<Rgba>,
    buffer: PixelBuffer,
}

impl Plasma {
    /// A black image of `size`.
    #[must_use]
    pub fn new(size: ImageSize, step: Step, palette: Palette) -> Self {
        Self {
            step,
            palette,
            colors: palette.colors(),
            buffer: PixelBuffer::new(size),
        }
    }

    /// The field terms in use.
    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    /// The active palette.
    #[must_use]
    pub fn palette(&self) -> Palette {
        self.palette
    }

    /// Switches palettes; takes effect on the next [`update`](Self::update).
    pub fn set_palette(&mut self, palette: Palette) {
        if palette != self.palette {
            self.palette = palette;
            self.colors = palette.colors();
        }
    }

    /// Colors of the active palette.
    #[must_use]
    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    /// The output image.
    #[must_use]
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Renders the field at time `t` seconds.
    pub fn update(&mut self, t: f64) {
        let size = self.buffer.size();
        let (w, h) = (f64::from(size.width), f64::from(size.height));
        let width = size.width as usize;
        let step = self.step;
        for (i, px) in self.buffer.pixels_mut().iter_mut().enumerate() {
            let u = (i % width) as f64 / w * 2.0 - 1.0;
            let v = (i / width) as f64 / h * 2.0 - 1.0;
            let value = field(step, u, v, t);
            #[expect(
                clippy::cast_possible_truncation,
                reason = "clamped to 0..=255 before the cast"
            )]
            let index = ((value + 1.0) * 0.5 * 255.0).round().clamp(0.0, 255.0) as usize;
            *px = self.colors[index];
        }
    }
}

impl SharedMemory for Plasma {
    fn shared_region(&self) -> Region {
        self.buffer.shared_region()
    }
}

/// Field value in `-1..=1` at `(u, v)` in `-1..=1`.
fn field(step: Step, u: f64, v: f64, t: f64) -> f64 {
    let fixed = || (10.0 * u.hypot(v) - 2.0 * t).sin();
    let shifted = || {
        let (cx, cy) = (0.5 * (0.7 * t).sin(), 0.5 * (0.9 * t).cos());
        (10.0 * (u - cx).hypot(v - cy) + t).sin()
    };
    let perturbation = || 0.5 * ((6.0 * u + t).sin() + (5.0 * v + 1.3 * t).sin());
    match step {
        Step::FixedCircle => fixed(),
        Step::ShiftedCircle => shifted(),
        Step::Perturbation => perturbation(),
        Step::All => (fixed() + shifted() + perturbation()) / 3.0,
    }
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

struct PlasmaState {
    t: f64,
    palette: f64,
    ctx: CanvasRenderingContext2d,
    swatch: CanvasRenderingContext2d,
    view: CachedView<PixelView>,
}

/// Builds and creates a plasma host on `placeholder`.
pub fn mount(placeholder: &DomPlaceholder, trace: &SharedTrace) -> Result<(), HostError> {
    let step = placeholder
        .attribute("step")
        .and_then(|name| Step::from_name(&name))
        .unwrap_or_default();
    let palette = placeholder
        .attribute("palette")
        .and_then(|name| Palette::from_name(&name))
        .unwrap_or_default();

    VisualizationHost::new(
        KIND,
        placeholder.platform(),
        Plasma::new(SIZE, step, palette),
        move |content: &HtmlElement, panel: Option<&mut PanelBuilder<PlasmaState>>| {
            build(content, panel, palette)
        },
        render,
    )
    .with_update(|state, t| {
        state.t = t % PERIOD;
        Ok(())
    })
    .with_options(placeholder.options())
    .with_trace(Rc::clone(trace))
    .create()
}

fn build(
    content: &HtmlElement,
    panel: Option<&mut PanelBuilder<PlasmaState>>,
    palette: Palette,
) -> Result<Creation<PlasmaState>, DemoError> {
    let (_, ctx) = page::append_canvas(content, SIZE)?;
    let (_, swatch) = page::append_canvas(content, SWATCH)?;
    draw_swatch(&swatch, &palette.colors());

    if let Some(panel) = panel {
        panel
            .add_control(
                Field::number("t", |s: &PlasmaState| s.t, |s, v| s.t = v),
                ControlSpec::range(0.0, 10.0),
            )
            .add_control(
                Field::number("palette", |s: &PlasmaState| s.palette, |s, v| s.palette = v),
                ControlSpec::choice(Palette::ALL.map(|p| (p.name(), p.index() as f64))),
            );
    }

    Ok(Creation::Ready(PlasmaState {
        t: 0.0,
        palette: palette.index() as f64,
        ctx,
        swatch,
        view: CachedView::new(),
    }))
}

fn render(state: &mut PlasmaState, kernel: &mut Plasma) -> Result<(), DemoError> {
    if let Some(wanted) = Palette::from_value(state.palette)
        && wanted != kernel.palette()
    {
        kernel.set_palette(wanted);
        draw_swatch(&state.swatch, kernel.colors());
    }
    kernel.update(state.t);
    page::present(&state.ctx, &mut state.view, kernel, SIZE)
}

fn draw_swatch(ctx: &CanvasRenderingContext2d, colors: &[Rgba]) {
    if colors.is_empty() {
        return;
    }
    let width = f64::from(SWATCH.width) / colors.len() as f64;
    for (i, color) in colors.iter().enumerate() {
        ctx.set_fill_style_str(&color.css_hex());
        ctx.fill_rect(i as f64 * width, 0.0, width, f64::from(SWATCH.height));
    }
}
