// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Angle dial: an SVG circle of radius `r` and a line at angle `a`.
//!
//! The pointer sets both (distance and direction from the center); the
//! panel edits them directly.

use std::cell::Cell;
use std::f64::consts::{FRAC_PI_4, TAU};
use std::rc::Rc;

use kurbo::{Point, Vec2};
use web_sys::{Element, HtmlElement};

use vizhost_backend_web::DomPlaceholder;
use vizhost_core::error::{DemoError, HostError};
use vizhost_core::host::{Creation, VisualizationHost};
use vizhost_core::panel::{ControlSpec, Field, PanelBuilder};

use crate::SharedTrace;
use crate::page::{self, PointerListener};

/// Sample kind in `data-sample`.
pub const KIND: &str = "Angles";

/// Largest radius, as a fraction of the dial width.
pub const MAX_RADIUS: f64 = 0.5;

/// Radius and angle, the radius a fraction of the dial width and the angle
/// in radians within `0..TAU`, clockwise from the positive x axis (y points
/// down).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Polar {
    /// Radius.
    pub r: f64,
    /// Angle.
    pub a: f64,
}

impl Polar {
    /// Polar form of an offset from the center, radius capped at
    /// [`MAX_RADIUS`].
    #[must_use]
    pub fn from_offset(offset: Vec2) -> Self {
        Self {
            r: offset.length().min(MAX_RADIUS),
            a: offset.atan2().rem_euclid(TAU),
        }
    }

    /// Polar form of a pointer position normalized to the dial's box.
    #[must_use]
    pub fn from_pointer(p: Point) -> Self {
        Self::from_offset(p - Point::new(0.5, 0.5))
    }
}

/// Dial geometry in SVG user units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dial {
    width: f64,
}

impl Dial {
    /// A square dial `width` units wide.
    #[must_use]
    pub const fn new(width: f64) -> Self {
        Self { width }
    }

    /// Width in user units.
    #[must_use]
    pub const fn width(self) -> f64 {
        self.width
    }

    /// The center.
    #[must_use]
    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.width / 2.0)
    }

    /// Circle radius in user units.
    #[must_use]
    pub fn radius(self, polar: Polar) -> f64 {
        polar.r * self.width
    }

    /// Far end of the angle line.
    #[must_use]
    pub fn line_end(self, polar: Polar) -> Point {
        self.center() + Vec2::from_angle(polar.a) * self.radius(polar)
    }

    fn draw(self, circle: &Element, line: &Element, polar: Polar) -> Result<(), DemoError> {
        let end = self.line_end(polar);
        page::set_attribute(circle, "r", &self.radius(polar).to_string())?;
        page::set_attribute(line, "x2", &end.x.to_string())?;
        page::set_attribute(line, "y2", &end.y.to_string())
    }
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

struct AnglesState {
    r: f64,
    a: f64,
    pointer: Rc<Cell<Option<Point>>>,
    circle: Element,
    line: Element,
    _listener: PointerListener,
}

/// Builds and creates an angle dial host on `placeholder`.
pub fn mount(placeholder: &DomPlaceholder, trace: &SharedTrace) -> Result<(), HostError> {
    VisualizationHost::new(
        KIND,
        placeholder.platform(),
        Dial::new(256.0),
        |content: &HtmlElement, panel: Option<&mut PanelBuilder<AnglesState>>| {
            build(content, panel, Dial::new(256.0))
        },
        |state: &mut AnglesState, dial: &mut Dial| {
            dial.draw(
                &state.circle,
                &state.line,
                Polar {
                    r: state.r,
                    a: state.a,
                },
            )
        },
    )
    .with_update(|state, _t| {
        if let Some(p) = state.pointer.take() {
            let polar = Polar::from_pointer(p);
            state.r = polar.r;
            state.a = polar.a;
        }
        Ok(())
    })
    .with_options(placeholder.options())
    .with_trace(Rc::clone(trace))
    .create()
}

fn build(
    content: &HtmlElement,
    panel: Option<&mut PanelBuilder<AnglesState>>,
    dial: Dial,
) -> Result<Creation<AnglesState>, DemoError> {
    let document = page::document_of(content)?;
    let width = dial.width().to_string();
    let c = dial.center().x.to_string();
    let view_box = format!("0 0 {width} {width}");

    let svg = page::svg_element(
        &document,
        "svg",
        &[
            ("width", width.as_str()),
            ("height", width.as_str()),
            ("version", "1.1"),
            ("viewBox", view_box.as_str()),
            ("style", "touch-action: none"),
        ],
    )?;
    let line = page::svg_element(
        &document,
        "line",
        &[
            ("x1", c.as_str()),
            ("y1", c.as_str()),
            ("x2", width.as_str()),
            ("y2", c.as_str()),
            ("stroke", "darkgrey"),
            ("stroke-width", "2%"),
            ("stroke-linecap", "round"),
        ],
    )?;
    let circle = page::svg_element(
        &document,
        "circle",
        &[
            ("r", c.as_str()),
            ("cx", c.as_str()),
            ("cy", c.as_str()),
            ("stroke", "grey"),
            ("fill", "transparent"),
        ],
    )?;
    svg.append_child(&line)
        .map_err(|e| page::js_error("append_child", &e))?;
    svg.append_child(&circle)
        .map_err(|e| page::js_error("append_child", &e))?;

    let pointer = Rc::new(Cell::new(None));
    let listener = {
        let pointer = Rc::clone(&pointer);
        page::on_pointer_move(&svg, move |p| pointer.set(Some(p)))?
    };
    content
        .append_child(&svg)
        .map_err(|e| page::js_error("append_child", &e))?;

    if let Some(panel) = panel {
        panel
            .add_control(
                Field::number("a", |s: &AnglesState| s.a, |s, v| s.a = v).labeled("angle"),
                ControlSpec::range(0.0, TAU).with_step(0.1),
            )
            .add_control(
                Field::number("r", |s: &AnglesState| s.r, |s, v| s.r = v).labeled("radius"),
                ControlSpec::range(0.0, MAX_RADIUS),
            );
    }

    Ok(Creation::Ready(AnglesState {
        r: 0.4,
        a: FRAC_PI_4,
        pointer,
        circle,
        line,
        _listener: listener,
    }))
}
