// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM helpers shared by the samples.

use kurbo::Point;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement, KeyboardEvent,
    PointerEvent,
};

use vizhost_backend_web::{ImageSize, PixelView, pointer_position};
use vizhost_core::compute::{CachedView, SharedMemory};
use vizhost_core::error::{DemoError, HostError};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// A `pointermove` listener; dropping it makes later events throw, so it
/// lives as long as the element it is attached to.
pub(crate) type PointerListener = Closure<dyn FnMut(PointerEvent)>;

/// A `keydown` or `keyup` listener, kept alive the same way.
pub(crate) type KeyListener = Closure<dyn FnMut(KeyboardEvent)>;

pub(crate) fn js_error(context: &str, e: &JsValue) -> DemoError {
    DemoError::new(format!("{context}: {e:?}"))
}

pub(crate) fn host_error(e: &HostError) -> DemoError {
    DemoError::new(e.to_string())
}

pub(crate) fn document_of(element: &HtmlElement) -> Result<Document, DemoError> {
    element
        .owner_document()
        .ok_or_else(|| DemoError::new("content area is not in a document"))
}

/// Appends a canvas of `size` pixels, stretched to the parent's width.
pub(crate) fn append_canvas(
    parent: &HtmlElement,
    size: ImageSize,
) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), DemoError> {
    let document = document_of(parent)?;
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| js_error("create_element", &e))?
        .dyn_into()
        .map_err(|_| DemoError::new("<canvas> is not a canvas"))?;
    canvas.set_width(size.width);
    canvas.set_height(size.height);
    let style = canvas.style();
    let _ = style.set_property("width", "100%");
    let _ = style.set_property("touch-action", "none");
    parent
        .append_child(&canvas)
        .map_err(|e| js_error("append_child", &e))?;

    let ctx = canvas
        .get_context("2d")
        .map_err(|e| js_error("get_context", &e))?
        .ok_or_else(|| DemoError::new("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| DemoError::new("2d context has the wrong type"))?;
    Ok((canvas, ctx))
}

/// Creates an SVG element with the given attributes.
pub(crate) fn svg_element(
    document: &Document,
    tag: &str,
    attributes: &[(&str, &str)],
) -> Result<Element, DemoError> {
    let element = document
        .create_element_ns(Some(SVG_NS), tag)
        .map_err(|e| js_error("create_element_ns", &e))?;
    for (name, value) in attributes {
        set_attribute(&element, name, value)?;
    }
    Ok(element)
}

pub(crate) fn set_attribute(element: &Element, name: &str, value: &str) -> Result<(), DemoError> {
    element
        .set_attribute(name, value)
        .map_err(|e| js_error("set_attribute", &e))
}

/// Calls `on_move` with the pointer position over `target`, normalized to
/// `0..=1` on both axes.
pub(crate) fn on_pointer_move(
    target: &Element,
    mut on_move: impl FnMut(Point) + 'static,
) -> Result<PointerListener, DemoError> {
    let element = target.clone();
    let listener = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
        on_move(pointer_position(&element, &event));
    });
    target
        .add_event_listener_with_callback("pointermove", listener.as_ref().unchecked_ref())
        .map_err(|e| js_error("add_event_listener", &e))?;
    Ok(listener)
}

/// Calls `on_key` with the `key` of every `kind` event (`"keydown"` or
/// `"keyup"`) on `target`. Keys it reports as handled do not scroll the page.
pub(crate) fn on_key(
    target: &Element,
    kind: &str,
    mut on_key: impl FnMut(&str) -> bool + 'static,
) -> Result<KeyListener, DemoError> {
    let listener = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
        if on_key(&event.key()) {
            event.prevent_default();
        }
    });
    target
        .add_event_listener_with_callback(kind, listener.as_ref().unchecked_ref())
        .map_err(|e| js_error("add_event_listener", &e))?;
    Ok(listener)
}

/// Draws the kernel's current image onto `ctx` at the origin.
pub(crate) fn present(
    ctx: &CanvasRenderingContext2d,
    view: &mut CachedView<PixelView>,
    source: &impl SharedMemory,
    size: ImageSize,
) -> Result<(), DemoError> {
    let view = view
        .get(source.shared_region(), size)
        .map_err(|e| host_error(&e))?;
    ctx.put_image_data(view.image_data(), 0.0, 0.0)
        .map_err(|e| js_error("putImageData", &e))
}
