// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM scaffold and the browser [`Platform`].

use alloc::format;
use alloc::string::String;

use wasm_bindgen::JsCast as _;
use wasm_bindgen::JsValue;
use web_sys::{Document, HtmlElement};

use vizhost_core::error::HostError;
use vizhost_core::platform::{FrameCallback, LocalTask, Platform, VisibilityCallback};
use vizhost_core::time::Timebase;

use crate::pane::DomPane;
use crate::raf::RafLoop;
use crate::visibility::IntersectionWatch;

/// Attribute marking a container that already carries a scaffold. Its value
/// is the host title.
pub const CREATED_ATTRIBUTE: &str = "data-vizhost-created";

pub(crate) fn js_error(context: &str, e: &JsValue) -> String {
    format!("{context}: {e:?}")
}

pub(crate) fn create_html(document: &Document, tag: &str) -> Result<HtmlElement, HostError> {
    document
        .create_element(tag)
        .map_err(|e| HostError::Scaffold(js_error("create_element", &e)))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| HostError::Scaffold(format!("<{tag}> is not an HtmlElement")))
}

/// The browser platform for one demo container.
///
/// The scaffold is a flex row inside the container: the content area on the
/// left, the panel area on the right, each taking half the width.
pub struct WebPlatform {
    container: HtmlElement,
    root: Option<HtmlElement>,
    pane_area: Option<HtmlElement>,
}

impl core::fmt::Debug for WebPlatform {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WebPlatform")
            .field("container", &"HtmlElement")
            .field("scaffolded", &self.root.is_some())
            .finish_non_exhaustive()
    }
}

impl WebPlatform {
    /// Creates the platform for `container`. Nothing is inserted yet.
    #[must_use]
    pub fn new(container: HtmlElement) -> Self {
        Self {
            container,
            root: None,
            pane_area: None,
        }
    }

    /// Returns a reference to the container element.
    #[must_use]
    pub fn container(&self) -> &HtmlElement {
        &self.container
    }
}

impl Platform for WebPlatform {
    type Content = HtmlElement;
    type Panel = DomPane;
    type Frames = RafLoop;
    type Watch = IntersectionWatch;

    fn is_scaffolded(&self) -> bool {
        self.container.has_attribute(CREATED_ATTRIBUTE)
    }

    fn insert_scaffold(&mut self, title: &str) -> Result<HtmlElement, HostError> {
        let document = self
            .container
            .owner_document()
            .ok_or_else(|| HostError::Scaffold("container has no owner document".into()))?;

        let root = create_html(&document, "div")?;
        root.set_class_name("vizhost-root");
        let s = root.style();
        let _ = s.set_property("width", "100%");
        let _ = s.set_property("display", "flex");
        let _ = s.set_property("flex-direction", "row");

        let content = create_html(&document, "div")?;
        let pane_area = create_html(&document, "div")?;
        for area in [&content, &pane_area] {
            let _ = area.style().set_property("flex", "1");
            root.append_child(area)
                .map_err(|e| HostError::Scaffold(js_error("append_child", &e)))?;
        }

        self.container
            .append_child(&root)
            .map_err(|e| HostError::Scaffold(js_error("append_child", &e)))?;
        self.container
            .set_attribute(CREATED_ATTRIBUTE, title)
            .map_err(|e| HostError::Scaffold(js_error("set_attribute", &e)))?;
        self.root = Some(root);
        self.pane_area = Some(pane_area);
        Ok(content)
    }

    fn build_panel(&mut self, title: &str) -> Result<DomPane, HostError> {
        let area = self
            .pane_area
            .as_ref()
            .ok_or_else(|| HostError::Panel("no scaffold to hold the panel".into()))?;
        DomPane::new(area, title)
    }

    fn clear_scaffold(&mut self) {
        if let Some(root) = self.root.take() {
            root.remove();
        }
        self.pane_area = None;
        let _ = self.container.remove_attribute(CREATED_ATTRIBUTE);
    }

    fn timebase(&self) -> Timebase {
        crate::timebase()
    }

    fn frame_loop(&mut self, callback: FrameCallback) -> RafLoop {
        RafLoop::new(callback)
    }

    fn watch_visibility(
        &mut self,
        margin_px: u32,
        callback: VisibilityCallback,
    ) -> Result<IntersectionWatch, HostError> {
        IntersectionWatch::new(&self.container, margin_px, callback)
    }

    fn spawn_local(&self, task: LocalTask) {
        wasm_bindgen_futures::spawn_local(task);
    }
}
