// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mounting demos on `div[data-sample]` placeholders.

use alloc::string::String;
use alloc::vec::Vec;

use wasm_bindgen::JsCast as _;
use web_sys::{Element, HtmlElement};

use vizhost_core::bootstrap::{MountReport, Placeholder, SampleRegistry, mount_all};
use vizhost_core::error::HostError;
use vizhost_core::options::HostOptions;
use vizhost_core::trace::TraceSink;

use crate::scaffold::{WebPlatform, js_error};

/// Selector for demo placeholders.
pub const PLACEHOLDER_SELECTOR: &str = "div[data-sample]";

/// A placeholder element; attributes are read from its `dataset`.
#[derive(Clone, Debug)]
pub struct DomPlaceholder {
    element: HtmlElement,
}

impl DomPlaceholder {
    /// Wraps `element`.
    #[must_use]
    pub fn new(element: HtmlElement) -> Self {
        Self { element }
    }

    /// The placeholder element.
    #[must_use]
    pub fn element(&self) -> &HtmlElement {
        &self.element
    }

    /// A fresh platform on this placeholder.
    #[must_use]
    pub fn platform(&self) -> WebPlatform {
        WebPlatform::new(self.element.clone())
    }

    /// Host options from `data-static` and `data-disablepane`.
    #[must_use]
    pub fn options(&self) -> HostOptions {
        HostOptions::from_attributes(|name| self.attribute(name))
    }
}

impl Placeholder for DomPlaceholder {
    fn attribute(&self, name: &str) -> Option<String> {
        self.element.dataset().get(name)
    }

    fn set_fallback_text(&self, text: &str) {
        self.element.set_text_content(Some(text));
    }
}

/// Every placeholder under `root`, in document order.
pub fn placeholders(root: &Element) -> Result<Vec<DomPlaceholder>, HostError> {
    let nodes = root
        .query_selector_all(PLACEHOLDER_SELECTOR)
        .map_err(|e| HostError::Scaffold(js_error("querySelectorAll", &e)))?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .map(DomPlaceholder::new)
        .collect())
}

/// Mounts every placeholder under `root` through `registry`.
pub fn mount(
    root: &Element,
    registry: &SampleRegistry<DomPlaceholder>,
    trace: &mut dyn TraceSink,
) -> Result<MountReport, HostError> {
    let found = placeholders(root)?;
    Ok(mount_all(registry, &found, trace))
}
