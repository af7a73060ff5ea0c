// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser tests for the DOM pieces of the web backend.

#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use vizhost_backend_web::{CREATED_ATTRIBUTE, DomPlaceholder, WebPlatform, mount};
use vizhost_core::bootstrap::{Placeholder, SampleRegistry, UNKNOWN_TEXT};
use vizhost_core::panel::{ControlSpec, PanelEdit, ParamValue, ParameterPanel};
use vizhost_core::platform::Platform;
use vizhost_core::trace::NoopSink;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Event, HtmlElement, HtmlInputElement};

wasm_bindgen_test_configure!(run_in_browser);

fn fresh_div() -> HtmlElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let div: HtmlElement = document.create_element("div").unwrap().unchecked_into();
    document.body().unwrap().append_child(&div).unwrap();
    div
}

#[wasm_bindgen_test]
fn scaffold_marks_and_clears_the_container() {
    let div = fresh_div();
    let mut platform = WebPlatform::new(div.clone());
    assert!(!platform.is_scaffolded());
    let content = platform.insert_scaffold("Plasma").unwrap();
    assert!(platform.is_scaffolded());
    assert_eq!(div.get_attribute(CREATED_ATTRIBUTE).as_deref(), Some("Plasma"));
    assert!(div.contains(Some(content.as_ref())));

    platform.clear_scaffold();
    assert!(!platform.is_scaffolded());
    assert_eq!(div.child_element_count(), 0);
}

#[wasm_bindgen_test]
fn pane_reports_edits_and_shows_values() {
    let div = fresh_div();
    let mut platform = WebPlatform::new(div.clone());
    platform.insert_scaffold("fire").unwrap();
    let mut pane = platform.build_panel("fire").unwrap();
    pane.add_control(
        "r",
        "mouse radius",
        &ControlSpec::range(1.0, 50.0).with_step(1.0),
        &ParamValue::Number(5.0),
    )
    .unwrap();
    pane.add_monitor("t", "t", &ParamValue::Number(0.0)).unwrap();

    let edits: Rc<RefCell<Vec<PanelEdit>>> = Rc::default();
    let sink = edits.clone();
    pane.set_listener(Box::new(move |edit| sink.borrow_mut().push(edit)));

    let input: HtmlInputElement = div
        .query_selector("input[type=range]")
        .unwrap()
        .expect("slider for r")
        .unchecked_into();
    assert_eq!(input.value_as_number(), 5.0);
    input.set_value_as_number(12.0);
    input
        .dispatch_event(&Event::new("input").unwrap())
        .unwrap();
    assert_eq!(
        edits.borrow().as_slice(),
        &[PanelEdit {
            key: "r",
            value: ParamValue::Number(12.0)
        }]
    );

    pane.set_value("t", &ParamValue::Number(1.5));
    let output = div.query_selector("output").unwrap().expect("monitor for t");
    assert_eq!(output.text_content().as_deref(), Some("1.500"));
}

#[wasm_bindgen_test]
fn unknown_samples_show_fallback_text() {
    let root = fresh_div();
    root.set_inner_html(r#"<div data-sample="Stars"></div><div data-sample="Angles" data-static="true"></div>"#);
    let mut registry = SampleRegistry::<DomPlaceholder>::new();
    registry.register("Angles", |placeholder: &DomPlaceholder| {
        assert!(placeholder.options().is_static);
        Ok(())
    });
    let report = mount(&root, &registry, &mut NoopSink).unwrap();
    assert_eq!((report.mounted, report.unknown), (1, 1));

    let stars = DomPlaceholder::new(root.first_element_child().unwrap().unchecked_into());
    assert_eq!(stars.attribute("sample").as_deref(), Some("Stars"));
    assert_eq!(stars.element().text_content().as_deref(), Some(UNKNOWN_TEXT));
}
