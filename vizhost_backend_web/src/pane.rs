// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parameter panel built from native form inputs.
//!
//! Bounded numbers become `<input type=range>` with a readout, unbounded ones
//! `<input type=number>`, toggles checkboxes and choices a `<select>`.
//! Monitors are plain text.

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::{String, ToString as _};
use alloc::vec::Vec;
use core::cell::RefCell;

use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Event, HtmlElement, HtmlInputElement, HtmlOptionElement, HtmlSelectElement};

use vizhost_core::error::HostError;
use vizhost_core::panel::{ControlSpec, PanelEdit, ParamValue, ParameterPanel};

use crate::scaffold::{create_html, js_error};

type Listener = Rc<RefCell<Option<Box<dyn FnMut(PanelEdit)>>>>;

enum Widget {
    Number {
        input: HtmlInputElement,
        readout: Option<HtmlElement>,
    },
    Toggle(HtmlInputElement),
    Choice {
        select: HtmlSelectElement,
        values: Vec<f64>,
    },
    Monitor(HtmlElement),
}

struct Row {
    key: &'static str,
    widget: Widget,
}

/// A [`ParameterPanel`] made of DOM form inputs.
pub struct DomPane {
    document: Document,
    root: HtmlElement,
    rows: Vec<Row>,
    listener: Listener,
    closures: Vec<Closure<dyn FnMut(Event)>>,
}

impl core::fmt::Debug for DomPane {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomPane")
            .field("keys", &self.rows.iter().map(|r| r.key).collect::<Vec<_>>())
            .field("closures_len", &self.closures.len())
            .finish_non_exhaustive()
    }
}

/// Formats a value for display next to a control.
pub(crate) fn display(value: &ParamValue) -> String {
    match value {
        ParamValue::Number(v) if v.fract() == 0.0 => format!("{v:.0}"),
        ParamValue::Number(v) => format!("{v:.3}"),
        ParamValue::Toggle(b) => b.to_string(),
        ParamValue::Text(s) => s.clone(),
    }
}

impl DomPane {
    /// Builds an empty panel titled `title` inside `area`.
    pub fn new(area: &HtmlElement, title: &str) -> Result<Self, HostError> {
        let document = area
            .owner_document()
            .ok_or_else(|| HostError::Panel("panel area has no owner document".into()))?;
        let root = create_html(&document, "div")?;
        root.set_class_name("vizhost-pane");
        let s = root.style();
        let _ = s.set_property("display", "grid");
        let _ = s.set_property("grid-template-columns", "auto 1fr auto");
        let _ = s.set_property("gap", "0.25em 0.5em");
        let _ = s.set_property("font-size", "0.8em");

        let heading = create_html(&document, "div")?;
        heading.set_text_content(Some(title));
        let _ = heading.style().set_property("grid-column", "1 / -1");
        let _ = heading.style().set_property("font-weight", "bold");
        append(&root, &heading)?;
        append(area, &root)?;

        Ok(Self {
            document,
            root,
            rows: Vec::new(),
            listener: Rc::new(RefCell::new(None)),
            closures: Vec::new(),
        })
    }

    fn label(&self, text: &str) -> Result<(), HostError> {
        let label = create_html(&self.document, "span")?;
        label.set_text_content(Some(text));
        append(&self.root, &label)
    }

    fn input(&self) -> Result<HtmlInputElement, HostError> {
        create_html(&self.document, "input")?
            .dyn_into::<HtmlInputElement>()
            .map_err(|_| HostError::Panel("<input> is not an HtmlInputElement".into()))
    }

    /// Forwards `event` on `target` as an edit of `key`.
    fn listen(
        &mut self,
        target: &HtmlElement,
        event: &str,
        key: &'static str,
        read: impl Fn() -> Option<ParamValue> + 'static,
    ) -> Result<(), HostError> {
        let listener = Rc::clone(&self.listener);
        let closure = Closure::wrap(Box::new(move |_event: Event| {
            let Some(value) = read() else {
                return;
            };
            if let Ok(mut slot) = listener.try_borrow_mut()
                && let Some(listener) = slot.as_mut()
            {
                listener(PanelEdit { key, value });
            }
        }) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|e| HostError::Panel(js_error("add_event_listener", &e)))?;
        self.closures.push(closure);
        Ok(())
    }

    fn add_number(
        &mut self,
        key: &'static str,
        min: Option<f64>,
        max: Option<f64>,
        step: Option<f64>,
        initial: f64,
    ) -> Result<(), HostError> {
        let bounded = min.is_some() && max.is_some();
        let input = self.input()?;
        input.set_type(if bounded { "range" } else { "number" });
        if let Some(min) = min {
            input.set_min(&min.to_string());
        }
        if let Some(max) = max {
            input.set_max(&max.to_string());
        }
        // Range inputs default to step 1; unset means "any" here.
        input.set_step(&step.map_or_else(|| "any".to_string(), |s| s.to_string()));
        input.set_value_as_number(initial);
        append(&self.root, &input)?;

        let readout = create_html(&self.document, "span")?;
        readout.set_text_content(Some(&display(&ParamValue::Number(initial))));
        append(&self.root, &readout)?;

        let source = input.clone();
        self.listen(&input, "input", key, move || {
            let v = source.value_as_number();
            (!v.is_nan()).then_some(ParamValue::Number(v))
        })?;
        self.rows.push(Row {
            key,
            widget: Widget::Number {
                input,
                readout: Some(readout),
            },
        });
        Ok(())
    }

    fn add_toggle(&mut self, key: &'static str, initial: bool) -> Result<(), HostError> {
        let input = self.input()?;
        input.set_type("checkbox");
        input.set_checked(initial);
        append(&self.root, &input)?;
        append(&self.root, &create_html(&self.document, "span")?)?;

        let source = input.clone();
        self.listen(&input, "change", key, move || {
            Some(ParamValue::Toggle(source.checked()))
        })?;
        self.rows.push(Row {
            key,
            widget: Widget::Toggle(input),
        });
        Ok(())
    }

    fn add_choice(
        &mut self,
        key: &'static str,
        options: &[(String, f64)],
        initial: f64,
    ) -> Result<(), HostError> {
        let select = create_html(&self.document, "select")?
            .dyn_into::<HtmlSelectElement>()
            .map_err(|_| HostError::Panel("<select> is not an HtmlSelectElement".into()))?;
        let mut values = Vec::with_capacity(options.len());
        for (index, (label, value)) in options.iter().enumerate() {
            let option = HtmlOptionElement::new_with_text_and_value(label, &index.to_string())
                .map_err(|e| HostError::Panel(js_error("new Option", &e)))?;
            option.set_selected(*value == initial);
            select
                .add_with_html_option_element(&option)
                .map_err(|e| HostError::Panel(js_error("select.add", &e)))?;
            values.push(*value);
        }
        append(&self.root, &select)?;
        append(&self.root, &create_html(&self.document, "span")?)?;

        let source = select.clone();
        let lookup = values.clone();
        self.listen(&select, "change", key, move || {
            let index = usize::try_from(source.selected_index()).ok()?;
            lookup.get(index).copied().map(ParamValue::Number)
        })?;
        self.rows.push(Row {
            key,
            widget: Widget::Choice { select, values },
        });
        Ok(())
    }
}

fn append(parent: &HtmlElement, child: &HtmlElement) -> Result<(), HostError> {
    parent
        .append_child(child)
        .map(|_| ())
        .map_err(|e| HostError::Panel(js_error("append_child", &e)))
}

impl ParameterPanel for DomPane {
    fn add_control(
        &mut self,
        key: &'static str,
        label: &str,
        spec: &ControlSpec,
        initial: &ParamValue,
    ) -> Result<(), HostError> {
        self.label(label)?;
        match (spec, initial) {
            (ControlSpec::Number { min, max, step }, ParamValue::Number(v)) => {
                self.add_number(key, *min, *max, *step, *v)
            }
            (ControlSpec::Toggle, ParamValue::Toggle(b)) => self.add_toggle(key, *b),
            (ControlSpec::Choice { options }, ParamValue::Number(v)) => {
                self.add_choice(key, options, *v)
            }
            _ => Err(HostError::Panel(format!(
                "cannot show {initial:?} in a {spec:?} control"
            ))),
        }
    }

    fn add_monitor(
        &mut self,
        key: &'static str,
        label: &str,
        initial: &ParamValue,
    ) -> Result<(), HostError> {
        self.label(label)?;
        let text = create_html(&self.document, "output")?;
        text.set_text_content(Some(&display(initial)));
        let _ = text.style().set_property("grid-column", "2 / -1");
        append(&self.root, &text)?;
        self.rows.push(Row {
            key,
            widget: Widget::Monitor(text),
        });
        Ok(())
    }

    fn set_value(&mut self, key: &'static str, value: &ParamValue) {
        let Some(row) = self.rows.iter().find(|r| r.key == key) else {
            return;
        };
        match (&row.widget, value) {
            (Widget::Number { input, readout }, ParamValue::Number(v)) => {
                input.set_value_as_number(*v);
                if let Some(readout) = readout {
                    readout.set_text_content(Some(&display(value)));
                }
            }
            (Widget::Toggle(input), ParamValue::Toggle(b)) => input.set_checked(*b),
            (Widget::Choice { select, values }, ParamValue::Number(v)) => {
                if let Some(index) = values.iter().position(|o| o == v) {
                    #[expect(
                        clippy::cast_possible_truncation,
                        reason = "a dropdown never has more than i32::MAX options"
                    )]
                    select.set_selected_index(index as i32);
                }
            }
            (Widget::Monitor(text), _) => text.set_text_content(Some(&display(value))),
            _ => {}
        }
    }

    fn set_listener(&mut self, listener: Box<dyn FnMut(PanelEdit)>) {
        if let Ok(mut slot) = self.listener.try_borrow_mut() {
            *slot = Some(listener);
        }
    }
}

impl Drop for DomPane {
    fn drop(&mut self) {
        self.root.remove();
    }
}
