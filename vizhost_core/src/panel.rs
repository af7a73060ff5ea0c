// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parameter panel binding.
//!
//! A demo exposes some of its state fields as interactive controls (sliders,
//! checkboxes, dropdowns) or read-only monitors. The widget surface itself is
//! a capability supplied by the backend through [`ParameterPanel`]; this
//! module is the adapter between that surface and the demo's state:
//!
//! - [`Field`] names one state field and how to read/write it;
//! - [`PanelBuilder`] collects registrations while the demo is being created,
//!   before its state exists;
//! - [`PanelBinding`] puts them on the panel with their initial values, applies
//!   incoming [`PanelEdit`]s to the state and pushes fresh values back.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::error::HostError;

/// Key of the host-owned pause toggle.
pub const PAUSE_KEY: &str = "paused";

/// A value shown by or entered into a panel control.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    /// A numeric value (sliders, number inputs, dropdown choices).
    Number(f64),
    /// A boolean value (checkboxes).
    Toggle(bool),
    /// Free text (monitors only).
    Text(String),
}

/// Constraints for an editable control.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlSpec {
    /// A numeric input. With both bounds set, backends render a slider.
    Number {
        /// Lower bound; edits below it are clamped.
        min: Option<f64>,
        /// Upper bound; edits above it are clamped.
        max: Option<f64>,
        /// Step hint for the widget.
        step: Option<f64>,
    },
    /// A checkbox.
    Toggle,
    /// A dropdown of labeled numeric values.
    Choice {
        /// `(label, value)` pairs in display order.
        options: Vec<(String, f64)>,
    },
}

impl ControlSpec {
    /// An unbounded numeric input.
    #[must_use]
    pub const fn number() -> Self {
        Self::Number {
            min: None,
            max: None,
            step: None,
        }
    }

    /// A numeric input bounded to `min..=max`.
    #[must_use]
    pub const fn range(min: f64, max: f64) -> Self {
        Self::Number {
            min: Some(min),
            max: Some(max),
            step: None,
        }
    }

    /// Sets the step hint of a numeric spec; other specs are returned as is.
    #[must_use]
    pub fn with_step(self, step: f64) -> Self {
        match self {
            Self::Number { min, max, .. } => Self::Number {
                min,
                max,
                step: Some(step),
            },
            other => other,
        }
    }

    /// A dropdown over the given `(label, value)` pairs.
    #[must_use]
    pub fn choice<L: Into<String>>(options: impl IntoIterator<Item = (L, f64)>) -> Self {
        Self::Choice {
            options: options.into_iter().map(|(l, v)| (l.into(), v)).collect(),
        }
    }
}

/// A user edit reported by the panel.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelEdit {
    /// Key of the edited control.
    pub key: &'static str,
    /// The value the user entered.
    pub value: ParamValue,
}

/// The settings-panel widget capability.
///
/// Implementations render controls and report edits through the listener;
/// they never touch demo state themselves.
pub trait ParameterPanel {
    /// Adds an editable control showing `initial`.
    fn add_control(
        &mut self,
        key: &'static str,
        label: &str,
        spec: &ControlSpec,
        initial: &ParamValue,
    ) -> Result<(), HostError>;

    /// Adds a read-only display showing `initial`.
    fn add_monitor(
        &mut self,
        key: &'static str,
        label: &str,
        initial: &ParamValue,
    ) -> Result<(), HostError>;

    /// Updates the displayed value of a control or monitor.
    fn set_value(&mut self, key: &'static str, value: &ParamValue);

    /// Installs the callback that receives every user edit.
    fn set_listener(&mut self, listener: Box<dyn FnMut(PanelEdit)>);
}

enum Access<TD> {
    Number {
        get: fn(&TD) -> f64,
        set: Option<fn(&mut TD, f64)>,
    },
    Toggle {
        get: fn(&TD) -> bool,
        set: Option<fn(&mut TD, bool)>,
    },
    Text {
        get: fn(&TD) -> String,
    },
}

/// One named field of a demo's state.
pub struct Field<TD> {
    key: &'static str,
    label: Option<&'static str>,
    access: Access<TD>,
}

impl<TD> Field<TD> {
    /// A writable numeric field.
    #[must_use]
    pub fn number(key: &'static str, get: fn(&TD) -> f64, set: fn(&mut TD, f64)) -> Self {
        Self {
            key,
            label: None,
            access: Access::Number {
                get,
                set: Some(set),
            },
        }
    }

    /// A writable boolean field.
    #[must_use]
    pub fn toggle(key: &'static str, get: fn(&TD) -> bool, set: fn(&mut TD, bool)) -> Self {
        Self {
            key,
            label: None,
            access: Access::Toggle {
                get,
                set: Some(set),
            },
        }
    }

    /// A read-only numeric field, for monitors.
    #[must_use]
    pub fn number_readout(key: &'static str, get: fn(&TD) -> f64) -> Self {
        Self {
            key,
            label: None,
            access: Access::Number { get, set: None },
        }
    }

    /// A read-only text field, for monitors.
    #[must_use]
    pub fn text(key: &'static str, get: fn(&TD) -> String) -> Self {
        Self {
            key,
            label: None,
            access: Access::Text { get },
        }
    }

    /// Shows `label` instead of the key.
    #[must_use]
    pub fn labeled(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    /// The field key.
    #[must_use]
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// The display label (the key unless [`labeled`](Self::labeled)).
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label.unwrap_or(self.key)
    }

    /// Reads the current value from `data`.
    #[must_use]
    pub fn read(&self, data: &TD) -> ParamValue {
        match &self.access {
            Access::Number { get, .. } => ParamValue::Number(get(data)),
            Access::Toggle { get, .. } => ParamValue::Toggle(get(data)),
            Access::Text { get } => ParamValue::Text(get(data)),
        }
    }

    fn is_writable(&self) -> bool {
        match &self.access {
            Access::Number { set, .. } => set.is_some(),
            Access::Toggle { set, .. } => set.is_some(),
            Access::Text { .. } => false,
        }
    }

    fn check_spec(&self, spec: &ControlSpec) -> Result<(), HostError> {
        if !self.is_writable() {
            return Err(HostError::Panel(format!(
                "field {:?} is read-only and cannot back a control",
                self.key
            )));
        }
        match (&self.access, spec) {
            (Access::Number { .. }, ControlSpec::Number { .. } | ControlSpec::Choice { .. })
            | (Access::Toggle { .. }, ControlSpec::Toggle) => Ok(()),
            _ => Err(HostError::Panel(format!(
                "control spec {spec:?} does not match field {:?}",
                self.key
            ))),
        }
    }

    fn write(&self, data: &mut TD, spec: &ControlSpec, value: &ParamValue) -> Result<(), HostError> {
        match (&self.access, value) {
            (Access::Number { set: Some(set), .. }, ParamValue::Number(v)) => {
                let v = constrain(self.key, spec, *v)?;
                set(data, v);
                Ok(())
            }
            (Access::Toggle { set: Some(set), .. }, ParamValue::Toggle(b)) => {
                set(data, *b);
                Ok(())
            }
            _ => Err(HostError::Panel(format!(
                "edit {value:?} cannot be applied to field {:?}",
                self.key
            ))),
        }
    }
}

impl<TD> fmt::Debug for Field<TD> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("key", &self.key)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

fn constrain(key: &str, spec: &ControlSpec, v: f64) -> Result<f64, HostError> {
    if v.is_nan() {
        return Err(HostError::Panel(format!("NaN edit for field {key:?}")));
    }
    match spec {
        ControlSpec::Number { min, max, .. } => {
            let v = min.map_or(v, |m| v.max(m));
            Ok(max.map_or(v, |m| v.min(m)))
        }
        ControlSpec::Choice { options } => {
            if options.iter().any(|(_, o)| *o == v) {
                Ok(v)
            } else {
                Err(HostError::Panel(format!(
                    "{v} is not an offered choice for field {key:?}"
                )))
            }
        }
        ControlSpec::Toggle => Ok(v),
    }
}

struct Registration<TD> {
    field: Field<TD>,
    /// `None` for monitors.
    spec: Option<ControlSpec>,
}

/// Control registrations collected while a demo is being created.
pub struct PanelBuilder<TD> {
    entries: Vec<Registration<TD>>,
}

impl<TD> PanelBuilder<TD> {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Binds `field` for two-way editing with the given constraints.
    pub fn add_control(&mut self, field: Field<TD>, spec: ControlSpec) -> &mut Self {
        self.entries.push(Registration {
            field,
            spec: Some(spec),
        });
        self
    }

    /// Binds `field` for read-only display.
    pub fn add_monitor(&mut self, field: Field<TD>) -> &mut Self {
        self.entries.push(Registration { field, spec: None });
        self
    }

    /// Number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<TD> Default for PanelBuilder<TD> {
    fn default() -> Self {
        Self::new()
    }
}

impl<TD> fmt::Debug for PanelBuilder<TD> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|r| r.field.key))
            .finish()
    }
}

/// Live two-way binding between a panel and a demo's state.
pub struct PanelBinding<TD, P> {
    panel: P,
    entries: Vec<Registration<TD>>,
}

impl<TD, P: ParameterPanel> PanelBinding<TD, P> {
    /// Puts every registration from `builder` onto `panel`, showing the
    /// current values from `data`.
    pub fn attach(mut panel: P, builder: PanelBuilder<TD>, data: &TD) -> Result<Self, HostError> {
        for entry in &builder.entries {
            let field = &entry.field;
            let initial = field.read(data);
            match &entry.spec {
                Some(spec) => {
                    field.check_spec(spec)?;
                    panel.add_control(field.key, field.label(), spec, &initial)?;
                }
                None => panel.add_monitor(field.key, field.label(), &initial)?,
            }
        }
        Ok(Self {
            panel,
            entries: builder.entries,
        })
    }

    /// The underlying panel.
    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    /// Whether an edit with this key targets a bound control.
    #[must_use]
    pub fn binds(&self, key: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.spec.is_some() && e.field.key == key)
    }

    /// Applies a user edit to `data` and shows the resulting value (which may
    /// differ after clamping).
    pub fn apply(&mut self, data: &mut TD, edit: &PanelEdit) -> Result<(), HostError> {
        let Some(entry) = self
            .entries
            .iter()
            .find(|e| e.spec.is_some() && e.field.key == edit.key)
        else {
            return Err(HostError::Panel(format!(
                "no control bound to {:?}",
                edit.key
            )));
        };
        let spec = entry.spec.as_ref().unwrap_or(&ControlSpec::Toggle);
        entry.field.write(data, spec, &edit.value)?;
        self.panel.set_value(entry.field.key, &entry.field.read(data));
        Ok(())
    }

    /// Pushes every bound value from `data` to the panel.
    pub fn refresh(&mut self, data: &TD) {
        for entry in &self.entries {
            self.panel.set_value(entry.field.key, &entry.field.read(data));
        }
    }
}

impl<TD, P: fmt::Debug> fmt::Debug for PanelBinding<TD, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelBinding")
            .field("panel", &self.panel)
            .field("entries_len", &self.entries.len())
            .finish()
    }
}
