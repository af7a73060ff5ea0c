// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page-level bootstrap.
//!
//! A page carries placeholder elements naming a sample kind in their `sample`
//! attribute. [`mount_all`] runs each one through the factory registered for
//! its kind. Unknown kinds show [`UNKNOWN_TEXT`]; a failing factory is traced
//! and skipped so the remaining placeholders still mount.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::error::HostError;
use crate::trace::{FailureEvent, MountEvent, MountOutcome, TraceSink};

/// Attribute naming the sample kind.
pub const SAMPLE_ATTRIBUTE: &str = "sample";

/// Text shown in placeholders of unrecognized kinds.
pub const UNKNOWN_TEXT: &str = "unknown";

/// A placeholder element on the page.
pub trait Placeholder {
    /// Reads a `data-*` attribute by its short name (`"sample"`, `"static"`).
    fn attribute(&self, name: &str) -> Option<String>;

    /// Replaces the placeholder's content with plain text.
    fn set_fallback_text(&self, text: &str);
}

/// Builds and creates the host for one placeholder.
pub type SampleFactory<E> = Box<dyn Fn(&E) -> Result<(), HostError>>;

/// Maps sample kinds to factories.
pub struct SampleRegistry<E> {
    entries: Vec<(String, SampleFactory<E>)>,
    default_kind: Option<String>,
}

impl<E: Placeholder> SampleRegistry<E> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            default_kind: None,
        }
    }

    /// Registers `factory` for `kind`, replacing an earlier registration.
    pub fn register(
        &mut self,
        kind: impl Into<String>,
        factory: impl Fn(&E) -> Result<(), HostError> + 'static,
    ) -> &mut Self {
        let kind = kind.into();
        self.entries.retain(|(k, _)| *k != kind);
        self.entries.push((kind, Box::new(factory)));
        self
    }

    /// Kind assumed for placeholders without a `sample` attribute.
    pub fn set_default_kind(&mut self, kind: impl Into<String>) -> &mut Self {
        self.default_kind = Some(kind.into());
        self
    }

    /// Registered kinds in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// The kind a placeholder asks for.
    #[must_use]
    pub fn kind_of(&self, placeholder: &E) -> Option<String> {
        placeholder
            .attribute(SAMPLE_ATTRIBUTE)
            .or_else(|| self.default_kind.clone())
    }

    /// Mounts one placeholder.
    pub fn mount(&self, placeholder: &E, trace: &mut dyn TraceSink) -> MountOutcome {
        let kind = self.kind_of(placeholder).unwrap_or_default();
        let outcome = match self.entries.iter().find(|(k, _)| *k == kind) {
            None => {
                placeholder.set_fallback_text(UNKNOWN_TEXT);
                MountOutcome::Unknown
            }
            Some((_, factory)) => match factory(placeholder) {
                Ok(()) => MountOutcome::Mounted,
                Err(error) => {
                    trace.on_failure(&FailureEvent {
                        title: &kind,
                        error: &error,
                    });
                    MountOutcome::Failed
                }
            },
        };
        trace.on_mount(&MountEvent {
            kind: &kind,
            outcome,
        });
        outcome
    }
}

impl<E: Placeholder> Default for SampleRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for SampleRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SampleRegistry")
            .field(
                "kinds",
                &self.entries.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            )
            .field("default_kind", &self.default_kind)
            .finish()
    }
}

/// Tally of one bootstrap pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MountReport {
    /// Placeholders that got a host.
    pub mounted: usize,
    /// Placeholders of unrecognized kinds.
    pub unknown: usize,
    /// Placeholders whose factory failed.
    pub failed: usize,
}

impl MountReport {
    fn record(&mut self, outcome: MountOutcome) {
        match outcome {
            MountOutcome::Mounted => self.mounted += 1,
            MountOutcome::Unknown => self.unknown += 1,
            MountOutcome::Failed => self.failed += 1,
        }
    }
}

/// Mounts every placeholder in document order.
pub fn mount_all<'a, E: Placeholder + 'a>(
    registry: &SampleRegistry<E>,
    placeholders: impl IntoIterator<Item = &'a E>,
    trace: &mut dyn TraceSink,
) -> MountReport {
    let mut report = MountReport::default();
    for placeholder in placeholders {
        report.record(registry.mount(placeholder, trace));
    }
    report
}
