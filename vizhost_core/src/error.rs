// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for hosts, platforms and demo hooks.

use alloc::string::String;
use core::fmt;

/// An error reported by a demo's own hooks (`on_create`, `on_update`,
/// `on_change`).
///
/// The host never interprets these; it only logs them and keeps going.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DemoError {
    message: String,
}

impl DemoError {
    /// Creates an error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl core::error::Error for DemoError {}

/// Errors from host and platform operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostError {
    /// Inserting or removing the DOM scaffold failed.
    Scaffold(String),
    /// The parameter panel rejected a registration or an edit.
    Panel(String),
    /// The visibility watch could not be registered.
    Visibility(String),
    /// The compute module for a demo failed to load or instantiate.
    ModuleInit(String),
    /// A view over memory shared with a compute kernel could not be created.
    SharedMemory(String),
    /// A placeholder named a sample kind nobody registered.
    UnknownSample(String),
    /// The demo's `on_create` hook failed.
    Create(DemoError),
    /// The demo's `on_update` hook failed during a tick.
    Update(DemoError),
    /// The demo's `on_change` hook failed.
    Change(DemoError),
    /// The host was re-entered from one of its own callbacks.
    Busy,
    /// The host was disposed.
    Disposed,
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scaffold(msg) => write!(f, "scaffold error: {msg}"),
            Self::Panel(msg) => write!(f, "panel error: {msg}"),
            Self::Visibility(msg) => write!(f, "visibility watch error: {msg}"),
            Self::ModuleInit(msg) => write!(f, "compute module init failed: {msg}"),
            Self::SharedMemory(msg) => write!(f, "shared memory error: {msg}"),
            Self::UnknownSample(kind) => write!(f, "unknown sample kind {kind:?}"),
            Self::Create(err) => write!(f, "demo creation failed: {err}"),
            Self::Update(err) => write!(f, "demo update failed: {err}"),
            Self::Change(err) => write!(f, "demo change failed: {err}"),
            Self::Busy => f.write_str("host is busy in one of its own callbacks"),
            Self::Disposed => f.write_str("host disposed"),
        }
    }
}

impl core::error::Error for HostError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Create(err) | Self::Update(err) | Self::Change(err) => Some(err),
            _ => None,
        }
    }
}
