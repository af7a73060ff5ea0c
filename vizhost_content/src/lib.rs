// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Content-pipeline helpers for pages that embed vizhost demos.
//!
//! - [`tree`]: a Markdown syntax tree (mdast JSON shape) with plain-text
//!   extraction.
//! - [`summary`]: [`AutoAbstract`], which derives a post's read time and
//!   abstract from its tree.
//! - [`assets`]: [`AssetResolver`] over the manifest of built assets, plus
//!   [`MediaKind`] classification.
//! - [`config`]: [`ContentConfig`].
//!
//! Logging goes through `tracing`; install a subscriber to see it.

pub mod assets;
pub mod config;
pub mod error;
pub mod summary;
pub mod tree;

pub use assets::{AssetResolver, MediaKind};
pub use config::ContentConfig;
pub use error::{ContentError, ContentResult};
pub use summary::{AutoAbstract, Summary};
pub use tree::Node;
