// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lookup of built blog assets.

use std::collections::BTreeMap;

use crate::error::{ContentError, ContentResult};

/// Prefix every manifest key carries.
pub const BLOG_PREFIX: &str = "./content/blog/";

/// How a media asset is embedded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// Rendered with `<img>`.
    Image,
    /// Rendered with `<video>`.
    Video,
}

impl MediaKind {
    /// Classifies a path by its ending: `webm`, `mp4` and `m4v` are videos,
    /// anything else is an image.
    #[must_use]
    pub fn of(path: &str) -> Self {
        if ["webm", "mp4", "m4v"].iter().any(|ext| path.ends_with(ext)) {
            Self::Video
        } else {
            Self::Image
        }
    }
}

/// Maps post-relative asset paths to their built URLs.
///
/// Built from a manifest object whose keys are `./content/blog/<path>` and
/// whose values are the URLs the build emitted.
#[derive(Clone, Debug, Default)]
pub struct AssetResolver {
    assets: BTreeMap<String, String>,
}

impl AssetResolver {
    /// Parses a JSON manifest.
    pub fn from_manifest(json: &str) -> ContentResult<Self> {
        let assets: BTreeMap<String, String> =
            serde_json::from_str(json).map_err(ContentError::Manifest)?;
        let foreign = assets
            .keys()
            .filter(|key| !key.starts_with(BLOG_PREFIX))
            .count();
        if foreign > 0 {
            tracing::debug!(foreign, "manifest has entries outside the blog folder");
        }
        tracing::debug!(count = assets.len(), "loaded asset manifest");
        Ok(Self { assets })
    }

    /// Adds or replaces one entry; `path` is relative to the blog folder.
    pub fn insert(&mut self, path: &str, url: impl Into<String>) {
        self.assets.insert(format!("{BLOG_PREFIX}{path}"), url.into());
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// `true` if the manifest is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Built URL of the asset at `path` (relative to the blog folder).
    pub fn find(&self, path: &str) -> Option<&str> {
        let key = format!("{BLOG_PREFIX}{path}");
        let found = self.assets.get(&key).map(String::as_str);
        if found.is_none() {
            tracing::warn!(%key, "asset not found");
        }
        found
    }

    /// Built URL and media kind of the asset at `path`.
    pub fn find_media(&self, path: &str) -> Option<(&str, MediaKind)> {
        self.find(path).map(|url| (url, MediaKind::of(path)))
    }
}
