// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Content pipeline configuration.

use crate::error::{ContentError, ContentResult};

/// Settings for [`AutoAbstract`](crate::AutoAbstract).
///
/// Every field has a default, so a partial JSON object is accepted.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentConfig {
    /// Development build: write the placeholder values instead of deriving
    /// them from the document.
    pub is_dev: bool,
    /// Reading speed used for the read-time estimate.
    pub words_per_minute: u32,
    /// The abstract grows paragraph by paragraph until it is at least this
    /// many UTF-16 code units long.
    pub abstract_min_chars: usize,
    /// Read time written in development builds.
    pub dev_time_to_read: String,
    /// Abstract written in development builds.
    pub dev_abstract: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            is_dev: false,
            words_per_minute: 265,
            abstract_min_chars: 100,
            dev_time_to_read: "10 min".to_owned(),
            dev_abstract: "Lorem Ipsum".to_owned(),
        }
    }
}

impl ContentConfig {
    /// Default production settings.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }

    /// Default development settings.
    #[must_use]
    pub fn development() -> Self {
        Self {
            is_dev: true,
            ..Self::default()
        }
    }

    /// Parses and validates a JSON configuration object.
    pub fn from_json(json: &str) -> ContentResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(ContentError::Config)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> ContentResult<()> {
        if self.words_per_minute == 0 {
            return Err(ContentError::ConfigValue(
                "wordsPerMinute must be positive".to_owned(),
            ));
        }
        Ok(())
    }
}
