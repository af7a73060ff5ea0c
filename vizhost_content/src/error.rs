// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for the content helpers.

/// Result alias for content operations.
pub type ContentResult<T> = Result<T, ContentError>;

/// Errors from parsing content inputs.
#[derive(thiserror::Error, Debug)]
pub enum ContentError {
    /// The asset manifest is not a JSON object of strings.
    #[error("invalid asset manifest: {0}")]
    Manifest(#[source] serde_json::Error),

    /// The content configuration could not be parsed.
    #[error("invalid content config: {0}")]
    Config(#[source] serde_json::Error),

    /// A configuration value is out of range.
    #[error("invalid content config: {0}")]
    ConfigValue(String),

    /// The document tree is not valid mdast JSON.
    #[error("invalid document tree: {0}")]
    Tree(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        let json_err = serde_json::from_str::<u32>("x").unwrap_err();
        assert!(
            ContentError::Manifest(json_err)
                .to_string()
                .starts_with("invalid asset manifest:")
        );
        assert_eq!(
            ContentError::ConfigValue("words_per_minute must be positive".into()).to_string(),
            "invalid content config: words_per_minute must be positive"
        );
    }
}
