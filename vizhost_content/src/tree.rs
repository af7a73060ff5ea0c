// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Markdown syntax tree.
//!
//! [`Node`] deserializes from the mdast JSON a Markdown parser emits
//! (`{"type": "paragraph", "children": [...]}`). Node kinds without a variant
//! of their own (MDX elements, references, table cells) deserialize as
//! [`Node::Other`], which keeps their children and literal value so their
//! text still counts.

use serde::de::{self, Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::{ContentError, ContentResult};

/// `type` tags with a variant of their own.
const KNOWN_KINDS: &[&str] = &[
    "root",
    "paragraph",
    "heading",
    "text",
    "inlineCode",
    "code",
    "html",
    "emphasis",
    "strong",
    "link",
    "image",
    "list",
    "listItem",
    "blockquote",
];

/// One node of a Markdown document.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(remote = "Self", tag = "type", rename_all = "camelCase")]
pub enum Node {
    /// Document root.
    Root {
        /// Top-level blocks.
        #[serde(default)]
        children: Vec<Node>,
    },
    /// A paragraph.
    Paragraph {
        /// Inline content.
        #[serde(default)]
        children: Vec<Node>,
    },
    /// A heading.
    Heading {
        /// Level, 1 to 6.
        depth: u8,
        /// Inline content.
        #[serde(default)]
        children: Vec<Node>,
    },
    /// Literal text.
    Text {
        /// The text.
        value: String,
    },
    /// Inline code span.
    InlineCode {
        /// The code.
        value: String,
    },
    /// Fenced or indented code block.
    Code {
        /// Info string language, if any.
        #[serde(default)]
        lang: Option<String>,
        /// The code.
        value: String,
    },
    /// Raw HTML.
    Html {
        /// The markup.
        value: String,
    },
    /// Emphasis.
    Emphasis {
        /// Inline content.
        #[serde(default)]
        children: Vec<Node>,
    },
    /// Strong emphasis.
    Strong {
        /// Inline content.
        #[serde(default)]
        children: Vec<Node>,
    },
    /// A hyperlink.
    Link {
        /// Target.
        url: String,
        /// Link text.
        #[serde(default)]
        children: Vec<Node>,
    },
    /// An image.
    Image {
        /// Source.
        url: String,
        /// Alternative text.
        #[serde(default)]
        alt: Option<String>,
    },
    /// A list.
    List {
        /// Numbered list.
        #[serde(default)]
        ordered: bool,
        /// Items.
        #[serde(default)]
        children: Vec<Node>,
    },
    /// A list item.
    ListItem {
        /// Item content.
        #[serde(default)]
        children: Vec<Node>,
    },
    /// A block quote.
    Blockquote {
        /// Quoted blocks.
        #[serde(default)]
        children: Vec<Node>,
    },
    /// Any other node kind.
    #[serde(skip)]
    Other {
        /// The `type` tag.
        kind: String,
        /// Child nodes, if the kind has any.
        children: Vec<Node>,
        /// Literal value, if the kind has one.
        value: Option<String>,
    },
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;
        let kind = match fields.get("type") {
            Some(Value::String(kind)) => kind.clone(),
            Some(_) => return Err(de::Error::custom("node `type` is not a string")),
            None => return Err(de::Error::missing_field("type")),
        };
        if KNOWN_KINDS.contains(&kind.as_str()) {
            return Self::deserialize(Value::Object(fields)).map_err(de::Error::custom);
        }
        let children = match fields.remove("children") {
            Some(children) => Vec::<Self>::deserialize(children).map_err(de::Error::custom)?,
            None => Vec::new(),
        };
        let value = match fields.remove("value") {
            Some(Value::String(value)) => Some(value),
            _ => None,
        };
        Ok(Self::Other {
            kind,
            children,
            value,
        })
    }
}

impl Node {
    /// Parses an mdast JSON document.
    pub fn from_json(json: &str) -> ContentResult<Self> {
        serde_json::from_str(json).map_err(ContentError::Tree)
    }

    /// Shorthand for a text node.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
        }
    }

    /// Shorthand for a paragraph.
    #[must_use]
    pub fn paragraph(children: Vec<Self>) -> Self {
        Self::Paragraph { children }
    }

    /// Child nodes, empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Root { children }
            | Self::Paragraph { children }
            | Self::Heading { children, .. }
            | Self::Emphasis { children }
            | Self::Strong { children }
            | Self::Link { children, .. }
            | Self::List { children, .. }
            | Self::ListItem { children }
            | Self::Blockquote { children }
            | Self::Other { children, .. } => children,
            Self::Text { .. }
            | Self::InlineCode { .. }
            | Self::Code { .. }
            | Self::Html { .. }
            | Self::Image { .. } => &[],
        }
    }

    /// Plain text of this node: literal values and image alt text
    /// concatenated in document order, with no separators.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) {
        match self {
            Self::Text { value }
            | Self::InlineCode { value }
            | Self::Code { value, .. }
            | Self::Html { value }
            | Self::Other {
                value: Some(value), ..
            } => out.push_str(value),
            Self::Image { alt, .. } => out.push_str(alt.as_deref().unwrap_or_default()),
            _ => {
                for child in self.children() {
                    child.write_text(out);
                }
            }
        }
    }

    /// Visits this node and its descendants in pre-order.
    ///
    /// Returning `false` from `visitor` stops the walk.
    pub fn walk(&self, visitor: &mut impl FnMut(&Self) -> bool) -> bool {
        if !visitor(self) {
            return false;
        }
        self.children().iter().all(|child| child.walk(visitor))
    }
}
