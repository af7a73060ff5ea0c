// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read time and abstract derivation.

use serde_json::{Map, Value};

use crate::config::ContentConfig;
use crate::tree::Node;

/// Frontmatter key for the read time.
pub const TIME_TO_READ_KEY: &str = "timeToRead";
/// Frontmatter key for the abstract.
pub const ABSTRACT_KEY: &str = "abstract";

/// What [`AutoAbstract`] derives for one document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    /// Estimated read time, e.g. `"3 min"`.
    pub time_to_read: String,
    /// Opening paragraphs, punctuation-fixed.
    pub abstract_text: String,
}

/// Derives a post's read time and abstract from its syntax tree.
#[derive(Clone, Debug, Default)]
pub struct AutoAbstract {
    config: ContentConfig,
}

impl AutoAbstract {
    /// Creates a summarizer with the given settings.
    #[must_use]
    pub fn new(config: ContentConfig) -> Self {
        Self { config }
    }

    /// The active settings.
    #[must_use]
    pub fn config(&self) -> &ContentConfig {
        &self.config
    }

    /// Computes the summary for `tree`.
    ///
    /// In development mode the configured placeholders are returned without
    /// looking at the tree.
    #[must_use]
    pub fn summarize(&self, tree: &Node) -> Summary {
        if self.config.is_dev {
            return Summary {
                time_to_read: self.config.dev_time_to_read.clone(),
                abstract_text: self.config.dev_abstract.clone(),
            };
        }

        let minutes = read_minutes(&tree.plain_text(), self.config.words_per_minute);

        let mut excerpt = String::new();
        let mut excerpt_len = 0;
        tree.walk(&mut |node| {
            if !matches!(node, Node::Paragraph { .. }) {
                return true;
            }
            let text = fix_punctuation(&node.plain_text());
            excerpt_len += text.encode_utf16().count();
            excerpt.push_str(&text);
            excerpt_len < self.config.abstract_min_chars
        });

        Summary {
            time_to_read: format!("{minutes} min"),
            abstract_text: excerpt,
        }
    }

    /// Writes `timeToRead` and `abstract` into a frontmatter object,
    /// replacing earlier values.
    #[tracing::instrument(skip_all)]
    pub fn apply(&self, tree: &Node, frontmatter: &mut Map<String, Value>) -> Summary {
        let summary = self.summarize(tree);
        tracing::debug!(
            time_to_read = %summary.time_to_read,
            abstract_len = summary.abstract_text.len(),
            dev = self.config.is_dev,
            "derived summary"
        );
        if summary.abstract_text.is_empty() {
            tracing::warn!("document has no paragraphs; abstract is empty");
        }
        frontmatter.insert(
            TIME_TO_READ_KEY.to_owned(),
            Value::String(summary.time_to_read.clone()),
        );
        frontmatter.insert(
            ABSTRACT_KEY.to_owned(),
            Value::String(summary.abstract_text.clone()),
        );
        summary
    }
}

/// Whole minutes to read `text`, at least one.
///
/// Pieces are counted by splitting on single spaces and newlines, so runs of
/// separators count their empty pieces too.
fn read_minutes(text: &str, words_per_minute: u32) -> u64 {
    let pieces = text.split([' ', '\n']).count();
    let minutes = (pieces as f64 / f64::from(words_per_minute.max(1))).round();
    #[expect(
        clippy::cast_possible_truncation,
        reason = "a rounded, non-negative word ratio fits in u64"
    )]
    let minutes = minutes as u64;
    minutes.max(1)
}

/// Inserts a space after `.`, `?` or `!` when a word character follows
/// directly.
fn fix_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if matches!(c, '.' | '?' | '!')
            && chars
                .peek()
                .is_some_and(|&next| next.is_ascii_alphanumeric() || next == '_')
        {
            out.push(' ');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(text: &str) -> Node {
        Node::paragraph(vec![Node::text(text)])
    }

    fn doc(children: Vec<Node>) -> Node {
        Node::Root { children }
    }

    #[test]
    fn punctuation_gets_a_space() {
        assert_eq!(fix_punctuation("End.Next?Yes!no"), "End. Next? Yes! no");
        assert_eq!(fix_punctuation("a.. b"), "a.. b");
        assert_eq!(fix_punctuation("v1.2"), "v1. 2");
        assert_eq!(fix_punctuation("done.é"), "done.é");
    }

    #[test]
    fn read_time_rounds_and_floors_at_one() {
        assert_eq!(read_minutes("", 265), 1);
        let words = vec!["w"; 400].join(" ");
        assert_eq!(read_minutes(&words, 265), 2);
        let words = vec!["w"; 1000].join("\n");
        assert_eq!(read_minutes(&words, 265), 4);
    }

    #[test]
    fn abstract_stops_once_long_enough() {
        let first = "x".repeat(60);
        let second = "y".repeat(60);
        let tree = doc(vec![
            Node::Heading {
                depth: 1,
                children: vec![Node::text("Title")],
            },
            para(&first),
            para(&second),
            para("never reached"),
        ]);
        let summary = AutoAbstract::default().summarize(&tree);
        assert_eq!(summary.abstract_text, format!("{first}{second}"));
        assert_eq!(summary.time_to_read, "1 min");
    }

    #[test]
    fn single_long_paragraph_is_the_whole_abstract() {
        let text = format!("{} {}", vec!["a"; 49].join(" "), "b".repeat(22));
        assert_eq!(text.len(), 120);
        assert_eq!(text.split(' ').count(), 50);
        let tree = doc(vec![para(&text), para("never reached")]);
        let summary = AutoAbstract::default().summarize(&tree);
        assert_eq!(summary.time_to_read, "1 min");
        assert_eq!(summary.abstract_text, text);
    }

    #[test]
    fn paragraphs_inside_mdx_elements_count() {
        let tree = Node::from_json(
            r#"{
                "type": "root",
                "children": [
                    { "type": "mdxJsxFlowElement", "name": "Note", "children": [
                        { "type": "paragraph", "children": [
                            { "type": "text", "value": "Inside the abstract component.Second sentence here" }
                        ]}
                    ]},
                    { "type": "paragraph", "children": [
                        { "type": "text", "value": "See " },
                        { "type": "linkReference", "identifier": "docs", "children": [
                            { "type": "text", "value": "the docs" }
                        ]}
                    ]}
                ]
            }"#,
        )
        .unwrap();
        let summary = AutoAbstract::default().summarize(&tree);
        assert_eq!(
            summary.abstract_text,
            "Inside the abstract component. Second sentence hereSee the docs"
        );
        assert_eq!(summary.time_to_read, "1 min");
    }

    #[test]
    fn abstract_length_counts_utf16_units() {
        // 50 astral chars are 100 UTF-16 units.
        let emoji = "🔥".repeat(50);
        let tree = doc(vec![para(&emoji), para("second")]);
        let summary = AutoAbstract::default().summarize(&tree);
        assert_eq!(summary.abstract_text, emoji);
    }

    #[test]
    fn nested_paragraphs_count_in_document_order() {
        let tree = doc(vec![
            Node::List {
                ordered: false,
                children: vec![Node::ListItem {
                    children: vec![para("item.")],
                }],
            },
            para("Then.more"),
        ]);
        let summary = AutoAbstract::default().summarize(&tree);
        assert_eq!(summary.abstract_text, "item.Then. more");
    }

    #[test]
    fn dev_mode_writes_placeholders() {
        let mut frontmatter = Map::new();
        frontmatter.insert("title".into(), Value::from("Fire"));
        let summary = AutoAbstract::new(ContentConfig::development())
            .apply(&doc(vec![para("real text")]), &mut frontmatter);
        assert_eq!(summary.abstract_text, "Lorem Ipsum");
        assert_eq!(frontmatter[TIME_TO_READ_KEY], "10 min");
        assert_eq!(frontmatter[ABSTRACT_KEY], "Lorem Ipsum");
        assert_eq!(frontmatter["title"], "Fire");
    }

    #[test]
    fn apply_overwrites_frontmatter() {
        let mut frontmatter = Map::new();
        frontmatter.insert(ABSTRACT_KEY.into(), Value::from("stale"));
        AutoAbstract::default().apply(&doc(vec![para("fresh")]), &mut frontmatter);
        assert_eq!(frontmatter[ABSTRACT_KEY], "fresh");
        assert_eq!(frontmatter[TIME_TO_READ_KEY], "1 min");
    }
}
