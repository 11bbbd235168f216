//! Inline suppression directives.
//!
//! ```text
//! /* ordolint-disable */            everything until ordolint-enable
//! // ordolint-disable no-tabs      only the listed rules
//! // ordolint-enable no-tabs       closes the matching region
//! foo()  // ordolint-disable-line  the current line only
//! ```
//!
//! Rule ids are qualified (`namespace:id` outside the standard set) and
//! may be separated by spaces or commas.

use std::ops::{ControlFlow, Range};

use ordolint_ast::{NodeKind, SyntaxTree, walk_preorder};
use tracing::debug;

use crate::line_index::LineIndex;

const DISABLE: &str = "ordolint-disable";
const ENABLE: &str = "ordolint-enable";
const DISABLE_LINE: &str = "ordolint-disable-line";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Region {
    range: Range<u32>,
    /// Empty means every rule.
    rules: Vec<String>,
}

impl Region {
    fn covers_rule(&self, rule_id: &str) -> bool {
        self.rules.is_empty() || self.rules.iter().any(|r| r == rule_id)
    }

    /// A region running to the end of the text also covers the end offset.
    fn contains(&self, offset: u32, text_len: u32) -> bool {
        self.range.start <= offset && (offset < self.range.end || self.range.end >= text_len)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Directive {
    Disable(Vec<String>),
    Enable(Vec<String>),
    DisableLine(Vec<String>),
}

/// Answers whether a rule is silenced at a given offset.
#[derive(Debug, Clone, Default)]
pub struct SuppressionLocator {
    regions: Vec<Region>,
    /// Offset of the first token that is not BOM, whitespace or newline.
    file_start: u32,
    text_len: u32,
}

impl SuppressionLocator {
    /// A locator that suppresses nothing.
    pub fn none() -> Self {
        Self::default()
    }

    /// Collects directives from the comment leaves of `tree`.
    pub fn from_tree(tree: &SyntaxTree, lines: &LineIndex) -> Self {
        let mut regions = Vec::new();
        let mut open: Vec<(u32, Vec<String>)> = Vec::new();
        let mut file_start = None;

        let _ = walk_preorder(tree, |node| {
            let kind = node.kind();
            if file_start.is_none()
                && node.is_leaf()
                && !matches!(kind, NodeKind::Bom | NodeKind::Whitespace | NodeKind::Newline)
            {
                file_start = Some(node.start_offset());
            }
            if !kind.is_comment() {
                return ControlFlow::Continue(());
            }
            let offset = node.start_offset();
            match node.text().and_then(parse_directive) {
                Some(Directive::Disable(rules)) => open.push((offset, rules)),
                Some(Directive::Enable(rules)) => {
                    let wanted = normalized(&rules);
                    if let Some(index) = open.iter().rposition(|(_, r)| normalized(r) == wanted) {
                        let (start, rules) = open.remove(index);
                        regions.push(Region {
                            range: start..offset,
                            rules,
                        });
                    }
                }
                Some(Directive::DisableLine(rules)) => regions.push(Region {
                    range: lines.line_range(offset),
                    rules,
                }),
                None => {}
            }
            ControlFlow::Continue(())
        });

        let end = tree.text_len();
        regions.extend(open.into_iter().map(|(start, rules)| Region {
            range: start..end,
            rules,
        }));

        if !regions.is_empty() {
            debug!("Found {} suppression region(s)", regions.len());
        }

        Self {
            regions,
            file_start: file_start.unwrap_or(end),
            text_len: end,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Returns true if `rule_id` is suppressed at `offset`.
    ///
    /// Leading trivia belongs to the first token. A region left open until
    /// the end of the text also covers the end offset itself.
    ///
    /// Root visits tend to edit the end of the file, so the root counts as
    /// suppressed as soon as a region covering the rule reaches the end.
    pub fn is_suppressed(&self, offset: u32, rule_id: &str, is_root: bool) -> bool {
        let offset = offset.max(self.file_start);
        self.regions.iter().any(|region| {
            let applies = if is_root {
                region.range.end >= self.text_len
            } else {
                region.contains(offset, self.text_len)
            };
            applies && region.covers_rule(rule_id)
        })
    }
}

fn normalized(rules: &[String]) -> Vec<&str> {
    let mut rules: Vec<&str> = rules.iter().map(String::as_str).collect();
    rules.sort_unstable();
    rules
}

fn parse_directive(comment: &str) -> Option<Directive> {
    let body = if let Some(rest) = comment.strip_prefix("//") {
        rest
    } else {
        comment.strip_prefix("/*")?.strip_suffix("*/")?
    };

    let mut words = body
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|w| !w.is_empty());
    let keyword = words.next()?;
    let rules: Vec<String> = words.map(str::to_string).collect();

    match keyword {
        DISABLE => Some(Directive::Disable(rules)),
        ENABLE => Some(Directive::Enable(rules)),
        DISABLE_LINE => Some(Directive::DisableLine(rules)),
        _ => None,
    }
}
