//! Grammar-agnostic token parser.
//!
//! Splits C-family source text into leaves and nests bracket pairs:
//! `{ ... }` becomes a [`NodeKind::Block`], `( ... )` a
//! [`NodeKind::Group`]. Everything else is a flat token under the
//! enclosing composite. No byte of the input is dropped.

use ordolint_ast::{NodeId, NodeKind, SyntaxTree};

use crate::{ParseError, Parser};

const BOM: char = '\u{feff}';

/// Reference parser producing a shallow, bracket-nested tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokenParser;

impl TokenParser {
    /// Creates a new token parser.
    pub fn new() -> Self {
        Self
    }
}

impl Parser for TokenParser {
    fn name(&self) -> &str {
        "token"
    }

    fn extensions(&self) -> &[&str] {
        &["kt", "kts", "java", "rs", "c", "h", "js", "ts", "txt"]
    }

    fn parse(&self, source: &str) -> Result<SyntaxTree, ParseError> {
        if u32::try_from(source.len()).is_err() {
            return Err(ParseError::invalid_source(format!(
                "source of {} bytes exceeds the 4 GiB limit",
                source.len()
            )));
        }
        Builder::new(source).run()
    }
}

/// An open bracket waiting for its closer.
struct Open {
    node: NodeId,
    closer: char,
    offset: usize,
}

struct Builder<'s> {
    source: &'s str,
    pos: usize,
    tree: SyntaxTree,
    open: Vec<Open>,
}

impl<'s> Builder<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            pos: 0,
            tree: SyntaxTree::new(),
            open: Vec::new(),
        }
    }

    fn run(mut self) -> Result<SyntaxTree, ParseError> {
        if self.source.starts_with(BOM) {
            self.leaf(NodeKind::Bom, BOM.len_utf8())?;
        }

        while let Some(c) = self.peek() {
            match c {
                '\n' => self.leaf(NodeKind::Newline, 1)?,
                '\r' if self.rest().starts_with("\r\n") => self.leaf(NodeKind::Newline, 2)?,
                c if c.is_whitespace() => {
                    let len = self.whitespace_len();
                    self.leaf(NodeKind::Whitespace, len)?
                }
                '/' if self.rest().starts_with("//") => {
                    let len = self.line_comment_len();
                    self.leaf(NodeKind::LineComment, len)?
                }
                '/' if self.rest().starts_with("/*") => {
                    let len = self.block_comment_len()?;
                    self.leaf(NodeKind::BlockComment, len)?
                }
                '"' | '\'' => {
                    let len = self.string_len(c)?;
                    self.leaf(NodeKind::StringLiteral, len)?
                }
                '{' => self.open_bracket(NodeKind::Block, '}')?,
                '(' => self.open_bracket(NodeKind::Group, ')')?,
                '}' | ')' => self.close_bracket(c)?,
                c if c.is_alphabetic() || c == '_' => {
                    let len = self.take_while_len(|ch| ch.is_alphanumeric() || ch == '_');
                    self.leaf(NodeKind::Identifier, len)?
                }
                c if c.is_ascii_digit() => {
                    let len =
                        self.take_while_len(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '.');
                    self.leaf(NodeKind::Number, len)?
                }
                c => self.leaf(NodeKind::Punctuation, c.len_utf8())?,
            }
        }

        if let Some(open) = self.open.last() {
            let opener = if open.closer == '}' { '{' } else { '(' };
            return Err(ParseError::invalid_source_at(
                format!("unclosed '{}'", opener),
                open.offset,
            ));
        }

        Ok(self.tree)
    }

    fn rest(&self) -> &'s str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn current_parent(&self) -> NodeId {
        self.open
            .last()
            .map(|open| open.node)
            .unwrap_or_else(|| self.tree.root())
    }

    /// Emits the next `len` bytes as a leaf under the current parent.
    fn leaf(&mut self, kind: NodeKind, len: usize) -> Result<(), ParseError> {
        self.leaf_under(self.current_parent(), kind, len)
    }

    fn leaf_under(&mut self, parent: NodeId, kind: NodeKind, len: usize) -> Result<(), ParseError> {
        let text = &self.source[self.pos..self.pos + len];
        self.tree.push_leaf(parent, kind, text)?;
        self.pos += len;
        Ok(())
    }

    fn open_bracket(&mut self, kind: NodeKind, closer: char) -> Result<(), ParseError> {
        let node = self.tree.push_node(self.current_parent(), kind)?;
        self.open.push(Open {
            node,
            closer,
            offset: self.pos,
        });
        self.leaf_under(node, NodeKind::Punctuation, 1)
    }

    fn close_bracket(&mut self, closer: char) -> Result<(), ParseError> {
        match self.open.last() {
            Some(open) if open.closer == closer => {
                let node = open.node;
                self.leaf_under(node, NodeKind::Punctuation, 1)?;
                self.open.pop();
                Ok(())
            }
            _ => Err(ParseError::invalid_source_at(
                format!("unbalanced '{}'", closer),
                self.pos,
            )),
        }
    }

    fn take_while_len(&self, pred: impl Fn(char) -> bool) -> usize {
        self.rest()
            .char_indices()
            .find(|&(_, c)| !pred(c))
            .map(|(i, _)| i)
            .unwrap_or(self.rest().len())
    }

    /// Horizontal whitespace, stopping before any line break.
    fn whitespace_len(&self) -> usize {
        let rest = self.rest();
        let mut len = 0;
        for (i, c) in rest.char_indices() {
            if c == '\n' || !c.is_whitespace() || rest[i..].starts_with("\r\n") {
                break;
            }
            len = i + c.len_utf8();
        }
        len
    }

    fn line_comment_len(&self) -> usize {
        let rest = self.rest();
        let end = rest.find('\n').unwrap_or(rest.len());
        if rest[..end].ends_with('\r') {
            end - 1
        } else {
            end
        }
    }

    fn block_comment_len(&self) -> Result<usize, ParseError> {
        self.rest()[2..]
            .find("*/")
            .map(|i| i + 4)
            .ok_or_else(|| ParseError::invalid_source_at("unterminated block comment", self.pos))
    }

    fn string_len(&self, quote: char) -> Result<usize, ParseError> {
        let mut escaped = false;
        for (i, c) in self.rest().char_indices().skip(1) {
            match c {
                '\n' => break,
                '\\' if !escaped => escaped = true,
                c if c == quote && !escaped => return Ok(i + c.len_utf8()),
                _ => escaped = false,
            }
        }
        Err(ParseError::invalid_source_at(
            "unterminated string literal",
            self.pos,
        ))
    }
}
