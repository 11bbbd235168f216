//! Node kind definitions.

use serde::{Deserialize, Serialize};

/// Kind tag carried by every node of a [`SyntaxTree`](crate::SyntaxTree).
///
/// The engine never interprets these beyond [`NodeKind::Root`] and the
/// trivia split; they exist so rules and parsers share a vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[non_exhaustive]
pub enum NodeKind {
    // Composite nodes
    /// The file root.
    Root,
    /// A brace-delimited block, including its braces.
    Block,
    /// A parenthesised group, including its parentheses.
    Group,

    // Trivia leaves
    /// Byte-order mark preceding the first token.
    Bom,
    /// Horizontal whitespace run.
    Whitespace,
    /// A single line break (`\n` or `\r\n`).
    Newline,
    /// `// ...` up to, not including, the line break.
    LineComment,
    /// `/* ... */`.
    BlockComment,

    // Token leaves
    /// Identifier or keyword.
    Identifier,
    /// Numeric literal.
    Number,
    /// Quoted string or char literal.
    StringLiteral,
    /// Any other single character.
    Punctuation,
}

impl NodeKind {
    /// Returns true for kinds that may have children.
    #[inline]
    pub const fn is_composite(&self) -> bool {
        matches!(self, Self::Root | Self::Block | Self::Group)
    }

    /// Returns true for non-semantic leaves preserved verbatim.
    #[inline]
    pub const fn is_trivia(&self) -> bool {
        matches!(
            self,
            Self::Bom | Self::Whitespace | Self::Newline | Self::LineComment | Self::BlockComment
        )
    }

    /// Returns true for comment leaves.
    #[inline]
    pub const fn is_comment(&self) -> bool {
        matches!(self, Self::LineComment | Self::BlockComment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(NodeKind::Root, true, false)]
    #[case(NodeKind::Block, true, false)]
    #[case(NodeKind::Group, true, false)]
    #[case(NodeKind::Bom, false, true)]
    #[case(NodeKind::Whitespace, false, true)]
    #[case(NodeKind::Newline, false, true)]
    #[case(NodeKind::LineComment, false, true)]
    #[case(NodeKind::BlockComment, false, true)]
    #[case(NodeKind::Identifier, false, false)]
    #[case(NodeKind::Number, false, false)]
    #[case(NodeKind::StringLiteral, false, false)]
    #[case(NodeKind::Punctuation, false, false)]
    fn test_kind_classification(
        #[case] kind: NodeKind,
        #[case] composite: bool,
        #[case] trivia: bool,
    ) {
        assert_eq!(kind.is_composite(), composite);
        assert_eq!(kind.is_trivia(), trivia);
    }

    #[test]
    fn test_comment_kinds() {
        assert!(NodeKind::LineComment.is_comment());
        assert!(NodeKind::BlockComment.is_comment());
        assert!(!NodeKind::Whitespace.is_comment());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&NodeKind::LineComment).unwrap();
        assert_eq!(json, "\"LineComment\"");
    }
}
