//! Parser trait definition.

use ordolint_ast::SyntaxTree;

use crate::ParseError;

/// Trait for parsing source text into a [`SyntaxTree`].
///
/// The lint engine only ever sees the resulting tree. Implementations must
/// keep every byte of the input in some leaf (trivia included) so that
/// `parse(source)?.render() == source`.
///
/// # Example
///
/// ```rust,ignore
/// use ordolint_ast::SyntaxTree;
/// use ordolint_parser::{ParseError, Parser};
///
/// struct MyParser;
///
/// impl Parser for MyParser {
///     fn name(&self) -> &str {
///         "my-parser"
///     }
///
///     fn extensions(&self) -> &[&str] {
///         &["myext"]
///     }
///
///     fn parse(&self, source: &str) -> Result<SyntaxTree, ParseError> {
///         todo!()
///     }
/// }
/// ```
pub trait Parser: Send + Sync {
    /// Returns the name of this parser.
    fn name(&self) -> &str;

    /// Returns the file extensions this parser handles.
    ///
    /// Extensions should not include the leading dot (e.g., `["kt", "kts"]`).
    fn extensions(&self) -> &[&str];

    /// Parses the source text into a tree.
    fn parse(&self, source: &str) -> Result<SyntaxTree, ParseError>;

    /// Returns true if this parser can handle the given file extension.
    fn can_parse(&self, extension: &str) -> bool {
        self.extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}
