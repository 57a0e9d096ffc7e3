//! Source units and the syntax provider interface.
//!
//! A [`SyntaxProvider`] turns raw text into a [`SourceUnit`]: a token stream
//! plus a block-structured syntax tree. The engine never parses anything
//! itself; it only consumes units through this interface.

use std::collections::BTreeSet;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Lexical token category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Identifier, including `end` used as an index.
    Identifier,
    /// Reserved word (`function`, `if`, `end`, ...).
    Keyword,
    /// Numeric literal.
    Number,
    /// Character vector or string literal, quotes included.
    String,
    /// `%` line comment or `%{ ... %}` block comment.
    Comment,
    /// `...` line continuation, including any trailing text.
    Continuation,
    /// Operator such as `=`, `==`, `+`, `'`.
    Operator,
    /// Bracket or separator: `( ) [ ] { } , ;`.
    Punct,
    /// End of a physical line.
    Newline,
}

/// A single token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token category.
    pub kind: TokenKind,
    /// Exact source text.
    pub text: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column (1-indexed, in characters).
    pub column: usize,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
        }
    }

    /// Column one past the last character on the token's first line.
    #[must_use]
    pub fn end_column(&self) -> usize {
        let first_line = self.text.split('\n').next().unwrap_or("");
        self.column + first_line.chars().count()
    }

    /// Returns true if this is the given keyword.
    #[must_use]
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == keyword
    }

    /// Returns true if this is an identifier with the given text.
    #[must_use]
    pub fn is_ident(&self, name: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text == name
    }

    /// Returns true if this is a punctuation or operator token with the given text.
    #[must_use]
    pub fn is_symbol(&self, symbol: &str) -> bool {
        matches!(self.kind, TokenKind::Punct | TokenKind::Operator) && self.text == symbol
    }

    /// Returns true for tokens that carry no code (comments, continuations, newlines).
    #[must_use]
    pub fn is_trivia(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Comment | TokenKind::Continuation | TokenKind::Newline
        )
    }
}

/// Kind of syntax node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    /// Root of a script file (or of any file; functions are its children).
    Script,
    /// `function` definition.
    Function,
    /// `classdef` block.
    ClassDef,
    /// `properties` block inside a class.
    Properties,
    /// `methods` block inside a class.
    Methods,
    /// `events` block inside a class.
    Events,
    /// `enumeration` block inside a class.
    Enumeration,
    /// `arguments` validation block at the top of a function.
    Arguments,
    /// `if` / `elseif` / `else` block.
    If,
    /// `for` or `parfor` loop.
    For,
    /// `while` loop.
    While,
    /// `switch` block.
    Switch,
    /// `case` arm of a switch.
    Case,
    /// `otherwise` arm of a switch.
    Otherwise,
    /// `try` block.
    Try,
    /// `catch` clause of a try block.
    Catch,
    /// `spmd` block.
    Spmd,
    /// `global` declaration.
    Global,
    /// `persistent` declaration.
    Persistent,
    /// Any other statement (assignment, call, command).
    Statement,
}

impl NodeKind {
    /// Lower-case display name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::Function => "function",
            Self::ClassDef => "classdef",
            Self::Properties => "properties",
            Self::Methods => "methods",
            Self::Events => "events",
            Self::Enumeration => "enumeration",
            Self::Arguments => "arguments",
            Self::If => "if",
            Self::For => "for",
            Self::While => "while",
            Self::Switch => "switch",
            Self::Case => "case",
            Self::Otherwise => "otherwise",
            Self::Try => "try",
            Self::Catch => "catch",
            Self::Spmd => "spmd",
            Self::Global => "global",
            Self::Persistent => "persistent",
            Self::Statement => "statement",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An identifier with its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    /// Identifier text.
    pub text: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column (1-indexed).
    pub column: usize,
}

impl Ident {
    /// Creates an identifier from a token.
    #[must_use]
    pub fn from_token(token: &Token) -> Self {
        Self {
            text: token.text.clone(),
            line: token.line,
            column: token.column,
        }
    }

    /// Column one past the identifier.
    #[must_use]
    pub fn end_column(&self) -> usize {
        self.column + self.text.chars().count()
    }
}

/// Line/column extent of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// First line (1-indexed).
    pub start_line: usize,
    /// First column (1-indexed).
    pub start_column: usize,
    /// Last line (1-indexed, inclusive).
    pub end_line: usize,
}

impl Span {
    /// Number of lines covered, inclusive.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }
}

/// A node of the block-structured syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Node kind.
    pub kind: NodeKind,
    /// Name: function/class name, loop variable, or catch identifier.
    pub name: Option<Ident>,
    /// Function inputs, or the names declared by `global`/`persistent`.
    pub params: Vec<Ident>,
    /// Function outputs.
    pub outputs: Vec<Ident>,
    /// Extent in the source.
    pub span: Span,
    /// Token indices of the header line (blocks) or the statement itself.
    pub tokens: Range<usize>,
    /// Nested nodes in source order.
    pub children: Vec<Node>,
}

impl Node {
    /// Creates an empty node of the given kind.
    #[must_use]
    pub fn new(kind: NodeKind, span: Span, tokens: Range<usize>) -> Self {
        Self {
            kind,
            name: None,
            params: Vec::new(),
            outputs: Vec::new(),
            span,
            tokens,
            children: Vec::new(),
        }
    }

    /// Iterates this node and all its descendants in pre-order.
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }
}

/// Pre-order iterator over a node tree.
pub struct Walk<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// One logical compilation unit.
///
/// Owned by the engine for the duration of an analysis pass and only ever
/// handed to rules by shared reference.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    path: PathBuf,
    text: String,
    tokens: Vec<Token>,
    root: Node,
    line_count: usize,
    kinds: BTreeSet<NodeKind>,
}

impl SourceUnit {
    /// Assembles a unit from provider output.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>, tokens: Vec<Token>, root: Node) -> Self {
        let text = text.into();
        let line_count = text.lines().count().max(1);
        let kinds = root.walk().map(|n| n.kind).collect();
        Self {
            path: path.into(),
            text,
            tokens,
            root,
            line_count,
            kinds,
        }
    }

    /// Unit path or synthetic id.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full source text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Token stream.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Syntax tree root.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Number of lines in the unit (at least 1).
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Returns true if any node of `kind` is reachable from the root.
    #[must_use]
    pub fn has_kind(&self, kind: NodeKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Node kinds present in the tree.
    pub fn kinds(&self) -> impl Iterator<Item = NodeKind> + '_ {
        self.kinds.iter().copied()
    }

    /// All nodes of the given kind, in pre-order.
    pub fn nodes_of(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.root.walk().filter(move |n| n.kind == kind)
    }

    /// Tokens belonging to a node's header or statement.
    #[must_use]
    pub fn node_tokens(&self, node: &Node) -> &[Token] {
        let end = node.tokens.end.min(self.tokens.len());
        let start = node.tokens.start.min(end);
        &self.tokens[start..end]
    }

    /// Physical lines of the text, numbered from 1.
    pub fn numbered_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.text.lines().enumerate().map(|(i, l)| (i + 1, l))
    }

    /// Returns true if the 1-indexed line is inside the unit.
    #[must_use]
    pub fn contains_line(&self, line: usize) -> bool {
        (1..=self.line_count).contains(&line)
    }
}

/// Provider failure for one unit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} (line {line}, column {column})")]
pub struct ParseError {
    /// What went wrong.
    pub message: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column (1-indexed).
    pub column: usize,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}

/// Token/AST provider for one source language.
///
/// Implement this to plug a parser into the engine.
pub trait SyntaxProvider: Send + Sync {
    /// Language identifier (e.g. `"matlab"`).
    fn language_id(&self) -> &'static str;

    /// File extensions handled, without the dot (e.g. `&["m"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Parses `source` into a unit identified by `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] when the text cannot be turned into a tree.
    fn parse(&self, source: &str, path: &Path) -> Result<SourceUnit, ParseError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize) -> Span {
        Span {
            start_line: start,
            start_column: 1,
            end_line: end,
        }
    }

    fn sample_tree() -> Node {
        let mut root = Node::new(NodeKind::Script, span(1, 6), 0..0);
        let mut func = Node::new(NodeKind::Function, span(1, 6), 0..0);
        let mut loop_node = Node::new(NodeKind::For, span(2, 4), 0..0);
        loop_node
            .children
            .push(Node::new(NodeKind::Statement, span(3, 3), 0..0));
        func.children.push(loop_node);
        func.children
            .push(Node::new(NodeKind::Statement, span(5, 5), 0..0));
        root.children.push(func);
        root
    }

    #[test]
    fn walk_is_pre_order() {
        let tree = sample_tree();
        let kinds: Vec<NodeKind> = tree.walk().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Script,
                NodeKind::Function,
                NodeKind::For,
                NodeKind::Statement,
                NodeKind::Statement,
            ]
        );
    }

    #[test]
    fn unit_tracks_present_kinds() {
        let unit = SourceUnit::new("a.m", "a\nb\nc\nd\ne\nf\n", Vec::new(), sample_tree());
        assert!(unit.has_kind(NodeKind::For));
        assert!(!unit.has_kind(NodeKind::Try));
        assert_eq!(unit.line_count(), 6);
        assert_eq!(unit.nodes_of(NodeKind::Statement).count(), 2);
    }

    #[test]
    fn empty_text_has_one_line() {
        let unit = SourceUnit::new("empty.m", "", Vec::new(), Node::new(NodeKind::Script, Span::default(), 0..0));
        assert_eq!(unit.line_count(), 1);
        assert!(unit.contains_line(1));
        assert!(!unit.contains_line(2));
    }

    #[test]
    fn token_end_column_counts_chars() {
        let tok = Token::new(TokenKind::String, "'héllo'", 3, 5);
        assert_eq!(tok.end_column(), 12);
    }

    #[test]
    fn span_line_count_is_inclusive() {
        assert_eq!(span(4, 4).line_count(), 1);
        assert_eq!(span(4, 9).line_count(), 6);
    }
}
