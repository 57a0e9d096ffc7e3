//! Block-structure parser.
//!
//! Groups tokens into logical statements and nests them into a tree of
//! blocks. Expressions are not parsed; rules inspect statement tokens
//! directly.

use matlint_core::{Ident, Node, NodeKind, ParseError, Span, Token, TokenKind};

const CLASS_SECTIONS: &[(&str, NodeKind)] = &[
    ("properties", NodeKind::Properties),
    ("methods", NodeKind::Methods),
    ("events", NodeKind::Events),
    ("enumeration", NodeKind::Enumeration),
];

/// Attributes allowed in `arguments (...)`.
const ARGUMENTS_ATTRIBUTES: &[&str] = &["Input", "Output", "Repeating"];

/// Code token indices of one logical statement.
type Statement = Vec<usize>;

struct Frame {
    node: Node,
    /// `methods (Abstract)` blocks hold bodiless signatures.
    abstract_methods: bool,
}

struct Parser<'t> {
    tokens: &'t [Token],
    stack: Vec<Frame>,
    functions_have_end: bool,
    /// Last line of the previous statement.
    previous_line: usize,
}

/// Builds the block tree for a token stream.
///
/// # Errors
///
/// Returns [`ParseError`] for unbalanced brackets, a stray `end`, a block
/// left open at end of input, or a malformed declaration header.
pub fn parse(tokens: &[Token], line_count: usize) -> Result<Node, ParseError> {
    let statements = split_statements(tokens)?;
    let root = Node::new(
        NodeKind::Script,
        Span {
            start_line: 1,
            start_column: 1,
            end_line: line_count.max(1),
        },
        0..tokens.len(),
    );

    let mut parser = Parser {
        tokens,
        stack: vec![Frame {
            node: root,
            abstract_methods: false,
        }],
        functions_have_end: functions_have_end(tokens, &statements),
        previous_line: 1,
    };

    for statement in &statements {
        parser.statement(statement)?;
        if let Some(&last) = statement.last() {
            parser.previous_line = tokens[last].line;
        }
    }
    parser.finish()
}

/// Splits tokens into statements at newlines, `,` and `;` outside brackets.
fn split_statements(tokens: &[Token]) -> Result<Vec<Statement>, ParseError> {
    let mut statements = Vec::new();
    let mut current = Vec::new();
    let mut brackets: Vec<&Token> = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Comment | TokenKind::Continuation => {}
            TokenKind::Newline => {
                if let Some(open) = brackets.last() {
                    if open.text == "(" {
                        return Err(ParseError::new(
                            "unclosed '(' at end of line",
                            open.line,
                            open.column,
                        ));
                    }
                } else if !current.is_empty() {
                    statements.push(std::mem::take(&mut current));
                }
            }
            TokenKind::Punct => match token.text.as_str() {
                "(" | "[" | "{" => {
                    brackets.push(token);
                    current.push(i);
                }
                ")" | "]" | "}" => {
                    let expected = match brackets.pop().map(|t| t.text.as_str()) {
                        Some("(") => ")",
                        Some("[") => "]",
                        Some("{") => "}",
                        _ => "",
                    };
                    if expected != token.text {
                        return Err(ParseError::new(
                            format!("unmatched '{}'", token.text),
                            token.line,
                            token.column,
                        ));
                    }
                    current.push(i);
                }
                "," | ";" if brackets.is_empty() => {
                    if !current.is_empty() {
                        statements.push(std::mem::take(&mut current));
                    }
                }
                _ => current.push(i),
            },
            _ => current.push(i),
        }
    }

    if let Some(open) = brackets.last() {
        return Err(ParseError::new(
            format!("unclosed '{}'", open.text),
            open.line,
            open.column,
        ));
    }
    if !current.is_empty() {
        statements.push(current);
    }
    Ok(statements)
}

/// Decides whether `function` blocks are closed by `end` in this file.
///
/// MATLAB allows either style per file. Class files always use `end`.
fn functions_have_end(tokens: &[Token], statements: &[Statement]) -> bool {
    let mut openers = 0usize;
    let mut ends = 0usize;
    let mut functions = 0usize;

    for statement in statements {
        if is_arguments_header(tokens, statement) {
            openers += 1;
            continue;
        }
        let first = &tokens[statement[0]];
        if first.kind != TokenKind::Keyword {
            continue;
        }
        match first.text.as_str() {
            "classdef" => return true,
            "if" | "for" | "parfor" | "while" | "switch" | "try" | "spmd" => openers += 1,
            "function" => functions += 1,
            "end" => ends += 1,
            _ => {}
        }
    }

    functions > 0 && ends > openers
}

/// True for `arguments` or `arguments (Output)` standing alone.
fn is_arguments_header(tokens: &[Token], statement: &Statement) -> bool {
    let mut code = statement.iter().map(|&i| &tokens[i]);
    if !code.next().is_some_and(|t| t.is_ident("arguments")) {
        return false;
    }
    let Some(open) = code.next() else {
        return true;
    };
    let rest: Vec<&Token> = code.collect();
    let Some((close, attributes)) = rest.split_last() else {
        return false;
    };
    open.is_symbol("(")
        && close.is_symbol(")")
        && attributes.iter().all(|t| {
            t.is_symbol(",") || ARGUMENTS_ATTRIBUTES.iter().any(|a| t.is_ident(a))
        })
}

impl<'t> Parser<'t> {
    fn top(&self) -> &Frame {
        // The root frame is never popped.
        &self.stack[self.stack.len() - 1]
    }

    fn top_kind(&self) -> NodeKind {
        self.top().node.kind
    }

    fn push(&mut self, node: Node) {
        self.stack.push(Frame {
            node,
            abstract_methods: false,
        });
    }

    fn attach(&mut self, node: Node) {
        let last = self.stack.len() - 1;
        self.stack[last].node.children.push(node);
    }

    /// Pops the innermost block, closing it at `end_line`.
    fn close(&mut self, end_line: usize) -> NodeKind {
        let mut frame = match self.stack.pop() {
            Some(frame) if !self.stack.is_empty() => frame,
            Some(root) => {
                self.stack.push(root);
                return NodeKind::Script;
            }
            None => return NodeKind::Script,
        };
        frame.node.span.end_line = end_line.max(frame.node.span.start_line);
        let kind = frame.node.kind;
        self.attach(frame.node);
        kind
    }

    fn node(&self, kind: NodeKind, statement: &Statement) -> Node {
        let first = &self.tokens[statement[0]];
        let last = statement.last().copied().unwrap_or(statement[0]);
        Node::new(
            kind,
            Span {
                start_line: first.line,
                start_column: first.column,
                end_line: self.tokens[last].line,
            },
            statement[0]..last + 1,
        )
    }

    fn code<'s>(&self, statement: &'s Statement) -> impl Iterator<Item = &'t Token> + 's
    where
        't: 's,
    {
        let tokens = self.tokens;
        statement.iter().map(move |&i| &tokens[i])
    }

    fn statement(&mut self, statement: &Statement) -> Result<(), ParseError> {
        let tokens = self.tokens;
        let first = &tokens[statement[0]];

        if self.opens_arguments_block(statement) {
            self.open(NodeKind::Arguments, statement);
            return Ok(());
        }

        if first.kind == TokenKind::Identifier && self.top_kind() == NodeKind::ClassDef {
            if let Some(&(_, kind)) = CLASS_SECTIONS.iter().find(|(w, _)| first.is_ident(w)) {
                let abstract_methods = kind == NodeKind::Methods && self.declares_abstract(statement);
                let node = self.node(kind, statement);
                self.stack.push(Frame {
                    node,
                    abstract_methods,
                });
                return Ok(());
            }
        }

        if first.kind != TokenKind::Keyword {
            let node = self.node(NodeKind::Statement, statement);
            self.attach(node);
            return Ok(());
        }

        match first.text.as_str() {
            "function" => self.function(statement)?,
            "classdef" => {
                let mut node = self.node(NodeKind::ClassDef, statement);
                node.name = Some(self.classdef_name(statement)?);
                self.push(node);
            }
            "if" => self.open(NodeKind::If, statement),
            "while" => self.open(NodeKind::While, statement),
            "switch" => self.open(NodeKind::Switch, statement),
            "try" => self.open(NodeKind::Try, statement),
            "spmd" => self.open(NodeKind::Spmd, statement),
            "for" | "parfor" => {
                let mut node = self.node(NodeKind::For, statement);
                node.name = self.loop_variable(statement);
                self.push(node);
            }
            "elseif" | "else" => {
                if self.top_kind() != NodeKind::If {
                    return Err(outside(first, "if"));
                }
                let node = self.node(NodeKind::Statement, statement);
                // Branch headers stay inside the if block for layout rules.
                self.attach(node);
            }
            "case" | "otherwise" => {
                if matches!(self.top_kind(), NodeKind::Case | NodeKind::Otherwise) {
                    self.close(self.previous_line);
                }
                if self.top_kind() != NodeKind::Switch {
                    return Err(outside(first, "switch"));
                }
                let kind = if first.text == "case" {
                    NodeKind::Case
                } else {
                    NodeKind::Otherwise
                };
                self.open(kind, statement);
            }
            "catch" => {
                if self.top_kind() != NodeKind::Try {
                    return Err(outside(first, "try"));
                }
                let mut node = self.node(NodeKind::Catch, statement);
                if statement.len() == 2 {
                    let ident = &tokens[statement[1]];
                    if ident.kind == TokenKind::Identifier {
                        node.name = Some(Ident::from_token(ident));
                    }
                }
                self.push(node);
            }
            "end" => self.end(first)?,
            "global" | "persistent" => {
                let kind = if first.text == "global" {
                    NodeKind::Global
                } else {
                    NodeKind::Persistent
                };
                let mut node = self.node(kind, statement);
                node.params = self
                    .code(statement)
                    .skip(1)
                    .filter(|t| t.kind == TokenKind::Identifier)
                    .map(Ident::from_token)
                    .collect();
                self.attach(node);
            }
            _ => {
                let node = self.node(NodeKind::Statement, statement);
                self.attach(node);
            }
        }
        Ok(())
    }

    /// Validation blocks must come before any other code in a function.
    fn opens_arguments_block(&self, statement: &Statement) -> bool {
        let frame = self.top();
        frame.node.kind == NodeKind::Function
            && frame
                .node
                .children
                .iter()
                .all(|c| c.kind == NodeKind::Arguments)
            && is_arguments_header(self.tokens, statement)
    }

    fn open(&mut self, kind: NodeKind, statement: &Statement) {
        let node = self.node(kind, statement);
        self.push(node);
    }

    fn end(&mut self, token: &Token) -> Result<(), ParseError> {
        if self.stack.len() == 1 {
            return Err(ParseError::new(
                "'end' without a matching block",
                token.line,
                token.column,
            ));
        }
        if !self.functions_have_end && self.top_kind() == NodeKind::Function {
            return Err(ParseError::new(
                "'end' closes a function in a file whose functions have no 'end'",
                token.line,
                token.column,
            ));
        }
        match self.close(token.line) {
            NodeKind::Case | NodeKind::Otherwise | NodeKind::Catch => {
                self.close(token.line);
            }
            _ => {}
        }
        Ok(())
    }

    fn function(&mut self, statement: &Statement) -> Result<(), ParseError> {
        if !self.functions_have_end {
            self.close_endless_function()?;
        }

        let mut node = self.node(NodeKind::Function, statement);
        self.function_header(statement, &mut node)?;

        if self.top().abstract_methods {
            self.attach(node);
        } else {
            self.push(node);
        }
        Ok(())
    }

    /// Closes a function that has no `end` at the start of the next one.
    fn close_endless_function(&mut self) -> Result<(), ParseError> {
        match self.top_kind() {
            NodeKind::Script => Ok(()),
            NodeKind::Function => {
                self.close(self.previous_line);
                Ok(())
            }
            _ => Err(self.unclosed()),
        }
    }

    fn unclosed(&self) -> ParseError {
        let node = &self.top().node;
        ParseError::new(
            format!(
                "missing 'end' for {} opened at line {}",
                node.kind, node.span.start_line
            ),
            node.span.start_line,
            node.span.start_column,
        )
    }

    fn finish(mut self) -> Result<Node, ParseError> {
        if !self.functions_have_end {
            self.close_endless_function()?;
        }
        if self.stack.len() > 1 {
            return Err(self.unclosed());
        }
        self.stack
            .pop()
            .map(|frame| frame.node)
            .ok_or_else(|| ParseError::new("empty parse stack", 1, 1))
    }

    /// Parses `function [a, b] = name(x, y)` and its shorter forms.
    fn function_header(&self, statement: &Statement, node: &mut Node) -> Result<(), ParseError> {
        let keyword = &self.tokens[statement[0]];
        let rest: Vec<&Token> = self.code(statement).skip(1).collect();

        let mut depth = 0usize;
        let assign = rest.iter().position(|t| {
            match t.text.as_str() {
                "[" | "(" | "{" if t.kind == TokenKind::Punct => depth += 1,
                "]" | ")" | "}" if t.kind == TokenKind::Punct => depth = depth.saturating_sub(1),
                _ => {}
            }
            depth == 0 && t.is_symbol("=")
        });

        let signature = match assign {
            Some(pos) => {
                node.outputs = rest[..pos]
                    .iter()
                    .filter(|t| t.kind == TokenKind::Identifier)
                    .map(|t| Ident::from_token(t))
                    .collect();
                &rest[pos + 1..]
            }
            None => &rest[..],
        };

        let mut iter = signature.iter().peekable();
        let Some(first) = iter.next().filter(|t| t.kind == TokenKind::Identifier) else {
            return Err(ParseError::new(
                "malformed function header",
                keyword.line,
                keyword.column,
            ));
        };

        let mut name = Ident::from_token(first);
        // Property accessors: `get.Name`, `set.Name`.
        while iter.peek().is_some_and(|t| t.is_symbol(".")) {
            iter.next();
            match iter.next() {
                Some(part) if part.kind == TokenKind::Identifier => {
                    name.text.push('.');
                    name.text.push_str(&part.text);
                }
                _ => {
                    return Err(ParseError::new(
                        "malformed function name",
                        first.line,
                        first.column,
                    ))
                }
            }
        }
        node.name = Some(name);

        if iter.next_if(|t| t.is_symbol("(")).is_some() {
            node.params = iter
                .take_while(|t| !t.is_symbol(")"))
                .filter(|t| t.kind == TokenKind::Identifier)
                .map(|t| Ident::from_token(t))
                .collect();
        }
        Ok(())
    }

    /// Name in `classdef (Attributes) Name < Super`.
    fn classdef_name(&self, statement: &Statement) -> Result<Ident, ParseError> {
        let keyword = &self.tokens[statement[0]];
        let mut depth = 0usize;
        for token in self.code(statement).skip(1) {
            match token.text.as_str() {
                "(" => depth += 1,
                ")" => depth = depth.saturating_sub(1),
                _ if depth == 0 && token.kind == TokenKind::Identifier => {
                    return Ok(Ident::from_token(token));
                }
                _ => {}
            }
        }
        Err(ParseError::new(
            "malformed classdef header",
            keyword.line,
            keyword.column,
        ))
    }

    /// Variable in `for k = ...`, `for (k = ...)` or `parfor k = ...`.
    fn loop_variable(&self, statement: &Statement) -> Option<Ident> {
        let mut code = self.code(statement).skip(1).skip_while(|t| t.is_symbol("("));
        let var = code.next().filter(|t| t.kind == TokenKind::Identifier)?;
        code.next()
            .filter(|t| t.is_symbol("="))
            .map(|_| Ident::from_token(var))
    }

    /// True for `methods (Abstract)` or `methods (Abstract = true, ...)`.
    fn declares_abstract(&self, statement: &Statement) -> bool {
        let code: Vec<&Token> = self.code(statement).collect();
        code.iter().enumerate().any(|(i, t)| {
            t.is_ident("Abstract")
                && !(code.get(i + 1).is_some_and(|n| n.is_symbol("="))
                    && code.get(i + 2).is_some_and(|v| v.is_ident("false")))
        })
    }
}

fn outside(token: &Token, block: &str) -> ParseError {
    ParseError::new(
        format!("'{}' outside of a {block} block", token.text),
        token.line,
        token.column,
    )
}
