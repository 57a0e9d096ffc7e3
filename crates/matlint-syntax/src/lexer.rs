//! MATLAB tokenizer.
//!
//! Produces a flat token stream with comments, continuations and newlines
//! preserved, so rules can reason about layout as well as code.

use matlint_core::{ParseError, Token, TokenKind};

/// Reserved words. `properties`, `methods`, `events` and `enumeration` are
/// not reserved and are lexed as identifiers.
pub const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "catch",
    "classdef",
    "continue",
    "else",
    "elseif",
    "end",
    "for",
    "function",
    "global",
    "if",
    "otherwise",
    "parfor",
    "persistent",
    "return",
    "spmd",
    "switch",
    "try",
    "while",
];

const TWO_CHAR_OPERATORS: &[&str] = &[
    "==", "~=", "<=", ">=", "&&", "||", ".*", "./", ".\\", ".^", ".'",
];

const ONE_CHAR_OPERATORS: &str = "+-*/\\^<>&|~=:@.!?";

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
    depth: usize,
    /// Line and end column of the previous code token.
    last_code_end: Option<(usize, usize)>,
}

/// Splits MATLAB source into tokens.
///
/// # Errors
///
/// Returns [`ParseError`] for unterminated strings or block comments and for
/// characters that cannot start a token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut lexer = Lexer {
        chars: source.chars().collect(),
        pos: 0,
        line: 1,
        column: 1,
        tokens: Vec::new(),
        depth: 0,
        last_code_end: None,
    };
    lexer.run()?;
    Ok(lexer.tokens)
}

impl Lexer {
    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn push(&mut self, kind: TokenKind, text: String, line: usize, column: usize) {
        if !matches!(
            kind,
            TokenKind::Comment | TokenKind::Continuation | TokenKind::Newline
        ) {
            let end = column + text.chars().count();
            self.last_code_end = Some((line, end));
        }
        self.tokens.push(Token::new(kind, text, line, column));
    }

    fn run(&mut self) -> Result<(), ParseError> {
        while let Some(c) = self.peek(0) {
            let (line, column) = (self.line, self.column);
            match c {
                '\n' => {
                    self.bump();
                    self.push(TokenKind::Newline, "\n".to_string(), line, column);
                }
                ' ' | '\t' | '\r' => {
                    self.bump();
                }
                '%' => self.comment()?,
                '.' if self.peek(1) == Some('.') && self.peek(2) == Some('.') => {
                    self.continuation();
                }
                c if c.is_ascii_alphabetic() => self.word(),
                c if c.is_ascii_digit()
                    || (c == '.' && self.peek(1).is_some_and(|n| n.is_ascii_digit())) =>
                {
                    self.number();
                }
                '\'' if self.is_transpose_context() => {
                    self.bump();
                    self.push(TokenKind::Operator, "'".to_string(), line, column);
                }
                '\'' | '"' => self.string(c)?,
                '(' | '[' | '{' => {
                    self.bump();
                    self.depth += 1;
                    self.push(TokenKind::Punct, c.to_string(), line, column);
                }
                ')' | ']' | '}' => {
                    self.bump();
                    self.depth = self.depth.saturating_sub(1);
                    self.push(TokenKind::Punct, c.to_string(), line, column);
                }
                ',' | ';' => {
                    self.bump();
                    self.push(TokenKind::Punct, c.to_string(), line, column);
                }
                _ => self.operator(c)?,
            }
        }
        Ok(())
    }

    /// A quote is a transpose when it directly follows a value.
    fn is_transpose_context(&self) -> bool {
        let Some(prev) = self.tokens.last() else {
            return false;
        };
        let adjacent = self.last_code_end == Some((self.line, self.column));
        if !adjacent {
            return false;
        }
        match prev.kind {
            TokenKind::Identifier | TokenKind::Number => true,
            TokenKind::Punct => matches!(prev.text.as_str(), ")" | "]" | "}"),
            TokenKind::Operator => matches!(prev.text.as_str(), "'" | ".'"),
            TokenKind::Keyword => prev.text == "end",
            _ => false,
        }
    }

    fn at_line_start(&self) -> bool {
        self.tokens
            .last()
            .map_or(true, |t| t.kind == TokenKind::Newline)
    }

    fn rest_of_line(&self) -> String {
        self.chars[self.pos..]
            .iter()
            .take_while(|&&c| c != '\n')
            .collect()
    }

    fn comment(&mut self) -> Result<(), ParseError> {
        let (line, column) = (self.line, self.column);
        if self.at_line_start() && self.rest_of_line().trim_end() == "%{" {
            return self.block_comment(line, column);
        }

        let text = self.rest_of_line();
        for _ in 0..text.chars().count() {
            self.bump();
        }
        let text = text.trim_end_matches('\r').to_string();
        self.push(TokenKind::Comment, text, line, column);
        Ok(())
    }

    fn block_comment(&mut self, line: usize, column: usize) -> Result<(), ParseError> {
        let mut text = String::new();
        let mut depth = 0usize;
        loop {
            let current = self.rest_of_line();
            let trimmed = current.trim();
            if trimmed == "%{" {
                depth += 1;
            } else if trimmed == "%}" {
                depth -= 1;
            }
            for _ in 0..current.chars().count() {
                self.bump();
            }
            text.push_str(current.trim_end_matches('\r'));
            if depth == 0 {
                break;
            }
            if self.bump().is_none() {
                return Err(ParseError::new("unterminated block comment", line, column));
            }
            text.push('\n');
        }
        self.push(TokenKind::Comment, text, line, column);
        Ok(())
    }

    fn continuation(&mut self) {
        let (line, column) = (self.line, self.column);
        let text = self.rest_of_line();
        for _ in 0..text.chars().count() {
            self.bump();
        }
        self.push(
            TokenKind::Continuation,
            text.trim_end_matches('\r').to_string(),
            line,
            column,
        );
        // The line break belongs to the continuation, not to the statement.
        if self.peek(0) == Some('\n') {
            self.bump();
        }
    }

    fn word(&mut self) {
        let (line, column) = (self.line, self.column);
        let mut text = String::new();
        while let Some(c) = self.peek(0) {
            if c.is_ascii_alphanumeric() || c == '_' {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
        let is_keyword = KEYWORDS.contains(&text.as_str()) && !(text == "end" && self.depth > 0);
        let kind = if is_keyword {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        self.push(kind, text, line, column);
    }

    fn number(&mut self) {
        let (line, column) = (self.line, self.column);
        let mut text = String::new();
        let mut seen_dot = false;
        while let Some(c) = self.peek(0) {
            if c.is_ascii_digit() {
                text.push(c);
            } else if c == '.'
                && !seen_dot
                && !matches!(self.peek(1), Some('*' | '/' | '\\' | '^' | '\''))
                && !(self.peek(1) == Some('.') && self.peek(2) == Some('.'))
            {
                seen_dot = true;
                text.push(c);
            } else {
                break;
            }
            self.bump();
        }
        if matches!(self.peek(0), Some('e' | 'E')) {
            let sign = matches!(self.peek(1), Some('+' | '-'));
            let digit_at = if sign { 2 } else { 1 };
            if self.peek(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                for _ in 0..digit_at {
                    if let Some(c) = self.bump() {
                        text.push(c);
                    }
                }
                while let Some(c) = self.peek(0).filter(char::is_ascii_digit) {
                    text.push(c);
                    self.bump();
                }
            }
        }
        if let Some(c) = self.peek(0).filter(|c| matches!(*c, 'i' | 'j')) {
            if !self.peek(1).is_some_and(|n| n.is_ascii_alphanumeric() || n == '_') {
                text.push(c);
                self.bump();
            }
        }
        self.push(TokenKind::Number, text, line, column);
    }

    fn string(&mut self, quote: char) -> Result<(), ParseError> {
        let (line, column) = (self.line, self.column);
        let mut text = String::new();
        text.push(quote);
        self.bump();
        loop {
            match self.peek(0) {
                None | Some('\n') => {
                    return Err(ParseError::new("unterminated string literal", line, column));
                }
                Some(c) if c == quote => {
                    text.push(c);
                    self.bump();
                    if self.peek(0) == Some(quote) {
                        text.push(quote);
                        self.bump();
                    } else {
                        break;
                    }
                }
                Some(c) => {
                    text.push(c);
                    self.bump();
                }
            }
        }
        self.push(TokenKind::String, text, line, column);
        Ok(())
    }

    fn operator(&mut self, c: char) -> Result<(), ParseError> {
        let (line, column) = (self.line, self.column);
        if let Some(next) = self.peek(1) {
            let pair: String = [c, next].iter().collect();
            if TWO_CHAR_OPERATORS.contains(&pair.as_str()) {
                self.bump();
                self.bump();
                self.push(TokenKind::Operator, pair, line, column);
                return Ok(());
            }
        }
        if ONE_CHAR_OPERATORS.contains(c) {
            self.bump();
            self.push(TokenKind::Operator, c.to_string(), line, column);
            return Ok(());
        }
        Err(ParseError::new(
            format!("unexpected character '{c}'"),
            line,
            column,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<(TokenKind, String)> {
        tokenize(source)
            .expect("tokenizes")
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    fn texts(source: &str) -> Vec<String> {
        tokenize(source)
            .expect("tokenizes")
            .into_iter()
            .filter(|t| t.kind != TokenKind::Newline)
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn keywords_and_identifiers() {
        let toks = kinds("function y = f(x)\n");
        assert_eq!(toks[0], (TokenKind::Keyword, "function".into()));
        assert_eq!(toks[1], (TokenKind::Identifier, "y".into()));
        assert_eq!(toks[2], (TokenKind::Operator, "=".into()));
        assert_eq!(toks[3], (TokenKind::Identifier, "f".into()));
    }

    #[test]
    fn end_inside_brackets_is_identifier() {
        let toks = tokenize("x(end) = 1;\nend\n").expect("tokenizes");
        let ends: Vec<TokenKind> = toks
            .iter()
            .filter(|t| t.text == "end")
            .map(|t| t.kind)
            .collect();
        assert_eq!(ends, vec![TokenKind::Identifier, TokenKind::Keyword]);
    }

    #[test]
    fn transpose_versus_string() {
        let toks = kinds("a = b';\ndisp 'hi'\nc = x(1)';\n");
        assert!(toks.contains(&(TokenKind::Operator, "'".into())));
        assert!(toks.contains(&(TokenKind::String, "'hi'".into())));
        let transposes = toks
            .iter()
            .filter(|t| t == &&(TokenKind::Operator, "'".to_string()))
            .count();
        assert_eq!(transposes, 2);
    }

    #[test]
    fn doubled_quotes_escape() {
        assert_eq!(texts("s = 'it''s';"), vec!["s", "=", "'it''s'", ";"]);
        assert_eq!(texts("s = \"say \"\"hi\"\"\";"), vec!["s", "=", "\"say \"\"hi\"\"\"", ";"]);
    }

    #[test]
    fn comments_and_ok_markers() {
        let toks = tokenize("x = 1; %#ok<N002>\n% note\n").expect("tokenizes");
        let comments: Vec<&Token> = toks.iter().filter(|t| t.kind == TokenKind::Comment).collect();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].text, "%#ok<N002>");
        assert_eq!(comments[0].column, 8);
        assert_eq!(comments[1].line, 2);
    }

    #[test]
    fn block_comment_spans_lines() {
        let toks = tokenize("%{\nhidden = 1;\n%}\nx = 2;\n").expect("tokenizes");
        assert_eq!(toks[0].kind, TokenKind::Comment);
        assert_eq!(toks[0].text, "%{\nhidden = 1;\n%}");
        assert!(toks.iter().all(|t| t.text != "hidden"));
        let x = toks.iter().find(|t| t.text == "x").expect("x token");
        assert_eq!(x.line, 4);
    }

    #[test]
    fn continuation_swallows_newline() {
        let toks = tokenize("x = 1 + ... comment\n    2;\n").expect("tokenizes");
        let newlines = toks.iter().filter(|t| t.kind == TokenKind::Newline).count();
        assert_eq!(newlines, 1);
        assert!(toks.iter().any(|t| t.kind == TokenKind::Continuation));
    }

    #[test]
    fn numbers() {
        assert_eq!(texts("x = [1 2.5 .5 1e-3 3i 1.^2];"), vec![
            "x", "=", "[", "1", "2.5", ".5", "1e-3", "3i", "1", ".^", "2", "]", ";"
        ]);
    }

    #[test]
    fn columns_are_one_indexed() {
        let toks = tokenize("  y = 2;").expect("tokenizes");
        assert_eq!(toks[0].column, 3);
        assert_eq!(toks[0].line, 1);
    }

    #[test]
    fn errors_on_unterminated_string() {
        let err = tokenize("x = 'oops\n").expect_err("unterminated");
        assert_eq!(err.line, 1);
        assert_eq!(err.column, 5);
    }

    #[test]
    fn errors_on_unterminated_block_comment() {
        assert!(tokenize("%{\nnever closed\n").is_err());
    }

    #[test]
    fn errors_on_unknown_character() {
        let err = tokenize("x = $;").expect_err("bad char");
        assert!(err.message.contains('$'));
    }
}
