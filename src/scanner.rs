use std::str::CharIndices;

use itertools::peek_nth;
use itertools::PeekNth;
use tracing::{debug, instrument, trace};

use crate::error::{LexicalError, Reporter};
use crate::lang::{keyword, Literal, Token, TokenKind};

const UNTERMINATED_STRING: &str = "Unterminated string.";

/// Scanner turns source text into the flat token sequence the parser reads.
/// Lexical errors are reported and skipped, so one pass finds all of them
/// and the returned sequence always ends with a single `Eof` token.
///
/// `start` and `current` are byte offsets into `source`.
pub struct Scanner<'a> {
    source: &'a str,
    chars: PeekNth<CharIndices<'a>>,
    start: usize,
    current: usize,
    line: usize,
    tokens: Vec<Token>,
    errors: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: peek_nth(source.char_indices()),
            start: 0,
            current: 0,
            line: 1,
            tokens: vec![],
            errors: 0,
        }
    }

    /// Scans everything and hands back either the tokens or every error found.
    pub fn scan(self) -> Result<Vec<Token>, Vec<LexicalError>> {
        let mut errors: Vec<LexicalError> = vec![];
        let tokens = self.scan_tokens(&mut errors);

        if errors.is_empty() {
            Ok(tokens)
        } else {
            Err(errors)
        }
    }

    /// Scans everything, sending each lexical error to `reporter`.
    /// The tokens that could be scanned are returned regardless.
    #[instrument(skip_all, fields(bytes = self.source.len()))]
    pub fn scan_tokens<R: Reporter>(mut self, reporter: &mut R) -> Vec<Token> {
        self.scan_source(reporter);

        debug!(
            tokens = self.tokens.len(),
            errors = self.errors,
            lines = self.line,
            "scan finished"
        );
        self.tokens
    }

    fn scan_source<R: Reporter>(&mut self, reporter: &mut R) {
        while let Some(c) = self.advance() {
            self.scan_token(c, reporter);
            self.start = self.current;
        }
        self.tokens.push(Token::eof(self.line));
    }

    fn report<R: Reporter>(&mut self, reporter: &mut R, message: &str) {
        self.errors += 1;
        reporter.error(self.line, message);
    }

    fn scan_token<R: Reporter>(&mut self, c: char, reporter: &mut R) {
        match c {
            '(' => self.add_token(TokenKind::LeftParen),
            ')' => self.add_token(TokenKind::RightParen),
            '{' => self.add_token(TokenKind::LeftBrace),
            '}' => self.add_token(TokenKind::RightBrace),
            ',' => self.add_token(TokenKind::Comma),
            '.' => self.add_token(TokenKind::Dot),
            '-' => self.add_token(TokenKind::Minus),
            '+' => self.add_token(TokenKind::Plus),
            ';' => self.add_token(TokenKind::Semicolon),
            '*' => self.add_token(TokenKind::Star),
            '!' if self.advance_if_match('=') => self.add_token(TokenKind::BangEqual),
            '!' => self.add_token(TokenKind::Bang),
            '=' if self.advance_if_match('=') => self.add_token(TokenKind::EqualEqual),
            '=' => self.add_token(TokenKind::Equal),
            '<' if self.advance_if_match('=') => self.add_token(TokenKind::LessEqual),
            '<' => self.add_token(TokenKind::Less),
            '>' if self.advance_if_match('=') => self.add_token(TokenKind::GreaterEqual),
            '>' => self.add_token(TokenKind::Greater),
            '/' if self.advance_if_match('/') => {
                // the comment is valid until the end of the line,
                // the newline itself is left for the line counter.
                self.advance_while(|c| c != '\n');
            }
            '/' => self.add_token(TokenKind::Slash),
            ' ' | '\r' | '\t' => {}
            '\n' => self.line += 1,
            '"' => self.string(reporter),
            c if c.is_ascii_digit() => self.number(reporter),
            c if is_alpha(c) => self.identifier(),
            c => self.report(reporter, &format!("Unexpected character {c}")),
        }
    }

    fn string<R: Reporter>(&mut self, reporter: &mut R) {
        while let Some(c) = self.peek() {
            if c == '"' {
                break;
            }
            if c == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        // closing quote, or nothing left.
        if self.advance().is_none() {
            self.report(reporter, UNTERMINATED_STRING);
            return;
        }

        let value = &self.source[self.start + 1..self.current - 1];
        self.add_literal(TokenKind::String, Literal::String(value.to_string()));
    }

    fn number<R: Reporter>(&mut self, reporter: &mut R) {
        self.advance_while(|c| c.is_ascii_digit());

        // a dot only belongs to the number when a digit follows it
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.advance_while(|c| c.is_ascii_digit());
        }

        let text = self.lexeme();
        match text.parse::<f64>() {
            Ok(n) => self.add_literal(TokenKind::Number, Literal::Number(n)),
            Err(e) => self.report(reporter, &format!("Invalid number {text}: {e}")),
        }
    }

    fn identifier(&mut self) {
        self.advance_while(|c| is_alpha(c) || c.is_ascii_digit());

        let kind = keyword(self.lexeme()).unwrap_or(TokenKind::Identifier);
        self.add_token(kind);
    }

    fn lexeme(&self) -> &'a str {
        &self.source[self.start..self.current]
    }

    fn add_token(&mut self, kind: TokenKind) {
        self.add_literal(kind, Literal::Null);
    }

    fn add_literal(&mut self, kind: TokenKind, literal: Literal) {
        let token = Token::new(kind, self.lexeme(), literal, self.line);
        trace!(%token, line = self.line, "token");
        self.tokens.push(token);
    }

    /// consumes the next char, `None` once the source is exhausted.
    fn advance(&mut self) -> Option<char> {
        let (offset, c) = self.chars.next()?;
        self.current = offset + c.len_utf8();
        Some(c)
    }

    // only consumes char if it matches the expected value.
    fn advance_if_match(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
    }

    // peek the next char without consuming it.
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn peek_next(&mut self) -> Option<char> {
        self.chars.peek_nth(1).map(|&(_, c)| c)
    }
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}
