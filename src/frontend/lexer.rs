//! Lexer for Ago
//!
//! Converts source code into a stream of tokens. Newlines are significant
//! (statement separators) and survive as tokens; `#` starts a line comment.

use crate::frontend::token::{Token, TokenKind};
use crate::utils::{Error, Result, Span};

/// The lexer state
pub struct Lexer {
    /// Source code as chars
    source: Vec<char>,
    /// Current position in source
    pos: usize,
    /// Start position of current token
    start: usize,
    /// 1-based line of `start`
    line: usize,
    /// 1-based column of `start`
    col: usize,
    /// Line/column cursor at `pos`
    cursor_line: usize,
    cursor_col: usize,
}

impl Lexer {
    /// Create a new lexer for the given source code
    pub fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            pos: 0,
            start: 0,
            line: 1,
            col: 1,
            cursor_line: 1,
            cursor_col: 1,
        }
    }

    /// Tokenize the whole input
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.source.get(self.pos + 1).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if let Some(c) = c {
            self.pos += 1;
            if c == '\n' {
                self.cursor_line += 1;
                self.cursor_col = 1;
            } else {
                self.cursor_col += 1;
            }
        }
        c
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn make_span(&self) -> Span {
        Span::new(self.start, self.pos, self.line, self.col)
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.make_span())
    }

    /// Skip horizontal whitespace and comments (newlines are tokens)
    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\r' => {
                    self.advance();
                }
                '#' => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn next_token(&mut self) -> Result<Token> {
        self.skip_trivia();
        self.start = self.pos;
        self.line = self.cursor_line;
        self.col = self.cursor_col;

        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(Token::eof(self.make_span())),
        };

        if c == '\n' {
            self.advance();
            return Ok(self.make_token(TokenKind::Newline));
        }
        if c.is_ascii_digit() {
            return Ok(self.read_number());
        }
        if c.is_alphabetic() || c == '_' {
            return Ok(self.read_word());
        }
        if c == '"' {
            return self.read_string();
        }

        self.advance();
        let kind = match c {
            ':' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::ColonAssign
                } else {
                    TokenKind::Colon
                }
            }
            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::EqEq
                } else {
                    TokenKind::Assign
                }
            }
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::NotEq
                } else {
                    return Err(Error::UnexpectedChar { ch: c, span: self.make_span() });
                }
            }
            '<' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::Le
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::Ge
                } else {
                    TokenKind::Gt
                }
            }
            '?' => {
                if self.peek() == Some(':') {
                    self.advance();
                    TokenKind::Elvis
                } else {
                    return Err(Error::UnexpectedChar { ch: c, span: self.make_span() });
                }
            }
            '.' => {
                if self.peek() == Some('.') {
                    self.advance();
                    TokenKind::DotDot
                } else if self.peek() == Some('<') {
                    self.advance();
                    TokenKind::DotLess
                } else {
                    TokenKind::Dot
                }
            }
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '&' => TokenKind::Amp,
            '|' => TokenKind::Pipe,
            '^' => TokenKind::Caret,
            ',' => TokenKind::Comma,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            _ => return Err(Error::UnexpectedChar { ch: c, span: self.make_span() }),
        };
        Ok(self.make_token(kind))
    }

    /// Read a number literal (integer or float)
    fn read_number(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        let mut is_float = false;
        // A '.' only continues the number when a digit follows, so that
        // `1..5` and `1.dici()` lex as int + operator
        if self.peek() == Some('.') && self.peek_next().map_or(false, |c| c.is_ascii_digit()) {
            is_float = true;
            self.advance();
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        let text: String = self.source[self.start..self.pos].iter().collect();
        if is_float {
            self.make_token(TokenKind::FloatLit(text.parse().unwrap_or(0.0)))
        } else {
            self.make_token(TokenKind::IntLit(text.parse().unwrap_or(0)))
        }
    }

    /// Read an identifier, keyword, or Roman numeral
    fn read_word(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let text: String = self.source[self.start..self.pos].iter().collect();

        if let Some(kind) = TokenKind::keyword_from_str(&text) {
            return self.make_token(kind);
        }
        if let Some(value) = roman_value(&text) {
            return self.make_token(TokenKind::RomanLit(value));
        }
        self.make_token(TokenKind::Ident(text))
    }

    /// Read a string literal. Only `\n \t \r \\ \"` escapes are valid and
    /// a raw newline terminates the literal with an error.
    fn read_string(&mut self) -> Result<Token> {
        self.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(Error::UnterminatedString { span: self.make_span() });
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    let escaped = match self.peek() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('\\') => '\\',
                        Some('"') => '"',
                        Some(other) => {
                            return Err(Error::InvalidEscape {
                                ch: other,
                                span: self.make_span(),
                            });
                        }
                        None => {
                            return Err(Error::UnterminatedString { span: self.make_span() });
                        }
                    };
                    self.advance();
                    value.push(escaped);
                }
                Some(c) => {
                    self.advance();
                    value.push(c);
                }
            }
        }
        Ok(self.make_token(TokenKind::StrLit(value)))
    }
}

/// Evaluate a word as a Roman numeral. `None` if any character is not a
/// Roman digit.
fn roman_value(word: &str) -> Option<i64> {
    fn digit(c: char) -> Option<i64> {
        match c {
            'I' => Some(1),
            'V' => Some(5),
            'X' => Some(10),
            'L' => Some(50),
            'C' => Some(100),
            'D' => Some(500),
            'M' => Some(1000),
            _ => None,
        }
    }

    if word.is_empty() {
        return None;
    }
    let digits: Option<Vec<i64>> = word.chars().map(digit).collect();
    let digits = digits?;
    let mut total = 0;
    for (i, &d) in digits.iter().enumerate() {
        if digits.get(i + 1).map_or(false, |&next| next > d) {
            total -= d;
        } else {
            total += d;
        }
    }
    Some(total)
}
