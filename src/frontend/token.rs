//! Token definitions for Ago

use crate::utils::Span;

/// A token produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn eof(span: Span) -> Self {
        Self { kind: TokenKind::Eof, span }
    }
}

/// Token kinds
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ============ Keywords ============
    /// des (function / lambda declaration)
    Des,
    /// si (if)
    Si,
    /// aluid (elif / else)
    Aluid,
    /// dum (while)
    Dum,
    /// pro (for)
    Pro,
    /// in (for-iteration and membership)
    In,
    /// redeo (return)
    Redeo,
    /// frio (break)
    Frio,
    /// pergo (continue)
    Pergo,
    /// omitto (pass)
    Omitto,
    /// verum (true)
    Verum,
    /// falsus (false)
    Falsus,
    /// inanis (null)
    Inanis,
    /// et (logical and)
    Et,
    /// vel (logical or)
    Vel,
    /// non (logical not)
    Non,
    /// est (type-identity test)
    Est,
    /// id (sole lambda parameter)
    Id,

    // ============ Literals ============
    IntLit(i64),
    FloatLit(f64),
    StrLit(String),
    /// Roman numeral, already evaluated (XII lexes as 12)
    RomanLit(i64),
    Ident(String),

    // ============ Operators ============
    /// :=
    ColonAssign,
    /// =
    Assign,
    /// ==
    EqEq,
    /// !=
    NotEq,
    /// <=
    Le,
    /// >=
    Ge,
    /// <
    Lt,
    /// >
    Gt,
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// &
    Amp,
    /// |
    Pipe,
    /// ^
    Caret,
    /// .. (inclusive range)
    DotDot,
    /// .< (exclusive range)
    DotLess,
    /// ?: (elvis)
    Elvis,

    // ============ Punctuation ============
    Dot,
    Comma,
    Colon,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,

    /// Statement separator
    Newline,
    Eof,
}

impl TokenKind {
    /// Map a word to its keyword kind, if it is one
    pub fn keyword_from_str(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "des" => TokenKind::Des,
            "si" => TokenKind::Si,
            "aluid" => TokenKind::Aluid,
            "dum" => TokenKind::Dum,
            "pro" => TokenKind::Pro,
            "in" => TokenKind::In,
            "redeo" => TokenKind::Redeo,
            "frio" => TokenKind::Frio,
            "pergo" => TokenKind::Pergo,
            "omitto" => TokenKind::Omitto,
            "verum" => TokenKind::Verum,
            "falsus" => TokenKind::Falsus,
            "inanis" => TokenKind::Inanis,
            "et" => TokenKind::Et,
            "vel" => TokenKind::Vel,
            "non" => TokenKind::Non,
            "est" => TokenKind::Est,
            "id" => TokenKind::Id,
            _ => return None,
        };
        Some(kind)
    }

    /// Short human-readable name for error messages
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("identifier '{}'", name),
            TokenKind::IntLit(v) => format!("integer {}", v),
            TokenKind::FloatLit(v) => format!("float {}", v),
            TokenKind::StrLit(_) => "string literal".to_string(),
            TokenKind::RomanLit(v) => format!("roman numeral {}", v),
            TokenKind::Newline => "newline".to_string(),
            TokenKind::Eof => "end of input".to_string(),
            other => format!("{:?}", other),
        }
    }
}
