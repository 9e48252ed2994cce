//! Tokenizer for path expressions and closure bodies.

use super::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),
    Dollar,
    Dot,
    Comma,
    LBracket,
    RBracket,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Lt,
    Le,
    Gt,
    Ge,
    EqEq,
    NotEq,
    AndAnd,
    OrOr,
    Bang,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
}

impl TokenKind {
    pub(crate) fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("identifier `{name}`"),
            TokenKind::Int(int) => format!("number `{int}`"),
            TokenKind::Float(float) => format!("number `{float}`"),
            TokenKind::Str(text) => format!("string '{text}'"),
            other => format!("`{}`", other.symbol()),
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            TokenKind::Dollar => "$",
            TokenKind::Dot => ".",
            TokenKind::Comma => ",",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Lt => "<",
            TokenKind::Le => "<=",
            TokenKind::Gt => ">",
            TokenKind::Ge => ">=",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::AndAnd => "&&",
            TokenKind::OrOr => "||",
            TokenKind::Bang => "!",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Ident(_) | TokenKind::Int(_) | TokenKind::Float(_) | TokenKind::Str(_) => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character.
    pub offset: usize,
}

pub(crate) fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(offset, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        let kind = if ch.is_alphabetic() || ch == '_' {
            let mut ident = String::new();
            while let Some(&(_, c)) = chars.peek() {
                if !(c.is_alphanumeric() || c == '_') {
                    break;
                }
                ident.push(c);
                chars.next();
            }
            TokenKind::Ident(ident)
        } else if ch.is_ascii_digit() {
            lex_number(source, offset, &mut chars)?
        } else if ch == '\'' || ch == '"' {
            chars.next();
            let mut text = String::new();
            let mut closed = false;
            while let Some((_, c)) = chars.next() {
                match c {
                    '\\' => match chars.next() {
                        Some((_, escaped)) => text.push(escaped),
                        None => break,
                    },
                    c if c == ch => {
                        closed = true;
                        break;
                    }
                    c => text.push(c),
                }
            }
            if !closed {
                return Err(ParseError::UnterminatedString { offset });
            }
            TokenKind::Str(text)
        } else {
            chars.next();
            let next = chars.peek().map(|&(_, c)| c);
            let (kind, pair) = match (ch, next) {
                ('<', Some('=')) => (TokenKind::Le, true),
                ('>', Some('=')) => (TokenKind::Ge, true),
                ('=', Some('=')) => (TokenKind::EqEq, true),
                ('!', Some('=')) => (TokenKind::NotEq, true),
                ('&', Some('&')) => (TokenKind::AndAnd, true),
                ('|', Some('|')) => (TokenKind::OrOr, true),
                ('<', _) => (TokenKind::Lt, false),
                ('>', _) => (TokenKind::Gt, false),
                ('!', _) => (TokenKind::Bang, false),
                ('$', _) => (TokenKind::Dollar, false),
                ('.', _) => (TokenKind::Dot, false),
                (',', _) => (TokenKind::Comma, false),
                ('[', _) => (TokenKind::LBracket, false),
                (']', _) => (TokenKind::RBracket, false),
                ('(', _) => (TokenKind::LParen, false),
                (')', _) => (TokenKind::RParen, false),
                ('{', _) => (TokenKind::LBrace, false),
                ('}', _) => (TokenKind::RBrace, false),
                ('+', _) => (TokenKind::Plus, false),
                ('-', _) => (TokenKind::Minus, false),
                ('*', _) => (TokenKind::Star, false),
                ('/', _) => (TokenKind::Slash, false),
                ('%', _) => (TokenKind::Percent, false),
                _ => return Err(ParseError::UnexpectedChar { offset, found: ch }),
            };
            if pair {
                chars.next();
            }
            kind
        };

        tokens.push(Token { kind, offset });
    }

    Ok(tokens)
}

/// Digits with an optional fraction. A `.` only belongs to the number when
/// a digit follows it, so `it.age*2.0` and `list[2].name` both lex cleanly.
fn lex_number(
    source: &str,
    start: usize,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
) -> Result<TokenKind, ParseError> {
    let mut end = start;
    let mut is_float = false;

    while let Some(&(idx, c)) = chars.peek() {
        if c.is_ascii_digit() {
            end = idx + 1;
            chars.next();
        } else if c == '.' && !is_float {
            let after = source[idx + 1..].chars().next();
            if !after.is_some_and(|a| a.is_ascii_digit()) {
                break;
            }
            is_float = true;
            end = idx + 1;
            chars.next();
        } else {
            break;
        }
    }

    let text = &source[start..end];
    let invalid = || ParseError::InvalidNumber {
        offset: start,
        text: text.to_string(),
    };
    if is_float {
        text.parse().map(TokenKind::Float).map_err(|_| invalid())
    } else {
        text.parse().map(TokenKind::Int).map_err(|_| invalid())
    }
}
