//! Tokenizer for the filter expression language.

use super::errors::{ParseError, ParseResult};

/// One lexical token
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Ident(String),
    Num(f64),
    Str(String),
    True,
    False,
    Null,
    LParen,
    RParen,
    Comma,
    Dot,
    Bang,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    AndAnd,
    OrOr,
    EqEq,
    NotEq,
    Gte,
    Lte,
    Gt,
    Lt,
}

impl Token {
    /// Human-readable token description for error messages
    pub(crate) fn describe(&self) -> String {
        match self {
            Token::Ident(name) => name.clone(),
            Token::Num(n) => n.to_string(),
            Token::Str(s) => format!("\"{s}\""),
            Token::True => "true".into(),
            Token::False => "false".into(),
            Token::Null => "null".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),
            Token::Comma => ",".into(),
            Token::Dot => ".".into(),
            Token::Bang => "!".into(),
            Token::Plus => "+".into(),
            Token::Minus => "-".into(),
            Token::Star => "*".into(),
            Token::Slash => "/".into(),
            Token::Percent => "%".into(),
            Token::AndAnd => "&&".into(),
            Token::OrOr => "||".into(),
            Token::EqEq => "==".into(),
            Token::NotEq => "!=".into(),
            Token::Gte => ">=".into(),
            Token::Lte => "<=".into(),
            Token::Gt => ">".into(),
            Token::Lt => "<".into(),
        }
    }
}

/// Tokenizes an expression string.
pub(crate) fn tokenize(src: &str) -> ParseResult<Vec<Token>> {
    let chars: Vec<char> = src.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let ch = chars[pos];

        if ch.is_whitespace() {
            pos += 1;
            continue;
        }

        if ch.is_ascii_digit() || (ch == '.' && peek_digit(&chars, pos + 1)) {
            let start = pos;
            while pos < chars.len() && (chars[pos].is_ascii_digit() || chars[pos] == '.') {
                pos += 1;
            }
            let text: String = chars[start..pos].iter().collect();
            let num = text
                .parse::<f64>()
                .map_err(|_| ParseError::new("malformed number", &text))?;
            tokens.push(Token::Num(num));
            continue;
        }

        if ch.is_alphabetic() || ch == '_' {
            let start = pos;
            while pos < chars.len() && (chars[pos].is_alphanumeric() || chars[pos] == '_') {
                pos += 1;
            }
            let name: String = chars[start..pos].iter().collect();
            tokens.push(match name.as_str() {
                "true" => Token::True,
                "false" => Token::False,
                "null" => Token::Null,
                _ => Token::Ident(name),
            });
            continue;
        }

        if ch == '"' || ch == '\'' {
            let (token, next) = lex_string(&chars, pos, ch)?;
            tokens.push(token);
            pos = next;
            continue;
        }

        // Two-character operators first
        if pos + 1 < chars.len() {
            let pair: String = chars[pos..pos + 2].iter().collect();
            let two = match pair.as_str() {
                "&&" => Some(Token::AndAnd),
                "||" => Some(Token::OrOr),
                "==" => Some(Token::EqEq),
                "!=" => Some(Token::NotEq),
                ">=" => Some(Token::Gte),
                "<=" => Some(Token::Lte),
                _ => None,
            };
            if let Some(token) = two {
                tokens.push(token);
                pos += 2;
                continue;
            }
        }

        let single = match ch {
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            ',' => Some(Token::Comma),
            '.' => Some(Token::Dot),
            '!' => Some(Token::Bang),
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '%' => Some(Token::Percent),
            '>' => Some(Token::Gt),
            '<' => Some(Token::Lt),
            _ => None,
        };

        match single {
            Some(token) => {
                tokens.push(token);
                pos += 1;
            }
            None => {
                let rest: String = chars[pos..].iter().take(12).collect();
                return Err(ParseError::new("unexpected character", rest));
            }
        }
    }

    Ok(tokens)
}

fn peek_digit(chars: &[char], pos: usize) -> bool {
    chars.get(pos).is_some_and(|c| c.is_ascii_digit())
}

fn lex_string(chars: &[char], start: usize, quote: char) -> ParseResult<(Token, usize)> {
    let mut out = String::new();
    let mut pos = start + 1;

    while pos < chars.len() {
        let ch = chars[pos];
        if ch == quote {
            return Ok((Token::Str(out), pos + 1));
        }
        if ch == '\\' {
            pos += 1;
            let escaped = chars.get(pos).copied().ok_or_else(|| {
                ParseError::new("unterminated string", collect_fragment(chars, start))
            })?;
            out.push(match escaped {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                other => other,
            });
            pos += 1;
            continue;
        }
        out.push(ch);
        pos += 1;
    }

    Err(ParseError::new(
        "unterminated string",
        collect_fragment(chars, start),
    ))
}

fn collect_fragment(chars: &[char], start: usize) -> String {
    chars[start..].iter().take(12).collect()
}
