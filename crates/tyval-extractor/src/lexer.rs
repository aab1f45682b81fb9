//! A small tokenizer for the type-expression grammar (spec §4.5). Not a
//! TypeScript scanner — it recognizes exactly the subset of syntax the
//! extractor is allowed to lower.

use crate::error::ExtractError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Str(String),
    Num(f64),
    True,
    False,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    LAngle,
    RAngle,
    Pipe,
    Amp,
    Comma,
    Colon,
    Question,
    Semi,
    Eq,
    Eof,
}

/// One token plus the 1-based source line it started on, for error
/// messages.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub line: usize,
}

pub fn lex(file: &str, src: &str) -> Result<Vec<Spanned>, ExtractError> {
    let mut out = Vec::new();
    let bytes: Vec<char> = src.chars().collect();
    let mut i = 0usize;
    let mut line = 1usize;
    while i < bytes.len() {
        let c = bytes[i];
        match c {
            '\n' => {
                line += 1;
                i += 1;
            }
            c if c.is_whitespace() => i += 1,
            '/' if bytes.get(i + 1) == Some(&'/') => {
                while i < bytes.len() && bytes[i] != '\n' {
                    i += 1;
                }
            }
            '/' if bytes.get(i + 1) == Some(&'*') => {
                i += 2;
                while i < bytes.len() && !(bytes[i] == '*' && bytes.get(i + 1) == Some(&'/')) {
                    if bytes[i] == '\n' {
                        line += 1;
                    }
                    i += 1;
                }
                i += 2;
            }
            '{' => {
                out.push(Spanned { token: Token::LBrace, line });
                i += 1;
            }
            '}' => {
                out.push(Spanned { token: Token::RBrace, line });
                i += 1;
            }
            '[' => {
                out.push(Spanned { token: Token::LBracket, line });
                i += 1;
            }
            ']' => {
                out.push(Spanned { token: Token::RBracket, line });
                i += 1;
            }
            '(' => {
                out.push(Spanned { token: Token::LParen, line });
                i += 1;
            }
            ')' => {
                out.push(Spanned { token: Token::RParen, line });
                i += 1;
            }
            '<' => {
                out.push(Spanned { token: Token::LAngle, line });
                i += 1;
            }
            '>' => {
                out.push(Spanned { token: Token::RAngle, line });
                i += 1;
            }
            '|' => {
                out.push(Spanned { token: Token::Pipe, line });
                i += 1;
            }
            '&' => {
                out.push(Spanned { token: Token::Amp, line });
                i += 1;
            }
            ',' => {
                out.push(Spanned { token: Token::Comma, line });
                i += 1;
            }
            ':' => {
                out.push(Spanned { token: Token::Colon, line });
                i += 1;
            }
            '?' => {
                out.push(Spanned { token: Token::Question, line });
                i += 1;
            }
            ';' => {
                out.push(Spanned { token: Token::Semi, line });
                i += 1;
            }
            '=' => {
                out.push(Spanned { token: Token::Eq, line });
                i += 1;
            }
            '\'' | '"' => {
                let quote = c;
                let start_line = line;
                i += 1;
                let mut s = String::new();
                let mut closed = false;
                while i < bytes.len() {
                    if bytes[i] == quote {
                        closed = true;
                        i += 1;
                        break;
                    }
                    if bytes[i] == '\n' {
                        break;
                    }
                    s.push(bytes[i]);
                    i += 1;
                }
                if !closed {
                    return Err(ExtractError::UnterminatedString(file.to_string(), start_line));
                }
                out.push(Spanned { token: Token::Str(s), line: start_line });
            }
            c if c.is_ascii_digit() || (c == '-' && bytes.get(i + 1).is_some_and(|d| d.is_ascii_digit())) => {
                let start = i;
                if c == '-' {
                    i += 1;
                }
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == '.') {
                    i += 1;
                }
                let text: String = bytes[start..i].iter().collect();
                let n: f64 = text.parse().map_err(|_| {
                    ExtractError::UnexpectedToken(file.to_string(), line, text.clone())
                })?;
                out.push(Spanned { token: Token::Num(n), line });
            }
            c if c.is_alphabetic() || c == '_' || c == '$' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_alphanumeric() || bytes[i] == '_' || bytes[i] == '$') {
                    i += 1;
                }
                let text: String = bytes[start..i].iter().collect();
                let token = match text.as_str() {
                    "true" => Token::True,
                    "false" => Token::False,
                    _ => Token::Ident(text),
                };
                out.push(Spanned { token, line });
            }
            other => {
                return Err(ExtractError::UnexpectedToken(
                    file.to_string(),
                    line,
                    other.to_string(),
                ));
            }
        }
    }
    out.push(Spanned { token: Token::Eof, line });
    Ok(out)
}
