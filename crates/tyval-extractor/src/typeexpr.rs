//! The `TypeExpr` grammar (spec §4.5) and its recursive-descent parser over
//! a token stream produced by [`crate::lexer`].

use crate::error::ExtractError;
use crate::lexer::{Spanned, Token};

#[derive(Debug, Clone)]
pub enum TypeExpr {
    Ident(String),
    StringLit(String),
    NumberLit(f64),
    BooleanLit(bool),
    Array(Box<TypeExpr>),
    Union(Vec<TypeExpr>),
    Intersection(Vec<TypeExpr>),
    /// `Name<args...>` — `Array<T>`, `Partial<T>`, `Record<K, V>`, `Omit<T, K>`.
    Generic(String, Vec<TypeExpr>),
    Keyof(Box<TypeExpr>),
    /// `readonly T` — transparent; the inner type is kept, `readonly` dropped.
    Readonly(Box<TypeExpr>),
    /// `{ [k: string]: V }`.
    IndexSignature(Box<TypeExpr>),
    /// `{ field[?]: T; ... }` — used only for the branded-primitive pattern.
    ObjectLiteral(Vec<(String, bool, TypeExpr)>),
    Paren(Box<TypeExpr>),
}

pub struct Parser<'a> {
    file: &'a str,
    tokens: &'a [Spanned],
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(file: &'a str, tokens: &'a [Spanned]) -> Self {
        Parser { file, tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos].token
    }

    fn line(&self) -> usize {
        self.tokens[self.pos].line
    }

    fn advance(&mut self) -> Token {
        let t = self.tokens[self.pos].token.clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ExtractError> {
        if self.peek() == expected {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn unexpected(&self) -> ExtractError {
        ExtractError::UnexpectedToken(self.file.to_string(), self.line(), format!("{:?}", self.peek()))
    }

    pub fn at_eof(&self) -> bool {
        matches!(self.peek(), Token::Eof)
    }

    /// Entry point: `union`.
    pub fn parse_type(&mut self) -> Result<TypeExpr, ExtractError> {
        self.parse_union()
    }

    fn parse_union(&mut self) -> Result<TypeExpr, ExtractError> {
        // A leading `|` (common in multi-line union formatting) is tolerated.
        if matches!(self.peek(), Token::Pipe) {
            self.advance();
        }
        let mut members = vec![self.parse_intersection()?];
        while matches!(self.peek(), Token::Pipe) {
            self.advance();
            members.push(self.parse_intersection()?);
        }
        if members.len() == 1 {
            Ok(members.pop().unwrap())
        } else {
            Ok(TypeExpr::Union(members))
        }
    }

    fn parse_intersection(&mut self) -> Result<TypeExpr, ExtractError> {
        let mut members = vec![self.parse_postfix()?];
        while matches!(self.peek(), Token::Amp) {
            self.advance();
            members.push(self.parse_postfix()?);
        }
        if members.len() == 1 {
            Ok(members.pop().unwrap())
        } else {
            Ok(TypeExpr::Intersection(members))
        }
    }

    fn parse_postfix(&mut self) -> Result<TypeExpr, ExtractError> {
        let mut expr = self.parse_primary()?;
        while matches!(self.peek(), Token::LBracket) {
            self.advance();
            self.expect(&Token::RBracket)?;
            expr = TypeExpr::Array(Box::new(expr));
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<TypeExpr, ExtractError> {
        match self.peek().clone() {
            Token::Str(s) => {
                self.advance();
                Ok(TypeExpr::StringLit(s))
            }
            Token::Num(n) => {
                self.advance();
                Ok(TypeExpr::NumberLit(n))
            }
            Token::True => {
                self.advance();
                Ok(TypeExpr::BooleanLit(true))
            }
            Token::False => {
                self.advance();
                Ok(TypeExpr::BooleanLit(false))
            }
            Token::LParen => {
                self.advance();
                let inner = self.parse_union()?;
                self.expect(&Token::RParen)?;
                Ok(TypeExpr::Paren(Box::new(inner)))
            }
            Token::LBrace => self.parse_object_type(),
            Token::Ident(name) => {
                self.advance();
                match name.as_str() {
                    "keyof" => Ok(TypeExpr::Keyof(Box::new(self.parse_postfix()?))),
                    "readonly" => Ok(TypeExpr::Readonly(Box::new(self.parse_postfix()?))),
                    "any" => Err(ExtractError::AnyNotSupported(self.file.to_string())),
                    _ if matches!(self.peek(), Token::LAngle) => {
                        self.advance();
                        let mut args = vec![self.parse_union()?];
                        while matches!(self.peek(), Token::Comma) {
                            self.advance();
                            args.push(self.parse_union()?);
                        }
                        self.expect(&Token::RAngle)?;
                        Ok(TypeExpr::Generic(name, args))
                    }
                    _ => Ok(TypeExpr::Ident(name)),
                }
            }
            _ => Err(self.unexpected()),
        }
    }

    /// `{ [k: string]: V }` (index signature) or `{ a: T; b?: U }` (object
    /// literal, only meaningful as the right-hand side of a branded
    /// primitive intersection).
    fn parse_object_type(&mut self) -> Result<TypeExpr, ExtractError> {
        self.expect(&Token::LBrace)?;
        if matches!(self.peek(), Token::LBracket) {
            self.advance();
            // `k: string` — key name is discarded, key type is assumed string.
            let Token::Ident(_) = self.peek().clone() else {
                return Err(self.unexpected());
            };
            self.advance();
            self.expect(&Token::Colon)?;
            let _key_type = self.parse_union()?;
            self.expect(&Token::RBracket)?;
            self.expect(&Token::Colon)?;
            let value_type = self.parse_union()?;
            self.expect(&Token::RBrace)?;
            return Ok(TypeExpr::IndexSignature(Box::new(value_type)));
        }
        let mut fields = Vec::new();
        while !matches!(self.peek(), Token::RBrace) {
            let Token::Ident(field_name) = self.peek().clone() else {
                return Err(self.unexpected());
            };
            self.advance();
            let optional = matches!(self.peek(), Token::Question);
            if optional {
                self.advance();
            }
            self.expect(&Token::Colon)?;
            let field_type = self.parse_union()?;
            fields.push((field_name, optional, field_type));
            if matches!(self.peek(), Token::Comma | Token::Semi) {
                self.advance();
            }
        }
        self.expect(&Token::RBrace)?;
        Ok(TypeExpr::ObjectLiteral(fields))
    }
}
