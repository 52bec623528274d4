//! Recursive-descent parser over declaration tokens.

use super::lexer::{Token, TokenKind, tokenize};
use super::{DeclError, Declaration};
use crate::{BaseType, DataType, Param, Reference, Signature};

pub(super) struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'src> Parser<'src> {
    pub(super) fn new(source: &'src str) -> Result<Self, DeclError> {
        Ok(Self {
            source,
            tokens: tokenize(source)?,
            pos: 0,
        })
    }

    // ==========================================================================
    // Token access
    // ==========================================================================

    fn peek(&self) -> Option<&TokenKind> {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + n).map(|t| &t.kind)
    }

    fn at(&self, kind: &TokenKind) -> bool {
        self.peek() == Some(kind)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, word: &str) -> bool {
        match self.peek() {
            Some(TokenKind::Ident(ident)) if ident == word => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<(), DeclError> {
        if self.eat(&kind) {
            Ok(())
        } else {
            Err(self.error(format!("expected {what}")))
        }
    }

    fn error(&self, message: impl Into<String>) -> DeclError {
        let offset = self
            .tokens
            .get(self.pos)
            .map(|t| t.start)
            .unwrap_or(self.source.len());
        DeclError {
            offset,
            message: message.into(),
        }
    }

    pub(super) fn expect_end(&self) -> Result<(), DeclError> {
        if self.pos < self.tokens.len() {
            Err(self.error("unexpected trailing input"))
        } else {
            Ok(())
        }
    }

    // ==========================================================================
    // Grammar
    // ==========================================================================

    fn ident(&mut self, what: &str) -> Result<String, DeclError> {
        match self.peek() {
            Some(TokenKind::Ident(ident)) if ident != "const" => {
                let ident = ident.clone();
                self.pos += 1;
                Ok(ident)
            }
            _ => Err(self.error(format!("expected {what}"))),
        }
    }

    /// `a::b::c`
    fn path(&mut self) -> Result<String, DeclError> {
        let mut path = self.ident("a name")?;
        while self.at(&TokenKind::ColonColon)
            && matches!(self.peek_nth(1), Some(TokenKind::Ident(_)))
        {
            self.pos += 1;
            path.push_str("::");
            path.push_str(&self.ident("a name")?);
        }
        Ok(path)
    }

    pub(super) fn data_type(&mut self) -> Result<DataType, DeclError> {
        let mut is_const = self.eat_keyword("const");

        let base = if self.eat_keyword("unsigned") {
            self.eat_keyword("int");
            BaseType::UInt32
        } else {
            let path = self.path()?;
            if self.eat(&TokenKind::Lt) {
                let mut args = vec![self.data_type()?];
                while self.eat(&TokenKind::Comma) {
                    args.push(self.data_type()?);
                }
                self.expect(TokenKind::Gt, "'>'")?;
                match (path.as_str(), args.len()) {
                    ("std::vector", 1) => {
                        let element = args.remove(0);
                        BaseType::Sequence(Box::new(element))
                    }
                    _ => {
                        return Err(self.error(format!("unsupported template '{path}'")));
                    }
                }
            } else {
                BaseType::from_native_name(&path).unwrap_or(BaseType::Named(path))
            }
        };

        // east const: `Point const&`
        if self.eat_keyword("const") {
            is_const = true;
        }

        let reference = if self.eat(&TokenKind::Amp) {
            Reference::Lvalue
        } else if self.eat(&TokenKind::AmpAmp) {
            Reference::Rvalue
        } else if self.at(&TokenKind::Star) {
            return Err(self.error("pointer types are not supported"));
        } else {
            Reference::None
        };

        Ok(DataType {
            base,
            is_const,
            reference,
        })
    }

    /// Raw text of a default argument, up to the next top-level `,` or `)`.
    fn default_value(&mut self) -> Result<String, DeclError> {
        let first = self.pos;
        let mut depth = 0usize;
        while let Some(kind) = self.peek() {
            match kind {
                TokenKind::Comma | TokenKind::RParen if depth == 0 => break,
                TokenKind::LParen | TokenKind::LBrace | TokenKind::Lt => depth += 1,
                TokenKind::RParen | TokenKind::RBrace | TokenKind::Gt => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            self.pos += 1;
        }
        if self.pos == first {
            return Err(self.error("expected a default value"));
        }
        let start = self.tokens[first].start;
        let end = self.tokens[self.pos - 1].end;
        Ok(self.source[start..end].to_string())
    }

    fn param(&mut self) -> Result<Param, DeclError> {
        let data_type = self.data_type()?;
        let name = match self.peek() {
            Some(TokenKind::Ident(_)) => Some(self.ident("a parameter name")?),
            _ => None,
        };
        let default = if self.eat(&TokenKind::Eq) {
            Some(self.default_value()?)
        } else {
            None
        };
        Ok(Param {
            data_type,
            name,
            default,
        })
    }

    /// `(T a, U b = 1)`, `()` or `(void)`
    pub(super) fn params(&mut self) -> Result<Vec<Param>, DeclError> {
        self.expect(TokenKind::LParen, "'('")?;
        let mut params = Vec::new();

        let void_list = matches!(self.peek(), Some(TokenKind::Ident(i)) if i == "void")
            && self.peek_nth(1) == Some(&TokenKind::RParen);
        if void_list {
            self.pos += 1;
        } else if !self.at(&TokenKind::RParen) {
            params.push(self.param()?);
            while self.eat(&TokenKind::Comma) {
                params.push(self.param()?);
            }
        }

        self.expect(TokenKind::RParen, "')'")?;
        Ok(params)
    }

    /// `(*)` or `(a::B::*)`; returns the owner path of a member pointer.
    fn pointer_shape(&mut self) -> Result<Option<String>, DeclError> {
        self.expect(TokenKind::LParen, "'('")?;
        if self.eat(&TokenKind::Star) {
            self.expect(TokenKind::RParen, "')'")?;
            return Ok(None);
        }

        let mut owner = self.ident("a class name")?;
        loop {
            self.expect(TokenKind::ColonColon, "'::'")?;
            if self.eat(&TokenKind::Star) {
                break;
            }
            owner.push_str("::");
            owner.push_str(&self.ident("a class name")?);
        }
        self.expect(TokenKind::RParen, "')'")?;
        Ok(Some(owner))
    }

    fn is_pointer_shape(&self) -> bool {
        if !self.at(&TokenKind::LParen) {
            return false;
        }
        match self.peek_nth(1) {
            Some(TokenKind::Star) => true,
            Some(TokenKind::Ident(_)) => {
                // look for `::*` before the closing paren
                let mut n = 1;
                while let Some(kind) = self.peek_nth(n) {
                    match kind {
                        TokenKind::Star => return true,
                        TokenKind::Ident(_) | TokenKind::ColonColon => n += 1,
                        _ => return false,
                    }
                }
                false
            }
            _ => false,
        }
    }

    pub(super) fn declaration(&mut self) -> Result<Declaration, DeclError> {
        let return_type = self.data_type()?;

        let (name, owner) = if self.is_pointer_shape() {
            (None, self.pointer_shape()?)
        } else if matches!(self.peek(), Some(TokenKind::Ident(_))) {
            (Some(self.path()?), None)
        } else {
            (None, None)
        };

        let params = self.params()?;
        let is_const = self.eat_keyword("const");

        Ok(Declaration {
            name,
            owner,
            signature: Signature::new(params, return_type).with_const(is_const),
        })
    }

    pub(super) fn field(&mut self) -> Result<(String, DataType), DeclError> {
        let data_type = self.data_type()?;
        let name = self.ident("a field name")?;
        Ok((name, data_type))
    }
}
