//! Tokenizer for declaration strings.

use super::DeclError;

/// Kind of a declaration token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Ident(String),
    /// Numeric literal, kept as written (`10`, `0.1`, `1e-5f`).
    Number(String),
    ColonColon,
    Lt,
    Gt,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Amp,
    AmpAmp,
    Star,
    Eq,
    Minus,
    Dot,
}

/// A token with its byte range in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

/// A cursor over declaration text.
struct Cursor<'src> {
    source: &'src str,
    offset: usize,
}

impl<'src> Cursor<'src> {
    fn new(source: &'src str) -> Self {
        Self { source, offset: 0 }
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.source[self.offset..].chars().next()
    }

    #[inline]
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.offset += ch.len_utf8();
        Some(ch)
    }

    fn eat_while(&mut self, mut pred: impl FnMut(char) -> bool) {
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.advance();
        }
    }
}

/// Split a declaration into tokens.
pub fn tokenize(source: &str) -> Result<Vec<Token>, DeclError> {
    let mut cursor = Cursor::new(source);
    let mut tokens = Vec::new();

    while let Some(ch) = cursor.peek() {
        let start = cursor.offset;
        if ch.is_whitespace() {
            cursor.advance();
            continue;
        }

        let kind = if ch.is_ascii_alphabetic() || ch == '_' {
            cursor.eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
            TokenKind::Ident(source[start..cursor.offset].to_string())
        } else if ch.is_ascii_digit() {
            let mut prev = ch;
            cursor.eat_while(|c| {
                // exponent sign: 1e-5
                let ok = c.is_ascii_alphanumeric()
                    || c == '.'
                    || ((c == '-' || c == '+') && (prev == 'e' || prev == 'E'));
                prev = c;
                ok
            });
            TokenKind::Number(source[start..cursor.offset].to_string())
        } else {
            cursor.advance();
            match ch {
                ':' if cursor.peek() == Some(':') => {
                    cursor.advance();
                    TokenKind::ColonColon
                }
                '&' if cursor.peek() == Some('&') => {
                    cursor.advance();
                    TokenKind::AmpAmp
                }
                '.' if cursor.peek().is_some_and(|c| c.is_ascii_digit()) => {
                    cursor.eat_while(|c| c.is_ascii_alphanumeric());
                    TokenKind::Number(source[start..cursor.offset].to_string())
                }
                '&' => TokenKind::Amp,
                '<' => TokenKind::Lt,
                '>' => TokenKind::Gt,
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                '{' => TokenKind::LBrace,
                '}' => TokenKind::RBrace,
                ',' => TokenKind::Comma,
                '*' => TokenKind::Star,
                '=' => TokenKind::Eq,
                '-' => TokenKind::Minus,
                '.' => TokenKind::Dot,
                other => {
                    return Err(DeclError {
                        offset: start,
                        message: format!("unexpected character '{other}'"),
                    });
                }
            }
        };

        tokens.push(Token {
            kind,
            start,
            end: cursor.offset,
        });
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn function_pointer_shape() {
        assert_eq!(
            kinds("void (*)(pmp::SurfaceMesh &)"),
            vec![
                TokenKind::Ident("void".into()),
                TokenKind::LParen,
                TokenKind::Star,
                TokenKind::RParen,
                TokenKind::LParen,
                TokenKind::Ident("pmp".into()),
                TokenKind::ColonColon,
                TokenKind::Ident("SurfaceMesh".into()),
                TokenKind::Amp,
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn numbers_keep_their_spelling() {
        assert_eq!(
            kinds("= 0.1 1e-5f .5"),
            vec![
                TokenKind::Eq,
                TokenKind::Number("0.1".into()),
                TokenKind::Number("1e-5f".into()),
                TokenKind::Number(".5".into()),
            ]
        );
    }

    #[test]
    fn rvalue_reference() {
        assert_eq!(
            kinds("T&&"),
            vec![TokenKind::Ident("T".into()), TokenKind::AmpAmp]
        );
    }

    #[test]
    fn rejects_unknown_characters() {
        let err = tokenize("void f(int @x)").unwrap_err();
        assert_eq!(err.offset, 11);
    }

    #[test]
    fn token_ranges_cover_source() {
        let tokens = tokenize("pmp::Face f").unwrap();
        assert_eq!((tokens[0].start, tokens[0].end), (0, 3));
        assert_eq!((tokens[3].start, tokens[3].end), (10, 11));
    }
}
