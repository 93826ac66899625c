use thiserror::Error;

use crate::ast::{Token, TokenKind};

/// Errors produced while tokenizing formula text.
///
/// A lex error is fatal to the call that triggered it; there is no
/// resynchronization.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    /// A character outside the Molang grammar.
    #[error("unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },

    /// A single `&` (only the logical `&&` exists in this grammar).
    #[error("found '&' without a second '&' at position {position} (bitwise operators are not supported)")]
    LoneAmpersand { position: usize },

    /// A single `|` (only the logical `||` exists in this grammar).
    #[error("found '|' without a second '|' at position {position} (bitwise operators are not supported)")]
    LonePipe { position: usize },
}

/// Tokenizer for Molang formula text.
///
/// Produces one [`Token`] per call to [`Lexer::next_token`], ending with a
/// token of kind [`TokenKind::Eof`]. Whitespace is insignificant. The grammar
/// has no comments and no string literals.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_number(&mut self, start: usize) -> Token {
        let mut number = String::new();
        let mut has_decimal = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !has_decimal
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                has_decimal = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        // Digits with at most one interior dot always parse; overflow
        // saturates to infinity rather than failing.
        let value = number.parse().unwrap_or(f32::INFINITY);
        Token::new(TokenKind::Number(value), start)
    }

    /// Reads the next token, skipping any leading whitespace.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        let start = self.position;

        match self.current_char() {
            None => Ok(Token::new(TokenKind::Eof, start)),
            Some('+') => {
                self.advance();
                Ok(Token::new(TokenKind::Plus, start))
            }
            Some('-') => {
                self.advance();
                Ok(Token::new(TokenKind::Minus, start))
            }
            Some('*') => {
                self.advance();
                Ok(Token::new(TokenKind::Star, start))
            }
            Some('/') => {
                self.advance();
                Ok(Token::new(TokenKind::Slash, start))
            }
            Some('(') => {
                self.advance();
                Ok(Token::new(TokenKind::LParen, start))
            }
            Some(')') => {
                self.advance();
                Ok(Token::new(TokenKind::RParen, start))
            }
            Some(',') => {
                self.advance();
                Ok(Token::new(TokenKind::Comma, start))
            }
            Some('.') => {
                self.advance();
                Ok(Token::new(TokenKind::Dot, start))
            }
            Some('?') => {
                self.advance();
                Ok(Token::new(TokenKind::Question, start))
            }
            Some(':') => {
                self.advance();
                Ok(Token::new(TokenKind::Colon, start))
            }
            Some('!') => {
                self.advance();
                Ok(Token::new(TokenKind::Bang, start))
            }
            Some('<') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Ok(Token::new(TokenKind::LtEq, start))
                } else {
                    self.advance();
                    Ok(Token::new(TokenKind::Lt, start))
                }
            }
            Some('>') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Ok(Token::new(TokenKind::GtEq, start))
                } else {
                    self.advance();
                    Ok(Token::new(TokenKind::Gt, start))
                }
            }
            Some('&') => {
                if self.peek_char(1) == Some('&') {
                    self.advance();
                    self.advance();
                    Ok(Token::new(TokenKind::AndAnd, start))
                } else {
                    Err(LexError::LoneAmpersand { position: start })
                }
            }
            Some('|') => {
                if self.peek_char(1) == Some('|') {
                    self.advance();
                    self.advance();
                    Ok(Token::new(TokenKind::OrOr, start))
                } else {
                    Err(LexError::LonePipe { position: start })
                }
            }
            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();
                Ok(Token::new(TokenKind::Identifier(ident), start))
            }
            Some(ch) if ch.is_ascii_digit() => Ok(self.read_number(start)),
            Some(ch) => Err(LexError::UnexpectedCharacter {
                character: ch,
                position: start,
            }),
        }
    }
}

#[test]
fn test_operators() {
    let mut lexer = Lexer::new("+ - * / < > <= >= && || !");
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Plus);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Minus);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Star);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Slash);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Lt);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Gt);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::LtEq);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::GtEq);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::AndAnd);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::OrOr);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Bang);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
}

#[test]
fn test_reference() {
    let mut lexer = Lexer::new("query.anim_time * 0.5");
    assert_eq!(
        lexer.next_token().unwrap().kind,
        TokenKind::Identifier("query".to_string())
    );
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Dot);
    assert_eq!(
        lexer.next_token().unwrap().kind,
        TokenKind::Identifier("anim_time".to_string())
    );
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Star);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Number(0.5));
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
}

#[test]
fn test_number_stops_at_second_decimal_point() {
    let mut lexer = Lexer::new("3.25");
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Number(3.25));
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);

    let mut lexer = Lexer::new("1.2.3");
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Number(1.2));
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Dot);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Number(3.0));
}

#[test]
fn test_overflowing_literal_saturates_to_infinity() {
    let mut lexer = Lexer::new("999999999999999999999999999999999999999999");
    assert_eq!(
        lexer.next_token().unwrap().kind,
        TokenKind::Number(f32::INFINITY)
    );
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
}

#[test]
fn test_positions() {
    let mut lexer = Lexer::new("1 + foo");
    assert_eq!(lexer.next_token().unwrap().position, 0);
    assert_eq!(lexer.next_token().unwrap().position, 2);
    assert_eq!(lexer.next_token().unwrap().position, 4);
}

#[test]
fn test_unexpected_character() {
    let mut lexer = Lexer::new("1 # 2");
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Number(1.0));
    assert_eq!(
        lexer.next_token(),
        Err(LexError::UnexpectedCharacter {
            character: '#',
            position: 2,
        })
    );
}

#[test]
fn test_lone_ampersand() {
    let mut lexer = Lexer::new("1 & 2");
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Number(1.0));
    assert_eq!(
        lexer.next_token(),
        Err(LexError::LoneAmpersand { position: 2 })
    );
}

#[test]
fn test_eof_is_sticky() {
    let mut lexer = Lexer::new("  ");
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
}
