use thiserror::Error;

use crate::token::{Span, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexerState {
    LineBegin,
    InLine,
    AtEof,
}

enum StepOutcome {
    Emit(Token),
    Continue,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LexError {
    #[error("Unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },
    #[error("Indentation of {spaces} spaces is not a multiple of two at position {position}")]
    OddIndentation { spaces: usize, position: usize },
    #[error("Tabs are not supported for indentation at position {position}")]
    TabIndentation { position: usize },
    #[error("Invalid integer literal '{literal}' at position {position}")]
    InvalidIntegerLiteral { literal: String, position: usize },
    #[error("Unterminated string literal at position {position}")]
    UnterminatedString { position: usize },
}

pub type LexResult<T> = Result<T, LexError>;

/// Pull lexer over the source text.
///
/// Indentation is measured in units of two leading spaces on contentful
/// lines. `indent` tracks the current depth, `indent_diff` the number of
/// `Indent`/`Dedent` tokens still owed; one is emitted per call until the
/// difference is settled, before any token of the line itself.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    indent: usize,
    indent_diff: isize,
    state: LexerState,
    after_line_break: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            indent: 0,
            indent_diff: 0,
            state: LexerState::LineBegin,
            after_line_break: true,
        }
    }

    pub fn next_token(&mut self) -> LexResult<Token> {
        let token = loop {
            match self.step_state()? {
                StepOutcome::Emit(token) => break token,
                StepOutcome::Continue => continue,
            }
        };
        self.after_line_break = matches!(
            token.kind,
            TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent
        );
        Ok(token)
    }

    fn step_state(&mut self) -> LexResult<StepOutcome> {
        match self.state {
            LexerState::LineBegin => self.begin_line(),
            LexerState::InLine => self.lex_in_line(),
            LexerState::AtEof => Ok(StepOutcome::Emit(self.marker_token(TokenKind::Eof))),
        }
    }

    /// Skips blank and comment-only lines, then records the indentation
    /// delta of the first contentful line. Lines that carry no tokens never
    /// contribute `Newline`, `Indent` or `Dedent`.
    fn begin_line(&mut self) -> LexResult<StepOutcome> {
        loop {
            let line_start = self.pos;
            let spaces = self.consume_while(|c| c == ' ');
            match self.peek_char() {
                Some('\n') => {
                    self.consume_char();
                }
                Some('#') => {
                    self.consume_while(|c| c != '\n');
                    self.consume_char();
                }
                Some('\t') => {
                    return Err(LexError::TabIndentation { position: self.pos });
                }
                Some(_) => {
                    if spaces % 2 != 0 {
                        return Err(LexError::OddIndentation {
                            spaces,
                            position: line_start,
                        });
                    }
                    let new = spaces / 2;
                    self.indent_diff = new as isize - self.indent as isize;
                    self.indent = new;
                    self.state = LexerState::InLine;
                    return Ok(StepOutcome::Continue);
                }
                None => {
                    // End of input: every open block still owes a Dedent.
                    self.indent_diff = -(self.indent as isize);
                    self.indent = 0;
                    self.state = LexerState::InLine;
                    return Ok(StepOutcome::Continue);
                }
            }
        }
    }

    fn lex_in_line(&mut self) -> LexResult<StepOutcome> {
        if self.indent_diff > 0 {
            self.indent_diff -= 1;
            return Ok(StepOutcome::Emit(self.marker_token(TokenKind::Indent)));
        }
        if self.indent_diff < 0 {
            self.indent_diff += 1;
            return Ok(StepOutcome::Emit(self.marker_token(TokenKind::Dedent)));
        }

        self.consume_while(|c| c == ' ');

        let start = self.pos;
        let Some(ch) = self.peek_char() else {
            return self.handle_eof();
        };

        let token = match ch {
            '\n' => {
                self.consume_char();
                self.state = LexerState::LineBegin;
                Token::new(
                    TokenKind::Newline,
                    Span {
                        start,
                        end: start + 1,
                    },
                )
            }
            '#' => {
                // Trailing comment: the line still ends with its Newline.
                self.consume_while(|c| c != '\n');
                return Ok(StepOutcome::Continue);
            }
            '\'' | '"' => self.read_string(ch, start)?,
            c if c.is_ascii_digit() => self.read_integer(start)?,
            c if c.is_alphabetic() || c == '_' => self.read_identifier(start),
            _ => self.read_operator(ch, start)?,
        };
        Ok(StepOutcome::Emit(token))
    }

    fn handle_eof(&mut self) -> LexResult<StepOutcome> {
        if self.after_line_break {
            self.state = LexerState::AtEof;
            return Ok(StepOutcome::Emit(self.marker_token(TokenKind::Eof)));
        }
        // The last line had content but no terminator; give it one, then let
        // the line-begin state close any open indentation.
        self.state = LexerState::LineBegin;
        Ok(StepOutcome::Emit(self.marker_token(TokenKind::Newline)))
    }

    fn read_identifier(&mut self, start: usize) -> Token {
        self.consume_while(|c| c.is_alphanumeric() || c == '_');
        let end = self.pos;

        let ident = &self.input[start..end];
        let kind = match ident {
            "class" => TokenKind::Class,
            "return" => TokenKind::Return,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "def" => TokenKind::Def,
            "print" => TokenKind::Print,
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "not" => TokenKind::Not,
            "None" => TokenKind::None,
            "True" => TokenKind::True,
            "False" => TokenKind::False,
            _ => TokenKind::Identifier(ident.to_string()),
        };
        Token::new(kind, Span { start, end })
    }

    fn read_integer(&mut self, start: usize) -> LexResult<Token> {
        self.consume_while(|c| c.is_ascii_digit());
        let end = self.pos;

        let literal = &self.input[start..end];
        let value = literal
            .parse::<i64>()
            .map_err(|_| LexError::InvalidIntegerLiteral {
                literal: literal.to_string(),
                position: start,
            })?;
        Ok(Token::new(TokenKind::Integer(value), Span { start, end }))
    }

    /// Reads a string literal. The closing quote must match the opening one;
    /// `\n` and `\t` are escapes, any other escaped character stands for
    /// itself. A raw line break or end of input inside the literal is an
    /// error.
    fn read_string(&mut self, opener: char, start: usize) -> LexResult<Token> {
        self.consume_char();
        let mut text = String::new();
        loop {
            match self.consume_char() {
                None | Some('\n') => {
                    return Err(LexError::UnterminatedString { position: start });
                }
                Some('\\') => match self.consume_char() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some(other) => text.push(other),
                    None => {
                        return Err(LexError::UnterminatedString { position: start });
                    }
                },
                Some(c) if c == opener => break,
                Some(c) => text.push(c),
            }
        }
        Ok(Token::new(
            TokenKind::String(text),
            Span {
                start,
                end: self.pos,
            },
        ))
    }

    fn read_operator(&mut self, ch: char, start: usize) -> LexResult<Token> {
        self.consume_char();
        if matches!(ch, '=' | '!' | '<' | '>') && self.peek_char() == Some('=') {
            self.consume_char();
            let kind = match ch {
                '=' => TokenKind::Eq,
                '!' => TokenKind::NotEq,
                '<' => TokenKind::LessOrEq,
                _ => TokenKind::GreaterOrEq,
            };
            return Ok(Token::new(
                kind,
                Span {
                    start,
                    end: start + 2,
                },
            ));
        }
        if matches!(
            ch,
            '.' | ',' | ':' | '+' | '-' | '*' | '/' | '(' | ')' | '=' | '<' | '>'
        ) {
            return Ok(Token::new(
                TokenKind::Char(ch),
                Span {
                    start,
                    end: start + 1,
                },
            ));
        }
        Err(LexError::UnexpectedCharacter {
            character: ch,
            position: start,
        })
    }

    fn consume_while<P>(&mut self, keep_predicate: P) -> usize
    where
        P: Fn(char) -> bool,
    {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if !keep_predicate(c) {
                break;
            }
            self.consume_char();
        }
        self.pos - start
    }

    fn peek_char(&self) -> Option<char> {
        if self.pos >= self.input.len() {
            None
        } else {
            self.input[self.pos..].chars().next()
        }
    }

    fn consume_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn marker_token(&self, kind: TokenKind) -> Token {
        Token::new(
            kind,
            Span {
                start: self.pos,
                end: self.pos,
            },
        )
    }
}

impl Iterator for Lexer<'_> {
    type Item = LexResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(token) => Some(Ok(token)),
            Err(e) => Some(Err(e)),
        }
    }
}

pub fn tokenize(input: &str) -> LexResult<Vec<Token>> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let is_eof = matches!(token.kind, TokenKind::Eof);
        tokens.push(token);
        if is_eof {
            break;
        }
    }
    Ok(tokens)
}
