//! Lossless lexer - splits source text into prefixed raw tokens
//!
//! Every token carries the whitespace that precedes it, so concatenating
//! `prefix + text` over the token stream reproduces the input exactly.

use crate::tree::LiteralKind;

#[derive(Debug, Clone, PartialEq)]
pub enum RawKind {
    /// Identifier or keyword
    Word,
    /// Numeric literal with its semantic kind
    Number(LiteralKind),
    /// String literal, delimiters included
    Str,
    /// Character literal, delimiters included
    Char,
    /// `// ...` comment, without the trailing newline
    LineComment,
    /// `/* ... */` comment, delimiters included
    BlockComment,
    /// Opening delimiter: `{`, `(` or `[`
    Open(char),
    /// Closing delimiter: `}`, `)` or `]`
    Close(char),
    /// Any other single character
    Punct,
}

#[derive(Debug, Clone)]
pub struct RawToken {
    pub prefix: String,
    pub text: String,
    pub kind: RawKind,
}

#[derive(Debug, thiserror::Error)]
pub enum LexError {
    #[error("unterminated block comment starting at line {0}")]
    UnterminatedComment(usize),
    #[error("unterminated string literal starting at line {0}")]
    UnterminatedString(usize),
    #[error("unterminated character literal starting at line {0}")]
    UnterminatedChar(usize),
}

pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0, line: 1 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(n)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    fn read_whitespace(&mut self) -> String {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
        self.input[start..self.pos].to_string()
    }

    fn read_line_comment(&mut self) -> String {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
        self.input[start..self.pos].to_string()
    }

    fn read_block_comment(&mut self) -> Result<String, LexError> {
        let start = self.pos;
        let start_line = self.line;
        self.advance(); // /
        self.advance(); // *
        loop {
            match self.peek() {
                Some('*') if self.peek_at(1) == Some('/') => {
                    self.advance();
                    self.advance();
                    return Ok(self.input[start..self.pos].to_string());
                }
                Some(_) => {
                    self.advance();
                }
                None => return Err(LexError::UnterminatedComment(start_line)),
            }
        }
    }

    fn read_quoted(&mut self, quote: char) -> Result<String, LexError> {
        let start = self.pos;
        let start_line = self.line;
        self.advance(); // opening quote
        loop {
            match self.advance() {
                Some('\\') => {
                    self.advance();
                }
                Some(ch) if ch == quote => {
                    return Ok(self.input[start..self.pos].to_string());
                }
                Some('\n') | None => {
                    return Err(match quote {
                        '\'' => LexError::UnterminatedChar(start_line),
                        _ => LexError::UnterminatedString(start_line),
                    });
                }
                Some(_) => {}
            }
        }
    }

    /// Reads a `"""` text block, delimiters included.
    fn read_text_block(&mut self) -> Result<String, LexError> {
        let start = self.pos;
        let start_line = self.line;
        for _ in 0..3 {
            self.advance();
        }
        loop {
            match self.peek() {
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some('"') if self.peek_at(1) == Some('"') && self.peek_at(2) == Some('"') => {
                    for _ in 0..3 {
                        self.advance();
                    }
                    return Ok(self.input[start..self.pos].to_string());
                }
                Some(_) => {
                    self.advance();
                }
                None => return Err(LexError::UnterminatedString(start_line)),
            }
        }
    }

    fn read_word(&mut self) -> String {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' || ch == '$' {
                self.advance();
            } else {
                break;
            }
        }
        self.input[start..self.pos].to_string()
    }

    fn read_number(&mut self) -> (String, LiteralKind) {
        let start = self.pos;
        let mut seen_dot = false;
        let mut seen_exponent = false;

        let radix_prefixed = self.peek() == Some('0')
            && matches!(self.peek_at(1), Some('x') | Some('X') | Some('b') | Some('B'));
        if radix_prefixed {
            self.advance();
            self.advance();
            while let Some(ch) = self.peek() {
                if ch.is_ascii_hexdigit() || ch == '_' {
                    self.advance();
                } else {
                    break;
                }
            }
        } else {
            while let Some(ch) = self.peek() {
                match ch {
                    '0'..='9' | '_' => {
                        self.advance();
                    }
                    '.' if !seen_dot
                        && !seen_exponent
                        && matches!(self.peek_at(1), Some('0'..='9')) =>
                    {
                        seen_dot = true;
                        self.advance();
                    }
                    'e' | 'E' if !seen_exponent => {
                        let next = self.peek_at(1);
                        let signed_digit = matches!(next, Some('+') | Some('-'))
                            && matches!(self.peek_at(2), Some('0'..='9'));
                        if matches!(next, Some('0'..='9')) || signed_digit {
                            seen_exponent = true;
                            self.advance();
                            self.advance();
                        } else {
                            break;
                        }
                    }
                    _ => break,
                }
            }
        }

        let kind = match self.peek() {
            Some('l') | Some('L') => {
                self.advance();
                LiteralKind::Long
            }
            Some('f') | Some('F') if !radix_prefixed => {
                self.advance();
                LiteralKind::Float
            }
            Some('d') | Some('D') if !radix_prefixed => {
                self.advance();
                LiteralKind::Double
            }
            _ if seen_dot || seen_exponent => LiteralKind::Double,
            _ => LiteralKind::Int,
        };

        (self.input[start..self.pos].to_string(), kind)
    }

    pub fn next_token(&mut self) -> Result<Option<RawToken>, LexError> {
        let prefix = self.read_whitespace();

        let Some(ch) = self.peek() else {
            // Trailing whitespace is returned by `remainder` on the tree side;
            // stash it back by reporting end-of-input with the prefix intact.
            if !prefix.is_empty() {
                return Ok(Some(RawToken {
                    prefix,
                    text: String::new(),
                    kind: RawKind::Punct,
                }));
            }
            return Ok(None);
        };

        let (text, kind) = match ch {
            '/' if self.peek_at(1) == Some('/') => (self.read_line_comment(), RawKind::LineComment),
            '/' if self.peek_at(1) == Some('*') => (self.read_block_comment()?, RawKind::BlockComment),
            '"' if self.peek_at(1) == Some('"') && self.peek_at(2) == Some('"') => {
                (self.read_text_block()?, RawKind::Str)
            }
            '"' => (self.read_quoted('"')?, RawKind::Str),
            '\'' => (self.read_quoted('\'')?, RawKind::Char),
            '0'..='9' => {
                let (text, kind) = self.read_number();
                (text, RawKind::Number(kind))
            }
            '.' if matches!(self.peek_at(1), Some('0'..='9')) => {
                let (text, kind) = self.read_number();
                (text, RawKind::Number(kind))
            }
            '{' | '(' | '[' => {
                self.advance();
                (ch.to_string(), RawKind::Open(ch))
            }
            '}' | ')' | ']' => {
                self.advance();
                (ch.to_string(), RawKind::Close(ch))
            }
            c if c.is_alphabetic() || c == '_' || c == '$' => (self.read_word(), RawKind::Word),
            _ => {
                self.advance();
                (ch.to_string(), RawKind::Punct)
            }
        };

        Ok(Some(RawToken { prefix, text, kind }))
    }

    /// Tokenizes the whole input. The final token may be an empty-text
    /// `Punct` carrying trailing whitespace.
    pub fn tokenize(input: &'a str) -> Result<Vec<RawToken>, LexError> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        while let Some(token) = lexer.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(source: &str) -> String {
        Lexer::tokenize(source)
            .unwrap()
            .iter()
            .map(|t| format!("{}{}", t.prefix, t.text))
            .collect()
    }

    #[test]
    fn test_roundtrip_preserves_bytes() {
        let source = "class C {\n    long x = 10l; // note\n}\n";
        assert_eq!(roundtrip(source), source);
    }

    #[test]
    fn test_long_literal_kind() {
        let tokens = Lexer::tokenize("10l 0x1Fl 2L 3.5f 4.0 7").unwrap();
        let kinds: Vec<_> = tokens
            .iter()
            .filter_map(|t| match &t.kind {
                RawKind::Number(kind) => Some((t.text.clone(), *kind)),
                _ => None,
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("10l".to_string(), LiteralKind::Long),
                ("0x1Fl".to_string(), LiteralKind::Long),
                ("2L".to_string(), LiteralKind::Long),
                ("3.5f".to_string(), LiteralKind::Float),
                ("4.0".to_string(), LiteralKind::Double),
                ("7".to_string(), LiteralKind::Int),
            ]
        );
    }

    #[test]
    fn test_comments_exclude_trailing_newline() {
        let tokens = Lexer::tokenize("// first\n// second\nclass A {}").unwrap();
        assert_eq!(tokens[0].text, "// first");
        assert_eq!(tokens[1].prefix, "\n");
        assert_eq!(tokens[1].text, "// second");
    }

    #[test]
    fn test_block_comment_spans_lines() {
        let tokens = Lexer::tokenize("/* a\n * b\n */ int x;").unwrap();
        assert_eq!(tokens[0].text, "/* a\n * b\n */");
        assert_eq!(tokens[0].kind, RawKind::BlockComment);
    }

    #[test]
    fn test_unterminated_comment_errors() {
        assert!(matches!(
            Lexer::tokenize("/* never closed"),
            Err(LexError::UnterminatedComment(1))
        ));
    }

    #[test]
    fn test_string_with_escapes() {
        let tokens = Lexer::tokenize(r#"String s = "a \" b";"#).unwrap();
        let s = tokens.iter().find(|t| t.kind == RawKind::Str).unwrap();
        assert_eq!(s.text, r#""a \" b""#);
    }
}
