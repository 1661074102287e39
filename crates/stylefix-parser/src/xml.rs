//! Streaming scanner for the attribute-based element format
//!
//! Both inputs this crate consumes (the violation report and the
//! configuration source) are element streams where everything of
//! interest sits in start-element attributes. The scanner yields start
//! and end events and skips prologs, doctypes, comments and text.

#[derive(Debug, Clone, PartialEq)]
pub enum XmlEvent {
    Start {
        name: String,
        attributes: Vec<(String, String)>,
        self_closing: bool,
    },
    End {
        name: String,
    },
}

impl XmlEvent {
    /// Attribute lookup on a start event; `None` for end events.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        match self {
            XmlEvent::Start { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            XmlEvent::End { .. } => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    #[error("malformed markup at line {line}: {message}")]
    Malformed { line: usize, message: String },
    #[error("unexpected end of input inside markup at line {line}")]
    UnexpectedEof { line: usize },
}

pub struct XmlScanner<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> XmlScanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0, line: 1 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    fn malformed(&self, message: impl Into<String>) -> XmlError {
        XmlError::Malformed {
            line: self.line,
            message: message.into(),
        }
    }

    fn starts_with(&self, s: &str) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    fn skip_until(&mut self, terminator: &str) -> Result<(), XmlError> {
        while !self.starts_with(terminator) {
            if self.advance().is_none() {
                return Err(XmlError::UnexpectedEof { line: self.line });
            }
        }
        for _ in 0..terminator.chars().count() {
            self.advance();
        }
        Ok(())
    }

    fn skip_spaces(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    fn read_name(&mut self) -> Result<String, XmlError> {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || matches!(ch, '_' | '-' | ':' | '.') {
                self.advance();
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(self.malformed("expected a name"));
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn read_attribute_value(&mut self) -> Result<String, XmlError> {
        let quote = match self.advance() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.malformed("expected a quoted attribute value")),
        };
        let mut value = String::new();
        loop {
            match self.advance() {
                Some(ch) if ch == quote => break,
                Some('&') => value.push_str(&self.read_entity()?),
                Some(ch) => value.push(ch),
                None => return Err(XmlError::UnexpectedEof { line: self.line }),
            }
        }
        Ok(value)
    }

    fn read_entity(&mut self) -> Result<String, XmlError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c != ';') {
            self.advance();
        }
        let name = &self.input[start..self.pos];
        if self.advance() != Some(';') {
            return Err(self.malformed("unterminated entity reference"));
        }
        let decoded = match name {
            "lt" => '<',
            "gt" => '>',
            "amp" => '&',
            "quot" => '"',
            "apos" => '\'',
            _ => {
                let code = if let Some(hex) = name.strip_prefix("#x") {
                    u32::from_str_radix(hex, 16).ok()
                } else if let Some(dec) = name.strip_prefix('#') {
                    dec.parse::<u32>().ok()
                } else {
                    None
                };
                match code.and_then(char::from_u32) {
                    Some(ch) => ch,
                    None => return Err(self.malformed(format!("unknown entity `&{name};`"))),
                }
            }
        };
        Ok(decoded.to_string())
    }

    /// Yields the next start or end event, or `None` at end of input.
    pub fn next_event(&mut self) -> Result<Option<XmlEvent>, XmlError> {
        loop {
            // Skip character data between elements.
            while matches!(self.peek(), Some(c) if c != '<') {
                self.advance();
            }
            if self.peek().is_none() {
                return Ok(None);
            }
            self.advance(); // <

            if self.starts_with("?") {
                self.skip_until("?>")?;
                continue;
            }
            if self.starts_with("!--") {
                self.skip_until("-->")?;
                continue;
            }
            if self.starts_with("!") {
                self.skip_until(">")?;
                continue;
            }
            if self.starts_with("/") {
                self.advance();
                let name = self.read_name()?;
                self.skip_spaces();
                if self.advance() != Some('>') {
                    return Err(self.malformed("expected `>` after closing tag name"));
                }
                return Ok(Some(XmlEvent::End { name }));
            }

            let name = self.read_name()?;
            let mut attributes = Vec::new();
            loop {
                self.skip_spaces();
                match self.peek() {
                    Some('>') => {
                        self.advance();
                        return Ok(Some(XmlEvent::Start {
                            name,
                            attributes,
                            self_closing: false,
                        }));
                    }
                    Some('/') => {
                        self.advance();
                        if self.advance() != Some('>') {
                            return Err(self.malformed("expected `>` after `/`"));
                        }
                        return Ok(Some(XmlEvent::Start {
                            name,
                            attributes,
                            self_closing: true,
                        }));
                    }
                    Some(_) => {
                        let key = self.read_name()?;
                        self.skip_spaces();
                        if self.advance() != Some('=') {
                            return Err(self.malformed(format!("attribute `{key}` has no value")));
                        }
                        self.skip_spaces();
                        let value = self.read_attribute_value()?;
                        attributes.push((key, value));
                    }
                    None => return Err(XmlError::UnexpectedEof { line: self.line }),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(input: &str) -> Vec<XmlEvent> {
        let mut scanner = XmlScanner::new(input);
        let mut out = Vec::new();
        while let Some(event) = scanner.next_event().unwrap() {
            out.push(event);
        }
        out
    }

    #[test]
    fn test_start_end_and_attributes() {
        let parsed = events(r#"<?xml version="1.0"?><a x="1"><b y="2"/></a>"#);
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].attribute("x"), Some("1"));
        assert!(matches!(
            &parsed[1],
            XmlEvent::Start { name, self_closing: true, .. } if name == "b"
        ));
        assert!(matches!(&parsed[2], XmlEvent::End { name } if name == "a"));
    }

    #[test]
    fn test_entities_decoded() {
        let parsed = events(r#"<m msg="a &lt; b &amp;&#33;"/>"#);
        assert_eq!(parsed[0].attribute("msg"), Some("a < b &!"));
    }

    #[test]
    fn test_comments_and_doctype_skipped() {
        let parsed = events("<!DOCTYPE module PUBLIC \"x\" \"y\">\n<!-- note -->\n<module name=\"Checker\"/>");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].attribute("name"), Some("Checker"));
    }

    #[test]
    fn test_malformed_attribute_errors() {
        let mut scanner = XmlScanner::new("<a x>");
        assert!(matches!(
            scanner.next_event(),
            Err(XmlError::Malformed { line: 1, .. })
        ));
    }

    #[test]
    fn test_unterminated_markup_errors() {
        let mut scanner = XmlScanner::new("<a x=\"1\"");
        assert!(scanner.next_event().is_err());
    }
}
