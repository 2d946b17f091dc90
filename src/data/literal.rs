//! Restricted parser for the metadata header line.
//!
//! The header is a dictionary literal such as
//! `{'deviceId': 'ABC123', 'recording': true, 'rate': 1000}`.  Only literal
//! syntax is recognised: quoted strings, numbers, booleans, `null`/`None`,
//! lists (`[...]` or `(...)`) and maps.  Nothing is ever evaluated.

use std::collections::BTreeMap;

use super::error::{MetadataError, MetadataErrorKind};
use super::model::{Metadata, MetadataValue};

/// Parse a full metadata line.  The top-level value must be a map with
/// string keys.
pub fn parse_metadata(line: &str) -> Result<Metadata, MetadataError> {
    let mut parser = Parser::new(line);
    parser.skip_ws();
    let start = parser.pos;
    let value = parser.value()?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(parser.error(MetadataErrorKind::TrailingInput));
    }
    match value {
        MetadataValue::Map(map) => Ok(map),
        _ => Err(MetadataError::new(start, MetadataErrorKind::NotAMap)),
    }
}

/// Parse a single literal value.
pub fn parse_literal(text: &str) -> Result<MetadataValue, MetadataError> {
    let mut parser = Parser::new(text);
    parser.skip_ws();
    let value = parser.value()?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(parser.error(MetadataErrorKind::TrailingInput));
    }
    Ok(value)
}

/// Deepest list/map nesting accepted in a metadata literal.
pub const MAX_DEPTH: usize = 128;

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            depth: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, kind: MetadataErrorKind) -> MetadataError {
        MetadataError::new(self.pos, kind)
    }

    fn unexpected(&self) -> MetadataError {
        match self.peek() {
            Some(c) => self.error(MetadataErrorKind::UnexpectedChar(c)),
            None => self.error(MetadataErrorKind::UnexpectedEnd),
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn expect(&mut self, want: char) -> Result<(), MetadataError> {
        if self.peek() == Some(want) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn value(&mut self) -> Result<MetadataValue, MetadataError> {
        match self.peek() {
            Some('{') => self.nested(Self::map),
            Some('[') => self.nested(|p| p.list(']')),
            Some('(') => self.nested(|p| p.list(')')),
            Some(q @ ('\'' | '"')) => self.string(q).map(MetadataValue::String),
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.word(),
            _ => Err(self.unexpected()),
        }
    }

    fn nested(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<MetadataValue, MetadataError>,
    ) -> Result<MetadataValue, MetadataError> {
        if self.depth == MAX_DEPTH {
            return Err(self.error(MetadataErrorKind::TooDeep));
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn map(&mut self) -> Result<MetadataValue, MetadataError> {
        self.expect('{')?;
        let mut map = BTreeMap::new();
        loop {
            self.skip_ws();
            if self.peek() == Some('}') {
                self.bump();
                return Ok(MetadataValue::Map(map));
            }
            let key = match self.peek() {
                Some(q @ ('\'' | '"')) => self.string(q)?,
                Some(_) => return Err(self.error(MetadataErrorKind::NonStringKey)),
                None => return Err(self.error(MetadataErrorKind::UnexpectedEnd)),
            };
            self.skip_ws();
            self.expect(':')?;
            self.skip_ws();
            let value = self.value()?;
            // Later duplicates win.
            map.insert(key, value);
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {}
                _ => return Err(self.unexpected()),
            }
        }
    }

    fn list(&mut self, close: char) -> Result<MetadataValue, MetadataError> {
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.bump();
                return Ok(MetadataValue::List(items));
            }
            items.push(self.value()?);
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(c) if c == close => {}
                _ => return Err(self.unexpected()),
            }
        }
    }

    fn string(&mut self, quote: char) -> Result<String, MetadataError> {
        let start = self.pos;
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => {
                    return Err(MetadataError::new(
                        start,
                        MetadataErrorKind::UnterminatedString,
                    ))
                }
                Some(c) if c == quote => return Ok(out),
                Some('\\') => self.escape(&mut out)?,
                Some(c) => out.push(c),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<(), MetadataError> {
        let at = self.pos;
        let c = self
            .bump()
            .ok_or_else(|| MetadataError::new(at, MetadataErrorKind::UnterminatedString))?;
        match c {
            '\\' | '\'' | '"' => out.push(c),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'v' => out.push('\u{0b}'),
            '0'..='7' => out.push(self.octal_char(c)),
            'x' => out.push(self.hex_char(2, at)?),
            'u' => out.push(self.hex_char(4, at)?),
            'U' => out.push(self.hex_char(8, at)?),
            other => {
                // Unknown escapes are kept as written.
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    /// Up to three octal digits, the first already consumed.
    fn octal_char(&mut self, first: char) -> char {
        let mut code = first.to_digit(8).unwrap_or(0);
        for _ in 0..2 {
            match self.peek().and_then(|c| c.to_digit(8)) {
                Some(d) => {
                    code = code * 8 + d;
                    self.bump();
                }
                None => break,
            }
        }
        // At most 0o777, always a valid scalar value.
        char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    fn hex_char(&mut self, digits: usize, at: usize) -> Result<char, MetadataError> {
        let end = self.pos + digits;
        let hex = self
            .src
            .get(self.pos..end)
            .filter(|h| h.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| MetadataError::new(at, MetadataErrorKind::InvalidEscape))?;
        let code = u32::from_str_radix(hex, 16)
            .map_err(|_| MetadataError::new(at, MetadataErrorKind::InvalidEscape))?;
        let c = char::from_u32(code)
            .ok_or_else(|| MetadataError::new(at, MetadataErrorKind::InvalidEscape))?;
        self.pos = end;
        Ok(c)
    }

    fn number(&mut self) -> Result<MetadataValue, MetadataError> {
        let start = self.pos;
        let mut prev = None;
        while let Some(c) = self.peek() {
            let sign_ok = matches!(c, '+' | '-')
                && (self.pos == start || matches!(prev, Some('e' | 'E')));
            if c.is_ascii_alphanumeric() || c == '.' || sign_ok {
                prev = Some(c);
                self.bump();
            } else {
                break;
            }
        }
        let text = &self.src[start..self.pos];
        let invalid = || {
            MetadataError::new(start, MetadataErrorKind::InvalidNumber(text.to_string()))
        };

        let body = text.trim_start_matches(&['+', '-'][..]);
        if body.is_empty()
            || !body
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
        {
            return Err(invalid());
        }

        if body.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(i) = text.trim_start_matches('+').parse::<i64>() {
                return Ok(MetadataValue::Integer(i));
            }
        }
        text.parse::<f64>()
            .map(MetadataValue::Float)
            .map_err(|_| invalid())
    }

    fn word(&mut self) -> Result<MetadataValue, MetadataError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.bump();
        }
        match &self.src[start..self.pos] {
            "true" | "True" => Ok(MetadataValue::Bool(true)),
            "false" | "False" => Ok(MetadataValue::Bool(false)),
            "null" | "None" => Ok(MetadataValue::Null),
            other => Err(MetadataError::new(
                start,
                MetadataErrorKind::UnknownWord(other.to_string()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> MetadataValue {
        MetadataValue::String(v.to_string())
    }

    #[test]
    fn parses_flexvolt_header() {
        let meta =
            parse_metadata("{'deviceId': 'ABC123', 'recording': true, 'rate': 1000}").unwrap();
        assert_eq!(meta.len(), 3);
        assert_eq!(meta["deviceId"], s("ABC123"));
        assert_eq!(meta["recording"], MetadataValue::Bool(true));
        assert_eq!(meta["rate"], MetadataValue::Integer(1000));
    }

    #[test]
    fn parses_json_style_header() {
        let meta = parse_metadata(
            r#"{"channels": 4, "gain": 0.5, "filters": [{"type": "rms", "window": 50}], "note": null}"#,
        )
        .unwrap();
        assert_eq!(meta["channels"], MetadataValue::Integer(4));
        assert_eq!(meta["gain"], MetadataValue::Float(0.5));
        assert_eq!(meta["note"], MetadataValue::Null);
        let MetadataValue::List(filters) = &meta["filters"] else {
            panic!("filters should be a list");
        };
        let MetadataValue::Map(first) = &filters[0] else {
            panic!("filter entry should be a map");
        };
        assert_eq!(first["type"], s("rms"));
        assert_eq!(first["window"], MetadataValue::Integer(50));
    }

    #[test]
    fn accepts_python_spellings() {
        let meta = parse_metadata("{'a': True, 'b': False, 'c': None, 'd': (1, 2,)}").unwrap();
        assert_eq!(meta["a"], MetadataValue::Bool(true));
        assert_eq!(meta["b"], MetadataValue::Bool(false));
        assert_eq!(meta["c"], MetadataValue::Null);
        assert_eq!(
            meta["d"],
            MetadataValue::List(vec![MetadataValue::Integer(1), MetadataValue::Integer(2)])
        );
    }

    #[test]
    fn booleans_inside_strings_are_untouched() {
        let meta = parse_metadata("{'note': 'untrue'}").unwrap();
        assert_eq!(meta["note"], s("untrue"));
    }

    #[test]
    fn numbers() {
        assert_eq!(parse_literal("-12").unwrap(), MetadataValue::Integer(-12));
        assert_eq!(parse_literal("+3").unwrap(), MetadataValue::Integer(3));
        assert_eq!(parse_literal("1e3").unwrap(), MetadataValue::Float(1000.0));
        assert_eq!(parse_literal("2.5E-1").unwrap(), MetadataValue::Float(0.25));
        assert_eq!(parse_literal(".5").unwrap(), MetadataValue::Float(0.5));
        assert_eq!(
            parse_literal("99999999999999999999").unwrap(),
            MetadataValue::Float(1e20)
        );
        assert!(parse_literal("-inf").is_err());
        assert!(parse_literal("1e").is_err());
        assert!(parse_literal("0x10").is_err());
    }

    #[test]
    fn string_escapes() {
        assert_eq!(parse_literal(r#"'it\'s'"#).unwrap(), s("it's"));
        assert_eq!(parse_literal(r#""a\tb\n""#).unwrap(), s("a\tb\n"));
        assert_eq!(parse_literal(r#"'\u00e9\x41'"#).unwrap(), s("éA"));
        assert_eq!(parse_literal(r#"'C:\data'"#).unwrap(), s("C:\\data"));
        assert_eq!(parse_literal(r#""it's""#).unwrap(), s("it's"));
    }

    #[test]
    fn python_escapes() {
        assert_eq!(parse_literal(r"'\a\b\f\v'").unwrap(), s("\u{07}\u{08}\u{0c}\u{0b}"));
        assert_eq!(parse_literal(r"'\101\0'").unwrap(), s("A\0"));
        assert_eq!(parse_literal(r"'\01'").unwrap(), s("\u{01}"));
        assert_eq!(parse_literal(r"'\1019'").unwrap(), s("A9"));
        assert_eq!(parse_literal(r"'\U0001F600'").unwrap(), s("😀"));
        assert_eq!(
            parse_literal(r"'\UFFFFFFFF'").unwrap_err().kind,
            MetadataErrorKind::InvalidEscape
        );
        assert_eq!(parse_literal(r"'\N{DASH}'").unwrap(), s("\\N{DASH}"));
    }

    #[test]
    fn nesting_is_limited() {
        let nested = |n: usize| format!("{{'a': {}{}}}", "[".repeat(n), "]".repeat(n));

        assert!(parse_metadata(&nested(MAX_DEPTH - 1)).is_ok());

        let err = parse_metadata(&nested(MAX_DEPTH)).unwrap_err();
        assert_eq!(err.kind, MetadataErrorKind::TooDeep);
        assert_eq!(err.offset, 6 + MAX_DEPTH - 1);

        let err = parse_metadata(&nested(20_000)).unwrap_err();
        assert_eq!(err.kind, MetadataErrorKind::TooDeep);
    }

    #[test]
    fn later_duplicate_keys_win() {
        let meta = parse_metadata("{'a': 1, 'a': 2}").unwrap();
        assert_eq!(meta["a"], MetadataValue::Integer(2));
    }

    #[test]
    fn empty_map_and_surrounding_whitespace() {
        assert!(parse_metadata("  {}  \n").unwrap().is_empty());
    }

    #[test]
    fn rejects_expressions() {
        let err = parse_metadata("{'a': __import__('os')}").unwrap_err();
        assert_eq!(
            err.kind,
            MetadataErrorKind::UnknownWord("__import__".to_string())
        );
        assert!(parse_metadata("{'a': 1 + 2}").is_err());
    }

    #[test]
    fn rejects_non_map_top_level() {
        let err = parse_metadata("[1, 2]").unwrap_err();
        assert_eq!(err.kind, MetadataErrorKind::NotAMap);
        assert_eq!(err.offset, 0);
    }

    #[test]
    fn rejects_non_string_keys() {
        let err = parse_metadata("{1: 'a'}").unwrap_err();
        assert_eq!(err.kind, MetadataErrorKind::NonStringKey);
    }

    #[test]
    fn reports_offsets() {
        let err = parse_metadata("{'a': 1} x").unwrap_err();
        assert_eq!(err.kind, MetadataErrorKind::TrailingInput);
        assert_eq!(err.offset, 9);

        let err = parse_metadata("{'a': 'open").unwrap_err();
        assert_eq!(err.kind, MetadataErrorKind::UnterminatedString);
        assert_eq!(err.offset, 6);

        let err = parse_metadata("{'a' 1}").unwrap_err();
        assert_eq!(err.kind, MetadataErrorKind::UnexpectedChar('1'));
        assert_eq!(err.offset, 5);
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = parse_metadata("").unwrap_err();
        assert_eq!(err.kind, MetadataErrorKind::UnexpectedEnd);
    }
}
