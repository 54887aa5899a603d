//! Decoder for the one-dict-per-line stats format.
//!
//! Each data line of a backend stats file is a flat mapping such as
//!
//! ```text
//! {'ViserStat': True, 'cpuid': -1, 'g_Data_L1ReadHits': 1234, 'AverageRegionSize': 12.500}
//! ```
//!
//! Keys are quoted strings; values are integers, floats, `True`/`False` or
//! quoted strings. Nothing else is accepted.

use super::schema::{StatRecord, StatValue};
use std::fmt;

/// Where and why a line failed to decode
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeError {
    /// Byte offset into the line
    pub offset: usize,
    pub reason: String,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at column {}", self.reason, self.offset + 1)
    }
}

impl std::error::Error for DecodeError {}

/// Decode one line into a record
///
/// **Public** - used by the backend stats parser
///
/// Later duplicates of a key replace earlier ones.
///
/// # Errors
/// `DecodeError` with the offending column if the line is not a flat mapping
pub fn decode_line(line: &str) -> Result<StatRecord, DecodeError> {
    let mut decoder = Decoder { src: line, pos: 0 };
    let record = decoder.mapping()?;
    decoder.skip_ws();
    if decoder.pos != line.len() {
        return Err(decoder.error("trailing characters after mapping"));
    }
    Ok(record)
}

struct Decoder<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Decoder<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn error(&self, reason: impl Into<String>) -> DecodeError {
        DecodeError {
            offset: self.pos,
            reason: reason.into(),
        }
    }

    fn expect(&mut self, want: char) -> Result<(), DecodeError> {
        self.skip_ws();
        match self.peek() {
            Some(c) if c == want => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{}', found '{}'", want, c))),
            None => Err(self.error(format!("expected '{}', found end of line", want))),
        }
    }

    fn mapping(&mut self) -> Result<StatRecord, DecodeError> {
        let mut record = StatRecord::new();
        self.expect('{')?;

        loop {
            self.skip_ws();
            if self.peek() == Some('}') {
                self.bump();
                return Ok(record);
            }

            let key = self.string()?;
            self.expect(':')?;
            self.skip_ws();
            let value = self.value()?;
            record.insert(key, value);

            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some('}') => return Ok(record),
                Some(c) => {
                    self.pos -= c.len_utf8();
                    return Err(self.error(format!("expected ',' or '}}', found '{}'", c)));
                }
                None => return Err(self.error("unterminated mapping")),
            }
        }
    }

    fn value(&mut self) -> Result<StatValue, DecodeError> {
        match self.peek() {
            Some('\'') | Some('"') => Ok(StatValue::Str(self.string()?)),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_ascii_alphabetic() => self.word(),
            Some(c) => Err(self.error(format!("unexpected '{}'", c))),
            None => Err(self.error("missing value")),
        }
    }

    fn string(&mut self) -> Result<String, DecodeError> {
        self.skip_ws();
        let quote = match self.peek() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error("expected quoted key")),
        };
        self.bump();

        let mut out = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(c @ ('\\' | '\'' | '"')) => out.push(c),
                    Some(c) => {
                        out.push('\\');
                        out.push(c);
                    }
                    None => break,
                },
                Some(c) => out.push(c),
                None => break,
            }
        }
        Err(self.error("unterminated string"))
    }

    fn number(&mut self) -> Result<StatValue, DecodeError> {
        let start = self.pos;
        let mut is_float = false;

        if matches!(self.peek(), Some('-') | Some('+')) {
            self.bump();
        }
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => {}
                '.' => is_float = true,
                'e' | 'E' => {
                    is_float = true;
                    self.bump();
                    if matches!(self.peek(), Some('-') | Some('+')) {
                        self.bump();
                    }
                    continue;
                }
                _ => break,
            }
            self.bump();
        }

        let text = &self.src[start..self.pos];
        let bad = || DecodeError {
            offset: start,
            reason: format!("invalid number '{}'", text),
        };

        if is_float {
            text.parse::<f64>().map(StatValue::Float).map_err(|_| bad())
        } else {
            text.parse::<i64>().map(StatValue::Int).map_err(|_| bad())
        }
    }

    fn word(&mut self) -> Result<StatValue, DecodeError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.bump();
        }
        match &self.src[start..self.pos] {
            "True" => Ok(StatValue::Bool(true)),
            "False" => Ok(StatValue::Bool(false)),
            other => Err(DecodeError {
                offset: start,
                reason: format!("unsupported literal '{}'", other),
            }),
        }
    }
}
