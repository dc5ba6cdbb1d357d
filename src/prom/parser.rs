//! Tokenizer for the exposition text returned by the metrics export API.
//!
//! A sample line has the shape
//! `name{key="value",...} <value> <timestamp>`. The walk is a single forward
//! pass over the bytes of the line; every delimiter is ASCII, so slicing at
//! delimiter positions always lands on a char boundary.

use super::model::{Label, Line, MetricSample, ParsedDocument};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LineError {
    #[error("invalid metric name at byte {0}")]
    Name(usize),
    #[error("expected '{{' at byte {0}")]
    MissingLabelBlock(usize),
    #[error("label block opened at byte {0} is never closed")]
    UnterminatedLabelBlock(usize),
    #[error("bad label block: {0}")]
    Labels(#[from] LabelError),
    #[error("expected whitespace at byte {0}")]
    MissingWhitespace(usize),
    #[error("invalid sample value {0:?}")]
    Value(String),
    #[error("invalid timestamp {0:?}")]
    Timestamp(String),
    #[error("unexpected input after timestamp at byte {0}")]
    Trailing(usize),
}

/// Offsets are relative to the start of the label block.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LabelError {
    #[error("invalid label name at byte {0}")]
    Key(usize),
    #[error("expected '=' at byte {0}")]
    MissingEquals(usize),
    #[error("expected '\"' at byte {0}")]
    MissingQuote(usize),
    #[error("label value starting at byte {0} is never closed")]
    UnterminatedValue(usize),
    #[error("expected ',' at byte {0}")]
    MissingComma(usize),
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Cursor { input, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// `pred` must only accept ASCII bytes.
    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if !pred(b) {
                break;
            }
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }

    fn take_until_whitespace(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if is_blank(b) {
                break;
            }
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }

    fn skip_blanks(&mut self) -> usize {
        self.take_while(is_blank).len()
    }
}

fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Classify one line of an exposition document.
pub fn parse_line(line: &str) -> Result<Line, LineError> {
    let line = line.trim_end();
    let content = line.trim_start();
    if content.is_empty() || content.starts_with('#') {
        return Ok(Line::Skip);
    }

    let mut cursor = Cursor::new(line);

    if !cursor.peek().is_some_and(is_name_start) {
        return Err(LineError::Name(cursor.pos));
    }
    let name = cursor.take_while(is_name_byte);

    let block_start = cursor.pos;
    if !cursor.eat(b'{') {
        return Err(LineError::MissingLabelBlock(cursor.pos));
    }
    let block = label_block(&mut cursor).ok_or(LineError::UnterminatedLabelBlock(block_start))?;
    let labels = parse_labels(block)?;

    if cursor.skip_blanks() == 0 {
        return Err(LineError::MissingWhitespace(cursor.pos));
    }
    let value = cursor.take_until_whitespace();
    if !is_numeric_literal(value) {
        return Err(LineError::Value(value.to_string()));
    }

    if cursor.skip_blanks() == 0 {
        return Err(LineError::MissingWhitespace(cursor.pos));
    }
    let timestamp = cursor.take_until_whitespace();
    let timestamp = parse_timestamp(timestamp).ok_or_else(|| LineError::Timestamp(timestamp.to_string()))?;

    if !cursor.at_end() {
        return Err(LineError::Trailing(cursor.pos));
    }

    Ok(Line::Sample(MetricSample {
        name: name.to_string(),
        labels,
        raw_value: value.to_string(),
        timestamp,
    }))
}

/// Consume everything up to the `}` closing the label block, honouring quoted
/// values. The cursor is left after the brace.
fn label_block<'a>(cursor: &mut Cursor<'a>) -> Option<&'a str> {
    let start = cursor.pos;
    let mut quoted = false;
    let mut escaped = false;
    while let Some(b) = cursor.peek() {
        cursor.pos += 1;
        if quoted {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => quoted = false,
                _ => {}
            }
        } else {
            match b {
                b'"' => quoted = true,
                b'}' => return Some(&cursor.input[start..cursor.pos - 1]),
                _ => {}
            }
        }
    }
    None
}

/// Parse the inside of a label block into pairs, in the order they appear.
pub fn parse_labels(block: &str) -> Result<Vec<Label>, LabelError> {
    let mut labels = Vec::new();
    let mut cursor = Cursor::new(block);

    loop {
        cursor.skip_blanks();
        if cursor.at_end() {
            break;
        }

        let key = cursor.take_while(is_name_byte);
        if key.is_empty() {
            return Err(LabelError::Key(cursor.pos));
        }

        cursor.skip_blanks();
        if !cursor.eat(b'=') {
            return Err(LabelError::MissingEquals(cursor.pos));
        }
        cursor.skip_blanks();
        if !cursor.eat(b'"') {
            return Err(LabelError::MissingQuote(cursor.pos));
        }
        let value = label_value(&mut cursor)?;
        labels.push(Label {
            key: key.to_string(),
            value,
        });

        cursor.skip_blanks();
        if cursor.at_end() {
            break;
        }
        if !cursor.eat(b',') {
            return Err(LabelError::MissingComma(cursor.pos));
        }
    }

    Ok(labels)
}

fn label_value(cursor: &mut Cursor<'_>) -> Result<String, LabelError> {
    let start = cursor.pos;
    let mut value = String::new();
    let mut chunk_start = start;

    while let Some(b) = cursor.peek() {
        match b {
            b'"' => {
                value.push_str(&cursor.input[chunk_start..cursor.pos]);
                cursor.pos += 1;
                return Ok(value);
            }
            b'\\' => {
                value.push_str(&cursor.input[chunk_start..cursor.pos]);
                cursor.pos += 1;
                match cursor.peek() {
                    Some(b'n') => value.push('\n'),
                    Some(b'"') => value.push('"'),
                    Some(b'\\') => value.push('\\'),
                    // unknown escapes are kept verbatim
                    Some(_) => {
                        chunk_start = cursor.pos - 1;
                        continue;
                    }
                    None => break,
                }
                cursor.pos += 1;
                chunk_start = cursor.pos;
            }
            _ => cursor.pos += 1,
        }
    }

    Err(LabelError::UnterminatedValue(start))
}

/// Signed decimal or exponential literal: `[+-]? digits [. digits] [(e|E) [+-]? digits]`.
/// Either side of the point may be empty but not both.
pub fn is_numeric_literal(candidate: &str) -> bool {
    let mut cursor = Cursor::new(candidate);
    let _ = cursor.eat(b'+') || cursor.eat(b'-');
    let integral = cursor.take_while(|b| b.is_ascii_digit()).len();
    let fraction = if cursor.eat(b'.') {
        cursor.take_while(|b| b.is_ascii_digit()).len()
    } else {
        0
    };
    if integral + fraction == 0 {
        return false;
    }
    if cursor.eat(b'e') || cursor.eat(b'E') {
        let _ = cursor.eat(b'+') || cursor.eat(b'-');
        if cursor.take_while(|b| b.is_ascii_digit()).is_empty() {
            return false;
        }
    }
    cursor.at_end()
}

fn parse_timestamp(candidate: &str) -> Option<u64> {
    if candidate.is_empty() || !candidate.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    candidate.parse().ok()
}

/// Tokenize every line of a document. Malformed lines are logged and counted,
/// never fatal.
pub fn parse_document(text: &str) -> ParsedDocument {
    let mut document = ParsedDocument::default();
    for (index, line) in text.lines().enumerate() {
        log::trace!("line: {line}");
        match parse_line(line) {
            Ok(Line::Sample(sample)) => document.samples.push(sample),
            Ok(Line::Skip) => {}
            Err(e) => {
                log::warn!("line {} does not match ({e}): {line}", index + 1);
                document.malformed += 1;
            }
        }
    }
    document
}
