//! Parsers for the catalog source.
//!
//! The source is a CSV table with a header row, e.g. `movies_metadata.csv`:
//! `id,title,genres,runtime,original_language,overview,...`
//!
//! Three layers live here:
//! - reading CSV rows with the `csv` crate
//! - mapping header columns onto [`RawRecord`] fields
//! - lenient field parsers: ids, runtimes and the serialized genre list

use crate::error::{DataLoadError, Result};
use crate::types::*;
use csv::{ByteRecord, ReaderBuilder};
use std::fs;
use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;

/// Read the raw bytes of a catalog source.
///
/// An unreadable source is the one fatal ingestion failure.
pub fn read_source(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| DataLoadError::SourceUnavailable {
        path: path.display().to_string(),
        source,
    })
}

// =============================================================================
// CSV
// =============================================================================

/// Column positions of the fields the ingestor understands
struct ColumnMap {
    id: usize,
    title: usize,
    genres: Option<usize>,
    runtime: Option<usize>,
    original_language: Option<usize>,
    overview: Option<usize>,
}

impl ColumnMap {
    fn from_header(header: &[String]) -> Result<Self> {
        let find = |name: &str| header.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| DataLoadError::MissingColumn {
                column: name.to_string(),
            })
        };

        Ok(Self {
            id: require("id")?,
            title: require("title")?,
            genres: find("genres"),
            runtime: find("runtime"),
            original_language: find("original_language"),
            overview: find("overview"),
        })
    }

    fn extract(&self, row: &ByteRecord) -> RawRecord {
        // Empty cells count as missing, the same as absent trailing cells
        let cell = |pos: Option<usize>| {
            pos.and_then(|p| row.get(p))
                .filter(|v| !v.is_empty())
                .map(|v| String::from_utf8_lossy(v).into_owned())
        };

        RawRecord {
            id: cell(Some(self.id)),
            title: cell(Some(self.title)),
            genres: cell(self.genres),
            runtime: cell(self.runtime),
            original_language: cell(self.original_language),
            overview: cell(self.overview),
        }
    }
}

/// Parse CSV bytes with a header row into raw records.
///
/// Quoted fields may hold commas, doubled quotes and newlines. Rows may be
/// ragged, and invalid UTF-8 is replaced rather than rejected. `source` is
/// only used in error messages.
pub fn parse_table(bytes: &[u8], source: &str) -> Result<Vec<RawRecord>> {
    let bytes = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes);
    let malformed = |source_err: csv::Error| DataLoadError::MalformedSource {
        path: source.to_string(),
        source: source_err,
    };

    let mut reader = ReaderBuilder::new().flexible(true).from_reader(bytes);
    let header: Vec<String> = reader
        .byte_headers()
        .map_err(malformed)?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();
    if header.is_empty() {
        return Err(DataLoadError::EmptySource {
            path: source.to_string(),
        });
    }
    let columns = ColumnMap::from_header(&header)?;

    let mut records = Vec::new();
    let mut row = ByteRecord::new();
    while reader.read_byte_record(&mut row).map_err(malformed)? {
        records.push(columns.extract(&row));
    }
    Ok(records)
}

// =============================================================================
// Field parsers
// =============================================================================

/// Coerce an id cell to an integer.
///
/// Accepts integral text ("862") and float text ("862.0", truncated toward
/// zero). Anything else, including non-finite values, yields `None`.
pub fn parse_id(raw: &str) -> Option<ItemId> {
    let trimmed = raw.trim();
    if let Ok(id) = trimmed.parse::<ItemId>() {
        return Some(id);
    }
    let value = trimmed.parse::<f64>().ok().filter(|v| v.is_finite())?;
    // Out-of-range floats cannot be represented as an id
    if value < ItemId::MIN as f64 || value > ItemId::MAX as f64 {
        return None;
    }
    Some(value.trunc() as ItemId)
}

/// Parse a runtime cell; missing, unparsable and non-finite values are `None`
pub fn parse_runtime(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse the serialized genre list of one record.
///
/// The field holds a literal list of mappings, e.g.
/// `[{'id': 16, 'name': 'Animation'}, {'id': 35, 'name': 'Comedy'}]`.
/// Every mapping with a string `name` contributes that name; other entries
/// are skipped. Any structural problem yields [`GenreField::Unparsable`].
pub fn parse_genres(raw: Option<&str>) -> GenreField {
    let Some(raw) = raw else {
        return GenreField::Unparsable;
    };

    let mut parser = LiteralParser::new(raw);
    let Some(value) = parser.parse_document() else {
        return GenreField::Unparsable;
    };

    let entries = match value {
        Literal::Sequence(items) => items,
        _ => return GenreField::Unparsable,
    };

    let names = entries
        .into_iter()
        .filter_map(|entry| match entry {
            Literal::Mapping(pairs) => pairs
                .into_iter()
                .rev() // a repeated key keeps its last value
                .find(|(key, _)| matches!(key, Literal::Str(k) if k == "name"))
                .and_then(|(_, value)| match value {
                    Literal::Str(name) => Some(name),
                    _ => None,
                }),
            _ => None,
        })
        .collect();

    GenreField::Parsed(names)
}

/// Values of the literal subset the genre field uses
#[derive(Debug, Clone, PartialEq)]
enum Literal {
    Sequence(Vec<Literal>),
    Mapping(Vec<(Literal, Literal)>),
    Str(String),
    Number(f64),
    Keyword(String),
}

/// Recursive-descent parser for list/tuple/dict/string/number/keyword
/// literals. Returns `None` on anything it does not understand.
struct LiteralParser<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> LiteralParser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
        }
    }

    /// Parse exactly one value followed only by whitespace
    fn parse_document(&mut self) -> Option<Literal> {
        let value = self.parse_value()?;
        self.skip_whitespace();
        match self.chars.peek() {
            None => Some(value),
            Some(_) => None,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn parse_value(&mut self) -> Option<Literal> {
        self.skip_whitespace();
        match *self.chars.peek()? {
            '[' => self.parse_sequence('[', ']'),
            '(' => self.parse_sequence('(', ')'),
            '{' => self.parse_mapping(),
            '\'' | '"' => self.parse_string().map(Literal::Str),
            c if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.parse_number(),
            c if c.is_alphabetic() => self.parse_keyword(),
            _ => None,
        }
    }

    fn parse_sequence(&mut self, open: char, close: char) -> Option<Literal> {
        if self.chars.next()? != open {
            return None;
        }
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.chars.peek() == Some(&close) {
                self.chars.next();
                return Some(Literal::Sequence(items));
            }
            items.push(self.parse_value()?);
            self.skip_whitespace();
            match self.chars.next()? {
                ',' => continue,
                c if c == close => return Some(Literal::Sequence(items)),
                _ => return None,
            }
        }
    }

    fn parse_mapping(&mut self) -> Option<Literal> {
        if self.chars.next()? != '{' {
            return None;
        }
        let mut pairs = Vec::new();
        loop {
            self.skip_whitespace();
            if self.chars.peek() == Some(&'}') {
                self.chars.next();
                return Some(Literal::Mapping(pairs));
            }
            let key = self.parse_value()?;
            self.skip_whitespace();
            if self.chars.next()? != ':' {
                return None;
            }
            let value = self.parse_value()?;
            pairs.push((key, value));
            self.skip_whitespace();
            match self.chars.next()? {
                ',' => continue,
                '}' => return Some(Literal::Mapping(pairs)),
                _ => return None,
            }
        }
    }

    fn parse_string(&mut self) -> Option<String> {
        let quote = self.chars.next()?;
        let mut out = String::new();
        loop {
            match self.chars.next()? {
                '\\' => match self.chars.next()? {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    'a' => out.push('\u{7}'),
                    'b' => out.push('\u{8}'),
                    'f' => out.push('\u{c}'),
                    'v' => out.push('\u{b}'),
                    'x' => out.push(self.parse_hex_escape(2)?),
                    'u' => out.push(self.parse_hex_escape(4)?),
                    'U' => out.push(self.parse_hex_escape(8)?),
                    d @ '0'..='7' => out.push(self.parse_octal_escape(d)?),
                    '\n' => {} // line continuation
                    c @ ('\\' | '\'' | '"') => out.push(c),
                    // Unknown escapes, including \N{...}, stay verbatim
                    other => {
                        out.push('\\');
                        out.push(other);
                    }
                },
                c if c == quote => return Some(out),
                c => out.push(c),
            }
        }
    }

    /// Exactly `digits` hex digits naming a code point; surrogates are rejected
    fn parse_hex_escape(&mut self, digits: usize) -> Option<char> {
        let mut code = 0u32;
        for _ in 0..digits {
            code = code * 16 + self.chars.next()?.to_digit(16)?;
        }
        char::from_u32(code)
    }

    /// Up to three octal digits, the first already consumed
    fn parse_octal_escape(&mut self, first: char) -> Option<char> {
        let mut code = first.to_digit(8)?;
        for _ in 0..2 {
            match self.chars.peek().and_then(|c| c.to_digit(8)) {
                Some(d) => {
                    code = code * 8 + d;
                    self.chars.next();
                }
                None => break,
            }
        }
        char::from_u32(code)
    }

    fn parse_number(&mut self) -> Option<Literal> {
        let mut text = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.') {
                text.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        text.parse::<f64>().ok().map(Literal::Number)
    }

    fn parse_keyword(&mut self) -> Option<Literal> {
        let mut word = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                word.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        match word.as_str() {
            "True" | "False" | "None" => Some(Literal::Keyword(word)),
            _ => None,
        }
    }
}
