// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Struct tag grammar.
//!
//! A tag is a whitespace separated list of `key:"value"` pairs attached to a
//! field, e.g. `json:"name,omitempty" db:"user_name"`. The value is a
//! double-quoted string; its first comma separated component is the *name*,
//! the rest are *options*.
//!
//! ```
//! use hdds_dynstruct::StructTag;
//!
//! let tag: StructTag = r#"json:"email,omitempty" validate:"required""#.parse().unwrap();
//! let json = tag.get("json").unwrap();
//! assert_eq!(json.name, "email");
//! assert!(json.has_option("omitempty"));
//! assert_eq!(tag.lookup("validate").as_deref(), Some("required"));
//! ```

use crate::config::TAG_SEPARATOR;
use std::fmt;
use std::str::FromStr;

/// One `key:"name,opt1,opt2"` pair of a struct tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    /// Tag key (e.g. `json`).
    pub key: String,
    /// First component of the unquoted value.
    pub name: String,
    /// Remaining comma separated components.
    pub options: Vec<String>,
}

impl TagEntry {
    /// Check whether `option` is present.
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// Unquoted value, name and options joined back with commas.
    pub fn value(&self) -> String {
        let mut value = self.name.clone();
        for option in &self.options {
            value.push(',');
            value.push_str(option);
        }
        value
    }
}

/// A validated struct tag.
///
/// Keeps the raw text (what introspection shows) next to the parsed entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructTag {
    raw: String,
    entries: Vec<TagEntry>,
}

impl StructTag {
    /// The untagged state.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse and validate a raw tag string.
    pub fn parse(raw: &str) -> Result<Self, TagParseError> {
        let entries = parse_entries(raw)?;
        Ok(Self {
            raw: raw.to_string(),
            entries,
        })
    }

    /// Join tag fragments with a single space and parse the result.
    ///
    /// No fragments, or fragments joining to blank text, give an untagged
    /// field.
    pub fn join<S: AsRef<str>>(fragments: &[S]) -> Result<Self, TagParseError> {
        let joined = fragments
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(TAG_SEPARATOR);
        if joined.trim().is_empty() {
            return Ok(Self::empty());
        }
        Self::parse(&joined)
    }

    /// Raw tag text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True when the tag carries no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parsed entries, in source order.
    pub fn entries(&self) -> &[TagEntry] {
        &self.entries
    }

    /// Entry for `key`.
    pub fn get(&self, key: &str) -> Option<&TagEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// Unquoted value for `key`.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).map(TagEntry::value)
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for StructTag {
    type Err = TagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Error parsing a struct tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagParseError {
    /// A pair starts without a key.
    KeyNotSet { offset: usize },
    /// Key not followed by `:`.
    Syntax { key: String },
    /// Missing, unterminated or badly escaped quoted value.
    ValueSyntax { key: String },
    /// Two pairs not separated by whitespace.
    MissingSeparator { offset: usize },
    /// Same key used twice.
    DuplicateKey(String),
}

impl fmt::Display for TagParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyNotSet { offset } => write!(f, "tag key not set at offset {}", offset),
            Self::Syntax { key } => write!(f, "bad syntax for tag key {:?}", key),
            Self::ValueSyntax { key } => write!(f, "bad syntax for value of tag key {:?}", key),
            Self::MissingSeparator { offset } => {
                write!(f, "missing space between tag pairs at offset {}", offset)
            }
            Self::DuplicateKey(key) => write!(f, "duplicate tag key {:?}", key),
        }
    }
}

impl std::error::Error for TagParseError {}

fn parse_entries(raw: &str) -> Result<Vec<TagEntry>, TagParseError> {
    let bytes = raw.as_bytes();
    let len = bytes.len();
    let mut pos = 0;
    let mut entries: Vec<TagEntry> = Vec::new();

    loop {
        let gap_start = pos;
        while pos < len && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos == len {
            break;
        }
        if !entries.is_empty() && pos == gap_start {
            return Err(TagParseError::MissingSeparator { offset: pos });
        }

        // Key: printable, no ':' '"' or DEL. Stops on ASCII, so slicing is safe.
        let key_start = pos;
        while pos < len
            && bytes[pos] > b' '
            && bytes[pos] != b':'
            && bytes[pos] != b'"'
            && bytes[pos] != 0x7f
        {
            pos += 1;
        }
        if pos == key_start {
            return Err(TagParseError::KeyNotSet { offset: pos });
        }
        let key = &raw[key_start..pos];
        if pos + 1 >= len || bytes[pos] != b':' {
            return Err(TagParseError::Syntax {
                key: key.to_string(),
            });
        }
        if bytes[pos + 1] != b'"' {
            return Err(TagParseError::ValueSyntax {
                key: key.to_string(),
            });
        }

        let value_start = pos + 2;
        pos = value_start;
        while pos < len && bytes[pos] != b'"' {
            if bytes[pos] == b'\\' {
                pos += 1;
            }
            pos += 1;
        }
        if pos >= len {
            return Err(TagParseError::ValueSyntax {
                key: key.to_string(),
            });
        }
        let value = unquote(&raw[value_start..pos]).ok_or_else(|| TagParseError::ValueSyntax {
            key: key.to_string(),
        })?;
        pos += 1;

        if entries.iter().any(|e| e.key == key) {
            return Err(TagParseError::DuplicateKey(key.to_string()));
        }

        let mut parts = value.split(',');
        let name = parts.next().unwrap_or_default().to_string();
        let options = parts.map(str::to_string).collect();
        entries.push(TagEntry {
            key: key.to_string(),
            name,
            options,
        });
    }

    Ok(entries)
}

/// Resolve escapes in the body of a double-quoted string.
fn unquote(body: &str) -> Option<String> {
    let mut out: Vec<u8> = Vec::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        match c {
            '\n' => return None,
            '\\' => match chars.next()? {
                'n' => out.push(b'\n'),
                't' => out.push(b'\t'),
                'r' => out.push(b'\r'),
                'a' => out.push(0x07),
                'b' => out.push(0x08),
                'f' => out.push(0x0c),
                'v' => out.push(0x0b),
                '\\' => out.push(b'\\'),
                '"' => out.push(b'"'),
                'x' => out.push(u8::try_from(read_digits(&mut chars, 2, 16)?).ok()?),
                'u' => push_char(&mut out, char::from_u32(read_digits(&mut chars, 4, 16)?)?),
                'U' => push_char(&mut out, char::from_u32(read_digits(&mut chars, 8, 16)?)?),
                d @ '0'..='7' => {
                    let rest = read_digits(&mut chars, 2, 8)?;
                    let value = d.to_digit(8)? * 64 + rest;
                    out.push(u8::try_from(value).ok()?);
                }
                _ => return None,
            },
            other => push_char(&mut out, other),
        }
    }

    String::from_utf8(out).ok()
}

fn read_digits(chars: &mut std::str::Chars<'_>, count: usize, radix: u32) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..count {
        value = value * radix + chars.next()?.to_digit(radix)?;
    }
    Some(value)
}

fn push_char(out: &mut Vec<u8>, c: char) {
    let mut buf = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}
