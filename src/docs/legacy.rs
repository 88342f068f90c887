//! The documentation generator's script form of the index
//!
//! Older doc builds ship the table as a script that assigns a literal to a
//! global, for the search widget to pick up:
//!
//! ```text
//! var DATA = [
//!       { id:0, label:"org.nnsoft.guice.rocoto", link:"org/nnsoft/guice/rocoto/package-summary.html", type:"package" },
//!       { id:1, label:"org.nnsoft.guice.rocoto.Rocoto", link:"org/nnsoft/guice/rocoto/Rocoto.html", type:"class" }
//!
//!     ];
//! ```
//!
//! Only that shape is accepted: unquoted keys in the order `id`, `label`,
//! `link`, `type`, and double-quoted string values. String escapes are
//! decoded as JS does (`\uXXXX` included); unknown escapes are an error.
//! A leading byte order mark is skipped.

use lazy_static::lazy_static;
use regex::Regex;
use std::str::Chars;

use super::error::MalformedIndexError;
use super::types::{DocEntry, DocIndex, EntryKind};

lazy_static! {
    static ref HEADER: Regex = Regex::new(r"^\s*var\s+DATA\s*=\s*\[").expect("valid header pattern");
    static ref RECORD: Regex = Regex::new(
        r#"^\{\s*id\s*:\s*(\d+)\s*,\s*label\s*:\s*"((?:[^"\\]|\\.)*)"\s*,\s*link\s*:\s*"((?:[^"\\]|\\.)*)"\s*,\s*type\s*:\s*"((?:[^"\\]|\\.)*)"\s*\}"#
    )
    .expect("valid record pattern");
    static ref FOOTER: Regex = Regex::new(r"^\]\s*;?\s*$").expect("valid footer pattern");
}

const RECORD_INDENT: &str = "      ";
const FOOTER_TEXT: &str = "\n\n    ];\n";

/// Parse a `var DATA = [ ... ];` script into a validated index
pub fn parse(source: &str) -> Result<DocIndex, MalformedIndexError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let header = HEADER
        .find(source)
        .ok_or_else(|| error_at(source, 0, "expected `var DATA = [`"))?;

    let mut pos = header.end();
    let mut entries = Vec::new();

    loop {
        pos = skip_whitespace(source, pos);
        if source[pos..].starts_with(']') {
            break;
        }

        let caps = RECORD.captures(&source[pos..]).ok_or_else(|| {
            error_at(
                source,
                pos,
                "expected a `{ id:..., label:\"...\", link:\"...\", type:\"...\" }` record",
            )
        })?;

        let id = caps[1]
            .parse::<usize>()
            .map_err(|e| error_at(source, pos, &format!("invalid id '{}': {}", &caps[1], e)))?;
        let field = |idx: usize| {
            unescape(&caps[idx]).map_err(|reason| error_at(source, pos, &reason))
        };
        let label = field(2)?;
        let link = field(3)?;
        let kind = field(4)?
            .parse::<EntryKind>()
            .map_err(|reason| error_at(source, pos, &reason))?;

        entries.push(DocEntry {
            id,
            label,
            link,
            kind,
        });

        pos += caps.get(0).map_or(0, |m| m.end());
        pos = skip_whitespace(source, pos);

        match source[pos..].chars().next() {
            Some(',') => pos += 1,
            Some(']') => break,
            _ => return Err(error_at(source, pos, "expected `,` or `]` after a record")),
        }
    }

    if !FOOTER.is_match(&source[pos..]) {
        return Err(error_at(source, pos, "unexpected text after the closing `]`"));
    }

    DocIndex::from_entries(entries)
}

/// Write an index in the generator's script layout
pub fn render(index: &DocIndex) -> String {
    let records: Vec<String> = index
        .iter()
        .map(|e| {
            format!(
                "{}{{ id:{}, label:\"{}\", link:\"{}\", type:\"{}\" }}",
                RECORD_INDENT,
                e.id,
                escape(&e.label),
                escape(&e.link),
                e.kind
            )
        })
        .collect();

    format!("var DATA = [\n{}{}", records.join(",\n"), FOOTER_TEXT)
}

fn skip_whitespace(source: &str, pos: usize) -> usize {
    let rest = &source[pos..];
    pos + (rest.len() - rest.trim_start().len())
}

fn error_at(source: &str, pos: usize, reason: &str) -> MalformedIndexError {
    MalformedIndexError::Legacy {
        line: source[..pos].matches('\n').count() + 1,
        reason: reason.to_string(),
    }
}

/// Decode a JS string literal body
fn unescape(raw: &str) -> Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let decoded = match chars.next() {
            Some('"') => '"',
            Some('\'') => '\'',
            Some('\\') => '\\',
            Some('/') => '/',
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some('b') => '\u{8}',
            Some('f') => '\u{c}',
            Some('u') => decode_unicode(&mut chars)?,
            Some(other) => return Err(format!("unsupported escape '\\{}'", other)),
            None => return Err("dangling '\\' at the end of a string".to_string()),
        };
        out.push(decoded);
    }
    Ok(out)
}

/// `\uXXXX` after the `\u`, joining UTF-16 surrogate pairs
fn decode_unicode(chars: &mut Chars<'_>) -> Result<char, String> {
    let unit = read_hex4(chars)?;
    let code = match unit {
        0xD800..=0xDBFF => {
            if chars.next() != Some('\\') || chars.next() != Some('u') {
                return Err(format!("unpaired surrogate '\\u{:04x}'", unit));
            }
            let low = read_hex4(chars)?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(format!("unpaired surrogate '\\u{:04x}'", unit));
            }
            0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
        }
        0xDC00..=0xDFFF => return Err(format!("unpaired surrogate '\\u{:04x}'", unit)),
        other => other,
    };
    char::from_u32(code).ok_or_else(|| format!("invalid code point U+{:X}", code))
}

fn read_hex4(chars: &mut Chars<'_>) -> Result<u32, String> {
    let digits: String = chars.by_ref().take(4).collect();
    if digits.chars().count() != 4 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("invalid unicode escape '\\u{}'", digits));
    }
    u32::from_str_radix(&digits, 16)
        .map_err(|e| format!("invalid unicode escape '\\u{}': {}", digits, e))
}

/// Encode a value as a JS string literal body. Control characters and the
/// line/paragraph separators never appear raw.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if (c as u32) < 0x20 || c == '\u{2028}' || c == '\u{2029}' => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            other => out.push(other),
        }
    }
    out
}
