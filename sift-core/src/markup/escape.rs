//! Entity decoding for parsed text and escaping for generated fragments

use std::borrow::Cow;

/// Bytes added when a bare `&` becomes `&amp;`
const AMP_SUFFIX: &str = "amp;";

/// Escape text content for insertion between tags
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a value for use inside a double-quoted attribute
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Resolve the name of an entity reference (without `&` and `;`)
pub(crate) fn resolve_entity(name: &str) -> Option<char> {
    if let Some(code) = name.strip_prefix('#') {
        let value = match code.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => code.parse::<u32>().ok()?,
        };
        return char::from_u32(value);
    }

    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "copy" => '\u{a9}',
        "hellip" => '\u{2026}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "check" => '\u{2713}',
        _ => return None,
    };
    Some(c)
}

/// Decode entity references in raw text; unknown references are kept verbatim
pub(crate) fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        match tail.find(';') {
            Some(end) if end > 0 && end <= 10 => match resolve_entity(&tail[..end]) {
                Some(c) => {
                    out.push(c);
                    rest = &tail[end + 1..];
                }
                None => {
                    out.push('&');
                    rest = tail;
                }
            },
            _ => {
                out.push('&');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Markup with every bare `&` rewritten to `&amp;`
///
/// HTML allows an ampersand that does not start a reference, the XML
/// tokenizer does not. Offsets reported against the rewritten text are
/// mapped back with [`Prepared::source_offset`].
#[derive(Debug)]
pub(crate) struct Prepared<'a> {
    pub text: Cow<'a, str>,
    /// Offsets in `text` just past each inserted suffix
    inserted: Vec<usize>,
}

impl Prepared<'_> {
    /// Map a byte offset in the rewritten text back to the source
    pub fn source_offset(&self, offset: usize) -> usize {
        let shifted = self.inserted.partition_point(|&end| end <= offset);
        offset - shifted * AMP_SUFFIX.len()
    }
}

pub(crate) fn escape_bare_ampersands(source: &str) -> Prepared<'_> {
    let bare: Vec<usize> = source
        .match_indices('&')
        .map(|(index, _)| index)
        .filter(|&index| !starts_reference(&source[index + 1..]))
        .collect();
    if bare.is_empty() {
        return Prepared {
            text: Cow::Borrowed(source),
            inserted: Vec::new(),
        };
    }

    let mut text = String::with_capacity(source.len() + bare.len() * AMP_SUFFIX.len());
    let mut inserted = Vec::with_capacity(bare.len());
    let mut copied = 0;
    for index in bare {
        text.push_str(&source[copied..=index]);
        text.push_str(AMP_SUFFIX);
        inserted.push(text.len());
        copied = index + 1;
    }
    text.push_str(&source[copied..]);

    Prepared {
        text: Cow::Owned(text),
        inserted,
    }
}

/// Whether the text after an `&` is a well-formed reference up to its `;`
fn starts_reference(tail: &str) -> bool {
    let end = tail
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '#'))
        .unwrap_or(tail.len());
    if !tail[end..].starts_with(';') {
        return false;
    }

    let name = &tail[..end];
    match name.strip_prefix('#') {
        Some(code) => match code.strip_prefix(['x', 'X']) {
            Some(hex) => !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()),
            None => !code.is_empty() && code.chars().all(|c| c.is_ascii_digit()),
        },
        None => {
            name.starts_with(|c: char| c.is_ascii_alphabetic())
                && name.chars().all(|c| c.is_ascii_alphanumeric())
        }
    }
}
