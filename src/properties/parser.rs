//! Reader for the `.properties` key/value text format.
//!
//! Supports `key=value`, `key:value` and `key value` entries, `#` and `!`
//! comment lines, backslash line continuations and the `\t \n \r \f \uXXXX`
//! escapes. Any other escaped character stands for itself.

use thiserror::Error;

use super::PropertyFile;

/// Malformed properties text. `line` is the 1-based line the entry starts on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

/// Parses properties text. Later duplicates of a key replace earlier ones.
pub fn parse(text: &str) -> Result<PropertyFile, ParseError> {
    let normalized = text.replace("\r\n", "\n");
    let mut lines = normalized.split(['\n', '\r']).enumerate();
    let mut file = PropertyFile::default();

    while let Some((index, line)) = lines.next() {
        let line = line.trim_start_matches(is_blank);
        if line.is_empty() || line.starts_with(['#', '!']) {
            continue;
        }

        let mut logical = line.to_string();
        while continues(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start_matches(is_blank)),
                None => break,
            }
        }

        let line_no = index + 1;
        let (key, value) = split_entry(&logical);
        file.insert(unescape(key, line_no)?, unescape(value, line_no)?);
    }

    Ok(file)
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// A line continues when it ends in an odd number of backslashes.
fn continues(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Splits a logical line into its raw (still escaped) key and value.
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();

    for (i, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                break;
            }
            c if is_blank(c) => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let rest = line[key_end..].trim_start_matches(is_blank);
    let rest = rest.strip_prefix(['=', ':']).unwrap_or(rest);
    (&line[..key_end], rest.trim_start_matches(is_blank))
}

fn unescape(raw: &str, line: usize) -> Result<String, ParseError> {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        match chars.next() {
            Some('t') => result.push('\t'),
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('f') => result.push('\x0c'),
            Some('u') => result.push(unicode_escape(&mut chars, line)?),
            Some(other) => result.push(other),
            // A dangling backslash at end of input is dropped
            None => {}
        }
    }

    Ok(result)
}

/// Decodes the `XXXX` of a `\uXXXX` escape, pairing UTF-16 surrogates.
fn unicode_escape(chars: &mut std::str::Chars, line: usize) -> Result<char, ParseError> {
    let high = hex_unit(chars, line)?;
    if !(0xD800..0xDC00).contains(&high) {
        return char::from_u32(u32::from(high)).ok_or_else(|| unpaired(line));
    }

    if chars.next() != Some('\\') || chars.next() != Some('u') {
        return Err(unpaired(line));
    }
    let low = hex_unit(chars, line)?;
    char::decode_utf16([high, low])
        .next()
        .and_then(Result::ok)
        .ok_or_else(|| unpaired(line))
}

fn hex_unit(chars: &mut std::str::Chars, line: usize) -> Result<u16, ParseError> {
    let digits: String = chars.by_ref().take(4).collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ParseError {
            line,
            message: format!("malformed \\uXXXX escape: \\u{digits}"),
        });
    }
    u16::from_str_radix(&digits, 16).map_err(|e| ParseError {
        line,
        message: e.to_string(),
    })
}

fn unpaired(line: usize) -> ParseError {
    ParseError {
        line,
        message: "unpaired UTF-16 surrogate in \\u escape".to_string(),
    }
}
