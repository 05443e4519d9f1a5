//! Strict `application/x-www-form-urlencoded` decoding
//!
//! Used for both query strings and form bodies. Values reach the CA exactly
//! as the client encoded them: a stray `%` escape or bytes that are not
//! UTF-8 once decoded reject the whole input instead of being patched up.

use std::borrow::Cow;

use percent_encoding::percent_decode;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid percent escape")]
    BadEscape,

    #[error("decoded bytes are not valid UTF-8")]
    NotUtf8,
}

/// Decode `name=value` pairs separated by `&`
///
/// Empty segments and pairs with an empty name are skipped. A segment
/// without `=` is a name with an empty value.
pub fn decode_pairs(input: &[u8]) -> Result<Vec<(String, String)>, DecodeError> {
    let mut pairs = Vec::new();

    for segment in input.split(|&b| b == b'&').filter(|s| !s.is_empty()) {
        let (name, value) = match segment.iter().position(|&b| b == b'=') {
            Some(at) => (&segment[..at], &segment[at + 1..]),
            None => (segment, &[][..]),
        };

        let name = decode_component(name)?;
        if name.is_empty() {
            continue;
        }
        pairs.push((name, decode_component(value)?));
    }

    Ok(pairs)
}

fn decode_component(raw: &[u8]) -> Result<String, DecodeError> {
    if !escapes_well_formed(raw) {
        return Err(DecodeError::BadEscape);
    }

    let spaced: Cow<'_, [u8]> = if raw.contains(&b'+') {
        Cow::Owned(
            raw.iter()
                .map(|&b| if b == b'+' { b' ' } else { b })
                .collect(),
        )
    } else {
        Cow::Borrowed(raw)
    };

    percent_decode(&spaced)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|_| DecodeError::NotUtf8)
}

/// Every `%` must be followed by two hex digits
fn escapes_well_formed(raw: &[u8]) -> bool {
    let mut rest = raw;
    while let Some(at) = rest.iter().position(|&b| b == b'%') {
        match rest.get(at + 1..at + 3) {
            Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
                rest = &rest[at + 3..];
            }
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(input: &str) -> Vec<(String, String)> {
        decode_pairs(input.as_bytes()).unwrap()
    }

    #[test]
    fn test_decodes_escapes_and_plus() {
        assert_eq!(
            pairs("csr=-----BEGIN+CERTIFICATE+REQUEST-----%0AMIIB%2B%2F%3D&psk=a%20b"),
            vec![
                (
                    "csr".to_string(),
                    "-----BEGIN CERTIFICATE REQUEST-----\nMIIB+/=".to_string()
                ),
                ("psk".to_string(), "a b".to_string()),
            ]
        );
    }

    #[test]
    fn test_skips_empty_segments_and_names() {
        assert_eq!(
            pairs("&&a=1&=orphan&flag&"),
            vec![
                ("a".to_string(), "1".to_string()),
                ("flag".to_string(), String::new()),
            ]
        );
        assert!(pairs("").is_empty());
    }

    #[test]
    fn test_value_may_contain_equals() {
        assert_eq!(
            pairs("token=abc==&x=a=b"),
            vec![
                ("token".to_string(), "abc==".to_string()),
                ("x".to_string(), "a=b".to_string()),
            ]
        );
    }

    #[test]
    fn test_rejects_bad_escapes() {
        for input in ["x=%zz", "x=%", "x=%4", "%g1=v", "x=ok%2"] {
            assert_eq!(
                decode_pairs(input.as_bytes()),
                Err(DecodeError::BadEscape),
                "{input}"
            );
        }
    }

    #[test]
    fn test_rejects_non_utf8() {
        assert_eq!(decode_pairs(b"csr=%ff%fe"), Err(DecodeError::NotUtf8));
        assert_eq!(decode_pairs(b"csr=\xff"), Err(DecodeError::NotUtf8));
    }

    #[test]
    fn test_multibyte_utf8_passes_through() {
        assert_eq!(
            pairs("cn=%C3%A9t%C3%A9"),
            vec![("cn".to_string(), "été".to_string())]
        );
    }
}
