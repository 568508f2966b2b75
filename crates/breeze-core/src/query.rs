//! Query string parsing
//!
//! One reusable parser shared by all routes: the raw query substring is
//! split on `&`, each segment on its first `=`, and both halves are
//! percent-decoded. Values group under their key in the order seen, so a
//! repeated key keeps every value.

use crate::{Error, Result};

/// Decoded query parameters: key -> ordered values.
///
/// Key order follows first appearance in the query string; value order
/// follows appearance as well. Lookup is linear, which is fine for the
/// handful of parameters a query string carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryMap {
    entries: Vec<(String, Vec<String>)>,
}

impl QueryMap {
    /// Parse a raw query string (without the leading `?`), best-effort.
    ///
    /// Malformed input never fails here: an invalid `%` escape is kept
    /// literally, a segment without `=` becomes a key with an empty value,
    /// and decoded bytes that are not UTF-8 are replaced lossily. Use
    /// [`parse_strict`](Self::parse_strict) for the erroring variant.
    pub fn parse(raw: &str) -> Self {
        let mut map = Self::default();
        for segment in raw.split('&').filter(|s| !s.is_empty()) {
            let (key, value) = match segment.split_once('=') {
                Some((k, v)) => (k, v),
                None => (segment, ""),
            };
            map.append(percent_decode_lossy(key), percent_decode_lossy(value));
        }
        map
    }

    /// Parse a raw query string, rejecting malformed input.
    ///
    /// Returns [`Error::QueryDecode`] for an incomplete or non-hex `%`
    /// escape, or when decoded bytes are not valid UTF-8.
    pub fn parse_strict(raw: &str) -> Result<Self> {
        let mut map = Self::default();
        for segment in raw.split('&').filter(|s| !s.is_empty()) {
            let (key, value) = match segment.split_once('=') {
                Some((k, v)) => (k, v),
                None => (segment, ""),
            };
            map.append(percent_decode_strict(key)?, percent_decode_strict(value)?);
        }
        Ok(map)
    }

    fn append(&mut self, key: String, value: String) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// First value seen for the key. This is the documented selection
    /// policy for handlers picking a single parameter.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.all(key).first().map(|v| v.as_str())
    }

    /// All values seen for the key, in order. Empty if the key is absent.
    pub fn all(&self, key: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate keys and their grouped values in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Percent-decode, keeping invalid escapes literally.
fn percent_decode_lossy(input: &str) -> String {
    let mut out = Vec::with_capacity(input.len());
    let mut bytes = input.bytes();

    while let Some(b) = bytes.next() {
        match b {
            b'%' => {
                let hi = bytes.next();
                let lo = bytes.next();
                match decode_hex_pair(hi, lo) {
                    Some(byte) => out.push(byte),
                    None => {
                        out.push(b'%');
                        out.extend(hi);
                        out.extend(lo);
                    }
                }
            }
            b'+' => out.push(b' '),
            _ => out.push(b),
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// Percent-decode, erroring on invalid escapes or non-UTF-8 payloads.
fn percent_decode_strict(input: &str) -> Result<String> {
    let mut out = Vec::with_capacity(input.len());
    let mut bytes = input.bytes();

    while let Some(b) = bytes.next() {
        match b {
            b'%' => {
                let byte = decode_hex_pair(bytes.next(), bytes.next())
                    .ok_or_else(|| Error::QueryDecode(format!("invalid escape in {input:?}")))?;
                out.push(byte);
            }
            b'+' => out.push(b' '),
            _ => out.push(b),
        }
    }

    String::from_utf8(out).map_err(|_| Error::QueryDecode(format!("non-UTF-8 payload in {input:?}")))
}

fn decode_hex_pair(hi: Option<u8>, lo: Option<u8>) -> Option<u8> {
    let hi = (hi? as char).to_digit(16)?;
    let lo = (lo? as char).to_digit(16)?;
    Some((hi as u8) << 4 | lo as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_yields_empty_map() {
        assert!(QueryMap::parse("").is_empty());
        assert!(QueryMap::parse("&&").is_empty());
    }

    #[test]
    fn single_pair() {
        let map = QueryMap::parse("name=Marcin");
        assert_eq!(map.first("name"), Some("Marcin"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn repeated_key_groups_values_in_order() {
        let map = QueryMap::parse("name=A&name=B");
        assert_eq!(map.all("name"), &["A".to_string(), "B".to_string()]);
        // First-match selection policy
        assert_eq!(map.first("name"), Some("A"));
    }

    #[test]
    fn key_order_is_preserved() {
        let map = QueryMap::parse("b=1&a=2&b=3");
        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(map.all("b"), &["1".to_string(), "3".to_string()]);
    }

    #[test]
    fn percent_decoding_round_trips() {
        let map = QueryMap::parse("name=Marcin%20K");
        assert_eq!(map.first("name"), Some("Marcin K"));

        // multi-byte UTF-8 escape
        let map = QueryMap::parse("name=Zo%C3%AB");
        assert_eq!(map.first("name"), Some("Zoë"));
    }

    #[test]
    fn plus_decodes_to_space() {
        let map = QueryMap::parse("name=Marcin+K");
        assert_eq!(map.first("name"), Some("Marcin K"));
    }

    #[test]
    fn keys_are_decoded_too() {
        let map = QueryMap::parse("full%20name=x");
        assert_eq!(map.first("full name"), Some("x"));
    }

    #[test]
    fn value_with_equals_splits_on_first() {
        let map = QueryMap::parse("expr=a=b");
        assert_eq!(map.first("expr"), Some("a=b"));
    }

    #[test]
    fn bare_key_becomes_empty_value() {
        let map = QueryMap::parse("flag&name=x");
        assert_eq!(map.first("flag"), Some(""));
        assert!(map.contains_key("flag"));
    }

    #[test]
    fn lenient_keeps_invalid_escape_literally() {
        let map = QueryMap::parse("name=50%");
        assert_eq!(map.first("name"), Some("50%"));

        let map = QueryMap::parse("name=a%zzb");
        assert_eq!(map.first("name"), Some("a%zzb"));
    }

    #[test]
    fn strict_rejects_invalid_escape() {
        assert!(QueryMap::parse_strict("name=50%").is_err());
        assert!(QueryMap::parse_strict("name=a%zzb").is_err());
        assert!(matches!(
            QueryMap::parse_strict("name=%ff"),
            Err(Error::QueryDecode(_))
        ));
    }

    #[test]
    fn strict_accepts_well_formed() {
        let map = QueryMap::parse_strict("name=Marcin%20K&name=B").unwrap();
        assert_eq!(map.first("name"), Some("Marcin K"));
        assert_eq!(map.all("name").len(), 2);
    }
}
