//! Flat navigation parameters.
//!
//! [`QueryParams`] is the string-keyed bag carried by redirects and named
//! navigations and appended to URLs as a query string. It has no schema:
//! any key the caller supplies is kept, and values are always strings.
//!
//! Keys are stored in sorted order so that generated URLs are stable.
//!
//! # Example
//!
//! ```
//! use shell_navigator::QueryParams;
//!
//! let params = QueryParams::from_pairs([("from", "Govern"), ("userId", "1")]);
//! assert_eq!(params.to_query_string(), "from=Govern&userId=1");
//!
//! let parsed = QueryParams::from_query_string("from=Govern&userId=1");
//! assert_eq!(parsed, params);
//! assert_eq!(parsed.get_as::<u32>("userId"), Some(1));
//! ```

use std::collections::BTreeMap;

/// Flat string-to-string navigation parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: BTreeMap<String, String>,
}

impl QueryParams {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(key, value)` pairs. Later duplicates overwrite earlier ones.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            params: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parse the part of a URL after `?`.
    ///
    /// Pairs without `=` are kept with an empty value. When a key repeats,
    /// the last occurrence wins.
    pub fn from_query_string(query: &str) -> Self {
        let mut params = BTreeMap::new();

        for pair in query.trim_start_matches('?').split('&') {
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            params.insert(decode_uri_component(key), decode_uri_component(value));
        }

        Self { params }
    }

    /// Get a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Get a value and parse it, `None` if missing or unparsable.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.params.get(key)?.parse().ok()
    }

    /// Insert or overwrite a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.params.remove(key)
    }

    /// Return `true` if the key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Overlay `other` on top of `self`; keys in `other` win.
    pub fn merge(&self, other: &QueryParams) -> QueryParams {
        let mut merged = self.clone();
        for (key, value) in &other.params {
            merged.params.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Serialize into `key=value&...` form with percent-encoding.
    pub fn to_query_string(&self) -> String {
        self.params
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    encode_uri_component(key),
                    encode_uri_component(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

/// Percent-encode everything outside the RFC 3986 unreserved set, byte by byte.
fn encode_uri_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Reverse of [`encode_uri_component`]; `+` decodes to a space and malformed
/// escapes are kept verbatim.
fn decode_uri_component(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit() =>
            {
                out.push((hex_value(bytes[i + 1]) << 4) | hex_value(bytes[i + 2]));
                i += 3;
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// Value of an ASCII hex digit; callers check `is_ascii_hexdigit` first.
fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params_basic() {
        let params = QueryParams::from_query_string("from=Govern&token=1234567890&userId=1");

        assert_eq!(params.get("from"), Some("Govern"));
        assert_eq!(params.get("token"), Some("1234567890"));
        assert_eq!(params.get_as::<u64>("token"), Some(1_234_567_890));
        assert_eq!(params.get("missing"), None);
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_leading_question_mark_and_empty_pairs() {
        let params = QueryParams::from_query_string("?a=1&&flag");
        assert_eq!(params.get("a"), Some("1"));
        assert_eq!(params.get("flag"), Some(""));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let params = QueryParams::from_query_string("tab=a&tab=b");
        assert_eq!(params.get("tab"), Some("b"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_to_query_string_is_sorted() {
        let params = QueryParams::new().with("userId", "1").with("from", "Govern");
        assert_eq!(params.to_query_string(), "from=Govern&userId=1");
    }

    #[test]
    fn test_uri_encoding() {
        assert_eq!(encode_uri_component("hello world"), "hello%20world");
        assert_eq!(encode_uri_component("a@b"), "a%40b");
        assert_eq!(encode_uri_component("测"), "%E6%B5%8B");
    }

    #[test]
    fn test_uri_decoding() {
        assert_eq!(decode_uri_component("hello%20world"), "hello world");
        assert_eq!(decode_uri_component("hello+world"), "hello world");
        assert_eq!(decode_uri_component("%E6%B5%8B"), "测");
        assert_eq!(decode_uri_component("100%"), "100%");
        assert_eq!(decode_uri_component("%zz"), "%zz");
        assert_eq!(decode_uri_component("%+5"), "%+5");
        assert_eq!(decode_uri_component("%-1x"), "%-1x");
        assert_eq!(decode_uri_component("%e6%b5%8b"), "测");
        assert_eq!(
            QueryParams::from_query_string("a=%+5").get("a"),
            Some("%+5")
        );
    }

    #[test]
    fn test_remove() {
        let mut params = landing();
        assert_eq!(params.remove("token"), Some("1234567890".to_string()));
        assert_eq!(params.remove("token"), None);
        assert!(!params.contains("token"));
        assert_eq!(params.to_query_string(), "from=Govern&userId=1");
    }

    fn landing() -> QueryParams {
        QueryParams::from_pairs([("from", "Govern"), ("token", "1234567890"), ("userId", "1")])
    }

    #[test]
    fn test_merge_overrides() {
        let base = QueryParams::from_pairs([("from", "Govern"), ("userId", "1")]);
        let over = QueryParams::from_pairs([("userId", "2")]);
        let merged = base.merge(&over);
        assert_eq!(merged.get("from"), Some("Govern"));
        assert_eq!(merged.get("userId"), Some("2"));
    }

    #[test]
    fn test_empty_query_string() {
        assert!(QueryParams::from_query_string("").is_empty());
        assert_eq!(QueryParams::new().to_query_string(), "");
    }
}
