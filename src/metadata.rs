//! Canonical, validated call metadata.

use std::fmt;

use bytes::Bytes;
use indexmap::IndexMap;

/// Suffix marking a header key as carrying a binary payload.
///
/// Values under such keys skip the printable-ASCII check and are stored
/// byte-for-byte as supplied.
pub const BINARY_HEADER_SUFFIX: &str = "-bin";

/// Returns `true` if `key` names a binary header.
///
/// The suffix is matched exactly as written: `trace-bin` is binary,
/// `trace-BIN` is not.
pub fn is_binary_key(key: &str) -> bool {
    key.ends_with(BINARY_HEADER_SUFFIX)
}

/// A single header value.
///
/// Values supplied under a `-bin` key are [`Binary`](Self::Binary) and kept
/// byte-for-byte. All other values are [`Ascii`](Self::Ascii): trimmed,
/// printable ASCII.
///
/// # Examples
///
/// ```
/// use grpc_mock::HeaderValue;
///
/// let text = HeaderValue::from("Bearer T");
/// assert_eq!(text.as_str(), Some("Bearer T"));
///
/// let binary = HeaderValue::from(vec![0xffu8, 0x00]);
/// assert!(binary.is_binary());
/// assert_eq!(binary.as_str(), None);
/// assert_eq!(binary.as_bytes(), &[0xff, 0x00]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HeaderValue {
    /// Printable ASCII text.
    Ascii(String),
    /// Arbitrary bytes from a `-bin` header.
    Binary(Bytes),
}

impl HeaderValue {
    /// Returns the text of an ASCII value, `None` for binary values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            HeaderValue::Ascii(s) => Some(s),
            HeaderValue::Binary(_) => None,
        }
    }

    /// Returns the raw bytes of the value, whichever variant it is.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            HeaderValue::Ascii(s) => s.as_bytes(),
            HeaderValue::Binary(b) => b,
        }
    }

    /// Returns `true` for values taken from a `-bin` header.
    pub fn is_binary(&self) -> bool {
        matches!(self, HeaderValue::Binary(_))
    }
}

impl From<&str> for HeaderValue {
    fn from(s: &str) -> Self {
        HeaderValue::Ascii(s.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(s: String) -> Self {
        HeaderValue::Ascii(s)
    }
}

impl From<&[u8]> for HeaderValue {
    fn from(b: &[u8]) -> Self {
        HeaderValue::Binary(Bytes::copy_from_slice(b))
    }
}

impl From<Vec<u8>> for HeaderValue {
    fn from(b: Vec<u8>) -> Self {
        HeaderValue::Binary(Bytes::from(b))
    }
}

impl From<Bytes> for HeaderValue {
    fn from(b: Bytes) -> Self {
        HeaderValue::Binary(b)
    }
}

impl PartialEq<str> for HeaderValue {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for HeaderValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Ascii(s) => write!(f, "{:?}", s),
            HeaderValue::Binary(b) => write!(f, "b\"{}\"", b.escape_ascii()),
        }
    }
}

/// A single validated `(key, value)` header pair.
///
/// Several entries may share a key; [`CanonicalMetadata`] folds them
/// together.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HeaderEntry {
    /// Lowercase header name.
    pub key: String,
    /// Header value.
    pub value: HeaderValue,
}

impl HeaderEntry {
    pub(crate) fn new(key: String, value: HeaderValue) -> Self {
        Self { key, value }
    }
}

/// The value stored under one header name.
///
/// A key seen once holds a [`Scalar`](Self::Scalar). A key seen two or more
/// times holds a [`Sequence`](Self::Sequence) in first-seen order; the
/// sanitizer never produces a one-element sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MetadataValue {
    /// The only value supplied for the key.
    Scalar(HeaderValue),
    /// Every value supplied for the key, in order.
    Sequence(Vec<HeaderValue>),
}

impl MetadataValue {
    /// Returns the value if this is a scalar.
    pub fn as_scalar(&self) -> Option<&HeaderValue> {
        match self {
            MetadataValue::Scalar(value) => Some(value),
            MetadataValue::Sequence(_) => None,
        }
    }

    /// Returns the values if this is a sequence.
    pub fn as_sequence(&self) -> Option<&[HeaderValue]> {
        match self {
            MetadataValue::Scalar(_) => None,
            MetadataValue::Sequence(values) => Some(values),
        }
    }

    /// Returns the text of an ASCII scalar.
    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(HeaderValue::as_str)
    }

    /// Returns the bytes of a scalar of either variant.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        self.as_scalar().map(HeaderValue::as_bytes)
    }

    /// Returns the first value supplied for the key.
    pub fn first(&self) -> Option<&HeaderValue> {
        self.iter().next()
    }

    /// Returns the number of values held.
    pub fn len(&self) -> usize {
        match self {
            MetadataValue::Scalar(_) => 1,
            MetadataValue::Sequence(values) => values.len(),
        }
    }

    /// Returns `true` if no values are held.
    ///
    /// Never the case for values produced by the sanitizer.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over every value, in order, regardless of variant.
    pub fn iter(&self) -> impl Iterator<Item = &HeaderValue> {
        let values: &[HeaderValue] = match self {
            MetadataValue::Scalar(value) => std::slice::from_ref(value),
            MetadataValue::Sequence(values) => values,
        };
        values.iter()
    }

    // Scalar on first push, promoted to a sequence on the second.
    fn push(&mut self, value: HeaderValue) {
        let current = std::mem::replace(self, MetadataValue::Sequence(Vec::new()));
        *self = match current {
            MetadataValue::Scalar(first) => MetadataValue::Sequence(vec![first, value]),
            MetadataValue::Sequence(mut values) => {
                values.push(value);
                MetadataValue::Sequence(values)
            }
        };
    }
}

impl PartialEq<str> for MetadataValue {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for MetadataValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl<const N: usize> PartialEq<[&str; N]> for MetadataValue {
    fn eq(&self, other: &[&str; N]) -> bool {
        self.as_sequence().is_some_and(|values| {
            values
                .iter()
                .map(HeaderValue::as_str)
                .eq(other.iter().map(|s| Some(*s)))
        })
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Scalar(value) => write!(f, "{}", value),
            MetadataValue::Sequence(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Validated call metadata, keyed by lowercase header name.
///
/// Keys keep the order in which they were first seen. Every key matches
/// `[a-z0-9-_.]+`. Every value is either trimmed printable ASCII or, when it
/// was supplied under a `-bin` key, the untouched bytes.
///
/// `CanonicalMetadata` cannot be built or modified by external code: the
/// only way to obtain one is through
/// [`sanitize_metadata`](crate::sanitize_metadata).
///
/// # Examples
///
/// ```
/// use grpc_mock::{RawValue, sanitize_metadata};
///
/// let raw = RawValue::map([
///     ("Authorization", RawValue::from("Bearer T")),
///     ("X-Custom", RawValue::from(vec!["1", "2"])),
/// ]);
/// let metadata = sanitize_metadata(&raw).expect("valid metadata");
///
/// assert_eq!(metadata.get("authorization").and_then(|v| v.as_str()), Some("Bearer T"));
/// assert_eq!(metadata.get("x-custom").map(|v| v.len()), Some(2));
///
/// for (key, value) in &metadata {
///     assert!(key.chars().all(|c| !c.is_ascii_uppercase()));
///     assert!(!value.is_empty());
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalMetadata {
    headers: IndexMap<String, MetadataValue>,
}

impl CanonicalMetadata {
    /// Folds validated entries into canonical form.
    ///
    /// This is `pub(crate)`: callers must have validated every entry.
    pub(crate) fn from_entries(entries: Vec<HeaderEntry>) -> Self {
        let mut headers: IndexMap<String, MetadataValue> = IndexMap::new();
        for HeaderEntry { key, value } in entries {
            match headers.get_mut(&key) {
                Some(existing) => existing.push(value),
                None => {
                    headers.insert(key, MetadataValue::Scalar(value));
                }
            }
        }
        Self { headers }
    }

    /// Returns the value stored for `key`.
    ///
    /// Lookup is case-insensitive since keys are stored lowercase.
    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        match self.headers.get(key) {
            Some(value) => Some(value),
            None => self.headers.get(&key.to_ascii_lowercase()),
        }
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns the number of distinct header names.
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Returns `true` if there are no headers.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Iterates over header names and values in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetadataValue)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over header names in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.headers.keys().map(String::as_str)
    }

    /// Flattens back to one entry per value.
    ///
    /// Entries are grouped by key (in first-seen key order), so the result
    /// differs from the sanitizer's input order when keys were interleaved.
    pub fn entries(&self) -> Vec<HeaderEntry> {
        self.iter()
            .flat_map(|(key, value)| {
                value
                    .iter()
                    .map(move |v| HeaderEntry::new(key.to_string(), v.clone()))
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a CanonicalMetadata {
    type Item = (&'a String, &'a MetadataValue);
    type IntoIter = indexmap::map::Iter<'a, String, MetadataValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.headers.iter()
    }
}
