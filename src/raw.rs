//! Loosely-typed metadata as it arrives from callers.
//!
//! Test code hands metadata to a mocked call in whatever shape it has at
//! hand, so the boundary type has to be able to represent wrong shapes too.
//! [`RawValue`] is a closed union covering everything the sanitizer may be
//! given; only a [`RawValue::Map`] of string/symbol keys to string, byte or
//! list values survives sanitization.

use std::fmt;

use bytes::Bytes;

/// An untrusted, loosely-typed datum supplied as call metadata.
///
/// Nothing about a `RawValue` has been validated. Pass it through
/// [`sanitize_metadata`](crate::sanitize_metadata) (or construct a
/// [`MockedCall`](crate::MockedCall)) to obtain canonical metadata.
///
/// # Examples
///
/// ```
/// use grpc_mock::RawValue;
///
/// let raw = RawValue::map([
///     ("authorization", RawValue::from("Bearer T")),
///     ("x-custom", RawValue::from(vec!["1", "2"])),
/// ]);
///
/// assert_eq!(raw.type_name(), "mapping");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// A string.
    Str(String),
    /// A symbolic identifier; accepted wherever a string key is.
    Symbol(String),
    /// A byte string, not necessarily UTF-8. Accepted as a header value but
    /// never as a key.
    Bytes(Bytes),
    /// An integer.
    Int(i64),
    /// A boolean.
    Bool(bool),
    /// The absent value.
    Nil,
    /// An ordered sequence.
    List(Vec<RawValue>),
    /// An ordered mapping. Entry order is the order the caller supplied.
    Map(Vec<(RawValue, RawValue)>),
}

impl RawValue {
    /// Creates a symbol value.
    pub fn symbol(name: impl Into<String>) -> Self {
        RawValue::Symbol(name.into())
    }

    /// Creates a byte string by copying `data`.
    pub fn bytes(data: impl AsRef<[u8]>) -> Self {
        RawValue::Bytes(Bytes::copy_from_slice(data.as_ref()))
    }

    /// Creates a list from anything convertible into raw values.
    pub fn list<T: Into<RawValue>>(items: impl IntoIterator<Item = T>) -> Self {
        RawValue::List(items.into_iter().map(Into::into).collect())
    }

    /// Creates a mapping, keeping the iteration order of `entries`.
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<RawValue>,
        V: Into<RawValue>,
    {
        RawValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Creates an empty mapping.
    pub fn empty_map() -> Self {
        RawValue::Map(Vec::new())
    }

    /// Returns the name of this value's shape, as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            RawValue::Str(_) => "string",
            RawValue::Symbol(_) => "symbol",
            RawValue::Bytes(_) => "bytes",
            RawValue::Int(_) => "integer",
            RawValue::Bool(_) => "boolean",
            RawValue::Nil => "nil",
            RawValue::List(_) => "list",
            RawValue::Map(_) => "mapping",
        }
    }

    /// Returns the string form of a string or symbol, `None` for anything else.
    pub fn as_key_str(&self) -> Option<&str> {
        match self {
            RawValue::Str(s) | RawValue::Symbol(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Str(s) => write!(f, "{:?}", s),
            RawValue::Symbol(s) => write!(f, ":{}", s),
            RawValue::Bytes(b) => write!(f, "b\"{}\"", b.escape_ascii()),
            RawValue::Int(i) => write!(f, "{}", i),
            RawValue::Bool(b) => write!(f, "{}", b),
            RawValue::Nil => write!(f, "nil"),
            RawValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            RawValue::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} => {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Str(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Str(s)
    }
}

impl From<i64> for RawValue {
    fn from(i: i64) -> Self {
        RawValue::Int(i)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

impl From<Bytes> for RawValue {
    fn from(b: Bytes) -> Self {
        RawValue::Bytes(b)
    }
}

impl<T: Into<RawValue>> From<Vec<T>> for RawValue {
    fn from(items: Vec<T>) -> Self {
        RawValue::list(items)
    }
}

impl<K, V> FromIterator<(K, V)> for RawValue
where
    K: Into<RawValue>,
    V: Into<RawValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        RawValue::map(iter)
    }
}
