use bytes::Bytes;

use crate::error::MetadataError;
use crate::metadata::{CanonicalMetadata, HeaderEntry, HeaderValue, is_binary_key};
use crate::raw::RawValue;

/// Trait for turning untrusted input into validated output.
///
/// # Invariants
///
/// Implementations MUST:
/// - Validate the whole input before producing any output
/// - Return `Err(MetadataError)` on the first violation, with no partial result
/// - Be free of side effects other than logging
///
/// # Examples
///
/// ```
/// use grpc_mock::{MetadataSanitizer, RawValue, Sanitizer};
///
/// fn header_count<S: Sanitizer<RawValue, Output = grpc_mock::CanonicalMetadata>>(
///     sanitizer: &S,
///     raw: &RawValue,
/// ) -> usize {
///     sanitizer.sanitize(raw).map(|m| m.len()).unwrap_or(0)
/// }
///
/// let raw = RawValue::map([("a", "1"), ("b", "2")]);
/// assert_eq!(header_count(&MetadataSanitizer, &raw), 2);
/// ```
pub trait Sanitizer<T: ?Sized> {
    /// The validated form of `T`.
    type Output;

    /// Validates `input`, returning its canonical form on success.
    ///
    /// # Errors
    ///
    /// Returns `MetadataError` if the input fails validation.
    fn sanitize(&self, input: &T) -> Result<Self::Output, MetadataError>;
}

/// Sanitizer for gRPC-style call metadata.
///
/// Accepts a mapping of string or symbol keys to a string, a byte string or
/// a list of those, and produces [`CanonicalMetadata`]:
/// - Keys must match `[a-z0-9-_.]+` (case-insensitive) and are stored lowercase
/// - Values under keys ending in `-bin` (as supplied) are kept byte-for-byte
///   as [`HeaderValue::Binary`]
/// - All other values must be non-empty printable ASCII and are trimmed
/// - Repeated keys collect their values in order
///
/// # Examples
///
/// ```
/// use grpc_mock::{MetadataSanitizer, MetadataValue, RawValue, Sanitizer};
///
/// let raw = RawValue::map([("X-Request", " abc "), ("x-request", "def")]);
/// let metadata = MetadataSanitizer.sanitize(&raw).expect("valid metadata");
///
/// assert_eq!(
///     metadata.get("x-request"),
///     Some(&MetadataValue::Sequence(vec!["abc".into(), "def".into()]))
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataSanitizer;

impl Sanitizer<RawValue> for MetadataSanitizer {
    type Output = CanonicalMetadata;

    fn sanitize(&self, input: &RawValue) -> Result<CanonicalMetadata, MetadataError> {
        sanitize_metadata(input)
    }
}

/// Validates and canonicalizes raw call metadata.
///
/// All-or-nothing: the first invalid key or value aborts the whole
/// operation and nothing is returned but the error.
///
/// # Errors
///
/// - `TypeMismatch` if `raw` is not a mapping, a key is neither string nor
///   symbol, or a list value holds an element that is neither string nor
///   byte string
/// - `InvalidArgument` if a key has characters outside `[a-z0-9-_.]`, a
///   value is neither string, byte string nor list, or a non-binary value is
///   not printable ASCII
///
/// # Examples
///
/// ```
/// use grpc_mock::{MetadataErrorKind, RawValue, sanitize_metadata};
///
/// let ok = sanitize_metadata(&RawValue::map([("x", " v ")])).expect("valid");
/// assert_eq!(ok.get("x").and_then(|v| v.as_str()), Some("v"));
///
/// let raw = RawValue::map([("x-bin", RawValue::bytes([0xffu8, 0x00]))]);
/// let ok = sanitize_metadata(&raw).expect("valid");
/// assert_eq!(ok.get("x-bin").and_then(|v| v.as_bytes()), Some(&[0xff, 0x00][..]));
///
/// let err = sanitize_metadata(&RawValue::map([("bad key", "v")])).unwrap_err();
/// assert_eq!(err.kind(), MetadataErrorKind::InvalidArgument);
///
/// let err = sanitize_metadata(&RawValue::from("not a map")).unwrap_err();
/// assert_eq!(err.kind(), MetadataErrorKind::TypeMismatch);
/// ```
pub fn sanitize_metadata(raw: &RawValue) -> Result<CanonicalMetadata, MetadataError> {
    let entries = match flatten(raw) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(
                kind = %err.kind(),
                reason = %err.message(),
                "rejected call metadata"
            );
            return Err(err);
        }
    };

    let entry_count = entries.len();
    let metadata = CanonicalMetadata::from_entries(entries);
    tracing::trace!(keys = metadata.len(), entries = entry_count, "sanitized call metadata");

    Ok(metadata)
}

/// Returns `true` if `key` is a syntactically valid header name.
///
/// Valid names are non-empty and consist of ASCII letters (either case),
/// digits, `-`, `_` and `.`.
pub fn is_valid_header_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
}

/// Returns `true` if `value` may be sent under a non-binary header.
///
/// Valid values are non-empty and consist only of printable ASCII,
/// space (0x20) through tilde (0x7E).
pub fn is_valid_header_value(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| (b' '..=b'~').contains(&b))
}

// One entry per (key, element), in input order, every entry validated.
fn flatten(raw: &RawValue) -> Result<Vec<HeaderEntry>, MetadataError> {
    let RawValue::Map(pairs) = raw else {
        return Err(MetadataError::type_mismatch(format!(
            "got <{}>, want <mapping>",
            raw.type_name()
        )));
    };

    let mut entries = Vec::with_capacity(pairs.len());
    for (key, value) in pairs {
        let key = validate_key(key)?;
        // Matched as supplied: `Data-BIN` is a plain key.
        let binary = is_binary_key(key);
        let stored = key.to_ascii_lowercase();

        let elements = match value {
            RawValue::Str(_) | RawValue::Bytes(_) => std::slice::from_ref(value),
            RawValue::List(items) => items.as_slice(),
            _ => {
                return Err(MetadataError::invalid_argument(
                    "header values must be of type string or array",
                ))
            }
        };

        for element in elements {
            let bytes = match element {
                RawValue::Str(s) => s.as_bytes(),
                RawValue::Bytes(b) => b.as_ref(),
                _ => {
                    return Err(MetadataError::type_mismatch(
                        "header value must be of type string",
                    ))
                }
            };

            let value = if binary {
                match element {
                    RawValue::Bytes(b) => HeaderValue::Binary(b.clone()),
                    _ => HeaderValue::Binary(Bytes::copy_from_slice(bytes)),
                }
            } else {
                HeaderValue::Ascii(validate_value(key, bytes)?)
            };
            entries.push(HeaderEntry::new(stored.clone(), value));
        }
    }

    Ok(entries)
}

fn validate_key(key: &RawValue) -> Result<&str, MetadataError> {
    let key = key
        .as_key_str()
        .ok_or_else(|| MetadataError::type_mismatch("bad type for key parameter"))?;

    if !is_valid_header_key(key) {
        return Err(MetadataError::invalid_argument(format!(
            "'{}' is an invalid header key",
            key
        )));
    }

    Ok(key)
}

// The message names the key only, never the value.
fn validate_value(key: &str, value: &[u8]) -> Result<String, MetadataError> {
    match std::str::from_utf8(value) {
        Ok(text) if is_valid_header_value(text) => Ok(text.trim().to_string()),
        _ => Err(MetadataError::invalid_argument(format!(
            "header value for '{}' has invalid characters",
            key
        ))),
    }
}
