//! Metadata sanitization and mocked calls for testing gRPC handlers.
//!
//! Handlers under test often read the metadata and deadline of the call
//! they serve. This crate builds a [`MockedCall`] carrying exactly that,
//! without any transport:
//! - **Sanitization**: raw, loosely-typed metadata is validated and folded
//!   into [`CanonicalMetadata`] by [`sanitize_metadata`]
//! - **Binary headers**: values under keys ending in `-bin` skip the
//!   printable-ASCII rule and are kept as raw bytes
//! - **Views**: [`SingleReqView`] and [`MultiReqView`] expose a call the way
//!   unary and client-streaming handlers see it
//!
//! # Core Types
//!
//! - [`RawValue`]: Untrusted input as supplied by test code
//! - [`CanonicalMetadata`]: Validated headers, lowercase names, one-or-many values
//! - [`HeaderValue`]: One header value, ASCII text or binary bytes
//! - [`MetadataError`]: `TypeMismatch` or `InvalidArgument` rejection
//! - [`MockedCall`]: Sanitized metadata plus a deadline
//!
//! # Examples
//!
//! ```
//! use grpc_mock::{MetadataValue, MockedCall, RawValue};
//!
//! let raw = RawValue::map([
//!     ("Authorization", RawValue::from("Bearer T")),
//!     ("X-Custom", RawValue::from(vec!["1", "2"])),
//! ]);
//!
//! let call = MockedCall::new(&raw).expect("metadata is valid");
//! let metadata = call.multi_req_view().metadata();
//!
//! assert_eq!(
//!     metadata.get("authorization"),
//!     Some(&MetadataValue::Scalar("Bearer T".into()))
//! );
//! assert_eq!(
//!     metadata.get("x-custom"),
//!     Some(&MetadataValue::Sequence(vec!["1".into(), "2".into()]))
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod call;
mod error;
mod metadata;
mod raw;
mod sanitizer;

#[cfg(test)]
mod test_utils;

pub use call::{DEADLINE_OFFSET, MockedCall, MultiReqView, SingleReqView};
pub use error::{MetadataError, MetadataErrorKind};
pub use metadata::{
    BINARY_HEADER_SUFFIX, CanonicalMetadata, HeaderEntry, HeaderValue, MetadataValue,
    is_binary_key,
};
pub use raw::RawValue;
pub use sanitizer::{
    MetadataSanitizer, Sanitizer, is_valid_header_key, is_valid_header_value, sanitize_metadata,
};
