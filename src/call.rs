use std::time::{Duration, SystemTime};

use crate::error::MetadataError;
use crate::metadata::CanonicalMetadata;
use crate::raw::RawValue;
use crate::sanitizer::sanitize_metadata;

/// How far past construction a mocked call's deadline lies.
pub const DEADLINE_OFFSET: Duration = Duration::from_secs(5);

/// A stand-in for an in-flight RPC, carrying only what handlers inspect.
///
/// The metadata is sanitized once, at construction, and the call is
/// immutable afterwards. The deadline is informational: nothing enforces it.
///
/// # Examples
///
/// ```
/// use grpc_mock::{MockedCall, RawValue};
///
/// let raw = RawValue::map([("authorization", "Bearer T")]);
/// let call = MockedCall::new(&raw).expect("valid metadata");
///
/// let view = call.single_req_view();
/// assert_eq!(
///     view.metadata().get("authorization").and_then(|v| v.as_str()),
///     Some("Bearer T")
/// );
/// assert_eq!(view.deadline(), call.deadline());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockedCall {
    metadata: CanonicalMetadata,
    deadline: SystemTime,
}

impl MockedCall {
    /// Creates a call from raw metadata.
    ///
    /// # Errors
    ///
    /// Returns the sanitizer's `MetadataError` unchanged if `raw` is invalid;
    /// no call is created in that case.
    pub fn new(raw: &RawValue) -> Result<Self, MetadataError> {
        let metadata = sanitize_metadata(raw)?;
        Ok(Self::with_metadata(metadata))
    }

    /// Creates a call with no metadata.
    pub fn empty() -> Self {
        Self::with_metadata(CanonicalMetadata::default())
    }

    fn with_metadata(metadata: CanonicalMetadata) -> Self {
        tracing::debug!(
            headers = metadata.len(),
            deadline_offset_secs = DEADLINE_OFFSET.as_secs(),
            "created mocked call"
        );

        Self {
            metadata,
            deadline: SystemTime::now() + DEADLINE_OFFSET,
        }
    }

    /// Returns the sanitized metadata the call was created with.
    pub fn metadata(&self) -> &CanonicalMetadata {
        &self.metadata
    }

    /// Returns the call's deadline.
    pub fn deadline(&self) -> SystemTime {
        self.deadline
    }

    /// Returns how long until the deadline, or `None` if it has passed.
    pub fn time_remaining(&self) -> Option<Duration> {
        self.deadline.duration_since(SystemTime::now()).ok()
    }

    /// Returns a view shaped like a unary (single request) call.
    pub fn single_req_view(&self) -> SingleReqView<'_> {
        SingleReqView::new(self)
    }

    /// Returns a view shaped like a client-streaming (multi request) call.
    pub fn multi_req_view(&self) -> MultiReqView<'_> {
        MultiReqView::new(self)
    }
}

impl Default for MockedCall {
    fn default() -> Self {
        Self::empty()
    }
}

/// Read-only view of a [`MockedCall`] for handlers of single-request RPCs.
///
/// Borrows the call; it holds no state of its own.
#[derive(Debug, Clone, Copy)]
pub struct SingleReqView<'a> {
    call: &'a MockedCall,
}

impl<'a> SingleReqView<'a> {
    pub(crate) fn new(call: &'a MockedCall) -> Self {
        Self { call }
    }

    /// Returns the metadata received with the call.
    pub fn metadata(&self) -> &'a CanonicalMetadata {
        self.call.metadata()
    }

    /// Returns the call's deadline.
    pub fn deadline(&self) -> SystemTime {
        self.call.deadline()
    }

    /// Returns how long until the deadline, or `None` if it has passed.
    pub fn time_remaining(&self) -> Option<Duration> {
        self.call.time_remaining()
    }

    /// Returns the call this view borrows.
    pub fn call(&self) -> &'a MockedCall {
        self.call
    }
}

/// Read-only view of a [`MockedCall`] for handlers of multi-request RPCs.
///
/// Borrows the call; it holds no state of its own.
#[derive(Debug, Clone, Copy)]
pub struct MultiReqView<'a> {
    call: &'a MockedCall,
}

impl<'a> MultiReqView<'a> {
    pub(crate) fn new(call: &'a MockedCall) -> Self {
        Self { call }
    }

    /// Returns the metadata received with the call.
    pub fn metadata(&self) -> &'a CanonicalMetadata {
        self.call.metadata()
    }

    /// Returns the call's deadline.
    pub fn deadline(&self) -> SystemTime {
        self.call.deadline()
    }

    /// Returns how long until the deadline, or `None` if it has passed.
    pub fn time_remaining(&self) -> Option<Duration> {
        self.call.time_remaining()
    }

    /// Returns the call this view borrows.
    pub fn call(&self) -> &'a MockedCall {
        self.call
    }
}
