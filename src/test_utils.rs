//! Shared proptest strategies for unit tests.

use proptest::prelude::*;

use crate::RawValue;

/// Header names: letters of either case, digits, `-`, `_`, `.`.
pub(crate) fn arb_header_key() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z0-9_.-]{1,16}").expect("valid regex")
}

/// Non-empty printable ASCII, possibly padded with spaces.
pub(crate) fn arb_ascii_value() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ -~]{1,32}").expect("valid regex")
}

/// A string, a printable byte string or a list of strings, as accepted for
/// one header.
pub(crate) fn arb_header_value() -> impl Strategy<Value = RawValue> {
    prop_oneof![
        arb_ascii_value().prop_map(RawValue::Str),
        arb_ascii_value().prop_map(RawValue::bytes),
        prop::collection::vec(arb_ascii_value(), 0..4).prop_map(RawValue::from),
    ]
}

/// Valid raw metadata. Keys are drawn from a small pool so that repeats,
/// including repeats differing only in case, are common.
pub(crate) fn arb_raw_metadata() -> impl Strategy<Value = RawValue> {
    let key = prop_oneof![
        prop::sample::select(vec!["a", "A", "b", "trace-id", "Trace-Id", "x.y"])
            .prop_map(str::to_string),
        arb_header_key(),
    ];
    let symbol_or_string = (key, any::<bool>()).prop_map(|(k, symbol)| {
        if symbol {
            RawValue::Symbol(k)
        } else {
            RawValue::Str(k)
        }
    });

    prop::collection::vec((symbol_or_string, arb_header_value()), 0..8).prop_map(RawValue::Map)
}
