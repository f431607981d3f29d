//! Property tests for metadata sanitization and mocked calls.
//!
//! These exercise the public API only, with generated header maps.

use grpc_mock::{
    MetadataErrorKind, MockedCall, RawValue, is_binary_key, is_valid_header_key,
    is_valid_header_value, sanitize_metadata,
};
use proptest::prelude::*;

// Strategy: header names, mixed case
fn arb_key() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z0-9_.-]{1,12}").unwrap()
}

// Strategy: printable ASCII values, possibly space-padded
fn arb_value() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ -~]{1,24}").unwrap()
}

// Strategy: values containing at least one control character
fn arb_control_value() -> impl Strategy<Value = String> {
    (
        arb_value(),
        prop::sample::select(vec!['\0', '\t', '\n', '\r', '\u{1b}', '\u{7f}']),
    )
        .prop_map(|(v, c)| format!("{}{}", v, c))
}

// Strategy: a valid header map as ordered (key, values) pairs
fn arb_pairs() -> impl Strategy<Value = Vec<(String, Vec<String>)>> {
    prop::collection::vec((arb_key(), prop::collection::vec(arb_value(), 1..4)), 0..6)
}

fn to_raw(pairs: &[(String, Vec<String>)]) -> RawValue {
    RawValue::map(pairs.iter().map(|(k, vs)| {
        let value = if vs.len() == 1 {
            RawValue::from(vs[0].as_str())
        } else {
            RawValue::from(vs.clone())
        };
        (RawValue::from(k.as_str()), value)
    }))
}

proptest! {
    /// Property: every value for a key appears in output in input order
    #[test]
    fn proptest_values_keep_input_order(pairs in arb_pairs()) {
        let metadata = sanitize_metadata(&to_raw(&pairs)).expect("valid metadata");

        for key in metadata.keys() {
            let expected: Vec<Vec<u8>> = pairs
                .iter()
                .filter(|(k, _)| k.to_ascii_lowercase() == key)
                .flat_map(|(k, vs)| vs.iter().map(move |v| (k, v)))
                .map(|(k, v)| if is_binary_key(k) { v.as_str() } else { v.trim() })
                .map(|v| v.as_bytes().to_vec())
                .collect();
            let actual: Vec<Vec<u8>> = metadata
                .get(key)
                .expect("listed key is present")
                .iter()
                .map(|v| v.as_bytes().to_vec())
                .collect();

            prop_assert_eq!(actual, expected);
        }
    }

    /// Property: distinct lowercase input keys map one-to-one to output keys
    #[test]
    fn proptest_key_set_matches_input(pairs in arb_pairs()) {
        let metadata = sanitize_metadata(&to_raw(&pairs)).expect("valid metadata");

        let mut expected: Vec<String> = Vec::new();
        for (k, _) in &pairs {
            let k = k.to_ascii_lowercase();
            if !expected.contains(&k) {
                expected.push(k);
            }
        }
        let actual: Vec<&str> = metadata.keys().collect();

        prop_assert_eq!(actual, expected);
    }

    /// Property: non-binary output values are printable and trimmed
    #[test]
    fn proptest_plain_values_are_printable(pairs in arb_pairs()) {
        let metadata = sanitize_metadata(&to_raw(&pairs)).expect("valid metadata");

        for (key, value) in metadata.iter() {
            prop_assert!(is_valid_header_key(key));
            for v in value.iter().filter_map(|v| v.as_str()) {
                prop_assert_eq!(v, v.trim());
                prop_assert!(v.is_empty() || is_valid_header_value(v));
            }
        }
    }

    /// Property: a control character anywhere fails the whole map
    #[test]
    fn proptest_control_characters_fail_everything(
        pairs in arb_pairs(),
        key in arb_key(),
        bad in arb_control_value(),
    ) {
        prop_assume!(!is_binary_key(&key));
        let mut pairs = pairs;
        pairs.push((key, vec![bad]));

        let error = sanitize_metadata(&to_raw(&pairs)).expect_err("should be rejected");
        prop_assert_eq!(error.kind(), MetadataErrorKind::InvalidArgument);
    }

    /// Property: binary keys accept any bytes unchanged
    #[test]
    fn proptest_binary_keys_pass_through(
        prefix in arb_key(),
        value in prop::collection::vec(any::<u8>(), 0..16),
    ) {
        let key = format!("{}-bin", prefix);
        let raw = RawValue::map([(key.as_str(), RawValue::bytes(&value))]);

        let metadata = sanitize_metadata(&raw).expect("binary values are not checked");

        prop_assert_eq!(
            metadata.get(&key).and_then(|v| v.as_bytes()),
            Some(value.as_slice())
        );
    }

    /// Property: an uppercase `-BIN` suffix does not exempt a value
    #[test]
    fn proptest_uppercase_binary_suffix_is_checked(
        prefix in arb_key(),
        bad in arb_control_value(),
    ) {
        let key = format!("{}-BIN", prefix);
        let raw = RawValue::map([(key.as_str(), bad.as_str())]);

        let error = sanitize_metadata(&raw).expect_err("should be rejected");
        prop_assert_eq!(error.kind(), MetadataErrorKind::InvalidArgument);
    }

    /// Property: mocked calls agree with the sanitizer on every input
    #[test]
    fn proptest_mocked_call_matches_sanitizer(
        pairs in arb_pairs(),
        bad_input in any::<bool>(),
    ) {
        let raw = if bad_input {
            RawValue::from(pairs.iter().map(|(k, _)| k.clone()).collect::<Vec<_>>())
        } else {
            to_raw(&pairs)
        };

        match (MockedCall::new(&raw), sanitize_metadata(&raw)) {
            (Ok(call), Ok(metadata)) => {
                prop_assert_eq!(call.metadata(), &metadata);
                prop_assert_eq!(call.single_req_view().metadata(), &metadata);
                prop_assert_eq!(call.multi_req_view().metadata(), &metadata);
            }
            (Err(call_err), Err(err)) => {
                prop_assert!(bad_input);
                prop_assert_eq!(err.kind(), MetadataErrorKind::TypeMismatch);
                prop_assert_eq!(call_err, err);
            }
            _ => {
                return Err(TestCaseError::fail(
                    "MockedCall::new and sanitize_metadata disagree",
                ));
            }
        }
    }
}
