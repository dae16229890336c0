//! Property-based tests for ordering and dump/load round trips.

use std::cmp::Ordering;

use canon_yaml::{
    Context, ContextMapping, DumpOptions, Error, OrderPolicy, Scalar, Value, dump_to_string, load,
    natural_key,
};
use proptest::collection::vec;
use proptest::prelude::*;

/// Strings mixing the characters that decide between plain and quoted output.
fn text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ._:#-]{0,10}"
}

fn scalar() -> impl Strategy<Value = Scalar> {
    prop_oneof![
        Just(Scalar::Null),
        any::<bool>().prop_map(Scalar::Bool),
        any::<i64>().prop_map(Scalar::Integer),
        text().prop_map(Scalar::String),
    ]
}

/// Documents up to three levels deep with a few entries per collection.
fn document() -> impl Strategy<Value = Value> {
    let leaf = scalar().prop_map(Value::Scalar);
    leaf.prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            vec(inner.clone(), 0..4).prop_map(Value::Sequence),
            vec((scalar(), inner), 0..4).prop_map(|pairs| {
                Value::Mapping(ContextMapping::from_pairs(
                    pairs,
                    Context::new("<generated>", 1, 1),
                ))
            }),
        ]
    })
}

/// Record names like `www12`; letters stop short of `inf` and `nan`.
fn record_name() -> impl Strategy<Value = String> {
    "[a-h]{1,3}[0-9]{0,3}"
}

fn dns_name() -> impl Strategy<Value = String> {
    vec("[a-h]{1,2}[0-9]{0,2}", 1..4).prop_map(|labels| labels.join("."))
}

fn mapping_text(keys: &[String]) -> String {
    keys.iter()
        .enumerate()
        .map(|(i, key)| format!("{key}: {i}\n"))
        .collect()
}

fn is_sorted(policy: OrderPolicy, keys: &[String]) -> bool {
    keys.windows(2)
        .all(|pair| policy.compare(&pair[0], &pair[1]) != Ordering::Greater)
}

/// Load `keys` as a mapping and check the result agrees with the comparator.
fn check_load_agrees(policy: OrderPolicy, keys: &[String]) -> Result<(), TestCaseError> {
    let sorted = is_sorted(policy, keys);
    prop_assert_eq!(policy.first_mismatch(keys).is_none(), sorted);

    match load(&mapping_text(keys), policy) {
        Ok(_) => prop_assert!(sorted, "unsorted keys loaded: {:?}", keys),
        Err(Error::OrderViolation {
            expected, actual, ..
        }) => {
            prop_assert!(!sorted, "sorted keys rejected: {:?}", keys);
            prop_assert_eq!(policy.first_mismatch(keys), Some((expected, actual)));
        }
        Err(other) => prop_assert!(false, "unexpected error {}", other),
    }

    let resorted = policy.sorted(keys);
    prop_assert!(load(&mapping_text(&resorted), policy).is_ok());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A shared prefix and suffix leave the digit run to decide, by value.
    #[test]
    fn test_digit_runs_order_by_value(
        prefix in "[a-z]{0,4}",
        suffix in "[a-z]{0,3}",
        a in any::<u64>(),
        b in any::<u64>(),
    ) {
        let left = natural_key(&format!("{prefix}{a}{suffix}"));
        let right = natural_key(&format!("{prefix}{b}{suffix}"));
        prop_assert_eq!(left.cmp(&right), a.cmp(&b));
    }

    #[test]
    fn test_zero_padding_ties(prefix in "[a-z]{0,4}", n in 0u32..100_000) {
        prop_assert_eq!(
            natural_key(&format!("{prefix}{n:08}")),
            natural_key(&format!("{prefix}{n}"))
        );
    }

    #[test]
    fn test_natural_load_fails_iff_unsorted(keys in vec(record_name(), 0..8)) {
        check_load_agrees(OrderPolicy::Natural, &keys)?;
    }

    #[test]
    fn test_dns_load_fails_iff_unsorted(keys in vec(dns_name(), 0..8)) {
        check_load_agrees(OrderPolicy::DnsHierarchy, &keys)?;
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_dump_load_round_trip(value in document()) {
        for policy in [OrderPolicy::Natural, OrderPolicy::DnsHierarchy] {
            let text = dump_to_string(&value, policy, &DumpOptions::default()).unwrap();
            let reloaded = load(&text, policy)
                .map_err(|err| TestCaseError::fail(format!("{err}\n{text}")))?;
            prop_assert_eq!(&reloaded, &value, "{}", text);
        }
    }

    #[test]
    fn test_dump_is_idempotent(value in document()) {
        let options = DumpOptions::default();
        let once = dump_to_string(&value, OrderPolicy::Natural, &options).unwrap();
        let reloaded = load(&once, OrderPolicy::Natural)
            .map_err(|err| TestCaseError::fail(format!("{err}\n{once}")))?;
        let twice = dump_to_string(&reloaded, OrderPolicy::Natural, &options).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_flow_and_canonical_round_trip(value in document()) {
        let variants = [
            DumpOptions { flow_style: true, ..DumpOptions::default() },
            DumpOptions { canonical: true, ..DumpOptions::default() },
        ];
        for options in variants {
            let text = dump_to_string(&value, OrderPolicy::Natural, &options).unwrap();
            let reloaded = load(&text, OrderPolicy::Natural)
                .map_err(|err| TestCaseError::fail(format!("{err}\n{text}")))?;
            prop_assert_eq!(&reloaded, &value, "{}", text);
        }
    }
}
