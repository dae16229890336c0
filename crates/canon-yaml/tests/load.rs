//! Loading behaviour observed through the public API.

use canon_yaml::{Context, Error, Loader, OrderPolicy, Scalar, Value, load, load_named};

fn keys(value: &Value) -> Vec<String> {
    value
        .as_mapping()
        .expect("mapping")
        .keys()
        .map(Scalar::sort_text)
        .collect()
}

#[test]
fn test_natural_order_accepts_numbered_hosts() {
    let text = "\
'':
  type: NS
www1:
  type: A
www2:
  type: A
www10:
  type: A
";
    let value = load(text, OrderPolicy::Natural).unwrap();
    assert_eq!(keys(&value), vec!["", "www1", "www2", "www10"]);
}

#[test]
fn test_natural_order_rejects_lexical_listing() {
    let text = "www1: 1\nwww10: 10\nwww2: 2\n";
    match load_named(text, "zones/unit.tests.yaml", OrderPolicy::Natural).unwrap_err() {
        Error::OrderViolation {
            expected,
            actual,
            context,
        } => {
            assert_eq!(expected, "www2");
            assert_eq!(actual, "www10");
            assert_eq!(context, Context::new("zones/unit.tests.yaml", 1, 1));
        }
        other => panic!("expected order violation, got {other:?}"),
    }
}

#[test]
fn test_violation_deep_in_tree_reports_that_mapping() {
    let text = "\
www:
  type: A
  values:
  - 1.2.3.4
  - 1.2.3.5
mail:
  octodns:
    ttl: 60
    healthcheck: {}
";
    // The inner mapping completes before the outer one is checked.
    let err = load_named(text, "zone.yaml", OrderPolicy::Natural).unwrap_err();
    assert_eq!(err.context(), Some(&Context::new("zone.yaml", 8, 5)));
    assert_eq!(
        err.to_string(),
        "keys out of order: expected healthcheck got ttl at zone.yaml, line 8, column 5"
    );
}

#[test]
fn test_dns_policy_groups_subdomains_under_parent() {
    let text = "\
a.test.com: 1
sub2.a.test.com: 2
sub10.a.test.com: 3
b.test.com: 4
";
    let value = load(text, OrderPolicy::DnsHierarchy).unwrap();
    assert_eq!(
        keys(&value),
        vec!["a.test.com", "sub2.a.test.com", "sub10.a.test.com", "b.test.com"]
    );

    // Natural order sorts these by their leftmost label instead.
    assert!(matches!(
        load(text, OrderPolicy::Natural),
        Err(Error::OrderViolation { .. })
    ));
}

#[test]
fn test_policy_from_flag() {
    assert_eq!("true".parse::<OrderPolicy>().unwrap(), OrderPolicy::Natural);
    assert_eq!("false".parse::<OrderPolicy>().unwrap(), OrderPolicy::None);
    assert_eq!("dns".parse::<OrderPolicy>().unwrap(), OrderPolicy::DnsHierarchy);
    assert!(matches!(
        "sometimes".parse::<OrderPolicy>(),
        Err(Error::InvalidPolicy(_))
    ));
}

#[test]
fn test_every_mapping_carries_context() {
    let text = "a:\n  b:\n    c: 1\nd:\n- e: 1\n";
    let value = load_named(text, "nested.yaml", OrderPolicy::Natural).unwrap();

    let root = value.as_mapping().unwrap();
    assert_eq!(root.context(), &Context::new("nested.yaml", 1, 1));

    let b = value.get("a").and_then(|a| a.get("b")).unwrap();
    assert_eq!(b.as_mapping().unwrap().context().line, 3);

    let in_seq = &value.get("d").and_then(Value::as_sequence).unwrap()[0];
    assert_eq!(in_seq.as_mapping().unwrap().context(), &Context::new("nested.yaml", 5, 3));
}

#[test]
fn test_scalar_keys_of_any_type_are_ordered_by_text() {
    let value = load("1: one\n2: two\n10: ten\nnull: nothing\n", OrderPolicy::Natural).unwrap();
    let mapping = value.as_mapping().unwrap();
    assert_eq!(
        mapping.get_scalar(&Scalar::Integer(10)).and_then(Value::as_str),
        Some("ten")
    );
    assert_eq!(
        mapping.get_scalar(&Scalar::Null).and_then(Value::as_str),
        Some("nothing")
    );
}

#[test]
fn test_syntax_error_has_position() {
    let err = load_named("a: 1\nb: [1, 2\n", "broken.yaml", OrderPolicy::Natural).unwrap_err();
    match err {
        Error::Syntax {
            source_name, line, ..
        } => {
            assert_eq!(source_name, "broken.yaml");
            assert!(line >= 2, "line {line}");
        }
        other => panic!("expected syntax error, got {other:?}"),
    }
}

#[test]
fn test_loader_is_reusable() {
    let mut loader = Loader::new(OrderPolicy::Natural);
    assert!(loader.load_str("b: 1\na: 2\n").is_err());
    assert!(loader.load_str("a: 1\nb: 2\n").is_ok());
    assert_eq!(loader.policy(), OrderPolicy::Natural);
}

#[test]
fn test_context_column_does_not_depend_on_key_length() {
    for text in ["abc: 1\na: 2\n", "b: 1\na: 2\n", "'b': 1\na: 2\n", "a-long-record-name: 1\na: 2\n"] {
        let err = load(text, OrderPolicy::Natural).unwrap_err();
        assert_eq!(
            err.context(),
            Some(&Context::new("<string>", 1, 1)),
            "{text:?}"
        );
    }

    let value = load("x: {b: 1}\n", OrderPolicy::Natural).unwrap();
    let inner = value.get("x").and_then(Value::as_mapping).unwrap();
    assert_eq!(inner.context(), &Context::new("<string>", 1, 4));
}
